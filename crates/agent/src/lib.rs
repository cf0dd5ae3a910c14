//! Tenderdesk orchestration loop.
//!
//! The agent takes one task, consults the planner for a decision each
//! step, dispatches tool invocations through the registry, and records
//! everything in a bounded, inspectable run history. Catalog-style
//! questions short-circuit through the fast-path matcher without
//! planning at all.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tenderdesk_agent::AgentRunner;
//! use tenderdesk_planner::OpenAiCompatPlanner;
//! use tenderdesk_tools::RecordStore;
//!
//! # async fn example() {
//! let planner = Arc::new(OpenAiCompatPlanner::siliconflow("key", "model"));
//! let tools = Arc::new(tenderdesk_tools::default_registry(Arc::new(
//!     RecordStore::with_sample_data(),
//! )));
//! let agent = AgentRunner::new(planner, tools);
//!
//! let run = agent.run("how many advisory contracts did we sign?").await;
//! println!("{}", run.final_answer.unwrap_or_default());
//! # }
//! ```

pub mod events;
pub mod fast_path;
pub mod interpreter;
pub mod prompt;
pub mod runner;

#[cfg(test)]
pub mod test_helpers;

pub use events::RunEvent;
pub use fast_path::FastPath;
pub use interpreter::{ActionRequest, Decision, interpret};
pub use runner::{AgentRunner, DEFAULT_MAX_STEPS};

//! # Tenderdesk Core
//!
//! Domain types, traits, and error definitions for the Tenderdesk agent
//! runtime. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every boundary is defined as a trait here (planner, tool).
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod planner;
pub mod run;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, PlannerError, Result, ToolError};
pub use message::{Message, Role};
pub use planner::Planner;
pub use run::{RunContext, RunState, Step, StepDraft};
pub use tool::{
    ParamType, Tool, ToolInvocationResult, ToolParameter, ToolRegistry, ToolSpec,
};

//! Planner trait — the abstraction over the reasoning LLM.
//!
//! The orchestration loop consults the planner once per THINKING
//! transition: it sends system instructions (capability listing + task
//! protocol) plus the conversation so far, and gets back free-form text.
//! Any fault at this boundary is fatal for the run — the loop records it
//! and terminates, it does not retry.

use async_trait::async_trait;
use crate::error::PlannerError;
use crate::message::Message;

/// The planner boundary.
///
/// Implementations live in `tenderdesk-planner` (OpenAI-compatible HTTP
/// backends) and in test code (scripted planners).
#[async_trait]
pub trait Planner: Send + Sync {
    /// A human-readable name for this planner (e.g., "siliconflow").
    fn name(&self) -> &str;

    /// Send instructions + conversation, get the raw response text back.
    async fn infer(
        &self,
        system_instructions: &str,
        conversation: &[Message],
    ) -> std::result::Result<String, PlannerError>;
}

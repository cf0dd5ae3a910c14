//! Stream events emitted by the orchestration loop.
//!
//! One flat enum carried over an mpsc channel; the gateway maps each
//! variant to one SSE frame. The serialized form tags the variant under
//! `"type"` so web clients can switch on it.

use serde::{Deserialize, Serialize};

/// One observable moment in a run, in emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// The run has been accepted and is starting.
    Started { task: String },

    /// The loop is about to consult the planner for step `step`.
    Thinking { step: u32 },

    /// The planner's reasoning for the current step.
    Thought { content: String },

    /// A tool is about to be invoked.
    ToolCall {
        name: String,
        params: serde_json::Value,
    },

    /// A tool invocation finished.
    ToolResult {
        name: String,
        success: bool,
        output: serde_json::Value,
    },

    /// The final answer text.
    Answer { answer: String },

    /// A fatal fault; no answer will follow.
    Error { message: String },

    /// The run reached a terminal state. Always the last event.
    Finished { total_steps: u32 },
}

impl RunEvent {
    /// The SSE event name for this variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Thinking { .. } => "thinking",
            Self::Thought { .. } => "thought",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::Answer { .. } => "answer",
            Self::Error { .. } => "error",
            Self::Finished { .. } => "finished",
        }
    }
}

//! Run state machine and step history.
//!
//! One run = one task flowing through the orchestration loop from `Idle`
//! to a terminal state. The `RunContext` owns everything mutable about
//! the run: current state, step counter, append-only history, final
//! answer, and the configured step budget. It is owned exclusively by
//! the loop for the lifetime of the run and discarded afterwards.
//!
//! Invariants:
//! - step numbers are 1-based, strictly increasing, gapless
//! - `step_count` never exceeds `max_steps`
//! - at most one final answer per run
//! - once a terminal state is entered, no further steps are accepted

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// States of the orchestration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Waiting for a task (initial state)
    Idle,
    /// Consulting the planner
    Thinking,
    /// Invoking a tool
    Acting,
    /// Recording a tool result
    Observing,
    /// Terminal: the planner produced an answer
    Done,
    /// Terminal: answered without planning (fast path)
    Finished,
    /// Terminal: planner failure or step budget exhausted
    Error,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Finished | Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Thinking => "thinking",
            Self::Acting => "acting",
            Self::Observing => "observing",
            Self::Done => "done",
            Self::Finished => "finished",
            Self::Error => "error",
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded iteration of the loop. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// 1-based, gapless within a run
    pub number: u32,

    /// State at the time of recording
    pub state: RunState,

    /// The planner's reasoning for this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,

    /// Tool invoked this step, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Parameters the tool was invoked with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_params: Option<serde_json::Value>,

    /// Tool result payload (successful invocations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<serde_json::Value>,

    /// Error text (failed invocations, planner faults)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub timestamp: DateTime<Utc>,
}

/// The fields of a step that the loop supplies; number and timestamp are
/// assigned by `RunContext::add_step`.
#[derive(Debug, Clone, Default)]
pub struct StepDraft {
    pub state: RunState,
    pub thought: Option<String>,
    pub tool_name: Option<String>,
    pub tool_params: Option<serde_json::Value>,
    pub tool_result: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl StepDraft {
    /// A reasoning-only step (no action, no answer this turn).
    pub fn thinking(thought: impl Into<String>) -> Self {
        Self {
            state: RunState::Thinking,
            thought: Some(thought.into()),
            ..Self::default()
        }
    }

    /// The closing step of a successful run.
    pub fn done(thought: impl Into<String>) -> Self {
        Self {
            state: RunState::Done,
            thought: Some(thought.into()),
            ..Self::default()
        }
    }

    /// An observation step recording a tool invocation and its outcome.
    pub fn observation(
        thought: impl Into<String>,
        tool_name: impl Into<String>,
        tool_params: serde_json::Value,
        tool_result: Option<serde_json::Value>,
        error: Option<String>,
    ) -> Self {
        Self {
            state: RunState::Observing,
            thought: Some(thought.into()),
            tool_name: Some(tool_name.into()),
            tool_params: Some(tool_params),
            tool_result,
            error,
        }
    }

    /// A fatal-error step (planner failure).
    pub fn fatal(error: impl Into<String>) -> Self {
        Self {
            state: RunState::Error,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// The mutable state of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Unique run ID
    pub id: String,

    /// The original task text
    pub task: String,

    /// Current state-machine state
    pub state: RunState,

    /// Number of recorded steps
    pub step_count: u32,

    /// Append-only step history
    pub steps: Vec<Step>,

    /// The final answer, set at most once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<String>,

    /// Step budget for this run
    pub max_steps: u32,
}

impl RunContext {
    pub fn new(task: impl Into<String>, max_steps: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task: task.into(),
            state: RunState::Idle,
            step_count: 0,
            steps: Vec::new(),
            final_answer: None,
            max_steps,
        }
    }

    /// Append a step, assigning the next number and the current time.
    /// Also advances `state` to the step's state.
    pub fn add_step(&mut self, draft: StepDraft) -> &Step {
        debug_assert!(!self.state.is_terminal(), "run already terminal");
        debug_assert!(self.step_count < self.max_steps, "step budget exceeded");

        self.step_count += 1;
        self.state = draft.state;
        self.steps.push(Step {
            number: self.step_count,
            state: draft.state,
            thought: draft.thought,
            tool_name: draft.tool_name,
            tool_params: draft.tool_params,
            tool_result: draft.tool_result,
            error: draft.error,
            timestamp: Utc::now(),
        });
        self.steps.last().expect("step just pushed")
    }

    /// Whether the run has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Whether the step budget is used up.
    pub fn budget_exhausted(&self) -> bool {
        self.step_count >= self.max_steps
    }

    /// Steps that invoked a tool, in order.
    pub fn tool_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.tool_name.is_some())
    }

    /// Render the full run as a human-readable trace.
    pub fn trace(&self) -> String {
        let mut lines = vec![format!("Task: {}", self.task)];
        for step in &self.steps {
            lines.push(format!("[step {}] {}", step.number, step.state));
            if let Some(thought) = &step.thought {
                lines.push(format!("  thought: {}", preview(thought, 100)));
            }
            if let Some(tool) = &step.tool_name {
                lines.push(format!("  tool: {}", tool));
                if let Some(params) = &step.tool_params {
                    lines.push(format!("  params: {}", params));
                }
            }
            if let Some(result) = &step.tool_result {
                lines.push(format!("  result: {}", preview(&result.to_string(), 100)));
            }
            if let Some(error) = &step.error {
                lines.push(format!("  error: {}", error));
            }
        }
        if let Some(answer) = &self.final_answer {
            lines.push(format!("Answer: {}", answer));
        }
        lines.join("\n")
    }
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
/// Char-based, so multi-byte text is never split mid-codepoint.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

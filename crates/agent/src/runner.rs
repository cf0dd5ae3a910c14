//! The orchestration loop.
//!
//! One `AgentRunner` serves many runs concurrently; per-run state lives
//! in the `RunContext` owned by `execute`. Synchronous and streaming
//! execution are thin front-ends over the same step driver, the
//! streaming one feeding a bounded event channel from a spawned task.
//!
//! Fault policy:
//! - planner failure is fatal: one error step, no answer, no retry
//! - a malformed planner reply degrades to a thinking step
//! - a tool fault comes back as a failed observation for the planner
//! - budget exhaustion yields an apology answer in the error state

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use tenderdesk_core::message::Message;
use tenderdesk_core::planner::Planner;
use tenderdesk_core::run::{RunContext, RunState, StepDraft};
use tenderdesk_core::tool::{ToolInvocationResult, ToolRegistry};

use crate::events::RunEvent;
use crate::fast_path::FastPath;
use crate::interpreter;
use crate::prompt;

/// Default step budget per run.
pub const DEFAULT_MAX_STEPS: u32 = 8;

/// Capacity of the streaming event channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

const BUDGET_APOLOGY: &str = "I'm sorry, I couldn't complete this task within the \
allowed number of reasoning steps. Please try a narrower question.";

/// The shared, reusable loop driver.
#[derive(Clone)]
pub struct AgentRunner {
    planner: Arc<dyn Planner>,
    tools: Arc<ToolRegistry>,
    fast_path: FastPath,
    max_steps: u32,
}

impl AgentRunner {
    pub fn new(planner: Arc<dyn Planner>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            planner,
            tools,
            fast_path: FastPath::standard(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn with_fast_path(mut self, fast_path: FastPath) -> Self {
        self.fast_path = fast_path;
        self
    }

    /// The tool registry this runner dispatches against.
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Run a task to completion and return the full run record.
    pub async fn run(&self, task: &str) -> RunContext {
        self.run_with_budget(task, self.max_steps).await
    }

    /// Run with an explicit step budget for this run only.
    pub async fn run_with_budget(&self, task: &str, max_steps: u32) -> RunContext {
        self.execute(task, max_steps, None).await
    }

    /// Streaming variant of [`run`].
    ///
    /// Returns a receiver of [`RunEvent`]s fed by a background task. The
    /// `Finished` event is always last; dropping the receiver aborts
    /// event delivery but the run itself completes.
    pub fn run_stream(&self, task: impl Into<String>) -> mpsc::Receiver<RunEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let runner = self.clone();
        let task = task.into();
        tokio::spawn(async move {
            runner.execute(&task, runner.max_steps, Some(tx)).await;
        });
        rx
    }

    /// The single step driver behind both execution modes.
    async fn execute(
        &self,
        task: &str,
        max_steps: u32,
        events: Option<mpsc::Sender<RunEvent>>,
    ) -> RunContext {
        let mut ctx = RunContext::new(task, max_steps);
        info!(run_id = %ctx.id, max_steps, "run starting");

        emit(&events, RunEvent::Started { task: task.into() }).await;

        // Catalog questions bypass planning entirely.
        if let Some(ctx) = self.try_fast_path(&mut ctx, &events).await {
            return ctx;
        }

        let system = prompt::system_prompt(&self.tools);

        while !ctx.is_terminal() && !ctx.budget_exhausted() {
            let step_number = ctx.step_count + 1;
            debug!(run_id = %ctx.id, step = step_number, "consulting planner");
            ctx.state = RunState::Thinking;
            emit(&events, RunEvent::Thinking { step: step_number }).await;

            let conversation = [Message::user(prompt::user_prompt(&ctx.task, &ctx.steps))];
            let raw = match self.planner.infer(&system, &conversation).await {
                Ok(raw) => raw,
                Err(e) => {
                    error!(run_id = %ctx.id, error = %e, "planner failure, aborting run");
                    ctx.add_step(StepDraft::fatal(format!("planner failure: {e}")));
                    emit(
                        &events,
                        RunEvent::Error {
                            message: format!("planner failure: {e}"),
                        },
                    )
                    .await;
                    break;
                }
            };

            let decision = interpreter::interpret(&raw);
            if !decision.thought.is_empty() {
                emit(
                    &events,
                    RunEvent::Thought {
                        content: decision.thought.clone(),
                    },
                )
                .await;
            }

            if let Some(answer) = decision.answer {
                ctx.add_step(StepDraft::done(decision.thought));
                ctx.final_answer = Some(answer.clone());
                emit(&events, RunEvent::Answer { answer }).await;
            } else if let Some(action) = decision.action {
                ctx.state = RunState::Acting;
                emit(
                    &events,
                    RunEvent::ToolCall {
                        name: action.tool.clone(),
                        params: action.params.clone(),
                    },
                )
                .await;

                let outcome = self.tools.invoke(&action.tool, action.params.clone()).await;
                debug!(
                    run_id = %ctx.id,
                    tool = %action.tool,
                    success = outcome.success,
                    "tool invoked"
                );
                emit(
                    &events,
                    RunEvent::ToolResult {
                        name: action.tool.clone(),
                        success: outcome.success,
                        output: outcome_output(&outcome),
                    },
                )
                .await;

                ctx.add_step(StepDraft::observation(
                    decision.thought,
                    action.tool,
                    action.params,
                    outcome.result,
                    outcome.error,
                ));
            } else {
                // No action, no answer. Record the reasoning and loop.
                ctx.add_step(StepDraft::thinking(decision.thought));
            }
        }

        if !ctx.is_terminal() {
            warn!(run_id = %ctx.id, steps = ctx.step_count, "step budget exhausted");
            ctx.state = RunState::Error;
            ctx.final_answer = Some(BUDGET_APOLOGY.into());
            // Surfaced as an error, not an answer: stream consumers must be
            // able to tell an exhausted run from a completed one.
            emit(
                &events,
                RunEvent::Error {
                    message: BUDGET_APOLOGY.into(),
                },
            )
            .await;
        }

        info!(
            run_id = %ctx.id,
            state = %ctx.state,
            steps = ctx.step_count,
            answered = ctx.final_answer.is_some(),
            "run finished"
        );
        emit(
            &events,
            RunEvent::Finished {
                total_steps: ctx.step_count,
            },
        )
        .await;
        ctx
    }

    /// Try the fast path. Returns the completed context on a hit with a
    /// successful invocation; a miss or a failed invocation returns
    /// `None` and the loop proceeds normally.
    async fn try_fast_path(
        &self,
        ctx: &mut RunContext,
        events: &Option<mpsc::Sender<RunEvent>>,
    ) -> Option<RunContext> {
        let rule = self.fast_path.matches(&ctx.task)?;
        debug!(run_id = %ctx.id, rule = rule.name, tool = rule.tool, "fast-path hit");

        let params = serde_json::json!({});
        emit(
            events,
            RunEvent::ToolCall {
                name: rule.tool.into(),
                params: params.clone(),
            },
        )
        .await;

        let outcome = self.tools.invoke(rule.tool, params.clone()).await;
        emit(
            events,
            RunEvent::ToolResult {
                name: rule.tool.into(),
                success: outcome.success,
                output: outcome_output(&outcome),
            },
        )
        .await;

        if !outcome.success {
            warn!(
                run_id = %ctx.id,
                rule = rule.name,
                "fast-path invocation failed, falling back to the loop"
            );
            // The attempt was already announced as events, so it must show
            // up in the history too.
            ctx.add_step(StepDraft::observation(
                format!("rule '{}' matched but its tool failed", rule.name),
                rule.tool,
                params,
                outcome.result,
                outcome.error,
            ));
            return None;
        }

        let answer = self.fast_path.render_answer(rule, &outcome);
        ctx.add_step(StepDraft {
            state: RunState::Finished,
            thought: Some(format!("answered directly via rule '{}'", rule.name)),
            tool_name: Some(rule.tool.into()),
            tool_params: Some(params),
            tool_result: outcome.result,
            error: None,
        });
        ctx.final_answer = Some(answer.clone());

        emit(events, RunEvent::Answer { answer }).await;
        emit(
            events,
            RunEvent::Finished {
                total_steps: ctx.step_count,
            },
        )
        .await;

        info!(run_id = %ctx.id, rule = rule.name, "run finished via fast path");
        Some(ctx.clone())
    }
}

/// The payload to surface in a `ToolResult` event.
fn outcome_output(outcome: &ToolInvocationResult) -> serde_json::Value {
    match (&outcome.result, &outcome.error) {
        (Some(result), _) => result.clone(),
        (None, Some(error)) => serde_json::json!({ "error": error }),
        (None, None) => serde_json::Value::Null,
    }
}

async fn emit(events: &Option<mpsc::Sender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

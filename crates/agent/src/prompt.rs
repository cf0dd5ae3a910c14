//! Prompt construction for the planner.
//!
//! Two pieces: a system prompt holding the role, the tool catalog, and
//! the reply protocol, built once per run; and a user prompt rebuilt
//! every step from the task plus the step history so far. Tool results
//! are previewed at 500 characters so a verbose payload cannot crowd
//! the task out of the context window.

use tenderdesk_core::run::{Step, preview};
use tenderdesk_core::tool::ToolRegistry;

/// Length cap on tool result payloads echoed into the prompt.
const RESULT_PREVIEW_CHARS: usize = 500;

/// Build the per-run system prompt: role, catalog, reply protocol.
pub fn system_prompt(registry: &ToolRegistry) -> String {
    format!(
        r#"You are a bidding and tender assistant for a law practice. You answer questions about performance contracts, client enterprises, and staff lawyers by consulting the tools below, then summarizing what you found.

{catalog}

## How to reply

Reply with a single JSON object and nothing else:

{{"thought": "your reasoning for this step", "action": {{"tool": "tool_name", "params": {{...}}}}}}

or, when you can answer the question:

{{"thought": "your reasoning", "answer": "the final answer for the user"}}

Rules:
- Supply exactly one of "action" or "answer", never both.
- Use only tools from the catalog, with their declared parameter names.
- Base answers on tool observations, not on guesses.
- If a tool reports an error, adjust your approach and try again."#,
        catalog = registry.describe_for_prompt(None),
    )
}

/// Build the per-step user prompt: the task plus the history so far.
pub fn user_prompt(task: &str, steps: &[Step]) -> String {
    let mut out = format!("Task: {task}");

    if !steps.is_empty() {
        out.push_str("\n\nSteps so far:");
        for step in steps {
            if let Some(thought) = &step.thought {
                out.push_str(&format!("\nThought: {thought}"));
            }
            if let Some(tool) = &step.tool_name {
                let params = step
                    .tool_params
                    .as_ref()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "{}".into());
                out.push_str(&format!("\nAction: {tool}({params})"));
            }
            if let Some(result) = &step.tool_result {
                out.push_str(&format!(
                    "\nObservation: {}",
                    preview(&result.to_string(), RESULT_PREVIEW_CHARS)
                ));
            }
            if let Some(error) = &step.error {
                out.push_str(&format!("\nObservation: error: {error}"));
            }
        }
        out.push_str("\n\nContinue. Reply with one JSON object.");
    }

    out
}

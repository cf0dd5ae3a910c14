//! Response interpreter: free-form planner text to a structured decision.
//!
//! The planner replies in prose-wrapped JSON. Reasoning models prepend a
//! `<think>` block; chat models wrap the payload in a code fence or bury
//! it in surrounding commentary. The interpreter peels those layers in a
//! fixed order and degrades gracefully: a reply that yields no JSON at
//! all becomes a plain thought, never a parse error and never an empty
//! one.

use serde::Deserialize;
use tracing::debug;

use tenderdesk_core::run::preview;

/// Length cap on the fallback thought when a reply has no usable JSON.
const FALLBACK_THOUGHT_CHARS: usize = 500;

/// Fallback thought when the reply carries no text at all.
const UNPARSEABLE_THOUGHT: &str = "could not interpret the planner reply";

/// A tool the planner asked to invoke.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionRequest {
    pub tool: String,
    #[serde(default = "empty_object")]
    pub params: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

/// What the planner decided this step: at most one of action or answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub thought: String,
    pub action: Option<ActionRequest>,
    pub answer: Option<String>,
}

#[derive(Deserialize)]
struct RawDecision {
    #[serde(default)]
    thought: String,
    #[serde(default)]
    action: Option<ActionRequest>,
    #[serde(default)]
    answer: Option<String>,
}

/// Interpret one raw planner reply.
///
/// Extraction order: split off any `<think>` block, then try a ```json
/// fence, then any ``` fence, then the outermost brace pair. The first
/// candidate that parses as the decision shape wins. Anything else
/// degrades to a reasoning-only decision whose thought is the cleaned
/// reply, capped at 500 characters. A reply that is all `<think>`
/// content keeps that content as the thought; a fully empty reply gets
/// a placeholder, so the fallback thought is never empty.
pub fn interpret(raw: &str) -> Decision {
    let (think, cleaned) = split_think_block(raw);

    for candidate in json_candidates(cleaned) {
        if let Ok(parsed) = serde_json::from_str::<RawDecision>(candidate) {
            return Decision {
                thought: parsed.thought,
                action: parsed.action,
                answer: parsed.answer,
            };
        }
    }

    debug!(chars = cleaned.len(), "planner reply had no parseable decision");
    let fallback = match cleaned.trim() {
        "" => think.trim(),
        text => text,
    };
    let thought = if fallback.is_empty() {
        UNPARSEABLE_THOUGHT.to_string()
    } else {
        preview(fallback, FALLBACK_THOUGHT_CHARS)
    };
    Decision {
        thought,
        action: None,
        answer: None,
    }
}

/// Split a leading `<think>...</think>` block from what follows.
/// An unterminated block claims the whole reply as think content.
fn split_think_block(text: &str) -> (&str, &str) {
    let trimmed = text.trim_start();
    let Some(rest) = trimmed.strip_prefix("<think>") else {
        return ("", text);
    };
    match rest.find("</think>") {
        Some(end) => (&rest[..end], &rest[end + "</think>".len()..]),
        None => (rest, ""),
    }
}

/// Candidate JSON substrings in priority order.
fn json_candidates(text: &str) -> impl Iterator<Item = &str> {
    [
        fenced_block(text, "```json"),
        fenced_block(text, "```"),
        outermost_braces(text),
    ]
    .into_iter()
    .flatten()
}

/// The body of the first fence opened by `opener`.
fn fenced_block<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let body = &text[start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// The substring from the first `{` to the last `}`.
fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_answer() {
        let decision = interpret(r#"{"thought": "the list is short", "answer": "Five lawyers."}"#);
        assert_eq!(decision.thought, "the list is short");
        assert_eq!(decision.answer.as_deref(), Some("Five lawyers."));
        assert!(decision.action.is_none());
    }

    #[test]
    fn json_fence_wins_over_prose() {
        let raw = "Here is my plan:\n```json\n{\"thought\": \"search first\", \"action\": {\"tool\": \"search_contracts\", \"params\": {\"category\": \"advisory\"}}}\n```\nHope that helps.";
        let decision = interpret(raw);
        let action = decision.action.unwrap();
        assert_eq!(action.tool, "search_contracts");
        assert_eq!(action.params["category"], "advisory");
        assert!(decision.answer.is_none());
    }

    #[test]
    fn bare_fence_accepted() {
        let raw = "```\n{\"thought\": \"ok\", \"answer\": \"done\"}\n```";
        let decision = interpret(raw);
        assert_eq!(decision.answer.as_deref(), Some("done"));
    }

    #[test]
    fn braces_in_surrounding_prose() {
        let raw = "Sure! {\"thought\": \"easy\", \"answer\": \"42\"} -- regards";
        let decision = interpret(raw);
        assert_eq!(decision.answer.as_deref(), Some("42"));
    }

    #[test]
    fn think_block_is_stripped() {
        let raw = "<think>long internal monologue with {spurious} braces</think>\n{\"thought\": \"t\", \"answer\": \"a\"}";
        let decision = interpret(raw);
        assert_eq!(decision.answer.as_deref(), Some("a"));
        assert_eq!(decision.thought, "t");
    }

    #[test]
    fn unterminated_think_block_degrades() {
        let decision = interpret("<think>never closed, still going");
        assert!(decision.answer.is_none());
        assert!(decision.action.is_none());
        assert_eq!(decision.thought, "never closed, still going");
    }

    #[test]
    fn think_only_reply_keeps_reasoning_as_thought() {
        let decision = interpret("<think>the roster is small, no lookup needed</think>");
        assert!(decision.answer.is_none());
        assert!(decision.action.is_none());
        assert_eq!(decision.thought, "the roster is small, no lookup needed");
    }

    #[test]
    fn empty_reply_gets_placeholder_thought() {
        for raw in ["", "   \n", "<think></think>"] {
            let decision = interpret(raw);
            assert!(!decision.thought.is_empty(), "thought empty for {raw:?}");
            assert!(decision.answer.is_none());
        }
    }

    #[test]
    fn unparseable_reply_becomes_thought() {
        let decision = interpret("I could not decide what to do here.");
        assert!(decision.action.is_none());
        assert!(decision.answer.is_none());
        assert_eq!(decision.thought, "I could not decide what to do here.");
    }

    #[test]
    fn fallback_thought_is_capped() {
        let long = "x".repeat(2000);
        let decision = interpret(&long);
        assert_eq!(decision.thought.chars().count(), 503); // 500 + "..."
    }

    #[test]
    fn action_params_default_to_empty_object() {
        let decision = interpret(r#"{"thought": "t", "action": {"tool": "list_lawyers"}}"#);
        let action = decision.action.unwrap();
        assert_eq!(action.tool, "list_lawyers");
        assert_eq!(action.params, serde_json::json!({}));
    }

    #[test]
    fn malformed_fence_falls_back_to_braces() {
        let raw = "```json\nnot json at all\n``` but later {\"thought\": \"t\", \"answer\": \"x\"}";
        // the fence body fails to parse; the brace scan still finds the payload
        let decision = interpret(raw);
        assert_eq!(decision.answer.as_deref(), Some("x"));
    }
}

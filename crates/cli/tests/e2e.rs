//! End-to-end integration tests for the Tenderdesk agent pipeline.
//!
//! These exercise the full path from a question to an answer: prompt
//! assembly, planner reply interpretation (including reasoning-model
//! noise), tool dispatch against the seeded record store, and the run
//! history the gateway and CLI report from.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tenderdesk_agent::{AgentRunner, FastPath, RunEvent};
use tenderdesk_core::error::PlannerError;
use tenderdesk_core::message::Message;
use tenderdesk_core::planner::Planner;
use tenderdesk_core::run::RunState;
use tenderdesk_core::tool::ToolRegistry;
use tenderdesk_tools::{RecordStore, default_registry};

// ── Mock planner ─────────────────────────────────────────────────────────

/// Replays scripted replies in sequence; panics if exhausted.
struct ScriptedPlanner {
    responses: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedPlanner {
    fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Planner for ScriptedPlanner {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn infer(
        &self,
        _system_instructions: &str,
        _conversation: &[Message],
    ) -> Result<String, PlannerError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().unwrap();
        assert!(
            index < responses.len(),
            "ScriptedPlanner exhausted: call #{index}, have {}",
            responses.len()
        );
        Ok(responses[index].clone())
    }
}

fn registry() -> Arc<ToolRegistry> {
    Arc::new(default_registry(Arc::new(RecordStore::with_sample_data())))
}

// ── E2E: full pipeline ───────────────────────────────────────────────────

#[tokio::test]
async fn e2e_search_then_answer() {
    // Scenario: the planner searches advisory contracts, reads the
    // observation, and answers from it.
    let planner = Arc::new(ScriptedPlanner::new(vec![
        r#"{"thought": "I should look up advisory contracts first", "action": {"tool": "search_contracts", "params": {"category": "advisory"}}}"#,
        r#"{"thought": "The search found 3 advisory contracts", "answer": "We have 3 advisory contracts on record."}"#,
    ]));
    let agent = AgentRunner::new(planner.clone(), registry());

    let ctx = agent.run("how many advisory contracts do we have?").await;

    assert_eq!(ctx.state, RunState::Done);
    assert_eq!(ctx.step_count, 2);
    assert_eq!(planner.calls(), 2);
    assert_eq!(
        ctx.final_answer.as_deref(),
        Some("We have 3 advisory contracts on record.")
    );

    let observation = &ctx.steps[0];
    assert_eq!(observation.tool_name.as_deref(), Some("search_contracts"));
    assert_eq!(observation.tool_result.as_ref().unwrap()["count"], 3);
}

#[tokio::test]
async fn e2e_reasoning_model_noise_is_tolerated() {
    // DeepSeek-style reply: a <think> block, then a fenced payload with
    // prose around it.
    let planner = Arc::new(ScriptedPlanner::new(vec![
        "<think>The user wants enterprise data. I will search by industry.</think>\nSure, let me check:\n```json\n{\"thought\": \"search energy clients\", \"action\": {\"tool\": \"search_enterprises\", \"params\": {\"industry\": \"energy\"}}}\n```",
        "<think>Two hits came back.</think>\n{\"thought\": \"two energy clients\", \"answer\": \"Two of our clients are in the energy industry.\"}",
    ]));
    let agent = AgentRunner::new(planner, registry());

    let ctx = agent.run("which clients are in energy?").await;

    assert_eq!(ctx.state, RunState::Done);
    assert_eq!(ctx.steps[0].tool_name.as_deref(), Some("search_enterprises"));
    assert_eq!(ctx.steps[0].tool_result.as_ref().unwrap()["count"], 2);
    assert_eq!(
        ctx.final_answer.as_deref(),
        Some("Two of our clients are in the energy industry.")
    );
}

#[tokio::test]
async fn e2e_multi_hop_lookup() {
    // Two tool invocations before the answer: find a contract, then pull
    // the client enterprise behind it.
    let planner = Arc::new(ScriptedPlanner::new(vec![
        r#"{"thought": "find the rail contract", "action": {"tool": "search_contracts", "params": {"keyword": "rail"}}}"#,
        r#"{"thought": "now pull the client record", "action": {"tool": "get_enterprise_by_name", "params": {"name": "Meridian Rail Holdings"}}}"#,
        r#"{"thought": "I have both records", "answer": "The rail contract client is Meridian Rail Holdings, a transportation company."}"#,
    ]));
    let agent = AgentRunner::new(planner, registry());

    let ctx = agent.run("who is the client behind our rail work?").await;

    assert_eq!(ctx.state, RunState::Done);
    assert_eq!(ctx.step_count, 3);
    assert_eq!(ctx.tool_steps().count(), 2);

    let enterprise_step = &ctx.steps[1];
    assert_eq!(
        enterprise_step.tool_name.as_deref(),
        Some("get_enterprise_by_name")
    );
    assert_eq!(
        enterprise_step.tool_result.as_ref().unwrap()["found"],
        true
    );
}

#[tokio::test]
async fn e2e_tool_error_recovery() {
    // A bad tool name comes back as a failed observation; the planner
    // corrects itself on the next step.
    let planner = Arc::new(ScriptedPlanner::new(vec![
        r#"{"thought": "try the roster tool", "action": {"tool": "roster_of_lawyers", "params": {}}}"#,
        r#"{"thought": "wrong name, use list_lawyers", "action": {"tool": "list_lawyers", "params": {}}}"#,
        r#"{"thought": "five lawyers on staff", "answer": "We have 5 staff lawyers."}"#,
    ]));
    let agent = AgentRunner::new(planner, registry()).with_fast_path(FastPath::disabled());

    let ctx = agent.run("how many lawyers are on staff?").await;

    assert_eq!(ctx.state, RunState::Done);
    assert!(
        ctx.steps[0]
            .error
            .as_ref()
            .unwrap()
            .contains("not registered")
    );
    assert_eq!(ctx.steps[1].tool_result.as_ref().unwrap()["count"], 5);
    assert_eq!(ctx.final_answer.as_deref(), Some("We have 5 staff lawyers."));
}

#[tokio::test]
async fn e2e_fast_path_answers_without_planner() {
    let planner = Arc::new(ScriptedPlanner::new(vec![]));
    let agent = AgentRunner::new(planner.clone(), registry());

    let ctx = agent.run("list all lawyers please").await;

    assert_eq!(planner.calls(), 0);
    assert_eq!(ctx.state, RunState::Finished);
    assert_eq!(ctx.step_count, 1);
    let answer = ctx.final_answer.unwrap();
    assert!(answer.contains("Elena Vasquez"));
    assert!(answer.contains("Sarah Okafor"));
}

#[tokio::test]
async fn e2e_stream_matches_sync_semantics() {
    let script = vec![
        r#"{"thought": "check the stats", "action": {"tool": "contract_stats", "params": {}}}"#,
        r#"{"thought": "eight contracts", "answer": "The portfolio holds 8 contracts."}"#,
    ];

    let sync_agent = AgentRunner::new(Arc::new(ScriptedPlanner::new(script.clone())), registry());
    let ctx = sync_agent.run("summarize our portfolio").await;

    let stream_agent = AgentRunner::new(Arc::new(ScriptedPlanner::new(script)), registry());
    let mut rx = stream_agent.run_stream("summarize our portfolio");
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    // Same terminal shape either way.
    assert_eq!(ctx.state, RunState::Done);
    assert_eq!(ctx.step_count, 2);
    assert!(matches!(
        events.last(),
        Some(RunEvent::Finished { total_steps: 2 })
    ));

    let streamed_answer = events.iter().find_map(|e| match e {
        RunEvent::Answer { answer } => Some(answer.clone()),
        _ => None,
    });
    assert_eq!(streamed_answer.as_deref(), ctx.final_answer.as_deref());
}

#[tokio::test]
async fn e2e_budget_exhaustion_apologizes() {
    // The planner dithers forever; the run stops at the budget with an
    // apology in the error state.
    let planner = Arc::new(ScriptedPlanner::new(vec![
        r#"{"thought": "hmm"}"#,
        r#"{"thought": "still not sure"}"#,
        r#"{"thought": "one more look"}"#,
    ]));
    let agent = AgentRunner::new(planner, registry()).with_max_steps(3);

    let ctx = agent.run("an unanswerable question").await;

    assert_eq!(ctx.state, RunState::Error);
    assert_eq!(ctx.step_count, 3);
    assert!(!ctx.final_answer.unwrap().is_empty());
}

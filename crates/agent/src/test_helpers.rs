//! Scripted planners for loop tests. No network, fully deterministic.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tenderdesk_core::error::PlannerError;
use tenderdesk_core::message::Message;
use tenderdesk_core::planner::Planner;

/// Replays a fixed sequence of replies; once the script runs out, the
/// last reply repeats. Counts calls so tests can assert the planner was
/// (or was not) consulted.
pub struct ScriptedPlanner {
    responses: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedPlanner {
    pub fn new(responses: Vec<&str>) -> Self {
        assert!(!responses.is_empty(), "script needs at least one reply");
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn single(response: &str) -> Self {
        Self::new(vec![response])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn infer(
        &self,
        _system_instructions: &str,
        _conversation: &[Message],
    ) -> std::result::Result<String, PlannerError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().expect("script lock");
        Ok(responses[index.min(responses.len() - 1)].clone())
    }
}

/// Always fails with an API error.
pub struct FailingPlanner;

#[async_trait]
impl Planner for FailingPlanner {
    fn name(&self) -> &str {
        "failing"
    }

    async fn infer(
        &self,
        _system_instructions: &str,
        _conversation: &[Message],
    ) -> std::result::Result<String, PlannerError> {
        Err(PlannerError::ApiError {
            status_code: 500,
            message: "upstream on fire".into(),
        })
    }
}

//! HTTP API gateway for Tenderdesk.
//!
//! Exposes REST endpoints for health checks, one-shot chat, streaming
//! chat over SSE, and the tool catalog. Built on Axum; one shared
//! `AgentRunner` serves all requests concurrently.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::sse::{Event as SseEvent, Sse},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::CorsLayer;
use tracing::info;

use tenderdesk_agent::{AgentRunner, FastPath};
use tenderdesk_core::tool::ToolSpec;
use tenderdesk_planner::OpenAiCompatPlanner;
use tenderdesk_tools::RecordStore;

/// Per-request step budget bounds. Requests outside this range are clamped.
const MIN_REQUEST_STEPS: u32 = 1;
const MAX_REQUEST_STEPS: u32 = 20;

/// Answer substituted when a run terminates without producing one.
const NO_ANSWER_FALLBACK: &str = "I'm sorry, I wasn't able to complete this task.";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub runner: AgentRunner,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/chat/stream", post(chat_stream_handler))
        .route("/tools", get(tools_handler))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: tenderdesk_config::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let api_key = config.api_key.clone().ok_or(
        "No API key configured — set TENDERDESK_API_KEY or add api_key to config.toml",
    )?;

    let planner = Arc::new(
        OpenAiCompatPlanner::new("siliconflow", &config.base_url, api_key, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens),
    );
    let tools = Arc::new(tenderdesk_tools::default_registry(Arc::new(
        RecordStore::with_sample_data(),
    )));

    let fast_path = if config.agent.fast_path {
        FastPath::standard()
    } else {
        FastPath::disabled()
    };

    let runner = AgentRunner::new(planner, tools)
        .with_max_steps(config.agent.max_steps)
        .with_fast_path(fast_path);

    let state = Arc::new(GatewayState {
        runner,
        started_at: chrono::Utc::now(),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Request / response shapes ---

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,

    /// Per-request step budget override, clamped to 1..=20
    #[serde(default)]
    pub max_steps: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub run_id: String,
    pub answer: String,
    pub state: String,
    pub steps: u32,
    pub tool_calls: Vec<ToolCallSummary>,
}

#[derive(Debug, Serialize)]
pub struct ToolCallSummary {
    pub tool: String,
    pub params: serde_json::Value,
    pub success: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: i64,
    tools: usize,
}

#[derive(Debug, Serialize)]
struct ToolsResponse {
    count: usize,
    tools: Vec<ToolSpec>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// --- Handlers ---

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
        tools: state.runner.tools().len(),
    })
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "question must not be empty".into(),
            }),
        ));
    }

    info!(chars = question.len(), "chat request");

    let ctx = match payload.max_steps {
        Some(requested) => {
            let budget = requested.clamp(MIN_REQUEST_STEPS, MAX_REQUEST_STEPS);
            state.runner.run_with_budget(question, budget).await
        }
        None => state.runner.run(question).await,
    };

    let tool_calls = ctx
        .tool_steps()
        .map(|step| ToolCallSummary {
            tool: step.tool_name.clone().unwrap_or_default(),
            params: step
                .tool_params
                .clone()
                .unwrap_or(serde_json::Value::Null),
            success: step.error.is_none(),
        })
        .collect();

    Ok(Json(ChatResponse {
        run_id: ctx.id.clone(),
        answer: ctx
            .final_answer
            .clone()
            .unwrap_or_else(|| NO_ANSWER_FALLBACK.into()),
        state: ctx.state.to_string(),
        steps: ctx.step_count,
        tool_calls,
    }))
}

async fn chat_stream_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<
    Sse<impl futures::Stream<Item = Result<SseEvent, Infallible>>>,
    (StatusCode, Json<ErrorResponse>),
> {
    let question = payload.question.trim().to_string();
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "question must not be empty".into(),
            }),
        ));
    }

    info!(chars = question.len(), "chat stream request");

    let rx = state.runner.run_stream(question);
    let stream = ReceiverStream::new(rx).map(|event| {
        let event_type = event.event_type().to_string();
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(SseEvent::default().event(event_type).data(data))
    });

    Ok(Sse::new(stream))
}

async fn tools_handler(State(state): State<SharedState>) -> Json<ToolsResponse> {
    let tools = state.runner.tools().describe_as_data();
    Json(ToolsResponse {
        count: tools.len(),
        tools,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tenderdesk_core::error::PlannerError;
    use tenderdesk_core::message::Message;
    use tenderdesk_core::planner::Planner;
    use tower::ServiceExt;

    /// A canned planner so gateway tests run without a network.
    struct CannedPlanner(String);

    #[async_trait::async_trait]
    impl Planner for CannedPlanner {
        fn name(&self) -> &str {
            "canned"
        }

        async fn infer(
            &self,
            _system_instructions: &str,
            _conversation: &[Message],
        ) -> Result<String, PlannerError> {
            Ok(self.0.clone())
        }
    }

    fn test_state() -> SharedState {
        let planner = Arc::new(CannedPlanner(
            r#"{"thought": "no lookup needed", "answer": "canned answer"}"#.into(),
        ));
        let tools = Arc::new(tenderdesk_tools::default_registry(Arc::new(
            RecordStore::with_sample_data(),
        )));
        Arc::new(GatewayState {
            runner: AgentRunner::new(planner, tools),
            started_at: chrono::Utc::now(),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state());

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["tools"], 7);
    }

    #[tokio::test]
    async fn chat_endpoint_answers() {
        let app = build_router(test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question": "anything at all"}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["answer"], "canned answer");
        assert_eq!(json["state"], "done");
        assert_eq!(json["steps"], 1);
        assert_eq!(json["tool_calls"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn chat_planner_failure_still_returns_an_answer() {
        struct DownPlanner;

        #[async_trait::async_trait]
        impl Planner for DownPlanner {
            fn name(&self) -> &str {
                "down"
            }

            async fn infer(
                &self,
                _system_instructions: &str,
                _conversation: &[Message],
            ) -> Result<String, PlannerError> {
                Err(PlannerError::ApiError {
                    status_code: 500,
                    message: "upstream on fire".into(),
                })
            }
        }

        let tools = Arc::new(tenderdesk_tools::default_registry(Arc::new(
            RecordStore::with_sample_data(),
        )));
        let state = Arc::new(GatewayState {
            runner: AgentRunner::new(Arc::new(DownPlanner), tools),
            started_at: chrono::Utc::now(),
        });
        let app = build_router(state);

        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question": "anything at all"}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["state"], "error");
        // no final answer from the run, so the client still gets a readable one
        assert_eq!(json["answer"], NO_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn chat_rejects_empty_question() {
        let app = build_router(test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question": "   "}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_fast_path_reports_finished_state() {
        let app = build_router(test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question": "list all lawyers"}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        let json = body_json(response).await;
        assert_eq!(json["state"], "finished");
        assert_eq!(json["tool_calls"][0]["tool"], "list_lawyers");
        assert_eq!(json["tool_calls"][0]["success"], true);
    }

    #[tokio::test]
    async fn tools_endpoint_lists_catalog() {
        let app = build_router(test_state());

        let req = Request::builder()
            .uri("/tools")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["count"], 7);
        let names: Vec<&str> = json["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"search_contracts"));
        assert!(names.contains(&"list_lawyers"));
    }
}

//! OpenAI-compatible planner implementation.
//!
//! Works with: OpenAI, SiliconFlow, OpenRouter, Ollama, vLLM, and any
//! other endpoint exposing `/v1/chat/completions`. The loop's protocol
//! is text-in, text-out — tool selection happens in the response body,
//! parsed by the interpreter — so this client never sends a tool schema.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use tenderdesk_core::error::PlannerError;
use tenderdesk_core::message::{Message, Role};
use tenderdesk_core::planner::Planner;

/// An OpenAI-compatible chat-completions planner.
pub struct OpenAiCompatPlanner {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatPlanner {
    /// Create a new OpenAI-compatible planner.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.1,
            max_tokens: 2000,
            client,
        }
    }

    /// Create a SiliconFlow planner (convenience constructor).
    pub fn siliconflow(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("siliconflow", "https://api.siliconflow.cn/v1", api_key, model)
    }

    /// Create an OpenAI planner (convenience constructor).
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key, model)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn to_api_messages(system_instructions: &str, conversation: &[Message]) -> Vec<serde_json::Value> {
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": system_instructions,
        })];
        for m in conversation {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => "system",
            };
            messages.push(serde_json::json!({
                "role": role,
                "content": m.content,
            }));
        }
        messages
    }
}

#[async_trait]
impl Planner for OpenAiCompatPlanner {
    fn name(&self) -> &str {
        &self.name
    }

    async fn infer(
        &self,
        system_instructions: &str,
        conversation: &[Message],
    ) -> std::result::Result<String, PlannerError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(system_instructions, conversation),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        debug!(planner = %self.name, model = %self.model, "Sending inference request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlannerError::Timeout(e.to_string())
                } else {
                    PlannerError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(PlannerError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(PlannerError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Planner returned error");
            return Err(PlannerError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| PlannerError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PlannerError::ApiError {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        debug!(
            planner = %self.name,
            chars = choice.message.content.len(),
            "Inference response received"
        );

        Ok(choice.message.content)
    }
}

// --- API wire types ---

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: String,
}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::Agent;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Agent backed by an OpenAI-compatible chat completions endpoint.
///
/// The HTTP client is built on the first [`Agent::run`] and reused afterwards,
/// so a server that never talks to the model never pays for it.
pub struct OpenAiAgent {
    config: AgentConfig,
    client: OnceCell<Client>,
}

impl OpenAiAgent {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// Whether the underlying client has been constructed yet.
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    async fn client(&self) -> Result<&Client, AgentError> {
        self.client
            .get_or_try_init(|| async {
                info!("Initializing model client for {}", self.config.model);
                Client::builder()
                    .build()
                    .map_err(|e| AgentError::Provider(format!("Failed to build HTTP client: {}", e)))
            })
            .await
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Agent for OpenAiAgent {
    async fn run(&self, prompt: &str) -> Result<String, AgentError> {
        let client = self.client().await?;

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: &self.config.system_prompt },
                ChatMessage { role: "user", content: prompt },
            ],
        };

        debug!("Sending prompt ({} chars) to {}", prompt.chars().count(), self.config.model);

        let response = client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Provider(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            warn!("Model API returned {}: {}", status.as_u16(), detail);

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(AgentError::QuotaExceeded(detail));
            }
            return Err(AgentError::Provider(format!("API error ({}): {}", status.as_u16(), detail)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AgentError::Provider("Response contained no message".to_string()))
    }
}

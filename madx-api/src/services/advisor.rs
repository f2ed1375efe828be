//! Campaign advice via a chat completion service
//!
//! The campaign JSON goes into a fixed prompt asking whether to scale, pause
//! or leave the campaign alone; the model's reply is returned as text.

use async_trait::async_trait;
use madx_common::config::{DEFAULT_ADVISOR_BASE_URL, DEFAULT_ADVISOR_MODEL};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Advisor errors
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Advisor is not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Text-in/text-out completion backend
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AdvisorError>;
}

/// Chat completion client settings
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_ADVISOR_MODEL.to_string(),
            base_url: DEFAULT_ADVISOR_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AdvisorError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?
            .to_string();

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdvisorError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AdvisorError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Requesting chat completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AdvisorError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Api(status.as_u16(), text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Parse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AdvisorError::Parse("Completion returned no choices".to_string()))
    }
}

/// Prompt asking for a scale / pause / keep decision with reasoning
pub fn build_prompt(campaign: &Value) -> String {
    let data = serde_json::to_string_pretty(campaign).unwrap_or_else(|_| campaign.to_string());
    format!(
        "Zde jsou data kampaně:\n{}\n\nNavrhni, zda škálovat, pauznout nebo nechat být. Vysvětli proč.",
        data
    )
}

/// Ask the completion service what to do with one campaign
pub async fn recommend_action(
    service: &dyn CompletionService,
    campaign: &Value,
) -> Result<String, AdvisorError> {
    let prompt = build_prompt(campaign);
    let recommendation = service.complete(&prompt).await?;
    info!(chars = recommendation.len(), "Campaign recommendation received");
    Ok(recommendation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl CompletionService for Echo {
        async fn complete(&self, prompt: &str) -> Result<String, AdvisorError> {
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn test_prompt_embeds_campaign() {
        let prompt = build_prompt(&json!({"id": "c1", "spend": 10.0}));
        assert!(prompt.starts_with("Zde jsou data kampaně:\n"));
        assert!(prompt.contains("\"id\": \"c1\""));
        assert!(prompt.ends_with("Navrhni, zda škálovat, pauznout nebo nechat být. Vysvětli proč."));
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let result = OpenAiClient::new(&AdvisorConfig::default());
        assert!(matches!(result, Err(AdvisorError::NotConfigured(_))));

        let blank = AdvisorConfig {
            api_key: Some("   ".into()),
            ..AdvisorConfig::default()
        };
        assert!(matches!(OpenAiClient::new(&blank), Err(AdvisorError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_recommend_action_uses_prompt() {
        let reply = recommend_action(&Echo, &json!({"name": "Spring"})).await.unwrap();
        assert!(reply.contains("Spring"));
    }
}

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Sampling temperature for question generation; high enough that repeat
/// rounds over the same paragraphs come out differently.
const GENERATION_TEMPERATURE: f32 = 0.8;

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("QUIZ_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Outbound text-generation seam.
///
/// The generation service talks to the model through this trait so tests
/// can script replies without a network.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Send one prompt and return the model's reply text.
    ///
    /// `api_key_override` replaces the configured key for this call; students
    /// may bring their own key at login.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the client is disabled, the request fails, or
    /// the response carries no content.
    async fn complete(
        &self,
        prompt: &str,
        api_key_override: Option<&str>,
    ) -> Result<String, AiError>;
}

/// `AiClient` over an OpenAI-style chat-completions endpoint.
#[derive(Clone)]
pub struct HttpAiClient {
    client: Client,
    config: Option<AiConfig>,
}

impl HttpAiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl AiClient for HttpAiClient {
    async fn complete(
        &self,
        prompt: &str,
        api_key_override: Option<&str>,
    ) -> Result<String, AiError> {
        let config = self.config.as_ref().ok_or(AiError::Disabled)?;
        let api_key = api_key_override
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .unwrap_or(config.api_key.as_str());

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: GENERATION_TEMPERATURE,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

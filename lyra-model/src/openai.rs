//! OpenAI Responses API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use lyra_core::{CoreError, GenerationOptions, Llm, Result};

/// The OpenAI Responses API endpoint.
const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// Per-request timeout. Generation calls must not hang the pipeline.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Transport-level failures are retried this many times with backoff.
const MAX_RETRIES: u32 = 2;

/// An [`Llm`] backed by the OpenAI Responses API.
///
/// Generation is pinned to the options in [`GenerationOptions`]
/// (temperature 0, capped output) so pipeline runs stay reproducible.
/// Transport errors are retried with exponential backoff; once retries are
/// exhausted the error propagates as [`CoreError::Model`]. The client never
/// substitutes fabricated content for a failed call.
///
/// # Example
///
/// ```rust,ignore
/// use lyra_model::OpenAIResponsesClient;
///
/// let llm = OpenAIResponsesClient::new("sk-...", "gpt-4.1-mini")?;
/// let text = llm.generate("You are a planner.", "Plan now.").await?;
/// ```
pub struct OpenAIResponsesClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    options: GenerationOptions,
}

impl OpenAIResponsesClient {
    /// Create a new client with default [`GenerationOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the API key is empty or the HTTP
    /// client cannot be constructed.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CoreError::Config("OpenAI API key must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_key, model: model.into(), options: GenerationOptions::default() })
    }

    /// Override the generation options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    fn model_error(&self, message: impl Into<String>) -> CoreError {
        CoreError::Model { model: self.model.clone(), message: message.into() }
    }

    async fn send_once(&self, body: &ResponsesRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(OPENAI_RESPONSES_URL)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.model_error(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(self.model_error(format!("API returned {status}: {detail}")));
        }

        let parsed: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| self.model_error(format!("failed to parse response: {e}")))?;

        parsed
            .output
            .into_iter()
            .flat_map(|o| o.content)
            .find_map(|c| c.text)
            .ok_or_else(|| self.model_error("response contained no output text"))
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
struct OutputContent {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── Llm implementation ─────────────────────────────────────────────

#[async_trait]
impl Llm for OpenAIResponsesClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        debug!(
            model = %self.model,
            system_len = system.len(),
            user_len = user.len(),
            "generating"
        );

        let body = ResponsesRequest {
            model: &self.model,
            input: vec![
                InputMessage { role: "system", content: system },
                InputMessage { role: "user", content: user },
            ],
            max_output_tokens: self.options.max_output_tokens,
            temperature: self.options.temperature,
        };

        let mut attempt = 0;
        loop {
            match self.send_once(&body).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < MAX_RETRIES => {
                    attempt += 1;
                    let delay = Duration::from_millis(500 * (1 << attempt));
                    warn!(model = %self.model, attempt, error = %e, "generation failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(model = %self.model, error = %e, "generation failed");
                    return Err(e);
                }
            }
        }
    }
}

//! Language-model client.
//!
//! [`LanguageModel`] is the seam the assistant talks to. [`GeminiClient`]
//! implements it over the Generative Language REST API; tests substitute an
//! in-process fake.

use std::time::Duration;

use async_trait::async_trait;
use chronicles_core::settings::DEFAULT_MODEL;
use chronicles_core::{ChroniclesError, Result};
use serde_json::{json, Value};
use tracing::{debug, error};

/// Public Generative Language endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Returned when the model produced no text.
pub const NO_RESPONSE: &str = "No response generated.";

/// Sampling temperature used when none is given.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const REQUEST_TIMEOUT_SECS: u64 = 120;

// ── Request ───────────────────────────────────────────────────────────────────

/// One text-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub system_instruction: Option<String>,
    pub temperature: f32,
}

impl GenerationRequest {
    /// A request for `prompt` on `model` at the default temperature.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            system_instruction: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_MODEL)
    }
}

// ── LanguageModel ─────────────────────────────────────────────────────────────

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate text for `request`.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Call `model` and fold any failure into display text.
///
/// A missing API key yields `"Error: API Key is missing in environment
/// variables."`; other failures yield `"Error generating response: …"`.
pub async fn generate_response(model: &dyn LanguageModel, request: &GenerationRequest) -> String {
    match model.generate(request).await {
        Ok(text) => text,
        Err(ChroniclesError::MissingApiKey) => {
            error!("API key missing");
            format!("Error: {}", ChroniclesError::MissingApiKey)
        }
        Err(e) => {
            error!(error = %e, model = %request.model, "generation failed");
            format!("Error generating response: {}", e)
        }
    }
}

// ── GeminiConfig ──────────────────────────────────────────────────────────────

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Read `API_KEY` (falling back to `GEMINI_API_KEY`) and
    /// `GEMINI_API_BASE` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty("API_KEY").or_else(|| non_empty("GEMINI_API_KEY")),
            api_base: non_empty("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

// ── GeminiClient ──────────────────────────────────────────────────────────────

/// [`LanguageModel`] backed by the `models/{model}:generateContent` endpoint.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ChroniclesError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ChroniclesError::MissingApiKey)?;

        let url = self.endpoint(&request.model);
        debug!(model = %request.model, prompt_len = request.prompt.len(), "calling language model");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| ChroniclesError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChroniclesError::Llm(error_message(status.as_u16(), &body)));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| ChroniclesError::Http(e.to_string()))?;

        Ok(extract_text(&value).unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

// ── Wire helpers ──────────────────────────────────────────────────────────────

/// JSON body for a `generateContent` call.
pub fn request_body(request: &GenerationRequest) -> Value {
    let mut body = json!({
        "contents": [
            { "role": "user", "parts": [{ "text": request.prompt }] }
        ],
        "generationConfig": { "temperature": request.temperature },
    });
    if let Some(instruction) = &request.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    body
}

/// Concatenated text parts of the first candidate, or `None` when empty.
pub fn extract_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    format!("status {}: {}", status, detail)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, instrument, trace};

use crate::backend::{
    ChatMessage, ChatRole, GenerateResult, LLMClient, TokenUsage, check_response_status,
    handle_http_error,
};
use crate::error::{DoctorError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini models available for completion
///
/// Any other model name can be used through `Custom` or `FromStr`:
///
/// ```rust
/// use virtual_doctor::GeminiModel;
///
/// let model = GeminiModel::from_string("gemini-exp-1206");
/// assert_eq!(model, GeminiModel::Custom("gemini-exp-1206".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    /// Gemini 1.5 Flash
    #[default]
    Gemini15Flash,
    /// Gemini 1.5 Pro
    Gemini15Pro,
    /// Gemini 2.0 Flash
    Gemini20Flash,
    /// Gemini 2.5 Flash
    Gemini25Flash,
    /// Gemini 2.5 Pro
    Gemini25Pro,
    /// Custom model name (for new models or Gemini-compatible endpoints)
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini15Flash => "gemini-1.5-flash",
            Model::Gemini15Pro => "gemini-1.5-pro",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Custom(name) => name,
        }
    }

    /// Create a model from a string. Always succeeds.
    ///
    /// A leading `models/` prefix is accepted and stripped.
    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        let bare = name.strip_prefix("models/").unwrap_or(&name);
        match bare {
            "gemini-1.5-flash" => Model::Gemini15Flash,
            "gemini-1.5-pro" => Model::Gemini15Pro,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => Model::Custom(other.to_string()),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_string(s))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::from_string(s)
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        Model::from_string(s)
    }
}

/// Configuration for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: Model,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
    /// Defaults to "https://generativelanguage.googleapis.com/v1beta" if not set
    pub base_url: Option<String>,
}

impl GeminiConfig {
    fn with_key(api_key: String) -> Self {
        Self {
            api_key,
            model: Model::default(),
            temperature: 1.0,
            max_tokens: None,
            timeout: None, // no timeout unless configured
            base_url: None,
        }
    }
}

/// Gemini client for generating completions
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

// Gemini API request and response structures
#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print the api key
        f.debug_struct("GeminiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

fn gemini_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "model",
    }
}

impl GeminiClient {
    /// Create a new Gemini client with the provided API key.
    ///
    /// ```no_run
    /// # use virtual_doctor::GeminiClient;
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = GeminiClient::new("your-google-api-key")?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(name = "gemini_client_new", skip(api_key))]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DoctorError::ApiError(
                "API key cannot be empty. Use GeminiClient::from_env() to read from GOOGLE_API_KEY environment variable.".to_string(),
            ));
        }

        let config = GeminiConfig::with_key(api_key);
        info!(model = %config.model.as_str(), "Created Gemini client");

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create a new Gemini client from `GOOGLE_API_KEY`, falling back to `GEMINI_API_KEY`.
    #[instrument(name = "gemini_client_from_env")]
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| {
                DoctorError::ApiError(
                    "GOOGLE_API_KEY (or GEMINI_API_KEY) environment variable is not set"
                        .to_string(),
                )
            })?;

        Self::new(api_key)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        let base_url = self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!(
            "{}/models/{}:generateContent",
            base_url,
            self.config.model.as_str()
        )
    }

    fn build_request(&self, messages: &[ChatMessage]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: messages
                .iter()
                .map(|m| Content {
                    role: gemini_role(m.role),
                    parts: vec![Part {
                        text: m.content.clone(),
                    }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        }
    }
}

fn parse_completion(completion: GenerateContentResponse, model: &str) -> Result<GenerateResult> {
    let Some(candidate) = completion.candidates.into_iter().next() else {
        error!("Gemini API returned empty candidates array");
        return Err(DoctorError::ApiError(
            "No completion candidates returned".to_string(),
        ));
    };
    trace!(finish_reason = ?candidate.finish_reason, "Completion finish reason");

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        error!(finish_reason = ?candidate.finish_reason, "No text content in Gemini response");
        return Err(DoctorError::ApiError(format!(
            "No text content in response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    let usage = completion
        .usage_metadata
        .map(|u| TokenUsage::new(model, u.prompt_token_count, u.candidates_token_count));

    Ok(GenerateResult::new(texts.concat(), usage))
}

// Generate builder methods using macro
crate::impl_client_builder_methods! {
    client_type: GeminiClient,
    model_type: Model,
    provider_name: "Gemini"
}

#[async_trait]
impl LLMClient for GeminiClient {
    #[instrument(
        name = "gemini_generate_chat",
        skip(self, messages),
        fields(
            model = %self.config.model.as_str(),
            messages = messages.len()
        )
    )]
    async fn generate_chat(&self, messages: &[ChatMessage]) -> Result<GenerateResult> {
        let request = self.build_request(messages);
        let url = self.endpoint();
        debug!(url = %url, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| handle_http_error(e, "Gemini"))?;

        let response = check_response_status(response, "Gemini").await?;

        debug!("Successfully received response from Gemini API");
        let completion: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse JSON response from Gemini API");
            e
        })?;

        let result = parse_completion(completion, self.config.model.as_str())?;
        info!(content_len = result.text.len(), "Gemini completion received");
        Ok(result)
    }

    fn model_name(&self) -> &str {
        self.config.model.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_strings_round_trip_through_known_variants() {
        assert_eq!(Model::from_string("gemini-1.5-flash"), Model::Gemini15Flash);
        assert_eq!(
            Model::from_string("models/gemini-1.5-flash"),
            Model::Gemini15Flash
        );
        assert_eq!(Model::Gemini25Pro.as_str(), "gemini-2.5-pro");
        assert_eq!(Model::default(), Model::Gemini15Flash);
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(GeminiClient::new("").is_err());
    }

    #[test]
    fn request_maps_roles_and_generation_config() {
        let client = GeminiClient::new("test-key").unwrap().max_tokens(256);
        let request = client.build_request(&[
            ChatMessage::user("I have a fever"),
            ChatMessage::assistant("How long?"),
            ChatMessage::user("3 days"),
        ]);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "I have a fever"}]},
                    {"role": "model", "parts": [{"text": "How long?"}]},
                    {"role": "user", "parts": [{"text": "3 days"}]},
                ],
                "generationConfig": {"temperature": 1.0, "maxOutputTokens": 256}
            })
        );
    }

    #[test]
    fn endpoint_uses_model_and_custom_base_url() {
        let client = GeminiClient::new("k")
            .unwrap()
            .model(Model::Gemini20Flash)
            .base_url("http://localhost:1234/v1beta");
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn completion_concatenates_text_parts_and_reads_usage() {
        let completion: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "**Possible Diagnosis**: "}, {"text": "flu"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 8, "totalTokenCount": 48}
        }))
        .unwrap();

        let result = parse_completion(completion, "gemini-1.5-flash").unwrap();
        assert_eq!(result.text, "**Possible Diagnosis**: flu");
        assert_eq!(
            result.usage,
            Some(TokenUsage::new("gemini-1.5-flash", 40, 8))
        );
    }

    #[test]
    fn blocked_completion_without_text_is_an_api_error() {
        let completion: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();

        let err = parse_completion(completion, "gemini-1.5-flash").unwrap_err();
        assert_eq!(
            err,
            DoctorError::ApiError("No text content in response (finish reason: SAFETY)".into())
        );
    }

    #[test]
    fn missing_candidates_is_an_api_error() {
        let completion: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "OTHER"}})).unwrap();
        assert!(parse_completion(completion, "m").is_err());
    }
}

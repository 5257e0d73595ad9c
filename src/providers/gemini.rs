use std::time::Duration;
use serde::{Serialize, Deserialize};
use async_trait::async_trait;
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for the Google Generative Language API
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key, passed as a query parameter
    api_key: String,
    /// Base endpoint URL, e.g. "https://generativelanguage.googleapis.com/v1beta"
    endpoint: String,
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// The model to use, travels in the URL rather than the body
    #[serde(skip)]
    model: String,

    /// The conversation contents
    contents: Vec<GeminiContent>,

    /// System instruction to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,

    /// Generation tuning parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

/// A content block with one or more text parts
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the content (user, model); absent for system instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Text parts of the content
    pub parts: Vec<GeminiPart>,
}

/// A single text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// The text content
    pub text: String,
}

/// Generation tuning parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    /// Number of prompt tokens
    pub prompt_token_count: Option<u32>,
    /// Number of generated tokens
    pub candidates_token_count: Option<u32>,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates, empty when the prompt was blocked
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Token usage information
    pub usage_metadata: Option<GeminiUsage>,
}

/// Individual candidate in a Gemini response
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// The generated content, absent when generation was cut off
    pub content: Option<GeminiContent>,
}

impl GeminiRequest {
    /// Create a new generateContent request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: Vec::new(),
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Add a user text content to the request
    pub fn add_text(mut self, text: impl Into<String>) -> Self {
        self.contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart { text: text.into() }],
        });
        self
    }

    /// Set the system instruction
    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: instruction.into() }],
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GeminiGenerationConfig {
            temperature: Some(temperature),
        });
        self
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Provider for Gemini {
    type Request = GeminiRequest;
    type Response = GeminiResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let api_url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            request.model,
            self.api_key
        );

        let response = self.client.post(&api_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, message);
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthenticationError(message));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json::<GeminiResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    fn extract_text(response: &Self::Response) -> String {
        response.candidates.first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content.parts.iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

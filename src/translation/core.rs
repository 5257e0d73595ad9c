/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct and its implementation,
 * which resolves the configured display model name to a backend family and
 * translates serialized batch payloads through the matching provider client.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use url::Url;

use crate::app_config::{BackendKind, TranslationConfig};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::openai_compat::{OpenAiCompat, ChatRequest};

/// Log entry for capturing translation process logs
#[derive(Clone)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

/// Backend interface the batch pipeline depends on
///
/// Implemented by [`TranslationService`] over the real provider clients and
/// by mock backends in tests, so the chunk loop can be exercised without
/// network access.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate one serialized batch payload into the target language
    ///
    /// An empty or whitespace-only payload resolves to an empty string
    /// without contacting the backend.
    async fn translate_payload(&self, payload: &str, target_language: &str) -> Result<String, ProviderError>;
}

/// Validate an endpoint override before any client is built
fn validate_endpoint(endpoint: &str) -> Result<(), TranslationError> {
    if endpoint.is_empty() {
        return Err(TranslationError::InvalidConfig("Endpoint cannot be empty".to_string()));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| TranslationError::InvalidConfig(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(TranslationError::InvalidConfig(format!(
            "Endpoint '{}' must use http or https", endpoint
        )));
    }

    if url.host_str().is_none() {
        return Err(TranslationError::InvalidConfig(format!(
            "Endpoint '{}' has no host", endpoint
        )));
    }

    Ok(())
}

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// DeepSeek chat completions (OpenAI-compatible)
    DeepSeek {
        /// Client instance
        client: OpenAiCompat,
    },

    /// Google Generative Language API
    Gemini {
        /// Client instance
        client: Gemini,
    },

    /// Zhipu GLM chat completions (OpenAI-compatible)
    Glm {
        /// Client instance
        client: OpenAiCompat,
    },

    /// Moonshot Kimi chat completions (OpenAI-compatible)
    Kimi {
        /// Client instance
        client: OpenAiCompat,
    },
}

/// Main translation service for batch payload translation
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Backend family resolved from the configured display model name
    pub backend: BackendKind,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    ///
    /// Fails fast when the display model name matches no known family or
    /// when the endpoint override does not parse, before any network use.
    pub fn new(config: TranslationConfig) -> Result<Self, TranslationError> {
        let backend = config.backend()
            .ok_or_else(|| TranslationError::UnknownModel(config.model.clone()))?;

        let endpoint = config.get_endpoint();
        validate_endpoint(&endpoint)?;

        let api_key = config.api_key.clone();
        let timeout_secs = config.common.timeout_secs;

        let provider = match backend {
            BackendKind::DeepSeek => TranslationProviderImpl::DeepSeek {
                client: OpenAiCompat::new(api_key, endpoint, timeout_secs),
            },
            BackendKind::Gemini => TranslationProviderImpl::Gemini {
                client: Gemini::new(api_key, endpoint, timeout_secs),
            },
            BackendKind::Glm => TranslationProviderImpl::Glm {
                client: OpenAiCompat::new(api_key, endpoint, timeout_secs),
            },
            BackendKind::Kimi => TranslationProviderImpl::Kimi {
                client: OpenAiCompat::new(api_key, endpoint, timeout_secs),
            },
        };

        Ok(Self {
            provider,
            backend,
            config,
        })
    }

    /// Render the system prompt template for the target language
    pub fn system_prompt(&self, target_language: &str) -> String {
        self.config.common.system_prompt.replace("{target_language}", target_language)
    }

    /// Translate a plain text string, convenience wrapper over the payload path
    pub async fn translate_text(&self, text: &str, target_language: &str) -> Result<String> {
        self.translate_payload(text, target_language).await
            .map_err(|e| anyhow!("Translation failed: {}", e))
    }
}

#[async_trait]
impl TranslationBackend for TranslationService {
    async fn translate_payload(&self, payload: &str, target_language: &str) -> Result<String, ProviderError> {
        // The only path that bypasses the backend
        if payload.trim().is_empty() {
            return Ok(String::new());
        }

        let system_prompt = self.system_prompt(target_language);
        let wire_model = self.backend.wire_model();
        let temperature = self.config.common.temperature;

        match &self.provider {
            TranslationProviderImpl::DeepSeek { client }
            | TranslationProviderImpl::Glm { client }
            | TranslationProviderImpl::Kimi { client } => {
                let request = ChatRequest::new(wire_model)
                    .add_message("system", &system_prompt)
                    .add_message("user", payload)
                    .temperature(temperature);

                let response = client.complete(request).await?;
                Ok(OpenAiCompat::extract_text(&response))
            }

            TranslationProviderImpl::Gemini { client } => {
                let request = GeminiRequest::new(wire_model)
                    .system(&system_prompt)
                    .add_text(payload)
                    .temperature(temperature);

                let response = client.complete(request).await?;
                Ok(Gemini::extract_text(&response))
            }
        }
    }
}

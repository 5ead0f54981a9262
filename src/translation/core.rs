/*!
 * Core translation service implementation.
 *
 * `Translator` is the seam the catalog rewriter depends on. `TranslationService`
 * implements it on top of the configured provider: it builds the prompt for the
 * target language, sends one request per text and normalises the reply so it
 * always fits on a single `msgstr` line.
 */

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use std::time::Duration;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::{Provider, RetryPolicy};

const ANTHROPIC_MAX_TOKENS: u32 = 1024;

/// Text-to-text translation
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language`, returning plain unescaped text
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError>;
}

/// Normalise an endpoint into a base URL, defaulting the scheme to http
pub fn parse_endpoint(endpoint: &str) -> Result<String> {
    if endpoint.trim().is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Collapse a model reply onto one trimmed line
pub fn normalize_translation(reply: &str) -> String {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Translation service backed by the configured provider
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let retry = RetryPolicy::new(config.common.retry_count, config.common.retry_backoff_ms);
        let timeout = Duration::from_secs(config.get_timeout_secs());

        let provider = match config.provider {
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(parse_endpoint(&config.get_endpoint())?, timeout, retry),
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), config.get_endpoint(), timeout, retry),
            },
        };

        Ok(Self { provider, config })
    }

    /// System prompt for one target language
    pub fn system_prompt(&self, target_language: &str) -> String {
        self.config
            .common
            .system_prompt
            .replace("{target_language}", &language_utils::display_name(target_language))
            .replace("{target_code}", target_language)
    }

    async fn request(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let system = self.system_prompt(target_language);
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;

        match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(model, text)
                    .system(system)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, ANTHROPIC_MAX_TOKENS)
                    .system(system)
                    .temperature(temperature)
                    .add_message("user", text);
                let response = client.complete(request).await?;
                Ok(Anthropic::extract_text(&response))
            }
        }
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let reply = self.request(text, target_language).await?;
        let translated = normalize_translation(&reply);
        if translated.is_empty() {
            return Err(ProviderError::ParseError(format!("Empty translation for {:?}", text)).into());
        }

        debug!("[{}] {:?} -> {:?}", target_language, text, translated);
        Ok(translated)
    }
}

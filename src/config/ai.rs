//! Text-generation provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Text-generation provider configuration
#[derive(Debug, Deserialize)]
pub struct AiConfig {
    /// Which backend serves completions
    #[serde(default)]
    pub provider: AiProvider,

    /// API key for OpenAI or the Azure OpenAI resource
    pub api_key: Option<Secret<String>>,

    /// Model name (ignored by Azure, which routes by deployment)
    #[serde(default = "default_model")]
    pub model: String,

    /// Override for the OpenAI-compatible base URL
    pub base_url: Option<String>,

    /// Azure resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub azure_endpoint: Option<String>,

    /// Azure deployment name
    pub azure_deployment: Option<String>,

    /// Azure API version override
    pub azure_api_version: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Total calls per generation when the backend is rate limited or overloaded
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,

    /// Base delay between retries; the n-th retry waits n times this
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

/// Text-generation backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    Azure,
    /// No backend; every reply and plan uses canned fallback content
    #[default]
    Disabled,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Check if an API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=10).contains(&self.max_attempts) {
            return Err(ValidationError::TooManyAttempts);
        }

        match self.provider {
            AiProvider::Disabled => {}
            AiProvider::OpenAI => {
                if !self.has_api_key() {
                    return Err(ValidationError::MissingRequired("AI__API_KEY"));
                }
                if let Some(url) = &self.base_url {
                    if !is_http_url(url) {
                        return Err(ValidationError::InvalidUrl("AI__BASE_URL"));
                    }
                }
            }
            AiProvider::Azure => {
                if !self.has_api_key() {
                    return Err(ValidationError::MissingRequired("AI__API_KEY"));
                }
                match &self.azure_endpoint {
                    None => return Err(ValidationError::MissingRequired("AI__AZURE_ENDPOINT")),
                    Some(url) if !is_http_url(url) => {
                        return Err(ValidationError::InvalidUrl("AI__AZURE_ENDPOINT"));
                    }
                    Some(_) => {}
                }
                if self.azure_deployment.as_deref().map_or(true, str::is_empty) {
                    return Err(ValidationError::MissingRequired("AI__AZURE_DEPLOYMENT"));
                }
            }
        }

        Ok(())
    }
}

pub(super) fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            api_key: None,
            model: default_model(),
            base_url: None,
            azure_endpoint: None,
            azure_deployment: None,
            azure_api_version: None,
            timeout_secs: default_timeout(),
            max_attempts: default_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    2000
}

//! Session store configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Where planning sessions are kept
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,

    /// Redis connection URL, required for the redis backend
    pub redis_url: Option<String>,

    /// Expiry for stored sessions in seconds; unset keeps them forever
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process-local map; sessions are lost on restart
    #[default]
    Memory,
    Redis,
}

impl SessionConfig {
    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == SessionBackend::Redis {
            let url = self
                .redis_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .ok_or(ValidationError::MissingRequired("SESSION__REDIS_URL"))?;
            if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                return Err(ValidationError::InvalidRedisUrl);
            }
        }
        if self.ttl_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            redis_url: None,
            ttl_secs: None,
        }
    }
}

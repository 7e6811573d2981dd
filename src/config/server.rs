//! HTTP listener settings

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Where and how the API listens.
///
/// Every field has a default so an empty environment yields a runnable
/// development server on `0.0.0.0:8080`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Comma-separated origin list; `*` admits every origin
    pub cors_origins: Option<String>,
}

/// Deployment stage, used to pick log format and CORS strictness
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::default(),
            log_level: "info,trip_planner=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let candidate = format!("{}:{}", self.host, self.port);
        candidate
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress(candidate))
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn origin_entries(&self) -> impl Iterator<Item = &str> {
        self.cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
    }

    /// Explicitly listed origins, without the `*` wildcard
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.origin_entries()
            .filter(|entry| *entry != "*")
            .map(str::to_owned)
            .collect()
    }

    /// True when the list contains `*`, or when nothing is listed outside
    /// production.
    pub fn allows_any_origin(&self) -> bool {
        let mut entries = self.origin_entries().peekable();
        if entries.peek().is_none() {
            return !self.is_production();
        }
        entries.any(|entry| entry == "*")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod defaults {
        use super::*;

        #[test]
        fn listens_on_all_interfaces() {
            let config = ServerConfig::default();
            assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
            assert_eq!(config.environment, Environment::Development);
            assert_eq!(config.request_timeout(), Duration::from_secs(30));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn development_allows_any_origin() {
            assert!(ServerConfig::default().allows_any_origin());
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn unparseable_host_is_reported_with_address() {
            let config = ServerConfig {
                host: "not a host".to_string(),
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ValidationError::InvalidBindAddress("not a host:8080".to_string()))
            );
        }

        #[test]
        fn port_zero_is_rejected() {
            let config = ServerConfig {
                port: 0,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
        }

        #[test]
        fn timeout_must_be_within_bounds() {
            for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
                let config = ServerConfig {
                    request_timeout_secs: secs,
                    ..Default::default()
                };
                assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
            }
        }
    }

    mod cors {
        use super::*;

        #[test]
        fn listed_origins_are_trimmed() {
            let config = ServerConfig {
                cors_origins: Some(" http://localhost:5173 ,, http://localhost:3000".to_string()),
                ..Default::default()
            };
            assert_eq!(
                config.cors_origins_list(),
                vec!["http://localhost:5173", "http://localhost:3000"]
            );
            assert!(!config.allows_any_origin());
        }

        #[test]
        fn production_needs_explicit_origins() {
            let mut config = ServerConfig {
                environment: Environment::Production,
                ..Default::default()
            };
            assert!(!config.allows_any_origin());

            config.cors_origins = Some("*".to_string());
            assert!(config.allows_any_origin());
            assert!(config.cors_origins_list().is_empty());
        }
    }
}

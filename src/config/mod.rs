//! Application configuration module
//!
//! Configuration is read from environment variables with the `TRIP_PLANNER`
//! prefix, using `__` between nested keys. A `.env` file is honoured in
//! development.
//!
//! # Example
//!
//! ```no_run
//! use trip_planner::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod server;
mod session;
mod travel;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use session::{SessionBackend, SessionConfig};
pub use travel::TravelConfig;

use serde::Deserialize;

const ENV_PREFIX: &str = "TRIP_PLANNER";

/// Everything the service reads at startup.
///
/// An empty environment is valid: it starts a development server with
/// canned replies, the embedded travel dataset and in-memory sessions.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub travel: TravelConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Reads `TRIP_PLANNER__<SECTION>__<KEY>` variables, e.g.
    /// `TRIP_PLANNER__AI__PROVIDER=azure` sets `ai.provider`.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(ConfigError::DotEnv(err));
            }
        }

        let loaded = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(loaded)
    }

    /// Stops at the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.travel.validate()?;
        self.session.validate()?;
        Ok(())
    }
}

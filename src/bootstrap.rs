//! Startup wiring - turns an [`AppConfig`] into a running router.
//!
//! Providers without credentials degrade instead of failing startup: no AI
//! backend means canned replies and safe-fallback plans, and no travel
//! credentials means every search is served from the embedded dataset.

use std::sync::Arc;

use axum::Router;
use http::{header, HeaderValue, Method};
use secrecy::ExposeSecret;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::adapters::ai::{DisabledAIProvider, OpenAIConfig, OpenAIProvider, RetryingProvider};
use crate::adapters::http::{api_router, TripHandlers};
use crate::adapters::storage::{InMemorySessionStore, RedisSessionStore};
use crate::adapters::travel::{
    AmadeusConfig, AmadeusProvider, FallbackTravelProvider, GooglePlacesConfig,
    GooglePlacesProvider, OfflineTravelProvider, RoutedTravelProvider,
};
use crate::config::{
    AiConfig, AiProvider, AppConfig, ConfigError, ServerConfig, SessionBackend, SessionConfig,
    TravelConfig, ValidationError,
};
use crate::ports::{AIError, AIProvider, ProviderError, SessionStore, SessionStoreError, TravelProvider};

/// Errors that stop the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("AI provider setup failed: {0}")]
    Ai(#[from] AIError),

    #[error("travel provider setup failed: {0}")]
    Travel(#[from] ProviderError),

    #[error("session store setup failed: {0}")]
    Store(#[from] SessionStoreError),

    #[error("invalid CORS origin: {0}")]
    CorsOrigin(String),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `server.log_level`. Production logs are JSON lines;
/// development logs are pretty-printed.
pub fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if server.is_production() {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.pretty().try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Text-generation backend per `ai.provider`, wrapped in the retry policy.
pub fn build_ai_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>, BootstrapError> {
    let api_key = || {
        config
            .api_key
            .as_ref()
            .map(|k| k.expose_secret().clone())
            .ok_or(ValidationError::MissingRequired("AI__API_KEY"))
    };

    let openai_config = match config.provider {
        AiProvider::Disabled => {
            tracing::warn!("no AI provider configured, replies and plans use fallback content");
            return Ok(Arc::new(DisabledAIProvider));
        }
        AiProvider::OpenAI => {
            let mut openai = OpenAIConfig::new(api_key()?).with_model(&config.model);
            if let Some(url) = &config.base_url {
                openai = openai.with_base_url(url);
            }
            openai
        }
        AiProvider::Azure => {
            let endpoint = config
                .azure_endpoint
                .as_deref()
                .ok_or(ValidationError::MissingRequired("AI__AZURE_ENDPOINT"))?;
            let deployment = config
                .azure_deployment
                .as_deref()
                .ok_or(ValidationError::MissingRequired("AI__AZURE_DEPLOYMENT"))?;
            let mut azure = OpenAIConfig::azure(api_key()?, endpoint, deployment);
            if let Some(version) = &config.azure_api_version {
                azure = azure.with_api_version(version);
            }
            azure
        }
    };

    let provider = OpenAIProvider::new(openai_config.with_timeout(config.timeout()))?;
    tracing::info!(
        provider = ?config.provider,
        max_attempts = config.max_attempts,
        "AI provider ready"
    );
    Ok(Arc::new(
        RetryingProvider::new(Arc::new(provider))
            .with_max_attempts(config.max_attempts)
            .with_base_delay(config.retry_base_delay()),
    ))
}

/// Live travel search: flights and hotels from Amadeus, activities from
/// Google Places (or Amadeus when Places is not configured).
pub fn build_travel_provider(
    config: &TravelConfig,
) -> Result<Arc<dyn TravelProvider>, BootstrapError> {
    let amadeus: Option<Arc<dyn TravelProvider>> =
        match (&config.amadeus_api_key, &config.amadeus_api_secret) {
            (Some(key), Some(secret)) if config.has_amadeus() => {
                let amadeus_config =
                    AmadeusConfig::new(key.expose_secret().clone(), secret.expose_secret().clone())
                        .with_base_url(&config.amadeus_base_url)
                        .with_timeout(config.timeout());
                Some(Arc::new(AmadeusProvider::new(amadeus_config)?))
            }
            _ => None,
        };

    let places: Option<Arc<dyn TravelProvider>> = match &config.google_places_api_key {
        Some(key) if config.has_google_places() => {
            let places_config = GooglePlacesConfig::new(key.expose_secret().clone())
                .with_timeout(config.timeout());
            Some(Arc::new(GooglePlacesProvider::new(places_config)?))
        }
        _ => None,
    };

    let inventory = amadeus
        .clone()
        .unwrap_or_else(|| Arc::new(OfflineTravelProvider));
    let activities = places
        .or(amadeus)
        .unwrap_or_else(|| Arc::new(OfflineTravelProvider));

    tracing::info!(
        inventory = inventory.name(),
        activities = activities.name(),
        "travel providers ready"
    );
    Ok(Arc::new(RoutedTravelProvider::new(inventory, activities)))
}

/// Session store per `session.backend`.
pub async fn build_session_store(
    config: &SessionConfig,
) -> Result<Arc<dyn SessionStore>, BootstrapError> {
    match config.backend {
        SessionBackend::Memory => {
            tracing::info!("using in-memory session store");
            Ok(Arc::new(InMemorySessionStore::new()))
        }
        SessionBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("SESSION__REDIS_URL"))?;
            let store = RedisSessionStore::connect(url)
                .await?
                .with_ttl(config.ttl_secs);
            tracing::info!(ttl_secs = ?config.ttl_secs, "using redis session store");
            Ok(Arc::new(store))
        }
    }
}

/// CORS policy from `server.cors_origins`.
pub fn cors_layer(server: &ServerConfig) -> Result<CorsLayer, BootstrapError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if server.allows_any_origin() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = server
        .cors_origins_list()
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(&origin).map_err(|_| BootstrapError::CorsOrigin(origin))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(origins))
}

/// Validates the configuration and assembles the router with its layers.
pub async fn build_app(config: &AppConfig) -> Result<Router, BootstrapError> {
    config.validate()?;

    let handlers = TripHandlers::new(
        build_session_store(&config.session).await?,
        build_ai_provider(&config.ai)?,
        build_travel_provider(&config.travel)?,
        Arc::new(FallbackTravelProvider),
    );

    Ok(api_router(handlers).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server)?)
            .layer(TimeoutLayer::new(config.server.request_timeout())),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use secrecy::Secret;

    fn secret(value: &str) -> Option<Secret<String>> {
        Some(Secret::new(value.to_string()))
    }

    mod ai {
        use super::*;

        #[test]
        fn disabled_by_default() {
            let provider = build_ai_provider(&AiConfig::default()).unwrap();
            assert_eq!(provider.provider_info().name, "disabled");
        }

        #[test]
        fn openai_is_wrapped_with_retries() {
            let config = AiConfig {
                provider: AiProvider::OpenAI,
                api_key: secret("sk-test"),
                ..Default::default()
            };
            let provider = build_ai_provider(&config).unwrap();
            assert_eq!(provider.provider_info().name, "openai");
        }

        #[test]
        fn azure_without_deployment_fails() {
            let config = AiConfig {
                provider: AiProvider::Azure,
                api_key: secret("key"),
                azure_endpoint: Some("https://example.openai.azure.com".into()),
                ..Default::default()
            };
            assert!(matches!(
                build_ai_provider(&config),
                Err(BootstrapError::Invalid(ValidationError::MissingRequired(_)))
            ));
        }
    }

    mod travel {
        use super::*;

        #[test]
        fn without_credentials_everything_is_offline() {
            let provider = build_travel_provider(&TravelConfig::default()).unwrap();
            assert_eq!(provider.name(), "routed");
        }

        #[tokio::test]
        async fn offline_searches_report_not_configured() {
            let provider = build_travel_provider(&TravelConfig::default()).unwrap();
            let err = provider.search_activities("GOI").await.unwrap_err();
            assert!(matches!(err, ProviderError::NotConfigured(_)));
        }

        #[test]
        fn amadeus_and_places_build() {
            let config = TravelConfig {
                amadeus_api_key: secret("key"),
                amadeus_api_secret: secret("secret"),
                google_places_api_key: secret("places"),
                ..Default::default()
            };
            assert!(build_travel_provider(&config).is_ok());
        }
    }

    mod cors {
        use super::*;

        #[test]
        fn production_requires_listed_origins() {
            let server = ServerConfig {
                environment: Environment::Production,
                cors_origins: Some("https://trips.example.com".into()),
                ..Default::default()
            };
            assert!(cors_layer(&server).is_ok());
        }

        #[test]
        fn bad_origin_is_reported() {
            let server = ServerConfig {
                cors_origins: Some("https://ok.example.com, bad\norigin".into()),
                ..Default::default()
            };
            assert!(matches!(
                cors_layer(&server),
                Err(BootstrapError::CorsOrigin(_))
            ));
        }
    }

    #[tokio::test]
    async fn default_config_builds_router() {
        let config = AppConfig::default();
        assert!(build_app(&config).await.is_ok());
    }
}

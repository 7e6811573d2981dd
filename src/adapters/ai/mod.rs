//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI and Azure OpenAI chat completions
//! - `RetryingProvider` - Wrapper applying the linear retry policy to load errors
//! - `DisabledAIProvider` - Always fails; used when no backend is configured
//! - `MockAIProvider` - Configurable mock for testing

mod disabled_provider;
mod mock_provider;
mod openai_provider;
mod retrying_provider;

pub use disabled_provider::DisabledAIProvider;
pub use mock_provider::{MockAIProvider, MockError};
pub use openai_provider::{OpenAIConfig, OpenAIEndpoint, OpenAIProvider};
pub use retrying_provider::{RetryingProvider, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};

//! Session store adapters.
//!
//! - `InMemorySessionStore` - process-local map
//! - `RedisSessionStore` - shared Redis backing with atomic revision checks

mod in_memory;
mod redis;

pub use self::redis::RedisSessionStore;
pub use in_memory::InMemorySessionStore;

//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers mutate a session through the store's revision check;
//! the snapshot query only reads.

pub mod handlers;

pub use handlers::*;

//! Trip Planner - Conversational travel planning service
//!
//! A guided dialogue collects where, when and how much; live providers (or an
//! embedded dataset) supply flight, hotel and activity options; a synthesis
//! step reconciles the selections into a day-by-day itinerary with a budget
//! summary.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;

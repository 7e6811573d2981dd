//! Domain layer - pure trip planning logic with no I/O.

pub mod conversation;
pub mod foundation;
pub mod planning;
pub mod trip;

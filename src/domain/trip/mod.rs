//! Trip domain - what a planning session knows about the trip.

mod city;
mod collected_info;
mod context;
mod options;
mod persona;
mod session;
mod stage;

pub use city::{City, CITIES};
pub use collected_info::CollectedInfo;
pub use context::{TripContext, DEFAULT_TRIP_DAYS, MAX_ITINERARY_DAYS};
pub use options::{format_rupees, OptionRecord, OptionsCategory};
pub use persona::Persona;
pub use session::{ChatTurn, TripSession, TurnRole, MAX_HISTORY_TURNS};
pub use stage::Stage;

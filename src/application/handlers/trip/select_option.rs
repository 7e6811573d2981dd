//! SelectOptionHandler - Record a flight, hotel or activity choice.

use std::sync::Arc;

use crate::domain::conversation::{select_activity, select_flight, select_hotel};
use crate::domain::foundation::SessionId;
use crate::domain::trip::OptionRecord;
use crate::ports::SessionStore;

use super::outcome::{save_or_discard, TripHandlerError, TurnOutcome};

/// The option the user picked.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Flight(OptionRecord),
    Hotel(OptionRecord),
    Activity(OptionRecord),
}

#[derive(Debug, Clone)]
pub struct SelectOptionCommand {
    pub session_id: SessionId,
    pub selection: Selection,
}

pub struct SelectOptionHandler {
    store: Arc<dyn SessionStore>,
}

impl SelectOptionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, cmd), fields(session_id = %cmd.session_id))]
    pub async fn handle(&self, cmd: SelectOptionCommand) -> Result<TurnOutcome, TripHandlerError> {
        let mut session = self.store.load_or_create(&cmd.session_id).await?;
        let stage = session.stage();

        let outcome = match cmd.selection {
            Selection::Flight(flight) => select_flight(stage, session.info(), flight),
            Selection::Hotel(hotel) => select_hotel(stage, session.info(), hotel),
            Selection::Activity(activity) => select_activity(stage, session.info(), activity),
        };

        session.apply(outcome.info, outcome.transition.stage);
        save_or_discard(self.store.as_ref(), &mut session).await?;

        tracing::info!(stage = %session.stage(), complete = session.is_complete(), "option selected");
        Ok(TurnOutcome::from_session(
            &session,
            outcome.message,
            outcome.transition.signal,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::trip::{OptionsCategory, Stage};
    use serde_json::json;

    fn record(value: serde_json::Value) -> OptionRecord {
        OptionRecord::new(value).unwrap()
    }

    fn cmd(selection: Selection) -> SelectOptionCommand {
        SelectOptionCommand {
            session_id: "pick".parse().unwrap(),
            selection,
        }
    }

    #[tokio::test]
    async fn flight_then_hotel_then_activity() {
        let handler = SelectOptionHandler::new(Arc::new(InMemorySessionStore::new()));

        let flight = handler
            .handle(cmd(Selection::Flight(record(json!({"airline": "IndiGo", "price": 4599})))))
            .await
            .unwrap();
        assert_eq!(flight.current_stage, Stage::Hotels);
        assert_eq!(flight.signal, Some(OptionsCategory::Hotels));
        assert!(flight.message.contains("IndiGo at ₹4,599"));

        let hotel = handler
            .handle(cmd(Selection::Hotel(record(json!({"name": "Sea View", "price_per_night": 3000})))))
            .await
            .unwrap();
        assert_eq!(hotel.current_stage, Stage::Activities);
        assert_eq!(hotel.signal, Some(OptionsCategory::Activities));
        assert!(!hotel.is_complete);

        let activity = handler
            .handle(cmd(Selection::Activity(record(json!({"name": "Baga Beach", "price": 0})))))
            .await
            .unwrap();
        assert_eq!(activity.current_stage, Stage::Activities);
        assert!(activity.signal.is_none());
        assert!(activity.is_complete);
    }

    #[tokio::test]
    async fn duplicate_activity_is_suppressed() {
        let handler = SelectOptionHandler::new(Arc::new(InMemorySessionStore::new()));
        let beach = record(json!({"name": "Baga Beach", "price": 0}));

        handler.handle(cmd(Selection::Activity(beach.clone()))).await.unwrap();
        let outcome = handler.handle(cmd(Selection::Activity(beach))).await.unwrap();

        assert_eq!(outcome.collected_info.selected_activities.len(), 1);
    }
}

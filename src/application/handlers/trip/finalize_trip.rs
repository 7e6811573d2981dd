//! FinalizeTripHandler - Close the dialogue and produce the final plan.
//!
//! The stage moves to `complete` unconditionally. Synthesis runs over the
//! user's selections and the specialist panel prices the result; an
//! incomplete session skips generation and gets the safe fallback costed
//! from its selections.

use std::sync::Arc;

use crate::domain::conversation::{finalize, replies};
use crate::domain::foundation::SessionId;
use crate::domain::planning::{
    assemble, assemble_with_costs, safe_fallback, AvailableOptions, PlanningResult,
};
use crate::domain::trip::{CollectedInfo, Stage};
use crate::ports::{AIProvider, SessionStore};

use super::outcome::{save_or_discard, TripHandlerError, TurnOutcome};
use super::specialists::SpecialistPanel;
use super::synthesizer::RecommendationSynthesizer;

#[derive(Debug, Clone)]
pub struct FinalizeTripCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct FinalizeTripResult {
    pub turn: TurnOutcome,
    pub plan: PlanningResult,
}

impl FinalizeTripResult {
    /// Closing turn over `info` with the safe fallback plan, for when the
    /// session itself could not be finalized.
    pub fn fallback(session_id: SessionId, info: CollectedInfo) -> Self {
        let options = AvailableOptions::from_selections(&info);
        let plan = assemble(&info.trip_context(), safe_fallback(&options));
        let turn = TurnOutcome {
            session_id,
            message: replies::FINALIZING.to_string(),
            collected_info: info,
            current_stage: Stage::Complete,
            is_complete: false,
            signal: None,
            revision: 0,
        };
        Self { turn, plan }
    }
}

pub struct FinalizeTripHandler {
    store: Arc<dyn SessionStore>,
    synthesizer: RecommendationSynthesizer,
    specialists: SpecialistPanel,
}

impl FinalizeTripHandler {
    pub fn new(store: Arc<dyn SessionStore>, ai_provider: Arc<dyn AIProvider>) -> Self {
        Self {
            store,
            synthesizer: RecommendationSynthesizer::new(ai_provider.clone()),
            specialists: SpecialistPanel::new(ai_provider),
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(session_id = %cmd.session_id))]
    pub async fn handle(&self, cmd: FinalizeTripCommand) -> Result<FinalizeTripResult, TripHandlerError> {
        let mut session = self.store.load_or_create(&cmd.session_id).await?;
        let outcome = finalize(session.stage(), session.info());
        session.apply(outcome.info, outcome.transition.stage);
        save_or_discard(self.store.as_ref(), &mut session).await?;
        let turn = TurnOutcome::from_session(&session, outcome.message, None);

        let ctx = session.info().trip_context();
        let options = AvailableOptions::from_selections(session.info());
        let plan = if session.is_complete() {
            let synthesis = self.synthesizer.synthesize(session.id(), &ctx, &options).await;
            let costs = self
                .specialists
                .price(session.id(), &ctx, &synthesis.final_decision)
                .await;
            assemble_with_costs(&ctx, synthesis, costs)
        } else {
            tracing::warn!("finalizing without complete selections, using safe fallback");
            assemble(&ctx, safe_fallback(&options))
        };
        tracing::info!(
            total_spent = plan.budget_summary.total_spent,
            over_budget = plan.budget_summary.is_over_budget(),
            "trip finalized"
        );
        Ok(FinalizeTripResult { turn, plan })
    }
}

use serde::Serialize;
use std::sync::Arc;

use crate::core::error::InteractionError;
use crate::core::introductions::IntroductionTracker;
use crate::core::store::SharedStore;
use crate::models::{
    InterestDecision, Introduction, IntroductionDecision, IntroductionOutcome, ListId,
};
use crate::services::MatchGateway;

/// A user-initiated action on a candidate or an introduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Interest(InterestDecision),
    RequestIntroduction {
        startup_id: String,
        message: Option<String>,
    },
    Respond {
        introduction_id: String,
        decision: IntroductionDecision,
    },
    RecordOutcome {
        introduction_id: String,
        outcome: IntroductionOutcome,
        notes: Option<String>,
    },
}

/// Result of a dispatched action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The decision was confirmed; the candidate left these lists
    Applied { target_id: String, lists: Vec<ListId> },
    /// The candidate was no longer displayed, so nothing was sent
    Suppressed { target_id: String },
    /// An introduction was created or moved by the server
    Introduction(Introduction),
}

/// Turns user decisions into remote calls plus local state changes
///
/// Pass and watch remove the candidate from every list before the call
/// goes out and put it back exactly if the call fails. Introduction
/// actions are routed to the tracker, which waits for confirmation.
pub struct InteractionDispatcher {
    gateway: Arc<dyn MatchGateway>,
    store: SharedStore,
    introductions: Arc<IntroductionTracker>,
}

impl InteractionDispatcher {
    pub fn new(
        gateway: Arc<dyn MatchGateway>,
        store: SharedStore,
        introductions: Arc<IntroductionTracker>,
    ) -> Self {
        Self {
            gateway,
            store,
            introductions,
        }
    }

    pub async fn dispatch(&self, action: UserAction) -> Result<DispatchOutcome, InteractionError> {
        match action {
            UserAction::Interest(decision) => self.decide(decision).await,
            UserAction::RequestIntroduction {
                startup_id,
                message,
            } => self
                .introductions
                .create(&startup_id, message)
                .await
                .map(DispatchOutcome::Introduction),
            UserAction::Respond {
                introduction_id,
                decision,
            } => self
                .introductions
                .respond(&introduction_id, decision)
                .await
                .map(DispatchOutcome::Introduction),
            UserAction::RecordOutcome {
                introduction_id,
                outcome,
                notes,
            } => self
                .introductions
                .record_outcome(&introduction_id, outcome, notes)
                .await
                .map(DispatchOutcome::Introduction),
        }
    }

    /// Pass / watch with optimistic removal and exact rollback
    pub async fn decide(
        &self,
        decision: InterestDecision,
    ) -> Result<DispatchOutcome, InteractionError> {
        let target_id = decision.target_id.trim().to_string();
        if target_id.is_empty() {
            return Err(InteractionError::Validation("target id is required".to_string()));
        }
        let action = decision.kind.to_action().ok_or_else(|| {
            InteractionError::Validation("watch requires an intent".to_string())
        })?;

        // Capture and remove under one lock so a second dispatch for the
        // same id sees it gone and never reaches the network.
        let snapshot = {
            let mut store = self.store.lock().await;
            if !store.contains_anywhere(&target_id) {
                tracing::debug!("Suppressed duplicate decision on {}", target_id);
                return Ok(DispatchOutcome::Suppressed { target_id });
            }
            store.remove_from_all(&target_id)
        };
        let lists = snapshot.lists();

        match self.gateway.record_interest(&target_id, &action).await {
            Ok(_) => {
                tracing::info!("Recorded {:?} on {}", action, target_id);
                Ok(DispatchOutcome::Applied { target_id, lists })
            }
            Err(e) => {
                let err = InteractionError::from(e);
                let restored = self.store.lock().await.restore(snapshot);
                tracing::warn!(
                    "Decision {:?} on {} failed, rolled back {} list(s): {}",
                    action,
                    target_id,
                    restored,
                    err
                );
                Err(err)
            }
        }
    }
}

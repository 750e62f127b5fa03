use std::sync::Arc;

use crate::core::error::InteractionError;
use crate::core::sequence::{FetchOutcome, RequestSequence};
use crate::core::store::SharedStore;
use crate::models::ListId;
use crate::services::MatchGateway;

/// Read path for the curated list
pub struct CuratedFeed {
    gateway: Arc<dyn MatchGateway>,
    store: SharedStore,
    sequence: RequestSequence,
}

impl CuratedFeed {
    pub fn new(gateway: Arc<dyn MatchGateway>, store: SharedStore) -> Self {
        Self {
            gateway,
            store,
            sequence: RequestSequence::new(),
        }
    }

    /// Fetches curated matches; a failure leaves the current list in place
    pub async fn refresh(&self) -> Result<FetchOutcome, InteractionError> {
        let seq = self.sequence.issue();
        let result = self.gateway.curated_matches().await;

        let mut store = self.store.lock().await;
        if !self.sequence.is_current(seq) {
            tracing::warn!("Discarding stale curated response {}", seq);
            return Ok(FetchOutcome::Superseded { seq });
        }

        match result {
            Ok(records) => {
                let count = store.load(ListId::Curated, records);
                Ok(FetchOutcome::Applied { seq, count })
            }
            Err(e) => {
                let err = InteractionError::from(e);
                tracing::error!("Failed to load curated matches: {}", err);
                store.record_failure(ListId::Curated, err.clone());
                Err(err)
            }
        }
    }
}

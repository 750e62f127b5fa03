use std::sync::Arc;
use tokio::sync::Mutex;
use validator::Validate;

use crate::core::error::InteractionError;
use crate::core::sequence::{FetchOutcome, RequestSequence};
use crate::core::store::SharedStore;
use crate::models::{ListId, SearchFilters, SearchPreset};
use crate::services::MatchGateway;

/// Discovery search feeding the `search` list
///
/// Every request is tagged; a response whose tag is no longer the latest
/// is dropped on arrival, whether it succeeded or failed.
pub struct DiscoverySearch {
    gateway: Arc<dyn MatchGateway>,
    store: SharedStore,
    sequence: RequestSequence,
    last_filters: Mutex<Option<SearchFilters>>,
}

impl DiscoverySearch {
    pub fn new(gateway: Arc<dyn MatchGateway>, store: SharedStore) -> Self {
        Self {
            gateway,
            store,
            sequence: RequestSequence::new(),
            last_filters: Mutex::new(None),
        }
    }

    pub async fn search(&self, filters: SearchFilters) -> Result<FetchOutcome, InteractionError> {
        let filters = filters.normalized();
        filters.validate()?;

        let seq = self.sequence.issue();
        *self.last_filters.lock().await = Some(filters.clone());
        tracing::debug!("Issuing search {} with {:?}", seq, filters);

        let result = self.gateway.search(&filters).await;

        let mut store = self.store.lock().await;
        if !self.sequence.is_current(seq) {
            tracing::warn!(
                "Discarding stale search response {} (latest is {})",
                seq,
                self.sequence.latest()
            );
            return Ok(FetchOutcome::Superseded { seq });
        }

        match result {
            Ok(records) => {
                let count = store.load(ListId::Search, records);
                tracing::info!("Search {} populated {} results", seq, count);
                Ok(FetchOutcome::Applied { seq, count })
            }
            Err(e) => {
                let err = InteractionError::from(e);
                tracing::error!("Search {} failed: {}", seq, err);
                store.record_failure(ListId::Search, err.clone());
                Err(err)
            }
        }
    }

    /// Presets are plain filter values sent down the same path
    pub async fn apply_preset(&self, preset: SearchPreset) -> Result<FetchOutcome, InteractionError> {
        self.search(preset.filters()).await
    }

    /// Re-issues the most recent search
    pub async fn retry(&self) -> Result<FetchOutcome, InteractionError> {
        let filters = self
            .last_filters
            .lock()
            .await
            .clone()
            .ok_or_else(|| InteractionError::Validation("no search to retry".to_string()))?;
        self.search(filters).await
    }

    pub async fn last_filters(&self) -> Option<SearchFilters> {
        self.last_filters.lock().await.clone()
    }

    pub fn latest_sequence(&self) -> u64 {
        self.sequence.latest()
    }
}

use serde::Serialize;
use std::sync::Arc;

use crate::core::dispatcher::{DispatchOutcome, InteractionDispatcher, UserAction};
use crate::core::error::InteractionError;
use crate::core::feed::CuratedFeed;
use crate::core::introductions::IntroductionTracker;
use crate::core::search::DiscoverySearch;
use crate::core::sequence::FetchOutcome;
use crate::core::store::SharedStore;
use crate::models::{
    CandidateMatch, InterestDecision, ListId, Role, SearchFilters, SearchPreset, StartupDetail,
    WatchlistEntry,
};
use crate::services::MatchGateway;

/// Read paths that expose an explicit retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadPath {
    Curated,
    Search,
    Introductions,
}

impl From<ListId> for ReadPath {
    fn from(value: ListId) -> Self {
        match value {
            ListId::Curated => ReadPath::Curated,
            ListId::Search => ReadPath::Search,
        }
    }
}

/// One session's worth of matching state, wired around a single store
#[derive(Clone)]
pub struct MatchController {
    gateway: Arc<dyn MatchGateway>,
    store: SharedStore,
    feed: Arc<CuratedFeed>,
    search: Arc<DiscoverySearch>,
    introductions: Arc<IntroductionTracker>,
    dispatcher: Arc<InteractionDispatcher>,
}

impl MatchController {
    pub fn new(gateway: Arc<dyn MatchGateway>, role: Role) -> Self {
        let store = SharedStore::new();
        let introductions = Arc::new(IntroductionTracker::new(gateway.clone(), role));

        Self {
            feed: Arc::new(CuratedFeed::new(gateway.clone(), store.clone())),
            search: Arc::new(DiscoverySearch::new(gateway.clone(), store.clone())),
            dispatcher: Arc::new(InteractionDispatcher::new(
                gateway.clone(),
                store.clone(),
                introductions.clone(),
            )),
            introductions,
            store,
            gateway,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn introductions(&self) -> &IntroductionTracker {
        &self.introductions
    }

    pub fn search_engine(&self) -> &DiscoverySearch {
        &self.search
    }

    pub async fn list(&self, list: ListId) -> Vec<CandidateMatch> {
        self.store.snapshot(list).await
    }

    pub async fn refresh_curated(&self) -> Result<FetchOutcome, InteractionError> {
        self.feed.refresh().await
    }

    pub async fn search(&self, filters: SearchFilters) -> Result<FetchOutcome, InteractionError> {
        self.search.search(filters).await
    }

    pub async fn apply_preset(&self, preset: SearchPreset) -> Result<FetchOutcome, InteractionError> {
        self.search.apply_preset(preset).await
    }

    pub async fn refresh_introductions(&self) -> Result<usize, InteractionError> {
        self.introductions.refresh().await
    }

    pub async fn dispatch(&self, action: UserAction) -> Result<DispatchOutcome, InteractionError> {
        self.dispatcher.dispatch(action).await
    }

    pub async fn decide(&self, decision: InterestDecision) -> Result<DispatchOutcome, InteractionError> {
        self.dispatcher.decide(decision).await
    }

    /// Decision from a caller that has not loaded any list yet
    ///
    /// Loads the curated list first when it was never loaded. An id that is
    /// displayed nowhere afterwards is `NotFound`, never `Suppressed`.
    pub async fn decide_on_curated(
        &self,
        decision: InterestDecision,
    ) -> Result<DispatchOutcome, InteractionError> {
        let loaded = self.store.lock().await.is_loaded(ListId::Curated);
        if !loaded {
            self.feed.refresh().await?;
        }

        let target_id = decision.target_id.trim();
        let displayed = self.store.lock().await.contains_anywhere(target_id);
        if !target_id.is_empty() && !displayed {
            return Err(InteractionError::NotFound(format!(
                "startup {} is not among the displayed matches",
                target_id
            )));
        }
        self.dispatcher.decide(decision).await
    }

    /// Last failure recorded on a read path, if it has not since succeeded
    pub async fn last_error(&self, path: ReadPath) -> Option<InteractionError> {
        match path {
            ReadPath::Curated => self.store.lock().await.last_error(ListId::Curated).cloned(),
            ReadPath::Search => self.store.lock().await.last_error(ListId::Search).cloned(),
            ReadPath::Introductions => self.introductions.last_error().await,
        }
    }

    /// Re-invokes the same fetch for a read path; never called implicitly
    pub async fn retry(&self, path: ReadPath) -> Result<(), InteractionError> {
        tracing::info!("Retrying {:?} read path", path);
        match path {
            ReadPath::Curated => self.feed.refresh().await.map(|_| ()),
            ReadPath::Search => self.search.retry().await.map(|_| ()),
            ReadPath::Introductions => self.introductions.refresh().await.map(|_| ()),
        }
    }

    /// Detail record for one startup; does not touch any list
    pub async fn startup_detail(&self, startup_id: &str) -> Result<StartupDetail, InteractionError> {
        Ok(self.gateway.startup_detail(startup_id).await?)
    }

    pub async fn watchlist(&self) -> Result<Vec<WatchlistEntry>, InteractionError> {
        Ok(self.gateway.watchlist().await?)
    }
}

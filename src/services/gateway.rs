use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Acknowledgement, CandidateMatch, InterestAction, Introduction, IntroductionRequest,
    IntroductionResponseRequest, OutcomeUpdateRequest, SearchFilters, StartupDetail,
    WatchlistEntry,
};

/// Errors that can occur when talking to the match backend
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Rejected: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: session missing or expired")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Request/response contract of the remote match source and the
/// interest action gateway.
///
/// Session identity is implied by the implementation (the HTTP client
/// carries the bearer token), so no operation takes a user id.
#[async_trait]
pub trait MatchGateway: Send + Sync {
    /// Curated matches for the current session, in server order
    async fn curated_matches(&self) -> Result<Vec<CandidateMatch>, GatewayError>;

    /// Ranked search results for a filter snapshot
    async fn search(&self, filters: &SearchFilters) -> Result<Vec<CandidateMatch>, GatewayError>;

    /// Records a pass or a watch-with-intent on a candidate
    async fn record_interest(
        &self,
        target_id: &str,
        action: &InterestAction,
    ) -> Result<Acknowledgement, GatewayError>;

    /// Creates an introduction in the `requested` state
    async fn request_introduction(
        &self,
        request: &IntroductionRequest,
    ) -> Result<Introduction, GatewayError>;

    async fn respond_to_introduction(
        &self,
        request: &IntroductionResponseRequest,
    ) -> Result<Acknowledgement, GatewayError>;

    async fn record_outcome(
        &self,
        introduction_id: &str,
        request: &OutcomeUpdateRequest,
    ) -> Result<Acknowledgement, GatewayError>;

    /// Introductions visible to the current session, whichever role it has
    async fn list_introductions(&self) -> Result<Vec<Introduction>, GatewayError>;

    async fn startup_detail(&self, startup_id: &str) -> Result<StartupDetail, GatewayError>;

    async fn watchlist(&self) -> Result<Vec<WatchlistEntry>, GatewayError>;
}

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ApiSettings;
use crate::models::{
    Acknowledgement, CandidateMatch, ErrorResponse, InterestAction, Introduction,
    IntroductionCreated, IntroductionRequest, IntroductionResponseRequest, OutcomeUpdateRequest,
    RecordInterestRequest, SearchFilters, StartupDetail, WatchlistEntry, WatchlistRequest,
};
use crate::services::gateway::{GatewayError, MatchGateway};

/// HTTP client for the marketplace backend
///
/// Handles all communication with the API including:
/// - Fetching curated matches and search results
/// - Recording pass / watch decisions
/// - Requesting and answering introductions
pub struct HttpGateway {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl HttpGateway {
    /// Create a new gateway client
    pub fn new(
        base_url: String,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            token,
            client,
        })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, GatewayError> {
        Self::new(
            settings.base_url.clone(),
            settings.token.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        read_json(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!("POST {} (request {})", url, request_id);

        let response = self
            .authorize(self.client.post(&url))
            .header("X-Request-Id", request_id)
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

/// Maps a non-success status to the gateway error taxonomy
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> GatewayError {
    let reason = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.reason())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
        StatusCode::NOT_FOUND => GatewayError::NotFound(reason),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::Conflict(reason)
        }
        _ => GatewayError::ApiError {
            status: status.as_u16(),
            message: reason,
        },
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Request failed: {} - {}", status, body);
        return Err(error_for_status(status, &body));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse body: {}", e)))
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl MatchGateway for HttpGateway {
    async fn curated_matches(&self) -> Result<Vec<CandidateMatch>, GatewayError> {
        let matches: Vec<CandidateMatch> = self.get("/investors/curated-startups").await?;
        tracing::debug!("Fetched {} curated matches", matches.len());
        Ok(matches)
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<CandidateMatch>, GatewayError> {
        let results: Vec<CandidateMatch> = self.post("/investors/search", filters).await?;
        tracing::debug!("Search returned {} results", results.len());
        Ok(results)
    }

    async fn record_interest(
        &self,
        target_id: &str,
        action: &InterestAction,
    ) -> Result<Acknowledgement, GatewayError> {
        match action {
            InterestAction::Pass => {
                let path = format!("/investors/interests/{}", segment(target_id));
                self.post(&path, &RecordInterestRequest::passed()).await
            }
            InterestAction::Watch(intent) => {
                let path = format!("/investors/watchlist/{}", segment(target_id));
                self.post(&path, &WatchlistRequest { intent: *intent }).await
            }
        }
    }

    async fn request_introduction(
        &self,
        request: &IntroductionRequest,
    ) -> Result<Introduction, GatewayError> {
        let created: IntroductionCreated = self.post("/introductions/request", request).await?;
        Ok(created.into_introduction(
            &request.startup_id,
            request.intro_message.clone(),
            Utc::now(),
        ))
    }

    async fn respond_to_introduction(
        &self,
        request: &IntroductionResponseRequest,
    ) -> Result<Acknowledgement, GatewayError> {
        self.post("/introductions/respond", request).await
    }

    async fn record_outcome(
        &self,
        introduction_id: &str,
        request: &OutcomeUpdateRequest,
    ) -> Result<Acknowledgement, GatewayError> {
        let path = format!("/introductions/outcome/{}", segment(introduction_id));
        self.post(&path, request).await
    }

    async fn list_introductions(&self) -> Result<Vec<Introduction>, GatewayError> {
        self.get("/introductions/status").await
    }

    async fn startup_detail(&self, startup_id: &str) -> Result<StartupDetail, GatewayError> {
        let path = format!("/investors/startup/{}", segment(startup_id));
        self.get(&path).await
    }

    async fn watchlist(&self) -> Result<Vec<WatchlistEntry>, GatewayError> {
        self.get("/investors/watchlist").await
    }
}

// Scripted in-memory gateway shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use dealflow::models::{
    Acknowledgement, CandidateMatch, InterestAction, Introduction, IntroductionRequest,
    IntroductionResponseRequest, IntroductionStatus, MatchBand, OutcomeUpdateRequest,
    SearchFilters, StartupDetail, WatchlistEntry,
};
use dealflow::services::{GatewayError, MatchGateway};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub fn candidate(id: &str) -> CandidateMatch {
    CandidateMatch {
        id: id.to_string(),
        name: format!("Startup {}", id),
        sector: Some("Fintech".to_string()),
        stage: Some("Seed".to_string()),
        band: MatchBand::High,
        match_reason: "Strong fit for Fintech".to_string(),
        visible_risk: Some("No significant risks identified".to_string()),
        fit_score: 0.8,
    }
}

pub fn candidates(ids: &[&str]) -> Vec<CandidateMatch> {
    ids.iter().map(|id| candidate(id)).collect()
}

pub fn introduction(id: &str, startup_id: &str, status: IntroductionStatus) -> Introduction {
    Introduction {
        id: id.to_string(),
        counterpart_name: format!("Counterpart of {}", startup_id),
        counterpart_id: Some(startup_id.to_string()),
        status,
        intro_message: None,
        requested_at: Utc::now(),
        responded_at: None,
        outcome: None,
        outcome_notes: None,
    }
}

fn transport_failure() -> GatewayError {
    GatewayError::ApiError {
        status: 503,
        message: "Service Unavailable".to_string(),
    }
}

/// Counts calls, fails on demand and can hold responses until released
#[derive(Default)]
pub struct FakeGateway {
    curated: Mutex<Vec<CandidateMatch>>,
    search_results: Mutex<HashMap<String, Vec<CandidateMatch>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    server_introductions: Mutex<Vec<Introduction>>,
    pub searched: Mutex<Vec<SearchFilters>>,
    pub interest_log: Mutex<Vec<(String, InterestAction)>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub read_calls: AtomicUsize,
    pub interest_calls: AtomicUsize,
    pub introduction_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_curated(&self, records: Vec<CandidateMatch>) {
        *self.curated.lock().unwrap() = records;
    }

    /// Results returned for searches whose sector is `sector` ("" for none)
    pub fn set_search(&self, sector: &str, records: Vec<CandidateMatch>) {
        self.search_results
            .lock()
            .unwrap()
            .insert(sector.to_string(), records);
    }

    pub fn set_server_introductions(&self, records: Vec<Introduction>) {
        *self.server_introductions.lock().unwrap() = records;
    }

    pub fn server_introductions(&self) -> Vec<Introduction> {
        self.server_introductions.lock().unwrap().clone()
    }

    /// Changes an introduction behind the client's back
    pub fn set_server_status(&self, id: &str, status: IntroductionStatus) {
        let mut server = self.server_introductions.lock().unwrap();
        if let Some(record) = server.iter_mut().find(|i| i.id == id) {
            record.status = status;
        }
    }

    /// Holds the next call matching `key` until the returned sender fires
    ///
    /// Keys: `curated`, `search:<sector>`, `interest:<id>`, `respond:<id>`.
    /// Curated results are read before the hold, search results after it.
    pub fn hold(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn interest_calls(&self) -> usize {
        self.interest_calls.load(Ordering::SeqCst)
    }

    pub fn introduction_calls(&self) -> usize {
        self.introduction_calls.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().remove(key);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
    }

    fn check_writes(&self) -> Result<(), GatewayError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(transport_failure())
        } else {
            Ok(())
        }
    }

    fn check_reads(&self) -> Result<(), GatewayError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(transport_failure())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MatchGateway for FakeGateway {
    async fn curated_matches(&self) -> Result<Vec<CandidateMatch>, GatewayError> {
        let records = self.curated.lock().unwrap().clone();
        self.pass_gate("curated").await;
        self.check_reads()?;
        Ok(records)
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<CandidateMatch>, GatewayError> {
        let sector = filters.sector.clone().unwrap_or_default();
        self.searched.lock().unwrap().push(filters.clone());
        self.pass_gate(&format!("search:{}", sector)).await;
        self.check_reads()?;
        Ok(self
            .search_results
            .lock()
            .unwrap()
            .get(&sector)
            .cloned()
            .unwrap_or_default())
    }

    async fn record_interest(
        &self,
        target_id: &str,
        action: &InterestAction,
    ) -> Result<Acknowledgement, GatewayError> {
        self.interest_calls.fetch_add(1, Ordering::SeqCst);
        self.interest_log
            .lock()
            .unwrap()
            .push((target_id.to_string(), *action));
        self.pass_gate(&format!("interest:{}", target_id)).await;
        self.check_writes()?;
        Ok(Acknowledgement {
            message: Some("Interest tracked".to_string()),
        })
    }

    async fn request_introduction(
        &self,
        request: &IntroductionRequest,
    ) -> Result<Introduction, GatewayError> {
        self.introduction_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;

        let mut server = self.server_introductions.lock().unwrap();
        let duplicate = server.iter().any(|i| {
            i.counterpart_id.as_deref() == Some(request.startup_id.as_str())
                && i.status != IntroductionStatus::Declined
        });
        if duplicate {
            return Err(GatewayError::Conflict("Introduction already requested".to_string()));
        }

        let mut created = introduction(
            &format!("intro-{}", server.len() + 1),
            &request.startup_id,
            IntroductionStatus::Requested,
        );
        created.intro_message = request.intro_message.clone();
        server.push(created.clone());
        Ok(created)
    }

    async fn respond_to_introduction(
        &self,
        request: &IntroductionResponseRequest,
    ) -> Result<Acknowledgement, GatewayError> {
        self.introduction_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;

        {
            let mut server = self.server_introductions.lock().unwrap();
            let record = server
                .iter_mut()
                .find(|i| i.id == request.introduction_id && i.status == IntroductionStatus::Requested)
                .ok_or_else(|| GatewayError::NotFound("Introduction request not found".to_string()))?;
            record.status = request.response.status();
            record.responded_at = Some(Utc::now());
        }
        // The server has committed; only the acknowledgement is held
        self.pass_gate(&format!("respond:{}", request.introduction_id))
            .await;
        Ok(Acknowledgement::default())
    }

    async fn record_outcome(
        &self,
        introduction_id: &str,
        request: &OutcomeUpdateRequest,
    ) -> Result<Acknowledgement, GatewayError> {
        self.introduction_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;

        let mut server = self.server_introductions.lock().unwrap();
        let record = server
            .iter_mut()
            .find(|i| i.id == introduction_id)
            .ok_or_else(|| GatewayError::NotFound("Introduction not found".to_string()))?;
        record.outcome = Some(request.outcome);
        record.outcome_notes = request.notes.clone();
        Ok(Acknowledgement::default())
    }

    /// Listed records carry no startup id, as on the wire
    async fn list_introductions(&self) -> Result<Vec<Introduction>, GatewayError> {
        self.check_reads()?;
        Ok(self
            .server_introductions
            .lock()
            .unwrap()
            .iter()
            .cloned()
            .map(|mut record| {
                record.counterpart_id = None;
                record
            })
            .collect())
    }

    async fn startup_detail(&self, startup_id: &str) -> Result<StartupDetail, GatewayError> {
        self.check_reads()?;
        Err(GatewayError::NotFound(format!("Startup {} not found", startup_id)))
    }

    async fn watchlist(&self) -> Result<Vec<WatchlistEntry>, GatewayError> {
        self.check_reads()?;
        Ok(Vec::new())
    }
}

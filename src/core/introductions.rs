use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use validator::Validate;

use crate::core::error::InteractionError;
use crate::models::{
    Introduction, IntroductionDecision, IntroductionOutcome, IntroductionRequest,
    IntroductionResponseRequest, IntroductionStatus, OutcomeUpdateRequest, Role,
};
use crate::services::MatchGateway;

#[derive(Debug, Default)]
struct IntroductionBook {
    records: Vec<Introduction>,
    /// Keys of creates / responds / outcome updates awaiting the server
    in_flight: HashSet<String>,
    loaded: bool,
    last_error: Option<InteractionError>,
}

impl IntroductionBook {
    fn find(&self, id: &str) -> Option<&Introduction> {
        self.records.iter().find(|i| i.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Introduction> {
        self.records.iter_mut().find(|i| i.id == id)
    }

    /// Only records whose startup id is known can match, i.e. the ones
    /// created through this tracker; the server remains the authority.
    fn has_active_with(&self, startup_id: &str) -> bool {
        self.records.iter().any(|i| {
            i.counterpart_id.as_deref() == Some(startup_id)
                && i.status != IntroductionStatus::Declined
        })
    }
}

fn create_key(startup_id: &str) -> String {
    format!("create:{}", startup_id)
}

fn respond_key(introduction_id: &str) -> String {
    format!("respond:{}", introduction_id)
}

fn outcome_key(introduction_id: &str) -> String {
    format!("outcome:{}", introduction_id)
}

/// State machine for introductions, from one participant's side
///
/// Nothing here is optimistic: local state changes only after the server
/// confirms, and every confirmed change bumps the refresh signal so
/// dependent views re-derive instead of patching.
pub struct IntroductionTracker {
    gateway: Arc<dyn MatchGateway>,
    role: Role,
    book: Mutex<IntroductionBook>,
    refresh: watch::Sender<u64>,
}

impl IntroductionTracker {
    pub fn new(gateway: Arc<dyn MatchGateway>, role: Role) -> Self {
        let (refresh, _) = watch::channel(0);
        Self {
            gateway,
            role,
            book: Mutex::new(IntroductionBook::default()),
            refresh,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Receiver that ticks after every confirmed create / respond / outcome
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.refresh.subscribe()
    }

    fn signal_refresh(&self) {
        self.refresh.send_modify(|generation| *generation += 1);
    }

    /// Replaces the tracked list with the server's; prior state survives a failure
    pub async fn refresh(&self) -> Result<usize, InteractionError> {
        match self.gateway.list_introductions().await {
            Ok(mut records) => {
                let mut book = self.book.lock().await;
                // Listed records omit the startup id; keep the ones learned from creates
                for record in records.iter_mut().filter(|r| r.counterpart_id.is_none()) {
                    record.counterpart_id = book
                        .find(&record.id)
                        .and_then(|known| known.counterpart_id.clone());
                }
                book.records = records;
                book.loaded = true;
                book.last_error = None;
                tracing::debug!("Loaded {} introductions", book.records.len());
                Ok(book.records.len())
            }
            Err(e) => {
                let err = InteractionError::from(e);
                tracing::error!("Failed to load introductions: {}", err);
                self.book.lock().await.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub async fn introductions(&self) -> Vec<Introduction> {
        self.book.lock().await.records.clone()
    }

    /// Introductions still waiting for the startup's answer
    pub async fn pending(&self) -> Vec<Introduction> {
        self.book
            .lock()
            .await
            .records
            .iter()
            .filter(|i| i.status == IntroductionStatus::Requested)
            .cloned()
            .collect()
    }

    pub async fn get(&self, introduction_id: &str) -> Option<Introduction> {
        self.book.lock().await.find(introduction_id).cloned()
    }

    pub async fn is_loaded(&self) -> bool {
        self.book.lock().await.loaded
    }

    pub async fn last_error(&self) -> Option<InteractionError> {
        self.book.lock().await.last_error.clone()
    }

    /// Investor asks for an introduction to `startup_id`
    pub async fn create(
        &self,
        startup_id: &str,
        intro_message: Option<String>,
    ) -> Result<Introduction, InteractionError> {
        if self.role != Role::Investor {
            return Err(InteractionError::Validation(
                "only investors can request introductions".to_string(),
            ));
        }

        let request = IntroductionRequest {
            startup_id: startup_id.to_string(),
            intro_message,
        };
        request.validate()?;

        let key = create_key(startup_id);
        {
            let mut book = self.book.lock().await;
            if book.in_flight.contains(&key) || book.has_active_with(startup_id) {
                tracing::debug!("Introduction to {} already requested", startup_id);
                return Err(InteractionError::Conflict(
                    "Introduction already requested".to_string(),
                ));
            }
            book.in_flight.insert(key.clone());
        }

        let result = self.gateway.request_introduction(&request).await;

        let mut book = self.book.lock().await;
        book.in_flight.remove(&key);

        match result {
            Ok(introduction) => {
                tracing::info!(
                    "Introduction {} requested with {}",
                    introduction.id,
                    introduction.counterpart_name
                );
                if book.find(&introduction.id).is_none() {
                    book.records.push(introduction.clone());
                }
                drop(book);
                self.signal_refresh();
                Ok(introduction)
            }
            Err(e) => {
                let err = InteractionError::from(e);
                tracing::warn!("Introduction request to {} failed: {}", startup_id, err);
                Err(err)
            }
        }
    }

    /// Startup accepts or declines a pending introduction
    pub async fn respond(
        &self,
        introduction_id: &str,
        decision: IntroductionDecision,
    ) -> Result<Introduction, InteractionError> {
        if self.role != Role::Startup {
            return Err(InteractionError::Validation(
                "only startups can respond to introductions".to_string(),
            ));
        }

        let next = decision.status();
        let key = respond_key(introduction_id);
        {
            let mut book = self.book.lock().await;
            let current = book
                .find(introduction_id)
                .ok_or_else(|| {
                    InteractionError::NotFound(format!("introduction {}", introduction_id))
                })?
                .status;

            if !current.can_transition_to(next) {
                return Err(InteractionError::InvalidTransition(format!(
                    "introduction {} is {} and cannot become {}",
                    introduction_id, current, next
                )));
            }
            if !book.in_flight.insert(key.clone()) {
                return Err(InteractionError::InvalidTransition(format!(
                    "a response to introduction {} is already in flight",
                    introduction_id
                )));
            }
        }

        let request = IntroductionResponseRequest {
            introduction_id: introduction_id.to_string(),
            response: decision,
        };
        let result = self.gateway.respond_to_introduction(&request).await;

        let mut book = self.book.lock().await;
        book.in_flight.remove(&key);

        if let Err(e) = result {
            let err = match InteractionError::from(e) {
                // The backend answers 404 for an introduction no longer `requested`
                InteractionError::NotFound(reason) => InteractionError::InvalidTransition(reason),
                other => other,
            };
            tracing::warn!("Response to introduction {} failed: {}", introduction_id, err);
            return Err(err);
        }

        let updated = match book.find_mut(introduction_id) {
            Some(record) => {
                if record.status.can_transition_to(next) {
                    record.status = next;
                    record.responded_at = Some(Utc::now());
                } else {
                    tracing::debug!(
                        "Introduction {} already {} after refresh; keeping server state",
                        introduction_id,
                        record.status
                    );
                }
                record.clone()
            }
            None => {
                return Err(InteractionError::NotFound(format!(
                    "introduction {}",
                    introduction_id
                )))
            }
        };
        drop(book);

        tracing::info!("Introduction {} is now {}", introduction_id, updated.status);
        self.signal_refresh();
        Ok(updated)
    }

    /// Annotates an accepted introduction with what came of it
    pub async fn record_outcome(
        &self,
        introduction_id: &str,
        outcome: IntroductionOutcome,
        notes: Option<String>,
    ) -> Result<Introduction, InteractionError> {
        let request = OutcomeUpdateRequest { outcome, notes };
        request.validate()?;

        let key = outcome_key(introduction_id);
        {
            let mut book = self.book.lock().await;
            let status = book
                .find(introduction_id)
                .ok_or_else(|| {
                    InteractionError::NotFound(format!("introduction {}", introduction_id))
                })?
                .status;

            if status != IntroductionStatus::Accepted {
                return Err(InteractionError::InvalidTransition(format!(
                    "introduction {} is {}; outcomes apply to accepted introductions",
                    introduction_id, status
                )));
            }
            if !book.in_flight.insert(key.clone()) {
                return Err(InteractionError::InvalidTransition(format!(
                    "an outcome for introduction {} is already in flight",
                    introduction_id
                )));
            }
        }

        let result = self.gateway.record_outcome(introduction_id, &request).await;

        let mut book = self.book.lock().await;
        book.in_flight.remove(&key);
        result.map_err(InteractionError::from)?;

        let updated = book
            .find_mut(introduction_id)
            .map(|record| {
                record.outcome = Some(request.outcome);
                record.outcome_notes = request.notes.clone();
                record.clone()
            })
            .ok_or_else(|| InteractionError::NotFound(format!("introduction {}", introduction_id)))?;
        drop(book);

        tracing::info!("Recorded outcome {:?} on introduction {}", outcome, introduction_id);
        self.signal_refresh();
        Ok(updated)
    }
}

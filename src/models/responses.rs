use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Introduction, IntroductionStatus, WatchIntent};

/// Generic acknowledgement of a mutating call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned when an introduction is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroductionCreated {
    pub id: String,
    #[serde(default)]
    pub startup_name: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl IntroductionCreated {
    /// Builds the requester's view of the freshly created record
    pub fn into_introduction(
        self,
        startup_id: &str,
        intro_message: Option<String>,
        requested_at: DateTime<Utc>,
    ) -> Introduction {
        Introduction {
            id: self.id,
            counterpart_name: self.startup_name,
            counterpart_id: Some(startup_id.to_string()),
            status: IntroductionStatus::Requested,
            intro_message,
            requested_at,
            responded_at: None,
            outcome: None,
            outcome_notes: None,
        }
    }
}

/// Opaque output of the readiness scorer, displayed as-is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSummary {
    #[serde(rename = "readiness_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "readiness_band", default)]
    pub band: Option<String>,
    #[serde(rename = "readiness_breakdown", default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub risk: String,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub mitigation: Option<String>,
}

/// Startup detail record as seen by an investor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub impact_tags: Vec<String>,
    #[serde(flatten)]
    pub readiness: ReadinessSummary,
    #[serde(default)]
    pub risks: Vec<RiskItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    pub intent: WatchIntent,
    #[serde(default)]
    pub added_at: Option<String>,
}

/// Error body returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorResponse {
    /// Human-readable reason; validation errors arrive as arrays
    pub fn reason(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{IntroductionDecision, IntroductionOutcome, WatchIntent};

/// Body for recording a pass on a startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInterestRequest {
    pub action: String,
}

impl RecordInterestRequest {
    pub fn passed() -> Self {
        Self {
            action: "passed".to_string(),
        }
    }
}

/// Body for adding a startup to the watchlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistRequest {
    pub intent: WatchIntent,
}

/// Investor-initiated introduction request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IntroductionRequest {
    #[validate(length(min = 1))]
    pub startup_id: String,
    #[validate(length(max = 2000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_message: Option<String>,
}

/// Startup-initiated answer to a pending introduction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IntroductionResponseRequest {
    #[validate(length(min = 1))]
    pub introduction_id: String,
    pub response: IntroductionDecision,
}

/// Outcome annotation on an accepted introduction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OutcomeUpdateRequest {
    pub outcome: IntroductionOutcome,
    #[validate(length(max = 2000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introduction_request_validation() {
        let empty = IntroductionRequest {
            startup_id: String::new(),
            intro_message: None,
        };
        assert!(empty.validate().is_err());

        let ok = IntroductionRequest {
            startup_id: "s-1".to_string(),
            intro_message: Some("Loved the pilot results".to_string()),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_wire_shapes() {
        let watch = serde_json::to_value(WatchlistRequest {
            intent: WatchIntent::WaitingForMilestone,
        })
        .unwrap();
        assert_eq!(watch, serde_json::json!({"intent": "waiting_for_milestone"}));

        let respond = serde_json::to_value(IntroductionResponseRequest {
            introduction_id: "i-1".to_string(),
            response: IntroductionDecision::Declined,
        })
        .unwrap();
        assert_eq!(
            respond,
            serde_json::json!({"introduction_id": "i-1", "response": "declined"})
        );
    }
}

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use validator::Validate;

/// Identifier of an independently-sourced candidate list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListId {
    Curated,
    Search,
}

impl ListId {
    pub const ALL: [ListId; 2] = [ListId::Curated, ListId::Search];
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListId::Curated => write!(f, "curated"),
            ListId::Search => write!(f, "search"),
        }
    }
}

/// Ordinal match-strength band attached to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchBand {
    #[serde(alias = "LOW", alias = "low", alias = "EARLY", alias = "Early", alias = "early")]
    Low,
    #[serde(alias = "MEDIUM", alias = "medium")]
    Medium,
    #[serde(alias = "HIGH", alias = "high")]
    High,
}

impl Default for MatchBand {
    fn default() -> Self {
        MatchBand::Low
    }
}

/// A startup or investor surfaced as a potential counterparty
///
/// Records are never patched in place: a list either holds the record as
/// fetched or does not hold it at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(rename = "readiness_band", default)]
    pub band: MatchBand,
    #[serde(default)]
    pub match_reason: String,
    #[serde(default)]
    pub visible_risk: Option<String>,
    #[serde(
        rename = "final_match_score",
        default,
        deserialize_with = "deserialize_unit_score"
    )]
    pub fit_score: f64,
}

fn deserialize_unit_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if raw.is_nan() {
        return Ok(0.0);
    }
    Ok(raw.clamp(0.0, 1.0))
}

/// Reason attached to a watch decision, shared onward to the founder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchIntent {
    TrackingExecution,
    WaitingForMilestone,
    MonitoringMarket,
    GeneralInterest,
}

impl WatchIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchIntent::TrackingExecution => "tracking_execution",
            WatchIntent::WaitingForMilestone => "waiting_for_milestone",
            WatchIntent::MonitoringMarket => "monitoring_market",
            WatchIntent::GeneralInterest => "general_interest",
        }
    }
}

impl std::str::FromStr for WatchIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tracking_execution" | "execution" => Ok(WatchIntent::TrackingExecution),
            "waiting_for_milestone" | "milestone" => Ok(WatchIntent::WaitingForMilestone),
            "monitoring_market" | "market" => Ok(WatchIntent::MonitoringMarket),
            "general_interest" | "general" => Ok(WatchIntent::GeneralInterest),
            other => Err(format!(
                "unknown watch intent '{}': expected tracking_execution, waiting_for_milestone, monitoring_market or general_interest",
                other
            )),
        }
    }
}

/// What the user decided about a candidate, as entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    Pass,
    Watch { intent: Option<WatchIntent> },
}

/// Validated form of a decision, the only shape the gateway accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestAction {
    Pass,
    Watch(WatchIntent),
}

impl DecisionKind {
    /// Returns `None` for a watch decision without an intent
    pub fn to_action(self) -> Option<InterestAction> {
        match self {
            DecisionKind::Pass => Some(InterestAction::Pass),
            DecisionKind::Watch { intent } => intent.map(InterestAction::Watch),
        }
    }
}

/// A transient command: the user's decision on one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestDecision {
    pub target_id: String,
    pub kind: DecisionKind,
}

impl InterestDecision {
    pub fn pass(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            kind: DecisionKind::Pass,
        }
    }

    pub fn watch(target_id: impl Into<String>, intent: Option<WatchIntent>) -> Self {
        Self {
            target_id: target_id.into(),
            kind: DecisionKind::Watch { intent },
        }
    }
}

/// Which side of the marketplace the current session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Investor,
    Startup,
}

impl Default for Role {
    fn default() -> Self {
        Role::Investor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntroductionStatus {
    Requested,
    Accepted,
    Declined,
    /// Assigned by the server only
    Expired,
}

impl IntroductionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, IntroductionStatus::Requested)
    }

    /// Transitions only ever leave `Requested`
    pub fn can_transition_to(&self, next: IntroductionStatus) -> bool {
        matches!(
            (self, next),
            (IntroductionStatus::Requested, IntroductionStatus::Accepted)
                | (IntroductionStatus::Requested, IntroductionStatus::Declined)
        )
    }
}

impl fmt::Display for IntroductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntroductionStatus::Requested => "requested",
            IntroductionStatus::Accepted => "accepted",
            IntroductionStatus::Declined => "declined",
            IntroductionStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// A startup's answer to an introduction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntroductionDecision {
    Accepted,
    Declined,
}

impl IntroductionDecision {
    pub fn status(self) -> IntroductionStatus {
        match self {
            IntroductionDecision::Accepted => IntroductionStatus::Accepted,
            IntroductionDecision::Declined => IntroductionStatus::Declined,
        }
    }
}

impl std::str::FromStr for IntroductionDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accepted" | "accept" => Ok(IntroductionDecision::Accepted),
            "declined" | "decline" => Ok(IntroductionDecision::Declined),
            other => Err(format!("unknown response '{}': expected accepted or declined", other)),
        }
    }
}

/// What came of an accepted introduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroductionOutcome {
    VibeCheck,
    DeepDive,
    Passed,
    TermSheet,
    Ghosted,
}

impl std::str::FromStr for IntroductionOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vibe_check" => Ok(IntroductionOutcome::VibeCheck),
            "deep_dive" => Ok(IntroductionOutcome::DeepDive),
            "passed" => Ok(IntroductionOutcome::Passed),
            "term_sheet" => Ok(IntroductionOutcome::TermSheet),
            "ghosted" => Ok(IntroductionOutcome::Ghosted),
            other => Err(format!("unknown outcome '{}'", other)),
        }
    }
}

/// Bilateral introduction record, as seen by one of its two parties
///
/// The investor's view names the startup, the startup's view names the
/// investor; both land in `counterpart_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Introduction {
    pub id: String,
    #[serde(alias = "startup_name", alias = "investor_name", default)]
    pub counterpart_name: String,
    #[serde(alias = "startup_id", default)]
    pub counterpart_id: Option<String>,
    pub status: IntroductionStatus,
    #[serde(default)]
    pub intro_message: Option<String>,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub requested_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub responded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub outcome: Option<IntroductionOutcome>,
    #[serde(default)]
    pub outcome_notes: Option<String>,
}

/// Accepts RFC 3339 as well as the offset-less ISO form the backend emits
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_timestamp(deserializer)?.unwrap_or_else(Utc::now))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Momentum {
    Improving,
    Stable,
    Declining,
}

impl std::str::FromStr for Momentum {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "improving" => Ok(Momentum::Improving),
            "stable" => Ok(Momentum::Stable),
            "declining" => Ok(Momentum::Declining),
            other => Err(format!("unknown momentum '{}'", other)),
        }
    }
}

/// Snapshot of the active discovery filter for one search invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SearchFilters {
    #[validate(length(max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<Momentum>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub impact_tags: Vec<String>,
}

impl SearchFilters {
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_momentum(mut self, momentum: Momentum) -> Self {
        self.momentum = Some(momentum);
        self
    }

    pub fn with_impact_tag(mut self, tag: impl Into<String>) -> Self {
        self.impact_tags.push(tag.into());
        self
    }

    /// Drops blank text fields and duplicate tags so "any" is always `None`
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let mut impact_tags: Vec<String> = Vec::with_capacity(self.impact_tags.len());
        for tag in self.impact_tags {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !impact_tags.contains(&tag) {
                impact_tags.push(tag);
            }
        }

        Self {
            keyword: clean(self.keyword),
            sector: clean(self.sector),
            stage: clean(self.stage),
            region: clean(self.region),
            momentum: self.momentum,
            impact_tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.sector.is_none()
            && self.stage.is_none()
            && self.region.is_none()
            && self.momentum.is_none()
            && self.impact_tags.is_empty()
    }
}

/// Shorthand filters offered next to the manual search form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPreset {
    HighMomentumEarlyStage,
    ImpactFirst,
    QuietButConsistent,
}

impl SearchPreset {
    pub fn filters(self) -> SearchFilters {
        match self {
            SearchPreset::HighMomentumEarlyStage => SearchFilters::default()
                .with_momentum(Momentum::Improving)
                .with_stage("Seed"),
            SearchPreset::ImpactFirst => SearchFilters::default()
                .with_impact_tag("Climate Tech")
                .with_impact_tag("Environment Friendly"),
            SearchPreset::QuietButConsistent => {
                SearchFilters::default().with_momentum(Momentum::Stable)
            }
        }
    }
}

impl std::str::FromStr for SearchPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "high_momentum_early_stage" | "high_momentum" => Ok(SearchPreset::HighMomentumEarlyStage),
            "impact_first" | "impact" => Ok(SearchPreset::ImpactFirst),
            "quiet_but_consistent" | "quiet" => Ok(SearchPreset::QuietButConsistent),
            other => Err(format!("unknown preset '{}'", other)),
        }
    }
}

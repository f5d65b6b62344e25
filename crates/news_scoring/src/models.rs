use std::collections::BTreeMap;
use std::fmt;

use common::{Commodity, RawHeadline};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Policy,
    Regulatory,
    Price,
    Volatility,
    MergersAcquisitions,
    Earnings,
    Operational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Policy,
    MarketMove,
    Corporate,
    #[default]
    General,
}

impl EventType {
    /// Policy outranks market moves, which outrank corporate events.
    pub fn from_kinds(kinds: &[CategoryKind]) -> Self {
        let has = |k: CategoryKind| kinds.contains(&k);
        if has(CategoryKind::Policy) || has(CategoryKind::Regulatory) {
            EventType::Policy
        } else if has(CategoryKind::Price) || has(CategoryKind::Volatility) {
            EventType::MarketMove
        } else if has(CategoryKind::MergersAcquisitions) || has(CategoryKind::Earnings) {
            EventType::Corporate
        } else {
            EventType::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Policy => "policy",
            EventType::MarketMove => "market_move",
            EventType::Corporate => "corporate",
            EventType::General => "general",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ImpactLevel::Critical
        } else if score >= 60.0 {
            ImpactLevel::High
        } else if score >= 40.0 {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Critical => "critical",
            ImpactLevel::High => "high",
            ImpactLevel::Medium => "medium",
            ImpactLevel::Low => "low",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsEvent {
    pub id: String,
    pub headline: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
    pub source: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published: OffsetDateTime,
}

impl NewsEvent {
    pub fn new(
        headline: impl Into<String>,
        summary: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        published: OffsetDateTime,
    ) -> Self {
        let headline = headline.into();
        let url = url.into();
        Self {
            id: event_id(&headline, &url),
            headline,
            summary: summary.into(),
            url,
            source: source.into(),
            published,
        }
    }

    /// Builds an event from a source headline; undated headlines are stamped `now`.
    pub fn from_raw(raw: RawHeadline, source: &str, now: OffsetDateTime) -> Self {
        Self::new(
            raw.title.trim(),
            raw.summary.trim(),
            raw.url.trim(),
            source,
            raw.published.unwrap_or(now),
        )
    }

    pub fn text(&self) -> String {
        format!("{} {}", self.headline, self.summary)
    }
}

/// `news_` followed by the first 12 hex digits of SHA-256(headline + url).
pub fn event_id(headline: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(headline.as_bytes());
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("news_{}", &digest[..12])
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityAssessment {
    pub priority_score: f64,
    pub event_type: EventType,
    pub impact_level: ImpactLevel,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub categories: Vec<CategoryKind>,
    #[serde(default)]
    pub commodity_impact: BTreeMap<Commodity, f64>,
    #[serde(default)]
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceAssessment {
    pub canadian_relevance: f64,
    #[serde(default)]
    pub places: Vec<String>,
    #[serde(default, rename = "companies_affected")]
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEvent {
    #[serde(flatten)]
    pub event: NewsEvent,
    #[serde(flatten)]
    pub assessment: PriorityAssessment,
    #[serde(flatten)]
    pub relevance: RelevanceAssessment,
}

impl ScoredEvent {
    pub fn priority_score(&self) -> f64 {
        self.assessment.priority_score
    }

    pub fn canadian_relevance(&self) -> f64 {
        self.relevance.canadian_relevance
    }

    pub fn is_breaking(&self, threshold: f64) -> bool {
        self.assessment.priority_score >= threshold
    }
}

pub(crate) fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

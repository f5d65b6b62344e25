//! Keyword-based priority scoring and Canadian relevance for mining headlines.

pub mod analyzer;
pub mod keywords;
pub mod matcher;
pub mod models;
pub mod relevance;
pub mod scorer;

pub use analyzer::EventAnalyzer;
pub use matcher::PhraseMatcher;
pub use models::{
    event_id, CategoryKind, EventType, ImpactLevel, NewsEvent, PriorityAssessment,
    RelevanceAssessment, ScoredEvent, Sentiment,
};
pub use relevance::RelevanceAugmenter;
pub use scorer::KeywordScorer;

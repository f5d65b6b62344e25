use common::IntelResult;

use crate::models::{NewsEvent, ScoredEvent};
use crate::relevance::RelevanceAugmenter;
use crate::scorer::KeywordScorer;

/// Runs the keyword scorer and the relevance augmenter over one event.
#[derive(Debug, Clone)]
pub struct EventAnalyzer {
    scorer: KeywordScorer,
    relevance: RelevanceAugmenter,
}

impl EventAnalyzer {
    pub fn new() -> IntelResult<Self> {
        Ok(Self {
            scorer: KeywordScorer::new()?,
            relevance: RelevanceAugmenter::new()?,
        })
    }

    /// Scores against the built-in tables, with the company table's names
    /// also counting toward Canadian relevance.
    pub fn with_company_names<'a, I>(names: I) -> IntelResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Ok(Self {
            scorer: KeywordScorer::new()?,
            relevance: RelevanceAugmenter::new()?.with_extra_companies(names)?,
        })
    }

    pub fn analyze(&self, event: NewsEvent, source_weight: f64) -> ScoredEvent {
        let text = event.text();
        let assessment = self.scorer.score(&text, source_weight);
        let relevance = self.relevance.assess(&text);
        ScoredEvent {
            event,
            assessment,
            relevance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use time::macros::datetime;

    #[test]
    fn test_analyze_combines_priority_and_relevance() {
        let analyzer = EventAnalyzer::new().unwrap();
        let event = NewsEvent::new(
            "Teck Resources announces copper mine closure in British Columbia",
            "Canadian mining workers face layoffs",
            "https://example.com/teck",
            "northern_miner",
            datetime!(2025-07-09 15:30 UTC),
        );

        let scored = analyzer.analyze(event, 0.9);

        // operational: "mine closure" with mining/canadian context
        assert_eq!(scored.priority_score(), 54.0);
        assert_eq!(scored.assessment.event_type, EventType::General);
        // canadian + british columbia + teck resources
        assert_eq!(scored.canadian_relevance(), 35.0);
        assert!(scored.is_breaking(50.0));
    }

    #[test]
    fn test_company_names_raise_relevance() {
        let analyzer = EventAnalyzer::with_company_names(["northern dawn minerals"]).unwrap();
        let event = NewsEvent::new(
            "Northern Dawn Minerals drills high-grade copper",
            "",
            "https://example.com/nd",
            "junior_desk",
            datetime!(2025-07-09 15:30 UTC),
        );

        let scored = analyzer.analyze(event.clone(), 1.0);
        assert_eq!(scored.canadian_relevance(), 15.0);
        assert_eq!(
            EventAnalyzer::new().unwrap().analyze(event, 1.0).canadian_relevance(),
            0.0
        );
    }

    #[test]
    fn test_scored_event_serializes_flat() {
        let analyzer = EventAnalyzer::new().unwrap();
        let event = NewsEvent::new(
            "Gold prices rally to record",
            "",
            "https://example.com/gold",
            "kitco_news",
            datetime!(2025-07-09 15:30 UTC),
        );
        let scored = analyzer.analyze(event, 1.0);
        let json = serde_json::to_value(&scored).unwrap();

        assert_eq!(json["headline"], "Gold prices rally to record");
        assert_eq!(json["event_type"], "market_move");
        assert!(json["commodity_impact"]["gold"].as_f64().unwrap() > 0.0);

        let back: ScoredEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.event.id, scored.event.id);
        assert_eq!(back.assessment, scored.assessment);
    }
}

use std::collections::HashSet;

use common::{ScoringConfig, SourceBatch, SourceManager, SourceOutcome};
use companies::Correlator;
use news_scoring::{EventAnalyzer, NewsEvent, ScoredEvent};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::event_log::{sort_events, window_start};

/// Everything one pass over the sources produced.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub scanned_at: OffsetDateTime,
    pub hours_back: i64,
    /// Headlines read from sources before any filtering.
    pub fetched: usize,
    /// Events at or above the minimum priority, highest first.
    pub events: Vec<ScoredEvent>,
    pub outcomes: Vec<SourceOutcome>,
}

impl ScanResult {
    pub fn breaking(&self, threshold: f64) -> Vec<ScoredEvent> {
        self.events
            .iter()
            .filter(|e| e.is_breaking(threshold))
            .cloned()
            .collect()
    }
}

pub struct Monitor {
    analyzer: EventAnalyzer,
    correlator: Correlator,
    scoring: ScoringConfig,
}

impl Monitor {
    pub fn new(analyzer: EventAnalyzer, correlator: Correlator, scoring: ScoringConfig) -> Self {
        Self {
            analyzer,
            correlator,
            scoring,
        }
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    pub async fn scan(&self, sources: &SourceManager, hours_back: i64) -> ScanResult {
        info!("Monitoring breaking news from {} sources...", sources.len());
        let batch = sources.run_all().await;
        self.process(batch, OffsetDateTime::now_utc(), hours_back)
    }

    /// Scores a fetched batch as of `now`.
    pub fn process(&self, batch: SourceBatch, now: OffsetDateTime, hours_back: i64) -> ScanResult {
        let cutoff = window_start(now, hours_back);
        let fetched = batch.headline_count();

        let mut seen = HashSet::new();
        let mut events = Vec::new();

        for fetch in batch.fetches {
            for raw in fetch
                .headlines
                .into_iter()
                .take(self.scoring.max_entries_per_source)
            {
                let event = NewsEvent::from_raw(raw, &fetch.source, now);
                if event.published < cutoff {
                    continue;
                }
                if !seen.insert(event.id.clone()) {
                    debug!("Duplicate headline skipped: {}", event.headline);
                    continue;
                }

                let scored = self.analyzer.analyze(event, fetch.weight);
                if scored.priority_score() >= self.scoring.min_priority_score {
                    events.push(scored);
                }
            }
        }

        sort_events(&mut events);

        info!(
            "Found {} events at priority >= {} ({} breaking)",
            events.len(),
            self.scoring.min_priority_score,
            events
                .iter()
                .filter(|e| e.is_breaking(self.scoring.breaking_threshold))
                .count()
        );

        ScanResult {
            scanned_at: now,
            hours_back,
            fetched,
            events,
            outcomes: batch.outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{RawHeadline, SourceFetch};
    use companies::CompanyTable;
    use time::macros::datetime;
    use time::Duration;

    const NOW: OffsetDateTime = datetime!(2025-07-09 12:00 UTC);

    fn monitor() -> Monitor {
        Monitor::new(
            EventAnalyzer::new().unwrap(),
            Correlator::new(CompanyTable::builtin()).unwrap(),
            ScoringConfig::default(),
        )
    }

    fn raw(title: &str, summary: &str, hours_ago: i64) -> RawHeadline {
        RawHeadline {
            title: title.to_string(),
            summary: summary.to_string(),
            url: format!("https://example.com/{}", title.len()),
            published: Some(NOW - Duration::hours(hours_ago)),
        }
    }

    fn batch(source: &str, weight: f64, headlines: Vec<RawHeadline>) -> SourceBatch {
        SourceBatch {
            fetches: vec![SourceFetch {
                source: source.to_string(),
                weight,
                headlines,
            }],
            outcomes: Vec::new(),
        }
    }

    #[test]
    fn test_process_filters_sorts_and_dedupes() {
        let tariff = raw(
            "Trump announces 50% tariff on copper imports",
            "New copper tariffs for national security",
            1,
        );
        let result = monitor().process(
            batch(
                "mining_com",
                1.0,
                vec![
                    raw("Teck mine closure hits Canadian output", "", 2),
                    tariff.clone(),
                    tariff,
                    raw("Weather is nice today", "", 1),
                    raw("Gold embargo rattles mining stocks", "", 12),
                ],
            ),
            NOW,
            6,
        );

        assert_eq!(result.fetched, 5);
        let headlines: Vec<&str> = result.events.iter().map(|e| e.event.headline.as_str()).collect();
        assert_eq!(
            headlines,
            vec![
                "Trump announces 50% tariff on copper imports",
                "Teck mine closure hits Canadian output",
            ]
        );
        assert_eq!(result.breaking(50.0).len(), 2);

        let correlation = monitor().correlator().correlate(&result.events);
        assert!(correlation.commodity_impacts.contains_key(&common::Commodity::Copper));
    }

    #[test]
    fn test_per_source_cap_and_weight() {
        let mut scoring = ScoringConfig::default();
        scoring.max_entries_per_source = 1;
        let monitor = Monitor::new(
            EventAnalyzer::new().unwrap(),
            Correlator::new(CompanyTable::builtin()).unwrap(),
            scoring,
        );

        let result = monitor.process(
            batch(
                "junior_desk",
                0.5,
                vec![
                    raw("Copper tariff shocks mining sector", "", 1),
                    raw("Silver embargo shocks mining sector", "", 1),
                ],
            ),
            NOW,
            6,
        );

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].priority_score(), 50.0);
        assert_eq!(result.events[0].event.source, "junior_desk");
    }

    #[test]
    fn test_oversized_window_keeps_fresh_events() {
        let result = monitor().process(
            batch(
                "mining_com",
                1.0,
                vec![raw("Copper tariff shocks mining sector", "", 1)],
            ),
            NOW,
            100_000_000_000,
        );
        assert_eq!(result.events.len(), 1);

        let result = monitor().process(SourceBatch::default(), NOW, i64::MAX);
        assert!(result.events.is_empty());
    }
}

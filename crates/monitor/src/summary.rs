use std::collections::BTreeMap;
use std::fmt::Write as _;

use common::{Commodity, SourceOutcome};
use companies::CorrelationReport;
use news_scoring::{EventType, ImpactLevel, ScoredEvent};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const TOP_EVENTS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityEventRef {
    pub headline: String,
    pub impact: f64,
    pub priority: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityRollup {
    pub commodity: Commodity,
    pub total_impact: f64,
    pub event_count: usize,
    pub events: Vec<CommodityEventRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventCounts {
    /// Headlines read from sources before scoring and filtering.
    pub fetched: usize,
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub policy: usize,
    pub market: usize,
    pub corporate: usize,
    pub canadian_relevant: usize,
}

/// Breaking-news digest for one reporting window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub hours_back: i64,
    pub counts: EventCounts,
    pub commodities: Vec<CommodityRollup>,
    pub sources: Vec<SourceOutcome>,
    pub correlation: CorrelationReport,
    /// All events in the window, highest priority first.
    pub events: Vec<ScoredEvent>,
}

fn count(events: &[ScoredEvent], pred: impl Fn(&ScoredEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

impl ScanSummary {
    /// `events` must already be sorted by priority.
    pub fn build(
        generated_at: OffsetDateTime,
        hours_back: i64,
        fetched: usize,
        events: Vec<ScoredEvent>,
        sources: Vec<SourceOutcome>,
        correlation: CorrelationReport,
        canadian_threshold: f64,
    ) -> Self {
        let counts = EventCounts {
            fetched,
            total: events.len(),
            critical: count(&events, |e| e.assessment.impact_level == ImpactLevel::Critical),
            high: count(&events, |e| e.assessment.impact_level == ImpactLevel::High),
            policy: count(&events, |e| e.assessment.event_type == EventType::Policy),
            market: count(&events, |e| e.assessment.event_type == EventType::MarketMove),
            corporate: count(&events, |e| e.assessment.event_type == EventType::Corporate),
            canadian_relevant: count(&events, |e| e.canadian_relevance() >= canadian_threshold),
        };

        let mut rollups: BTreeMap<Commodity, CommodityRollup> = BTreeMap::new();
        for event in &events {
            for (commodity, impact) in &event.assessment.commodity_impact {
                let rollup = rollups.entry(*commodity).or_insert_with(|| CommodityRollup {
                    commodity: *commodity,
                    total_impact: 0.0,
                    event_count: 0,
                    events: Vec::new(),
                });
                rollup.total_impact += impact;
                rollup.event_count += 1;
                rollup.events.push(CommodityEventRef {
                    headline: event.event.headline.clone(),
                    impact: *impact,
                    priority: event.priority_score(),
                });
            }
        }
        let mut commodities: Vec<CommodityRollup> = rollups.into_values().collect();
        commodities.sort_by(|a, b| {
            b.total_impact
                .total_cmp(&a.total_impact)
                .then_with(|| a.commodity.cmp(&b.commodity))
        });

        Self {
            generated_at,
            hours_back,
            counts,
            commodities,
            sources,
            correlation,
            events,
        }
    }

    pub fn top_events(&self) -> &[ScoredEvent] {
        &self.events[..self.events.len().min(TOP_EVENTS)]
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let c = &self.counts;

        let _ = writeln!(md, "# Canadian Mining Intelligence: Breaking News\n");
        let _ = writeln!(
            md,
            "**Generated**: {} | **Window**: last {} hours\n",
            self.generated_at.date(),
            self.hours_back
        );

        let _ = writeln!(md, "## Overview\n");
        let _ = writeln!(md, "- **Headlines scanned**: {}", c.fetched);
        let _ = writeln!(md, "- **Total events**: {}", c.total);
        let _ = writeln!(md, "- **Critical**: {}", c.critical);
        let _ = writeln!(md, "- **High priority**: {}", c.high);
        let _ = writeln!(md, "- **Canadian relevant**: {}", c.canadian_relevant);
        let _ = writeln!(md, "- **Policy events**: {}", c.policy);
        let _ = writeln!(md, "- **Market events**: {}", c.market);
        let _ = writeln!(md, "- **Corporate events**: {}\n", c.corporate);

        if !self.correlation.sector_alerts.is_empty() {
            let _ = writeln!(md, "## Sector Alerts\n");
            for alert in &self.correlation.sector_alerts {
                let commodities: Vec<String> = alert.commodities.iter().map(|c| c.to_string()).collect();
                let _ = writeln!(
                    md,
                    "- **{}** ({}; {} companies exposed)",
                    alert.headline,
                    commodities.join(", "),
                    alert.companies_count
                );
            }
            md.push('\n');
        }

        let _ = writeln!(md, "## Top Events\n");
        if self.events.is_empty() {
            let _ = writeln!(md, "No breaking news in this window.\n");
        }
        for (i, scored) in self.top_events().iter().enumerate() {
            let _ = writeln!(md, "### {}. {}\n", i + 1, scored.event.headline);
            let _ = writeln!(
                md,
                "**Priority**: {:.1} | **Impact**: {} | **Type**: {} | **Canadian relevance**: {:.1}\n",
                scored.priority_score(),
                scored.assessment.impact_level,
                scored.assessment.event_type,
                scored.canadian_relevance()
            );
            if !scored.assessment.keywords.is_empty() {
                let _ = writeln!(md, "**Keywords**: {}\n", scored.assessment.keywords.join(", "));
            }
            if !scored.event.url.is_empty() {
                let _ = writeln!(md, "[View Link]({}) | {}\n", scored.event.url, scored.event.source);
            }
        }

        if !self.commodities.is_empty() {
            let _ = writeln!(md, "## Commodity Impact\n");
            let _ = writeln!(md, "| Commodity | Total impact | Events | Most affected |");
            let _ = writeln!(md, "|---|---|---|---|");
            for rollup in &self.commodities {
                let companies = self
                    .correlation
                    .commodity_impacts
                    .get(&rollup.commodity)
                    .map(|c| {
                        c.top_companies
                            .iter()
                            .map(|t| t.ticker.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                let _ = writeln!(
                    md,
                    "| {} | {:.1} | {} | {} |",
                    rollup.commodity.display_name(),
                    rollup.total_impact,
                    rollup.event_count,
                    companies
                );
            }
            md.push('\n');
        }

        if !self.correlation.affected_companies.is_empty() {
            let _ = writeln!(md, "## Companies In The News\n");
            for mention in &self.correlation.affected_companies {
                let flag = if mention.high_priority { " (tier 1)" } else { "" };
                let _ = writeln!(
                    md,
                    "- **{}** {}{}: {} ({:.1})",
                    mention.ticker, mention.name, flag, mention.event_headline, mention.priority_score
                );
            }
            md.push('\n');
        }

        let _ = writeln!(md, "## Sources\n");
        for outcome in &self.sources {
            let status = if outcome.success {
                format!("{} items", outcome.items)
            } else {
                format!("failed: {}", outcome.error.as_deref().unwrap_or("unknown error"))
            };
            let _ = writeln!(md, "- {}: {} ({} ms)", outcome.name, status, outcome.elapsed_ms);
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companies::{CompanyTable, Correlator};
    use news_scoring::{EventAnalyzer, NewsEvent};
    use time::macros::datetime;

    fn events() -> Vec<ScoredEvent> {
        let analyzer = EventAnalyzer::new().unwrap();
        let published = datetime!(2025-07-09 10:00 UTC);
        vec![
            analyzer.analyze(
                NewsEvent::new(
                    "Trump announces 50% tariff on copper imports",
                    "New copper tariffs for national security",
                    "https://example.com/tariff",
                    "mining_com",
                    published,
                ),
                1.0,
            ),
            analyzer.analyze(
                NewsEvent::new(
                    "Copper prices plunge in heavy trading",
                    "Teck Resources falls on Canadian exchange",
                    "https://example.com/plunge",
                    "mining_com",
                    published,
                ),
                1.0,
            ),
        ]
    }

    fn summary() -> ScanSummary {
        let events = events();
        let correlation = Correlator::new(CompanyTable::builtin())
            .unwrap()
            .correlate(&events);
        let outcome = SourceOutcome {
            name: "mining_com".to_string(),
            success: true,
            items: 2,
            error: None,
            elapsed_ms: 12,
        };
        ScanSummary::build(
            datetime!(2025-07-09 12:00 UTC),
            6,
            7,
            events,
            vec![outcome],
            correlation,
            25.0,
        )
    }

    #[test]
    fn test_counts_and_commodity_rollup() {
        let summary = summary();

        assert_eq!(summary.counts.fetched, 7);
        assert_eq!(summary.counts.total, 2);
        assert_eq!(summary.counts.critical, 2);
        assert_eq!(summary.counts.policy, 1);
        assert_eq!(summary.counts.market, 1);
        assert_eq!(summary.counts.canadian_relevant, 1);

        assert_eq!(summary.commodities.len(), 1);
        let copper = &summary.commodities[0];
        assert_eq!(copper.commodity, Commodity::Copper);
        assert_eq!(copper.event_count, 2);
        assert_eq!(copper.total_impact, 12.5);
    }

    #[test]
    fn test_markdown_sections() {
        let md = summary().to_markdown();

        assert!(md.starts_with("# Canadian Mining Intelligence: Breaking News"));
        assert!(md.contains("**Generated**: 2025-07-09"));
        assert!(md.contains("- **Headlines scanned**: 7"));
        assert!(md.contains("## Sector Alerts"));
        assert!(md.contains("### 1. Trump announces 50% tariff on copper imports"));
        assert!(md.contains("| Copper | 12.5 | 2 |"));
        assert!(md.contains("- **TECK-B** Teck Resources Limited"));
        assert!(md.contains("- mining_com: 2 items (12 ms)"));
    }

    #[test]
    fn test_empty_window_renders() {
        let summary = ScanSummary::build(
            datetime!(2025-07-09 12:00 UTC),
            6,
            0,
            Vec::new(),
            Vec::new(),
            CorrelationReport::default(),
            50.0,
        );
        assert!(summary.top_events().is_empty());
        assert!(summary.to_markdown().contains("No breaking news in this window."));
    }
}

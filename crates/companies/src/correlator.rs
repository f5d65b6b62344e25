use std::collections::{BTreeMap, HashSet};

use common::{Commodity, IntelError, IntelResult};
use news_scoring::{EventType, ImpactLevel, PhraseMatcher, ScoredEvent};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Company, Stage};
use crate::table::CompanyTable;

/// Companies listed per commodity when an event has no direct mentions.
pub const TOP_COMPANIES_PER_COMMODITY: usize = 5;

/// Tickers that are also ordinary English words; all-caps headlines use them as words.
const WORD_TICKERS: [&str; 24] = [
    "MINE", "GOLD", "ORE", "SEA", "MAG", "NEW", "ONE", "ALL", "BIG", "NOW", "CAN", "ARE",
    "FOR", "HAS", "SUN", "RED", "AIR", "CAR", "CASH", "LOW", "HIGH", "RISE", "TOP", "WAR",
];

const CORPORATE_SUFFIXES: [&str; 8] = [
    "corporation", "corp", "inc", "ltd", "limited", "plc", "co", "company",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    Ticker,
    Name,
    CommodityExposure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedCompany {
    pub ticker: String,
    pub name: String,
    pub mention: MentionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commodity: Option<Commodity>,
    pub intelligence_tier: u8,
    pub stage: Stage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    pub ticker: String,
    pub name: String,
    pub stage: Stage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommodityCorrelation {
    pub impact_score: f64,
    pub event_headline: String,
    pub companies_count: usize,
    pub top_companies: Vec<CompanySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyMention {
    pub ticker: String,
    pub name: String,
    pub event_id: String,
    pub event_headline: String,
    pub priority_score: f64,
    pub mention: MentionKind,
    pub high_priority: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAlert {
    pub event_id: String,
    pub headline: String,
    pub commodities: Vec<Commodity>,
    pub companies_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub commodity_impacts: BTreeMap<Commodity, CommodityCorrelation>,
    pub affected_companies: Vec<CompanyMention>,
    pub sector_alerts: Vec<SectorAlert>,
}

#[derive(Debug, Clone)]
struct CompanyMatcher {
    index: usize,
    ticker: Regex,
    names: Vec<PhraseMatcher>,
}

/// Joins scored events against the company table.
#[derive(Debug, Clone)]
pub struct Correlator {
    table: CompanyTable,
    matchers: Vec<CompanyMatcher>,
}

fn ticker_pattern(ticker: &str) -> IntelResult<Regex> {
    let escaped = regex::escape(ticker);
    // short and word-like tickers only count when written with an exchange
    // ("TSX: K", "K.TO", "TSXV: MINE")
    let bare_ok = ticker.chars().count() >= 3 && !WORD_TICKERS.contains(&ticker);
    let source = if bare_ok {
        format!(r"\b{}(?:\.(?:TO|V))?\b", escaped)
    } else {
        format!(r"(?:\bTSXV?:\s*{t}\b|\b{t}\.(?:TO|V)\b)", t = escaped)
    };
    Regex::new(&source).map_err(|e| IntelError::Parse(format!("ticker {:?}: {}", ticker, e)))
}

/// Company name without trailing corporate suffixes ("Hudbay Minerals Inc." -> "hudbay minerals").
pub fn short_name(name: &str) -> String {
    let mut words: Vec<String> = name
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c == '.' || c == ',').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    while words.len() > 1
        && words
            .last()
            .is_some_and(|w| CORPORATE_SUFFIXES.contains(&w.as_str()))
    {
        words.pop();
    }
    words.join(" ")
}

impl Correlator {
    pub fn new(table: CompanyTable) -> IntelResult<Self> {
        let mut matchers = Vec::with_capacity(table.len());

        for (index, company) in table.companies().iter().enumerate() {
            let mut phrases: Vec<String> = Vec::new();
            let short = short_name(company.name());
            if short.chars().count() >= 3 {
                phrases.push(short);
            }
            for alias in &company.record.aliases {
                let alias = alias.trim().to_lowercase();
                if alias.chars().count() >= 3 && !phrases.contains(&alias) {
                    phrases.push(alias);
                }
            }

            matchers.push(CompanyMatcher {
                index,
                ticker: ticker_pattern(company.ticker())?,
                names: phrases
                    .iter()
                    .map(|p| PhraseMatcher::exact(p))
                    .collect::<IntelResult<Vec<_>>>()?,
            });
        }

        Ok(Self { table, matchers })
    }

    pub fn table(&self) -> &CompanyTable {
        &self.table
    }

    fn company(&self, index: usize) -> &Company {
        &self.table.companies()[index]
    }

    fn direct_mentions(&self, text: &str) -> Vec<(usize, MentionKind)> {
        self.matchers
            .iter()
            .filter_map(|m| {
                if m.ticker.is_match(text) {
                    Some((m.index, MentionKind::Ticker))
                } else if m.names.iter().any(|n| n.is_match(text)) {
                    Some((m.index, MentionKind::Name))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Companies named in the event; when none are named, the top producers of
    /// each commodity the event touches, strongest commodity impact first.
    pub fn affected_companies(&self, event: &ScoredEvent) -> Vec<AffectedCompany> {
        let text = event.event.text();
        let direct = self.direct_mentions(&text);

        if !direct.is_empty() {
            return direct
                .into_iter()
                .map(|(index, mention)| to_affected(self.company(index), mention, None))
                .collect();
        }

        let mut commodities: Vec<(Commodity, f64)> = event
            .assessment
            .commodity_impact
            .iter()
            .map(|(c, impact)| (*c, *impact))
            .collect();
        commodities.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut seen = HashSet::new();
        let mut affected = Vec::new();
        for (commodity, _) in commodities {
            for company in self
                .table
                .by_commodity(commodity)
                .into_iter()
                .take(TOP_COMPANIES_PER_COMMODITY)
            {
                if seen.insert(company.ticker().to_string()) {
                    affected.push(to_affected(
                        company,
                        MentionKind::CommodityExposure,
                        Some(commodity),
                    ));
                }
            }
        }
        affected
    }

    pub fn correlate(&self, events: &[ScoredEvent]) -> CorrelationReport {
        let mut report = CorrelationReport::default();

        for event in events {
            for (commodity, impact) in &event.assessment.commodity_impact {
                let companies = self.table.by_commodity(*commodity);
                if companies.is_empty() {
                    continue;
                }

                // strongest event per commodity wins; ties keep the earlier one
                let replace = report
                    .commodity_impacts
                    .get(commodity)
                    .map_or(true, |existing| *impact > existing.impact_score);
                if !replace {
                    continue;
                }

                report.commodity_impacts.insert(
                    *commodity,
                    CommodityCorrelation {
                        impact_score: *impact,
                        event_headline: event.event.headline.clone(),
                        companies_count: companies.len(),
                        top_companies: companies
                            .iter()
                            .take(TOP_COMPANIES_PER_COMMODITY)
                            .map(|c| CompanySummary {
                                ticker: c.ticker().to_string(),
                                name: c.name().to_string(),
                                stage: c.classification.stage,
                            })
                            .collect(),
                    },
                );
            }

            for (index, mention) in self.direct_mentions(&event.event.text()) {
                let company = self.company(index);
                report.affected_companies.push(CompanyMention {
                    ticker: company.ticker().to_string(),
                    name: company.name().to_string(),
                    event_id: event.event.id.clone(),
                    event_headline: event.event.headline.clone(),
                    priority_score: event.priority_score(),
                    mention,
                    high_priority: company.tier().number() == 1,
                });
            }

            if event.assessment.event_type == EventType::Policy
                && event.assessment.impact_level == ImpactLevel::Critical
                && !event.assessment.commodity_impact.is_empty()
            {
                let commodities: Vec<Commodity> =
                    event.assessment.commodity_impact.keys().copied().collect();
                let exposed: HashSet<&str> = commodities
                    .iter()
                    .flat_map(|c| self.table.by_commodity(*c))
                    .map(|c| c.ticker())
                    .collect();
                report.sector_alerts.push(SectorAlert {
                    event_id: event.event.id.clone(),
                    headline: event.event.headline.clone(),
                    commodities,
                    companies_count: exposed.len(),
                });
            }
        }

        debug!(
            "Correlated {} events: {} commodities, {} mentions, {} alerts",
            events.len(),
            report.commodity_impacts.len(),
            report.affected_companies.len(),
            report.sector_alerts.len()
        );

        report
    }
}

fn to_affected(company: &Company, mention: MentionKind, commodity: Option<Commodity>) -> AffectedCompany {
    AffectedCompany {
        ticker: company.ticker().to_string(),
        name: company.name().to_string(),
        mention,
        commodity,
        intelligence_tier: company.tier().number(),
        stage: company.classification.stage,
    }
}

use std::collections::BTreeMap;

use common::{Commodity, IntelResult};
use tracing::debug;

use crate::keywords::{
    CategorySpec, COMMODITY_IMPACT_CAP, COMMODITY_TERMS, COMMODITY_TERM_POINTS, NEGATIVE_WORDS,
    POSITIVE_WORDS, PRICE_CONTEXT, PRICE_CONTEXT_BOOST, PRIORITY_CATEGORIES,
};
use crate::matcher::{compile_exact, compile_inflected, PhraseMatcher};
use crate::models::{
    round_one, CategoryKind, EventType, ImpactLevel, NewsEvent, PriorityAssessment, Sentiment,
};

#[derive(Debug, Clone)]
struct CompiledCategory {
    name: &'static str,
    kind: CategoryKind,
    points: f64,
    keywords: Vec<PhraseMatcher>,
    context: Vec<PhraseMatcher>,
}

#[derive(Debug, Clone)]
pub struct KeywordScorer {
    categories: Vec<CompiledCategory>,
    commodities: Vec<(Commodity, Vec<PhraseMatcher>)>,
    price_context: Vec<PhraseMatcher>,
    negative: Vec<PhraseMatcher>,
    positive: Vec<PhraseMatcher>,
}

impl KeywordScorer {
    pub fn new() -> IntelResult<Self> {
        Self::with_categories(PRIORITY_CATEGORIES)
    }

    fn with_categories(specs: &[CategorySpec]) -> IntelResult<Self> {
        let categories = specs
            .iter()
            .map(|spec| {
                Ok(CompiledCategory {
                    name: spec.name,
                    kind: spec.kind,
                    points: spec.points.max(0.0),
                    keywords: compile_inflected(spec.keywords)?,
                    context: compile_inflected(spec.requires_context)?,
                })
            })
            .collect::<IntelResult<Vec<_>>>()?;

        let commodities = COMMODITY_TERMS
            .iter()
            .map(|(commodity, terms)| Ok((*commodity, compile_exact(terms)?)))
            .collect::<IntelResult<Vec<_>>>()?;

        Ok(Self {
            categories,
            commodities,
            price_context: compile_inflected(PRICE_CONTEXT)?,
            negative: compile_inflected(NEGATIVE_WORDS)?,
            positive: compile_inflected(POSITIVE_WORDS)?,
        })
    }

    pub fn score_event(&self, event: &NewsEvent, source_weight: f64) -> PriorityAssessment {
        self.score(&event.text(), source_weight)
    }

    /// Scores free text. Each category adds its points once per distinct
    /// keyword found, and only when one of its context words is present.
    /// The total is scaled by `source_weight` (negative weights count as 0).
    pub fn score(&self, text: &str, source_weight: f64) -> PriorityAssessment {
        let mut priority_score = 0.0;
        let mut keywords = Vec::new();
        let mut categories = Vec::new();

        for category in &self.categories {
            let hits: Vec<&PhraseMatcher> = category
                .keywords
                .iter()
                .filter(|k| k.is_match(text))
                .collect();
            if hits.is_empty() {
                continue;
            }

            if !category.context.iter().any(|c| c.is_match(text)) {
                debug!(
                    "{}: {} keyword hits without context",
                    category.name,
                    hits.len()
                );
                continue;
            }

            priority_score += category.points * hits.len() as f64;
            keywords.extend(hits.iter().map(|k| k.phrase().to_string()));
            if !categories.contains(&category.kind) {
                categories.push(category.kind);
            }
        }

        let weight = if source_weight.is_finite() {
            source_weight.max(0.0)
        } else {
            0.0
        };
        let priority_score = round_one(priority_score * weight);

        PriorityAssessment {
            priority_score,
            event_type: EventType::from_kinds(&categories),
            impact_level: ImpactLevel::from_score(priority_score),
            keywords,
            categories,
            commodity_impact: self.commodity_impact(text),
            sentiment: self.sentiment(text),
        }
    }

    fn commodity_impact(&self, text: &str) -> BTreeMap<Commodity, f64> {
        let price_related = self.price_context.iter().any(|p| p.is_match(text));

        self.commodities
            .iter()
            .filter_map(|(commodity, terms)| {
                let hits = terms.iter().filter(|t| t.is_match(text)).count();
                if hits == 0 {
                    return None;
                }
                Some((*commodity, commodity_points(hits, price_related)))
            })
            .collect()
    }

    fn sentiment(&self, text: &str) -> Sentiment {
        let negative = self.negative.iter().filter(|w| w.is_match(text)).count();
        let positive = self.positive.iter().filter(|w| w.is_match(text)).count();

        if negative > positive {
            Sentiment::Negative
        } else if positive > negative {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }
}

fn commodity_points(hits: usize, price_related: bool) -> f64 {
    let mut impact = COMMODITY_TERM_POINTS * hits as f64;
    if price_related {
        impact *= PRICE_CONTEXT_BOOST;
    }
    impact.min(COMMODITY_IMPACT_CAP)
}

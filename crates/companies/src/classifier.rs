//! Stage, commodity and intelligence-tier classification for company rows.

use common::Commodity;

use crate::models::{
    Classification, CommodityCategory, CompanyRecord, Exchange, IntelligenceTier, MarketCapTier,
    OperationalStatus, Region, Stage,
};

const PRIMARY_PRIORITY: [Commodity; 7] = [
    Commodity::Gold,
    Commodity::Copper,
    Commodity::Silver,
    Commodity::Lithium,
    Commodity::Uranium,
    Commodity::Nickel,
    Commodity::Zinc,
];

const HIGH_PRIORITY_COMMODITIES: [Commodity; 5] = [
    Commodity::Gold,
    Commodity::Copper,
    Commodity::Silver,
    Commodity::Lithium,
    Commodity::Uranium,
];

const PRODUCER_NAME_WORDS: [&str; 5] = ["production", "producing", "mine", "mining", "operations"];
const EXPLORER_NAME_WORDS: [&str; 5] = ["exploration", "prospect", "discovery", "drilling", "claims"];

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

pub fn classify(record: &CompanyRecord) -> Classification {
    let (primary_commodity, commodity_category) = primary_commodity(record);
    let secondary_commodities = record
        .commodities
        .iter()
        .copied()
        .filter(|c| Some(*c) != primary_commodity)
        .collect();
    let (stage, operational_status) = company_stage(record);
    let canadian_operations_pct = canadian_operations_pct(record);
    let (intelligence_tier, tier_score) =
        intelligence_tier(record, stage, primary_commodity, canadian_operations_pct);

    Classification {
        primary_commodity,
        commodity_category,
        secondary_commodities,
        stage,
        operational_status,
        canadian_operations_pct,
        intelligence_tier,
        tier_score,
        market_cap_tier: market_cap_tier(market_cap(record)),
        hq_province: hq_province(record),
    }
}

const PROVINCES: [(&str, &str); 13] = [
    ("BC", "British Columbia"),
    ("AB", "Alberta"),
    ("SK", "Saskatchewan"),
    ("MB", "Manitoba"),
    ("ON", "Ontario"),
    ("QC", "Quebec"),
    ("NB", "New Brunswick"),
    ("NS", "Nova Scotia"),
    ("PE", "Prince Edward Island"),
    ("NL", "Newfoundland and Labrador"),
    ("YT", "Yukon"),
    ("NT", "Northwest Territories"),
    ("NU", "Nunavut"),
];

/// Expands a two-letter province code; anything else is kept as written.
pub fn hq_province(record: &CompanyRecord) -> Option<String> {
    let location = record.hq_location.as_deref()?.trim();
    if location.is_empty() {
        return None;
    }
    let code = location.to_ascii_uppercase();
    let province = PROVINCES
        .iter()
        .find(|(abbrev, _)| *abbrev == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| location.to_string());
    Some(province)
}

fn market_cap(record: &CompanyRecord) -> f64 {
    record
        .market_cap
        .filter(|cap| cap.is_finite() && *cap > 0.0)
        .unwrap_or(0.0)
}

/// A single exposure is primary; with several, the first of gold, copper,
/// silver, lithium, uranium, nickel, zinc wins, else the first listed.
pub fn primary_commodity(record: &CompanyRecord) -> (Option<Commodity>, CommodityCategory) {
    let exposed = &record.commodities;
    let primary = match exposed.len() {
        0 => None,
        1 => Some(exposed[0]),
        _ => PRIMARY_PRIORITY
            .iter()
            .copied()
            .find(|c| exposed.contains(c))
            .or_else(|| exposed.first().copied()),
    };
    (primary, CommodityCategory::of(primary))
}

pub fn company_stage(record: &CompanyRecord) -> (Stage, OperationalStatus) {
    if let Some(stage) = record.stage {
        return (stage, stage.default_status());
    }

    let cap = market_cap(record);
    let on_tsx = record.exchange == Exchange::Tsx;

    let (mut stage, mut status) = if cap >= BILLION {
        (Stage::Producer, OperationalStatus::Operating)
    } else if cap >= 500.0 * MILLION {
        if on_tsx {
            (Stage::Producer, OperationalStatus::Operating)
        } else {
            (Stage::Developer, OperationalStatus::Construction)
        }
    } else if cap >= 100.0 * MILLION {
        if on_tsx {
            (Stage::Producer, OperationalStatus::Operating)
        } else {
            (Stage::Developer, OperationalStatus::Permitting)
        }
    } else if cap >= 25.0 * MILLION {
        if on_tsx {
            (Stage::Developer, OperationalStatus::Construction)
        } else {
            (Stage::AdvancedExplorer, OperationalStatus::Feasibility)
        }
    } else if cap >= 5.0 * MILLION {
        (Stage::Explorer, OperationalStatus::Exploration)
    } else {
        (Stage::EarlyExplorer, OperationalStatus::EarlyExploration)
    };

    let name = record.name.to_lowercase();
    let words: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let named = |list: &[&str]| words.iter().any(|w| list.contains(w));

    if named(&PRODUCER_NAME_WORDS)
        && matches!(
            stage,
            Stage::Developer | Stage::Explorer | Stage::AdvancedExplorer
        )
    {
        stage = Stage::Producer;
        status = OperationalStatus::Operating;
    }
    if named(&EXPLORER_NAME_WORDS) && stage == Stage::Producer {
        stage = Stage::AdvancedExplorer;
        status = OperationalStatus::Exploration;
    }

    (stage, status)
}

/// Rough share of operations in Canada from the geography flags.
pub fn canadian_operations_pct(record: &CompanyRecord) -> f64 {
    let mut regions = record.geographies.clone();
    regions.sort_by_key(|r| *r as u8);
    regions.dedup();

    if regions.is_empty() {
        50.0
    } else if regions.contains(&Region::Canada) {
        (100.0 / regions.len() as f64).max(25.0)
    } else {
        0.0
    }
}

pub fn intelligence_tier(
    record: &CompanyRecord,
    stage: Stage,
    primary: Option<Commodity>,
    canadian_pct: f64,
) -> (IntelligenceTier, u32) {
    let cap = market_cap(record);
    let mut score = 0;

    score += if cap >= BILLION {
        40
    } else if cap >= 250.0 * MILLION {
        30
    } else if cap >= 50.0 * MILLION {
        20
    } else if cap >= 10.0 * MILLION {
        10
    } else {
        0
    };

    if record.exchange == Exchange::Tsx {
        score += 20;
    }

    score += stage.tier_points();

    score += if canadian_pct >= 80.0 {
        15
    } else if canadian_pct >= 50.0 {
        10
    } else if canadian_pct >= 25.0 {
        5
    } else {
        0
    };

    if primary.is_some_and(|c| HIGH_PRIORITY_COMMODITIES.contains(&c)) {
        score += 10;
    }

    (IntelligenceTier::from_score(score), score)
}

pub fn market_cap_tier(cap: f64) -> MarketCapTier {
    if cap >= 5.0 * BILLION {
        MarketCapTier::Mega
    } else if cap >= BILLION {
        MarketCapTier::Large
    } else if cap >= 250.0 * MILLION {
        MarketCapTier::Mid
    } else if cap >= 50.0 * MILLION {
        MarketCapTier::Small
    } else if cap >= 10.0 * MILLION {
        MarketCapTier::Micro
    } else {
        MarketCapTier::Nano
    }
}

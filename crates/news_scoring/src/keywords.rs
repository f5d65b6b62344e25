//! Keyword tables used to score mining headlines.

use common::Commodity;

use crate::models::CategoryKind;

#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub name: &'static str,
    pub kind: CategoryKind,
    pub keywords: &'static [&'static str],
    /// Points added for each distinct keyword found.
    pub points: f64,
    /// At least one of these must appear for the category to count.
    pub requires_context: &'static [&'static str],
}

pub const PRIORITY_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "policy_critical",
        kind: CategoryKind::Policy,
        keywords: &["tariff", "trade war", "sanctions", "embargo", "ban", "restriction"],
        points: 100.0,
        requires_context: &["mining", "commodity", "metal", "copper", "gold", "silver"],
    },
    CategorySpec {
        name: "regulatory_critical",
        kind: CategoryKind::Regulatory,
        keywords: &[
            "emergency",
            "national security",
            "government action",
            "federal",
            "policy change",
        ],
        points: 90.0,
        requires_context: &["mining", "commodity", "resource"],
    },
    CategorySpec {
        name: "price_critical",
        kind: CategoryKind::Price,
        keywords: &["plunge", "surge", "crash", "rally", "spike", "collapse"],
        points: 85.0,
        requires_context: &["copper", "gold", "silver", "platinum", "uranium", "mining"],
    },
    CategorySpec {
        name: "volatility_high",
        kind: CategoryKind::Volatility,
        keywords: &["volatile", "dramatic", "historic", "record", "unprecedented"],
        points: 75.0,
        requires_context: &["price", "trading", "market"],
    },
    CategorySpec {
        name: "ma_activity",
        kind: CategoryKind::MergersAcquisitions,
        keywords: &["acquisition", "merger", "takeover", "buyout", "deal"],
        points: 70.0,
        requires_context: &["mining", "canadian"],
    },
    CategorySpec {
        name: "earnings_critical",
        kind: CategoryKind::Earnings,
        keywords: &["earnings miss", "guidance cut", "surprise", "beat expectations"],
        points: 65.0,
        requires_context: &["mining", "canadian"],
    },
    CategorySpec {
        name: "operational_significant",
        kind: CategoryKind::Operational,
        keywords: &["production halt", "mine closure", "strike", "accident", "discovery"],
        points: 60.0,
        requires_context: &["mining", "canadian"],
    },
];

pub const CANADIAN_PLACES: &[&str] = &[
    "canada",
    "canadian",
    "tsx",
    "tsxv",
    "ontario",
    "quebec",
    "british columbia",
];

pub const PLACE_POINTS: f64 = 10.0;

pub const CANADIAN_COMPANIES: &[&str] = &[
    "barrick gold",
    "agnico eagle",
    "kinross",
    "first quantum",
    "lundin mining",
    "hudbay minerals",
    "teck resources",
    "franco nevada",
    "eldorado gold",
    "centerra gold",
    "iamgold",
    "osisko",
    "yamana",
    "b2gold",
    "torex gold",
    "seabridge gold",
    "alamos gold",
    "kirkland lake",
    "detour gold",
    "magna mining",
    "calibre mining",
    "endeavour mining",
    "pretium resources",
];

pub const COMPANY_POINTS: f64 = 15.0;

pub const COMMODITY_TERMS: &[(Commodity, &[&str])] = &[
    (Commodity::Copper, &["copper", "cu", "red metal", "industrial metal"]),
    (Commodity::Gold, &["gold", "au", "yellow metal", "precious metal"]),
    (Commodity::Silver, &["silver", "ag", "white metal"]),
    (Commodity::Platinum, &["platinum", "pt", "pgm"]),
    (Commodity::Uranium, &["uranium", "u3o8", "nuclear"]),
    (Commodity::IronOre, &["iron ore", "iron", "steel"]),
    (Commodity::Nickel, &["nickel", "ni"]),
    (Commodity::Zinc, &["zinc", "zn"]),
    (Commodity::Oil, &["oil", "crude", "petroleum", "wti", "brent"]),
    (Commodity::NaturalGas, &["natural gas", "lng", "gas"]),
];

pub const COMMODITY_TERM_POINTS: f64 = 5.0;
pub const PRICE_CONTEXT: &[&str] = &["price", "cost", "trading", "market"];
pub const PRICE_CONTEXT_BOOST: f64 = 1.5;
pub const COMMODITY_IMPACT_CAP: f64 = 50.0;

pub const NEGATIVE_WORDS: &[&str] = &[
    "plunge", "crash", "decline", "fall", "drop", "loss", "concern", "worry",
];

pub const POSITIVE_WORDS: &[&str] = &[
    "surge", "rally", "gain", "rise", "boost", "strong", "positive", "growth",
];

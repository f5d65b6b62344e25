//! Canadian mining company table: classification, tiering and event correlation.

pub mod builtin;
pub mod classifier;
pub mod correlator;
pub mod models;
pub mod table;

pub use classifier::classify;
pub use correlator::{
    AffectedCompany, CommodityCorrelation, CompanyMention, CompanySummary, CorrelationReport,
    Correlator, MentionKind, SectorAlert,
    short_name,
};
pub use models::{
    Classification, CommodityCategory, Company, CompanyRecord, Exchange, IntelligenceTier,
    MarketCapTier, OperationalStatus, Region, Stage,
};
pub use table::CompanyTable;

use std::fmt;

use common::Commodity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    #[default]
    Tsx,
    Tsxv,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Africa,
    Asia,
    AusNzPng,
    Canada,
    LatinAmerica,
    UkEurope,
    Usa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Producer,
    Developer,
    AdvancedExplorer,
    Explorer,
    EarlyExplorer,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Producer => "Producer",
            Stage::Developer => "Developer",
            Stage::AdvancedExplorer => "Advanced Explorer",
            Stage::Explorer => "Explorer",
            Stage::EarlyExplorer => "Early Explorer",
        }
    }

    pub fn default_status(&self) -> OperationalStatus {
        match self {
            Stage::Producer => OperationalStatus::Operating,
            Stage::Developer => OperationalStatus::Construction,
            Stage::AdvancedExplorer => OperationalStatus::Feasibility,
            Stage::Explorer => OperationalStatus::Exploration,
            Stage::EarlyExplorer => OperationalStatus::EarlyExploration,
        }
    }

    pub(crate) fn tier_points(&self) -> u32 {
        match self {
            Stage::Producer => 25,
            Stage::Developer => 20,
            Stage::AdvancedExplorer => 15,
            Stage::Explorer => 10,
            Stage::EarlyExplorer => 5,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalStatus {
    Operating,
    Construction,
    Permitting,
    Feasibility,
    Exploration,
    EarlyExploration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommodityCategory {
    PreciousMetals,
    BaseMetals,
    EnergyMetals,
    TechnologyMetals,
    IndustrialMinerals,
    Energy,
    Other,
}

impl CommodityCategory {
    pub fn of(commodity: Option<Commodity>) -> Self {
        match commodity {
            Some(Commodity::Gold | Commodity::Silver | Commodity::Platinum) => {
                CommodityCategory::PreciousMetals
            }
            Some(
                Commodity::Copper
                | Commodity::Nickel
                | Commodity::Lead
                | Commodity::Zinc
                | Commodity::IronOre,
            ) => CommodityCategory::BaseMetals,
            Some(Commodity::Uranium | Commodity::Coal) => CommodityCategory::EnergyMetals,
            Some(
                Commodity::Lithium
                | Commodity::RareEarths
                | Commodity::Molybdenum
                | Commodity::Tungsten,
            ) => CommodityCategory::TechnologyMetals,
            Some(Commodity::Potash | Commodity::Diamond) => CommodityCategory::IndustrialMinerals,
            Some(Commodity::Oil | Commodity::NaturalGas) => CommodityCategory::Energy,
            None => CommodityCategory::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCapTier {
    Nano,
    Micro,
    Small,
    Mid,
    Large,
    Mega,
}

/// Reporting-frequency bucket: 1 daily, 2 weekly, 3 monthly, 4 quarterly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct IntelligenceTier(u8);

impl IntelligenceTier {
    pub const DAILY: IntelligenceTier = IntelligenceTier(1);
    pub const WEEKLY: IntelligenceTier = IntelligenceTier(2);
    pub const MONTHLY: IntelligenceTier = IntelligenceTier(3);
    pub const QUARTERLY: IntelligenceTier = IntelligenceTier(4);

    pub fn new(tier: u8) -> Option<Self> {
        (1..=4).contains(&tier).then_some(IntelligenceTier(tier))
    }

    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => Self::DAILY,
            s if s >= 60 => Self::WEEKLY,
            s if s >= 40 => Self::MONTHLY,
            _ => Self::QUARTERLY,
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn cadence(&self) -> &'static str {
        match self.0 {
            1 => "Daily",
            2 => "Weekly",
            3 => "Monthly",
            _ => "Quarterly",
        }
    }
}

impl TryFrom<u8> for IntelligenceTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        IntelligenceTier::new(value).ok_or_else(|| format!("intelligence tier must be 1-4, got {}", value))
    }
}

impl From<IntelligenceTier> for u8 {
    fn from(tier: IntelligenceTier) -> u8 {
        tier.0
    }
}

impl fmt::Display for IntelligenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {} ({})", self.0, self.cadence())
    }
}

/// One row of the company sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub exchange: Exchange,
    /// Market capitalization in C$.
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub hq_location: Option<String>,
    #[serde(default)]
    pub commodities: Vec<Commodity>,
    #[serde(default)]
    pub geographies: Vec<Region>,
    /// Overrides the market-cap based stage estimate when set.
    #[serde(default)]
    pub stage: Option<Stage>,
    /// Extra names the company goes by in headlines.
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub primary_commodity: Option<Commodity>,
    pub commodity_category: CommodityCategory,
    pub secondary_commodities: Vec<Commodity>,
    pub stage: Stage,
    pub operational_status: OperationalStatus,
    pub canadian_operations_pct: f64,
    pub intelligence_tier: IntelligenceTier,
    pub tier_score: u32,
    pub market_cap_tier: MarketCapTier,
    /// Headquarters province or territory, full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hq_province: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(flatten)]
    pub record: CompanyRecord,
    pub classification: Classification,
}

impl Company {
    pub fn ticker(&self) -> &str {
        &self.record.ticker
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn tier(&self) -> IntelligenceTier {
        self.classification.intelligence_tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bounds() {
        assert_eq!(IntelligenceTier::from_score(80), IntelligenceTier::DAILY);
        assert_eq!(IntelligenceTier::from_score(79), IntelligenceTier::WEEKLY);
        assert_eq!(IntelligenceTier::from_score(40), IntelligenceTier::MONTHLY);
        assert_eq!(IntelligenceTier::from_score(0), IntelligenceTier::QUARTERLY);
        assert!(IntelligenceTier::new(0).is_none());
        assert!(IntelligenceTier::new(5).is_none());
        assert_eq!(IntelligenceTier::WEEKLY.to_string(), "Tier 2 (Weekly)");
    }

    #[test]
    fn test_tier_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<IntelligenceTier>("3").is_ok());
        assert!(serde_json::from_str::<IntelligenceTier>("7").is_err());
    }

    #[test]
    fn test_record_defaults_from_sparse_json() {
        let record: CompanyRecord =
            serde_json::from_str(r#"{"name": "Magna Mining Inc.", "ticker": "NICU", "exchange": "TSXV"}"#)
                .unwrap();
        assert_eq!(record.exchange, Exchange::Tsxv);
        assert!(record.market_cap.is_none());
        assert!(record.commodities.is_empty());
    }
}

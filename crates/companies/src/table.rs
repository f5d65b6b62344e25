use std::collections::HashMap;
use std::path::Path;

use common::{Commodity, IntelError, IntelResult};
use tracing::{info, warn};

use crate::builtin;
use crate::classifier::classify;
use crate::models::{Company, CompanyRecord, IntelligenceTier, Stage};

/// Classified companies with ticker lookup.
#[derive(Debug, Clone, Default)]
pub struct CompanyTable {
    companies: Vec<Company>,
    by_ticker: HashMap<String, usize>,
}

fn root_ticker(ticker: &str) -> String {
    let upper = ticker.trim().to_uppercase();
    upper
        .strip_suffix(".TO")
        .or_else(|| upper.strip_suffix(".V"))
        .unwrap_or(&upper)
        .to_string()
}

impl CompanyTable {
    pub fn from_records(records: Vec<CompanyRecord>) -> Self {
        let mut table = CompanyTable::default();

        for mut record in records {
            let key = root_ticker(&record.ticker);
            if key.is_empty() {
                warn!("Skipping company without ticker: {}", record.name);
                continue;
            }
            if table.by_ticker.contains_key(&key) {
                warn!("Duplicate ticker {} ({}); keeping first row", key, record.name);
                continue;
            }

            record.ticker = key.clone();
            let classification = classify(&record);
            table.by_ticker.insert(key, table.companies.len());
            table.companies.push(Company {
                record,
                classification,
            });
        }

        table
    }

    pub fn builtin() -> Self {
        Self::from_records(builtin::canadian_miners())
    }

    pub fn from_json_str(json: &str) -> IntelResult<Self> {
        let records: Vec<CompanyRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub async fn load(path: &Path) -> IntelResult<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            IntelError::Source(format!("reading company table {}: {}", path.display(), e))
        })?;
        let table = Self::from_json_str(&json)?;
        info!(
            "Loaded {} companies from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Loads the configured sheet, or the built-in miners when none is set.
    pub async fn load_or_builtin(path: Option<&Path>) -> IntelResult<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => {
                info!("No company table configured; using built-in Canadian miners");
                Ok(Self::builtin())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Accepts bare tickers as well as TSX (`.TO`) and TSXV (`.V`) forms.
    pub fn get(&self, ticker: &str) -> Option<&Company> {
        self.by_ticker
            .get(&root_ticker(ticker))
            .map(|&i| &self.companies[i])
    }

    pub fn by_tier(&self, tier: IntelligenceTier) -> Vec<&Company> {
        self.companies.iter().filter(|c| c.tier() == tier).collect()
    }

    pub fn by_stage(&self, stage: Stage) -> Vec<&Company> {
        self.companies
            .iter()
            .filter(|c| c.classification.stage == stage)
            .collect()
    }

    /// Companies whose primary commodity matches, highest tier score first.
    pub fn by_commodity(&self, commodity: Commodity) -> Vec<&Company> {
        let mut matches: Vec<&Company> = self
            .companies
            .iter()
            .filter(|c| c.classification.primary_commodity == Some(commodity))
            .collect();
        matches.sort_by(|a, b| {
            b.classification
                .tier_score
                .cmp(&a.classification.tier_score)
                .then_with(|| a.name().cmp(b.name()))
        });
        matches
    }

    pub fn high_priority_tickers(&self) -> Vec<&str> {
        self.by_tier(IntelligenceTier::DAILY)
            .into_iter()
            .map(|c| c.ticker())
            .collect()
    }

    pub fn tier_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for company in &self.companies {
            counts[usize::from(company.tier().number() - 1)] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"[
        {"name": "Big Copper Corp", "ticker": "BCC", "exchange": "TSX", "market_cap": 8000000000,
         "commodities": ["copper"], "geographies": ["canada"]},
        {"name": "Little Copper Ltd", "ticker": "LCL", "exchange": "TSXV", "market_cap": 20000000,
         "commodities": ["copper", "zinc"]},
        {"name": "Gold Hopeful Inc", "ticker": "GHI.V", "exchange": "TSXV", "market_cap": 3000000,
         "commodities": ["gold"]},
        {"name": "Duplicate Row", "ticker": "bcc", "commodities": ["gold"]}
    ]"#;

    #[test]
    fn test_lookup_accepts_exchange_suffixes() {
        let table = CompanyTable::from_json_str(SHEET).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("BCC.TO").unwrap().name(), "Big Copper Corp");
        assert_eq!(table.get("ghi").unwrap().name(), "Gold Hopeful Inc");
        assert_eq!(table.get("LCL.V").unwrap().ticker(), "LCL");
        assert!(table.get("NOPE").is_none());
    }

    #[test]
    fn test_by_commodity_sorted_by_tier_score() {
        let table = CompanyTable::from_json_str(SHEET).unwrap();
        let copper: Vec<&str> = table
            .by_commodity(Commodity::Copper)
            .iter()
            .map(|c| c.ticker())
            .collect();
        assert_eq!(copper, vec!["BCC", "LCL"]);
    }

    #[test]
    fn test_high_priority_tickers_are_tier_one() {
        let table = CompanyTable::from_json_str(SHEET).unwrap();
        assert_eq!(table.high_priority_tickers(), vec!["BCC"]);
        assert_eq!(table.tier_counts().iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_builtin_table_classifies_every_row() {
        let table = CompanyTable::builtin();
        assert_eq!(table.len(), 26);
        assert!(table.get("ABX.TO").is_some());
        assert_eq!(table.by_stage(Stage::Developer).len(), 2);
        assert!(!table.by_commodity(Commodity::Gold).is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_source_error() {
        let result = CompanyTable::load(Path::new("/definitely/not/here.json")).await;
        assert!(matches!(result, Err(IntelError::Source(_))));
    }
}

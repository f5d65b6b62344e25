use common::IntelResult;

use crate::keywords::{CANADIAN_COMPANIES, CANADIAN_PLACES, COMPANY_POINTS, PLACE_POINTS};
use crate::matcher::{compile_exact, PhraseMatcher};
use crate::models::{round_one, RelevanceAssessment};

/// Secondary "Canadian relevance" score from place and company names.
#[derive(Debug, Clone)]
pub struct RelevanceAugmenter {
    places: Vec<PhraseMatcher>,
    companies: Vec<PhraseMatcher>,
}

impl RelevanceAugmenter {
    pub fn new() -> IntelResult<Self> {
        Ok(Self {
            places: compile_exact(CANADIAN_PLACES)?,
            companies: compile_exact(CANADIAN_COMPANIES)?,
        })
    }

    /// Adds company names from the loaded company table to the built-in
    /// list. A name an existing entry already matches ("kinross gold" when
    /// "kinross" is known) is skipped so one mention is not counted twice.
    pub fn with_extra_companies<'a, I>(mut self, names: I) -> IntelResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            if self.companies.iter().any(|c| c.is_match(name)) {
                continue;
            }
            self.companies.push(PhraseMatcher::exact(name)?);
        }
        Ok(self)
    }

    pub fn assess(&self, text: &str) -> RelevanceAssessment {
        let places: Vec<String> = self
            .places
            .iter()
            .filter(|p| p.is_match(text))
            .map(|p| p.phrase().to_string())
            .collect();
        let companies: Vec<String> = self
            .companies
            .iter()
            .filter(|c| c.is_match(text))
            .map(|c| c.phrase().to_string())
            .collect();

        let score = PLACE_POINTS * places.len() as f64 + COMPANY_POINTS * companies.len() as f64;

        RelevanceAssessment {
            canadian_relevance: round_one(score),
            places,
            companies,
        }
    }
}

use regex::Regex;

use common::{IntelError, IntelResult};

/// Case-insensitive whole-word match for a keyword or multi-word phrase.
///
/// Words inside a phrase may be separated by any run of whitespace or
/// hyphens, so "franco nevada" also finds "Franco-Nevada". An inflected
/// matcher additionally accepts simple English endings on the last word
/// ("surge" finds "surges" and "surged", "rally" finds "rallies").
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    phrase: String,
    pattern: Regex,
}

impl PhraseMatcher {
    pub fn exact(phrase: &str) -> IntelResult<Self> {
        Self::build(phrase, false)
    }

    pub fn inflected(phrase: &str) -> IntelResult<Self> {
        Self::build(phrase, true)
    }

    fn build(phrase: &str, inflect: bool) -> IntelResult<Self> {
        let words: Vec<String> = phrase
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();
        if words.is_empty() {
            return Err(IntelError::Parse("empty keyword".to_string()));
        }

        let last = words.len() - 1;
        let parts: Vec<String> = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                if inflect && i == last {
                    inflect_word(word)
                } else {
                    regex::escape(word)
                }
            })
            .collect();

        let source = format!(r"(?i)\b{}\b", parts.join(r"[\s\-]+"));
        let pattern = Regex::new(&source)
            .map_err(|e| IntelError::Parse(format!("keyword {:?}: {}", phrase, e)))?;

        Ok(Self {
            phrase: words.join(" "),
            pattern,
        })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

fn inflect_word(word: &str) -> String {
    // only ASCII keywords get suffix rules; anything else matches as written
    if !word.is_ascii() || word.len() < 3 {
        return regex::escape(word);
    }
    if let Some(stem) = word.strip_suffix('e') {
        format!("{}(?:e|es|ed|ing)", regex::escape(stem))
    } else if let Some(stem) = word.strip_suffix('y') {
        format!("{}(?:y|ies|ied|ying)", regex::escape(stem))
    } else {
        format!("{}(?:s|es|ed|ing)?", regex::escape(word))
    }
}

pub fn compile_exact(phrases: &[&str]) -> IntelResult<Vec<PhraseMatcher>> {
    phrases.iter().map(|p| PhraseMatcher::exact(p)).collect()
}

pub fn compile_inflected(phrases: &[&str]) -> IntelResult<Vec<PhraseMatcher>> {
    phrases.iter().map(|p| PhraseMatcher::inflected(p)).collect()
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::IntelResult;

/// A headline as delivered by a source, before any scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHeadline {
    #[serde(alias = "headline")]
    pub title: String,
    #[serde(default, alias = "description")]
    pub summary: String,
    #[serde(default, alias = "link")]
    pub url: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published: Option<OffsetDateTime>,
}

#[async_trait]
pub trait HeadlineSource: Send + Sync {
    fn name(&self) -> &str;

    /// Multiplier applied to priority scores of this source's headlines.
    fn weight(&self) -> f64 {
        1.0
    }

    async fn fetch(&self) -> IntelResult<Vec<RawHeadline>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub name: String,
    pub success: bool,
    pub items: usize,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone)]
pub struct SourceFetch {
    pub source: String,
    pub weight: f64,
    pub headlines: Vec<RawHeadline>,
}

#[derive(Debug, Default)]
pub struct SourceBatch {
    pub fetches: Vec<SourceFetch>,
    pub outcomes: Vec<SourceOutcome>,
}

impl SourceBatch {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn headline_count(&self) -> usize {
        self.fetches.iter().map(|f| f.headlines.len()).sum()
    }
}

#[derive(Default)]
pub struct SourceManager {
    sources: Vec<Arc<dyn HeadlineSource>>,
}

impl SourceManager {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn add_source(mut self, source: Arc<dyn HeadlineSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fetches every source concurrently. A failing source only shows up as an
    /// unsuccessful outcome; the batch itself never fails.
    pub async fn run_all(&self) -> SourceBatch {
        let mut tasks = JoinSet::new();
        let mut names = HashMap::new();

        for source in &self.sources {
            let source = Arc::clone(source);
            let name = source.name().to_string();
            let handle = tasks.spawn(async move {
                let started = Instant::now();
                let result = source.fetch().await;
                let elapsed_ms = started.elapsed().as_millis() as u64;
                (source.weight(), result, elapsed_ms)
            });
            names.insert(handle.id(), name);
        }

        let mut batch = SourceBatch::default();

        while let Some(joined) = tasks.join_next_with_id().await {
            let (name, (weight, result, elapsed_ms)) = match joined {
                Ok((id, done)) => (names.remove(&id).unwrap_or_default(), done),
                Err(e) => {
                    let name = names.remove(&e.id()).unwrap_or_default();
                    warn!("{} panicked or was cancelled: {}", name, e);
                    batch.outcomes.push(SourceOutcome {
                        name,
                        success: false,
                        items: 0,
                        error: Some(e.to_string()),
                        elapsed_ms: 0,
                    });
                    continue;
                }
            };

            match result {
                Ok(headlines) => {
                    info!("{} returned {} headlines", name, headlines.len());
                    batch.outcomes.push(SourceOutcome {
                        name: name.clone(),
                        success: true,
                        items: headlines.len(),
                        error: None,
                        elapsed_ms,
                    });
                    batch.fetches.push(SourceFetch {
                        source: name,
                        weight,
                        headlines,
                    });
                }
                Err(e) => {
                    warn!("{} failed: {}", name, e);
                    batch.outcomes.push(SourceOutcome {
                        name,
                        success: false,
                        items: 0,
                        error: Some(e.to_string()),
                        elapsed_ms,
                    });
                }
            }
        }

        // join order is completion order; keep reports stable
        batch.outcomes.sort_by(|a, b| a.name.cmp(&b.name));
        batch.fetches.sort_by(|a, b| a.source.cmp(&b.source));

        info!(
            "All sources finished. Successful: {}, Failed: {}",
            batch.success_count(),
            batch.failure_count()
        );

        batch
    }
}

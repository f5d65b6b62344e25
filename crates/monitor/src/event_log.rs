use std::collections::HashMap;
use std::path::{Path, PathBuf};

use common::{IntelResult, MAX_HOURS_BACK};
use news_scoring::ScoredEvent;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

/// Days a stored event survives when no retention is configured.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Scored events kept across scans in one JSON file, keyed by event id.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
    retention: Duration,
}

/// Start of a look-back window; the window is clamped to `0..=MAX_HOURS_BACK` hours.
pub(crate) fn window_start(now: OffsetDateTime, hours_back: i64) -> OffsetDateTime {
    now - Duration::hours(hours_back.clamp(0, MAX_HOURS_BACK))
}

fn by_priority_then_recency(a: &ScoredEvent, b: &ScoredEvent) -> std::cmp::Ordering {
    b.priority_score()
        .total_cmp(&a.priority_score())
        .then_with(|| b.event.published.cmp(&a.event.published))
}

pub(crate) fn sort_events(events: &mut [ScoredEvent]) {
    events.sort_by(by_priority_then_recency);
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retention: Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }

    /// Events published more than `days` ago are dropped on the next upsert.
    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention = Duration::days(days.clamp(1, 3660));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored events; a log that does not exist yet is empty.
    pub async fn load(&self) -> IntelResult<Vec<ScoredEvent>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Inserts new events and replaces stored ones with the same id.
    pub async fn upsert(&self, events: &[ScoredEvent]) -> IntelResult<usize> {
        self.upsert_at(OffsetDateTime::now_utc(), events).await
    }

    /// Upsert as of `now`: stored events older than the retention are pruned,
    /// and the file is replaced through a temp file so a crash never leaves it
    /// half written.
    pub async fn upsert_at(&self, now: OffsetDateTime, events: &[ScoredEvent]) -> IntelResult<usize> {
        if events.is_empty() {
            return Ok(0);
        }

        let mut stored: HashMap<String, ScoredEvent> = self
            .load()
            .await?
            .into_iter()
            .map(|e| (e.event.id.clone(), e))
            .collect();
        for event in events {
            stored.insert(event.event.id.clone(), event.clone());
        }

        let expired_before = now - self.retention;
        let before = stored.len();
        let mut all: Vec<ScoredEvent> = stored
            .into_values()
            .filter(|e| e.event.published >= expired_before)
            .collect();
        if all.len() < before {
            debug!("Pruned {} expired events from {}", before - all.len(), self.path.display());
        }
        sort_events(&mut all);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_string_pretty(&all)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        info!(
            "Saved {} breaking news events to {} ({} total)",
            events.len(),
            self.path.display(),
            all.len()
        );
        Ok(events.len())
    }

    /// Events published in the last `hours_back` hours scoring at least
    /// `min_priority`, highest priority first.
    pub async fn recent(&self, hours_back: i64, min_priority: f64) -> IntelResult<Vec<ScoredEvent>> {
        self.recent_at(OffsetDateTime::now_utc(), hours_back, min_priority)
            .await
    }

    pub async fn recent_at(
        &self,
        now: OffsetDateTime,
        hours_back: i64,
        min_priority: f64,
    ) -> IntelResult<Vec<ScoredEvent>> {
        let cutoff = window_start(now, hours_back);
        let mut events: Vec<ScoredEvent> = self
            .load()
            .await?
            .into_iter()
            .filter(|e| e.event.published >= cutoff && e.priority_score() >= min_priority)
            .collect();
        sort_events(&mut events);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_scoring::{EventAnalyzer, NewsEvent};
    use time::macros::datetime;

    fn scratch_log(tag: &str) -> EventLog {
        EventLog::new(std::env::temp_dir().join(format!(
            "mining-event-log-{}-{}-{}/breaking_news.json",
            tag,
            std::process::id(),
            OffsetDateTime::now_utc().unix_timestamp_nanos()
        )))
    }

    fn scored(headline: &str, published: OffsetDateTime, weight: f64) -> ScoredEvent {
        let analyzer = EventAnalyzer::new().unwrap();
        let event = NewsEvent::new(headline, "", "https://example.com/a", "test", published);
        analyzer.analyze(event, weight)
    }

    #[tokio::test]
    async fn test_missing_log_is_empty() {
        let log = scratch_log("missing");
        assert!(log.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let log = scratch_log("upsert");
        let published = datetime!(2025-07-09 12:00 UTC);

        let first = scored("Copper tariff shocks mining sector", published, 1.0);
        log.upsert_at(published, &[first.clone()]).await.unwrap();

        // same headline and url, so same id; rescored with a lower weight
        let rescored = scored("Copper tariff shocks mining sector", published, 0.5);
        assert_eq!(first.event.id, rescored.event.id);
        log.upsert_at(published, &[rescored]).await.unwrap();

        let stored = log.load().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].priority_score(), first.priority_score() * 0.5);

        if let Some(dir) = log.path().parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn test_recent_filters_by_age_and_priority() {
        let log = scratch_log("recent");
        let now = datetime!(2025-07-09 12:00 UTC);

        let fresh = scored("Copper tariff shocks mining sector", now - Duration::hours(2), 1.0);
        let stale = scored("Gold embargo hits mining stocks", now - Duration::hours(30), 1.0);
        let weak = scored("Copper tariff talk for mining", now - Duration::hours(1), 0.3);
        log.upsert_at(now, &[fresh.clone(), stale, weak]).await.unwrap();

        let recent = log.recent_at(now, 24, 50.0).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].event.id, fresh.event.id);

        if let Some(dir) = log.path().parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn test_upsert_prunes_events_past_retention() {
        let log = scratch_log("retention").with_retention_days(7);
        let now = datetime!(2025-07-09 12:00 UTC);

        let old = scored("Gold embargo hits mining stocks", now - Duration::days(10), 1.0);
        log.upsert_at(now - Duration::days(10), &[old.clone()]).await.unwrap();
        assert_eq!(log.load().await.unwrap().len(), 1);

        let fresh = scored("Copper tariff shocks mining sector", now - Duration::hours(2), 1.0);
        log.upsert_at(now, &[fresh.clone()]).await.unwrap();

        let stored = log.load().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].event.id, fresh.event.id);
        assert!(tokio::fs::metadata(log.path().with_extension("json.tmp")).await.is_err());

        if let Some(dir) = log.path().parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn test_huge_window_does_not_overflow() {
        let log = scratch_log("window");
        let now = datetime!(2025-07-09 12:00 UTC);

        let fresh = scored("Copper tariff shocks mining sector", now - Duration::hours(2), 1.0);
        log.upsert_at(now, &[fresh]).await.unwrap();

        assert_eq!(log.recent_at(now, i64::MAX, 0.0).await.unwrap().len(), 1);
        assert!(log.recent_at(now, -5, 0.0).await.unwrap().is_empty());
        assert_eq!(window_start(now, i64::MAX), now - Duration::hours(MAX_HOURS_BACK));

        if let Some(dir) = log.path().parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }
}

//! Breaking-news monitor: fetch headlines, score them, correlate them with
//! Canadian miners and write the daily report.

pub mod event_log;
pub mod scan;
pub mod sources;
pub mod summary;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use common::{Config, HeadlineSource, IntelResult, ReportStore, SourceManager};
use companies::{short_name, CompanyTable, Correlator};
use news_scoring::EventAnalyzer;
use tracing::{info, warn};

pub use event_log::EventLog;
pub use scan::{Monitor, ScanResult};
pub use sources::{HttpJsonSource, JsonFileSource, SourceLocation, SourceSpec};
pub use summary::ScanSummary;

pub const JSON_REPORT: &str = "breaking-news.json";
pub const MARKDOWN_REPORT: &str = "mining-intelligence.md";

/// Local files given on the command line, or the configured sources file.
pub async fn source_manager(config: &Config, inputs: &[PathBuf]) -> IntelResult<SourceManager> {
    if !inputs.is_empty() {
        let manager = inputs.iter().fold(SourceManager::new(), |manager, path| {
            let source: Arc<dyn HeadlineSource> = Arc::new(JsonFileSource::from_path(path.clone()));
            manager.add_source(source)
        });
        return Ok(manager);
    }

    let specs = sources::load_specs(config.require_sources_path()?).await?;
    sources::build_manager(&specs, &config.fetch)
}

/// One full monitoring pass: scan, persist breaking events, merge with what
/// the log already holds for the window, and write both reports.
pub async fn run_scan(config: &Config, inputs: &[PathBuf]) -> IntelResult<ScanSummary> {
    let table = CompanyTable::load_or_builtin(config.companies_path.as_deref()).await?;
    let counts = table.tier_counts();
    info!(
        "Company table: {} companies (tier 1-4: {:?})",
        table.len(),
        counts
    );

    // table names also count toward Canadian relevance
    let names: Vec<String> = table
        .companies()
        .iter()
        .map(|c| short_name(c.name()))
        .filter(|n| n.chars().count() >= 3)
        .collect();
    let analyzer = EventAnalyzer::with_company_names(names.iter().map(String::as_str))?;

    let monitor = Monitor::new(analyzer, Correlator::new(table)?, config.scoring.clone());
    let sources = source_manager(config, inputs).await?;

    let result = monitor.scan(&sources, config.hours_back).await;

    // a damaged or unwritable log costs the merge, not the report
    let log = EventLog::new(config.event_log_path()).with_retention_days(config.log_retention_days);
    if let Err(e) = log
        .upsert(&result.breaking(config.scoring.breaking_threshold))
        .await
    {
        warn!("Could not update event log {}: {}", log.path().display(), e);
    }
    let stored = match log
        .recent(config.hours_back, config.scoring.breaking_threshold)
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Could not read event log {}: {}", log.path().display(), e);
            Vec::new()
        }
    };

    let mut seen: HashSet<String> = result.events.iter().map(|e| e.event.id.clone()).collect();
    let mut events = result.events;
    events.extend(stored.into_iter().filter(|e| seen.insert(e.event.id.clone())));
    event_log::sort_events(&mut events);

    let correlation = monitor.correlator().correlate(&events);
    let summary = ScanSummary::build(
        result.scanned_at,
        result.hours_back,
        result.fetched,
        events,
        result.outcomes,
        correlation,
        config.scoring.canadian_relevance_threshold,
    );

    let store = ReportStore::new(&config.reports_dir);
    let date = summary.generated_at.date();
    store
        .write_for(date, JSON_REPORT, &serde_json::to_string_pretty(&summary)?)
        .await?;
    let markdown_path = store
        .write_for(date, MARKDOWN_REPORT, &summary.to_markdown())
        .await?;

    info!(
        "Scan complete: {} events ({} critical), report at {}",
        summary.counts.total,
        summary.counts.critical,
        markdown_path.display()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "mining-monitor-{}-{}-{}",
            tag,
            std::process::id(),
            OffsetDateTime::now_utc().unix_timestamp_nanos()
        ))
    }

    #[tokio::test]
    async fn test_run_scan_writes_reports_and_log() {
        let root = scratch_dir("run");
        tokio::fs::create_dir_all(&root).await.unwrap();

        let published = (OffsetDateTime::now_utc() - time::Duration::hours(1))
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();
        let feed = root.join("mining_com.json");
        let json = format!(
            r#"[
                {{"title": "Trump announces 50% tariff on copper imports",
                  "summary": "<p>New copper tariffs for national security</p>",
                  "url": "https://example.com/tariff", "published": "{p}"}},
                {{"title": "Weather is nice today", "url": "https://example.com/weather", "published": "{p}"}}
            ]"#,
            p = published
        );
        tokio::fs::write(&feed, json).await.unwrap();

        let config = Config {
            reports_dir: root.join("reports"),
            data_dir: root.join("data"),
            ..Config::default()
        };

        let summary = run_scan(&config, &[feed]).await.unwrap();

        assert_eq!(summary.counts.fetched, 2);
        assert_eq!(summary.counts.total, 1);
        assert_eq!(summary.sources.len(), 1);
        assert!(summary.sources[0].success);
        assert_eq!(summary.correlation.sector_alerts.len(), 1);

        let dated = root.join("reports").join(summary.generated_at.date().to_string());
        let markdown = tokio::fs::read_to_string(dated.join(MARKDOWN_REPORT)).await.unwrap();
        assert!(markdown.contains("Trump announces 50% tariff on copper imports"));
        assert!(tokio::fs::metadata(dated.join(JSON_REPORT)).await.is_ok());

        let logged = EventLog::new(config.event_log_path()).load().await.unwrap();
        assert_eq!(logged.len(), 1);

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_run_scan_survives_corrupt_event_log() {
        let root = scratch_dir("corrupt");
        let data_dir = root.join("data");
        tokio::fs::create_dir_all(&data_dir).await.unwrap();

        let feed = root.join("desk.json");
        let published = OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();
        let json = format!(
            r#"[{{"title": "Trump announces 50% tariff on copper imports",
                 "summary": "New copper tariffs for national security",
                 "url": "https://example.com/tariff", "published": "{}"}}]"#,
            published
        );
        tokio::fs::write(&feed, json).await.unwrap();

        let config = Config {
            reports_dir: root.join("reports"),
            data_dir,
            ..Config::default()
        };
        tokio::fs::write(config.event_log_path(), r#"[{"trunc"#).await.unwrap();

        let summary = run_scan(&config, &[feed]).await.unwrap();
        assert_eq!(summary.counts.total, 1);

        let dated = root.join("reports").join(summary.generated_at.date().to_string());
        assert!(tokio::fs::metadata(dated.join(JSON_REPORT)).await.is_ok());
        assert!(tokio::fs::metadata(dated.join(MARKDOWN_REPORT)).await.is_ok());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_table_names_feed_canadian_relevance() {
        let root = scratch_dir("names");
        tokio::fs::create_dir_all(&root).await.unwrap();

        let companies = root.join("companies.json");
        tokio::fs::write(
            &companies,
            r#"[{"ticker": "NDM", "name": "Northern Dawn Minerals Corp.", "exchange": "TSXV"}]"#,
        )
        .await
        .unwrap();

        let feed = root.join("desk.json");
        let published = OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();
        let json = format!(
            r#"[{{"title": "Copper tariff shocks Northern Dawn Minerals and the mining sector",
                 "url": "https://example.com/ndm", "published": "{}"}}]"#,
            published
        );
        tokio::fs::write(&feed, json).await.unwrap();

        let config = Config {
            reports_dir: root.join("reports"),
            data_dir: root.join("data"),
            companies_path: Some(companies),
            ..Config::default()
        };

        let summary = run_scan(&config, &[feed]).await.unwrap();
        assert_eq!(summary.events.len(), 1);
        assert!(summary.events[0].canadian_relevance() >= 15.0);
        assert!(summary.events[0]
            .relevance
            .companies
            .iter()
            .any(|c| c == "northern dawn minerals"));

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_scan_without_sources_is_config_error() {
        let config = Config::default();
        let result = source_manager(&config, &[]).await;
        assert!(matches!(result, Err(common::IntelError::Config(_))));
    }
}

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::{Result, Context};

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub min_priority_score: f64,
    pub breaking_threshold: f64,
    pub canadian_relevance_threshold: f64,
    pub max_entries_per_source: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_priority_score: 30.0,
            breaking_threshold: 50.0,
            canadian_relevance_threshold: 50.0,
            max_entries_per_source: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub retries: u32,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            request_delay_ms: 500,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub hour: u32,
    pub minute: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { hour: 9, minute: 0 }
    }
}

/// Longest look-back window a scan or log query accepts (one year).
pub const MAX_HOURS_BACK: i64 = 24 * 366;

#[derive(Debug, Clone)]
pub struct Config {
    pub reports_dir: PathBuf,
    pub data_dir: PathBuf,
    pub companies_path: Option<PathBuf>,
    pub sources_path: Option<PathBuf>,
    pub hours_back: i64,
    /// Stored events older than this are pruned from the event log.
    pub log_retention_days: i64,
    pub scoring: ScoringConfig,
    pub fetch: FetchConfig,
    pub schedule: ScheduleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            data_dir: PathBuf::from("data/processed"),
            companies_path: None,
            sources_path: None,
            hours_back: 6,
            log_retention_days: 30,
            scoring: ScoringConfig::default(),
            fetch: FetchConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let scoring = ScoringConfig {
            min_priority_score: env_or("MINING_MIN_PRIORITY", defaults.scoring.min_priority_score),
            breaking_threshold: env_or(
                "MINING_BREAKING_THRESHOLD",
                defaults.scoring.breaking_threshold,
            ),
            canadian_relevance_threshold: env_or(
                "MINING_CANADIAN_THRESHOLD",
                defaults.scoring.canadian_relevance_threshold,
            ),
            max_entries_per_source: env_or(
                "MINING_MAX_ENTRIES_PER_SOURCE",
                defaults.scoring.max_entries_per_source,
            ),
        };

        let fetch = FetchConfig {
            retries: env_or("MINING_FETCH_RETRIES", defaults.fetch.retries),
            request_delay_ms: env_or("MINING_REQUEST_DELAY_MS", defaults.fetch.request_delay_ms),
            request_timeout_secs: env_or(
                "MINING_REQUEST_TIMEOUT_SECS",
                defaults.fetch.request_timeout_secs,
            ),
        };

        let schedule = ScheduleConfig {
            hour: env_or("MINING_SCHEDULE_HOUR", defaults.schedule.hour),
            minute: env_or("MINING_SCHEDULE_MINUTE", defaults.schedule.minute),
        };
        let config = Config {
            reports_dir: env::var("MINING_REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.reports_dir),
            data_dir: env::var("MINING_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            companies_path: env::var("MINING_COMPANIES_PATH").ok().map(PathBuf::from),
            sources_path: env::var("MINING_SOURCES_PATH").ok().map(PathBuf::from),
            hours_back: env_or("MINING_HOURS_BACK", defaults.hours_back),
            log_retention_days: env_or("MINING_LOG_RETENTION_DAYS", defaults.log_retention_days),
            scoring,
            fetch,
            schedule,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schedule.hour > 23 || self.schedule.minute > 59 {
            anyhow::bail!(
                "MINING_SCHEDULE_HOUR/MINUTE out of range: {:02}:{:02}",
                self.schedule.hour,
                self.schedule.minute
            );
        }
        if !(1..=MAX_HOURS_BACK).contains(&self.hours_back) {
            anyhow::bail!(
                "MINING_HOURS_BACK must be between 1 and {}, got {}",
                MAX_HOURS_BACK,
                self.hours_back
            );
        }
        if !(1..=3660).contains(&self.log_retention_days) {
            anyhow::bail!(
                "MINING_LOG_RETENTION_DAYS must be between 1 and 3660, got {}",
                self.log_retention_days
            );
        }
        Ok(())
    }

    pub fn require_sources_path(&self) -> Result<&PathBuf> {
        self.sources_path
            .as_ref()
            .context("MINING_SOURCES_PATH must be set")
    }

    pub fn event_log_path(&self) -> PathBuf {
        self.data_dir.join("breaking_news.json")
    }
}

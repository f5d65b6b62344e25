use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{FetchConfig, HeadlineSource, IntelError, IntelResult, RawHeadline, SourceManager};
use reqwest::Client;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

fn default_weight() -> f64 {
    1.0
}

/// Where a source's headlines come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceLocation {
    File { path: PathBuf },
    Http { url: String },
}

/// One entry of the sources file.
///
/// ```json
/// [{"name": "mining_com", "type": "http", "url": "https://...", "weight": 0.9}]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(flatten)]
    pub location: SourceLocation,
}

pub async fn load_specs(path: &Path) -> IntelResult<Vec<SourceSpec>> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        IntelError::Source(format!("reading sources file {}: {}", path.display(), e))
    })?;
    let specs: Vec<SourceSpec> = serde_json::from_str(&json)?;
    info!("Loaded {} source definitions from {}", specs.len(), path.display());
    Ok(specs)
}

pub fn build_manager(specs: &[SourceSpec], fetch: &FetchConfig) -> IntelResult<SourceManager> {
    let mut manager = SourceManager::new();
    for spec in specs {
        let source: Arc<dyn HeadlineSource> = match &spec.location {
            SourceLocation::File { path } => {
                Arc::new(JsonFileSource::new(&spec.name, path.clone(), spec.weight))
            }
            SourceLocation::Http { url } => {
                Arc::new(HttpJsonSource::new(&spec.name, url, spec.weight, fetch)?)
            }
        };
        manager = manager.add_source(source);
    }
    Ok(manager)
}

/// Markup to plain text, whitespace collapsed.
pub fn clean_html(html: &str) -> String {
    let text = Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes each array entry on its own; malformed entries are logged and skipped.
fn decode_headlines(source: &str, entries: Vec<serde_json::Value>) -> Vec<RawHeadline> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawHeadline>(entry) {
            Ok(headline) => Some(headline),
            Err(e) => {
                warn!("{}: skipping malformed entry: {}", source, e);
                None
            }
        })
        .map(|mut h| {
            h.title = clean_html(&h.title);
            h.summary = clean_html(&h.summary);
            h
        })
        .filter(|h| !h.title.is_empty())
        .collect()
}

/// Headlines exported to a local JSON array.
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
    weight: f64,
}

impl JsonFileSource {
    pub fn new(name: &str, path: PathBuf, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            path,
            weight,
        }
    }

    /// Names the source after the file stem (`feeds/mining_com.json` -> `mining_com`).
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        Self::new(&name, path, default_weight())
    }
}

#[async_trait]
impl HeadlineSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    async fn fetch(&self) -> IntelResult<Vec<RawHeadline>> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            IntelError::Source(format!("{}: reading {}: {}", self.name, self.path.display(), e))
        })?;
        let entries: Vec<serde_json::Value> = serde_json::from_str(&json)?;
        Ok(decode_headlines(&self.name, entries))
    }
}

/// A JSON endpoint returning an array of headlines.
pub struct HttpJsonSource {
    name: String,
    url: String,
    weight: f64,
    client: Client,
    retries: u32,
    retry_delay: Duration,
}

impl HttpJsonSource {
    pub fn new(name: &str, url: &str, weight: f64, fetch: &FetchConfig) -> IntelResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(fetch.request_timeout_secs))
            .build()?;

        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            weight,
            client,
            retries: fetch.retries.max(1),
            retry_delay: Duration::from_millis(fetch.request_delay_ms),
        })
    }

    async fn fetch_once(&self) -> IntelResult<Vec<serde_json::Value>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl HeadlineSource for HttpJsonSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    async fn fetch(&self) -> IntelResult<Vec<RawHeadline>> {
        info!("Scanning {} ({})", self.name, self.url);

        let mut last_error = None;
        for attempt in 1..=self.retries {
            match self.fetch_once().await {
                Ok(entries) => return Ok(decode_headlines(&self.name, entries)),
                Err(e) => {
                    warn!(
                        "{}: attempt {}/{} failed: {}",
                        self.name, attempt, self.retries, e
                    );
                    last_error = Some(e);
                    if attempt < self.retries {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            IntelError::Source(format!("{}: no fetch attempts made", self.name))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::OffsetDateTime;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local endpoint answering 500 for the first `failures` requests, then a
    /// one-headline JSON array. Returns the url and the request counter.
    async fn flaky_endpoint(failures: usize) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                let hit = counter.fetch_add(1, Ordering::SeqCst) + 1;
                let response = if hit <= failures {
                    "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string()
                } else {
                    let body = r#"[{"title": "Copper <b>surges</b> on tariff", "summary": "TSX miners rally"}]"#;
                    format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    )
                };
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{}/feed.json", addr), hits)
    }

    fn fetch_config(retries: u32) -> FetchConfig {
        FetchConfig {
            retries,
            request_delay_ms: 50,
            request_timeout_secs: 5,
        }
    }

    fn scratch_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "mining-sources-{}-{}-{}.json",
            tag,
            std::process::id(),
            OffsetDateTime::now_utc().unix_timestamp_nanos()
        ))
    }

    #[test]
    fn test_clean_html_strips_markup() {
        assert_eq!(
            clean_html("<p>Copper <b>surges</b>\n on   tariff news</p>"),
            "Copper surges on tariff news"
        );
        assert_eq!(clean_html("plain text"), "plain text");
    }

    #[test]
    fn test_source_specs_parse_both_kinds() {
        let json = r#"[
            {"name": "mining_com", "type": "http", "url": "https://example.com/feed.json", "weight": 0.9},
            {"name": "desk", "type": "file", "path": "data/desk.json"}
        ]"#;
        let specs: Vec<SourceSpec> = serde_json::from_str(json).unwrap();

        assert_eq!(specs[0].weight, 0.9);
        assert_eq!(
            specs[0].location,
            SourceLocation::Http {
                url: "https://example.com/feed.json".to_string()
            }
        );
        assert_eq!(specs[1].weight, 1.0);
        assert!(matches!(specs[1].location, SourceLocation::File { .. }));

        let manager = build_manager(&specs, &FetchConfig::default()).unwrap();
        assert_eq!(manager.len(), 2);
    }

    #[tokio::test]
    async fn test_json_file_source_cleans_summaries() {
        let path = scratch_file("feed");
        tokio::fs::write(
            &path,
            r#"[
                {"title": "Teck halts production", "summary": "<p>Canadian <i>mining</i> news</p>"},
                {"title": "   ", "summary": "dropped"},
                {"summary": "no title at all"}
            ]"#,
        )
        .await
        .unwrap();

        let source = JsonFileSource::from_path(path.clone());
        let headlines = source.fetch().await.unwrap();

        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].summary, "Canadian mining news");
        assert!(source.name().starts_with("mining-sources-feed"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let source = JsonFileSource::new("gone", PathBuf::from("/definitely/not/here.json"), 1.0);
        assert!(matches!(source.fetch().await, Err(IntelError::Source(_))));
    }

    #[tokio::test]
    async fn test_http_source_retries_until_success() {
        let (url, hits) = flaky_endpoint(2).await;
        let source = HttpJsonSource::new("flaky", &url, 1.0, &fetch_config(3)).unwrap();

        let started = std::time::Instant::now();
        let headlines = source.fetch().await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Copper surges on tariff");
    }

    #[tokio::test]
    async fn test_http_source_gives_up_with_last_status() {
        let (url, hits) = flaky_endpoint(usize::MAX).await;
        let source = HttpJsonSource::new("down", &url, 1.0, &fetch_config(2)).unwrap();

        match source.fetch().await {
            Err(IntelError::HttpRequest(e)) => {
                assert_eq!(e.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            }
            other => panic!("expected http error, got {:?}", other.map(|h| h.len())),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}

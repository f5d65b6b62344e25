use std::path::PathBuf;

use time::Date;
use tracing::info;

use crate::error::{IntelError, IntelResult};

/// Writes report files into `<root>/<YYYY-MM-DD>/`.
#[derive(Debug, Clone)]
pub struct ReportStore {
    root: PathBuf,
}

impl ReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dated_dir(&self, date: Date) -> PathBuf {
        self.root.join(date.to_string())
    }

    pub async fn write_for(
        &self,
        date: Date,
        file_name: &str,
        content: &str,
    ) -> IntelResult<PathBuf> {
        let file_name = file_name.trim_start_matches('/');
        if file_name.is_empty() || file_name.contains("..") {
            return Err(IntelError::Storage(format!(
                "invalid report file name: {:?}",
                file_name
            )));
        }

        let dir = self.dated_dir(date);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(file_name);
        info!("Writing report: {} ({} bytes)", path.display(), content.len());
        tokio::fs::write(&path, content).await?;

        Ok(path)
    }
}

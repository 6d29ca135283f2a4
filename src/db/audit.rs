use std::path::{Path, PathBuf};

use crate::auth::TokenAuditSink;
use crate::core::models::AccessTokenRecord;
use crate::provider::error::Error;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{event, Level};

/// Issued tokens as JSON lines, one object per token.
#[derive(Debug)]
pub struct FileTokenLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileTokenLog {
    /// Opens `path` for appending, discarding whatever a previous run left behind.
    pub async fn create(path: &Path) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await?;
        event!(Level::INFO, path = %path.display(), "Cleared token log");
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl TokenAuditSink for FileTokenLog {
    async fn record(&self, token: &AccessTokenRecord) -> Result<(), Error> {
        let mut line = serde_json::to_vec(token)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Keeps issued tokens in memory; mostly useful for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenLog {
    records: std::sync::Mutex<Vec<AccessTokenRecord>>,
}

impl MemoryTokenLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Result<Vec<AccessTokenRecord>, Error> {
        Ok(self.records.lock()?.clone())
    }
}

#[async_trait::async_trait]
impl TokenAuditSink for MemoryTokenLog {
    async fn record(&self, token: &AccessTokenRecord) -> Result<(), Error> {
        self.records.lock()?.push(token.clone());
        Ok(())
    }
}

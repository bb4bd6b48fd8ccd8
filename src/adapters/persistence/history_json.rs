//! Implements HistoryPort using a JSON file.
//!
//! Keeps evaluated answers and chat exchanges for all users of this machine.

use crate::domain::{ChatLogEntry, DomainError, HistoryEntry};
use crate::ports::HistoryPort;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Chat exchanges kept on disk; older ones are dropped first.
pub const DEFAULT_CHAT_RETENTION: usize = 500;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryData {
    #[serde(default)]
    feedback: Vec<HistoryEntry>,
    #[serde(default)]
    chats: Vec<ChatLogEntry>,
}

/// JSON file-based history storage.
pub struct HistoryJson {
    path: std::path::PathBuf,
    cache: tokio::sync::RwLock<HistoryData>,
    /// One writer at a time owns the temp file and the rename.
    save_lock: tokio::sync::Mutex<()>,
    chat_retention: usize,
}

impl HistoryJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::RwLock::new(HistoryData::default()),
            save_lock: tokio::sync::Mutex::new(()),
            chat_retention: DEFAULT_CHAT_RETENTION,
        }
    }

    /// Keep at most `limit` chat exchanges.
    pub fn with_chat_retention(mut self, limit: usize) -> Self {
        self.chat_retention = limit;
        self
    }

    /// Load history from disk. A missing file starts empty; a corrupt one is
    /// reported and replaced on the next save.
    pub async fn load(&self) -> Result<(), DomainError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "history file unreadable, starting empty");
                HistoryData::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HistoryData::default(),
            Err(e) => return Err(DomainError::Repo(format!("read history: {}", e))),
        };
        debug!(
            feedback = data.feedback.len(),
            chats = data.chats.len(),
            "history loaded"
        );
        *self.cache.write().await = data;
        Ok(())
    }

    /// Atomic save: write a temp file, fsync, rename over the target.
    ///
    /// Saves are serialized; each one snapshots the cache after taking the lock,
    /// so the last rename always carries the newest state.
    async fn save(&self) -> Result<(), DomainError> {
        let _guard = self.save_lock.lock().await;
        let json = {
            let data = self.cache.read().await;
            serde_json::to_string_pretty(&*data).map_err(|e| DomainError::Repo(e.to_string()))?
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Repo(format!("create history dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Repo(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Repo(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Repo(format!("atomic rename failed: {}", e)))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl HistoryPort for HistoryJson {
    async fn save_feedback(&self, entry: &HistoryEntry) -> Result<(), DomainError> {
        {
            let mut cache = self.cache.write().await;
            cache.feedback.push(entry.clone());
        }
        self.save().await
    }

    async fn recent_feedback(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, DomainError> {
        let cache = self.cache.read().await;
        Ok(cache
            .feedback
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn log_chat(&self, entry: &ChatLogEntry) -> Result<(), DomainError> {
        {
            let mut cache = self.cache.write().await;
            cache.chats.push(entry.clone());
            let excess = cache.chats.len().saturating_sub(self.chat_retention);
            if excess > 0 {
                cache.chats.drain(..excess);
            }
        }
        self.save().await
    }
}

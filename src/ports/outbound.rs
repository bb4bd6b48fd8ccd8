//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{ChatLogEntry, DomainError, HistoryEntry, LlmReply};

/// Remote language-model service. One free-form payload per call, no retries.
#[async_trait::async_trait]
pub trait LlmPort: Send + Sync {
    /// Send `message` on behalf of `user_id` and return the raw reply.
    async fn ask(&self, user_id: &str, message: &str) -> Result<LlmReply, DomainError>;
}

/// Persistence for evaluated answers and chat exchanges.
#[async_trait::async_trait]
pub trait HistoryPort: Send + Sync {
    async fn save_feedback(&self, entry: &HistoryEntry) -> Result<(), DomainError>;

    /// Most recent evaluations for a user, newest first.
    async fn recent_feedback(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, DomainError>;

    async fn log_chat(&self, entry: &ChatLogEntry) -> Result<(), DomainError>;
}

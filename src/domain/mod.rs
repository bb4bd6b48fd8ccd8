//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    ChatLogEntry, DEFAULT_QUESTION_COUNT, DirectScores, FeedbackResult, GeneratedQuestionSet,
    HistoryEntry, Issue, IssueKind, LlmReply, MAX_QUESTION_COUNT, MAX_SCORE, MIN_QUESTION_COUNT,
    MIN_QUESTION_LEN, RequestedCount, ScoreValue,
};
pub use errors::{DomainError, InterpretError};

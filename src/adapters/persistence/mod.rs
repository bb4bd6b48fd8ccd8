//! Persistence adapters. Implement HistoryPort.

pub mod history_json;

pub use history_json::HistoryJson;

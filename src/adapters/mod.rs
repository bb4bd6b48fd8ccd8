//! Infrastructure adapters. Implement outbound ports and drive inbound ones.
//!
//! LLM backend, JSON history, terminal UI. Map errors to DomainError.

pub mod llm;
pub mod persistence;
pub mod ui;

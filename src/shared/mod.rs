//! Cross-cutting support shared by the binary and adapters.

pub mod config;

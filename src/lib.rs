//! interview-coach: interview practice against an LLM coach, with Hexagonal Architecture.
//!
//! The `interpret` layer turns free-form model replies into typed values
//! (clean text, bounded question sets, scored feedback).

pub mod adapters;
pub mod domain;
pub mod interpret;
pub mod ports;
pub mod shared;
pub mod usecases;

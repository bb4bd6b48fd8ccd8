//! Application use cases. Orchestrate domain logic via ports.

pub mod coach_service;

pub use coach_service::CoachService;

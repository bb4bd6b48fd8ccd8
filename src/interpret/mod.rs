//! LLM reply interpretation. Pure, synchronous text-to-data routines.
//!
//! The producer gives no schema guarantee, so nothing here fails on malformed
//! text: missing data becomes an unavailable score, an empty list, or a fallback
//! question. Only invalid arguments are reported as errors.
//!
//! Randomness (fallback selection) is always injected by the caller.

pub mod count;
pub mod fallback;
pub mod feedback;
pub mod finish;
pub mod normalize;
pub mod segment;

pub use count::{CountBounds, extract_count, extract_count_within};
pub use fallback::FallbackPool;
pub use feedback::extract_feedback;
pub use finish::{finish_question, is_usable_question};
pub use normalize::normalize;
pub use segment::segment_questions;

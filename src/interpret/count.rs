//! Requested question count, read from free text like "5 system design questions".

use crate::domain::{DEFAULT_QUESTION_COUNT, InterpretError, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT};
use regex::Regex;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("digits regex"));

/// Default, lower and upper bound for an extracted count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountBounds {
    pub default: usize,
    pub min: usize,
    pub max: usize,
}

impl Default for CountBounds {
    fn default() -> Self {
        Self {
            default: DEFAULT_QUESTION_COUNT,
            min: MIN_QUESTION_COUNT,
            max: MAX_QUESTION_COUNT,
        }
    }
}

/// First number in `request`, clamped to [1, 10]; 3 when there is none.
pub fn extract_count(request: &str) -> usize {
    first_number_clamped(request, CountBounds::default())
}

/// Like [`extract_count`] with caller-supplied bounds.
///
/// # Errors
/// Returns `InterpretError::InvalidBounds` when `min > max`.
pub fn extract_count_within(request: &str, bounds: CountBounds) -> Result<usize, InterpretError> {
    if bounds.min > bounds.max {
        return Err(InterpretError::InvalidBounds {
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(first_number_clamped(request, bounds))
}

/// Caller guarantees `min <= max`.
fn first_number_clamped(request: &str, bounds: CountBounds) -> usize {
    match DIGITS.find(request) {
        // Digit runs too long for usize saturate; they clamp to max anyway.
        Some(m) => m
            .as_str()
            .parse::<usize>()
            .unwrap_or(usize::MAX)
            .clamp(bounds.min, bounds.max),
        None => bounds.default,
    }
}

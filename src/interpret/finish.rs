//! Cleanup for a single generated question.

use super::segment::strip_question_prefixes;
use crate::domain::MIN_QUESTION_LEN;

/// Phrases that mark a sentence as a question even without a `?`.
const INTERROGATIVE_CUES: &[&str] = &[
    "tell me", "describe", "explain", "how", "what", "why", "when", "where",
];

/// Strips prefixes, keeps the first line, and appends `?` to cue-bearing text
/// that has no terminal punctuation.
///
/// Pure: the result may still be empty or short. Callers check
/// [`is_usable_question`] and substitute a fallback themselves.
pub fn finish_question(raw: &str) -> String {
    let stripped = strip_question_prefixes(raw.trim()).trim();
    let mut question = stripped.lines().next().unwrap_or_default().trim().to_string();

    if !question.is_empty() && !question.ends_with('?') && !question.ends_with('.') {
        let lower = question.to_lowercase();
        if INTERROGATIVE_CUES.iter().any(|cue| lower.contains(cue)) {
            question.push('?');
        }
    }

    question
}

/// True when a finished question is long enough to show.
pub fn is_usable_question(question: &str) -> bool {
    question.chars().count() >= MIN_QUESTION_LEN
}

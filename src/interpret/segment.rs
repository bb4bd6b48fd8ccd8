//! Splits a multi-question reply into exactly N usable questions.

use super::fallback::PADDING_QUESTIONS;
use crate::domain::{
    GeneratedQuestionSet, InterpretError, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT,
    MIN_QUESTION_LEN,
};
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Applied in order; each may strip one prefix from the front.
static QUESTION_PREFIXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^[0-9]+\.\s*",
        r"(?i)^question:\s*",
        r"(?i)^q:\s*",
        r"^\*\s*",
        r"^-\s*",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("question prefix regex"))
    .collect()
});

/// Strips numbering, `Question:`/`Q:` labels and bullet/dash markers.
pub(crate) fn strip_question_prefixes(text: &str) -> &str {
    QUESTION_PREFIXES.iter().fold(text, |rest, re| match re.find(rest) {
        Some(m) => &rest[m.end()..],
        None => rest,
    })
}

/// Lines this short are list noise, not questions.
fn is_question_length(text: &str) -> bool {
    text.chars().count() > MIN_QUESTION_LEN
}

/// Extracts `target` distinct questions from `raw`, first-seen first.
///
/// Missing questions are drawn from the padding pool, preferring entries not yet
/// in the list. Once every pool entry is present, duplicates are allowed.
///
/// # Errors
/// Returns `InterpretError::TargetCountOutOfRange` when `target` is outside [1, 10].
pub fn segment_questions<R: Rng + ?Sized>(
    raw: &str,
    target: usize,
    rng: &mut R,
) -> Result<GeneratedQuestionSet, InterpretError> {
    if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&target) {
        return Err(InterpretError::TargetCountOutOfRange {
            requested: target,
            min: MIN_QUESTION_COUNT,
            max: MAX_QUESTION_COUNT,
        });
    }

    let mut questions: Vec<String> = Vec::with_capacity(target);
    for line in raw.lines().map(str::trim).filter(|l| is_question_length(l)) {
        let cleaned = strip_question_prefixes(line).trim();
        if !is_question_length(cleaned) || questions.iter().any(|q| q == cleaned) {
            continue;
        }
        questions.push(cleaned.to_string());
        if questions.len() == target {
            break;
        }
    }

    let extracted = questions.len();
    while questions.len() < target {
        let fallback = PADDING_QUESTIONS
            .pick_unused(rng, |e| questions.iter().any(|q| q == e))
            .unwrap_or_else(|| PADDING_QUESTIONS.pick(rng));
        questions.push(fallback.to_string());
    }

    if extracted < target {
        debug!(extracted, target, "padded question list from fallback pool");
    }

    Ok(GeneratedQuestionSet::new(questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_strip_question_prefixes() {
        assert_eq!(strip_question_prefixes("1. Tell me more"), "Tell me more");
        assert_eq!(strip_question_prefixes("Question: Why Rust"), "Why Rust");
        assert_eq!(strip_question_prefixes("q: Why Rust"), "Why Rust");
        assert_eq!(strip_question_prefixes("* Why Rust"), "Why Rust");
        assert_eq!(strip_question_prefixes("- Why Rust"), "Why Rust");
        assert_eq!(strip_question_prefixes("12. Question: - Why"), "Why");
        assert_eq!(strip_question_prefixes("Why Rust"), "Why Rust");
    }

    #[test]
    fn test_segment_truncates_first_seen() {
        let raw = "1. Tell me about yourself\n2. Describe a conflict\n3. What is your weakness\n4. Extra one";
        let set = segment_questions(raw, 2, &mut rng()).unwrap();
        assert_eq!(
            set.as_slice(),
            ["Tell me about yourself", "Describe a conflict"]
        );
    }

    #[test]
    fn test_segment_drops_short_lines_and_prefixes() {
        let raw = "Here you go:\n\n- Explain ownership in Rust\nQ: ok\nQuestion: How does borrowing work?\n";
        let set = segment_questions(raw, 3, &mut rng()).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.as_slice()[0], "Here you go:");
        assert_eq!(set.as_slice()[1], "Explain ownership in Rust");
        assert_eq!(set.as_slice()[2], "How does borrowing work?");
    }

    #[test]
    fn test_segment_cleaning_can_shrink_below_threshold() {
        // 18 chars before cleaning, 8 after.
        let raw = "Question: Why Rust";
        let set = segment_questions(raw, 1, &mut rng()).unwrap();
        assert!(PADDING_QUESTIONS.entries().contains(&set.as_slice()[0].as_str()));
    }

    #[test]
    fn test_segment_dedupes_extracted() {
        let raw = "1. Describe a conflict you solved\n2. Describe a conflict you solved";
        let set = segment_questions(raw, 2, &mut rng()).unwrap();
        assert_eq!(set.as_slice()[0], "Describe a conflict you solved");
        assert_ne!(set.as_slice()[1], "Describe a conflict you solved");
    }

    #[test]
    fn test_segment_empty_input_pads() {
        for target in 1..=MAX_QUESTION_COUNT {
            let set = segment_questions("", target, &mut rng()).unwrap();
            assert_eq!(set.len(), target);
            for q in &set {
                assert!(q.chars().count() >= MIN_QUESTION_LEN);
            }
        }
    }

    #[test]
    fn test_segment_padding_distinct_until_pool_exhausted() {
        let pool_len = PADDING_QUESTIONS.entries().len();
        let set = segment_questions("", MAX_QUESTION_COUNT, &mut rng()).unwrap();

        let head: HashSet<&str> = set.as_slice()[..pool_len].iter().map(String::as_str).collect();
        let pool: HashSet<&str> = PADDING_QUESTIONS.entries().iter().copied().collect();
        assert_eq!(head, pool);

        // The remaining slots can only repeat pool entries.
        for q in &set.as_slice()[pool_len..] {
            assert!(pool.contains(q.as_str()));
        }
    }

    #[test]
    fn test_segment_padding_skips_present_entries() {
        let present = PADDING_QUESTIONS.entries()[2];
        let set = segment_questions(present, 2, &mut rng()).unwrap();
        assert_eq!(set.as_slice()[0], present);
        assert_ne!(set.as_slice()[1], present);
    }

    #[test]
    fn test_segment_deterministic_with_seed() {
        let a = segment_questions("", 4, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = segment_questions("", 4, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_segment_rejects_out_of_range_target() {
        assert_eq!(
            segment_questions("x", 0, &mut rng()),
            Err(InterpretError::TargetCountOutOfRange {
                requested: 0,
                min: 1,
                max: 10
            })
        );
        assert!(segment_questions("x", 11, &mut rng()).is_err());
    }
}

//! Generic questions and suggestions used when the producer under-delivers.
//!
//! Pools are immutable and process-wide. Selection takes the caller's RNG so tests
//! can seed it.

use rand::Rng;
use rand::seq::SliceRandom;

/// A fixed, non-empty list of fallback texts.
#[derive(Debug, Clone, Copy)]
pub struct FallbackPool(&'static [&'static str]);

impl FallbackPool {
    pub fn entries(&self) -> &'static [&'static str] {
        self.0
    }

    /// Uniformly random entry.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.0
            .choose(rng)
            .copied()
            // Pools are non-empty consts; choose only returns None on empty slices
            .unwrap_or(self.0[0])
    }

    /// Uniformly random entry among those `taken` rejects, or `None` once all are taken.
    pub fn pick_unused<R, F>(&self, rng: &mut R, taken: F) -> Option<&'static str>
    where
        R: Rng + ?Sized,
        F: Fn(&str) -> bool,
    {
        let unused: Vec<&'static str> = self.0.iter().copied().filter(|e| !taken(e)).collect();
        unused.choose(rng).copied()
    }
}

/// Pads a generated question list up to the requested count.
pub const PADDING_QUESTIONS: FallbackPool = FallbackPool(&[
    "Tell me about your problem-solving approach.",
    "Describe a challenging situation you faced recently.",
    "How do you handle working under pressure?",
    "What motivates you in your work?",
    "Describe your ideal work environment.",
]);

/// Replaces a single generated question that came back empty or too short.
pub const SINGLE_QUESTIONS: FallbackPool = FallbackPool(&[
    "Tell me about a challenging project you worked on and how you overcame the obstacles.",
    "Describe a time when you had to work with a difficult team member. How did you handle it?",
    "What's your approach to handling tight deadlines and multiple priorities?",
    "Tell me about a time you had to learn a new technology or skill quickly.",
    "Describe a situation where you had to give constructive feedback to a colleague.",
]);

/// Used when the producer could not be reached at all.
pub const OFFLINE_QUESTIONS: FallbackPool = FallbackPool(&[
    "Tell me about a challenging project you worked on and how you overcame the obstacles.",
    "Describe a time when you had to work with a difficult team member. How did you handle it?",
    "What's your approach to handling tight deadlines and multiple priorities?",
    "Tell me about a time you had to learn a new technology or skill quickly.",
    "Describe a situation where you had to give constructive feedback to a colleague.",
    "How do you stay updated with the latest trends in your field?",
    "Tell me about a time you made a mistake at work. How did you handle it?",
    "Describe your problem-solving process when faced with a complex technical issue.",
]);

/// Shown when an evaluation carries no suggestions of its own.
pub const SUGGESTIONS: FallbackPool = FallbackPool(&[
    "Structure your answer with the STAR method: Situation, Task, Action, Result.",
    "Quantify the impact of your work with concrete numbers or metrics.",
    "Keep the answer focused on the question and close with a clear takeaway.",
]);

//! Structured feedback from a free-form evaluation reply.
//!
//! Every field is extracted on its own. A field that cannot be found stays
//! unavailable (scores), empty (lists) or absent (improved answer); extraction
//! itself never fails.

use crate::domain::{DirectScores, FeedbackResult, Issue, ScoreValue};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoreField {
    Structure,
    Clarity,
    Tone,
    Relevance,
}

impl ScoreField {
    const ALL: [ScoreField; 4] = [
        ScoreField::Structure,
        ScoreField::Clarity,
        ScoreField::Tone,
        ScoreField::Relevance,
    ];

    fn label(self) -> &'static str {
        match self {
            ScoreField::Structure => "structure",
            ScoreField::Clarity => "clarity",
            ScoreField::Tone => "tone",
            ScoreField::Relevance => "relevance",
        }
    }

    fn direct(self, scores: &DirectScores) -> Option<i64> {
        match self {
            ScoreField::Structure => scores.structure,
            ScoreField::Clarity => scores.clarity,
            ScoreField::Tone => scores.tone,
            ScoreField::Relevance => scores.relevance,
        }
    }

    fn slot(self, result: &mut FeedbackResult) -> &mut ScoreValue {
        match self {
            ScoreField::Structure => &mut result.structure,
            ScoreField::Clarity => &mut result.clarity,
            ScoreField::Tone => &mut result.tone,
            ScoreField::Relevance => &mut result.relevance,
        }
    }
}

/// `<label> [score] [(0-100)] [:] <digits>`, tolerant of markdown bold around the label.
static SCORE_PATTERNS: LazyLock<Vec<(ScoreField, Regex)>> = LazyLock::new(|| {
    ScoreField::ALL
        .into_iter()
        .map(|field| {
            let pattern = format!(
                r"(?i){}\s*(?:score)?\s*(?:\([^)\n]*\))?[:\s*]*([0-9]+)",
                field.label()
            );
            (field, Regex::new(&pattern).expect("score regex"))
        })
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Issues,
    Suggestions,
    ImprovedAnswer,
}

struct SectionLabel {
    section: Section,
    /// Label at the start of a line, after optional markdown or numbering.
    heading: Regex,
    inline: Regex,
}

impl SectionLabel {
    fn new(section: Section, word: &str) -> Self {
        let heading = format!(r"(?im)^[ \t#>*•\-]*(?:[0-9]+[.)])?[ \t*]*(?:{})", word);
        let inline = format!(r"(?i){}", word);
        Self {
            section,
            heading: Regex::new(&heading).expect("section heading regex"),
            inline: Regex::new(&inline).expect("section label regex"),
        }
    }

    /// First heading-style label at or after `start`, else the first inline mention.
    /// The flag is true for a heading match.
    fn find_at<'t>(&self, text: &'t str, start: usize) -> Option<(regex::Match<'t>, bool)> {
        self.heading
            .find_at(text, start)
            .map(|m| (m, true))
            .or_else(|| self.inline.find_at(text, start).map(|m| (m, false)))
    }
}

/// Section labels in the order the producer is asked to emit them. A section's
/// body runs to the next later label or the end of the text.
static SECTION_LABELS: LazyLock<Vec<SectionLabel>> = LazyLock::new(|| {
    vec![
        SectionLabel::new(Section::Issues, r"issues?"),
        SectionLabel::new(Section::Suggestions, r"suggestions?"),
        SectionLabel::new(
            Section::ImprovedAnswer,
            r"improved\s*(?:answer|version|response)?",
        ),
    ]
});

/// Words that can continue a label on its own line ("found", "for improvement").
static HEADING_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N} \t*()/]*").expect("heading tail regex"));

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•]|[0-9]+[.)])\s*").expect("list marker regex"));

/// Extract scores and sections from `raw_reply`.
///
/// A valid direct score always wins over one mined from the text.
pub fn extract_feedback(raw_reply: &str, direct: &DirectScores) -> FeedbackResult {
    let mut result = FeedbackResult {
        raw_reply: raw_reply.to_string(),
        ..FeedbackResult::default()
    };

    for (field, pattern) in SCORE_PATTERNS.iter() {
        *field.slot(&mut result) = resolve_score(*field, direct, pattern, raw_reply);
    }

    for (section, body) in section_bodies(raw_reply) {
        match section {
            Section::Issues => {
                result.issues = list_items(body).map(Issue::warning).collect();
            }
            Section::Suggestions => {
                result.suggestions = list_items(body).collect();
            }
            Section::ImprovedAnswer => {
                let block = body.trim();
                result.improved_answer = (!block.is_empty()).then(|| block.to_string());
            }
        }
    }

    debug!(
        structure = %result.structure,
        clarity = %result.clarity,
        tone = %result.tone,
        relevance = %result.relevance,
        issues = result.issues.len(),
        suggestions = result.suggestions.len(),
        improved = result.improved_answer.is_some(),
        "extracted feedback"
    );

    result
}

fn resolve_score(
    field: ScoreField,
    direct: &DirectScores,
    pattern: &Regex,
    text: &str,
) -> ScoreValue {
    if let Some(raw) = field.direct(direct) {
        match ScoreValue::new(raw) {
            Some(score) => return score,
            None => debug!(field = field.label(), raw, "direct score out of range, ignored"),
        }
    }

    let Some(digits) = pattern.captures(text).and_then(|c| c.get(1)) else {
        return ScoreValue::UNAVAILABLE;
    };
    match digits.as_str().parse::<i64>().ok().and_then(ScoreValue::new) {
        Some(score) => score,
        None => {
            debug!(field = field.label(), value = digits.as_str(), "mined score out of range, ignored");
            ScoreValue::UNAVAILABLE
        }
    }
}

/// Locate each labelled section once and slice out its body.
fn section_bodies(text: &str) -> Vec<(Section, &str)> {
    let labels = SECTION_LABELS.as_slice();
    let mut bodies = Vec::new();

    for (i, label) in labels.iter().enumerate() {
        let Some((found, is_heading)) = label.find_at(text, 0) else {
            continue;
        };
        let start = body_start(text, found.end(), is_heading);
        let end = labels[i + 1..]
            .iter()
            .filter_map(|later| later.find_at(text, start).map(|(m, _)| m.start()))
            .min()
            .unwrap_or(text.len());

        bodies.push((label.section, &text[start..end]));
    }

    bodies
}

/// Where a section's content begins after its label.
///
/// Heading words followed by a colon ("Issues found:") are skipped through the
/// colon. A heading line with no colon ("**Issues Found**") is all title, so the
/// body starts on the next line. Otherwise the body starts right after the label.
/// Closing bold markers and whitespace are skipped in every case.
fn body_start(text: &str, label_end: usize, is_heading: bool) -> usize {
    let rest = &text[label_end..];
    let line = &rest[..rest.find('\n').unwrap_or(rest.len())];
    let tail = HEADING_TAIL.find(line).map_or(0, |m| m.end());

    let skip = if line[tail..].starts_with(':') {
        tail + 1
    } else if is_heading && tail == line.len() {
        line.len()
    } else {
        0
    };

    let rest = &rest[skip..];
    let rest = rest.trim_start_matches('*').trim_start();
    text.len() - rest.len()
}

/// Non-empty lines with one leading bullet, dash or ordinal removed. Lines with
/// nothing but markup (stray `**`, `##`) are dropped.
fn list_items(body: &str) -> impl Iterator<Item = String> + '_ {
    body.lines().filter_map(|line| {
        let line = line.trim();
        let item = match LIST_MARKER.find(line) {
            Some(m) => line[m.end()..].trim(),
            None => line,
        };
        item.chars()
            .any(char::is_alphanumeric)
            .then(|| item.to_string())
    })
}

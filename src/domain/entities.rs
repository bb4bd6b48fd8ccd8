//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here; adapters map wire payloads into these.

use super::errors::InterpretError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Upper bound of a valid score.
pub const MAX_SCORE: u32 = 100;

/// Minimum length (in characters) of a usable question.
pub const MIN_QUESTION_LEN: usize = 10;

/// Default number of generated questions when the request names none.
pub const DEFAULT_QUESTION_COUNT: usize = 3;
pub const MIN_QUESTION_COUNT: usize = 1;
pub const MAX_QUESTION_COUNT: usize = 10;

/// A score in [0, 100], or unavailable.
///
/// Unavailable is a missing signal and is distinct from a real score of 0.
///
/// Deserializing an out-of-range number yields unavailable, never an invalid score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<u32>")]
pub struct ScoreValue(Option<u32>);

impl ScoreValue {
    pub const UNAVAILABLE: Self = Self(None);

    /// Returns `None` for values outside [0, 100].
    pub fn new(value: i64) -> Option<Self> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= MAX_SCORE)
            .map(|v| Self(Some(v)))
    }

    pub fn value(self) -> Option<u32> {
        self.0
    }

    pub fn is_available(self) -> bool {
        self.0.is_some()
    }
}

impl From<Option<i64>> for ScoreValue {
    fn from(raw: Option<i64>) -> Self {
        raw.and_then(Self::new).unwrap_or(Self::UNAVAILABLE)
    }
}

impl From<ScoreValue> for Option<u32> {
    fn from(score: ScoreValue) -> Self {
        score.0
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}%", v),
            None => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Warning,
    Error,
    Success,
}

/// A problem (or strength) found in an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Warning,
            message: message.into(),
        }
    }
}

/// Scores the producer may send next to the reply text.
///
/// Kept as raw integers: validation happens during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectScores {
    #[serde(default, rename = "structure_score", deserialize_with = "lenient_score")]
    pub structure: Option<i64>,
    #[serde(default, rename = "clarity_score", deserialize_with = "lenient_score")]
    pub clarity: Option<i64>,
    #[serde(default, rename = "tone_score", deserialize_with = "lenient_score")]
    pub tone: Option<i64>,
    #[serde(default, rename = "relevance_score", deserialize_with = "lenient_score")]
    pub relevance: Option<i64>,
}

/// Accepts integers, floats and numeric strings; anything else counts as absent.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// One producer payload: free-form text plus optional side-channel scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmReply {
    #[serde(default)]
    pub reply: String,
    #[serde(flatten)]
    pub scores: DirectScores,
}

impl LlmReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            scores: DirectScores::default(),
        }
    }
}

/// Structured evaluation of one interview answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub structure: ScoreValue,
    pub clarity: ScoreValue,
    pub tone: ScoreValue,
    pub relevance: ScoreValue,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<String>,
    pub improved_answer: Option<String>,
    /// Unparsed producer text, kept for debugging.
    pub raw_reply: String,
}

impl FeedbackResult {
    /// Degraded result shown when no evaluation could be obtained.
    pub fn unavailable() -> Self {
        Self {
            suggestions: vec!["Please try again for detailed feedback.".to_string()],
            improved_answer: Some("Improved answer example not available at this time.".to_string()),
            ..Self::default()
        }
    }

    /// Rounded mean of the available structure, clarity and tone scores.
    pub fn average_score(&self) -> Option<u32> {
        average(&[self.structure, self.clarity, self.tone])
    }

    /// Labelled scores in display order.
    pub fn labelled_scores(&self) -> [(&'static str, ScoreValue); 4] {
        [
            ("Structure", self.structure),
            ("Clarity", self.clarity),
            ("Tone", self.tone),
            ("Relevance", self.relevance),
        ]
    }
}

fn average(scores: &[ScoreValue]) -> Option<u32> {
    let available: Vec<u32> = scores.iter().filter_map(|s| s.value()).collect();
    if available.is_empty() {
        return None;
    }
    let sum: u32 = available.iter().sum();
    Some((f64::from(sum) / available.len() as f64).round() as u32)
}

/// Exactly N generated questions, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedQuestionSet(Vec<String>);

impl GeneratedQuestionSet {
    /// Only the segmenter builds sets, after enforcing cardinality and length.
    pub(crate) fn new(questions: Vec<String>) -> Self {
        Self(questions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a GeneratedQuestionSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Number of questions a free-text request asks for, clamped to [1, 10].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct RequestedCount(usize);

impl TryFrom<usize> for RequestedCount {
    type Error = InterpretError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        if (MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&count) {
            Ok(Self(count))
        } else {
            Err(InterpretError::TargetCountOutOfRange {
                requested: count,
                min: MIN_QUESTION_COUNT,
                max: MAX_QUESTION_COUNT,
            })
        }
    }
}

impl From<RequestedCount> for usize {
    fn from(count: RequestedCount) -> Self {
        count.0
    }
}

impl RequestedCount {
    /// Parses the count out of a request like "give me 5 system design questions".
    pub fn from_request(request: &str) -> Self {
        Self(crate::interpret::extract_count(request))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for RequestedCount {
    fn default() -> Self {
        Self(DEFAULT_QUESTION_COUNT)
    }
}

impl fmt::Display for RequestedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user_id: String,
    pub question: String,
    pub answer: String,
    pub structure: ScoreValue,
    pub clarity: ScoreValue,
    pub tone: ScoreValue,
    pub relevance: ScoreValue,
    pub issues: Vec<Issue>,
    pub suggestions: Vec<String>,
    pub improved_answer: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_feedback(
        user_id: &str,
        question: &str,
        answer: &str,
        feedback: &FeedbackResult,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            structure: feedback.structure,
            clarity: feedback.clarity,
            tone: feedback.tone,
            relevance: feedback.relevance,
            issues: feedback.issues.clone(),
            suggestions: feedback.suggestions.clone(),
            improved_answer: feedback.improved_answer.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn average_score(&self) -> Option<u32> {
        average(&[self.structure, self.clarity, self.tone])
    }
}

/// One chat exchange, logged as sent and received (before normalization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLogEntry {
    pub user_id: String,
    pub message: String,
    pub reply: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_value_bounds() {
        assert_eq!(ScoreValue::new(0).and_then(|s| s.value()), Some(0));
        assert_eq!(ScoreValue::new(100).and_then(|s| s.value()), Some(100));
        assert!(ScoreValue::new(101).is_none());
        assert!(ScoreValue::new(-1).is_none());
    }

    #[test]
    fn test_score_value_display() {
        assert_eq!(ScoreValue::new(85).unwrap().to_string(), "85%");
        assert_eq!(ScoreValue::UNAVAILABLE.to_string(), "N/A");
    }

    #[test]
    fn test_zero_is_not_unavailable() {
        let zero = ScoreValue::new(0).unwrap();
        assert!(zero.is_available());
        assert_ne!(zero, ScoreValue::UNAVAILABLE);
    }

    #[test]
    fn test_average_skips_unavailable() {
        let feedback = FeedbackResult {
            structure: ScoreValue::new(80).unwrap(),
            clarity: ScoreValue::new(71).unwrap(),
            ..FeedbackResult::default()
        };
        assert_eq!(feedback.average_score(), Some(76));
        assert_eq!(FeedbackResult::default().average_score(), None);
    }

    #[test]
    fn test_llm_reply_deserialize_with_scores() {
        let json = r#"{"reply": "Nice answer", "structure_score": 70, "tone_score": null}"#;
        let reply: LlmReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.reply, "Nice answer");
        assert_eq!(reply.scores.structure, Some(70));
        assert_eq!(reply.scores.tone, None);
        assert_eq!(reply.scores.clarity, None);
    }

    #[test]
    fn test_llm_reply_lenient_scores() {
        let json = r#"{"reply": "", "structure_score": 72.6, "clarity_score": "64", "tone_score": "high"}"#;
        let reply: LlmReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.scores.structure, Some(73));
        assert_eq!(reply.scores.clarity, Some(64));
        assert_eq!(reply.scores.tone, None);
    }

    #[test]
    fn test_issue_serializes_kind_as_type() {
        let json = serde_json::to_string(&Issue::warning("too vague")).unwrap();
        assert_eq!(json, r#"{"type":"warning","message":"too vague"}"#);
    }

    #[test]
    fn test_score_value_deserialize_rejects_out_of_range() {
        let scores: Vec<ScoreValue> = serde_json::from_str("[150, -3, null, 0, 85]").unwrap();
        assert_eq!(
            scores,
            [
                ScoreValue::UNAVAILABLE,
                ScoreValue::UNAVAILABLE,
                ScoreValue::UNAVAILABLE,
                ScoreValue::new(0).unwrap(),
                ScoreValue::new(85).unwrap(),
            ]
        );
        assert_eq!(
            serde_json::to_string(&[ScoreValue::new(85).unwrap(), ScoreValue::UNAVAILABLE]).unwrap(),
            "[85,null]"
        );
    }

    #[test]
    fn test_requested_count_deserialize_enforces_bounds() {
        let count: RequestedCount = serde_json::from_str("4").unwrap();
        assert_eq!(count.get(), 4);
        assert_eq!(serde_json::to_string(&count).unwrap(), "4");
        assert!(serde_json::from_str::<RequestedCount>("0").is_err());
        assert!(serde_json::from_str::<RequestedCount>("11").is_err());
    }
}

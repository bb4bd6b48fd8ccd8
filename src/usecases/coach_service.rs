//! Coaching service. Orchestrates prompt → LLM → interpretation → history.
//!
//! Each flow mirrors one action of the practice UI: free chat, next question,
//! generate a question set, evaluate an answer.

use crate::domain::{
    ChatLogEntry, DomainError, FeedbackResult, GeneratedQuestionSet, HistoryEntry,
    RequestedCount,
};
use crate::interpret::fallback::{OFFLINE_QUESTIONS, SINGLE_QUESTIONS, SUGGESTIONS};
use crate::interpret::{
    extract_feedback, finish_question, is_usable_question, normalize, segment_questions,
};
use crate::ports::{HistoryPort, LlmPort};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Service for interview practice flows.
pub struct CoachService {
    llm: Arc<dyn LlmPort>,
    history: Arc<dyn HistoryPort>,
    /// Fallback selection. Never held across an await.
    rng: Mutex<StdRng>,
}

impl CoachService {
    /// Create a service with an entropy-seeded RNG.
    pub fn new(llm: Arc<dyn LlmPort>, history: Arc<dyn HistoryPort>) -> Self {
        Self::with_rng(llm, history, StdRng::from_entropy())
    }

    /// Create a service with a caller-supplied RNG (seed it for reproducible fallbacks).
    pub fn with_rng(llm: Arc<dyn LlmPort>, history: Arc<dyn HistoryPort>, rng: StdRng) -> Self {
        Self {
            llm,
            history,
            rng: Mutex::new(rng),
        }
    }

    fn with_rng_locked<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock still holds a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    fn question_prompt() -> &'static str {
        "Generate one general interview question. Return only the question text, nothing else. \
         Make it a behavioral or technical question suitable for a job interview."
    }

    fn question_set_prompt(request: &str, count: RequestedCount) -> String {
        format!(
            r#"Generate exactly {count} interview questions based on this request: "{request}".

IMPORTANT INSTRUCTIONS:
- Generate EXACTLY {count} questions, no more, no less
- Each question should be on a separate line
- Do not include numbering, bullets, or prefixes
- Make each question clear and interview-appropriate
- Focus on the specific topics mentioned in the request

Example format:
Tell me about your experience with data structures
Explain how you would implement a binary search algorithm
Describe a time when you optimized code performance"#
        )
    }

    fn feedback_prompt(question: &str, answer: &str) -> String {
        format!(
            "Please analyze this interview answer and provide comprehensive feedback:

Question: {question}
Answer: {answer}

Please provide:
1. Structure score (0-100)
2. Clarity score (0-100)
3. Tone score (0-100)
4. Relevance score (0-100)
5. Issues found (list specific problems)
6. Suggestions for improvement (actionable advice)
7. An improved version of the answer that demonstrates best practices

Format your response clearly with sections for each component."
        )
    }

    /// Free-form coaching chat. Returns the reply cleaned for display.
    pub async fn chat(&self, user_id: &str, message: &str) -> Result<String, DomainError> {
        let reply = self.llm.ask(user_id, message).await?;
        let cleaned = normalize(&reply.reply);

        let entry = ChatLogEntry {
            user_id: user_id.to_string(),
            message: message.to_string(),
            reply: reply.reply,
            created_at: Utc::now(),
        };
        if let Err(e) = self.history.log_chat(&entry).await {
            warn!(error = %e, "failed to log chat exchange");
        }

        if cleaned.is_empty() {
            return Ok("No response received from AI.".to_string());
        }
        Ok(cleaned)
    }

    /// One general interview question. Never fails: an unusable or missing reply
    /// is replaced by a fallback question.
    pub async fn next_question(&self, user_id: &str) -> String {
        match self.llm.ask(user_id, Self::question_prompt()).await {
            Ok(reply) => {
                let question = finish_question(&reply.reply);
                if is_usable_question(&question) {
                    question
                } else {
                    info!(len = question.chars().count(), "generated question unusable, using fallback");
                    self.with_rng_locked(|rng| SINGLE_QUESTIONS.pick(rng)).to_string()
                }
            }
            Err(e) => {
                warn!(error = %e, "question request failed, using fallback");
                self.with_rng_locked(|rng| OFFLINE_QUESTIONS.pick(rng)).to_string()
            }
        }
    }

    /// Exactly as many questions as `request` asks for (1–10, default 3).
    pub async fn generate_questions(
        &self,
        user_id: &str,
        request: &str,
    ) -> Result<GeneratedQuestionSet, DomainError> {
        let count = RequestedCount::from_request(request);
        info!(requested = count.get(), "generating question set");

        let reply = self
            .llm
            .ask(user_id, &Self::question_set_prompt(request, count))
            .await?;

        let questions = self.with_rng_locked(|rng| segment_questions(&reply.reply, count.get(), rng))?;
        Ok(questions)
    }

    /// Evaluate an answer. Never fails: a failed request yields the degraded
    /// "unavailable" result, and a failed save is only logged.
    pub async fn evaluate_answer(&self, user_id: &str, question: &str, answer: &str) -> FeedbackResult {
        let reply = match self.llm.ask(user_id, &Self::feedback_prompt(question, answer)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "feedback request failed");
                return FeedbackResult::unavailable();
            }
        };

        let feedback = extract_feedback(&reply.reply, &reply.scores);
        info!(
            average = ?feedback.average_score(),
            issues = feedback.issues.len(),
            suggestions = feedback.suggestions.len(),
            "answer evaluated"
        );

        let entry = HistoryEntry::from_feedback(user_id, question, answer, &feedback);
        if let Err(e) = self.history.save_feedback(&entry).await {
            warn!(error = %e, "failed to save feedback");
        }

        feedback
    }

    /// Suggestions to display: the evaluation's own, or one generic fallback.
    pub fn display_suggestions(&self, feedback: &FeedbackResult) -> Vec<String> {
        if !feedback.suggestions.is_empty() {
            return feedback.suggestions.clone();
        }
        vec![self.with_rng_locked(|rng| SUGGESTIONS.pick(rng)).to_string()]
    }

    /// Most recent evaluations for a user, newest first.
    pub async fn history(&self, user_id: &str, limit: usize) -> Result<Vec<HistoryEntry>, DomainError> {
        self.history.recent_feedback(user_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::llm::MockLlmAdapter;
    use crate::domain::{DirectScores, LlmReply, ScoreValue};
    use crate::interpret::fallback::PADDING_QUESTIONS;
    use async_trait::async_trait;

    /// In-memory history; optionally fails every write.
    #[derive(Default)]
    struct MemoryHistory {
        feedback: Mutex<Vec<HistoryEntry>>,
        chats: Mutex<Vec<ChatLogEntry>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl HistoryPort for MemoryHistory {
        async fn save_feedback(&self, entry: &HistoryEntry) -> Result<(), DomainError> {
            if self.fail_writes {
                return Err(DomainError::Repo("disk full".to_string()));
            }
            self.feedback.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn recent_feedback(
            &self,
            user_id: &str,
            limit: usize,
        ) -> Result<Vec<HistoryEntry>, DomainError> {
            Ok(self
                .feedback
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|e| e.user_id == user_id)
                .take(limit)
                .cloned()
                .collect())
        }

        async fn log_chat(&self, entry: &ChatLogEntry) -> Result<(), DomainError> {
            if self.fail_writes {
                return Err(DomainError::Repo("disk full".to_string()));
            }
            self.chats.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    fn service(
        replies: Vec<Result<LlmReply, String>>,
    ) -> (CoachService, Arc<MockLlmAdapter>, Arc<MemoryHistory>) {
        let llm = Arc::new(MockLlmAdapter::scripted(replies));
        let history = Arc::new(MemoryHistory::default());
        let svc = CoachService::with_rng(
            llm.clone(),
            history.clone(),
            StdRng::seed_from_u64(11),
        );
        (svc, llm, history)
    }

    #[tokio::test]
    async fn test_chat_normalizes_and_logs_raw() {
        let (svc, _, history) = service(vec![Ok(LlmReply::text("## Tip\n\n- Be **brief**"))]);
        let cleaned = svc.chat("ana", "any tips?").await.unwrap();
        assert_eq!(cleaned, "Tip\n\n• Be brief");

        let chats = history.chats.lock().unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].reply, "## Tip\n\n- Be **brief**");
    }

    #[tokio::test]
    async fn test_chat_empty_reply_placeholder() {
        let (svc, _, _) = service(vec![Ok(LlmReply::text("   "))]);
        assert_eq!(
            svc.chat("ana", "hello").await.unwrap(),
            "No response received from AI."
        );
    }

    #[tokio::test]
    async fn test_chat_propagates_llm_error() {
        let (svc, _, _) = service(vec![Err("timeout".to_string())]);
        assert!(matches!(svc.chat("ana", "hello").await, Err(DomainError::Llm(_))));
    }

    #[tokio::test]
    async fn test_next_question_finishes_reply() {
        let (svc, _, _) = service(vec![Ok(LlmReply::text(
            "1. Tell me about a time you led a project\nExtra commentary",
        ))]);
        assert_eq!(
            svc.next_question("ana").await,
            "Tell me about a time you led a project?"
        );
    }

    #[tokio::test]
    async fn test_next_question_short_reply_uses_fallback() {
        let (svc, _, _) = service(vec![Ok(LlmReply::text("Q: Why?"))]);
        let question = svc.next_question("ana").await;
        assert!(SINGLE_QUESTIONS.entries().contains(&question.as_str()));
    }

    #[tokio::test]
    async fn test_next_question_failed_request_uses_offline_pool() {
        let (svc, _, _) = service(vec![Err("connection refused".to_string())]);
        let question = svc.next_question("ana").await;
        assert!(OFFLINE_QUESTIONS.entries().contains(&question.as_str()));
    }

    #[tokio::test]
    async fn test_next_question_fallback_deterministic_with_seed() {
        let (a, _, _) = service(vec![Err("down".to_string())]);
        let (b, _, _) = service(vec![Err("down".to_string())]);
        assert_eq!(a.next_question("ana").await, b.next_question("ana").await);
    }

    #[tokio::test]
    async fn test_generate_questions_uses_requested_count() {
        let raw = "1. Explain how a hash map works\n2. Describe a race condition you fixed\n3. What is a B-tree used for";
        let (svc, llm, _) = service(vec![Ok(LlmReply::text(raw))]);
        let set = svc
            .generate_questions("ana", "2 DSA questions please")
            .await
            .unwrap();
        assert_eq!(
            set.as_slice(),
            ["Explain how a hash map works", "Describe a race condition you fixed"]
        );
        assert!(llm.prompts()[0].contains("Generate exactly 2 interview questions"));
    }

    #[tokio::test]
    async fn test_generate_questions_pads_short_reply() {
        let (svc, _, _) = service(vec![Ok(LlmReply::text("Sure!"))]);
        let set = svc.generate_questions("ana", "some questions").await.unwrap();
        assert_eq!(set.len(), 3);
        for q in &set {
            assert!(PADDING_QUESTIONS.entries().contains(&q.as_str()));
        }
    }

    #[tokio::test]
    async fn test_generate_questions_propagates_llm_error() {
        let (svc, _, _) = service(vec![Err("502".to_string())]);
        assert!(svc.generate_questions("ana", "3 questions").await.is_err());
    }

    #[tokio::test]
    async fn test_evaluate_answer_extracts_and_saves() {
        let reply = LlmReply {
            reply: "Structure score: 85\nClarity: 60\nIssues:\n- too vague\nSuggestions:\n- add metrics\nImproved Answer: Use the STAR method.".to_string(),
            scores: DirectScores {
                tone: Some(70),
                ..DirectScores::default()
            },
        };
        let (svc, llm, history) = service(vec![Ok(reply)]);
        let feedback = svc
            .evaluate_answer("ana", "Tell me about yourself", "I like code")
            .await;

        assert_eq!(feedback.structure, ScoreValue::new(85).unwrap());
        assert_eq!(feedback.tone, ScoreValue::new(70).unwrap());
        assert_eq!(feedback.relevance, ScoreValue::UNAVAILABLE);
        assert_eq!(feedback.suggestions, ["add metrics"]);
        assert!(llm.prompts()[0].contains("Answer: I like code"));

        let saved = svc.history("ana", 10).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].question, "Tell me about yourself");
        assert_eq!(saved[0].structure, feedback.structure);
        assert_eq!(history.feedback.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_evaluate_answer_failed_request_is_degraded() {
        let (svc, _, history) = service(vec![Err("timeout".to_string())]);
        let feedback = svc.evaluate_answer("ana", "Q", "A").await;
        assert_eq!(feedback, FeedbackResult::unavailable());
        assert!(history.feedback.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_evaluate_answer_survives_history_failure() {
        let llm = Arc::new(MockLlmAdapter::scripted(vec![Ok(LlmReply::text("Clarity: 90"))]));
        let history = Arc::new(MemoryHistory {
            fail_writes: true,
            ..MemoryHistory::default()
        });
        let svc = CoachService::with_rng(llm, history, StdRng::seed_from_u64(1));
        let feedback = svc.evaluate_answer("ana", "Q", "A").await;
        assert_eq!(feedback.clarity, ScoreValue::new(90).unwrap());
    }

    #[tokio::test]
    async fn test_display_suggestions_fallback() {
        let (svc, _, _) = service(vec![]);
        let own = FeedbackResult {
            suggestions: vec!["be concise".to_string()],
            ..FeedbackResult::default()
        };
        assert_eq!(svc.display_suggestions(&own), ["be concise"]);

        let shown = svc.display_suggestions(&FeedbackResult::default());
        assert_eq!(shown.len(), 1);
        assert!(SUGGESTIONS.entries().contains(&shown[0].as_str()));
    }

    #[tokio::test]
    async fn test_canned_mock_flows_end_to_end() {
        let (svc, _, _) = service(vec![]);

        let set = svc.generate_questions("ana", "4 backend questions").await.unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.as_slice()[0], "Sure! Here are your questions:");

        let feedback = svc.evaluate_answer("ana", "Q", "A").await;
        assert_eq!(feedback.structure, ScoreValue::new(78).unwrap());
        assert_eq!(feedback.tone, ScoreValue::UNAVAILABLE);
        assert_eq!(feedback.issues.len(), 2);
        assert_eq!(feedback.suggestions.len(), 2);
        assert!(feedback.improved_answer.is_some());
    }
}

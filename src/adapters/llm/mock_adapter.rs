//! Mock LLM adapter for running without a backend.
//!
//! Returns canned, deliberately messy replies (markdown, numbering, mixed labels)
//! so the interpretation layer is exercised offline. Tests can queue scripted
//! replies and inspect the prompts that were sent.

use crate::domain::{DomainError, LlmReply};
use crate::ports::LlmPort;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// Mock LLM adapter.
///
/// Predetermined responses, no network. Simulates latency with a configurable delay.
pub struct MockLlmAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    script: Mutex<VecDeque<Result<LlmReply, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self::with_delay(100)
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Mock that answers with `replies` in order (`Err` simulates a failed call),
    /// then falls back to canned replies.
    pub fn scripted(replies: Vec<Result<LlmReply, String>>) -> Self {
        let mock = Self::with_delay(0);
        if let Ok(mut script) = mock.script.lock() {
            script.extend(replies);
        }
        mock
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn canned_reply(message: &str) -> LlmReply {
        let lower = message.to_lowercase();
        let text = if lower.contains("analyze this interview answer") {
            "## Evaluation\n\n**Structure score:** 78\nClarity: 82\nTone score - confident (74)\n\
             Relevance: 88/100\n\n### Issues found:\n- The situation takes too long to set up\n\
             - No measurable result is mentioned\n\n### Suggestions for improvement:\n\
             * Open with one sentence of context\n* Quantify the outcome\n\n\
             **Improved answer:**\nWhen our release pipeline kept failing, I traced the flaky \
             tests, rewrote them in a week, and cut failed builds by 60%."
        } else if lower.contains("generate exactly") {
            "Sure! Here are your questions:\n\n1. Explain how a hash map handles collisions\n\
             2. Question: Describe a time you optimized a slow query\n\
             3. Q: What trade-offs do you consider when choosing a data structure?\n\
             4. Tell me about a bug that took you days to find"
        } else if lower.contains("generate one general interview question") {
            "Question: Tell me about a time you disagreed with your manager\n\
             (This assesses conflict resolution.)"
        } else {
            "# Great question!\n\nHere are a few **tips**:\n\n\n\n- Research the company\n\
             - Practice the *STAR* method\n+ Prepare questions for the interviewer"
        };
        LlmReply::text(text)
    }
}

impl Default for MockLlmAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmPort for MockLlmAdapter {
    async fn ask(&self, user_id: &str, message: &str) -> Result<LlmReply, DomainError> {
        info!(
            user_id,
            prompt_len = message.len(),
            "[MOCK] Simulating agent reply"
        );

        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(message.to_string());
        }

        // Simulate network delay
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match scripted {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(DomainError::Llm(e)),
            None => Ok(Self::canned_reply(message)),
        }
    }
}

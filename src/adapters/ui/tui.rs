//! Implements InputPort. Inquire-based interactive practice session.
//!
//! Main menu loops until Quit (or Esc / Ctrl-C). Each backend call shows a spinner.

use crate::domain::{DomainError, FeedbackResult, HistoryEntry, IssueKind};
use crate::ports::InputPort;
use crate::usecases::CoachService;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Select, Text};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Applies the prompt theme globally.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightCyan))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(Color::LightRed));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Chat,
    NextQuestion,
    GenerateQuestions,
    Answer,
    History,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 6] = [
        MenuAction::Chat,
        MenuAction::NextQuestion,
        MenuAction::GenerateQuestions,
        MenuAction::Answer,
        MenuAction::History,
        MenuAction::Quit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Chat => "Chat with the coach",
            MenuAction::NextQuestion => "Get a practice question",
            MenuAction::GenerateQuestions => "Generate a question set",
            MenuAction::Answer => "Answer the current question",
            MenuAction::History => "Review past feedback",
            MenuAction::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Esc and Ctrl-C end the current prompt without being an error.
fn prompt_result<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let pb = spinner(message);
    let out = fut.await;
    pb.finish_and_clear();
    out
}

fn issue_marker(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::Warning => "!",
        IssueKind::Error => "✗",
        IssueKind::Success => "✓",
    }
}

/// Feedback as display lines.
fn render_feedback(feedback: &FeedbackResult, suggestions: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for (label, score) in feedback.labelled_scores() {
        lines.push(format!("{label:<10} {score}"));
    }
    let average = feedback
        .average_score()
        .map_or_else(|| "N/A".to_string(), |avg| format!("{avg}%"));
    lines.push(format!("{:<10} {average}", "Average"));

    if !feedback.issues.is_empty() {
        lines.push(String::new());
        lines.push("Issues:".to_string());
        for issue in &feedback.issues {
            lines.push(format!("  {} {}", issue_marker(issue.kind), issue.message));
        }
    }

    lines.push(String::new());
    lines.push("Suggestions:".to_string());
    for suggestion in suggestions {
        lines.push(format!("  • {suggestion}"));
    }

    if let Some(improved) = &feedback.improved_answer {
        lines.push(String::new());
        lines.push("Improved answer:".to_string());
        lines.push(improved.clone());
    }
    lines
}

fn render_history_entry(entry: &HistoryEntry) -> String {
    let average = entry
        .average_score()
        .map_or_else(|| "N/A".to_string(), |avg| format!("{avg}%"));
    format!(
        "{}  [{}]  {}",
        entry.created_at.format("%Y-%m-%d %H:%M"),
        average,
        entry.question
    )
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    coach: Arc<CoachService>,
    user_id: String,
    history_limit: usize,
    current_question: Mutex<Option<String>>,
}

impl TuiInputPort {
    pub fn new(coach: Arc<CoachService>, user_id: impl Into<String>, history_limit: usize) -> Self {
        Self {
            coach,
            user_id: user_id.into(),
            history_limit,
            current_question: Mutex::new(None),
        }
    }

    fn set_current(&self, question: Option<String>) {
        *self.current_question.lock().unwrap_or_else(|e| e.into_inner()) = question;
    }

    fn current(&self) -> Option<String> {
        self.current_question
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn chat(&self) -> Result<(), DomainError> {
        let Some(message) = prompt_result(Text::new("You:").prompt())? else {
            return Ok(());
        };
        if message.trim().is_empty() {
            return Ok(());
        }
        match with_spinner("Thinking...", self.coach.chat(&self.user_id, &message)).await {
            Ok(reply) => println!("\n{reply}\n"),
            Err(e) => println!("\nCould not reach the coach: {e}\n"),
        }
        Ok(())
    }

    async fn next_question(&self) {
        let question =
            with_spinner("Picking a question...", self.coach.next_question(&self.user_id)).await;
        println!("\nQ: {question}\n");
        self.set_current(Some(question));
    }

    async fn generate_questions(&self) -> Result<(), DomainError> {
        let Some(request) = prompt_result(
            Text::new("What should the questions cover?")
                .with_help_message("e.g. \"5 system design questions\" (1-10, default 3)")
                .prompt(),
        )?
        else {
            return Ok(());
        };

        let result = with_spinner(
            "Generating questions...",
            self.coach.generate_questions(&self.user_id, &request),
        )
        .await;
        let questions = match result {
            Ok(questions) => questions.into_inner(),
            Err(e) => {
                println!("\nCould not generate questions: {e}\n");
                return Ok(());
            }
        };

        let Some(chosen) = prompt_result(
            Select::new("Pick a question to practice:", questions).prompt(),
        )?
        else {
            return Ok(());
        };
        println!("\nQ: {chosen}\n");
        self.set_current(Some(chosen));
        Ok(())
    }

    async fn answer(&self) -> Result<(), DomainError> {
        let Some(question) = self.current() else {
            println!("\nNo current question. Get or generate one first.\n");
            return Ok(());
        };
        println!("\nQ: {question}");
        let Some(answer) = prompt_result(Text::new("Your answer:").prompt())? else {
            return Ok(());
        };
        if answer.trim().is_empty() {
            return Ok(());
        }

        let feedback = with_spinner(
            "Evaluating your answer...",
            self.coach.evaluate_answer(&self.user_id, &question, &answer),
        )
        .await;
        let suggestions = self.coach.display_suggestions(&feedback);

        println!();
        for line in render_feedback(&feedback, &suggestions) {
            println!("{line}");
        }
        println!();
        Ok(())
    }

    async fn history(&self) {
        match self.coach.history(&self.user_id, self.history_limit).await {
            Ok(entries) if entries.is_empty() => println!("\nNo feedback yet.\n"),
            Ok(entries) => {
                println!();
                for entry in &entries {
                    println!("{}", render_history_entry(entry));
                }
                println!();
            }
            Err(e) => println!("\nCould not load history: {e}\n"),
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let Some(action) = prompt_result(
                Select::new("What would you like to do?", MenuAction::ALL.to_vec()).prompt(),
            )?
            else {
                return Ok(());
            };

            match action {
                MenuAction::Chat => self.chat().await?,
                MenuAction::NextQuestion => self.next_question().await,
                MenuAction::GenerateQuestions => self.generate_questions().await?,
                MenuAction::Answer => self.answer().await?,
                MenuAction::History => self.history().await,
                MenuAction::Quit => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Issue, ScoreValue};

    #[test]
    fn test_render_feedback_scores_and_sections() {
        let feedback = FeedbackResult {
            structure: ScoreValue::new(80).unwrap(),
            clarity: ScoreValue::new(60).unwrap(),
            issues: vec![Issue::warning("rambling intro")],
            improved_answer: Some("Lead with the result.".to_string()),
            ..FeedbackResult::default()
        };
        let lines = render_feedback(&feedback, &["add numbers".to_string()]);

        assert!(lines.contains(&"Structure  80%".to_string()));
        assert!(lines.contains(&"Tone       N/A".to_string()));
        assert!(lines.contains(&"Average    70%".to_string()));
        assert!(lines.contains(&"  ! rambling intro".to_string()));
        assert!(lines.contains(&"  • add numbers".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Lead with the result."));
    }

    #[test]
    fn test_render_unavailable_feedback() {
        let lines = render_feedback(&FeedbackResult::unavailable(), &[]);
        assert!(lines.contains(&"Average    N/A".to_string()));
        assert!(!lines.iter().any(|l| l == "Issues:"));
    }

    #[test]
    fn test_prompt_cancel_is_not_error() {
        assert_eq!(
            prompt_result::<String>(Err(InquireError::OperationCanceled)).unwrap(),
            None
        );
        assert!(prompt_result::<String>(Err(InquireError::NotTTY)).is_err());
    }

    #[test]
    fn test_menu_labels() {
        assert_eq!(MenuAction::Quit.to_string(), "Quit");
        assert_eq!(MenuAction::ALL.len(), 6);
    }
}

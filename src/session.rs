//! Per-process session state: the loaded document, the chat transcript, the
//! cached summary, and the model settings.
//!
//! One session exists per interactive process and is owned by exactly one
//! user; handlers take `&mut Session` so there are no process-wide
//! singletons and no shared mutable state. Nothing here survives a restart.
//!
//! Reset semantics on a new document load: transcript and summary are
//! cleared, the document is replaced wholesale, and the question counter is
//! left alone — it counts questions for the life of the process, not per
//! document.

use crate::config::AssistantConfig;
use crate::ingest::Document;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Lowercase name used in prompt history lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript entry. Append-only; chronological order is the only
/// invariant and both history slicing and export rely on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Transient state for one interactive user.
#[derive(Debug, Clone)]
pub struct Session {
    document: Option<Document>,
    messages: Vec<Message>,
    summary: Option<String>,
    model: String,
    temperature: f32,
    questions_asked: u64,
}

impl Session {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            document: None,
            messages: Vec::new(),
            summary: None,
            model: config.model.clone(),
            temperature: config.temperature,
            questions_asked: 0,
        }
    }

    // ── Document ──────────────────────────────────────────────────────────

    /// Replace the current document and reset everything derived from it.
    ///
    /// The question counter is intentionally NOT reset.
    pub fn load_document(&mut self, document: Document) {
        debug!(
            "Loading '{}' ({} pages); clearing {} messages",
            document.name,
            document.page_count,
            self.messages.len()
        );
        self.messages.clear();
        self.summary = None;
        self.document = Some(document);
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    // ── Transcript ────────────────────────────────────────────────────────

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Empty the transcript. Summary, document, and counter stay put.
    pub fn clear_chat(&mut self) {
        self.messages.clear();
    }

    /// The last `n` messages formatted as `role: content`, newline-joined.
    /// Used as the bounded history block in chat prompts.
    pub fn recent_history(&self, n: usize) -> String {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..]
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Transcript as downloadable plain text: `ROLE: content` blocks
    /// separated by blank lines. Empty transcript exports as an empty string.
    pub fn export_transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    // ── Summary ───────────────────────────────────────────────────────────

    /// Overwrite the cached summary. Regeneration is an idempotent overwrite:
    /// there is always at most one summary.
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    // ── Counters & settings ───────────────────────────────────────────────

    /// Bump the cumulative question counter. Monotonic; never reset.
    pub fn record_question(&mut self) {
        self.questions_asked += 1;
    }

    pub fn questions_asked(&self) -> u64 {
        self.questions_asked
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Set the sampling temperature, clamped to `[0.0, 1.0]`.
    pub fn set_temperature(&mut self, temperature: f32) {
        self.temperature = temperature.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&AssistantConfig::default())
    }

    #[test]
    fn export_of_empty_transcript_is_empty() {
        assert_eq!(session().export_transcript(), "");
    }

    #[test]
    fn export_uppercases_roles_and_joins_with_blank_lines() {
        let mut s = session();
        s.append(Message::user("What is this?"));
        s.append(Message::assistant("A test."));
        assert_eq!(
            s.export_transcript(),
            "USER: What is this?\n\nASSISTANT: A test."
        );
    }

    #[test]
    fn load_document_clears_transcript_and_summary_but_not_counter() {
        let mut s = session();
        s.append(Message::user("q"));
        s.append(Message::assistant("a"));
        s.record_question();
        s.set_summary("old summary");

        s.load_document(Document::from_text("next.pdf", "fresh text", 1));

        assert!(s.messages().is_empty());
        assert!(s.summary().is_none());
        assert_eq!(s.questions_asked(), 1);
        assert_eq!(s.document().unwrap().name, "next.pdf");
    }

    #[test]
    fn clear_chat_keeps_counter_and_summary() {
        let mut s = session();
        s.append(Message::user("q"));
        s.record_question();
        s.set_summary("kept");

        s.clear_chat();

        assert!(s.messages().is_empty());
        assert_eq!(s.questions_asked(), 1);
        assert_eq!(s.summary(), Some("kept"));
    }

    #[test]
    fn recent_history_is_bounded_and_formatted() {
        let mut s = session();
        for i in 0..5 {
            s.append(Message::user(format!("q{i}")));
            s.append(Message::assistant(format!("a{i}")));
        }
        let history = s.recent_history(6);
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "user: q2");
        assert_eq!(lines[5], "assistant: a4");
    }

    #[test]
    fn recent_history_shorter_than_window() {
        let mut s = session();
        s.append(Message::user("only"));
        assert_eq!(s.recent_history(6), "user: only");
    }

    #[test]
    fn summary_overwrite_is_idempotent() {
        let mut s = session();
        s.set_summary("first");
        s.set_summary("second");
        assert_eq!(s.summary(), Some("second"));
    }

    #[test]
    fn message_serialises_with_lowercase_role() {
        let m = Message::assistant("hi");
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains(r#""role":"assistant""#), "got: {json}");
    }

    #[test]
    fn temperature_is_clamped() {
        let mut s = session();
        s.set_temperature(1.7);
        assert_eq!(s.temperature(), 1.0);
        s.set_temperature(-0.3);
        assert_eq!(s.temperature(), 0.0);
    }
}

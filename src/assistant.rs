//! Request handlers: each user action reads the session, applies one state
//! transition, makes at most one gateway call, and returns the text to
//! render. The presentation layer owns rendering; this module owns the
//! transitions.
//!
//! Control flow is strictly one action at a time — every handler takes
//! `&mut self` and awaits its single gateway call to completion, so there is
//! no shared mutable state and no way to interleave actions. A gateway
//! failure aborts the current action only; the session stays usable.

use crate::config::AssistantConfig;
use crate::error::PdfChatError;
use crate::gateway::{Completion, LlmGateway};
use crate::ingest::Document;
use crate::prompts;
use crate::session::{Message, Session};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The assistant: one session plus the completion backend it talks through.
pub struct Assistant {
    session: Session,
    completion: Arc<dyn Completion>,
}

impl Assistant {
    /// Build an assistant from a configuration. Uses the configured
    /// completion backend when present, otherwise the real [`LlmGateway`].
    pub fn new(config: AssistantConfig) -> Self {
        let completion = config.completion.clone().unwrap_or_else(|| {
            Arc::new(LlmGateway::new(
                config.provider_name.clone(),
                config.max_tokens,
            ))
        });
        Self {
            session: Session::new(&config),
            completion,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── Document ──────────────────────────────────────────────────────────

    /// Ingest a PDF payload and make it the session's document. Transcript
    /// and summary are cleared; the question counter is not.
    pub fn load_pdf(&mut self, name: &str, bytes: &[u8]) -> Result<&Document, PdfChatError> {
        let document = Document::from_pdf_bytes(name, bytes)?;
        self.session.load_document(document);
        Ok(self.session.document().expect("document just loaded"))
    }

    /// Load an already-extracted document (non-PDF sources, tests).
    pub fn load_document(&mut self, document: Document) {
        self.session.load_document(document);
    }

    // ── Chat ──────────────────────────────────────────────────────────────

    /// Free-form chat: append the question, compose the prompt with the
    /// bounded history window, call the gateway once, append the answer,
    /// bump the question counter.
    ///
    /// On failure the user message stays in the transcript and no assistant
    /// message is appended — the transcript records what was asked.
    pub async fn ask(&mut self, question: &str) -> Result<String, PdfChatError> {
        // Only the excerpt survives into the prompt, so clone just that much
        // before the transcript borrow begins.
        let excerpt = self.document_excerpt(prompts::CHAT_EXCERPT_CHARS)?;

        self.session.append(Message::user(question));
        // History is taken after the append, so the new question appears in
        // the history block as well.
        let history = self.session.recent_history(prompts::HISTORY_WINDOW);
        let prompt = prompts::chat_prompt(&excerpt, &history, question);

        let answer = self.complete(&prompt).await?;
        self.session.append(Message::assistant(&answer));
        self.session.record_question();
        info!("Answered question #{}", self.session.questions_asked());
        Ok(answer)
    }

    /// One of the fixed quick questions, by index. No history in the prompt;
    /// transcript and counter behave exactly as in [`Assistant::ask`].
    pub async fn quick_ask(&mut self, index: usize) -> Result<String, PdfChatError> {
        let question = *prompts::QUICK_QUESTIONS.get(index).ok_or(
            PdfChatError::UnknownQuickQuestion {
                index,
                available: prompts::QUICK_QUESTIONS.len(),
            },
        )?;

        let excerpt = self.document_excerpt(prompts::CHAT_EXCERPT_CHARS)?;
        self.session.append(Message::user(question));
        let prompt = prompts::question_prompt(&excerpt, question);

        let answer = self.complete(&prompt).await?;
        self.session.append(Message::assistant(&answer));
        self.session.record_question();
        Ok(answer)
    }

    // ── Summary & quiz ────────────────────────────────────────────────────

    /// Generate a 5-bullet summary and cache it, overwriting any previous
    /// one. Leaves the transcript and question counter untouched.
    pub async fn generate_summary(&mut self) -> Result<String, PdfChatError> {
        let excerpt = self.document_excerpt(prompts::SUMMARY_EXCERPT_CHARS)?;
        let summary = self.complete(&prompts::summary_prompt(&excerpt)).await?;
        self.session.set_summary(summary.clone());
        Ok(summary)
    }

    /// Generate a fresh quiz. Never cached: each call produces a new one and
    /// only the latest is displayed.
    pub async fn generate_quiz(&self) -> Result<String, PdfChatError> {
        let excerpt = self.document_excerpt(prompts::SUMMARY_EXCERPT_CHARS)?;
        self.complete(&prompts::quiz_prompt(&excerpt)).await
    }

    // ── Transcript ────────────────────────────────────────────────────────

    pub fn clear_chat(&mut self) {
        self.session.clear_chat();
    }

    pub fn export_transcript(&self) -> String {
        self.session.export_transcript()
    }

    /// Write the transcript to `path` as plain text. An empty transcript
    /// produces an empty file.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<(), PdfChatError> {
        let path = path.as_ref();
        std::fs::write(path, self.session.export_transcript()).map_err(|source| {
            PdfChatError::ExportFailed {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    // ── Settings ──────────────────────────────────────────────────────────

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.session.set_model(model);
    }

    pub fn set_temperature(&mut self, temperature: f32) {
        self.session.set_temperature(temperature);
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn document_excerpt(&self, max_chars: usize) -> Result<String, PdfChatError> {
        let document = self.session.document().ok_or(PdfChatError::NoDocument)?;
        Ok(prompts::excerpt(&document.text, max_chars).to_string())
    }

    async fn complete(&self, prompt: &str) -> Result<String, PdfChatError> {
        self.completion
            .complete(self.session.model(), self.session.temperature(), prompt)
            .await
    }
}

//! Error types for the pdfchat library.
//!
//! There is deliberately no retry or recovery machinery here: a failed
//! gateway call aborts the current user action and nothing else. Errors
//! carry enough context for the presentation layer to print a single
//! actionable line and return to the prompt.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfchat library.
#[derive(Debug, Error)]
pub enum PdfChatError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The PDF could not be parsed or its text layer could not be read.
    ///
    /// Pages without extractable text (scanned images) are NOT an error —
    /// they contribute empty text. This fires only when the document itself
    /// is unreadable.
    #[error("Failed to extract text from '{name}': {detail}")]
    ExtractionFailed { name: String, detail: String },

    /// An action that needs a document was requested before one was loaded.
    #[error("No document loaded. Load a PDF first.")]
    NoDocument,

    // ── Prompt errors ─────────────────────────────────────────────────────
    /// Quick-question index outside the fixed set.
    #[error("Unknown quick question #{index} (there are {available})")]
    UnknownQuickQuestion { index: usize, available: usize },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No provider could be constructed (usually a missing API key).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The chat-completion call failed. Single attempt, no retry: the
    /// provider's error is surfaced verbatim and the action is abandoned.
    #[error("LLM request failed: {message}")]
    CompletionFailed { message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the exported transcript.
    #[error("Failed to write transcript to '{path}': {source}")]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_failed_display() {
        let e = PdfChatError::ExtractionFailed {
            name: "report.pdf".into(),
            detail: "bad xref table".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("report.pdf"), "got: {msg}");
        assert!(msg.contains("bad xref table"), "got: {msg}");
    }

    #[test]
    fn provider_not_configured_display() {
        let e = PdfChatError::ProviderNotConfigured {
            provider: "openai".into(),
            hint: "Set OPENAI_API_KEY".into(),
        };
        assert!(e.to_string().contains("openai"));
        assert!(e.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn unknown_quick_question_display() {
        let e = PdfChatError::UnknownQuickQuestion {
            index: 7,
            available: 3,
        };
        assert!(e.to_string().contains("#7"));
    }
}

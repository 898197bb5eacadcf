//! # pdfchat
//!
//! Chat with PDF documents using hosted LLMs.
//!
//! Load a PDF, then ask free-form questions, request a 5-bullet summary, or
//! generate a multiple-choice quiz — all grounded in a character-bounded
//! excerpt of the extracted text. The library owns the session logic; the
//! `pdfchat` binary (feature `cli`, on by default) wraps it in an
//! interactive terminal REPL.
//!
//! ## Flow
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Ingest    extract text (pdf-extract) + page count (lopdf)
//!  ├─ 2. Session   document, transcript, cached summary, settings
//!  ├─ 3. Prompts   summary / quiz / quick-question / chat templates
//!  ├─ 4. Gateway   one chat-completion call per user action
//!  └─ 5. Render    the caller displays the returned text
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfchat::{Assistant, AssistantConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let mut assistant = Assistant::new(AssistantConfig::default());
//!
//!     let bytes = std::fs::read("report.pdf")?;
//!     let doc = assistant.load_pdf("report.pdf", &bytes)?;
//!     println!("{} pages, {} words", doc.page_count, doc.word_count);
//!
//!     let answer = assistant.ask("What is this document about?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! ## Behaviour notes
//!
//! * Excerpts are bounded by characters, not tokens.
//! * Gateway calls are single-shot: no retries, no streaming, no explicit
//!   timeout. Failures abort the current action and nothing else.
//! * Loading a new document clears the transcript and cached summary; the
//!   cumulative question counter is never reset.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod assistant;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ingest;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use assistant::Assistant;
pub use config::{AssistantConfig, AssistantConfigBuilder, DEFAULT_MODEL, KNOWN_MODELS};
pub use error::PdfChatError;
pub use gateway::{Completion, LlmGateway};
pub use ingest::Document;
pub use session::{Message, Role, Session};

//! Prompt templates for the four request kinds: summary, quiz,
//! quick-question, and free-form chat.
//!
//! Centralising every prompt here keeps a single source of truth and lets
//! unit tests inspect the composed strings without touching a provider.
//!
//! Document excerpts are bounded by *characters*, not tokens — a deliberate
//! simplification. The limits (6 000 chars for summary/quiz, 8 000 for
//! chat) keep prompts comfortably inside the context window of every model
//! in the default set.

/// Excerpt budget for summary and quiz prompts, in characters.
pub const SUMMARY_EXCERPT_CHARS: usize = 6000;

/// Excerpt budget for chat and quick-question prompts, in characters.
pub const CHAT_EXCERPT_CHARS: usize = 8000;

/// How many recent transcript entries a chat prompt carries.
pub const HISTORY_WINDOW: usize = 6;

/// The fixed quick-question shortcuts offered by the presentation layer.
pub const QUICK_QUESTIONS: [&str; 3] = [
    "What is this document about?",
    "What are the key points?",
    "Give me the main conclusions.",
];

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Instruct the model to produce a 5-bullet summary of the excerpt.
pub fn summary_prompt(document_text: &str) -> String {
    format!(
        "Summarize this document in 5 bullet points:\n\n{}",
        excerpt(document_text, SUMMARY_EXCERPT_CHARS)
    )
}

/// Instruct the model to produce 5 multiple-choice questions with four
/// labelled options and an answer line.
pub fn quiz_prompt(document_text: &str) -> String {
    format!(
        "Generate 5 multiple choice questions from this document. \
         Format each as Q: ... A) ... B) ... C) ... D) ... Answer: ...\n\n{}",
        excerpt(document_text, SUMMARY_EXCERPT_CHARS)
    )
}

/// Excerpt plus a single question, no history. Used by the quick-question
/// shortcuts.
pub fn question_prompt(document_text: &str, question: &str) -> String {
    format!(
        "Document:\n{}\n\nQuestion: {}",
        excerpt(document_text, CHAT_EXCERPT_CHARS),
        question
    )
}

/// Full chat prompt: instructional wrapper, excerpt, bounded history block,
/// and the new question.
///
/// `history` is expected to already include the new user message — the
/// session appends it before composing the prompt, so the question appears
/// both in the history block and after `Question:`.
pub fn chat_prompt(document_text: &str, history: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant. Answer based on this document.\n\n\
         Document:\n{}\n\n\
         History:\n{}\n\n\
         Question: {}",
        excerpt(document_text, CHAT_EXCERPT_CHARS),
        history,
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_returns_short_text_whole() {
        assert_eq!(excerpt("short", 100), "short");
    }

    #[test]
    fn excerpt_limits_by_characters() {
        let text = "a".repeat(7000);
        assert_eq!(excerpt(&text, SUMMARY_EXCERPT_CHARS).len(), 6000);
    }

    #[test]
    fn excerpt_never_splits_a_code_point() {
        // 'é' is two bytes; counting bytes would cut mid-character.
        let text = "é".repeat(10);
        let cut = excerpt(&text, 4);
        assert_eq!(cut.chars().count(), 4);
        assert_eq!(cut, "éééé");
    }

    #[test]
    fn summary_prompt_carries_instruction_and_excerpt() {
        let p = summary_prompt("the document body");
        assert!(p.starts_with("Summarize this document in 5 bullet points:"));
        assert!(p.ends_with("the document body"));
    }

    #[test]
    fn summary_prompt_truncates_long_documents() {
        let text = "x".repeat(10_000);
        let p = summary_prompt(&text);
        let body = p.rsplit("\n\n").next().unwrap();
        assert_eq!(body.len(), SUMMARY_EXCERPT_CHARS);
    }

    #[test]
    fn quiz_prompt_names_the_answer_format() {
        let p = quiz_prompt("body");
        assert!(p.contains("5 multiple choice questions"));
        assert!(p.contains("A) ... B) ... C) ... D) ... Answer:"));
    }

    #[test]
    fn question_prompt_has_no_history_block() {
        let p = question_prompt("body", "What is this document about?");
        assert!(p.starts_with("Document:\nbody"));
        assert!(p.ends_with("Question: What is this document about?"));
        assert!(!p.contains("History:"));
    }

    #[test]
    fn chat_prompt_layout() {
        let p = chat_prompt("body", "user: hi\nassistant: hello", "next?");
        assert!(p.starts_with("You are a helpful assistant."));
        assert!(p.contains("Document:\nbody"));
        assert!(p.contains("History:\nuser: hi\nassistant: hello"));
        assert!(p.ends_with("Question: next?"));
    }

    #[test]
    fn chat_prompt_uses_the_larger_budget() {
        let text = "y".repeat(9000);
        let p = chat_prompt(&text, "", "q");
        assert!(p.contains(&"y".repeat(8000)));
        assert!(!p.contains(&"y".repeat(8001)));
    }
}

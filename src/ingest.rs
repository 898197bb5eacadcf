//! Document ingestion: PDF bytes in, plain text plus counts out.
//!
//! Two parsers cooperate:
//!
//! * `lopdf` reads the page catalog, so the reported page count is exact
//!   even when a page yields no text (scanned images).
//! * `pdf-extract` pulls the text layer. It joins pages with form feed
//!   characters (`\x0C`); those are stripped so page texts end up
//!   concatenated with no explicit separator.
//!
//! A page without extractable text simply contributes an empty string —
//! extraction degrades gracefully to partial or empty output. Only a
//! document that cannot be parsed at all is an error.

use crate::error::PdfChatError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// Contiguous word-character runs, Unicode-aware.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));

/// An extracted document. Immutable once created; a new upload replaces the
/// whole value, never mutates it.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source filename, for display only.
    pub name: String,
    /// Concatenated per-page text with no separator between pages.
    pub text: String,
    /// Number of pages in the PDF catalog, independent of text yield.
    pub page_count: usize,
    /// Number of contiguous word-character runs in `text`.
    pub word_count: usize,
}

impl Document {
    /// Parse a binary PDF payload into a [`Document`].
    ///
    /// # Errors
    /// [`PdfChatError::ExtractionFailed`] when the PDF itself is unreadable
    /// (corrupt header, bad xref, not a PDF at all). Pages with no text
    /// layer are not an error.
    pub fn from_pdf_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, PdfChatError> {
        let name = name.into();

        let catalog =
            lopdf::Document::load_mem(bytes).map_err(|e| PdfChatError::ExtractionFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?;
        let page_count = catalog.get_pages().len();

        // pdf-extract may log "Unicode mismatch" noise on ligatures; that is
        // informational and does not affect the extracted text.
        let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            PdfChatError::ExtractionFailed {
                name: name.clone(),
                detail: e.to_string(),
            }
        })?;

        // Strip the form feeds pdf-extract inserts between pages.
        let text: String = raw.split('\x0C').collect();
        let word_count = count_words(&text);

        info!(
            "Extracted '{}': {} pages, {} words, {} chars",
            name,
            page_count,
            word_count,
            text.len()
        );
        if text.trim().is_empty() {
            debug!("'{}' has no extractable text (scanned document?)", name);
        }

        Ok(Self {
            name,
            text,
            page_count,
            word_count,
        })
    }

    /// Build a document from already-extracted text.
    ///
    /// Useful when the text comes from somewhere other than a PDF payload,
    /// and for driving the session logic in tests without real PDF bytes.
    pub fn from_text(
        name: impl Into<String>,
        text: impl Into<String>,
        page_count: usize,
    ) -> Self {
        let text = text.into();
        let word_count = count_words(&text);
        Self {
            name: name.into(),
            text,
            page_count,
            word_count,
        }
    }
}

/// Count contiguous word-character runs (`\w+`) in `text`.
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_simple_words() {
        assert_eq!(count_words("Hello World"), 2);
        assert_eq!(count_words("one, two; three!"), 3);
    }

    #[test]
    fn counts_unicode_words() {
        assert_eq!(count_words("héllo wörld"), 2);
    }

    #[test]
    fn empty_text_has_zero_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t  "), 0);
    }

    #[test]
    fn runs_without_separators_count_as_one() {
        // "WorldHello" is a single contiguous run.
        assert_eq!(count_words("Hello WorldHello World"), 3);
    }

    #[test]
    fn from_text_computes_word_count() {
        let doc = Document::from_text("report.pdf", "Hello World\nHello World\nHello World\n", 3);
        assert_eq!(doc.page_count, 3);
        assert_eq!(doc.word_count, 6);
        assert_eq!(doc.name, "report.pdf");
    }

    #[test]
    fn garbage_bytes_are_an_extraction_error() {
        let err = Document::from_pdf_bytes("junk.pdf", b"This is not a PDF").unwrap_err();
        assert!(matches!(err, PdfChatError::ExtractionFailed { .. }));
        assert!(err.to_string().contains("junk.pdf"));
    }

    /// A two-page PDF built in memory: page 1 says "Hello World", page 2 has
    /// an empty content stream (like a scanned page with no text layer).
    fn two_page_pdf() -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let text_content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal("Hello World")]),
                Operation::new("ET", vec![]),
            ],
        };
        let text_stream_id = doc.add_object(Stream::new(
            dictionary! {},
            text_content.encode().unwrap(),
        ));
        let text_page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => text_stream_id,
        });

        let blank_stream_id = doc.add_object(Stream::new(
            dictionary! {},
            Content { operations: vec![] }.encode().unwrap(),
        ));
        let blank_page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => blank_stream_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![text_page_id.into(), blank_page_id.into()],
                "Count" => 2,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn page_count_comes_from_the_catalog_not_the_text_yield() {
        let doc = Document::from_pdf_bytes("tiny.pdf", &two_page_pdf()).unwrap();

        // The blank page has no text but still counts.
        assert_eq!(doc.page_count, 2);
        assert!(doc.text.contains("Hello World"), "got: {:?}", doc.text);
        assert_eq!(doc.word_count, 2);
        assert!(
            !doc.text.contains('\x0C'),
            "page separators must be stripped: {:?}",
            doc.text
        );
    }
}

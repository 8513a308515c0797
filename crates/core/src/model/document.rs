use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::DocumentId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("document filename cannot be empty")]
    EmptyFilename,

    #[error("document content cannot be empty")]
    EmptyContent,
}

//
// ─── DOCUMENT ──────────────────────────────────────────────────────────────────
//

/// Paragraphs shorter than this many characters carry too little
/// material to ask a question about and are skipped.
pub const MIN_PARAGRAPH_CHARS: usize = 10;

/// Reference text uploaded by a teacher, the raw material questions are
/// generated from. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: DocumentId,
    filename: String,
    content: String,
    uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Creates a new Document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EmptyFilename` if the filename is empty or
    /// whitespace-only, `DocumentError::EmptyContent` if the text is.
    pub fn new(
        id: DocumentId,
        filename: impl Into<String>,
        content: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Result<Self, DocumentError> {
        let filename = filename.into();
        if filename.trim().is_empty() {
            return Err(DocumentError::EmptyFilename);
        }
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DocumentError::EmptyContent);
        }

        Ok(Self {
            id,
            filename: filename.trim().to_owned(),
            content,
            uploaded_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    /// Splits the content into quizzable paragraphs.
    ///
    /// Pieces are separated by line breaks (blank lines collapse), trimmed,
    /// and kept only when longer than [`MIN_PARAGRAPH_CHARS`] characters.
    /// Order follows the document.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<&str> {
        split_paragraphs(&self.content)
    }
}

/// Segmentation used by [`Document::paragraphs`], exposed for callers that
/// hold raw text.
#[must_use]
pub fn split_paragraphs(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn doc(content: &str) -> Document {
        Document::new(DocumentId::generate(), "history.txt", content, fixed_now()).unwrap()
    }

    #[test]
    fn document_rejects_empty_filename() {
        let err =
            Document::new(DocumentId::generate(), "  ", "some content", fixed_now()).unwrap_err();
        assert_eq!(err, DocumentError::EmptyFilename);
    }

    #[test]
    fn document_rejects_empty_content() {
        let err =
            Document::new(DocumentId::generate(), "notes.txt", "  \n ", fixed_now()).unwrap_err();
        assert_eq!(err, DocumentError::EmptyContent);
    }

    #[test]
    fn document_trims_filename() {
        let doc =
            Document::new(DocumentId::generate(), " notes.txt ", "body text here", fixed_now())
                .unwrap();
        assert_eq!(doc.filename(), "notes.txt");
    }

    #[test]
    fn paragraphs_split_on_newlines() {
        let doc = doc("The industrial revolution began in Britain.\nSteam power transformed manufacturing everywhere.");
        assert_eq!(
            doc.paragraphs(),
            vec![
                "The industrial revolution began in Britain.",
                "Steam power transformed manufacturing everywhere.",
            ]
        );
    }

    #[test]
    fn paragraphs_collapse_blank_lines() {
        let doc = doc("First meaningful paragraph.\n\n   \n\nSecond meaningful paragraph.");
        assert_eq!(doc.paragraphs().len(), 2);
    }

    #[test]
    fn paragraphs_drop_short_pieces() {
        let doc = doc("tiny\nA sentence long enough to quiz on.\nalso tiny");
        assert_eq!(doc.paragraphs(), vec!["A sentence long enough to quiz on."]);
    }

    #[test]
    fn paragraphs_trim_each_piece() {
        let doc = doc("   padded but long enough to keep   ");
        assert_eq!(doc.paragraphs(), vec!["padded but long enough to keep"]);
    }

    #[test]
    fn paragraph_length_counts_chars_not_bytes() {
        // Eleven CJK characters pass the threshold even though each is
        // multiple bytes.
        let doc = doc("工业革命起源于英国本土");
        assert_eq!(doc.paragraphs().len(), 1);
    }

    #[test]
    fn paragraphs_preserve_document_order() {
        let doc = doc("Alpha paragraph one.\nBeta paragraph two.\nGamma paragraph three.");
        let paragraphs = doc.paragraphs();
        assert_eq!(paragraphs[0], "Alpha paragraph one.");
        assert_eq!(paragraphs[2], "Gamma paragraph three.");
    }
}

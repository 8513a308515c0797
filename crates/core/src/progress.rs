//! Paragraph-window policy for sequential question generation.
//!
//! A user walks their selected document one window of paragraphs at a
//! time. The window never runs past the end of the document; once the
//! offset reaches the end it wraps to the top and the walk starts over.

/// Questions requested per generation round.
pub const QUESTIONS_PER_ROUND: usize = 5;

/// The slice of paragraphs one round will quiz on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphWindow {
    /// Index of the first paragraph in the window.
    pub start: usize,
    /// Number of paragraphs covered; zero when the document has none.
    pub count: usize,
}

impl ParagraphWindow {
    /// The offset the user should carry after this round completes.
    #[must_use]
    pub fn next_offset(&self) -> u32 {
        u32::try_from(self.start + self.count).unwrap_or(u32::MAX)
    }

    /// True when the window starts at the top of the document.
    #[must_use]
    pub fn starts_at_top(&self) -> bool {
        self.start == 0
    }
}

/// Computes the next paragraph window.
///
/// An offset at or past the end wraps to zero before the window is cut;
/// the window is then capped at `batch` paragraphs or whatever remains
/// before the end, whichever is smaller.
#[must_use]
pub fn next_window(current_offset: u32, total_paragraphs: usize, batch: usize) -> ParagraphWindow {
    if total_paragraphs == 0 {
        return ParagraphWindow { start: 0, count: 0 };
    }

    let mut start = current_offset as usize;
    if start >= total_paragraphs {
        start = 0;
    }

    let remaining = total_paragraphs - start;
    ParagraphWindow {
        start,
        count: batch.min(remaining),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

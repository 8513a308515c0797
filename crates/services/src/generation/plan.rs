use quiz_core::{next_window, ParagraphWindow, QUESTIONS_PER_ROUND};

/// Characters of an answered question kept for the prompt's exclusion list.
pub const EXCERPT_CHARS: usize = 100;

/// How one generation round draws on the source document.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationPlan {
    /// Walk the document in order: one question per selected paragraph.
    Sequential {
        window: ParagraphWindow,
        paragraphs: Vec<String>,
        excluded: Vec<String>,
        first_round: bool,
    },
    /// Whole-document mode: a fixed mix drawn from anywhere in the text.
    Random { content: String },
}

impl GenerationPlan {
    /// Number of questions this plan asks the model for.
    #[must_use]
    pub fn question_count(&self) -> usize {
        match self {
            GenerationPlan::Sequential { window, .. } => window.count,
            GenerationPlan::Random { .. } => QUESTIONS_PER_ROUND,
        }
    }

    /// The paragraph offset to carry once the round persists.
    ///
    /// Random mode tracks no progress and returns `None`.
    #[must_use]
    pub fn next_offset(&self) -> Option<u32> {
        match self {
            GenerationPlan::Sequential { window, .. } => Some(window.next_offset()),
            GenerationPlan::Random { .. } => None,
        }
    }
}

/// Plans one sequential round.
///
/// Cuts the next paragraph window starting at `current_offset`, wrapping to
/// the top once the offset reaches the end of the document. The round counts
/// as a first pass only when it starts at the top with nothing excluded;
/// later rounds push the prompt to vary its questions.
#[must_use]
pub fn plan_sequential(
    current_offset: u32,
    paragraphs: &[&str],
    excluded: Vec<String>,
) -> GenerationPlan {
    let window = next_window(current_offset, paragraphs.len(), QUESTIONS_PER_ROUND);
    let selected = paragraphs[window.start..window.start + window.count]
        .iter()
        .map(|p| (*p).to_owned())
        .collect();
    let first_round = window.starts_at_top() && excluded.is_empty();

    GenerationPlan::Sequential {
        window,
        paragraphs: selected,
        excluded,
        first_round,
    }
}

/// Plans one random-mode round over the whole document text.
#[must_use]
pub fn plan_random(content: &str) -> GenerationPlan {
    GenerationPlan::Random {
        content: content.to_owned(),
    }
}

/// Clips an answered question's content for the exclusion list.
#[must_use]
pub fn excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_CHARS).collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

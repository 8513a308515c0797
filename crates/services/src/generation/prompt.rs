use crate::generation::plan::GenerationPlan;

/// Characters of each paragraph shown to the model.
const PARAGRAPH_CLIP_CHARS: usize = 150;

/// Length cap the prompt imposes on fill-in-the-blank answers.
const FILL_ANSWER_MAX_CHARS: usize = 10;

/// Random mode always asks for this fixed mix.
const RANDOM_CHOICE_COUNT: usize = 3;
const RANDOM_FILL_COUNT: usize = 2;

/// The exact reply shape the parser expects.
const RESPONSE_SCHEMA: &str = r#"{
  "questions": [
    {
      "type": "choice",
      "content": "question text",
      "options": [
        {"label": "A", "text": "option A text"},
        {"label": "B", "text": "option B text"},
        {"label": "C", "text": "option C text"},
        {"label": "D", "text": "option D text"}
      ],
      "correct_answer": "A"
    },
    {
      "type": "fill",
      "content": "question text (mark the blank with ____)",
      "correct_answer": "the answer (10 characters or fewer)"
    }
  ]
}"#;

/// Renders the model prompt for one generation round.
#[must_use]
pub fn render_prompt(plan: &GenerationPlan) -> String {
    match plan {
        GenerationPlan::Sequential {
            window,
            paragraphs,
            excluded,
            first_round,
        } => render_sequential(window.start, paragraphs, excluded, *first_round),
        GenerationPlan::Random { content } => render_random(content),
    }
}

fn render_sequential(
    window_start: usize,
    paragraphs: &[String],
    excluded: &[String],
    first_round: bool,
) -> String {
    let count = paragraphs.len();
    // 60/40 split, rounded toward choice: five questions come out 3 + 2.
    let choice_count = (count as f64 * 0.6).ceil() as usize;
    let fill_count = (count as f64 * 0.4).floor() as usize;

    let mut prompt = String::new();
    prompt.push_str(
        "You are a professional quiz writer. Write one question for each of the paragraphs below.\n",
    );
    if !first_round {
        prompt.push_str(
            "\nImportant: this is a repeat pass over the material. The questions must be completely different from earlier rounds!\n",
        );
    }
    prompt.push_str(&format!("\nGenerate {count} questions in total.\n"));
    prompt.push_str("Paragraphs, in order:\n");
    for (i, paragraph) in paragraphs.iter().enumerate() {
        prompt.push_str(&format!(
            "\nParagraph {} (this paragraph must get its own question):\n\"{}...\"\n",
            window_start + i + 1,
            clip(paragraph, PARAGRAPH_CLIP_CHARS),
        ));
    }

    if !excluded.is_empty() {
        prompt.push_str(
            "\nThe following questions were already asked; do not write anything similar:\n",
        );
        for (i, question) in excluded.iter().enumerate() {
            prompt.push_str(&format!("{}. {}...\n", i + 1, question));
        }
    }

    let mut rules: Vec<String> = vec![
        format!(
            "The first {choice_count} questions are multiple choice, the remaining {fill_count} are fill-in-the-blank."
        ),
        "Every question must be drawn strictly from its own paragraph, never another one.".to_owned(),
    ];
    if !first_round {
        rules.push(
            "Vary the phrasing, the angle, or the point being tested compared to earlier rounds!"
                .to_owned(),
        );
    }
    rules.push(format!(
        "Fill-in-the-blank answers must be {FILL_ANSWER_MAX_CHARS} characters or fewer."
    ));

    prompt.push_str("\nQuestion rules:\n");
    for (i, rule) in rules.iter().enumerate() {
        prompt.push_str(&format!("{}. {rule}\n", i + 1));
    }

    prompt.push_str("\nReturn the questions strictly in this JSON format:\n\n");
    prompt.push_str(RESPONSE_SCHEMA);
    prompt.push_str("\n\nImportant:\n");
    prompt.push_str("- Follow the paragraph order exactly, one question per paragraph\n");
    prompt.push_str("- Return only the JSON, nothing else");

    prompt
}

fn render_random(content: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "You are a professional quiz writer. Using the document below, generate {RANDOM_CHOICE_COUNT} multiple-choice questions and {RANDOM_FILL_COUNT} fill-in-the-blank questions.\n",
    ));
    prompt.push_str("\nQuestion rules:\n");
    prompt.push_str("1. Questions may draw on any part of the document.\n");
    prompt.push_str("2. Produce different questions on every call; avoid repeats.\n");
    prompt.push_str(
        "3. Ground every question in the document and test different key points.\n",
    );
    prompt.push_str("\nDocument:\n");
    prompt.push_str(content);
    prompt.push_str("\n\nReturn the questions strictly in this JSON format, with no other text:\n\n");
    prompt.push_str(RESPONSE_SCHEMA);
    prompt.push_str("\n\nImportant:\n");
    prompt.push_str("- Return only the JSON, nothing else");

    prompt
}

fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

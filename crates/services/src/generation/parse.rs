use serde::Deserialize;

use quiz_core::model::QuestionDraft;

use crate::error::GenerationError;

#[derive(Debug, Deserialize)]
struct GeneratedBatch {
    questions: Vec<QuestionDraft>,
}

/// Pulls question drafts out of a raw model reply.
///
/// Models often wrap the JSON in prose or code fences, so the reply is
/// first cut down to its outermost brace pair and everything around it
/// is discarded.
///
/// # Errors
///
/// Returns `GenerationError::MissingJson` when the reply holds no brace
/// pair, and `GenerationError::MalformedReply` when the extracted text
/// does not deserialize into questions.
pub fn parse_reply(reply: &str) -> Result<Vec<QuestionDraft>, GenerationError> {
    let json = extract_json(reply).ok_or(GenerationError::MissingJson)?;
    let batch: GeneratedBatch = serde_json::from_str(json)?;
    Ok(batch.questions)
}

fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionKind;

    const CLEAN_REPLY: &str = r#"{
        "questions": [
            {
                "type": "choice",
                "content": "Where did it start?",
                "options": [
                    {"label": "A", "text": "Britain"},
                    {"label": "B", "text": "France"}
                ],
                "correct_answer": "A"
            },
            {
                "type": "fill",
                "content": "It started in ____.",
                "correct_answer": "Britain"
            }
        ]
    }"#;

    #[test]
    fn parses_a_clean_json_reply() {
        let drafts = parse_reply(CLEAN_REPLY).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].kind, QuestionKind::Choice);
        assert_eq!(drafts[1].kind, QuestionKind::Fill);
        assert!(drafts[1].options.is_empty());
    }

    #[test]
    fn strips_prose_and_code_fences() {
        let chatty = format!(
            "Sure! Here are your questions:\n```json\n{CLEAN_REPLY}\n```\nLet me know if you need more."
        );
        let drafts = parse_reply(&chatty).unwrap();
        assert_eq!(drafts.len(), 2);
    }

    #[test]
    fn rejects_a_reply_without_json() {
        let err = parse_reply("I could not generate any questions.").unwrap_err();
        assert!(matches!(err, GenerationError::MissingJson));
    }

    #[test]
    fn rejects_reversed_braces() {
        let err = parse_reply("} nothing here {").unwrap_err();
        assert!(matches!(err, GenerationError::MissingJson));
    }

    #[test]
    fn rejects_json_with_the_wrong_shape() {
        let err = parse_reply(r#"{"answers": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedReply(_)));
    }

    #[test]
    fn rejects_truncated_json() {
        let truncated = &CLEAN_REPLY[..CLEAN_REPLY.len() - 40];
        let err = parse_reply(truncated).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedReply(_)));
    }

    #[test]
    fn empty_question_list_parses_as_empty() {
        let drafts = parse_reply(r#"{"questions": []}"#).unwrap();
        assert!(drafts.is_empty());
    }
}

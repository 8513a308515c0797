//! Question generation and answer submission.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use quiz_core::model::{ChoiceOption, Question, QuestionId, QuestionKind, UserId};
use quiz_services::{SubmissionOutcome, SubmittedAnswer};

use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateBody {
    user_id: UserId,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateResponse {
    questions: Vec<QuestionDto>,
}

/// What a student sees while answering: the correct answer stays server-side
/// until grading.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuestionDto {
    id: QuestionId,
    kind: QuestionKind,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Vec<ChoiceOption>>,
}

impl QuestionDto {
    fn from_question(question: &Question) -> Self {
        let options = match question.kind() {
            QuestionKind::Choice => Some(question.options().to_vec()),
            QuestionKind::Fill => None,
        };
        Self {
            id: question.id(),
            kind: question.kind(),
            content: question.content().to_owned(),
            options,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitBody {
    user_id: UserId,
    answers: Vec<AnswerBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerBody {
    question_id: QuestionId,
    answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitResponse {
    results: Vec<AnswerResultDto>,
    total_score_change: i64,
    new_total_score: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerResultDto {
    question_id: QuestionId,
    is_correct: bool,
    score_change: i64,
    correct_answer: String,
}

impl SubmitResponse {
    fn from_outcome(outcome: SubmissionOutcome) -> Self {
        Self {
            results: outcome
                .results
                .into_iter()
                .map(|result| AnswerResultDto {
                    question_id: result.question_id,
                    is_correct: result.is_correct,
                    score_change: result.score_change,
                    correct_answer: result.correct_answer,
                })
                .collect(),
            total_score_change: outcome.total_score_change,
            new_total_score: outcome.new_total_score,
        }
    }
}

pub(crate) async fn generate(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let questions = state.services.generation().generate_round(body.user_id).await?;
    Ok(Json(GenerateResponse {
        questions: questions.iter().map(QuestionDto::from_question).collect(),
    }))
}

pub(crate) async fn submit(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubmitBody>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let answers: Vec<SubmittedAnswer> = body
        .answers
        .into_iter()
        .map(|answer| SubmittedAnswer {
            question_id: answer.question_id,
            answer: answer.answer,
        })
        .collect();
    let outcome = state
        .services
        .submissions()
        .submit(body.user_id, &answers)
        .await?;
    Ok(Json(SubmitResponse::from_outcome(outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;
    use quiz_core::time::fixed_now;

    fn choice_question() -> Question {
        QuestionDraft {
            kind: QuestionKind::Choice,
            content: "Which engine drove the spinning frame?".into(),
            options: vec![
                ChoiceOption::new("A", "Water wheel"),
                ChoiceOption::new("B", "Treadle"),
            ],
            correct_answer: "A".into(),
        }
        .validate("mills.txt", fixed_now())
        .unwrap()
        .assign_id(QuestionId::generate())
    }

    fn fill_question() -> Question {
        QuestionDraft {
            kind: QuestionKind::Fill,
            content: "The ____ wheel drove the frame.".into(),
            options: vec![],
            correct_answer: "water".into(),
        }
        .validate("mills.txt", fixed_now())
        .unwrap()
        .assign_id(QuestionId::generate())
    }

    #[test]
    fn choice_dto_carries_options_but_never_the_answer() {
        let dto = QuestionDto::from_question(&choice_question());
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["kind"], "choice");
        assert_eq!(value["options"][0]["label"], "A");
        assert_eq!(value["options"][0]["text"], "Water wheel");
        assert!(value.get("correctAnswer").is_none());
    }

    #[test]
    fn fill_dto_omits_the_options_key() {
        let dto = QuestionDto::from_question(&fill_question());
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["kind"], "fill");
        assert!(value.get("options").is_none());
    }
}

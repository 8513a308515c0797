use std::sync::Arc;

use tracing::debug;

use quiz_core::model::{grade_answer, QuestionId, ScoreRecord, ScoreRecordId, UserId};
use quiz_core::Clock;
use quiz_storage::repository::{QuestionRepository, ScoreRecordRepository, UserRepository};

use crate::error::SubmissionError;

/// One submitted answer, matched to its question by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub answer: String,
}

/// Grade for one answer, with the stored correct answer revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub score_change: i64,
    pub correct_answer: String,
}

/// Outcome of grading a whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub results: Vec<AnswerResult>,
    pub total_score_change: i64,
    pub new_total_score: i64,
}

/// Grades answer batches and keeps the running score.
#[derive(Clone)]
pub struct SubmissionService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    questions: Arc<dyn QuestionRepository>,
    scores: Arc<dyn ScoreRecordRepository>,
}

impl SubmissionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        questions: Arc<dyn QuestionRepository>,
        scores: Arc<dyn ScoreRecordRepository>,
    ) -> Self {
        Self {
            clock,
            users,
            questions,
            scores,
        }
    }

    /// Grade a batch of answers for a user.
    ///
    /// Answers naming unknown question ids are skipped rather than failing
    /// the batch. Every graded answer is appended to the answer log; the
    /// user's total is written once with the batch delta applied.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Storage` when the user is missing or
    /// persistence fails.
    pub async fn submit(
        &self,
        user_id: UserId,
        answers: &[SubmittedAnswer],
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let user = self.users.get_user(user_id).await?;
        let now = self.clock.now();

        let mut results = Vec::with_capacity(answers.len());
        let mut total_score_change = 0;

        for answer in answers {
            let Some(question) = self.questions.find_question(answer.question_id).await? else {
                debug!(question = %answer.question_id, "skipping answer to unknown question");
                continue;
            };

            let grade = grade_answer(question.kind(), question.correct_answer(), &answer.answer);
            total_score_change += grade.score_change;

            self.scores
                .append_score_record(&ScoreRecord::new(
                    ScoreRecordId::generate(),
                    user.id(),
                    question.id(),
                    grade,
                    answer.answer.clone(),
                    now,
                ))
                .await?;

            results.push(AnswerResult {
                question_id: question.id(),
                is_correct: grade.is_correct,
                score_change: grade.score_change,
                correct_answer: question.correct_answer().to_owned(),
            });
        }

        let new_total_score = user.total_score() + total_score_change;
        self.users
            .update_total_score(user.id(), new_total_score, now)
            .await?;

        Ok(SubmissionOutcome {
            results,
            total_score_change,
            new_total_score,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::model::{
        ChoiceOption, Question, QuestionDraft, QuestionKind, Role, User, Username,
    };
    use quiz_core::time::{fixed_clock, fixed_now};
    use quiz_storage::repository::{
        InMemoryRepository, QuestionRepository, ScoreRecordRepository, UserRepository,
    };

    fn service(repo: &InMemoryRepository) -> SubmissionService {
        SubmissionService::new(
            fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    fn student() -> User {
        User::new(
            UserId::generate(),
            Username::new("ada").unwrap(),
            "salt$digest",
            Role::Student,
            None,
            true,
            fixed_now(),
        )
    }

    fn choice_question() -> Question {
        QuestionDraft {
            kind: QuestionKind::Choice,
            content: "Where did the industrial revolution begin?".to_owned(),
            options: vec![
                ChoiceOption::new("A", "Britain"),
                ChoiceOption::new("B", "France"),
            ],
            correct_answer: "A".to_owned(),
        }
        .validate("history.txt", fixed_now())
        .unwrap()
        .assign_id(QuestionId::generate())
    }

    fn fill_question(correct: &str) -> Question {
        QuestionDraft {
            kind: QuestionKind::Fill,
            content: "Steam power transformed ____.".to_owned(),
            options: Vec::new(),
            correct_answer: correct.to_owned(),
        }
        .validate("history.txt", fixed_now())
        .unwrap()
        .assign_id(QuestionId::generate())
    }

    fn answer(question: &Question, text: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: question.id(),
            answer: text.to_owned(),
        }
    }

    #[tokio::test]
    async fn grades_a_mixed_batch_and_updates_the_total() {
        let repo = InMemoryRepository::new();
        let user = student();
        repo.insert_user(&user).await.unwrap();
        let right_choice = choice_question();
        let wrong_choice = choice_question();
        let fill = fill_question("factories");
        repo.insert_question(&right_choice).await.unwrap();
        repo.insert_question(&wrong_choice).await.unwrap();
        repo.insert_question(&fill).await.unwrap();

        let outcome = service(&repo)
            .submit(
                user.id(),
                &[
                    answer(&right_choice, "A"),
                    answer(&wrong_choice, "B"),
                    answer(&fill, "factories"),
                ],
            )
            .await
            .unwrap();

        // +10 - 10 + 9 chars * 5
        assert_eq!(outcome.total_score_change, 45);
        assert_eq!(outcome.new_total_score, 45);
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results[0].is_correct);
        assert!(!outcome.results[1].is_correct);
        assert_eq!(outcome.results[2].score_change, 45);

        let stored = repo.get_user(user.id()).await.unwrap();
        assert_eq!(stored.total_score(), 45);
    }

    #[tokio::test]
    async fn reveals_the_correct_answer_in_results() {
        let repo = InMemoryRepository::new();
        let user = student();
        repo.insert_user(&user).await.unwrap();
        let question = choice_question();
        repo.insert_question(&question).await.unwrap();

        let outcome = service(&repo)
            .submit(user.id(), &[answer(&question, "B")])
            .await
            .unwrap();

        assert_eq!(outcome.results[0].correct_answer, "A");
    }

    #[tokio::test]
    async fn unknown_question_ids_are_skipped() {
        let repo = InMemoryRepository::new();
        let user = student();
        repo.insert_user(&user).await.unwrap();
        let question = choice_question();
        repo.insert_question(&question).await.unwrap();

        let stale = SubmittedAnswer {
            question_id: QuestionId::generate(),
            answer: "A".to_owned(),
        };
        let outcome = service(&repo)
            .submit(user.id(), &[stale, answer(&question, "A")])
            .await
            .unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.total_score_change, 10);
    }

    #[tokio::test]
    async fn every_graded_answer_lands_in_the_log() {
        let repo = InMemoryRepository::new();
        let user = student();
        repo.insert_user(&user).await.unwrap();
        let first = choice_question();
        let second = fill_question("steam");
        repo.insert_question(&first).await.unwrap();
        repo.insert_question(&second).await.unwrap();

        service(&repo)
            .submit(
                user.id(),
                &[answer(&first, "A"), answer(&second, "wrong guess")],
            )
            .await
            .unwrap();

        let answered = repo.list_answered_question_ids(user.id()).await.unwrap();
        assert_eq!(answered, vec![first.id(), second.id()]);
    }

    #[tokio::test]
    async fn totals_accumulate_across_batches() {
        let repo = InMemoryRepository::new();
        let user = student();
        repo.insert_user(&user).await.unwrap();
        let question = choice_question();
        repo.insert_question(&question).await.unwrap();
        let svc = service(&repo);

        svc.submit(user.id(), &[answer(&question, "A")])
            .await
            .unwrap();
        let second = svc
            .submit(user.id(), &[answer(&question, "B")])
            .await
            .unwrap();

        assert_eq!(second.new_total_score, 0);
        let stored = repo.get_user(user.id()).await.unwrap();
        assert_eq!(stored.total_score(), 0);
    }

    #[tokio::test]
    async fn empty_batch_is_a_noop_outcome() {
        let repo = InMemoryRepository::new();
        let user = student();
        repo.insert_user(&user).await.unwrap();

        let outcome = service(&repo).submit(user.id(), &[]).await.unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.total_score_change, 0);
        assert_eq!(outcome.new_total_score, 0);
    }

    #[tokio::test]
    async fn missing_user_is_a_storage_error() {
        let repo = InMemoryRepository::new();
        let err = service(&repo)
            .submit(UserId::generate(), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmissionError::Storage(quiz_storage::repository::StorageError::NotFound)
        ));
    }
}

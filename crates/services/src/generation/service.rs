use std::sync::Arc;

use tracing::{debug, info};

use quiz_core::model::{Document, Question, QuestionId, User, UserId};
use quiz_core::Clock;
use quiz_storage::repository::{
    DocumentRepository, QuestionRepository, ScoreRecordRepository, UserRepository,
};

use crate::ai::AiClient;
use crate::error::GenerationError;
use crate::generation::parse::parse_reply;
use crate::generation::plan::{excerpt, plan_random, plan_sequential};
use crate::generation::prompt::render_prompt;

/// Runs question-generation rounds: plan, prompt, call the model, persist.
#[derive(Clone)]
pub struct GenerationService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    documents: Arc<dyn DocumentRepository>,
    questions: Arc<dyn QuestionRepository>,
    scores: Arc<dyn ScoreRecordRepository>,
    ai: Arc<dyn AiClient>,
}

impl GenerationService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        documents: Arc<dyn DocumentRepository>,
        questions: Arc<dyn QuestionRepository>,
        scores: Arc<dyn ScoreRecordRepository>,
        ai: Arc<dyn AiClient>,
    ) -> Self {
        Self {
            clock,
            users,
            documents,
            questions,
            scores,
            ai,
        }
    }

    /// Generate and persist one round of questions for a user.
    ///
    /// Sequential mode cuts the next paragraph window from the user's
    /// document and excludes previously answered material from the prompt;
    /// random mode quizzes over the whole text. The user's paragraph offset
    /// moves only after the round's questions are stored, so a failed round
    /// never skips material. Returned questions carry their correct answers
    /// internally; callers expose them without.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Storage` when the user or their selected
    /// document is missing, `GenerationError::NoDocuments` when nothing has
    /// been uploaded, `GenerationError::NoParagraphs` for a document with no
    /// quizzable paragraphs, `GenerationError::Ai` for model failures, and
    /// `MissingJson` / `MalformedReply` / `Question` when the reply cannot
    /// be turned into valid questions.
    pub async fn generate_round(&self, user_id: UserId) -> Result<Vec<Question>, GenerationError> {
        let user = self.users.get_user(user_id).await?;
        let document = self.resolve_document(&user).await?;
        let paragraphs = document.paragraphs();

        let plan = if user.sequential_mode() {
            if paragraphs.is_empty() {
                return Err(GenerationError::NoParagraphs);
            }
            let excluded = self.excluded_excerpts(&user, document.filename()).await?;
            plan_sequential(user.current_paragraph(), &paragraphs, excluded)
        } else {
            plan_random(document.content())
        };

        debug!(
            user = %user.username(),
            document = document.filename(),
            questions = plan.question_count(),
            sequential = user.sequential_mode(),
            "planned generation round"
        );

        let prompt = render_prompt(&plan);
        let reply = self.ai.complete(&prompt, user.api_key()).await?;
        let drafts = parse_reply(&reply)?;

        let now = self.clock.now();
        let mut saved = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let question = draft
                .validate(document.filename(), now)?
                .assign_id(QuestionId::generate());
            self.questions.insert_question(&question).await?;
            saved.push(question);
        }

        // Progress moves only once the round's questions are stored.
        if let Some(next_offset) = plan.next_offset() {
            self.users
                .update_current_paragraph(user.id(), next_offset, now)
                .await?;
        }

        info!(user = %user.username(), count = saved.len(), "generated question round");
        Ok(saved)
    }

    /// The document a round draws from: the user's selected one, falling
    /// back to the newest upload.
    async fn resolve_document(&self, user: &User) -> Result<Document, GenerationError> {
        if let Some(id) = user.selected_document() {
            return Ok(self.documents.get_document(id).await?);
        }
        self.documents
            .latest_document()
            .await?
            .ok_or(GenerationError::NoDocuments)
    }

    /// Excerpts of questions the user already answered from this document.
    async fn excluded_excerpts(
        &self,
        user: &User,
        filename: &str,
    ) -> Result<Vec<String>, GenerationError> {
        let answered = self.scores.list_answered_question_ids(user.id()).await?;
        if answered.is_empty() {
            return Ok(Vec::new());
        }

        let questions = self.questions.list_questions_by_ids(&answered).await?;
        Ok(questions
            .iter()
            .filter(|q| q.source_document() == filename)
            .map(|q| excerpt(q.content()))
            .collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

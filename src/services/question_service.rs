use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{NewQuestion, QuestionRecord},
    repositories::QuestionRepository,
};

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    /// Up to `limit` questions already asked for `context`, sampled uniformly without replacement.
    pub async fn get_previous_questions(&self, context: &str, limit: usize) -> AppResult<Vec<String>> {
        let records = self.repository.find_by_context(context).await?;
        let questions = sample_questions(records, limit, &mut rand::thread_rng());
        log::info!(
            "Loaded {} previous questions for context '{}'",
            questions.len(),
            context
        );
        Ok(questions)
    }

    pub async fn save_question(&self, question: NewQuestion) -> AppResult<QuestionRecord> {
        question.validate()?;

        let record = self.repository.create(question).await?;
        log::info!("Saved question {} for context '{}'", record.id, record.context);
        Ok(record)
    }

    pub async fn get_latest_question(&self) -> AppResult<QuestionRecord> {
        self.repository
            .find_latest()
            .await?
            .ok_or_else(|| AppError::NotFound("No question found in the database".to_string()))
    }
}

pub fn sample_questions<R: Rng + ?Sized>(
    records: Vec<QuestionRecord>,
    limit: usize,
    rng: &mut R,
) -> Vec<String> {
    if records.len() <= limit {
        return records.into_iter().map(|r| r.question).collect();
    }
    records
        .choose_multiple(rng, limit)
        .map(|r| r.question.clone())
        .collect()
}

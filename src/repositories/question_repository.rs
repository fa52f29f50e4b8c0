use async_trait::async_trait;

use crate::{
    errors::AppResult,
    models::domain::{NewQuestion, QuestionRecord},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Appends a question; the store assigns its id.
    async fn create(&self, question: NewQuestion) -> AppResult<QuestionRecord>;
    /// The question with the highest id, if any.
    async fn find_latest(&self) -> AppResult<Option<QuestionRecord>>;
    async fn find_by_context(&self, context: &str) -> AppResult<Vec<QuestionRecord>>;
}

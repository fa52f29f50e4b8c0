use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MAX_QUESTION_CHARS: u64 = 300;

/// A question as stored in the shared `questions` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionRecord {
    pub id: i64, // Assigned by the store, monotonically increasing
    pub question: String,
    pub context: String,
    pub created_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

/// Insert shape of a question; the store assigns `id`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct NewQuestion {
    #[validate(length(min = 1, max = 300, message = "question must be 1-300 characters"))]
    pub question: String,
    #[validate(length(min = 1, message = "context cannot be empty"))]
    pub context: String,
    pub created_at: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

impl NewQuestion {
    /// Builds a question dated today; blank image prompts are dropped.
    pub fn new(question: &str, context: &str, image_prompt: Option<&str>) -> Self {
        NewQuestion {
            question: question.trim().to_string(),
            context: context.to_string(),
            created_at: Local::now().date_naive(),
            image_prompt: image_prompt
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }

    pub fn into_record(self, id: i64) -> QuestionRecord {
        QuestionRecord {
            id,
            question: self.question,
            context: self.context,
            created_at: self.created_at,
            image_prompt: self.image_prompt,
        }
    }
}

/// The question and optional image prompt extracted from a model answer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(default)]
    pub image_prompt: String,
}

//! Hand-written fakes shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use question_poll::{
    errors::{AppError, AppResult},
    models::domain::{ChatMember, NewQuestion, QuestionRecord},
    repositories::QuestionRepository,
    services::{
        generation_service::{GenerationOutcome, Sleeper, TextGenerator},
        image_service::ImageGenerator,
        telegram_service::PollPublisher,
    },
};

pub struct InMemoryQuestionRepository {
    records: Arc<RwLock<Vec<QuestionRecord>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn all(&self) -> Vec<QuestionRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: NewQuestion) -> AppResult<QuestionRecord> {
        let mut records = self.records.write().await;
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = question.into_record(next_id);
        records.push(record.clone());
        Ok(record)
    }

    async fn find_latest(&self) -> AppResult<Option<QuestionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().max_by_key(|r| r.id).cloned())
    }

    async fn find_by_context(&self, context: &str) -> AppResult<Vec<QuestionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.context == context)
            .cloned()
            .collect())
    }
}

/// Replays a fixed list of outcomes and remembers the prompts it was given.
pub struct ScriptedGenerator {
    outcomes: Mutex<Vec<GenerationOutcome>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(outcomes: Vec<GenerationOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().rev().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _model: &str, prompt: &str) -> GenerationOutcome {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| GenerationOutcome::FatalFailure("script exhausted".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    pub waits: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub struct FixedImage {
    pub result: AppResult<Vec<u8>>,
    pub prompts: Mutex<Vec<String>>,
}

impl FixedImage {
    pub fn ok(bytes: &[u8]) -> Self {
        Self {
            result: Ok(bytes.to_vec()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: Err(AppError::ImageGenerationError("endpoint down".to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ImageGenerator for FixedImage {
    async fn generate_image(&self, prompt: &str) -> AppResult<Vec<u8>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Photo { chat_id: String, bytes: usize, caption: String },
    Poll { chat_id: String, question: String, options: Vec<String>, anonymous: bool, multi_answer: bool },
}

pub struct FakeChat {
    pub bot: ChatMember,
    pub admins: Vec<ChatMember>,
    pub sent: Mutex<Vec<Sent>>,
}

impl FakeChat {
    pub fn new(bot_name: &str, admins: Vec<ChatMember>) -> Self {
        Self {
            bot: ChatMember::bot(bot_name),
            admins,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PollPublisher for FakeChat {
    async fn get_me(&self) -> AppResult<ChatMember> {
        Ok(self.bot.clone())
    }

    async fn list_group_admins(&self, _chat_id: &str) -> AppResult<Vec<ChatMember>> {
        Ok(self.admins.clone())
    }

    async fn send_poll(
        &self,
        chat_id: &str,
        question: &str,
        options: Vec<String>,
        anonymous: bool,
        multi_answer: bool,
    ) -> AppResult<()> {
        if options.len() < 2 {
            return Err(AppError::ValidationError("not enough options".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Poll {
            chat_id: chat_id.to_string(),
            question: question.to_string(),
            options,
            anonymous,
            multi_answer,
        });
        Ok(())
    }

    async fn send_photo(&self, chat_id: &str, image: Vec<u8>, caption: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id: chat_id.to_string(),
            bytes: image.len(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}

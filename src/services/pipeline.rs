use std::sync::Arc;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{NewQuestion, QuestionRecord},
    services::{
        generation_service::GenerationService,
        image_service::ImageGenerator,
        prompt_service::{build_prompt, pick_context, pick_scenario, PromptVariant},
        question_service::QuestionService,
        response_parser::parse_response,
        telegram_service::{build_poll_options, PollPublisher},
    },
};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub model: String,
    pub max_retries: u32,
    pub previous_questions_limit: usize,
    pub chat_id: String,
    pub filler_option: String,
    pub variant: PromptVariant,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.gemini_model.clone(),
            max_retries: config.generation_max_retries,
            previous_questions_limit: config.previous_questions_limit,
            chat_id: config.chat_id.clone(),
            filler_option: config.poll_filler_option.clone(),
            variant: if config.poll_with_image {
                PromptVariant::WithImage
            } else {
                PromptVariant::TextOnly
            },
        }
    }
}

/// What a publish run posted to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPoll {
    pub question_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub with_photo: bool,
}

pub struct QuestionPipeline {
    questions: Arc<QuestionService>,
    generation: Arc<GenerationService>,
    images: Arc<dyn ImageGenerator>,
    publisher: Arc<dyn PollPublisher>,
    settings: PipelineSettings,
}

impl QuestionPipeline {
    pub fn new(
        questions: Arc<QuestionService>,
        generation: Arc<GenerationService>,
        images: Arc<dyn ImageGenerator>,
        publisher: Arc<dyn PollPublisher>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            questions,
            generation,
            images,
            publisher,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Generates a question for a randomly chosen context and scenario and stores it.
    pub async fn generate_question(&self) -> AppResult<QuestionRecord> {
        let (context, scenario) = {
            let mut rng = rand::thread_rng();
            (pick_context(&mut rng), pick_scenario(&mut rng))
        };
        self.generate_question_for(context, scenario).await
    }

    pub async fn generate_question_for(&self, context: &str, scenario: &str) -> AppResult<QuestionRecord> {
        log::info!("Generating question for context '{}' (scenario '{}')", context, scenario);

        let previous = self
            .questions
            .get_previous_questions(context, self.settings.previous_questions_limit)
            .await?;

        let prompt = build_prompt(context, &previous, scenario, self.settings.variant);
        let raw = self
            .generation
            .generate_with_retry(&self.settings.model, &prompt, self.settings.max_retries)
            .await?;
        log::debug!("Raw model answer: {}", raw);

        let generated = parse_response(&raw);
        if generated.question.trim().is_empty() {
            log::error!("Model answer contained no question");
            return Err(AppError::ValidationError(
                "Generated question is empty".to_string(),
            ));
        }
        log::info!("Generated question: {}", generated.question);

        let image_prompt = match self.settings.variant {
            PromptVariant::WithImage => Some(generated.image_prompt.as_str()),
            PromptVariant::TextOnly => None,
        };
        self.questions
            .save_question(NewQuestion::new(&generated.question, context, image_prompt))
            .await
    }

    /// Posts the most recent stored question as a poll, preceded by its image when enabled.
    pub async fn publish_latest(&self) -> AppResult<PublishedPoll> {
        let record = self.questions.get_latest_question().await?;
        let chat_id = self.settings.chat_id.as_str();

        let bot = self.publisher.get_me().await?;
        let admins = self.publisher.list_group_admins(chat_id).await?;
        let options = build_poll_options(&admins, &bot.first_name, &self.settings.filler_option);

        let mut with_photo = false;
        if self.settings.variant == PromptVariant::WithImage {
            match record.image_prompt.as_deref() {
                Some(image_prompt) => {
                    let image = self.images.generate_image(image_prompt).await.map_err(|e| {
                        log::error!("Image generation failed, aborting publish: {}", e);
                        e
                    })?;
                    self.publisher
                        .send_photo(chat_id, image, &record.question)
                        .await?;
                    with_photo = true;
                }
                None => log::warn!(
                    "Question {} has no image prompt; posting the poll without a photo",
                    record.id
                ),
            }
        }

        self.publisher
            .send_poll(chat_id, &record.question, options.clone(), false, false)
            .await?;
        log::info!(
            "Poll created with question: {} and options: {:?}",
            record.question,
            options
        );

        Ok(PublishedPoll {
            question_id: record.id,
            question: record.question,
            options,
            with_photo,
        })
    }
}

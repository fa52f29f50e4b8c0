use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{QuestionRepository, SupabaseQuestionRepository},
    services::{
        generation_service::{GeminiClient, GenerationService, TokioSleeper},
        http_helpers::build_http_client,
        image_service::CloudflareImageClient,
        pipeline::{PipelineSettings, QuestionPipeline},
        question_service::QuestionService,
        telegram_service::TelegramClient,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QuestionPipeline>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let http = build_http_client(&config)?;

        log::info!("Using Supabase question store at {}", config.database_url);
        let question_repository: Arc<dyn QuestionRepository> = Arc::new(SupabaseQuestionRepository::new(
            http.clone(),
            &config.database_url,
            &config.questions_table,
            config.database_service_key.clone(),
        ));
        let question_service = Arc::new(QuestionService::new(question_repository));

        let gemini = Arc::new(GeminiClient::new(
            http.clone(),
            &config.gemini_base_url,
            config.gemini_api_key.clone(),
        ));
        let generation_service = Arc::new(GenerationService::new(gemini, Arc::new(TokioSleeper)));

        let images = Arc::new(CloudflareImageClient::new(
            http.clone(),
            &config.cloudflare_base_url,
            &config.cloudflare_account_id,
            &config.image_model,
            config.cloudflare_api_token.clone(),
        ));

        let telegram = Arc::new(TelegramClient::new(
            http,
            &config.telegram_base_url,
            config.telegram_bot_token.clone(),
        ));

        let pipeline = Arc::new(QuestionPipeline::new(
            question_service,
            generation_service,
            images,
            telegram,
            PipelineSettings::from_config(&config),
        ));

        Ok(Self { pipeline })
    }
}

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Model did not answer after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Image generation failed: {0}")]
    ImageGenerationError(String),

    #[error("Messaging error: {0}")]
    MessagingError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ConfigError(_) => "CONFIG_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::GenerationFailed(_) => "GENERATION_FAILED",
            AppError::RetriesExhausted { .. } => "RETRIES_EXHAUSTED",
            AppError::ImageGenerationError(_) => "IMAGE_GENERATION_ERROR",
            AppError::MessagingError(_) => "MESSAGING_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

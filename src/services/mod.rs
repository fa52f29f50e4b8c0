pub mod generation_service;
pub mod http_helpers;
pub mod image_service;
pub mod pipeline;
pub mod prompt_service;
pub mod question_service;
pub mod response_parser;
pub mod telegram_service;

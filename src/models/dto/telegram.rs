//! Telegram Bot API request and response shapes.

use serde::{Deserialize, Serialize};

use crate::models::domain::ChatMember;

/// Every Bot API method answers with this envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatAdministrator {
    pub user: ChatMember,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputPollOption {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendPollRequest<'a> {
    pub chat_id: &'a str,
    pub question: &'a str,
    pub options: Vec<InputPollOption>,
    pub is_anonymous: bool,
    pub allows_multiple_answers: bool,
}

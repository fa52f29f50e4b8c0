use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::ChatMember,
        dto::telegram::{ChatAdministrator, InputPollOption, SendPollRequest, TelegramResponse},
    },
};

pub const MIN_POLL_OPTIONS: usize = 2;
pub const MAX_POLL_OPTIONS: usize = 10;

/// Messaging-bot operations the publish flow relies on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollPublisher: Send + Sync {
    async fn get_me(&self) -> AppResult<ChatMember>;
    async fn list_group_admins(&self, chat_id: &str) -> AppResult<Vec<ChatMember>>;
    async fn send_poll(
        &self,
        chat_id: &str,
        question: &str,
        options: Vec<String>,
        anonymous: bool,
        multi_answer: bool,
    ) -> AppResult<()>;
    async fn send_photo(&self, chat_id: &str, image: Vec<u8>, caption: &str) -> AppResult<()>;
}

/// Fallbacks tried after the configured filler when padding a short poll.
pub const SPARE_POLL_OPTIONS: [&str; 2] = ["Nessuno", "Tutti"];

/// Poll options: every human admin except the bot itself, padded to two entries.
///
/// Options are unique; Telegram rejects polls with repeated answers.
pub fn build_poll_options(admins: &[ChatMember], bot_name: &str, filler: &str) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for admin in admins {
        if admin.is_bot || admin.first_name == bot_name || options.contains(&admin.first_name) {
            continue;
        }
        options.push(admin.first_name.clone());
    }

    if options.len() > MAX_POLL_OPTIONS {
        log::warn!(
            "{} candidates exceed the poll limit; keeping the first {}",
            options.len(),
            MAX_POLL_OPTIONS
        );
        options.truncate(MAX_POLL_OPTIONS);
    }
    for padding in std::iter::once(filler).chain(SPARE_POLL_OPTIONS) {
        if options.len() >= MIN_POLL_OPTIONS {
            break;
        }
        if !options.iter().any(|option| option == padding) {
            options.push(padding.to_string());
        }
    }
    options
}

pub struct TelegramClient {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl TelegramClient {
    pub fn new(http: Client, base_url: &str, token: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, request: RequestBuilder) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::MessagingError(format!("{} request failed: {}", method, e.without_url())))?;

        let status = response.status();
        let envelope: TelegramResponse<T> = response.json().await.map_err(|e| {
            AppError::MessagingError(format!(
                "{} returned an unexpected payload ({}): {}",
                method,
                status,
                e.without_url()
            ))
        })?;

        if !envelope.ok {
            return Err(AppError::MessagingError(format!(
                "{} rejected ({}): {}",
                method,
                envelope.error_code.unwrap_or(status.as_u16() as i64),
                envelope.description.unwrap_or_default()
            )));
        }

        envelope
            .result
            .ok_or_else(|| AppError::MessagingError(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl PollPublisher for TelegramClient {
    async fn get_me(&self) -> AppResult<ChatMember> {
        self.call("getMe", self.http.get(self.method_url("getMe"))).await
    }

    async fn list_group_admins(&self, chat_id: &str) -> AppResult<Vec<ChatMember>> {
        let request = self
            .http
            .get(self.method_url("getChatAdministrators"))
            .query(&[("chat_id", chat_id)]);
        let admins: Vec<ChatAdministrator> = self.call("getChatAdministrators", request).await?;
        Ok(admins.into_iter().map(|admin| admin.user).collect())
    }

    async fn send_poll(
        &self,
        chat_id: &str,
        question: &str,
        options: Vec<String>,
        anonymous: bool,
        multi_answer: bool,
    ) -> AppResult<()> {
        if options.len() < MIN_POLL_OPTIONS {
            return Err(AppError::ValidationError(format!(
                "A poll needs at least {} options, got {}",
                MIN_POLL_OPTIONS,
                options.len()
            )));
        }

        let body = SendPollRequest {
            chat_id,
            question,
            options: options.into_iter().map(|text| InputPollOption { text }).collect(),
            is_anonymous: anonymous,
            allows_multiple_answers: multi_answer,
        };
        let request = self.http.post(self.method_url("sendPoll")).json(&body);
        let _: serde_json::Value = self.call("sendPoll", request).await?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: &str, image: Vec<u8>, caption: &str) -> AppResult<()> {
        let photo = Part::bytes(image)
            .file_name("question.png")
            .mime_str("image/png")
            .map_err(|e| AppError::InternalError(format!("Invalid photo part: {}", e)))?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", photo);

        let request = self.http.post(self.method_url("sendPhoto")).multipart(form);
        let _: serde_json::Value = self.call("sendPhoto", request).await?;
        Ok(())
    }
}

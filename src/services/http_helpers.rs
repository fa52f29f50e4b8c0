use reqwest::{Client, Response};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Builds the HTTP client shared by every outbound API call of a run.
pub fn build_http_client(config: &Config) -> AppResult<Client> {
    Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))
}

/// Describes a non-success response as `"<status>: <body>"`.
pub async fn error_body(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => format!("{}: {}", status, body.trim()),
        _ => status.to_string(),
    }
}

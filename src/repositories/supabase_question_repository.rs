use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{NewQuestion, QuestionRecord},
    repositories::QuestionRepository,
    services::http_helpers::error_body,
};

/// Question store backed by a Supabase (PostgREST) table.
pub struct SupabaseQuestionRepository {
    http: Client,
    table_url: String,
    service_key: SecretString,
}

impl SupabaseQuestionRepository {
    pub fn new(http: Client, base_url: &str, table: &str, service_key: SecretString) -> Self {
        Self {
            http,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            service_key,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.service_key.expose_secret();
        request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
    }

    async fn fetch_rows(&self, request: RequestBuilder) -> AppResult<Vec<QuestionRecord>> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Supabase request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::DatabaseError(error_body(response).await));
        }

        response
            .json::<Vec<QuestionRecord>>()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Unexpected Supabase payload: {}", e)))
    }
}

#[async_trait]
impl QuestionRepository for SupabaseQuestionRepository {
    async fn create(&self, question: NewQuestion) -> AppResult<QuestionRecord> {
        let request = self
            .http
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&question);

        self.fetch_rows(request).await?.into_iter().next().ok_or_else(|| {
            AppError::DatabaseError("Supabase insert returned no rows".to_string())
        })
    }

    async fn find_latest(&self) -> AppResult<Option<QuestionRecord>> {
        let request = self
            .http
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", "id.desc"), ("limit", "1")]);

        Ok(self.fetch_rows(request).await?.into_iter().next())
    }

    async fn find_by_context(&self, context: &str) -> AppResult<Vec<QuestionRecord>> {
        let filter = format!("eq.{}", context);
        let request = self.http.get(&self.table_url).query(&[
            ("select", "*"),
            ("context", filter.as_str()),
            ("order", "id.asc"),
        ]);

        self.fetch_rows(request).await
    }
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    models::dto::gemini::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse},
};

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Result of a single call to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    /// Server overloaded or temporarily unavailable; worth another attempt.
    TransientFailure(String),
    FatalFailure(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> GenerationOutcome;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Delay before the attempt following `attempt`: `min(2^attempt + jitter, 30s)`.
pub fn backoff_delay(attempt: u32, jitter: f64) -> Duration {
    let exp = 2f64.powi(attempt.min(31) as i32);
    let secs = (exp + jitter.clamp(0.0, 1.0)).min(MAX_BACKOFF.as_secs_f64());
    Duration::from_secs_f64(secs)
}

pub struct GenerationService {
    generator: Arc<dyn TextGenerator>,
    sleeper: Arc<dyn Sleeper>,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn TextGenerator>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { generator, sleeper }
    }

    /// Calls the model up to `max_retries` times.
    ///
    /// Transient failures back off with jitter before the next attempt; a fatal
    /// failure aborts at once. Running out of attempts yields
    /// [`AppError::RetriesExhausted`], distinct from [`AppError::GenerationFailed`].
    pub async fn generate_with_retry(
        &self,
        model: &str,
        prompt: &str,
        max_retries: u32,
    ) -> AppResult<String> {
        for attempt in 1..=max_retries {
            log::info!("Generation attempt {}/{} with model {}", attempt, max_retries, model);

            match self.generator.generate(model, prompt).await {
                GenerationOutcome::Success(text) => {
                    log::info!("Model answered on attempt {}", attempt);
                    return Ok(text);
                }
                GenerationOutcome::TransientFailure(cause) => {
                    if attempt == max_retries {
                        log::warn!(
                            "Model still unavailable on final attempt {}: {}",
                            attempt,
                            cause
                        );
                        break;
                    }
                    let wait = backoff_delay(attempt, rand::thread_rng().gen_range(0.0..1.0));
                    log::warn!(
                        "Model overloaded or unavailable (attempt {}): {}. Retrying in {:.1} seconds",
                        attempt,
                        cause,
                        wait.as_secs_f64()
                    );
                    self.sleeper.sleep(wait).await;
                }
                GenerationOutcome::FatalFailure(cause) => {
                    log::error!("Generation failed on attempt {}: {}", attempt, cause);
                    return Err(AppError::GenerationFailed(cause));
                }
            }
        }

        log::error!("Model did not answer after {} attempts", max_retries);
        Err(AppError::RetriesExhausted {
            attempts: max_retries,
        })
    }
}

/// Maps a non-success HTTP answer from Gemini to a transient or fatal outcome.
///
/// Only server errors that report overload or unavailability are transient.
pub fn classify_error(status: StatusCode, body: &str) -> GenerationOutcome {
    let (api_status, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.status, envelope.error.message),
        Err(_) => (String::new(), body.trim().to_string()),
    };
    let cause = format!("{} {} {}", status.as_u16(), api_status, message)
        .trim()
        .to_string();

    if status.is_server_error() {
        let haystack = format!("{} {}", api_status, message).to_lowercase();
        if haystack.contains("overloaded") || haystack.contains("unavailable") {
            return GenerationOutcome::TransientFailure(cause);
        }
    }
    GenerationOutcome::FatalFailure(cause)
}

/// Gemini `generateContent` REST client.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(http: Client, base_url: &str, api_key: SecretString) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> GenerationOutcome {
        let response = match self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return GenerationOutcome::FatalFailure(format!("Request to Gemini failed: {}", e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return GenerationOutcome::FatalFailure(format!(
                    "Failed to read Gemini response: {}",
                    e
                ))
            }
        };

        if !status.is_success() {
            return classify_error(status, &body);
        }

        match serde_json::from_str::<GenerateContentResponse>(&body) {
            Ok(parsed) => match parsed.text() {
                Some(text) => GenerationOutcome::Success(text),
                None => {
                    let reason = parsed
                        .prompt_feedback
                        .and_then(|f| f.block_reason)
                        .or_else(|| parsed.candidates.first().and_then(|c| c.finish_reason.clone()))
                        .unwrap_or_else(|| "no candidates".to_string());
                    GenerationOutcome::FatalFailure(format!("Gemini returned no text ({})", reason))
                }
            },
            Err(e) => GenerationOutcome::FatalFailure(format!("Unexpected Gemini payload: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Records requested delays instead of sleeping.
    #[derive(Default)]
    struct RecordingSleeper {
        waits: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    fn scripted(outcomes: Vec<GenerationOutcome>) -> (MockTextGenerator, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(move |_, _| {
            let n = counter.fetch_add(1, Ordering::SeqCst) as usize;
            outcomes[n].clone()
        });
        (generator, calls)
    }

    fn transient() -> GenerationOutcome {
        GenerationOutcome::TransientFailure("503 UNAVAILABLE The model is overloaded".into())
    }

    fn assert_wait_bounds(waits: &[Duration]) {
        for (i, wait) in waits.iter().enumerate() {
            let attempt = (i + 1) as i32;
            let low = 2f64.powi(attempt).min(30.0);
            let high = (2f64.powi(attempt) + 1.0).min(30.0);
            let secs = wait.as_secs_f64();
            assert!(
                secs >= low && secs <= high,
                "wait {} after attempt {} outside [{}, {}]",
                secs,
                attempt,
                low,
                high
            );
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        for k in 0..4usize {
            let mut outcomes = vec![transient(); k];
            outcomes.push(GenerationOutcome::Success("Chi?".into()));
            let (generator, calls) = scripted(outcomes);
            let sleeper = Arc::new(RecordingSleeper::default());
            let service = GenerationService::new(Arc::new(generator), sleeper.clone());

            let text = service.generate_with_retry("gemini", "prompt", 5).await.unwrap();

            assert_eq!(text, "Chi?");
            assert_eq!(calls.load(Ordering::SeqCst) as usize, k + 1);
            let waits = sleeper.waits.lock().unwrap();
            assert_eq!(waits.len(), k);
            assert_wait_bounds(&waits);
        }
    }

    #[tokio::test]
    async fn all_transient_exhausts_without_final_wait() {
        let (generator, calls) = scripted(vec![transient(); 5]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let service = GenerationService::new(Arc::new(generator), sleeper.clone());

        let err = service.generate_with_retry("gemini", "prompt", 5).await.unwrap_err();

        assert!(matches!(err, AppError::RetriesExhausted { attempts: 5 }));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        let waits = sleeper.waits.lock().unwrap();
        assert_eq!(waits.len(), 4);
        assert_wait_bounds(&waits);
    }

    #[tokio::test]
    async fn fatal_error_stops_immediately() {
        let (generator, calls) = scripted(vec![
            transient(),
            GenerationOutcome::FatalFailure("400 INVALID_ARGUMENT bad key".into()),
            GenerationOutcome::Success("never reached".into()),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let service = GenerationService::new(Arc::new(generator), sleeper.clone());

        let err = service.generate_with_retry("gemini", "prompt", 5).await.unwrap_err();

        match err {
            AppError::GenerationFailed(cause) => assert!(cause.contains("INVALID_ARGUMENT")),
            other => panic!("expected fatal generation error, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(sleeper.waits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn single_attempt_budget_never_sleeps() {
        let (generator, _) = scripted(vec![transient()]);
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().never();
        let service = GenerationService::new(Arc::new(generator), Arc::new(sleeper));

        let err = service.generate_with_retry("gemini", "prompt", 1).await.unwrap_err();
        assert!(matches!(err, AppError::RetriesExhausted { attempts: 1 }));
    }

    #[tokio::test]
    async fn passes_model_and_prompt_through() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|model, prompt| {
                assert_eq!(model, "gemini-2.5-pro");
                assert_eq!(prompt, "the prompt");
                GenerationOutcome::Success("ok".into())
            });
        let service = GenerationService::new(Arc::new(generator), Arc::new(TokioSleeper));

        let text = service
            .generate_with_retry("gemini-2.5-pro", "the prompt", DEFAULT_MAX_RETRIES)
            .await
            .unwrap();
        assert_eq!(text, "ok");
    }

    #[test]
    fn backoff_grows_and_caps() {
        assert_eq!(backoff_delay(1, 0.0), Duration::from_secs(2));
        assert_eq!(backoff_delay(2, 0.5), Duration::from_secs_f64(4.5));
        assert_eq!(backoff_delay(4, 0.99), Duration::from_secs_f64(16.99));
        assert_eq!(backoff_delay(5, 0.0), MAX_BACKOFF);
        assert_eq!(backoff_delay(40, 1.0), MAX_BACKOFF);
    }

    #[test]
    fn classifies_overloaded_as_transient() {
        let body = r#"{"error":{"code":503,"message":"The model is overloaded. Please try again later.","status":"UNAVAILABLE"}}"#;
        assert!(matches!(
            classify_error(StatusCode::SERVICE_UNAVAILABLE, body),
            GenerationOutcome::TransientFailure(_)
        ));
    }

    #[test]
    fn classifies_plain_unavailable_text_as_transient() {
        assert!(matches!(
            classify_error(StatusCode::BAD_GATEWAY, "Service Unavailable"),
            GenerationOutcome::TransientFailure(_)
        ));
    }

    #[test]
    fn classifies_other_server_errors_as_fatal() {
        let body = r#"{"error":{"code":500,"message":"Internal error encountered.","status":"INTERNAL"}}"#;
        assert!(matches!(
            classify_error(StatusCode::INTERNAL_SERVER_ERROR, body),
            GenerationOutcome::FatalFailure(_)
        ));
    }

    #[test]
    fn classifies_client_errors_as_fatal() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        match classify_error(StatusCode::TOO_MANY_REQUESTS, body) {
            GenerationOutcome::FatalFailure(cause) => {
                assert!(cause.starts_with("429"));
                assert!(cause.contains("RESOURCE_EXHAUSTED"));
            }
            other => panic!("expected fatal, got {:?}", other),
        }
    }
}

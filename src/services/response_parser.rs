use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::models::domain::GeneratedQuestion;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_+\-]*[ \t]*\r?\n?(.*?)\r?\n?[ \t]*```$")
        .expect("CODE_FENCE is a valid regex pattern")
});

/// Structured shape the model is asked to produce.
#[derive(Debug, Deserialize)]
struct StructuredAnswer {
    question: String,
    #[serde(default)]
    image_prompt: Option<String>,
}

/// Decoded model output: the strict JSON shape, or plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelAnswer {
    Structured(GeneratedQuestion),
    FreeText(String),
}

impl From<ModelAnswer> for GeneratedQuestion {
    fn from(answer: ModelAnswer) -> Self {
        match answer {
            ModelAnswer::Structured(generated) => generated,
            ModelAnswer::FreeText(text) => GeneratedQuestion {
                question: text,
                image_prompt: String::new(),
            },
        }
    }
}

/// Removes a surrounding ``` fence and its language tag, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match CODE_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => trimmed,
    }
}

pub fn decode_answer(raw_text: &str) -> ModelAnswer {
    let body = strip_code_fence(raw_text);

    match serde_json::from_str::<StructuredAnswer>(body) {
        Ok(answer) => ModelAnswer::Structured(GeneratedQuestion {
            question: answer.question,
            image_prompt: answer.image_prompt.unwrap_or_default(),
        }),
        Err(e) => {
            log::warn!(
                "Model output is not the expected JSON object ({}); using the raw text as the question",
                e
            );
            ModelAnswer::FreeText(body.to_string())
        }
    }
}

/// Extracts the question (and image prompt) from a raw model answer.
///
/// Never fails: output that does not decode as `{question, image_prompt}`
/// becomes the question itself with an empty image prompt.
pub fn parse_response(raw_text: &str) -> GeneratedQuestion {
    decode_answer(raw_text).into()
}

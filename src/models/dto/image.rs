//! JSON envelope returned by Cloudflare Workers AI text-to-image models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageEnvelope {
    #[serde(default)]
    pub result: Option<ImageResult>,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageResult {
    #[serde(default)]
    pub image: Option<String>,
}

impl ImageEnvelope {
    pub fn image_base64(&self) -> Option<&str> {
        self.result
            .as_ref()?
            .image
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

pub mod gemini;
pub mod image;
pub mod telegram;

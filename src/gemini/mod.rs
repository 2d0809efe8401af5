//! Gemini File Search integration.

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::GeminiError;

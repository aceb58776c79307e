//! Gemini REST adapter.
//!
//! Implements the text and image generation ports from `storyloom-core`
//! against the Generative Language API: `generateContent` for structured
//! narrative and `predict` for Imagen illustrations.

pub mod client;
pub mod config;
mod image;
mod text;

pub use client::GeminiClient;
pub use config::GeminiConfig;

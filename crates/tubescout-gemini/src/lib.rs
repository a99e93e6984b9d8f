//! Minimal client for the Gemini `generateContent` endpoint.
//!
//! Implements the text-generation capability the placement pipeline relies
//! on: one prompt in, one free-form text completion out. The caller owns
//! any structure extraction (the model is not trusted to return clean JSON).

pub mod client;
pub mod error;

pub use client::GeminiClient;
pub use error::GeminiError;

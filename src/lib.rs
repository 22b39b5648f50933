//! Lokalize - HTML to localization keys
//!
//! Extracts human-readable text from an HTML fragment and turns it into
//! namespaced localization keys by delegating extraction and translation
//! to a hosted LLM (OpenAI or Google Gemini).

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod provider;
pub mod service;

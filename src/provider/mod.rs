// Provider abstraction over the hosted LLM backends
//
// Each backend gets its own module with its wire structures; both implement
// TranslationProvider so the service can pick one from a model's backend tag:
// - OpenAI: chat completions with JSON response mode
// - Google: Gemini generateContent, fenced JSON stripped before parsing

pub mod common;
pub mod google;
pub mod openai;
pub mod prompt;

use std::sync::Arc;

use async_trait::async_trait;

pub use common::*;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Backend, ModelDescriptor};

/// Extraction and translation of HTML text into localization keys
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn backend(&self) -> Backend;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Extract text from `html` and translate it to English under `prefix`
    async fn translate_text(
        &self,
        html: &str,
        prefix: &str,
        model: &ModelDescriptor,
    ) -> Result<Translations>;

    /// Extract text from `html` and translate it to all four bundle languages
    async fn translate_text_multi_language(
        &self,
        html: &str,
        prefix: &str,
        model: &ModelDescriptor,
    ) -> Result<MultiLanguageTranslations>;
}

/// Factory for creating provider instances
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_provider(
        backend: Backend,
        api_key: &str,
        config: &Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Box<dyn TranslationProvider> {
        match backend {
            Backend::OpenAi => Box::new(openai::OpenAiProvider::new(
                api_key,
                config.openai.clone(),
                config.request.clone(),
                transport,
            )),
            Backend::Google => Box::new(google::GoogleAiProvider::new(
                api_key,
                config.google.clone(),
                transport,
            )),
        }
    }
}

// Google Generative Language (Gemini) backend
// There is no JSON response mode, so replies are unwrapped from markdown
// fences before parsing.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::GoogleConfig;
use crate::error::{LokalizeError, Result};
use crate::models::{Backend, ModelDescriptor};
use super::{
    TranslationProvider,
    common::{
        HttpRequest, HttpTransport, MultiLanguageTranslations, Translations,
        classify_http_failure, clean_html, parse_bundle, parse_translations, strip_code_fence,
    },
    prompt,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

pub struct GoogleAiProvider {
    api_key: String,
    config: GoogleConfig,
    transport: Arc<dyn HttpTransport>,
}

impl GoogleAiProvider {
    pub fn new(api_key: &str, config: GoogleConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: api_key.to_string(),
            config,
            transport,
        }
    }

    fn build_request(&self, model: &ModelDescriptor, prompt: String) -> HttpRequest {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        HttpRequest {
            url: format!(
                "{}/models/{}:generateContent",
                self.config.endpoint.trim_end_matches('/'),
                model.id
            ),
            // The key must never be part of the URL
            headers: vec![("x-goog-api-key".to_string(), self.api_key.clone())],
            body: serde_json::to_value(body).unwrap_or_default(),
        }
    }

    /// Send one generateContent request and return the first candidate's text, unfenced
    async fn generate(&self, model: &ModelDescriptor, request: HttpRequest) -> Result<String> {
        debug!("Sending Google AI request for model: {}", model.id);

        let reply = self.transport.send(request).await?;
        if !reply.is_success() {
            error!("Google AI API error {}: {}", reply.status, reply.error_message());
            return Err(classify_http_failure(Backend::Google, &reply));
        }

        let response: GenerateContentResponse = serde_json::from_str(&reply.body).map_err(|e| {
            LokalizeError::MalformedResponse {
                backend: Backend::Google,
                detail: format!("unexpected generateContent payload ({})", e),
            }
        })?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| LokalizeError::MalformedResponse {
                backend: Backend::Google,
                detail: "response contained no candidates".to_string(),
            })?;

        let cleaned = strip_code_fence(&text).to_string();
        debug!("Cleaned Google AI response: {}", cleaned);
        Ok(cleaned)
    }
}

#[async_trait]
impl TranslationProvider for GoogleAiProvider {
    fn backend(&self) -> Backend {
        Backend::Google
    }

    fn name(&self) -> &str {
        "Google AI"
    }

    fn description(&self) -> &str {
        "Uses Gemini models for fast translations"
    }

    async fn translate_text(
        &self,
        html: &str,
        prefix: &str,
        model: &ModelDescriptor,
    ) -> Result<Translations> {
        info!("Extracting translations with {} (prefix: {})", model.id, prefix);

        let html = clean_html(html);
        let request = self.build_request(model, prompt::single_language_prompt(prefix, &html));

        let text = self.generate(model, request).await?;
        parse_translations(Backend::Google, &text, prefix)
    }

    async fn translate_text_multi_language(
        &self,
        html: &str,
        prefix: &str,
        model: &ModelDescriptor,
    ) -> Result<MultiLanguageTranslations> {
        info!("Extracting multi-language translations with {} (prefix: {})", model.id, prefix);

        let html = clean_html(html);
        let request = self.build_request(model, prompt::multi_language_prompt(prefix, &html));

        let text = self.generate(model, request).await?;
        parse_bundle(Backend::Google, &text, prefix)
    }
}

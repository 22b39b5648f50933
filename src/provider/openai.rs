// OpenAI chat completions backend

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::{OpenAiConfig, RequestConfig};
use crate::error::{LokalizeError, Result};
use crate::models::{Backend, ModelDescriptor};
use super::{
    TranslationProvider,
    common::{
        HttpRequest, HttpTransport, MultiLanguageTranslations, Translations,
        classify_http_failure, clean_html, parse_bundle, parse_translations,
    },
    prompt,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

pub struct OpenAiProvider {
    api_key: String,
    config: OpenAiConfig,
    request: RequestConfig,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiProvider {
    pub fn new(
        api_key: &str,
        config: OpenAiConfig,
        request: RequestConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            api_key: api_key.to_string(),
            config,
            request,
            transport,
        }
    }

    fn build_request(
        &self,
        model: &ModelDescriptor,
        system: String,
        user: String,
        max_tokens_cap: u32,
    ) -> HttpRequest {
        let body = ChatCompletionRequest {
            model: model.id.to_string(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: system },
                ChatMessage { role: "user".to_string(), content: user },
            ],
            temperature: self.request.temperature,
            max_tokens: model.max_tokens.min(max_tokens_cap),
            response_format: ResponseFormat { kind: "json_object".to_string() },
        };

        HttpRequest {
            url: format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/')),
            headers: vec![(
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key),
            )],
            // Serializing plain strings and numbers cannot fail
            body: serde_json::to_value(body).unwrap_or_default(),
        }
    }

    /// Send one completion request and return the message content, `{}` if absent
    async fn complete(&self, request: HttpRequest) -> Result<String> {
        debug!("Sending OpenAI request to: {}", request.url);

        let reply = self.transport.send(request).await?;
        if !reply.is_success() {
            error!("OpenAI API error {}: {}", reply.status, reply.error_message());
            return Err(classify_http_failure(Backend::OpenAi, &reply));
        }

        let response: ChatCompletionResponse = serde_json::from_str(&reply.body).map_err(|e| {
            LokalizeError::MalformedResponse {
                backend: Backend::OpenAi,
                detail: format!("unexpected completion payload ({})", e),
            }
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| "{}".to_string());

        debug!("Raw OpenAI response: {}", content);
        Ok(content)
    }
}

#[async_trait]
impl TranslationProvider for OpenAiProvider {
    fn backend(&self) -> Backend {
        Backend::OpenAi
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn description(&self) -> &str {
        "Uses OpenAI's GPT models for translation"
    }

    async fn translate_text(
        &self,
        html: &str,
        prefix: &str,
        model: &ModelDescriptor,
    ) -> Result<Translations> {
        info!("Extracting translations with {} (prefix: {})", model.id, prefix);

        let html = clean_html(html);
        let request = self.build_request(
            model,
            prompt::single_language_system_prompt(prefix),
            prompt::single_language_user_prompt(&html),
            self.request.single_max_tokens,
        );

        let content = self.complete(request).await?;
        parse_translations(Backend::OpenAi, &content, prefix)
    }

    async fn translate_text_multi_language(
        &self,
        html: &str,
        prefix: &str,
        model: &ModelDescriptor,
    ) -> Result<MultiLanguageTranslations> {
        info!("Extracting multi-language translations with {} (prefix: {})", model.id, prefix);

        let html = clean_html(html);
        let request = self.build_request(
            model,
            prompt::multi_language_system_prompt(prefix),
            prompt::multi_language_user_prompt(&html),
            self.request.multi_max_tokens,
        );

        let content = self.complete(request).await?;
        parse_bundle(Backend::OpenAi, &content, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::find_model;
    use crate::provider::common::{MockHttpTransport, reply};
    use serde_json::json;

    fn provider(transport: MockHttpTransport) -> OpenAiProvider {
        let config = Config::default();
        OpenAiProvider::new("sk-test", config.openai, config.request, Arc::new(transport))
    }

    fn completion(content: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
    }

    #[tokio::test]
    async fn test_translate_text_returns_parsed_mapping() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.url == "https://api.openai.com/v1/chat/completions"
                    && req.headers.contains(&("Authorization".to_string(), "Bearer sk-test".to_string()))
                    && req.body["model"] == "gpt-4"
                    && req.body["response_format"]["type"] == "json_object"
                    && req.body["max_tokens"] == 4000u64
            })
            .times(1)
            .returning(|_| {
                Ok(reply(200, &completion(r#"{"SURVEY.TITLE": "How was it?", "SURVEY.THANKS": "Thanks"}"#)))
            });

        let model = find_model("gpt-4").unwrap();
        let result = provider(transport)
            .translate_text("<h1>¿Qué tal?</h1>", "SURVEY", model)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["SURVEY.TITLE"], "How was it?");
        assert_eq!(result["SURVEY.THANKS"], "Thanks");
    }

    #[tokio::test]
    async fn test_outgoing_request_has_no_template_markers() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                let body = req.body.to_string();
                !body.contains("{{") && !body.contains("user.name") && body.contains("<p>Hola </p>")
            })
            .times(1)
            .returning(|_| Ok(reply(200, &completion(r#"{"P.HELLO": "Hello"}"#))));

        let model = find_model("gpt-3.5-turbo").unwrap();
        provider(transport)
            .translate_text("<p>Hola {{user.name}}</p>", "P", model)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_keys_without_prefix_are_namespaced() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(reply(200, &completion(r#"{"PLACEHOLDER": "Write here"}"#))));

        let model = find_model("gpt-3.5-turbo").unwrap();
        let result = provider(transport).translate_text("<input>", "FORM", model).await.unwrap();
        assert_eq!(result["FORM.PLACEHOLDER"], "Write here");
    }

    #[tokio::test]
    async fn test_missing_content_yields_empty_mapping() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(reply(200, r#"{"choices": [{"message": {"content": null}}]}"#)));

        let model = find_model("gpt-3.5-turbo").unwrap();
        let result = provider(transport).translate_text("<p></p>", "P", model).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_multi_language_uses_larger_token_cap() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.body["max_tokens"] == 8000u64)
            .returning(|_| {
                Ok(reply(
                    200,
                    &completion(r#"{"spanish": {"F.HI": "Hola"}, "english": {"F.HI": "Hi"}, "french": {"F.HI": "Salut"}, "portuguese": {"F.HI": "Oi"}}"#),
                ))
            });

        let model = find_model("gpt-3.5-turbo-16k").unwrap();
        let bundle = provider(transport)
            .translate_text_multi_language("<p>Hola</p>", "F", model)
            .await
            .unwrap();
        assert_eq!(bundle.french["F.HI"], "Salut");
        assert_eq!(bundle.portuguese["F.HI"], "Oi");
        assert!(bundle.inconsistent_languages().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_and_quota_are_distinguished() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(reply(429, r#"{"error": {"message": "Rate limit reached for gpt-4"}}"#))
        });
        let model = find_model("gpt-4").unwrap();
        let err = provider(transport).translate_text("<p>x</p>", "P", model).await.unwrap_err();
        assert!(matches!(err, LokalizeError::RateLimited { backend: Backend::OpenAi }));

        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(reply(429, r#"{"error": {"message": "You exceeded your current quota"}}"#))
        });
        let err = provider(transport).translate_text("<p>x</p>", "P", model).await.unwrap_err();
        assert!(matches!(err, LokalizeError::QuotaExceeded { backend: Backend::OpenAi }));
        assert_eq!(err.billing_url(), Some("https://platform.openai.com/account/billing"));
    }

    #[tokio::test]
    async fn test_non_json_content_is_malformed() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(reply(200, &completion("Here are your translations"))));

        let model = find_model("gpt-4").unwrap();
        let err = provider(transport).translate_text("<p>x</p>", "P", model).await.unwrap_err();
        assert!(matches!(err, LokalizeError::MalformedResponse { .. }));
    }
}

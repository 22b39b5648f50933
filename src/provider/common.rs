use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RequestConfig;
use crate::error::{LokalizeError, Result};
use crate::models::Backend;

/// Localization key (`PREFIX.KEY_NAME`) to translated text, in the order the model returned them
pub type Translations = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    English,
    French,
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Spanish,
        Language::English,
        Language::French,
        Language::Portuguese,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spanish => "spanish",
            Self::English => "english",
            Self::French => "french",
            Self::Portuguese => "portuguese",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Spanish => "Spanish",
            Self::English => "English",
            Self::French => "French",
            Self::Portuguese => "Portuguese",
        }
    }
}

/// Translation bundle returned by multi-language extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiLanguageTranslations {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub spanish: Translations,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub english: Translations,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub french: Translations,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub portuguese: Translations,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Translations, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Translations>::deserialize(deserializer)?.unwrap_or_default())
}

impl MultiLanguageTranslations {
    pub fn get(&self, language: Language) -> &Translations {
        match language {
            Language::Spanish => &self.spanish,
            Language::English => &self.english,
            Language::French => &self.french,
            Language::Portuguese => &self.portuguese,
        }
    }

    fn get_mut(&mut self, language: Language) -> &mut Translations {
        match language {
            Language::Spanish => &mut self.spanish,
            Language::English => &mut self.english,
            Language::French => &mut self.french,
            Language::Portuguese => &mut self.portuguese,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, &Translations)> {
        Language::ALL.into_iter().map(move |language| (language, self.get(language)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, translations)| translations.is_empty())
    }

    /// Languages whose key set differs from the English one
    pub fn inconsistent_languages(&self) -> Vec<Language> {
        let reference: HashSet<&String> = self.english.keys().collect();
        Language::ALL
            .into_iter()
            .filter(|language| self.get(*language).keys().collect::<HashSet<_>>() != reference)
            .collect()
    }
}

static MUSTACHE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{[^}]*\}\}").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap());

/// Drop `{{...}}` interpolation markers and flatten the fragment to one line
pub fn clean_html(html: &str) -> String {
    let without_templates = MUSTACHE.replace_all(html, "");
    WHITESPACE
        .replace_all(&without_templates, " ")
        .trim()
        .to_string()
}

/// Unwrap a markdown code fence if the model added one
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text.trim(),
    }
}

/// Rewrite keys missing the namespace to `prefix.KEY`
pub fn normalize_prefix(translations: Translations, prefix: &str) -> Translations {
    if prefix.is_empty() {
        return translations;
    }

    translations
        .into_iter()
        .map(|(key, value)| {
            if key.starts_with(prefix) {
                (key, value)
            } else {
                (format!("{}.{}", prefix, key), value)
            }
        })
        .collect()
}

pub fn parse_translations(backend: Backend, text: &str, prefix: &str) -> Result<Translations> {
    let translations: Translations = serde_json::from_str(text).map_err(|e| {
        warn!("Failed to parse {} response as translations: {}", backend, e);
        LokalizeError::MalformedResponse {
            backend,
            detail: format!("not a valid JSON object of strings ({})", e),
        }
    })?;

    if translations.is_empty() {
        warn!("{} returned an empty translation object", backend);
    }

    Ok(normalize_prefix(translations, prefix))
}

pub fn parse_bundle(backend: Backend, text: &str, prefix: &str) -> Result<MultiLanguageTranslations> {
    let mut bundle: MultiLanguageTranslations = serde_json::from_str(text).map_err(|e| {
        warn!("Failed to parse {} response as translation bundle: {}", backend, e);
        LokalizeError::MalformedResponse {
            backend,
            detail: format!("not a valid translation bundle ({})", e),
        }
    })?;

    for language in Language::ALL {
        let translations = std::mem::take(bundle.get_mut(language));
        *bundle.get_mut(language) = normalize_prefix(translations, prefix);
    }

    if bundle.is_empty() {
        warn!("{} returned an empty translation bundle", backend);
        return Ok(bundle);
    }

    let inconsistent = bundle.inconsistent_languages();
    if !inconsistent.is_empty() {
        warn!(
            "{} returned differing key sets for: {}",
            backend,
            inconsistent.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(", ")
        );
    }

    Ok(bundle)
}

/// Map a non-success HTTP status to the user-facing error taxonomy
pub fn classify_http_failure(backend: Backend, reply: &HttpReply) -> LokalizeError {
    match reply.status {
        429 => {
            if reply.error_message().to_lowercase().contains("rate limit") {
                LokalizeError::RateLimited { backend }
            } else {
                LokalizeError::QuotaExceeded { backend }
            }
        }
        401 | 403 => LokalizeError::InvalidCredentials { backend },
        503 => LokalizeError::BackendUnavailable { backend },
        status => LokalizeError::UnknownHttp {
            backend,
            status,
            reason: reply.reason.clone(),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `error.message` from the usual `{"error": {...}}` envelope, else the raw body
    pub fn error_message(&self) -> String {
        serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| self.body.clone())
    }
}

/// Outbound HTTP seam shared by the providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpReply>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &RequestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("lokalize/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpReply> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        // The URL may carry credentials, keep it out of the error text
        let response = builder.send().await.map_err(|e| e.without_url())?;
        let status = response.status();
        let body = response.text().await.map_err(|e| e.without_url())?;
        debug!("Received HTTP {} ({} bytes)", status.as_u16(), body.len());

        Ok(HttpReply {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

#[cfg(test)]
pub(crate) fn reply(status: u16, body: &str) -> HttpReply {
    HttpReply {
        status,
        reason: match status {
            200 => "OK",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            _ => "",
        }
        .to_string(),
        body: body.to_string(),
    }
}

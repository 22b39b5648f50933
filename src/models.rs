use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LokalizeError;

/// Remote LLM service a model is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    OpenAi,
    Google,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Google => "google",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Google => "Google AI",
        }
    }

    pub fn billing_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://platform.openai.com/account/billing",
            Self::Google => "https://console.cloud.google.com/billing",
        }
    }

    pub fn api_key_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://platform.openai.com/api-keys",
            Self::Google => "https://makersuite.google.com/app/apikey",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Backend {
    type Err = LokalizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "google" | "gemini" => Ok(Self::Google),
            other => Err(LokalizeError::Config(format!(
                "Unknown provider '{}'. Valid providers: openai, google",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub max_tokens: u32,
    pub description: &'static str,
    pub backend: Backend,
}

pub const DEFAULT_MODEL_ID: &str = "gpt-3.5-turbo";

pub static AVAILABLE_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        max_tokens: 4000,
        description: "Good balance between performance and cost",
        backend: Backend::OpenAi,
    },
    ModelDescriptor {
        id: "gpt-3.5-turbo-16k",
        name: "GPT-3.5 Turbo 16K",
        max_tokens: 16000,
        description: "Handles longer texts, more expensive",
        backend: Backend::OpenAi,
    },
    ModelDescriptor {
        id: "gpt-4",
        name: "GPT-4",
        max_tokens: 8000,
        description: "Most capable model, highest quality, most expensive",
        backend: Backend::OpenAi,
    },
    ModelDescriptor {
        id: "gpt-4-turbo-preview",
        name: "GPT-4 Turbo",
        max_tokens: 128000,
        description: "Latest GPT-4 version, handles very long texts",
        backend: Backend::OpenAi,
    },
    ModelDescriptor {
        id: "gemini-2.0-flash",
        name: "Gemini 2.0 Flash",
        max_tokens: 30720,
        description: "Google's fastest model, optimized for quick responses",
        backend: Backend::Google,
    },
];

pub fn find_model(id: &str) -> Option<&'static ModelDescriptor> {
    AVAILABLE_MODELS.iter().find(|m| m.id == id)
}

pub fn models_for_backend(backend: Backend) -> impl Iterator<Item = &'static ModelDescriptor> {
    AVAILABLE_MODELS.iter().filter(move |m| m.backend == backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_model() {
        let model = find_model("gemini-2.0-flash").unwrap();
        assert_eq!(model.backend, Backend::Google);
        assert_eq!(model.max_tokens, 30720);
        assert!(find_model("gpt-5").is_none());
        assert!(find_model(DEFAULT_MODEL_ID).is_some());
    }

    #[test]
    fn test_model_ids_are_unique() {
        for (i, a) in AVAILABLE_MODELS.iter().enumerate() {
            for b in &AVAILABLE_MODELS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("OpenAI".parse::<Backend>().unwrap(), Backend::OpenAi);
        assert_eq!(" google ".parse::<Backend>().unwrap(), Backend::Google);
        assert!("azure".parse::<Backend>().is_err());
        assert_eq!(models_for_backend(Backend::OpenAi).count(), 4);
    }
}

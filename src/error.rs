use thiserror::Error;

use crate::models::Backend;

#[derive(Error, Debug)]
pub enum LokalizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key is required for translations")]
    MissingApiKey,

    #[error("Invalid model selected: {0}")]
    UnknownModel(String),

    #[error("Invalid response format from {backend}: {detail}")]
    MalformedResponse { backend: Backend, detail: String },

    #[error("{backend} rate limit exceeded. Wait a minute and try again, or switch to a different provider.")]
    RateLimited { backend: Backend },

    #[error("{} quota exceeded. Check your billing status at {}", .backend, .backend.billing_url())]
    QuotaExceeded { backend: Backend },

    #[error("Invalid {} API key or insufficient permissions. Check your API key at {}", .backend, .backend.api_key_url())]
    InvalidCredentials { backend: Backend },

    #[error("{backend} API is temporarily unavailable. Please try again later.")]
    BackendUnavailable { backend: Backend },

    #[error("{backend} API call failed: {status} {reason}")]
    UnknownHttp {
        backend: Backend,
        status: u16,
        reason: String,
    },
}

impl LokalizeError {
    /// Billing console to point the user at, for errors a payment change can fix.
    pub fn billing_url(&self) -> Option<&'static str> {
        match self {
            Self::QuotaExceeded { backend } => Some(backend.billing_url()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LokalizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_carries_billing_url() {
        let err = LokalizeError::QuotaExceeded { backend: Backend::Google };
        assert_eq!(err.billing_url(), Some("https://console.cloud.google.com/billing"));
        assert!(err.to_string().contains("console.cloud.google.com/billing"));

        let err = LokalizeError::RateLimited { backend: Backend::OpenAi };
        assert_eq!(err.billing_url(), None);
    }

    #[test]
    fn test_unknown_http_message() {
        let err = LokalizeError::UnknownHttp {
            backend: Backend::Google,
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "Google AI API call failed: 500 Internal Server Error");
    }
}

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{LokalizeError, Result};
use crate::models::{ModelDescriptor, find_model};
use crate::provider::{
    HttpTransport, MultiLanguageTranslations, ProviderFactory, ReqwestTransport,
    TranslationProvider, Translations,
};

/// Entry point for extraction: resolves a model id to its backend's provider
pub struct TranslationService {
    config: Config,
    transport: Arc<dyn HttpTransport>,
}

impl TranslationService {
    pub fn new(config: Config) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config.request)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Validate the inputs and build the provider serving `model_id`.
    /// Never touches the network.
    pub fn resolve_provider(
        &self,
        api_key: &str,
        model_id: &str,
    ) -> Result<(Box<dyn TranslationProvider>, &'static ModelDescriptor)> {
        if api_key.trim().is_empty() {
            return Err(LokalizeError::MissingApiKey);
        }

        let model = find_model(model_id)
            .ok_or_else(|| LokalizeError::UnknownModel(model_id.to_string()))?;

        debug!("Resolved model {} to backend {}", model.id, model.backend);
        let provider = ProviderFactory::create_provider(
            model.backend,
            api_key.trim(),
            &self.config,
            Arc::clone(&self.transport),
        );

        Ok((provider, model))
    }

    /// Single-language (English) extraction
    pub async fn extract_translations(
        &self,
        html: &str,
        prefix: &str,
        api_key: &str,
        model_id: &str,
    ) -> Result<Translations> {
        let (provider, model) = self.resolve_provider(api_key, model_id)?;
        info!("Using {} provider with model {}", provider.name(), model.id);

        let translations = provider.translate_text(html, prefix, model).await?;
        info!("Extracted {} translation keys", translations.len());
        Ok(translations)
    }

    /// Four-language bundle extraction
    pub async fn extract_multi_language_translations(
        &self,
        html: &str,
        prefix: &str,
        api_key: &str,
        model_id: &str,
    ) -> Result<MultiLanguageTranslations> {
        let (provider, model) = self.resolve_provider(api_key, model_id)?;
        info!("Using {} provider with model {}", provider.name(), model.id);

        let bundle = provider.translate_text_multi_language(html, prefix, model).await?;
        info!(
            "Extracted {} translation keys per language",
            bundle.english.len()
        );
        Ok(bundle)
    }
}

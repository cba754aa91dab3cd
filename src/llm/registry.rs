//! Provider registry: one shared adapter per configured vendor.
//!
//! Adapters are built once at startup, only for vendors that pass the
//! credential gate, and shared across every request behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::llm::credentials::CredentialSet;
use crate::llm::providers::{AnthropicProvider, GeminiProvider, GroqProvider, OpenAIProvider};
use crate::llm::traits::{LlmError, ProviderAdapter};
use crate::types::Vendor;

/// Vendor to adapter lookup
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    adapters: HashMap<Vendor, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the HTTP adapter for every vendor that has a credential
    pub fn from_config(
        config: &GatewayConfig,
        credentials: &CredentialSet,
    ) -> Result<Self, LlmError> {
        let timeout = config.chat.request_timeout;
        let mut registry = Self::new();

        for vendor in credentials.available_vendors() {
            let Some(api_key) = credentials.api_key(vendor) else {
                continue;
            };
            let api_key = api_key.to_string();
            let base_url = config.vendors.get(vendor).base_url.clone();

            let adapter: Arc<dyn ProviderAdapter> = match vendor {
                Vendor::OpenAI => Arc::new(OpenAIProvider::new(api_key, base_url, timeout)?),
                Vendor::Anthropic => Arc::new(AnthropicProvider::new(api_key, base_url, timeout)?),
                Vendor::Google => Arc::new(GeminiProvider::new(api_key, base_url, timeout)?),
                Vendor::Groq => Arc::new(GroqProvider::new(api_key, base_url, timeout)?),
            };
            tracing::info!("Configured {} provider", vendor.label());
            registry.adapters.insert(vendor, adapter);
        }

        Ok(registry)
    }

    /// Register an adapter under the vendor it reports, replacing any previous one
    pub fn insert(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.vendor(), adapter);
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.insert(adapter);
        self
    }

    pub fn get(&self, vendor: Vendor) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&vendor).cloned()
    }

    pub fn contains(&self, vendor: Vendor) -> bool {
        self.adapters.contains_key(&vendor)
    }

    /// Vendors with a registered adapter, in catalog order
    pub fn vendors(&self) -> Vec<Vendor> {
        Vendor::ALL
            .into_iter()
            .filter(|vendor| self.contains(*vendor))
            .collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("vendors", &self.vendors())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_credentialed_vendors_get_adapters() {
        let mut config = GatewayConfig::default();
        config.vendors.anthropic.api_key = Some("sk-ant".to_string());
        config.vendors.groq.api_key = Some("gsk".to_string());
        config.vendors.openai.api_key = Some("   ".to_string());

        let credentials = CredentialSet::from_config(&config);
        let registry = ProviderRegistry::from_config(&config, &credentials).unwrap();

        assert_eq!(registry.vendors(), vec![Vendor::Anthropic, Vendor::Groq]);
        assert!(registry.get(Vendor::OpenAI).is_none());
        assert_eq!(
            registry.get(Vendor::Groq).map(|adapter| adapter.vendor()),
            Some(Vendor::Groq)
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry =
            ProviderRegistry::from_config(&GatewayConfig::default(), &CredentialSet::new())
                .unwrap();
        assert!(registry.vendors().is_empty());
        assert_eq!(format!("{:?}", registry), "ProviderRegistry { vendors: [] }");
    }
}

//! Model catalog: which model ids exist and which vendor owns each one.
//!
//! Every vendor starts from a built-in default list. A configured override
//! replaces that list only when the whole override is valid; otherwise the
//! vendor keeps its defaults and a warning is logged. One vendor's bad
//! override never touches another vendor's list.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, GatewayConfig};
use crate::error::GatewayError;
use crate::llm::credentials::CredentialSet;
use crate::types::{ModelDescriptor, Vendor};

/// Built-in `(id, display name)` lists per vendor
static DEFAULT_MODELS: Lazy<BTreeMap<Vendor, Vec<ModelDescriptor>>> = Lazy::new(|| {
    let table: [(Vendor, &[(&str, &str)]); 4] = [
        (
            Vendor::OpenAI,
            &[
                ("gpt-4o", "GPT-4o"),
                ("gpt-4o-mini", "GPT-4o Mini"),
                ("gpt-4-turbo", "GPT-4 Turbo"),
                ("gpt-3.5-turbo", "GPT-3.5 Turbo"),
            ],
        ),
        (
            Vendor::Anthropic,
            &[
                ("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet"),
                ("claude-3-5-haiku-20241022", "Claude 3.5 Haiku"),
                ("claude-3-opus-20240229", "Claude 3 Opus"),
            ],
        ),
        (
            Vendor::Google,
            &[
                ("gemini-2.0-flash-exp", "Gemini 2.0 Flash"),
                ("gemini-1.5-pro", "Gemini 1.5 Pro"),
                ("gemini-1.5-flash", "Gemini 1.5 Flash"),
            ],
        ),
        (
            Vendor::Groq,
            &[
                ("llama-3.3-70b-versatile", "Llama 3.3 70B"),
                ("llama-3.1-70b-versatile", "Llama 3.1 70B"),
                ("llama-3.2-90b-vision-preview", "Llama 3.2 90B Vision"),
                ("mixtral-8x7b-32768", "Mixtral 8x7B"),
            ],
        ),
    ];

    table
        .into_iter()
        .map(|(vendor, models)| {
            let descriptors = models
                .iter()
                .map(|(id, name)| ModelDescriptor::new(*id, *name, vendor))
                .collect();
            (vendor, descriptors)
        })
        .collect()
});

/// Built-in model list for a vendor
pub fn default_models(vendor: Vendor) -> Vec<ModelDescriptor> {
    DEFAULT_MODELS.get(&vendor).cloned().unwrap_or_default()
}

/// Why an override was discarded. Logged, never returned to callers.
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("not valid JSON: {0}")]
    Parse(String),
    #[error("expected a list of {{id, name, provider}} objects")]
    NotAList,
    #[error("the list is empty")]
    Empty,
    #[error("entry {index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },
}

#[derive(Debug, Deserialize)]
struct RawModelEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    provider: Option<String>,
}

fn required(
    value: Option<String>,
    index: usize,
    field: &'static str,
) -> Result<String, OverrideError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(OverrideError::MissingField { index, field })
}

/// Parse and validate an override for one vendor.
///
/// A string source is treated as JSON text (the environment variable form);
/// anything else must already be a list.
pub fn parse_override(
    vendor: Vendor,
    source: &Value,
) -> Result<Vec<ModelDescriptor>, OverrideError> {
    let parsed;
    let value = match source {
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text)
                .map_err(|e| OverrideError::Parse(e.to_string()))?;
            &parsed
        }
        other => other,
    };

    if !value.is_array() {
        return Err(OverrideError::NotAList);
    }

    let entries: Vec<RawModelEntry> =
        serde_json::from_value(value.clone()).map_err(|e| OverrideError::Parse(e.to_string()))?;
    if entries.is_empty() {
        return Err(OverrideError::Empty);
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Ok(ModelDescriptor {
                id: required(entry.id, index, "id")?,
                name: required(entry.name, index, "name")?,
                provider: required(entry.provider, index, "provider")?,
                vendor,
            })
        })
        .collect()
}

/// Resolve one vendor's model list, falling back to the defaults on any
/// override problem
pub fn load_vendor_models(vendor: Vendor, source: Option<&Value>) -> Vec<ModelDescriptor> {
    let Some(source) = source else {
        return default_models(vendor);
    };

    match parse_override(vendor, source) {
        Ok(models) => models,
        Err(e) => {
            warn!(
                vendor = %vendor,
                error = %e,
                "Invalid model override for {}, using defaults",
                vendor
            );
            default_models(vendor)
        }
    }
}

/// Registry of every known model, keyed by id
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    vendors: BTreeMap<Vendor, Vec<ModelDescriptor>>,
    index: HashMap<String, (Vendor, usize)>,
}

impl ModelCatalog {
    /// Catalog built from the default lists only
    pub fn with_defaults() -> Self {
        Self::from_vendor_lists(DEFAULT_MODELS.clone())
            .unwrap_or_else(|e| unreachable!("built-in model lists collide: {}", e))
    }

    /// Load every vendor's list from configuration, applying overrides
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let catalog = Self::from_vendor_lists(Vendor::ALL.into_iter().map(|vendor| {
            let models = load_vendor_models(vendor, config.vendors.get(vendor).models.as_ref());
            (vendor, models)
        }))?;

        info!(
            models = catalog.index.len(),
            "Loaded model catalog: {}",
            serde_json::to_string(&catalog.vendors).unwrap_or_default()
        );
        Ok(catalog)
    }

    /// Build a catalog from explicit lists, rejecting duplicate ids
    pub fn from_vendor_lists(
        lists: impl IntoIterator<Item = (Vendor, Vec<ModelDescriptor>)>,
    ) -> Result<Self, ConfigError> {
        let vendors: BTreeMap<Vendor, Vec<ModelDescriptor>> = lists.into_iter().collect();
        let mut index: HashMap<String, (Vendor, usize)> = HashMap::new();

        for (vendor, models) in &vendors {
            for (position, model) in models.iter().enumerate() {
                if let Some((owner, _)) = index.get(&model.id) {
                    return Err(ConfigError::DuplicateModelId {
                        model_id: model.id.clone(),
                        first: *owner,
                        second: *vendor,
                    });
                }
                index.insert(model.id.clone(), (*vendor, position));
            }
        }

        Ok(Self { vendors, index })
    }

    /// Look up a model by id regardless of credential state
    pub fn resolve(&self, model_id: &str) -> Result<&ModelDescriptor, GatewayError> {
        self.index
            .get(model_id)
            .and_then(|(vendor, position)| self.vendors.get(vendor)?.get(*position))
            .ok_or_else(|| GatewayError::not_found(model_id))
    }

    /// Models configured for one vendor
    pub fn models(&self, vendor: Vendor) -> &[ModelDescriptor] {
        self.vendors.get(&vendor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every model in catalog order
    pub fn all(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.vendors.values().flatten()
    }

    /// Models whose vendor has a credential, in catalog order
    pub fn list_models(&self, credentials: &CredentialSet) -> Vec<ModelDescriptor> {
        self.all()
            .filter(|model| credentials.is_available(model.vendor))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

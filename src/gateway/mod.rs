//! Gateway orchestration: one canonical chat turn across any configured vendor.
//!
//! Each request moves through a fixed sequence of stages and stops at the
//! first failure:
//!
//! ```text
//! Received → Resolved → Translated → Invoked → Normalized → Returned
//!     ↓          ↓           ↓           ↓
//! InvalidInput  NotFound /   (pure)    UpstreamFailure
//!               Unavailable
//! ```
//!
//! There are no retries and no partial results. The gateway holds only
//! read-only state (catalog, credentials, adapters, settings) so any number of
//! requests can run concurrently against one instance.
//!
//! ```no_run
//! use switchboard::{Gateway, GatewayConfig, Message};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::from_env()?;
//! let gateway = Gateway::from_config(&config)?;
//!
//! let reply = gateway
//!     .chat(vec![Message::user("What is the capital of France?")], "gpt-4o-mini", 0.7)
//!     .await?;
//! println!("{}", reply.content);
//! # Ok(())
//! # }
//! ```

pub mod routing;

pub use routing::RoutingTable;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, Instrument};

use crate::config::{ChatSettings, ConfigError, GatewayConfig};
use crate::error::GatewayError;
use crate::llm::catalog::ModelCatalog;
use crate::llm::credentials::CredentialSet;
use crate::llm::registry::ProviderRegistry;
use crate::llm::traits::ProviderAdapter;
use crate::llm::translate::{from_vendor_format, to_vendor_format};
use crate::types::{messages_from_value, Message, ModelDescriptor};
use crate::utils::logging::truncate_string;

/// Request lifecycle stages, logged as each one is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStage {
    Received,
    Resolved,
    Translated,
    Invoked,
    Normalized,
}

impl fmt::Display for ChatStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChatStage::Received => "received",
            ChatStage::Resolved => "resolved",
            ChatStage::Translated => "translated",
            ChatStage::Invoked => "invoked",
            ChatStage::Normalized => "normalized",
        };
        f.write_str(name)
    }
}

/// A chat request as received from a caller
///
/// `model` and `temperature` fall back to the configured defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
        }
    }

    /// One user prompt, preceded by a system message when one is given
    pub fn prompt(prompt: impl Into<String>, system: Option<String>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(prompt));
        Self::new(messages)
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Parse a raw JSON body, rejecting anything malformed as `InvalidInput`
    pub fn from_value(body: &Value) -> Result<Self, GatewayError> {
        let object = body
            .as_object()
            .ok_or_else(|| GatewayError::invalid_input("request body must be an object"))?;

        let messages = object
            .get("messages")
            .ok_or_else(|| GatewayError::invalid_input("messages is required"))?;
        let messages = messages_from_value(messages)?;

        let model = match object.get("model") {
            None | Some(Value::Null) => None,
            Some(Value::String(model)) => Some(model.clone()),
            Some(_) => return Err(GatewayError::invalid_input("model must be a string")),
        };

        let temperature = match object.get("temperature") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                value
                    .as_f64()
                    .ok_or_else(|| GatewayError::invalid_input("temperature must be a number"))?,
            ),
        };

        Ok(Self {
            messages,
            model,
            temperature,
        })
    }
}

/// The chat gateway
#[derive(Clone)]
pub struct Gateway {
    routing: RoutingTable,
    registry: ProviderRegistry,
    settings: ChatSettings,
}

impl Gateway {
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Build a gateway with HTTP adapters for every credentialed vendor
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        GatewayBuilder::new().config(config.clone()).build()
    }

    /// Run one chat turn against `model_id`
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        model_id: &str,
        temperature: f64,
    ) -> Result<Message, GatewayError> {
        let span = tracing::info_span!(
            "chat",
            model_id = %model_id,
            vendor = tracing::field::Empty
        );
        self.run_chat(messages, model_id, temperature)
            .instrument(span)
            .await
    }

    /// Run a chat turn from a typed request, applying configured defaults
    pub async fn send(&self, request: ChatRequest) -> Result<Message, GatewayError> {
        let model_id = request
            .model
            .unwrap_or_else(|| self.settings.default_model.clone());
        let temperature = request.temperature.unwrap_or(self.settings.temperature);
        self.chat(request.messages, &model_id, temperature).await
    }

    /// Run a chat turn from a raw JSON body
    pub async fn chat_request(&self, body: Value) -> Result<Message, GatewayError> {
        let request = ChatRequest::from_value(&body)?;
        self.send(request).await
    }

    /// Models that can currently be routed, vendors in catalog order
    pub fn list_models(&self) -> Vec<ModelDescriptor> {
        self.routing.routable_models()
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    async fn run_chat(
        &self,
        messages: Vec<Message>,
        model_id: &str,
        temperature: f64,
    ) -> Result<Message, GatewayError> {
        debug!(stage = %ChatStage::Received, messages = messages.len(), "Chat request received");
        validate_request(&messages, temperature)?;

        let descriptor = self.routing.route(model_id)?;
        let vendor = descriptor.vendor;
        tracing::Span::current().record("vendor", vendor.as_str());

        let adapter = self
            .registry
            .get(vendor)
            .ok_or_else(|| GatewayError::unavailable(model_id, vendor))?;
        debug!(stage = %ChatStage::Resolved, model = %descriptor.name, "Model resolved");

        let request = to_vendor_format(vendor, &messages, self.settings.gemini_system_policy);
        debug!(
            stage = %ChatStage::Translated,
            format = request.format_name(),
            "Request translated"
        );

        let config = self.settings.chat_config(temperature);
        let response = adapter
            .complete(&request, &descriptor.id, &config)
            .await
            .map_err(|e| {
                error!("{} call failed: {}", vendor.label(), e);
                GatewayError::upstream(vendor, &e)
            })?;
        debug!(stage = %ChatStage::Invoked, "Vendor replied");

        let reply = from_vendor_format(&response);
        debug!(
            stage = %ChatStage::Normalized,
            preview = %truncate_string(&reply.content, 80),
            "Reply normalized"
        );
        Ok(reply)
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("routing", &self.routing)
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Reject sequences and parameters no vendor should ever see
fn validate_request(messages: &[Message], temperature: f64) -> Result<(), GatewayError> {
    if messages.is_empty() {
        return Err(GatewayError::invalid_input("messages must not be empty"));
    }
    if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
        return Err(GatewayError::invalid_input(format!(
            "temperature {} is outside 0.0..=2.0",
            temperature
        )));
    }
    Ok(())
}

/// Builder for [`Gateway`]
///
/// Anything not supplied is derived from the configuration. Adapters passed
/// with [`GatewayBuilder::adapter`] replace the HTTP adapter for their vendor,
/// which is how tests substitute a vendor without touching the network.
pub struct GatewayBuilder {
    config: GatewayConfig,
    catalog: Option<ModelCatalog>,
    credentials: Option<CredentialSet>,
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::default(),
            catalog: None,
            credentials: None,
            adapters: Vec::new(),
        }
    }

    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn credentials(mut self, credentials: CredentialSet) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Validate the configuration and assemble the gateway
    ///
    /// Fails on invalid settings and on model ids claimed by two vendors.
    /// Malformed model overrides do not fail; the catalog falls back instead.
    pub fn build(self) -> Result<Gateway, ConfigError> {
        self.config.validate()?;

        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => ModelCatalog::from_config(&self.config)?,
        };
        let credentials = self
            .credentials
            .unwrap_or_else(|| CredentialSet::from_config(&self.config));

        let mut registry = ProviderRegistry::from_config(&self.config, &credentials)
            .map_err(|e| ConfigError::Validation(format!("Failed to build adapter: {}", e)))?;
        for adapter in self.adapters {
            registry.insert(adapter);
        }

        tracing::info!(
            "Gateway ready: {} models, vendors {:?}",
            catalog.len(),
            credentials.available_vendors()
        );

        Ok(Gateway {
            routing: RoutingTable::new(Arc::new(catalog), Arc::new(credentials)),
            registry,
            settings: self.config.chat,
        })
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

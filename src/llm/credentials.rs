//! Credential gate: which vendors have a usable API key.
//!
//! The set is built once at startup and never mutated afterwards, so it can be
//! shared behind an `Arc` and read from any number of concurrent requests.

use std::collections::HashMap;

use crate::config::GatewayConfig;
use crate::types::Vendor;
use crate::utils::logging::obscure_credential;

/// One optional secret per vendor
#[derive(Clone, Default)]
pub struct CredentialSet {
    keys: HashMap<Vendor, String>,
}

impl CredentialSet {
    /// Create an empty set: no vendor is available
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the api keys present in a configuration
    pub fn from_config(config: &GatewayConfig) -> Self {
        Vendor::ALL
            .into_iter()
            .fold(Self::new(), |set, vendor| match &config.vendors.get(vendor).api_key {
                Some(key) => set.with_key(vendor, key.clone()),
                None => set,
            })
    }

    /// Add a key for a vendor. Blank keys are ignored.
    pub fn with_key(mut self, vendor: Vendor, key: impl Into<String>) -> Self {
        let key = key.into();
        if key.trim().is_empty() {
            self.keys.remove(&vendor);
        } else {
            self.keys.insert(vendor, key);
        }
        self
    }

    pub fn is_available(&self, vendor: Vendor) -> bool {
        self.keys.contains_key(&vendor)
    }

    /// The secret for a vendor, if one is configured
    pub fn api_key(&self, vendor: Vendor) -> Option<&str> {
        self.keys.get(&vendor).map(String::as_str)
    }

    /// Vendors with a credential, in catalog order
    pub fn available_vendors(&self) -> Vec<Vendor> {
        Vendor::ALL
            .into_iter()
            .filter(|vendor| self.is_available(*vendor))
            .collect()
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for vendor in Vendor::ALL {
            if let Some(key) = self.keys.get(&vendor) {
                map.entry(&vendor.as_str(), &obscure_credential(key));
            }
        }
        map.finish()
    }
}

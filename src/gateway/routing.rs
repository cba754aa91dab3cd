//! Routing table: catalog entries intersected with credential presence.
//!
//! A model is routable iff the catalog lists it and its vendor has a
//! credential. The table is derived on demand from two immutable inputs, so
//! it always reflects the credential state the process started with.

use std::sync::Arc;

use crate::error::GatewayError;
use crate::llm::catalog::ModelCatalog;
use crate::llm::credentials::CredentialSet;
use crate::types::{ModelDescriptor, Vendor};

#[derive(Debug, Clone)]
pub struct RoutingTable {
    catalog: Arc<ModelCatalog>,
    credentials: Arc<CredentialSet>,
}

impl RoutingTable {
    pub fn new(catalog: Arc<ModelCatalog>, credentials: Arc<CredentialSet>) -> Self {
        Self {
            catalog,
            credentials,
        }
    }

    /// Find the vendor serving `model_id`
    ///
    /// Unknown ids are `NotFound`; known ids whose vendor lacks a credential
    /// are `Unavailable`.
    pub fn route(&self, model_id: &str) -> Result<&ModelDescriptor, GatewayError> {
        let descriptor = self.catalog.resolve(model_id)?;
        if !self.credentials.is_available(descriptor.vendor) {
            return Err(GatewayError::unavailable(model_id, descriptor.vendor));
        }
        Ok(descriptor)
    }

    pub fn is_routable(&self, model_id: &str) -> bool {
        self.route(model_id).is_ok()
    }

    /// Every routable model, vendors in catalog order
    pub fn routable_models(&self) -> Vec<ModelDescriptor> {
        self.catalog.list_models(&self.credentials)
    }

    pub fn available_vendors(&self) -> Vec<Vendor> {
        self.credentials.available_vendors()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }
}

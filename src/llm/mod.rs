//! Multi-vendor LLM integration behind one adapter contract.
//!
//! # Architecture
//!
//! ```text
//! Gateway → ModelCatalog → CredentialSet → translate → ProviderRegistry → ProviderAdapter
//!   ↓            ↓               ↓             ↓                               ↓
//! request    model id →      vendor has    canonical →                 vendor HTTP API
//!            vendor          a key?        vendor shape                (reqwest)
//! ```
//!
//! - [`catalog`] - which model ids exist and which vendor owns each one
//! - [`credentials`] - which vendors are usable in this process
//! - [`translate`] - pure conversion between canonical messages and vendor shapes
//! - [`traits`] - the [`ProviderAdapter`] contract and adapter errors
//! - [`providers`] - OpenAI, Anthropic, Gemini and Groq adapters
//! - [`registry`] - one shared adapter per configured vendor

pub mod catalog;
pub mod credentials;
pub mod providers;
pub mod registry;
pub mod traits;
pub mod translate;

pub use catalog::ModelCatalog;
pub use credentials::CredentialSet;
pub use registry::ProviderRegistry;
pub use traits::{ChatConfig, LlmError, ProviderAdapter};
pub use translate::{
    from_vendor_format, to_vendor_format, SystemPolicy, VendorRequest, VendorResponse,
};

//! Route one canonical chat conversation to OpenAI, Anthropic, Gemini or Groq.
//!
//! Switchboard accepts an ordered list of `system` / `user` / `assistant`
//! messages and a model id, finds the vendor that serves the model, translates
//! the conversation into that vendor's wire shape, makes the call, and hands
//! back a single assistant message. Callers never see vendor-specific types.
//!
//! # Quick Start
//!
//! ```no_run
//! use switchboard::{Gateway, GatewayConfig, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads OPENAI_API_KEY, ANTHROPIC_API_KEY, GOOGLE_API_KEY, GROQ_API_KEY, ...
//!     let config = GatewayConfig::from_env()?;
//!     let gateway = Gateway::from_config(&config)?;
//!
//!     for model in gateway.list_models() {
//!         println!("{} ({})", model.name, model.provider);
//!     }
//!
//!     let reply = gateway
//!         .chat(
//!             vec![
//!                 Message::system("Answer in one word."),
//!                 Message::user("What is the capital of France?"),
//!             ],
//!             "claude-3-5-haiku-20241022",
//!             0.7,
//!         )
//!         .await?;
//!     println!("{}", reply.content);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every failed request ends in one [`GatewayError`]:
//!
//! - `InvalidInput` - malformed messages or parameters
//! - `NotFound` - no vendor lists the model id
//! - `Unavailable` - the model exists but its vendor has no API key
//! - `UpstreamFailure` - the vendor call failed
//!
//! # Module Organization
//!
//! - [`gateway`] - request orchestration and routing
//! - [`llm`] - model catalog, credentials, translation and vendor adapters
//! - [`config`] - file and environment configuration
//! - [`types`] - canonical messages, vendors and model descriptors
//! - [`error`] - caller-facing error taxonomy
//! - [`utils`] - logging setup and credential-safe log helpers

pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod types;
pub mod utils;

pub use config::{ConfigError, GatewayConfig};
pub use error::{ErrorBody, ErrorKind, GatewayError};
pub use gateway::{ChatRequest, Gateway, GatewayBuilder};
pub use types::*;

pub type Result<T> = std::result::Result<T, GatewayError>;

//! Core type definitions for the gateway.
//!
//! This module contains the canonical message shape shared by every vendor and
//! the model metadata the catalog advertises.

pub mod messages;
pub mod models;

// Re-export commonly used types
pub use messages::*;
pub use models::*;

//! Vendor and model metadata.

use serde::{Deserialize, Serialize};

/// Upstream chat-completion vendors the gateway can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// OpenAI chat completions API
    OpenAI,
    /// Anthropic messages API
    Anthropic,
    /// Google Gemini generateContent API
    Google,
    /// Groq's OpenAI-compatible chat completions API
    Groq,
}

impl Vendor {
    /// All vendors, in the order the catalog lists them
    pub const ALL: [Vendor; 4] = [Vendor::OpenAI, Vendor::Anthropic, Vendor::Google, Vendor::Groq];

    /// Get string representation of the vendor
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::OpenAI => "openai",
            Vendor::Anthropic => "anthropic",
            Vendor::Google => "google",
            Vendor::Groq => "groq",
        }
    }

    /// Human-readable vendor label used in model descriptors
    pub fn label(&self) -> &'static str {
        match self {
            Vendor::OpenAI => "OpenAI",
            Vendor::Anthropic => "Anthropic",
            Vendor::Google => "Google",
            Vendor::Groq => "Groq",
        }
    }

    /// Prefix of the environment variables configuring this vendor
    /// (`<PREFIX>_API_KEY`, `<PREFIX>_BASE_URL`, `<PREFIX>_MODELS`)
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Vendor::OpenAI => "OPENAI",
            Vendor::Anthropic => "ANTHROPIC",
            Vendor::Google => "GOOGLE",
            Vendor::Groq => "GROQ",
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vendor::ALL
            .into_iter()
            .find(|vendor| vendor.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown vendor: {}", s))
    }
}

/// A routable model and its display metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model identifier sent to the vendor; unique across the catalog
    pub id: String,
    /// Display name
    pub name: String,
    /// Display label of the provider (e.g. "OpenAI")
    pub provider: String,
    /// Vendor whose API serves this model
    pub vendor: Vendor,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, vendor: Vendor) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider: vendor.label().to_string(),
            vendor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_round_trips_through_str() {
        for vendor in Vendor::ALL {
            assert_eq!(vendor.as_str().parse::<Vendor>().unwrap(), vendor);
        }
        assert_eq!("Groq".parse::<Vendor>().unwrap(), Vendor::Groq);
        assert!("bedrock".parse::<Vendor>().is_err());
    }

    #[test]
    fn test_descriptor_uses_vendor_label() {
        let model = ModelDescriptor::new("gpt-4o", "GPT-4o", Vendor::OpenAI);
        assert_eq!(model.provider, "OpenAI");
        assert_eq!(model.vendor, Vendor::OpenAI);
    }
}

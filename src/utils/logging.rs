//! Logging utilities with credential protection
//!
//! This module provides utilities to safely log information while protecting
//! sensitive credentials from accidental exposure in logs, plus the subscriber
//! setup used by the `switchboard` binary.

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Obscures a credential string by showing only the first few characters
///
/// This function helps prevent accidental credential exposure in logs by
/// showing only the first 5 characters followed by asterisks.
///
/// # Examples
///
/// ```rust
/// use switchboard::utils::logging::obscure_credential;
///
/// let credential = "sk-proj-7bQmZl0a9XcV";
/// let obscured = obscure_credential(credential);
/// assert_eq!(obscured, "sk-pr***");
/// ```
pub fn obscure_credential(credential: &str) -> String {
    let char_count = credential.chars().count();
    if char_count <= 5 {
        "*".repeat(char_count)
    } else {
        format!("{}***", truncate_string(credential, 5))
    }
}

/// Safely truncates a string to a maximum number of characters
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `switchboard=debug`
    pub level: String,
    /// Emit one JSON object per event instead of human-readable lines
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Read `SWITCHBOARD_LOG_LEVEL` and `SWITCHBOARD_JSON_LOGS`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("SWITCHBOARD_LOG_LEVEL") {
            if !level.trim().is_empty() {
                config.level = level;
            }
        }
        if let Ok(json) = std::env::var("SWITCHBOARD_JSON_LOGS") {
            config.json_format = json.parse().unwrap_or(false);
        }

        config
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(format!("{},hyper=warn,h2=warn,reqwest=warn", self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber, writing to stderr
///
/// Stdout stays free for command output. Fails if a subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let subscriber = tracing_subscriber::registry();

    if config.json_format {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(config.filter());
        subscriber.with(layer).try_init()
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE)
            .with_target(true)
            .with_filter(config.filter());
        subscriber.with(layer).try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obscure_credential() {
        assert_eq!(obscure_credential("sk-ant-api03-abcdef"), "sk-an***");
        assert_eq!(obscure_credential("short"), "*****");
        assert_eq!(obscure_credential(""), "");
        assert_eq!(obscure_credential("a"), "*");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello World", 5), "Hello");
        assert_eq!(truncate_string("Short", 100), "Short");
        assert_eq!(truncate_string("", 10), "");
        assert_eq!(truncate_string("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_obscure_credential_multibyte() {
        assert_eq!(obscure_credential("🔑🔑🔑🔑🔑🔑"), "🔑🔑🔑🔑🔑***");
        assert_eq!(obscure_credential("😀😃😄"), "***");
    }

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
    }
}

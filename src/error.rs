//! Error handling for seo-forge

use thiserror::Error;

/// Main error type for seo-forge
#[derive(Error, Debug, Clone)]
pub enum SeoForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Probe unavailable for '{domain}': {message}")]
    ProbeUnavailable {
        domain: String,
        message: String,
        method: Option<String>,
    },

    #[error("Trend provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SeoForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a probe error (DNS / WHOIS)
    pub fn probe_unavailable(
        domain: impl Into<String>,
        message: impl Into<String>,
        method: Option<String>,
    ) -> Self {
        Self::ProbeUnavailable {
            domain: domain.into(),
            message: message.into(),
            method,
        }
    }

    /// Create a trend provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the failure came from an external probe and only affects one candidate
    pub fn is_probe_failure(&self) -> bool {
        matches!(
            self,
            Self::ProbeUnavailable { .. } | Self::Network { .. } | Self::Timeout { .. }
        )
    }

    /// Check if this error indicates a domain might be available
    pub fn suggests_available(&self) -> bool {
        match self {
            Self::ProbeUnavailable { message, .. } => {
                let msg = message.to_lowercase();
                msg.contains("not found")
                    || msg.contains("no match")
                    || msg.contains("available")
                    || msg.contains("nxdomain")
            }
            Self::Network { status_code, .. } => matches!(status_code, Some(404)),
            _ => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or data table file", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input", message)
            }
            Self::ProbeUnavailable { domain, message, .. } => {
                format!("⚠️  Could not probe domain '{}': {}", domain, message)
            }
            Self::Provider { provider, message } => {
                format!("⚠️  Trend provider '{}' failed: {}", provider, message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Try increasing SEO_FORGE_PROBE_TIMEOUT_SECS", operation, timeout_secs)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 This might be a temporary issue, try again", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for SeoForgeError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", 30)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for SeoForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<toml::de::Error> for SeoForgeError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Invalid data table file: {}", err))
    }
}

impl From<std::io::Error> for SeoForgeError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<tokio::time::error::Elapsed> for SeoForgeError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::timeout("Operation", 10)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SeoForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::SeoForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SeoForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::SeoForgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::SeoForgeError::validation(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_failure_classification() {
        assert!(SeoForgeError::timeout("WHOIS read", 10).is_probe_failure());
        assert!(SeoForgeError::probe_unavailable("a.com", "refused", None).is_probe_failure());
        assert!(!SeoForgeError::validation("empty keyword").is_probe_failure());
    }

    #[test]
    fn test_suggests_available() {
        let err = SeoForgeError::probe_unavailable("a.com", "No match for A.COM", Some("whois".into()));
        assert!(err.suggests_available());
        assert!(!SeoForgeError::internal("boom").suggests_available());
    }

    #[test]
    fn test_macros() {
        let err = validation_error!("keyword '{}' is empty", "x");
        assert!(err.to_string().contains("keyword 'x' is empty"));
        let err = config_error!("missing default");
        assert!(matches!(err, SeoForgeError::Config { .. }));
    }
}

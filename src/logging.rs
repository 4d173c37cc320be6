//! Logging configuration for datavow.
//!
//! The engine logs through `tracing`: suite saves/loads at info, replay
//! progress at info/warn, per-expectation evaluation at debug. Library users
//! with their own subscriber need nothing from here; binaries and tests can
//! use [`LogConfig`] to install one.

use tracing_subscriber::EnvFilter;

/// Subscriber configuration presets.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Emit JSON-structured lines instead of human-oriented ones.
    pub json_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_filter: "datavow=info".to_string(),
            json_output: false,
        }
    }
}

impl LogConfig {
    /// Per-expectation evaluation detail, for debugging checks.
    pub fn verbose() -> Self {
        Self {
            default_filter: "datavow=debug".to_string(),
            json_output: false,
        }
    }

    /// Warnings only, structured, for production pipelines.
    pub fn production() -> Self {
        Self {
            default_filter: "datavow=warn".to_string(),
            json_output: true,
        }
    }

    /// Installs a global subscriber for this configuration.
    ///
    /// `RUST_LOG` overrides the default filter. Fails if a global subscriber
    /// is already set.
    pub fn try_init(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_filter));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        if self.json_output {
            builder.json().try_init()
        } else {
            builder.try_init()
        }
    }

    /// Installs a global subscriber, ignoring an already-installed one.
    pub fn init(&self) {
        let _ = self.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(LogConfig::default().default_filter, "datavow=info");
        assert!(!LogConfig::default().json_output);
        assert_eq!(LogConfig::verbose().default_filter, "datavow=debug");
        assert!(LogConfig::production().json_output);
    }

    #[test]
    fn test_init_is_idempotent() {
        LogConfig::default().init();
        // A second installation attempt must not panic.
        LogConfig::verbose().init();
    }
}

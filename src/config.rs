//! # Runtime Configuration
//!
//! Environment-variable configuration for how specs are loaded.
//!
//! ## Environment Variables
//!
//! ### `SPECDELTA_FETCH_TIMEOUT`
//!
//! Timeout in seconds for fetching a spec from an `http(s)://` URL.
//! Default: `30`.
//!
//! ### `SPECDELTA_MAX_REDIRECTS`
//!
//! Maximum number of redirects followed when fetching a spec.
//! Default: `10`.
//!
//! ## Usage
//!
//! ```rust
//! use specdelta::config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Fetch timeout: {:?}", config.fetch_timeout);
//! ```
//!
//! Logging has its own variables, see [`crate::logging::LogConfig`].

use std::env;
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Loader configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Whole-request timeout for URL sources
    pub fetch_timeout: Duration,
    /// Redirect hops followed for URL sources
    pub max_redirects: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fetch_timeout = lookup("SPECDELTA_FETCH_TIMEOUT")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        let max_redirects = lookup("SPECDELTA_MAX_REDIRECTS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_REDIRECTS);

        RuntimeConfig {
            fetch_timeout: Duration::from_secs(fetch_timeout),
            max_redirects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]), RuntimeConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SPECDELTA_FETCH_TIMEOUT", "5"),
            ("SPECDELTA_MAX_REDIRECTS", "0"),
        ]);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.max_redirects, 0);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("SPECDELTA_FETCH_TIMEOUT", "soon"),
            ("SPECDELTA_MAX_REDIRECTS", "-1"),
        ]);
        assert_eq!(config, RuntimeConfig::default());

        let zero = config_from(&[("SPECDELTA_FETCH_TIMEOUT", "0")]);
        assert_eq!(zero.fetch_timeout, Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));
    }
}

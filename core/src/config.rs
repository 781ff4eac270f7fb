//! Startup configuration.
//!
//! Values are read once by the composition root and passed down explicitly;
//! nothing below `main` consults the environment.

pub const DEFAULT_API_URL: &str = "http://localhost:4000/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Base URL of the real backend, e.g. `http://localhost:4000/api/v1`.
    pub api_base_url: String,
    /// Serve requests from the in-memory mock instead of the network.
    pub use_mock: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            use_mock: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("expected `true` or `false`, got `{0}`")]
    InvalidFlag(String),
}

/// Parse a boolean-like flag. Only `true` and `false` are accepted,
/// ignoring case and surrounding whitespace.
pub fn parse_flag(raw: &str) -> Result<bool, ConfigError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidFlag(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_accepts_true_and_false() {
        assert_eq!(parse_flag("true"), Ok(true));
        assert_eq!(parse_flag(" FALSE "), Ok(false));
        assert_eq!(parse_flag("True"), Ok(true));
    }

    #[test]
    fn flag_rejects_other_values() {
        assert!(matches!(parse_flag("1"), Err(ConfigError::InvalidFlag(_))));
        assert!(parse_flag("").is_err());
        assert!(parse_flag("yes").is_err());
    }

    #[test]
    fn default_targets_local_backend() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert!(!config.use_mock);
    }
}

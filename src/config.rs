use crate::error::{ImperiumError, Result};
use log::{debug, warn};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used when nothing overrides it. Provider model names change, so
/// `IMPERIUM_MODEL` can replace it without a rebuild.
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const MODEL_VAR: &str = "IMPERIUM_MODEL";
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImperiumConfig {
    /// `None` yields a client that fails on first request rather than at startup.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for ImperiumConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: GROQ_BASE_URL.to_string(),
        }
    }
}

impl ImperiumConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = non_empty(API_KEY_VAR);
        if api_key.is_none() {
            warn!(
                "{} is not set; completion requests will fail until it is provided",
                API_KEY_VAR
            );
        }

        let mut config = Self {
            api_key,
            model: non_empty(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: GROQ_BASE_URL.to_string(),
        };

        if let Some(base_url) = non_empty(BASE_URL_VAR) {
            config = config.with_base_url(base_url)?;
        }

        debug!(
            "Resolved configuration: model={}, base_url={}",
            config.model, config.base_url
        );
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ImperiumError::InvalidConfig(format!(
                "{} must be an http(s) URL, got '{}'",
                BASE_URL_VAR, base_url
            )));
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = ImperiumConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ImperiumConfig::default());
        assert_eq!(config.model, "mixtral-8x7b-32768");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = ImperiumConfig::from_lookup(lookup(&[("GROQ_API_KEY", "   ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = ImperiumConfig::from_lookup(lookup(&[
            ("GROQ_API_KEY", " gsk_test "),
            ("IMPERIUM_MODEL", "llama-3.3-70b-versatile"),
            ("GROQ_BASE_URL", "http://localhost:8080/v1/"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = ImperiumConfig::from_lookup(lookup(&[("GROQ_BASE_URL", "ftp://x")])).unwrap_err();
        assert!(matches!(err, ImperiumError::InvalidConfig(_)));
    }
}

//! Backend connection settings.

use std::time::Duration;

use thiserror::Error;

pub const ENV_URL: &str = "POTHOLE_SUPABASE_URL";
pub const ENV_ANON_KEY: &str = "POTHOLE_SUPABASE_ANON_KEY";
pub const ENV_BUCKET: &str = "POTHOLE_STORAGE_BUCKET";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project URL like `https://xyz.supabase.co` (no trailing slash).
    pub base_url: String,
    /// Public API key sent as `apikey` on every request.
    pub anon_key: String,
    /// Object storage bucket for report images.
    pub storage_bucket: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        storage_bucket: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            storage_bucket: storage_bucket.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `POTHOLE_SUPABASE_URL`, `POTHOLE_SUPABASE_ANON_KEY`, and
    /// `POTHOLE_STORAGE_BUCKET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &'static str| -> Result<String, ConfigError> {
            let value = lookup(key).ok_or(ConfigError::Missing(key))?;
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(key));
            }
            Ok(value)
        };
        let config = Self::new(get(ENV_URL)?, get(ENV_ANON_KEY)?, get(ENV_BUCKET)?);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Empty(ENV_URL));
        }
        if self.anon_key.is_empty() {
            return Err(ConfigError::Empty(ENV_ANON_KEY));
        }
        if self.storage_bucket.is_empty() {
            return Err(ConfigError::Empty(ENV_BUCKET));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn trims_trailing_slash() {
        let config = BackendConfig::new("https://demo.supabase.co/", "anon", "report-images");
        assert_eq!(config.base_url, "https://demo.supabase.co");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn reads_all_three_variables() {
        let config = BackendConfig::from_lookup(lookup(&[
            (ENV_URL, "https://demo.supabase.co"),
            (ENV_ANON_KEY, "anon"),
            (ENV_BUCKET, "report-images"),
        ]))
        .unwrap();
        assert_eq!(config.storage_bucket, "report-images");
    }

    #[test]
    fn missing_bucket_is_reported() {
        let err = BackendConfig::from_lookup(lookup(&[
            (ENV_URL, "https://demo.supabase.co"),
            (ENV_ANON_KEY, "anon"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_BUCKET));
    }

    #[test]
    fn blank_key_is_reported() {
        let err = BackendConfig::from_lookup(lookup(&[
            (ENV_URL, "https://demo.supabase.co"),
            (ENV_ANON_KEY, "  "),
            (ENV_BUCKET, "b"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Empty(ENV_ANON_KEY));
    }
}

//! Runtime configuration for the planner binaries
//!
//! Every field has a default, so a config file only needs the settings it
//! changes. `PLANNER_SUGGESTION_ENDPOINT` overrides the endpoint from the file.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{PlannerError, Result};
use crate::projection::ProjectionConfig;

pub const ENDPOINT_ENV_VAR: &str = "PLANNER_SUGGESTION_ENDPOINT";

/// Where and how to reach the suggestion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout, including the streamed body
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String { "http://localhost:5000/product/get_ai_suggestion".to_string() }
fn default_timeout_secs() -> u64 { 120 }

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub projection: ProjectionConfig,

    #[serde(default)]
    pub suggestion: SuggestionConfig,
}

impl PlannerConfig {
    /// Load from a JSON file, then apply environment overrides
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut config: PlannerConfig = serde_json::from_reader(BufReader::new(file))?;
        debug!("Loaded config from {}", path.display());
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = PlannerConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Use `path` when given, otherwise defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::from_env(),
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.override_endpoint(std::env::var(ENDPOINT_ENV_VAR).ok().as_deref());
    }

    /// Replace the endpoint unless `endpoint` is missing or blank
    pub fn override_endpoint(&mut self, endpoint: Option<&str>) {
        if let Some(endpoint) = endpoint.map(str::trim).filter(|e| !e.is_empty()) {
            debug!("Suggestion endpoint overridden to {}", endpoint);
            self.suggestion.endpoint = endpoint.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.projection.validate()?;

        let endpoint = &self.suggestion.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(PlannerError::config(format!(
                "suggestion endpoint must be an http(s) URL, got {:?}",
                endpoint
            )));
        }
        if self.suggestion.timeout_secs == 0 {
            return Err(PlannerError::config("suggestion timeout must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests that read or write ENDPOINT_ENV_VAR hold this lock
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_partial_file_keeps_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"projection": {{"reserve_months": 6}}, "suggestion": {{"timeout_secs": 30}}}}"#
        )
        .unwrap();

        let config = PlannerConfig::from_path(file.path()).unwrap();
        assert_eq!(config.projection.reserve_months, 6.0);
        assert_eq!(config.projection.volume_points, 11);
        assert_eq!(config.suggestion.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_endpoint() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let previous = std::env::var(ENDPOINT_ENV_VAR).ok();

        std::env::set_var(ENDPOINT_ENV_VAR, "  https://planner.example.com/suggest  ");
        let overridden = PlannerConfig::from_env();

        std::env::set_var(ENDPOINT_ENV_VAR, "   ");
        let blank = PlannerConfig::from_env();

        match previous {
            Some(value) => std::env::set_var(ENDPOINT_ENV_VAR, value),
            None => std::env::remove_var(ENDPOINT_ENV_VAR),
        }

        assert_eq!(overridden.unwrap().suggestion.endpoint, "https://planner.example.com/suggest");
        assert_eq!(blank.unwrap().suggestion.endpoint, default_endpoint());
    }

    #[test]
    fn test_override_endpoint_ignores_blank_values() {
        let mut config = PlannerConfig::default();

        config.override_endpoint(None);
        config.override_endpoint(Some(""));
        config.override_endpoint(Some(" \t "));
        assert_eq!(config.suggestion.endpoint, default_endpoint());

        config.override_endpoint(Some("http://10.0.0.5:5000/product/get_ai_suggestion\n"));
        assert_eq!(config.suggestion.endpoint, "http://10.0.0.5:5000/product/get_ai_suggestion");
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let mut config = PlannerConfig::default();
        config.suggestion.endpoint = "localhost:5000".to_string();
        assert!(matches!(config.validate(), Err(PlannerError::Config { .. })));
    }

    #[test]
    fn test_rejects_bad_projection_settings() {
        let mut config = PlannerConfig::default();
        config.projection.amortization_months = 0.0;
        assert!(config.validate().is_err());
    }
}

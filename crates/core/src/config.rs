//! Configuration management for the dawaa engine.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (dawaa.yaml)
//!
//! Endpoints point at the outbound collaborators (price service, concept
//! vocabulary, regulatory labels, label repository, translation lookup) so
//! tests and deployments can redirect any of them independently.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// engine behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Outbound service endpoints
    pub endpoints: Endpoints,

    /// Per-call timeout for remote collaborators, in seconds
    pub request_timeout_secs: u64,

    /// Name-resolution and validity thresholds
    pub thresholds: Thresholds,

    /// Optional path to the locally ingested label dataset (JSON Lines),
    /// produced by the offline ETL. Absent means the provider is skipped.
    pub label_store_path: Option<PathBuf>,

    /// Session id assigned to callers that do not supply one.
    /// All such anonymous callers share a single session.
    pub default_user_id: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Base URLs for the outbound collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    /// Price lookup service (search + per-product details)
    pub price_api: String,

    /// Concept vocabulary service (name -> concept id -> properties,
    /// plus approximate-term spelling correction)
    pub concept_api: String,

    /// Regulatory label search by generic name
    pub label_api: String,

    /// Label repository (name -> document id -> document)
    pub repository_api: String,

    /// Knowledge-base foreign-label translation lookup
    pub translation_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            price_api: "https://moelshafey.xyz/API/MD".to_string(),
            concept_api: "https://rxnav.nlm.nih.gov/REST".to_string(),
            label_api: "https://api.fda.gov/drug/label.json".to_string(),
            repository_api: "https://dailymed.nlm.nih.gov/dailymed/services/v2".to_string(),
            translation_api: "https://query.wikidata.org/sparql".to_string(),
        }
    }
}

/// Empirical confidence thresholds.
///
/// The values were tuned against real traffic in the source system and have
/// no documented derivation; they are configuration, not constants to be
/// re-derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// Fuzzy score at which a name match is accepted silently (0-100)
    pub name_accept: u32,

    /// Fuzzy score at or above which a match is proposed for confirmation
    pub name_confirm: u32,

    /// Minimum character count for provider text to be considered meaningful
    pub validity_min_chars: usize,

    /// Maximum fraction of generic stop-word tokens before text is rejected
    pub validity_generic_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            name_accept: 100,
            name_confirm: 75,
            validity_min_chars: 50,
            validity_generic_ratio: 0.70,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    endpoints: Option<EndpointsFile>,
    request_timeout_secs: Option<u64>,
    thresholds: Option<ThresholdsFile>,
    label_store_path: Option<PathBuf>,
    default_user_id: Option<String>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct EndpointsFile {
    price_api: Option<String>,
    concept_api: Option<String>,
    label_api: Option<String>,
    repository_api: Option<String>,
    translation_api: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ThresholdsFile {
    name_accept: Option<u32>,
    name_confirm: Option<u32>,
    validity_min_chars: Option<usize>,
    validity_generic_ratio: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            endpoints: Endpoints::default(),
            request_timeout_secs: 10,
            thresholds: Thresholds::default(),
            label_store_path: None,
            default_user_id: "default".to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `DAWAA_CONFIG`: Path to config file (default: ./dawaa.yaml)
    /// - `DAWAA_PRICE_API`, `DAWAA_CONCEPT_API`, `DAWAA_LABEL_API`,
    ///   `DAWAA_REPOSITORY_API`, `DAWAA_TRANSLATION_API`: endpoint overrides
    /// - `DAWAA_LABEL_STORE`: path to the ingested label dataset
    /// - `DAWAA_DEFAULT_USER`: anonymous session id
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("DAWAA_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            PathBuf::from("dawaa.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(url) = std::env::var("DAWAA_PRICE_API") {
            config.endpoints.price_api = url;
        }
        if let Ok(url) = std::env::var("DAWAA_CONCEPT_API") {
            config.endpoints.concept_api = url;
        }
        if let Ok(url) = std::env::var("DAWAA_LABEL_API") {
            config.endpoints.label_api = url;
        }
        if let Ok(url) = std::env::var("DAWAA_REPOSITORY_API") {
            config.endpoints.repository_api = url;
        }
        if let Ok(url) = std::env::var("DAWAA_TRANSLATION_API") {
            config.endpoints.translation_api = url;
        }
        if let Ok(path) = std::env::var("DAWAA_LABEL_STORE") {
            config.label_store_path = Some(PathBuf::from(path));
        }
        if let Ok(user) = std::env::var("DAWAA_DEFAULT_USER") {
            config.default_user_id = user;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(eps) = config_file.endpoints {
            if let Some(url) = eps.price_api {
                result.endpoints.price_api = url;
            }
            if let Some(url) = eps.concept_api {
                result.endpoints.concept_api = url;
            }
            if let Some(url) = eps.label_api {
                result.endpoints.label_api = url;
            }
            if let Some(url) = eps.repository_api {
                result.endpoints.repository_api = url;
            }
            if let Some(url) = eps.translation_api {
                result.endpoints.translation_api = url;
            }
        }

        if let Some(timeout) = config_file.request_timeout_secs {
            result.request_timeout_secs = timeout;
        }

        if let Some(th) = config_file.thresholds {
            if let Some(v) = th.name_accept {
                result.thresholds.name_accept = v;
            }
            if let Some(v) = th.name_confirm {
                result.thresholds.name_confirm = v;
            }
            if let Some(v) = th.validity_min_chars {
                result.thresholds.validity_min_chars = v;
            }
            if let Some(v) = th.validity_generic_ratio {
                result.thresholds.validity_generic_ratio = v;
            }
        }

        if let Some(path) = config_file.label_store_path {
            result.label_store_path = Some(path);
        }

        if let Some(user) = config_file.default_user_id {
            result.default_user_id = user;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration invariants.
    pub fn validate(&self) -> AppResult<()> {
        let th = &self.thresholds;

        if th.name_confirm > th.name_accept {
            return Err(AppError::Config(format!(
                "name_confirm ({}) must not exceed name_accept ({})",
                th.name_confirm, th.name_accept
            )));
        }

        if !(0.0..=1.0).contains(&th.validity_generic_ratio) {
            return Err(AppError::Config(format!(
                "validity_generic_ratio must be within [0, 1], got {}",
                th.validity_generic_ratio
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }

        if let Some(ref path) = self.label_store_path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Label store dataset not found: {:?}",
                    path
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.default_user_id, "default");
        assert_eq!(config.thresholds.name_accept, 100);
        assert_eq!(config.thresholds.name_confirm, 75);
        assert_eq!(config.thresholds.validity_min_chars, 50);
        assert!(!config.verbose);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(None, None, true, false);

        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_default() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_thresholds() {
        let mut config = AppConfig::default();
        config.thresholds.name_confirm = 100;
        config.thresholds.name_accept = 75;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_ratio() {
        let mut config = AppConfig::default();
        config.thresholds.validity_generic_ratio = 1.5;
        assert!(config.validate().is_err());
    }
}

//! Service configuration
//!
//! Settings come from an optional `fnol.toml` followed by `FNOL_*`
//! environment variables, with `__` separating nested sections:
//!
//! ```text
//! FNOL_INFERENCE__BACKEND=ollama
//! FNOL_INFERENCE__MODEL=phi3:mini
//! FNOL_TRIAGE__FAST_TRACK_THRESHOLD=25000
//! FNOL_TRIAGE__INVESTIGATION_KEYWORDS=fraud,staged,inconsistent
//! FNOL_SERVER__PORT=8080
//! FNOL_LOG_FORMAT=json
//! ```

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use core_kernel::{Currency, MoneyError};
use domain_claims::config::{DEFAULT_FAST_TRACK_THRESHOLD, DEFAULT_INVESTIGATION_KEYWORDS};
use domain_claims::normalize::{DEFAULT_FORM_LABELS, DEFAULT_PLACEHOLDERS};
use domain_claims::{FnolError, NormalizationRules, PipelineConfig};
use infra_llm::{HttpClientConfig, InferenceBackend, LlmError};

/// Default settings file, read when present
pub const DEFAULT_SETTINGS_FILE: &str = "fnol.toml";

/// Errors raised while assembling settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Invalid currency: {0}")]
    Currency(#[from] MoneyError),

    #[error("Invalid pipeline configuration: {0}")]
    Pipeline(#[from] FnolError),

    #[error("Cannot configure inference: {0}")]
    Inference(#[from] LlmError),
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Largest accepted document upload
    #[validate(range(min = 1024, max = 104_857_600))]
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct InferenceSettings {
    pub backend: InferenceBackend,
    #[validate(length(min = 1))]
    pub base_url: String,
    pub model: Option<String>,
    #[validate(range(min = 1, max = 3600))]
    pub timeout_secs: u64,
    #[validate(range(min = 64, max = 8192))]
    pub extraction_max_tokens: u32,
    #[validate(range(min = 1, max = 512))]
    pub signal_max_tokens: u32,
    #[validate(range(min = 512, max = 131_072))]
    pub context_size: u32,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            backend: InferenceBackend::LlamaCpp,
            base_url: "http://localhost:8080".to_string(),
            model: None,
            timeout_secs: 120,
            extraction_max_tokens: 800,
            signal_max_tokens: 16,
            context_size: 4096,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct TriageSettings {
    #[validate(custom(function = "positive_amount"))]
    pub fast_track_threshold: Decimal,
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(length(min = 1))]
    pub investigation_keywords: Vec<String>,
    pub placeholders: Vec<String>,
    /// Labels dropped on top of the built-in form labels
    pub extra_labels: Vec<String>,
    pub strict_label_heuristics: bool,
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            fast_track_threshold: DEFAULT_FAST_TRACK_THRESHOLD,
            currency: "USD".to_string(),
            investigation_keywords: DEFAULT_INVESTIGATION_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            placeholders: DEFAULT_PLACEHOLDERS.iter().map(|p| p.to_string()).collect(),
            extra_labels: Vec::new(),
            strict_label_heuristics: false,
        }
    }
}

fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_positive"))
    }
}

/// Complete service settings
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct FnolSettings {
    #[validate(nested)]
    pub server: ServerSettings,
    #[validate(nested)]
    pub inference: InferenceSettings,
    #[validate(nested)]
    pub triage: TriageSettings,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for FnolSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            inference: InferenceSettings::default(),
            triage: TriageSettings::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl FnolSettings {
    /// Loads settings from a file and the environment
    ///
    /// With `path = None` the default `fnol.toml` is read if it exists.
    /// An explicitly given file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (file, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_SETTINGS_FILE), false),
        };

        let settings: FnolSettings = config::Config::builder()
            .add_source(config::File::from(file).required(required))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from TOML text without consulting the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings: FnolSettings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("FNOL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("triage.investigation_keywords")
            .with_list_parse_key("triage.placeholders")
            .with_list_parse_key("triage.extra_labels")
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Builds the immutable pipeline configuration
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        let triage = &self.triage;
        let currency: Currency = triage.currency.parse()?;

        let normalization = NormalizationRules::new(&triage.placeholders, DEFAULT_FORM_LABELS)
            .with_extra_labels(&triage.extra_labels)
            .with_strict_label_heuristics(triage.strict_label_heuristics);

        let config = PipelineConfig::default()
            .with_normalization(normalization)
            .with_investigation_keywords(triage.investigation_keywords.iter().cloned())
            .with_fast_track_threshold(triage.fast_track_threshold)
            .with_currency(currency)
            .with_token_limits(
                self.inference.extraction_max_tokens,
                self.inference.signal_max_tokens,
                self.inference.context_size,
            );

        config.validate()?;
        Ok(config)
    }

    /// Connection settings for the HTTP inference backends
    pub fn http_client_config(&self) -> HttpClientConfig {
        let config = HttpClientConfig::new(self.inference.base_url.clone())
            .timeout(Duration::from_secs(self.inference.timeout_secs));
        match &self.inference.model {
            Some(model) => config.model(model.clone()),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        let settings = FnolSettings::default();
        assert!(settings.validate().is_ok());

        let config = settings.pipeline_config().unwrap();
        assert_eq!(config.fast_track_threshold, dec!(25000));
        assert_eq!(config.extraction_params.max_tokens, 800);
        assert_eq!(config.extraction_params.context_size, 4096);
        assert_eq!(config.signal_params.max_tokens, 16);
        assert_eq!(config.investigation_keywords, vec!["fraud", "staged", "inconsistent"]);
    }

    #[test]
    fn test_toml_overrides() {
        let settings = FnolSettings::from_toml_str(
            r#"
            log_format = "json"

            [inference]
            backend = "ollama"
            base_url = "http://localhost:11434/"
            model = "phi3:mini"
            timeout_secs = 30

            [triage]
            fast_track_threshold = 10000
            extra_labels = ["Serial / VIN"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.inference.backend, InferenceBackend::Ollama);
        assert_eq!(settings.triage.fast_track_threshold, dec!(10000));

        let client = settings.http_client_config();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model.as_deref(), Some("phi3:mini"));
        assert_eq!(client.timeout, Duration::from_secs(30));

        let config = settings.pipeline_config().unwrap();
        assert!(config.normalization.is_form_label("serial / vin"));
        assert!(config.normalization.is_form_label("Policy Number"));
    }

    #[test]
    fn test_out_of_range_token_limit_is_rejected() {
        let result = FnolSettings::from_toml_str(
            r#"
            [inference]
            signal_max_tokens = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_positive_threshold_is_rejected() {
        let result = FnolSettings::from_toml_str(
            r#"
            [triage]
            fast_track_threshold = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let mut settings = FnolSettings::default();
        settings.triage.currency = "XYZ".to_string();
        assert!(matches!(settings.pipeline_config(), Err(ConfigError::Currency(_))));
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(FnolSettings::default().server_addr(), "0.0.0.0:8080");
    }
}

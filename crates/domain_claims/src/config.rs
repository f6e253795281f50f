//! Pipeline configuration
//!
//! Everything the pipeline decides with: schema, thresholds, keyword sets,
//! denylists and generation parameters. Built once at start-up and shared
//! read-only through an `Arc`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::Currency;

use crate::error::FnolError;
use crate::normalize::NormalizationRules;
use crate::ports::InferenceParams;
use crate::prompt::DEFAULT_SYSTEM_INSTRUCTION;
use crate::schema::{well_known, ClaimSchema, FieldKey};

/// Keywords that mark a description for investigation
pub const DEFAULT_INVESTIGATION_KEYWORDS: &[&str] = &["fraud", "staged", "inconsistent"];

/// Default fast-track threshold in the configured currency unit
pub const DEFAULT_FAST_TRACK_THRESHOLD: Decimal = dec!(25000);

/// Stop sequence of the chat template
pub const CHAT_STOP: &str = "<|user|>";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub schema: ClaimSchema,
    pub normalization: NormalizationRules,
    pub investigation_keywords: Vec<String>,
    pub injury_keyword: String,
    pub fast_track_threshold: Decimal,
    pub currency: Currency,
    pub description_field: FieldKey,
    pub claim_type_field: FieldKey,
    pub damage_field: FieldKey,
    pub system_instruction: String,
    pub extraction_params: InferenceParams,
    pub signal_params: InferenceParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema: ClaimSchema::standard(),
            normalization: NormalizationRules::default(),
            investigation_keywords: DEFAULT_INVESTIGATION_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            injury_keyword: "injury".to_string(),
            fast_track_threshold: DEFAULT_FAST_TRACK_THRESHOLD,
            currency: Currency::USD,
            description_field: well_known::description(),
            claim_type_field: well_known::claim_type(),
            damage_field: well_known::estimated_damage(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            extraction_params: InferenceParams::deterministic(800, 4096).with_stop(CHAT_STOP),
            signal_params: InferenceParams::deterministic(16, 4096).with_stop(CHAT_STOP),
        }
    }
}

impl PipelineConfig {
    pub fn with_schema(mut self, schema: ClaimSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_normalization(mut self, rules: NormalizationRules) -> Self {
        self.normalization = rules;
        self
    }

    pub fn with_investigation_keywords<I>(mut self, keywords: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.investigation_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fast_track_threshold(mut self, threshold: Decimal) -> Self {
        self.fast_track_threshold = threshold;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Overrides generation limits, keeping temperature 0 and the stop sequence
    pub fn with_token_limits(mut self, extraction_max: u32, signal_max: u32, context_size: u32) -> Self {
        self.extraction_params.max_tokens = extraction_max;
        self.extraction_params.context_size = context_size;
        self.signal_params.max_tokens = signal_max;
        self.signal_params.context_size = context_size;
        self
    }

    /// Checks internal consistency
    ///
    /// # Errors
    ///
    /// `FnolError::InvalidConfiguration` when a field the agents read is not
    /// in the schema, the threshold is not positive, or no keyword is set.
    pub fn validate(&self) -> Result<(), FnolError> {
        for key in [&self.description_field, &self.claim_type_field, &self.damage_field] {
            if !self.schema.contains(key) {
                return Err(FnolError::InvalidConfiguration(format!(
                    "field {} is not part of the schema",
                    key.qualified()
                )));
            }
        }

        if self.fast_track_threshold <= Decimal::ZERO {
            return Err(FnolError::InvalidConfiguration(
                "fast-track threshold must be positive".to_string(),
            ));
        }

        if self.investigation_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(FnolError::InvalidConfiguration(
                "at least one investigation keyword is required".to_string(),
            ));
        }

        if self.extraction_params.temperature != 0.0 {
            return Err(FnolError::InvalidConfiguration(
                "extraction must run at temperature 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaCategory;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction_params.max_tokens, 800);
        assert_eq!(config.extraction_params.context_size, 4096);
        assert_eq!(config.extraction_params.stop, vec![CHAT_STOP.to_string()]);
        assert_eq!(config.fast_track_threshold, dec!(25000));
    }

    #[test]
    fn test_schema_without_agent_fields_is_rejected() {
        let config = PipelineConfig::default().with_schema(ClaimSchema::new(vec![
            SchemaCategory::new("Policy Information", &["Policy Number"]),
        ]));
        assert!(matches!(
            config.validate(),
            Err(FnolError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_non_positive_threshold_is_rejected() {
        let config = PipelineConfig::default().with_fast_track_threshold(dec!(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_keywords_are_rejected() {
        let config = PipelineConfig::default().with_investigation_keywords(Vec::<String>::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_limits() {
        let config = PipelineConfig::default().with_token_limits(1024, 8, 8192);
        assert_eq!(config.extraction_params.max_tokens, 1024);
        assert_eq!(config.signal_params.max_tokens, 8);
        assert_eq!(config.signal_params.context_size, 8192);
        assert_eq!(config.signal_params.temperature, 0.0);
    }
}

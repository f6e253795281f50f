use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::Money;

use super::{ask_model, combine, Signal, SignalAgent};
use crate::config::PipelineConfig;
use crate::error::FnolError;
use crate::fields::{ExtractedFields, FieldValue};
use crate::ports::InferenceService;
use crate::prompt::fast_track_prompt;

/// Parses the estimated damage field into money
///
/// JSON numbers are taken as-is in the configured currency. Text goes
/// through lenient parsing, which rejects ranges, multiple figures, scaled
/// figures and foreign currencies.
///
/// # Errors
///
/// `FnolError::ValidationFailure` when the field is absent, unreadable, or
/// not a positive amount.
pub fn parse_estimated_damage(fields: &ExtractedFields, config: &PipelineConfig) -> Result<Money, FnolError> {
    let field = config.damage_field.qualified();
    let damage = read_damage(fields, config, &field)?;
    if damage.is_zero() || damage.amount().is_sign_negative() {
        return Err(FnolError::validation(field, format!("{} is not a positive amount", damage)));
    }
    Ok(damage)
}

fn read_damage(fields: &ExtractedFields, config: &PipelineConfig, field: &str) -> Result<Money, FnolError> {
    match fields.get(&config.damage_field) {
        None => Err(FnolError::validation(field, "value is absent")),
        Some(value) if value.is_blank() => Err(FnolError::validation(field, "value is absent")),
        Some(FieldValue::Number(number)) => {
            let text = number.to_string();
            let amount = Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|e| FnolError::validation(field, format!("{}: {}", text, e)))?;
            Ok(Money::new(amount, config.currency))
        }
        Some(FieldValue::Text(text)) => {
            Money::parse_lenient(text, config.currency).map_err(|e| FnolError::from_money(field, e))
        }
    }
}

/// Checks whether estimated damage is below the fast-track threshold
pub struct FastTrackAgent {
    config: Arc<PipelineConfig>,
    inference: Arc<dyn InferenceService>,
}

impl FastTrackAgent {
    pub fn new(config: Arc<PipelineConfig>, inference: Arc<dyn InferenceService>) -> Self {
        Self { config, inference }
    }

    fn fallback(&self, fields: &ExtractedFields) -> Signal {
        match parse_estimated_damage(fields, &self.config) {
            Ok(damage) => {
                let below = damage.is_below(self.config.fast_track_threshold);
                Signal::from_fallback(below, Some(format!("estimated damage {}", damage)))
            }
            Err(e) => {
                warn!(agent = self.name(), error = %e, "Estimated damage did not parse, not fast-tracking");
                Signal::from_fallback(false, Some(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl SignalAgent for FastTrackAgent {
    fn name(&self) -> &'static str {
        "fast_track"
    }

    async fn evaluate(&self, _claim_text: &str, fields: &ExtractedFields) -> Signal {
        let Some(damage) = fields.text(&self.config.damage_field) else {
            info!(agent = self.name(), "No estimated damage, fast-track not indicated");
            return Signal::from_fallback(false, None);
        };

        let threshold = format!("{} {}", self.config.fast_track_threshold, self.config.currency);
        let answer = ask_model(
            self.name(),
            self.inference.as_ref(),
            &self.config.system_instruction,
            &fast_track_prompt(&damage, &threshold),
            &self.config.signal_params,
            &[],
        )
        .await;

        combine(self.name(), answer, || self.fallback(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::ScriptedInference;
    use crate::prompt::PromptKind;
    use crate::schema::well_known;
    use crate::signals::SignalSource;
    use rust_decimal_macros::dec;

    fn fields(damage: Option<FieldValue>) -> ExtractedFields {
        let config = PipelineConfig::default();
        let mut fields = ExtractedFields::absent(&config.schema);
        fields.set(&well_known::estimated_damage(), damage);
        fields
    }

    fn fallback_agent() -> FastTrackAgent {
        FastTrackAgent::new(Arc::new(PipelineConfig::default()), Arc::new(ScriptedInference::new()))
    }

    #[test]
    fn test_parse_number_and_text() {
        let config = PipelineConfig::default();
        let from_number = parse_estimated_damage(&fields(Some(FieldValue::from(5000i64))), &config).unwrap();
        assert_eq!(from_number.amount(), dec!(5000));

        let from_text = parse_estimated_damage(&fields(Some("$10,000".into())), &config).unwrap();
        assert_eq!(from_text.amount(), dec!(10000));
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        let config = PipelineConfig::default();
        for value in [FieldValue::from(-500i64), FieldValue::from(0i64), "$0.00".into(), "-$500".into()] {
            let result = parse_estimated_damage(&fields(Some(value.clone())), &config);
            assert!(matches!(result, Err(FnolError::ValidationFailure { .. })), "{:?}", value);
        }
    }

    #[tokio::test]
    async fn test_negative_damage_is_not_fast_tracked() {
        let signal = fallback_agent()
            .evaluate("", &fields(Some(FieldValue::from(-500i64))))
            .await;
        assert!(!signal.verdict());
        assert_eq!(signal.source(), SignalSource::Fallback);
    }

    #[tokio::test]
    async fn test_scaled_damage_is_not_fast_tracked() {
        for text in ["$30k", "$1.2 million", "USD 40 thousand"] {
            let signal = fallback_agent().evaluate("", &fields(Some(text.into()))).await;
            assert!(!signal.verdict(), "{}", text);
        }
    }

    #[test]
    fn test_parse_scientific_number() {
        let config = PipelineConfig::default();
        let number: serde_json::Number = serde_json::from_str("2.5e4").unwrap();
        let damage = parse_estimated_damage(&fields(Some(FieldValue::Number(number))), &config).unwrap();
        assert_eq!(damage.amount(), dec!(25000));
    }

    #[test]
    fn test_parse_rejects_range_and_foreign_currency() {
        let config = PipelineConfig::default();
        for text in ["$20,000-$25,000", "€12,000", "pending assessment"] {
            let result = parse_estimated_damage(&fields(Some(text.into())), &config);
            assert!(matches!(result, Err(FnolError::ValidationFailure { .. })), "{}", text);
        }
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        let agent = fallback_agent();
        let at = agent.evaluate("", &fields(Some("25000".into()))).await;
        let under = agent.evaluate("", &fields(Some("24,999.99".into()))).await;
        assert!(!at.verdict());
        assert!(under.verdict());
        assert_eq!(under.source(), SignalSource::Fallback);
    }

    #[tokio::test]
    async fn test_range_is_not_fast_tracked() {
        let signal = fallback_agent()
            .evaluate("", &fields(Some("$5,000 - $8,000".into())))
            .await;
        assert!(!signal.verdict());
    }

    #[tokio::test]
    async fn test_model_yes_is_kept() {
        let agent = FastTrackAgent::new(
            Arc::new(PipelineConfig::default()),
            Arc::new(ScriptedInference::new().respond(PromptKind::FastTrack, "YES")),
        );
        let signal = agent.evaluate("", &fields(Some("$30,000".into()))).await;
        assert!(signal.verdict());
        assert_eq!(signal.source(), SignalSource::Model);
    }

    #[tokio::test]
    async fn test_parsed_damage_overrides_model_no() {
        let agent = FastTrackAgent::new(
            Arc::new(PipelineConfig::default()),
            Arc::new(ScriptedInference::new().respond(PromptKind::FastTrack, "No")),
        );
        let below = agent.evaluate("", &fields(Some("$4,000".into()))).await;
        assert!(below.verdict());
        assert_eq!(below.source(), SignalSource::Fallback);

        let above = agent.evaluate("", &fields(Some("$40,000".into()))).await;
        assert!(!above.verdict());
        assert_eq!(above.source(), SignalSource::Model);
    }

    #[tokio::test]
    async fn test_absent_damage_skips_model() {
        let inference = ScriptedInference::new().respond(PromptKind::FastTrack, "YES");
        let agent = FastTrackAgent::new(Arc::new(PipelineConfig::default()), Arc::new(inference.clone()));
        let signal = agent.evaluate("", &fields(None)).await;
        assert!(!signal.verdict());
        assert_eq!(inference.call_count(PromptKind::FastTrack).await, 0);
    }
}

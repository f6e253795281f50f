use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{ask_model, combine, Signal, SignalAgent};
use crate::config::PipelineConfig;
use crate::fields::ExtractedFields;
use crate::ports::InferenceService;
use crate::prompt::injury_prompt;

const EXTRA_AFFIRMATIVES: &[&str] = &["injury", "injured"];

/// Decides whether a claim implies bodily injury
pub struct InjuryAgent {
    config: Arc<PipelineConfig>,
    inference: Arc<dyn InferenceService>,
}

impl InjuryAgent {
    pub fn new(config: Arc<PipelineConfig>, inference: Arc<dyn InferenceService>) -> Self {
        Self { config, inference }
    }

    fn fallback(&self, claim_type: Option<&str>) -> Signal {
        let keyword = self.config.injury_keyword.to_lowercase();
        match claim_type {
            Some(claim_type) if claim_type.to_lowercase().contains(&keyword) => Signal::from_fallback(
                true,
                Some(format!("claim type '{}'", claim_type)),
            ),
            _ => Signal::from_fallback(false, None),
        }
    }
}

#[async_trait]
impl SignalAgent for InjuryAgent {
    fn name(&self) -> &'static str {
        "injury"
    }

    async fn evaluate(&self, claim_text: &str, fields: &ExtractedFields) -> Signal {
        let claim_type = fields.text(&self.config.claim_type_field);
        let description = fields.text(&self.config.description_field);

        if claim_type.is_none() && description.is_none() {
            info!(agent = self.name(), "No claim type or description, injury not indicated");
            return Signal::from_fallback(false, None);
        }

        let answer = ask_model(
            self.name(),
            self.inference.as_ref(),
            &self.config.system_instruction,
            &injury_prompt(claim_type.as_deref(), description.as_deref(), claim_text),
            &self.config.signal_params,
            EXTRA_AFFIRMATIVES,
        )
        .await;

        combine(self.name(), answer, || self.fallback(claim_type.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::ScriptedInference;
    use crate::prompt::PromptKind;
    use crate::schema::well_known;
    use crate::signals::SignalSource;

    fn fields(claim_type: Option<&str>, description: Option<&str>) -> ExtractedFields {
        let config = PipelineConfig::default();
        let mut fields = ExtractedFields::absent(&config.schema);
        fields.set(&well_known::claim_type(), claim_type.map(Into::into));
        fields.set(&well_known::description(), description.map(Into::into));
        fields
    }

    fn agent(inference: ScriptedInference) -> InjuryAgent {
        InjuryAgent::new(Arc::new(PipelineConfig::default()), Arc::new(inference))
    }

    #[tokio::test]
    async fn test_model_extra_affirmative() {
        let agent = agent(ScriptedInference::new().respond(PromptKind::Injury, "Injured passenger"));
        let signal = agent.evaluate("", &fields(Some("Auto"), Some("Passenger hurt"))).await;
        assert!(signal.verdict());
        assert_eq!(signal.source(), SignalSource::Model);
    }

    #[tokio::test]
    async fn test_fallback_reads_claim_type() {
        let agent = agent(ScriptedInference::new());
        let signal = agent.evaluate("", &fields(Some("Bodily INJURY"), None)).await;
        assert!(signal.verdict());
        assert_eq!(signal.source(), SignalSource::Fallback);

        let signal = agent.evaluate("", &fields(Some("Collision"), Some("injury to driver"))).await;
        assert!(!signal.verdict());
    }

    #[tokio::test]
    async fn test_injury_claim_type_overrides_model_no() {
        let agent = agent(ScriptedInference::new().respond(PromptKind::Injury, "no"));
        let signal = agent.evaluate("", &fields(Some("Bodily Injury"), Some("Rear-ended"))).await;
        assert!(signal.verdict());
        assert_eq!(signal.source(), SignalSource::Fallback);

        let signal = agent.evaluate("", &fields(Some("Collision"), Some("Rear-ended"))).await;
        assert!(!signal.verdict());
        assert_eq!(signal.source(), SignalSource::Model);
    }

    #[tokio::test]
    async fn test_both_absent_skips_model() {
        let inference = ScriptedInference::new().respond(PromptKind::Injury, "YES");
        let agent = InjuryAgent::new(Arc::new(PipelineConfig::default()), Arc::new(inference.clone()));
        let signal = agent.evaluate("injury everywhere", &fields(None, None)).await;
        assert!(!signal.verdict());
        assert_eq!(signal.source(), SignalSource::Fallback);
        assert!(inference.calls().await.is_empty());
    }
}

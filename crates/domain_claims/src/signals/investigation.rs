use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{ask_model, combine, Signal, SignalAgent};
use crate::config::PipelineConfig;
use crate::fields::ExtractedFields;
use crate::ports::InferenceService;
use crate::prompt::investigation_prompt;

const EXTRA_AFFIRMATIVES: &[&str] = &["suspicious", "fraud", "fraudulent"];

/// Screens the incident description for fraud markers
pub struct InvestigationAgent {
    config: Arc<PipelineConfig>,
    inference: Arc<dyn InferenceService>,
}

impl InvestigationAgent {
    pub fn new(config: Arc<PipelineConfig>, inference: Arc<dyn InferenceService>) -> Self {
        Self { config, inference }
    }

    /// Keywords found in `description`, case-insensitively
    pub fn matched_keywords(&self, description: &str) -> Vec<String> {
        let haystack = description.to_lowercase();
        self.config
            .investigation_keywords
            .iter()
            .filter(|k| !k.trim().is_empty() && haystack.contains(&k.trim().to_lowercase()))
            .cloned()
            .collect()
    }

    fn fallback(&self, description: &str) -> Signal {
        let matched = self.matched_keywords(description);
        if matched.is_empty() {
            Signal::from_fallback(false, None)
        } else {
            Signal::from_fallback(true, Some(format!("keywords: {}", matched.join(", "))))
        }
    }
}

#[async_trait]
impl SignalAgent for InvestigationAgent {
    fn name(&self) -> &'static str {
        "investigation"
    }

    async fn evaluate(&self, _claim_text: &str, fields: &ExtractedFields) -> Signal {
        let Some(description) = fields.text(&self.config.description_field) else {
            info!(agent = self.name(), "No description, investigation not indicated");
            return Signal::from_fallback(false, None);
        };

        let answer = ask_model(
            self.name(),
            self.inference.as_ref(),
            &self.config.system_instruction,
            &investigation_prompt(&description),
            &self.config.signal_params,
            EXTRA_AFFIRMATIVES,
        )
        .await;

        combine(self.name(), answer, || self.fallback(&description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::ScriptedInference;
    use crate::prompt::PromptKind;
    use crate::schema::well_known;
    use crate::signals::SignalSource;

    fn fields(description: Option<&str>) -> ExtractedFields {
        let config = PipelineConfig::default();
        let mut fields = ExtractedFields::absent(&config.schema);
        fields.set(&well_known::description(), description.map(Into::into));
        fields
    }

    fn agent(inference: ScriptedInference) -> InvestigationAgent {
        InvestigationAgent::new(Arc::new(PipelineConfig::default()), Arc::new(inference))
    }

    #[tokio::test]
    async fn test_keyword_hit_overrides_model_no() {
        let agent = agent(ScriptedInference::new().respond(PromptKind::Investigation, "No"));
        let signal = agent
            .evaluate("", &fields(Some("Claimant says the crash was a staged accident")))
            .await;
        assert!(signal.verdict());
        assert_eq!(signal.source(), SignalSource::Fallback);
        assert_eq!(signal.detail(), Some("keywords: staged"));
    }

    #[tokio::test]
    async fn test_model_no_without_keywords() {
        let agent = agent(ScriptedInference::new().respond(PromptKind::Investigation, "No"));
        let signal = agent.evaluate("", &fields(Some("Hail damage to roof"))).await;
        assert!(!signal.verdict());
        assert_eq!(signal.source(), SignalSource::Model);
    }

    #[tokio::test]
    async fn test_model_yes_without_keywords() {
        let agent = agent(ScriptedInference::new().respond(PromptKind::Investigation, "Suspicious"));
        let signal = agent.evaluate("", &fields(Some("Third claim this month"))).await;
        assert!(signal.verdict());
        assert_eq!(signal.source(), SignalSource::Model);
    }

    #[tokio::test]
    async fn test_keyword_fallback_when_model_down() {
        let agent = agent(ScriptedInference::new().fail(PromptKind::Investigation, "refused"));
        let signal = agent
            .evaluate("", &fields(Some("Statements are INCONSISTENT with the damage")))
            .await;
        assert!(signal.verdict());
        assert_eq!(signal.source(), SignalSource::Fallback);
        assert_eq!(signal.detail(), Some("keywords: inconsistent"));
    }

    #[tokio::test]
    async fn test_unparseable_answer_falls_back() {
        let agent = agent(ScriptedInference::new().respond(PromptKind::Investigation, "Possibly"));
        let signal = agent.evaluate("", &fields(Some("Hail damage to roof"))).await;
        assert!(!signal.verdict());
        assert_eq!(signal.source(), SignalSource::Fallback);
    }

    #[tokio::test]
    async fn test_absent_description_skips_model() {
        let inference = ScriptedInference::new().respond(PromptKind::Investigation, "YES");
        let agent = InvestigationAgent::new(
            Arc::new(PipelineConfig::default()),
            Arc::new(inference.clone()),
        );
        let signal = agent.evaluate("staged fraud", &fields(None)).await;
        assert!(!signal.verdict());
        assert_eq!(signal.source(), SignalSource::Fallback);
        assert_eq!(inference.call_count(PromptKind::Investigation).await, 0);
    }
}

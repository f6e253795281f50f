//! Claim triage orchestration
//!
//! text → extraction prompt → completion → recovered JSON → normalized
//! fields → completeness and signals → route → record. Every failure before
//! routing degrades to an all-absent field set, which routes to manual
//! review; nothing here returns an error to the caller.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{ClaimId, DocumentId};

use crate::completeness::check_completeness;
use crate::config::PipelineConfig;
use crate::error::FnolError;
use crate::fields::ExtractedFields;
use crate::normalize::normalize_in_place;
use crate::ports::{DocumentHandle, DocumentTextSource, InferenceService};
use crate::prompt::{extraction_prompt, render_chat};
use crate::record::{ClaimRecord, ClaimSignals, DocumentRef, ExtractionOutcome};
use crate::recovery::recover_fields;
use crate::routing::{decide_route, RoutingInput};
use crate::signals::{
    parse_estimated_damage, FastTrackAgent, InjuryAgent, InvestigationAgent, SignalAgent,
};

/// Runs the full triage for one claim at a time
///
/// Cheap to clone; the configuration and inference handle are shared.
#[derive(Clone)]
pub struct ClaimPipeline {
    config: Arc<PipelineConfig>,
    inference: Arc<dyn InferenceService>,
}

impl ClaimPipeline {
    pub fn new(config: Arc<PipelineConfig>, inference: Arc<dyn InferenceService>) -> Self {
        Self { config, inference }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads the document text and triages it
    #[instrument(skip_all, fields(document = %document.name()))]
    pub async fn process_document(
        &self,
        source: &dyn DocumentTextSource,
        document: &DocumentHandle,
    ) -> ClaimRecord {
        let doc = DocumentRef {
            id: DocumentId::new(),
            name: document.name(),
        };

        match source.extract_text(document).await {
            Ok(text) => {
                info!(chars = text.chars().count(), "Document text loaded");
                self.triage(&text, Some(doc)).await
            }
            Err(e) => {
                let error = FnolError::ExtractionFailure(e);
                warn!(error = %error, "Text source failed, continuing with no fields");
                let outcome = ExtractionOutcome::TextSourceFailed {
                    reason: error.to_string(),
                };
                let fields = ExtractedFields::absent(&self.config.schema);
                self.finish("", fields, outcome, Some(doc)).await
            }
        }
    }

    /// Triages raw claim text
    pub async fn process_text(&self, text: &str) -> ClaimRecord {
        self.triage(text, None).await
    }

    async fn triage(&self, text: &str, document: Option<DocumentRef>) -> ClaimRecord {
        let (fields, outcome) = self.extract(text).await;
        self.finish(text, fields, outcome, document).await
    }

    async fn extract(&self, text: &str) -> (ExtractedFields, ExtractionOutcome) {
        let schema = &self.config.schema;

        if text.trim().is_empty() {
            info!("Blank document text, skipping extraction");
            return (ExtractedFields::absent(schema), ExtractionOutcome::BlankText);
        }

        let prompt = render_chat(
            &self.config.system_instruction,
            &extraction_prompt(schema, text),
        );
        debug!(prompt_len = prompt.len(), backend = self.inference.name(), "Requesting extraction");

        let completion = match self
            .inference
            .complete(&prompt, &self.config.extraction_params)
            .await
        {
            Ok(completion) => completion,
            Err(e) => {
                let error = FnolError::InferenceFailure(e);
                warn!(error = %error, "Extraction call failed, continuing with no fields");
                let outcome = ExtractionOutcome::InferenceFailed {
                    reason: error.to_string(),
                };
                return (ExtractedFields::absent(schema), outcome);
            }
        };
        debug!(completion_len = completion.len(), "Extraction completed");

        match recover_fields(&completion, schema) {
            Ok(mut fields) => {
                let cleared = normalize_in_place(&mut fields, &self.config.normalization);
                info!(
                    present = fields.present_count(),
                    cleared,
                    "Fields recovered and normalized"
                );
                (fields, ExtractionOutcome::Recovered)
            }
            Err(error) => {
                warn!(error = %error, "Completion held no usable JSON, continuing with no fields");
                let outcome = ExtractionOutcome::JsonParseFailed {
                    reason: error.to_string(),
                };
                (ExtractedFields::absent(schema), outcome)
            }
        }
    }

    async fn finish(
        &self,
        text: &str,
        fields: ExtractedFields,
        extraction: ExtractionOutcome,
        document: Option<DocumentRef>,
    ) -> ClaimRecord {
        let missing_fields = check_completeness(&fields, &self.config.schema);
        info!(missing = missing_fields.len(), "Completeness checked");

        let investigation = InvestigationAgent::new(self.config.clone(), self.inference.clone());
        let injury = InjuryAgent::new(self.config.clone(), self.inference.clone());
        let fast_track = FastTrackAgent::new(self.config.clone(), self.inference.clone());

        let (investigation, injury, fast_track) = tokio::join!(
            investigation.evaluate(text, &fields),
            injury.evaluate(text, &fields),
            fast_track.evaluate(text, &fields),
        );
        info!(
            investigation = investigation.verdict(),
            investigation_source = %investigation.source(),
            injury = injury.verdict(),
            injury_source = %injury.source(),
            fast_track = fast_track.verdict(),
            fast_track_source = %fast_track.source(),
            "Signals evaluated"
        );

        let estimated_damage = parse_estimated_damage(&fields, &self.config).ok();

        let decision = decide_route(&RoutingInput {
            investigation: &investigation,
            injury: &injury,
            fast_track: &fast_track,
            missing: &missing_fields,
            estimated_damage: estimated_damage.as_ref(),
            threshold: self.config.fast_track_threshold,
        });
        info!(route = %decision.route, rule = %decision.rule, "Claim routed");

        ClaimRecord {
            id: ClaimId::new(),
            document,
            processed_at: Utc::now(),
            extraction,
            extracted_fields: fields,
            missing_fields,
            signals: ClaimSignals {
                investigation,
                injury,
                fast_track,
            },
            estimated_damage,
            decision,
        }
    }
}

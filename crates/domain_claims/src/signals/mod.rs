//! Signal agents
//!
//! Each agent asks the model a narrow yes/no question and ORs the answer
//! with a deterministic rule. The rule alone decides when the model is
//! unreachable or its answer cannot be read. A signal never fails: the
//! worst case is a fallback verdict.

mod fast_track;
mod injury;
mod investigation;

pub use fast_track::{parse_estimated_damage, FastTrackAgent};
pub use injury::InjuryAgent;
pub use investigation::InvestigationAgent;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::fields::ExtractedFields;
use crate::ports::{InferenceParams, InferenceService};
use crate::prompt::render_chat;

/// Which path produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Model,
    Fallback,
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Model => f.write_str("model"),
            SignalSource::Fallback => f.write_str("fallback"),
        }
    }
}

/// Boolean verdict of one agent, tagged with its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    verdict: bool,
    source: SignalSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl Signal {
    pub fn from_model(verdict: bool, answer: impl Into<String>) -> Self {
        Self {
            verdict,
            source: SignalSource::Model,
            detail: Some(answer.into()),
        }
    }

    pub fn from_fallback(verdict: bool, detail: Option<String>) -> Self {
        Self {
            verdict,
            source: SignalSource::Fallback,
            detail,
        }
    }

    pub fn verdict(&self) -> bool {
        self.verdict
    }

    pub fn source(&self) -> SignalSource {
        self.source
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// ORs this verdict with a deterministic rule's verdict
    ///
    /// A positive verdict is kept as-is. Otherwise a positive rule verdict
    /// replaces it, so the source names the path that said yes.
    pub fn or_rule(self, rule: Signal) -> Signal {
        if !self.verdict && rule.verdict {
            rule
        } else {
            self
        }
    }
}

/// Combines the model's answer with the agent's deterministic rule
///
/// The rule is only evaluated when the model did not already answer yes.
pub(crate) fn combine(
    agent: &'static str,
    answer: Option<(bool, String)>,
    rule: impl FnOnce() -> Signal,
) -> Signal {
    match answer {
        Some((true, raw)) => Signal::from_model(true, raw),
        Some((false, raw)) => {
            let signal = Signal::from_model(false, raw).or_rule(rule());
            if signal.source() == SignalSource::Fallback {
                debug!(agent, "Model answered no, deterministic rule fired");
            }
            signal
        }
        None => rule(),
    }
}

/// Common contract of the specialist agents
#[async_trait]
pub trait SignalAgent: Send + Sync {
    /// Agent name for logs
    fn name(&self) -> &'static str;

    async fn evaluate(&self, claim_text: &str, fields: &ExtractedFields) -> Signal;
}

const AFFIRMATIVE: &[&str] = &["yes", "y", "true", "affirmative"];
const NEGATIVE: &[&str] = &["no", "n", "false", "negative", "none", "not"];

/// Reads a yes/no answer from a short completion
///
/// Surrounding quotes, markdown emphasis and an `answer:` prefix are
/// ignored; only the first word counts. `extra_affirmatives` lets an agent
/// accept domain words such as "injured". Returns `None` when the answer is
/// neither affirmative nor negative.
pub fn parse_verdict(answer: &str, extra_affirmatives: &[&str]) -> Option<bool> {
    let is_noise = |c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '*' | '_');
    let mut text = answer.trim_matches(is_noise).to_lowercase();

    if let Some(rest) = text.strip_prefix("answer") {
        let rest = rest.trim_start();
        if let Some(rest) = rest.strip_prefix(':') {
            text = rest.trim_matches(is_noise).to_string();
        }
    }

    let word: String = text
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string();

    if AFFIRMATIVE.contains(&word.as_str()) || extra_affirmatives.contains(&word.as_str()) {
        Some(true)
    } else if NEGATIVE.contains(&word.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Asks the model and returns the parsed verdict with the raw answer
///
/// Any failure is logged and reported as `None` so the caller can fall
/// back to its deterministic rule.
pub(crate) async fn ask_model(
    agent: &'static str,
    inference: &dyn InferenceService,
    system: &str,
    prompt: &str,
    params: &InferenceParams,
    extra_affirmatives: &[&str],
) -> Option<(bool, String)> {
    let answer = match inference.complete(&render_chat(system, prompt), params).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!(agent, backend = inference.name(), error = %e, "Signal model call failed, using fallback");
            return None;
        }
    };

    let trimmed = answer.trim();
    debug!(agent, answer_len = trimmed.len(), "Signal model answered");

    match parse_verdict(trimmed, extra_affirmatives) {
        Some(verdict) => Some((verdict, trimmed.to_string())),
        None => {
            warn!(agent, answer = %trimmed, "Unparseable signal answer, using fallback");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answers() {
        assert_eq!(parse_verdict("YES", &[]), Some(true));
        assert_eq!(parse_verdict("No.", &[]), Some(false));
        assert_eq!(parse_verdict("  true\n", &[]), Some(true));
        assert_eq!(parse_verdict("none", &[]), Some(false));
    }

    #[test]
    fn test_decorated_answers() {
        assert_eq!(parse_verdict("**Yes**, the description mentions a staged", &[]), Some(true));
        assert_eq!(parse_verdict("\"no\"", &[]), Some(false));
        assert_eq!(parse_verdict("Answer: NO", &[]), Some(false));
        assert_eq!(parse_verdict("answer : yes!", &[]), Some(true));
    }

    #[test]
    fn test_extra_affirmatives() {
        assert_eq!(parse_verdict("Injured driver", &[]), None);
        assert_eq!(parse_verdict("Injured driver", &["injured"]), Some(true));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_verdict("", &[]), None);
        assert_eq!(parse_verdict("Maybe", &[]), None);
        assert_eq!(parse_verdict("It is unclear", &[]), None);
    }

    #[test]
    fn test_or_rule() {
        let model_no = Signal::from_model(false, "No");
        let rule_yes = Signal::from_fallback(true, Some("keywords: staged".into()));
        assert_eq!(model_no.clone().or_rule(rule_yes.clone()), rule_yes);
        assert_eq!(
            model_no.clone().or_rule(Signal::from_fallback(false, None)),
            model_no
        );

        let model_yes = Signal::from_model(true, "Yes");
        assert_eq!(model_yes.clone().or_rule(rule_yes), model_yes);
    }

    #[test]
    fn test_signal_serialization() {
        let json = serde_json::to_value(Signal::from_fallback(true, None)).unwrap();
        assert_eq!(json["verdict"], true);
        assert_eq!(json["source"], "fallback");
        assert!(json.get("detail").is_none());
    }
}

//! Routing engine
//!
//! An ordered, first-match-wins rule table over the three signals and the
//! completeness result. The order is fixed; [`rule_names`] exposes it so it
//! can be asserted on.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::Money;

use crate::completeness::MissingFields;
use crate::signals::Signal;

/// Final disposition of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    #[serde(rename = "Fast-track")]
    FastTrack,
    #[serde(rename = "Manual review")]
    ManualReview,
    #[serde(rename = "Investigation Flag")]
    InvestigationFlag,
    #[serde(rename = "Specialist Queue")]
    SpecialistQueue,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::FastTrack => "Fast-track",
            Route::ManualReview => "Manual review",
            Route::InvestigationFlag => "Investigation Flag",
            Route::SpecialistQueue => "Specialist Queue",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route with its justification and the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub route: Route,
    pub reasoning: String,
    pub rule: String,
}

/// Everything the rules look at
#[derive(Debug, Clone, Copy)]
pub struct RoutingInput<'a> {
    pub investigation: &'a Signal,
    pub injury: &'a Signal,
    pub fast_track: &'a Signal,
    pub missing: &'a MissingFields,
    pub estimated_damage: Option<&'a Money>,
    pub threshold: Decimal,
}

struct RoutingRule {
    name: &'static str,
    route: Route,
    matches: fn(&RoutingInput<'_>) -> bool,
    reason: fn(&RoutingInput<'_>) -> String,
}

static ROUTING_RULES: &[RoutingRule] = &[
    RoutingRule {
        name: "investigation_flag",
        route: Route::InvestigationFlag,
        matches: investigation_matches,
        reason: investigation_reason,
    },
    RoutingRule {
        name: "missing_fields",
        route: Route::ManualReview,
        matches: missing_matches,
        reason: missing_reason,
    },
    RoutingRule {
        name: "injury_specialist",
        route: Route::SpecialistQueue,
        matches: injury_matches,
        reason: injury_reason,
    },
    RoutingRule {
        name: "fast_track",
        route: Route::FastTrack,
        matches: fast_track_matches,
        reason: fast_track_reason,
    },
];

const DEFAULT_RULE: &str = "default_manual_review";

/// Rule names in evaluation order, ending with the default
pub fn rule_names() -> Vec<&'static str> {
    ROUTING_RULES
        .iter()
        .map(|rule| rule.name)
        .chain(std::iter::once(DEFAULT_RULE))
        .collect()
}

/// Applies the rule table; the first matching rule decides
pub fn decide_route(input: &RoutingInput<'_>) -> RouteDecision {
    ROUTING_RULES
        .iter()
        .find(|rule| (rule.matches)(input))
        .map(|rule| RouteDecision {
            route: rule.route,
            reasoning: (rule.reason)(input),
            rule: rule.name.to_string(),
        })
        .unwrap_or_else(|| RouteDecision {
            route: Route::ManualReview,
            reasoning: "No routing rule matched confidently; defaulting to manual review."
                .to_string(),
            rule: DEFAULT_RULE.to_string(),
        })
}

fn with_detail(prefix: &str, signal: &Signal) -> String {
    match signal.detail() {
        Some(detail) => format!("{} ({}, {}).", prefix, signal.source(), detail),
        None => format!("{} ({}).", prefix, signal.source()),
    }
}

fn investigation_matches(input: &RoutingInput<'_>) -> bool {
    input.investigation.verdict()
}

fn investigation_reason(input: &RoutingInput<'_>) -> String {
    with_detail(
        "Investigation flagged: the incident description shows fraud markers",
        input.investigation,
    )
}

fn missing_matches(input: &RoutingInput<'_>) -> bool {
    !input.missing.is_empty()
}

fn missing_reason(input: &RoutingInput<'_>) -> String {
    format!(
        "Mandatory fields missing: {}.",
        input.missing.iter().collect::<Vec<_>>().join(", ")
    )
}

fn injury_matches(input: &RoutingInput<'_>) -> bool {
    input.injury.verdict()
}

fn injury_reason(input: &RoutingInput<'_>) -> String {
    with_detail("Claim indicates bodily injury", input.injury)
}

fn fast_track_matches(input: &RoutingInput<'_>) -> bool {
    input.fast_track.verdict() && input.missing.is_empty()
}

fn fast_track_reason(input: &RoutingInput<'_>) -> String {
    let damage = input
        .estimated_damage
        .map(|m| format!("Estimated damage {}", m))
        .unwrap_or_else(|| "Estimated damage".to_string());
    format!(
        "{} is below the fast-track threshold of {} and all mandatory fields are present.",
        damage, input.threshold
    )
}

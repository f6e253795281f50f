//! Prompt construction
//!
//! Every prompt carries a `Task:` marker line so adapters, logs and scripted
//! test doubles can tell which stage issued it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::schema::ClaimSchema;

/// Default system instruction for the chat template
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a precise information extraction and reasoning engine.";

/// Maximum characters of raw claim text quoted into signal prompts
const EXCERPT_CHARS: usize = 1200;

/// Which pipeline stage a prompt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    Extraction,
    Investigation,
    Injury,
    FastTrack,
}

impl PromptKind {
    pub const ALL: [PromptKind; 4] = [
        PromptKind::Extraction,
        PromptKind::Investigation,
        PromptKind::Injury,
        PromptKind::FastTrack,
    ];

    fn marker(&self) -> &'static str {
        match self {
            PromptKind::Extraction => "Task: fnol-extraction",
            PromptKind::Investigation => "Task: fraud-screening",
            PromptKind::Injury => "Task: injury-screening",
            PromptKind::FastTrack => "Task: damage-threshold",
        }
    }

    /// Recovers the stage from a rendered prompt
    pub fn classify(prompt: &str) -> Option<PromptKind> {
        PromptKind::ALL
            .iter()
            .copied()
            .find(|kind| prompt.contains(kind.marker()))
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptKind::Extraction => "extraction",
            PromptKind::Investigation => "investigation",
            PromptKind::Injury => "injury",
            PromptKind::FastTrack => "fast_track",
        };
        f.write_str(name)
    }
}

/// Wraps a user prompt in the instruction-tuned chat template
pub fn render_chat(system: &str, user: &str) -> String {
    format!("<|system|>{}\n<|user|>{}\n<|assistant|>", system, user)
}

/// JSON template with every schema field set to null
pub fn schema_template(schema: &ClaimSchema) -> String {
    let mut root = Map::new();
    for category in schema.categories() {
        let fields: Map<String, Value> = category
            .fields
            .iter()
            .map(|f| (f.clone(), Value::Null))
            .collect();
        root.insert(category.name.clone(), Value::Object(fields));
    }
    serde_json::to_string_pretty(&Value::Object(root)).unwrap_or_else(|_| "{}".to_string())
}

pub fn extraction_prompt(schema: &ClaimSchema, text: &str) -> String {
    format!(
        "{marker}\n\
         Extract the following fields from the FNOL (First Notice of Loss) document below.\n\
         Return ONLY a single JSON object with exactly this structure:\n\
         {template}\n\n\
         Rules:\n\
         - Use null for any field that is not filled in on the document.\n\
         - Never copy a printed form label (for example \"POLICY NUMBER\" or \"DATE OF LOSS\") as a value.\n\
         - Copy values as written; do not invent or infer missing data.\n\
         - Write amounts as they appear, including any currency symbol.\n\
         - Do not add commentary before or after the JSON.\n\n\
         Document:\n\
         ----------------\n\
         {text}\n\
         ----------------",
        marker = PromptKind::Extraction.marker(),
        template = schema_template(schema),
        text = text.trim(),
    )
}

pub fn investigation_prompt(description: &str) -> String {
    format!(
        "{marker}\n\
         Does this incident description contain signs of fraud, a staged event, \
         or inconsistent statements?\n\
         Description: {description}\n\
         Answer with a single word: YES or NO.",
        marker = PromptKind::Investigation.marker(),
        description = description.trim(),
    )
}

pub fn injury_prompt(claim_type: Option<&str>, description: Option<&str>, claim_text: &str) -> String {
    format!(
        "{marker}\n\
         Does this claim involve bodily injury to any person?\n\
         Claim Type: {claim_type}\n\
         Description: {description}\n\
         Document excerpt: {excerpt}\n\
         Answer with a single word: YES or NO.",
        marker = PromptKind::Injury.marker(),
        claim_type = claim_type.unwrap_or("not provided"),
        description = description.unwrap_or("not provided"),
        excerpt = excerpt(claim_text),
    )
}

pub fn fast_track_prompt(estimated_damage: &str, threshold: &str) -> String {
    format!(
        "{marker}\n\
         Is the estimated damage clearly below {threshold}?\n\
         Estimated Damage: {damage}\n\
         Answer with a single word: YES or NO.",
        marker = PromptKind::FastTrack.marker(),
        threshold = threshold,
        damage = estimated_damage.trim(),
    )
}

fn excerpt(text: &str) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= EXCERPT_CHARS {
        flattened
    } else {
        let cut: String = flattened.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", cut)
    }
}

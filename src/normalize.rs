//! Agent payload normalization
//!
//! The analyst agent answers with whatever shape it likes: an object, a JSON
//! string, JSON wrapped in a text field, or plain prose. `normalize` folds all
//! of these into [`AnalyticalResult`] without ever failing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Top-level fields that may carry the real payload as a JSON string.
/// Checked in order; the first usable one wins.
const PROBE_FIELDS: [&str; 5] = ["text", "response", "message", "content", "answer"];

/// A probed object is only accepted if one of these is truthy.
const SCHEMA_MARKERS: [&str; 3] = ["summary", "qualification_probability", "swot"];

static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)%").expect("percentage pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwotBlock {
    pub strengths: String,
    pub weaknesses: String,
    pub opportunities: String,
    pub threats: String,
}

impl SwotBlock {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.opportunities.is_empty()
            && self.threats.is_empty()
    }

    fn from_value(value: Option<&Value>) -> Self {
        let Some(Value::Object(swot)) = value else {
            return Self::default();
        };
        Self {
            strengths: text_field(swot, "strengths"),
            weaknesses: text_field(swot, "weaknesses"),
            opportunities: text_field(swot, "opportunities"),
            threats: text_field(swot, "threats"),
        }
    }
}

/// Fixed analytical schema shown for every parsed agent answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticalResult {
    pub qualification_probability: String,
    pub nrr_impact: String,
    pub swot: SwotBlock,
    pub strategy_recommendations: Vec<String>,
    pub scenario_outlook: String,
    pub summary: String,
}

impl AnalyticalResult {
    /// Result carrying only prose, used when the agent did not answer in JSON
    pub fn from_prose(text: impl Into<String>) -> Self {
        Self {
            summary: text.into(),
            ..Self::default()
        }
    }

    fn from_object(data: &Map<String, Value>) -> Self {
        let strategy_recommendations = match data.get("strategy_recommendations") {
            Some(Value::Array(items)) => items.iter().map(recommendation_text).collect(),
            _ => Vec::new(),
        };

        Self {
            qualification_probability: text_field(data, "qualification_probability"),
            nrr_impact: text_field(data, "nrr_impact"),
            swot: SwotBlock::from_value(data.get("swot")),
            strategy_recommendations,
            scenario_outlook: text_field(data, "scenario_outlook"),
            summary: text_field(data, "summary"),
        }
    }
}

/// Normalize an arbitrary agent payload.
///
/// Returns `None` only when the payload (after re-parsing a JSON string) is
/// not an object.
pub fn normalize(raw: &Value) -> Option<AnalyticalResult> {
    let reparsed;
    let value = match raw {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed) => {
                reparsed = parsed;
                &reparsed
            }
            Err(_) => return Some(AnalyticalResult::from_prose(text.clone())),
        },
        other => other,
    };

    let Value::Object(top) = value else {
        return None;
    };

    let unwrapped = probe_embedded(top);
    let data = unwrapped.as_ref().unwrap_or(top);
    Some(AnalyticalResult::from_object(data))
}

/// Look one level deep for a JSON string holding the real payload.
fn probe_embedded(top: &Map<String, Value>) -> Option<Map<String, Value>> {
    PROBE_FIELDS.iter().find_map(|field| {
        let Some(Value::String(text)) = top.get(*field) else {
            return None;
        };
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(inner)) if has_schema_marker(&inner) => {
                tracing::debug!(field, "Unwrapped embedded agent payload");
                Some(inner)
            }
            _ => None,
        }
    })
}

fn has_schema_marker(data: &Map<String, Value>) -> bool {
    SCHEMA_MARKERS
        .iter()
        .any(|key| data.get(*key).is_some_and(is_truthy))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// List entries are stringified as-is, so a `null` entry reads "null"
fn recommendation_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => coerce_text(other),
    }
}

fn text_field(data: &Map<String, Value>, key: &str) -> String {
    data.get(key).map(coerce_text).unwrap_or_default()
}

/// Coerce any JSON value to display text. Never fails.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(coerce_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// First `<digits>%` in the text, e.g. `"78%"` from `"78% -- India needs..."`.
pub fn extract_percentage(text: &str) -> Option<String> {
    PERCENTAGE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|digits| format!("{}%", digits.as_str()))
}

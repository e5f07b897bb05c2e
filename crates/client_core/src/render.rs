//! Pure presentation of classification outcomes.
//!
//! Live results and demo history records both go through [`render`], so the
//! two paths cannot drift apart in formatting or styling.

use std::fmt;

use serde::Serialize;
use shared::domain::Accent;

use crate::outcome::ClassificationOutcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayFragment {
    Diagnosis {
        label: String,
        confidence_text: String,
        accent: Accent,
    },
    Failure {
        reason: String,
    },
}

pub fn render(outcome: &ClassificationOutcome) -> DisplayFragment {
    match outcome {
        ClassificationOutcome::Success { label, confidence } => DisplayFragment::Diagnosis {
            label: label.clone(),
            confidence_text: format_confidence(*confidence),
            accent: Accent::for_label(label),
        },
        ClassificationOutcome::Failure { reason } => DisplayFragment::Failure {
            reason: reason.clone(),
        },
    }
}

/// `0.9321` -> `"93.21%"`, rounding half-up at the second decimal.
pub fn format_confidence(confidence: f64) -> String {
    if !confidence.is_finite() {
        return "--%".to_string();
    }
    let hundredths = (confidence * 10_000.0).round();
    format!("{:.2}%", hundredths / 100.0)
}

impl DisplayFragment {
    pub fn is_failure(&self) -> bool {
        matches!(self, DisplayFragment::Failure { .. })
    }

    pub fn accent(&self) -> Option<Accent> {
        match self {
            DisplayFragment::Diagnosis { accent, .. } => Some(*accent),
            DisplayFragment::Failure { .. } => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            DisplayFragment::Diagnosis {
                label,
                confidence_text,
                accent,
            } => {
                let modifier = match accent {
                    Accent::Positive => "positive",
                    Accent::Negative => "negative",
                };
                format!(
                    "<div class=\"result result--{modifier}\">Result: <strong>{}</strong><br>Confidence: {}</div>",
                    escape_html(label),
                    escape_html(confidence_text)
                )
            }
            DisplayFragment::Failure { reason } => format!(
                "<div class=\"result result--error\">{}</div>",
                escape_html(reason)
            ),
        }
    }
}

impl fmt::Display for DisplayFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayFragment::Diagnosis {
                label,
                confidence_text,
                ..
            } => write!(f, "Result: {label}\nConfidence: {confidence_text}"),
            DisplayFragment::Failure { reason } => write!(f, "{reason}"),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;

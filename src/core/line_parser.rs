//! Telemetry line parser
//!
//! Lines look like `A: 12.34 cm | B: —`. A field runs from its `label:` to
//! the next label or `|`, so comma or space separated lines parse too. The
//! value is the leading decimal number; anything else in the field (units,
//! the no-echo placeholder) is ignored.

use lazy_static::lazy_static;
use regex::Regex;
use crate::DEFAULT_FIELD_LABEL;

lazy_static! {
    /// `label:` marker; the field body runs until the next marker
    static ref RE_LABEL: Regex = Regex::new(
        r"(?P<label>[A-Za-z][A-Za-z0-9_]*)\s*:"
    ).unwrap();

    /// Leading non-negative decimal
    static ref RE_NUMBER: Regex = Regex::new(
        r"^\s*(?P<num>\d+(?:\.\d*)?|\.\d+)"
    ).unwrap();
}

/// What a line says about the watched field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedLine {
    /// Field present with a distance
    Value(f64),
    /// Field present with a placeholder, e.g. `—`
    NoEcho,
    /// Field absent or line unreadable
    Unrecognized,
}

impl ParsedLine {
    /// Parsed distance, or None for a placeholder or a missing field
    pub fn value(&self) -> Option<f64> {
        match self {
            ParsedLine::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Extracts one labelled field from telemetry lines
#[derive(Debug, Clone)]
pub struct LineParser {
    label: String,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_LABEL)
    }
}

impl LineParser {
    /// Parser watching the given field label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into().trim().to_string(),
        }
    }

    /// Watched field label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parse the watched field out of a line
    pub fn parse(&self, line: &str) -> ParsedLine {
        fields(line)
            .into_iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(&self.label))
            .map(|(_, value)| match value {
                Some(v) => ParsedLine::Value(v),
                None => ParsedLine::NoEcho,
            })
            .unwrap_or(ParsedLine::Unrecognized)
    }
}

/// Every `label: value` field in a line, values parsed where numeric
pub fn fields(line: &str) -> Vec<(String, Option<f64>)> {
    let markers: Vec<_> = RE_LABEL.captures_iter(line).collect();
    markers
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let label = caps.name("label")?;
            let start = caps.get(0)?.end();
            let end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(line.len(), |m| m.start());
            let body = &line[start..end];
            let body = body.split('|').next().unwrap_or(body);
            let value = RE_NUMBER
                .captures(body)
                .and_then(|n| n["num"].parse::<f64>().ok())
                .filter(|v| v.is_finite());
            Some((label.as_str().to_string(), value))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

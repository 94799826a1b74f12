// SYNOID Chroma — Inference Response Parser
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// The endpoint has shipped several payload layouts and label schemes.
// Every layout resolves to one PayloadShape, then to a RawScoreSet.

use serde_json::Value;
use tracing::{debug, warn};

use super::error::AnalysisError;
use super::{Dimension, RawScoreSet};

/// Recognised top-level layouts, probed in declaration order.
#[derive(Debug)]
enum PayloadShape<'a> {
    /// `[[{label, score}, ...]]` as returned by text-classification pipelines.
    Nested(&'a [Value]),
    /// `[{label, score}, ...]`
    Flat(&'a [Value]),
}

impl<'a> PayloadShape<'a> {
    fn detect(payload: &'a Value) -> Option<Self> {
        let items = payload.as_array()?;
        match items.first() {
            Some(Value::Array(_)) => Some(PayloadShape::Nested(items)),
            Some(_) => Some(PayloadShape::Flat(items)),
            None => None,
        }
    }

    fn records(&self) -> Result<Vec<&'a Value>, String> {
        match *self {
            PayloadShape::Flat(items) => Ok(items.iter().collect()),
            PayloadShape::Nested(groups) => {
                let mut out = Vec::new();
                for (idx, group) in groups.iter().enumerate() {
                    let inner = group
                        .as_array()
                        .ok_or_else(|| format!("element {} of nested payload is not a list", idx))?;
                    out.extend(inner.iter());
                }
                Ok(out)
            }
        }
    }
}

/// Parse a raw response body.
pub fn parse_scores(body: &str) -> Result<RawScoreSet, AnalysisError> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|e| AnalysisError::malformed(format!("invalid JSON: {}", e), body))?;
    parse_value(&payload)
}

/// Parse an already-decoded payload.
pub fn parse_value(payload: &Value) -> Result<RawScoreSet, AnalysisError> {
    let shape = PayloadShape::detect(payload).ok_or_else(|| {
        AnalysisError::malformed(
            "expected a non-empty list of label/score records",
            &payload.to_string(),
        )
    })?;
    debug!("[PARSER] Payload shape: {}", shape_name(&shape));

    let records = shape
        .records()
        .map_err(|detail| AnalysisError::malformed(detail, &payload.to_string()))?;

    let mut scores = RawScoreSet::default();
    for (idx, record) in records.into_iter().enumerate() {
        let label = record.get("label").and_then(Value::as_str).ok_or_else(|| {
            AnalysisError::malformed(
                format!("record {} has no string label", idx),
                &payload.to_string(),
            )
        })?;

        let Some(dim) = Dimension::from_label(label) else {
            warn!("[PARSER] Ignoring unrecognised label '{}'", label);
            continue;
        };

        let score = record.get("score").and_then(Value::as_f64).ok_or_else(|| {
            AnalysisError::malformed(
                format!("record {} ({}) has no numeric score", idx, label),
                &payload.to_string(),
            )
        })?;
        scores.insert(dim, score);
    }

    for dim in Dimension::ALL {
        if !scores.is_reported(dim) {
            warn!("[PARSER] Dimension {} missing, using neutral score", dim.key());
        }
    }

    Ok(scores)
}

fn shape_name(shape: &PayloadShape<'_>) -> &'static str {
    match shape {
        PayloadShape::Nested(_) => "nested",
        PayloadShape::Flat(_) => "flat",
    }
}

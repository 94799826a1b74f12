// SYNOID Chroma — Emotion Core
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Text in, VAD scores from the inference endpoint, HSL color out.
// client -> parser -> normalizer -> color, wired together by pipeline.

pub mod cdf;
pub mod client;
pub mod color;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod pipeline;

use serde::{Deserialize, Serialize};

pub use cdf::CdfTable;
pub use client::{InferenceTransport, ResilientClient, RetryPolicy};
pub use color::to_hsl;
pub use error::AnalysisError;
pub use normalizer::{NormalizationStrategy, ScoreNormalizer};
pub use parser::parse_scores;
pub use pipeline::AnalysisPipeline;

/// Raw score substituted for a dimension the model did not report (1-5 scale).
pub const NEUTRAL_SCORE: f64 = 3.0;

/// One axis of the Valence-Arousal-Dominance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Valence,
    Arousal,
    Dominance,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Valence, Dimension::Arousal, Dimension::Dominance];

    /// Resolve a label emitted by the model. Accepts the semantic letters,
    /// the generic `LABEL_n` identifiers and the spelled-out names.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "V" | "v" | "LABEL_0" => Some(Dimension::Valence),
            "A" | "a" | "LABEL_1" => Some(Dimension::Arousal),
            "D" | "d" | "LABEL_2" => Some(Dimension::Dominance),
            other => match other.to_ascii_lowercase().as_str() {
                "valence" => Some(Dimension::Valence),
                "arousal" => Some(Dimension::Arousal),
                "dominance" => Some(Dimension::Dominance),
                _ => None,
            },
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Valence => "V",
            Dimension::Arousal => "A",
            Dimension::Dominance => "D",
        }
    }
}

/// Raw model scores, at most one per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawScoreSet {
    valence: Option<f64>,
    arousal: Option<f64>,
    dominance: Option<f64>,
}

impl RawScoreSet {
    pub fn new(valence: f64, arousal: f64, dominance: f64) -> Self {
        Self {
            valence: Some(valence),
            arousal: Some(arousal),
            dominance: Some(dominance),
        }
    }

    /// Record a score. A later value for the same dimension replaces the earlier one.
    pub fn insert(&mut self, dim: Dimension, score: f64) {
        let slot = match dim {
            Dimension::Valence => &mut self.valence,
            Dimension::Arousal => &mut self.arousal,
            Dimension::Dominance => &mut self.dominance,
        };
        *slot = Some(score);
    }

    pub fn is_reported(&self, dim: Dimension) -> bool {
        self.slot(dim).is_some()
    }

    /// Score for `dim`, falling back to [`NEUTRAL_SCORE`] when absent.
    pub fn get(&self, dim: Dimension) -> f64 {
        self.slot(dim).unwrap_or(NEUTRAL_SCORE)
    }

    fn slot(&self, dim: Dimension) -> Option<f64> {
        match dim {
            Dimension::Valence => self.valence,
            Dimension::Arousal => self.arousal,
            Dimension::Dominance => self.dominance,
        }
    }
}

/// VAD values in `[0.0, 1.0]`. Construction always clamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedVad {
    valence: f64,
    arousal: f64,
    dominance: f64,
}

impl NormalizedVad {
    pub fn new(valence: f64, arousal: f64, dominance: f64) -> Self {
        Self {
            valence: clamp_unit(valence),
            arousal: clamp_unit(arousal),
            dominance: clamp_unit(dominance),
        }
    }

    pub fn valence(&self) -> f64 {
        self.valence
    }

    pub fn arousal(&self) -> f64 {
        self.arousal
    }

    pub fn dominance(&self) -> f64 {
        self.dominance
    }
}

/// NaN has no position on the scale, so it collapses to the neutral midpoint.
fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.5
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Display color. Saturation and lightness stay inside legible sub-ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HslColor {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

// SYNOID Chroma — Empirical CDF Tables
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Precomputed score distributions, one per dimension. The artifact is a
// JSON object of observed raw scores: {"V": [...], "A": [...], "D": [...]}.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::Dimension;

#[derive(Debug, Error, PartialEq)]
pub enum CdfError {
    #[error("CDF samples for dimension {0} are empty")]
    Empty(&'static str),
    #[error("CDF samples for dimension {0} contain a non-finite value")]
    NonFinite(&'static str),
}

#[derive(Deserialize)]
struct CdfArtifact {
    #[serde(rename = "V")]
    valence: Vec<f64>,
    #[serde(rename = "A")]
    arousal: Vec<f64>,
    #[serde(rename = "D")]
    dominance: Vec<f64>,
}

/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CdfTable {
    valence: Vec<f64>,
    arousal: Vec<f64>,
    dominance: Vec<f64>,
}

impl CdfTable {
    pub fn from_samples(
        valence: Vec<f64>,
        arousal: Vec<f64>,
        dominance: Vec<f64>,
    ) -> Result<Self, CdfError> {
        Ok(Self {
            valence: sorted_samples(Dimension::Valence, valence)?,
            arousal: sorted_samples(Dimension::Arousal, arousal)?,
            dominance: sorted_samples(Dimension::Dominance, dominance)?,
        })
    }

    /// Load and validate the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CDF table {:?}", path))?;
        let artifact: CdfArtifact = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse CDF table {:?}", path))?;
        let table = Self::from_samples(artifact.valence, artifact.arousal, artifact.dominance)
            .with_context(|| format!("Invalid CDF table {:?}", path))?;

        info!(
            "[CDF] Loaded table {:?} (V={}, A={}, D={} samples)",
            path,
            table.valence.len(),
            table.arousal.len(),
            table.dominance.len()
        );
        Ok(table)
    }

    /// Fraction of observed samples less than or equal to `raw`.
    pub fn percentile(&self, dim: Dimension, raw: f64) -> f64 {
        let samples = self.samples(dim);
        let at_or_below = samples.partition_point(|s| *s <= raw);
        at_or_below as f64 / samples.len() as f64
    }

    pub fn sample_count(&self, dim: Dimension) -> usize {
        self.samples(dim).len()
    }

    fn samples(&self, dim: Dimension) -> &[f64] {
        match dim {
            Dimension::Valence => &self.valence,
            Dimension::Arousal => &self.arousal,
            Dimension::Dominance => &self.dominance,
        }
    }
}

fn sorted_samples(dim: Dimension, mut samples: Vec<f64>) -> Result<Vec<f64>, CdfError> {
    if samples.is_empty() {
        return Err(CdfError::Empty(dim.key()));
    }
    if samples.iter().any(|s| !s.is_finite()) {
        return Err(CdfError::NonFinite(dim.key()));
    }
    samples.sort_by(f64::total_cmp);
    Ok(samples)
}

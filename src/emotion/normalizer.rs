// SYNOID Chroma — Score Normalization
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use std::str::FromStr;
use std::sync::Arc;

use super::cdf::CdfTable;
use super::error::AnalysisError;
use super::{Dimension, NormalizedVad, RawScoreSet};

/// Lowest raw score the model emits.
pub const MIN_SCORE: f64 = 1.0;
/// Highest raw score the model emits.
pub const MAX_SCORE: f64 = 5.0;

/// Which transform a deployment uses. Exactly one is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationStrategy {
    Linear,
    Cdf,
}

impl NormalizationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationStrategy::Linear => "linear",
            NormalizationStrategy::Cdf => "cdf",
        }
    }
}

impl FromStr for NormalizationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(NormalizationStrategy::Linear),
            "cdf" => Ok(NormalizationStrategy::Cdf),
            other => Err(format!(
                "unknown normalization strategy '{}' (expected 'linear' or 'cdf')",
                other
            )),
        }
    }
}

/// Maps raw model scores onto `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ScoreNormalizer {
    strategy: NormalizationStrategy,
    table: Option<Arc<CdfTable>>,
}

impl ScoreNormalizer {
    pub fn linear() -> Self {
        Self {
            strategy: NormalizationStrategy::Linear,
            table: None,
        }
    }

    /// CDF normalization. A missing table is kept as-is and fails every
    /// call to [`ScoreNormalizer::normalize`]; there is no linear fallback.
    pub fn cdf(table: Option<Arc<CdfTable>>) -> Self {
        Self {
            strategy: NormalizationStrategy::Cdf,
            table,
        }
    }

    pub fn for_strategy(strategy: NormalizationStrategy, table: Option<Arc<CdfTable>>) -> Self {
        match strategy {
            NormalizationStrategy::Linear => Self::linear(),
            NormalizationStrategy::Cdf => Self::cdf(table),
        }
    }

    pub fn strategy(&self) -> NormalizationStrategy {
        self.strategy
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Fails only when the CDF strategy has no table to read from.
    pub fn ensure_ready(&self) -> Result<(), AnalysisError> {
        match (self.strategy, &self.table) {
            (NormalizationStrategy::Cdf, None) => Err(AnalysisError::NormalizationUnavailable),
            _ => Ok(()),
        }
    }

    pub fn normalize(&self, raw: &RawScoreSet) -> Result<NormalizedVad, AnalysisError> {
        let scale = |dim: Dimension| -> Result<f64, AnalysisError> {
            let score = raw.get(dim);
            match self.strategy {
                NormalizationStrategy::Linear => Ok(normalize_linear(score)),
                NormalizationStrategy::Cdf => self
                    .table
                    .as_ref()
                    .map(|t| t.percentile(dim, score))
                    .ok_or(AnalysisError::NormalizationUnavailable),
            }
        };

        Ok(NormalizedVad::new(
            scale(Dimension::Valence)?,
            scale(Dimension::Arousal)?,
            scale(Dimension::Dominance)?,
        ))
    }
}

/// `(raw - MIN_SCORE) / (MAX_SCORE - MIN_SCORE)`, clamped to `[0, 1]`.
pub fn normalize_linear(raw: f64) -> f64 {
    ((raw - MIN_SCORE) / (MAX_SCORE - MIN_SCORE)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(normalize_linear(1.0), 0.0);
        assert_eq!(normalize_linear(5.0), 1.0);
        assert_eq!(normalize_linear(3.0), 0.5);
    }

    #[test]
    fn test_linear_clamps_out_of_range() {
        assert_eq!(normalize_linear(-3.0), 0.0);
        assert_eq!(normalize_linear(0.99), 0.0);
        assert_eq!(normalize_linear(12.0), 1.0);
    }

    #[test]
    fn test_linear_is_monotonic_in_range() {
        let mut last = normalize_linear(1.0);
        for i in 1..=400 {
            let r = 1.0 + i as f64 * 0.01;
            let n = normalize_linear(r);
            assert!((0.0..=1.0).contains(&n));
            assert!(n >= last, "decreased at {}", r);
            last = n;
        }
    }

    #[test]
    fn test_linear_neutral_default() {
        let mut raw = RawScoreSet::default();
        raw.insert(Dimension::Valence, 5.0);
        let vad = ScoreNormalizer::linear().normalize(&raw).unwrap();
        assert_eq!(vad.valence(), 1.0);
        assert_eq!(vad.arousal(), 0.5);
        assert_eq!(vad.dominance(), 0.5);
    }

    #[test]
    fn test_cdf_without_table_fails_closed() {
        let normalizer = ScoreNormalizer::cdf(None);
        assert!(matches!(
            normalizer.ensure_ready(),
            Err(AnalysisError::NormalizationUnavailable)
        ));
        assert!(matches!(
            normalizer.normalize(&RawScoreSet::new(3.0, 3.0, 3.0)),
            Err(AnalysisError::NormalizationUnavailable)
        ));
    }

    #[test]
    fn test_cdf_uses_percentiles() {
        let table = CdfTable::from_samples(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 2.2, 2.4, 2.6],
            vec![4.0, 4.5],
        )
        .unwrap();
        let normalizer = ScoreNormalizer::cdf(Some(Arc::new(table)));
        normalizer.ensure_ready().unwrap();

        let vad = normalizer.normalize(&RawScoreSet::new(2.0, 9.0, 1.0)).unwrap();
        assert_eq!(vad.valence(), 0.5);
        assert_eq!(vad.arousal(), 1.0);
        assert_eq!(vad.dominance(), 0.0);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "linear".parse::<NormalizationStrategy>(),
            Ok(NormalizationStrategy::Linear)
        );
        assert_eq!(
            " CDF ".parse::<NormalizationStrategy>(),
            Ok(NormalizationStrategy::Cdf)
        );
        assert!("blend".parse::<NormalizationStrategy>().is_err());
    }
}

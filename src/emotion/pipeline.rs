// SYNOID Chroma — Analysis Pipeline
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use tracing::{debug, info};

use super::client::ResilientClient;
use super::color::to_hsl;
use super::error::AnalysisError;
use super::normalizer::ScoreNormalizer;
use super::parser::parse_scores;
use super::HslColor;

/// fetch -> parse -> normalize -> color. The first failing stage ends the
/// request; nothing partial is returned.
pub struct AnalysisPipeline {
    client: ResilientClient,
    normalizer: ScoreNormalizer,
}

impl AnalysisPipeline {
    pub fn new(client: ResilientClient, normalizer: ScoreNormalizer) -> Self {
        Self { client, normalizer }
    }

    pub fn client(&self) -> &ResilientClient {
        &self.client
    }

    pub fn normalizer(&self) -> &ScoreNormalizer {
        &self.normalizer
    }

    pub async fn analyze(&self, text: &str) -> Result<HslColor, AnalysisError> {
        // Server-side misconfiguration is reported before spending an upstream call.
        self.normalizer.ensure_ready()?;

        let payload = self.client.fetch_scores(text).await?;
        let raw = parse_scores(&payload)?;
        let vad = self.normalizer.normalize(&raw)?;
        debug!(
            "[PIPELINE] V={:.3} A={:.3} D={:.3}",
            vad.valence(),
            vad.arousal(),
            vad.dominance()
        );

        let color = to_hsl(&vad);
        info!("[PIPELINE] 🎨 hsl({}, {}%, {}%)", color.h, color.s, color.l);
        Ok(color)
    }
}

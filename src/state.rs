use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::emotion::client::{InferenceTransport, ReqwestTransport, ResilientClient};
use crate::emotion::{AnalysisPipeline, CdfTable, NormalizationStrategy, ScoreNormalizer};

/// Read-only for the process lifetime; requests share it without locking.
pub struct ServiceState {
    pub pipeline: AnalysisPipeline,
    pub allowed_origins: Vec<String>,
}

impl ServiceState {
    pub fn new(pipeline: AnalysisPipeline, allowed_origins: Vec<String>) -> Self {
        Self {
            pipeline,
            allowed_origins,
        }
    }

    /// Wire the production pipeline. Loads the CDF artifact when one is configured.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.api_url, config.retry.attempt_timeout)?;
        let table = match &config.cdf_table {
            Some(path) => Some(Arc::new(CdfTable::load(path)?)),
            None => None,
        };
        Ok(Self::with_transport(config, Arc::new(transport), table))
    }

    /// Same wiring with an injected transport and table.
    pub fn with_transport(
        config: &ServiceConfig,
        transport: Arc<dyn InferenceTransport>,
        table: Option<Arc<CdfTable>>,
    ) -> Self {
        if config.normalization == NormalizationStrategy::Cdf && table.is_none() {
            warn!("[CONFIG] CDF normalization selected without a table; analysis will fail until one is configured");
        }
        if config.normalization == NormalizationStrategy::Linear && table.is_some() {
            info!("[CONFIG] CDF table loaded but linear normalization is active");
        }
        if config.api_key.is_none() {
            warn!("[CONFIG] HUGGING_FACE_API_KEY is not set; analysis requests will be rejected");
        }

        let client = ResilientClient::new(transport, config.api_key.clone(), config.retry);
        let normalizer = ScoreNormalizer::for_strategy(config.normalization, table);
        info!(
            "[CONFIG] Endpoint {} | normalization={} | attempts={} | delay={:?} | timeout={:?}",
            config.api_url,
            config.normalization.as_str(),
            config.retry.max_attempts,
            config.retry.retry_delay,
            config.retry.attempt_timeout
        );

        Self::new(
            AnalysisPipeline::new(client, normalizer),
            config.allowed_origins.clone(),
        )
    }
}

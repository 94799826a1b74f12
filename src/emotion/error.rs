// SYNOID Chroma — Analysis Error Taxonomy
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use thiserror::Error;

/// Longest slice of an upstream payload kept in diagnostics.
const PAYLOAD_PREVIEW_CHARS: usize = 512;

/// Terminal failure of one analysis request. No stage recovers from another.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Configuration error: {detail}")]
    Configuration { detail: String },

    #[error("CDF normalization selected but no CDF table is loaded")]
    NormalizationUnavailable,

    #[error("Inference service unavailable after {attempts} attempt(s): {detail}")]
    ServiceUnavailable {
        attempts: u32,
        last_status: Option<u16>,
        detail: String,
    },

    #[error("Inference service timed out after {attempts} attempt(s)")]
    ServiceTimeout { attempts: u32 },

    #[error("Inference service returned HTTP {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("Malformed inference response ({detail}); payload: {payload}")]
    MalformedResponse { detail: String, payload: String },
}

impl AnalysisError {
    pub fn configuration(detail: impl Into<String>) -> Self {
        AnalysisError::Configuration {
            detail: detail.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>, payload: &str) -> Self {
        AnalysisError::MalformedResponse {
            detail: detail.into(),
            payload: preview(payload),
        }
    }

    pub fn service_error(status: u16, body: &str) -> Self {
        AnalysisError::ServiceError {
            status,
            body: preview(body),
        }
    }

    pub fn unavailable(attempts: u32, last_status: Option<u16>, detail: &str) -> Self {
        AnalysisError::ServiceUnavailable {
            attempts,
            last_status,
            detail: preview(detail),
        }
    }

    /// Stable category string surfaced to callers.
    pub fn category(&self) -> &'static str {
        match self {
            AnalysisError::Configuration { .. } => "config",
            AnalysisError::NormalizationUnavailable => "normalization_unavailable",
            AnalysisError::ServiceUnavailable { .. } | AnalysisError::ServiceTimeout { .. } => {
                "upstream_unavailable"
            }
            AnalysisError::ServiceError { .. } => "upstream_error",
            AnalysisError::MalformedResponse { .. } => "malformed_response",
        }
    }

    /// HTTP status for the caller-facing response.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::Configuration { .. } | AnalysisError::NormalizationUnavailable => 500,
            AnalysisError::ServiceUnavailable { .. } => 503,
            AnalysisError::ServiceTimeout { .. } => 504,
            AnalysisError::ServiceError { .. } | AnalysisError::MalformedResponse { .. } => 502,
        }
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() <= PAYLOAD_PREVIEW_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(PAYLOAD_PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

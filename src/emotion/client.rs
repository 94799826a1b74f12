// SYNOID Chroma — Resilient Inference Client
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Wraps the VAD inference endpoint in a bounded retry loop:
//   1. Refuse to start without a bearer credential
//   2. POST the text, each attempt under its own deadline
//   3. On 503 or transport failure, wait a fixed delay and try again
//
// Attempts run strictly one after another. Dropping the returned future
// aborts the in-flight attempt or the pending delay.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::error::AnalysisError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP status the endpoint returns while the model is still loading.
const WARMING_UP_STATUS: u16 = 503;

pub const MISSING_CREDENTIAL: &str = "Hugging Face API key not configured on the server.";

/// Body of the inference POST.
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
    pub parameters: InferenceParameters,
}

/// Asks the classifier to report every label, one per dimension.
#[derive(Debug, Serialize)]
pub struct InferenceParameters {
    pub top_k: u8,
}

impl<'a> InferenceRequest<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            inputs: text,
            parameters: InferenceParameters { top_k: 3 },
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Connection(String),
}

/// One HTTP exchange with the inference endpoint.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    async fn send(
        &self,
        credential: &str,
        request: &InferenceRequest<'_>,
    ) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqwestTransport {
    pub fn new(endpoint: &str, attempt_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(attempt_timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl InferenceTransport for ReqwestTransport {
    async fn send(
        &self,
        credential: &str,
        request: &InferenceRequest<'_>,
    ) -> Result<TransportResponse, TransportError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(classify_reqwest_error)?;
        Ok(TransportResponse { status, body })
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(e.to_string())
    }
}

/// Attempt bound and timing for [`ResilientClient::fetch_scores`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. At least 1.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
    /// Deadline for a single attempt.
    pub attempt_timeout: Duration,
    /// Optional budget for the whole call, attempts and delays included.
    pub request_deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            request_deadline: None,
        }
    }
}

/// Why the last retryable attempt failed.
#[derive(Debug)]
enum RetryableFailure {
    WarmingUp { status: u16, body: String },
    Timeout,
    Transport(String),
}

enum AttemptOutcome {
    Success(String),
    Fatal { status: u16, body: String },
    Retry(RetryableFailure),
}

pub struct ResilientClient {
    transport: Arc<dyn InferenceTransport>,
    credential: Option<String>,
    policy: RetryPolicy,
}

impl ResilientClient {
    pub fn new(
        transport: Arc<dyn InferenceTransport>,
        credential: Option<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            credential: credential.filter(|c| !c.trim().is_empty()),
            policy,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch the raw payload for `text`.
    ///
    /// Errors with `Configuration` before any network call when the
    /// credential is missing, `ServiceError` on a non-retryable status,
    /// and `ServiceUnavailable` / `ServiceTimeout` once retries run out.
    pub async fn fetch_scores(&self, text: &str) -> Result<String, AnalysisError> {
        let credential = self
            .credential
            .as_deref()
            .ok_or_else(|| AnalysisError::configuration(MISSING_CREDENTIAL))?;

        let max_attempts = self.policy.max_attempts.max(1);
        let deadline = self.policy.request_deadline.map(|d| Instant::now() + d);
        let request = InferenceRequest::new(text);
        let mut last_failure = RetryableFailure::Transport("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            info!(
                "[CLIENT] Attempt {}/{} ({} chars)",
                attempt,
                max_attempts,
                text.chars().count()
            );

            match self.attempt(credential, &request, deadline).await {
                AttemptOutcome::Success(body) => {
                    info!("[CLIENT] ✅ Scores received on attempt {}", attempt);
                    return Ok(body);
                }
                AttemptOutcome::Fatal { status, body } => {
                    error!("[CLIENT] ❌ HTTP {} from inference service, not retrying", status);
                    return Err(AnalysisError::service_error(status, &body));
                }
                AttemptOutcome::Retry(failure) => {
                    warn!("[CLIENT] Attempt {} failed: {}", attempt, describe(&failure));
                    last_failure = failure;
                }
            }

            if deadline_passed(deadline) {
                error!("[CLIENT] Request deadline exceeded after {} attempt(s)", attempt);
                return Err(AnalysisError::ServiceTimeout { attempts: attempt });
            }

            if attempt < max_attempts {
                warn!("[CLIENT] Retrying in {:?}...", self.policy.retry_delay);
                let resume_at = Instant::now() + self.policy.retry_delay;
                match deadline {
                    Some(d) if d < resume_at => {
                        tokio::time::sleep_until(d).await;
                        error!("[CLIENT] Request deadline exceeded after {} attempt(s)", attempt);
                        return Err(AnalysisError::ServiceTimeout { attempts: attempt });
                    }
                    _ => tokio::time::sleep_until(resume_at).await,
                }
            }
        }

        error!(
            "[CLIENT] Inference service exhausted all {} attempts",
            max_attempts
        );
        Err(exhausted(max_attempts, last_failure))
    }

    async fn attempt(
        &self,
        credential: &str,
        request: &InferenceRequest<'_>,
        deadline: Option<Instant>,
    ) -> AttemptOutcome {
        let mut attempt_deadline = Instant::now() + self.policy.attempt_timeout;
        if let Some(d) = deadline {
            attempt_deadline = attempt_deadline.min(d);
        }

        let sent =
            tokio::time::timeout_at(attempt_deadline, self.transport.send(credential, request))
                .await;

        match sent {
            Err(_) | Ok(Err(TransportError::Timeout)) => {
                AttemptOutcome::Retry(RetryableFailure::Timeout)
            }
            Ok(Err(TransportError::Connection(msg))) => {
                AttemptOutcome::Retry(RetryableFailure::Transport(msg))
            }
            Ok(Ok(resp)) if (200..300).contains(&resp.status) => AttemptOutcome::Success(resp.body),
            Ok(Ok(resp)) if resp.status == WARMING_UP_STATUS => {
                AttemptOutcome::Retry(RetryableFailure::WarmingUp {
                    status: resp.status,
                    body: resp.body,
                })
            }
            Ok(Ok(resp)) => AttemptOutcome::Fatal {
                status: resp.status,
                body: resp.body,
            },
        }
    }
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.map_or(false, |d| Instant::now() >= d)
}

fn describe(failure: &RetryableFailure) -> String {
    match failure {
        RetryableFailure::WarmingUp { status, .. } => format!("HTTP {} (model warming up)", status),
        RetryableFailure::Timeout => "attempt timed out".to_string(),
        RetryableFailure::Transport(msg) => msg.clone(),
    }
}

fn exhausted(attempts: u32, last: RetryableFailure) -> AnalysisError {
    match last {
        RetryableFailure::Timeout => AnalysisError::ServiceTimeout { attempts },
        RetryableFailure::WarmingUp { status, body } => AnalysisError::unavailable(
            attempts,
            Some(status),
            &format!("model still warming up; last body: {}", body.trim()),
        ),
        RetryableFailure::Transport(msg) => AnalysisError::unavailable(attempts, None, &msg),
    }
}

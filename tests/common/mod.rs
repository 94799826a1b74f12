#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use synoid_chroma::config::ServiceConfig;
use synoid_chroma::emotion::client::{
    InferenceRequest, InferenceTransport, RetryPolicy, TransportError, TransportResponse,
};

/// Fake inference endpoint replaying canned responses.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<(u16, String)>>,
    calls: AtomicU32,
    last_input: Mutex<Option<String>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<(u16, &str)>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().map(|(s, b)| (s, b.to_string())).collect()),
            calls: AtomicU32::new(0),
            last_input: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceTransport for ScriptedTransport {
    async fn send(
        &self,
        _credential: &str,
        request: &InferenceRequest<'_>,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(request.inputs.to_string());
        match self.script.lock().unwrap().pop_front() {
            Some((status, body)) => Ok(TransportResponse { status, body }),
            None => Err(TransportError::Connection("connection refused".to_string())),
        }
    }
}

pub const SAMPLE_SCORES: &str =
    r#"[[{"label":"LABEL_0","score":3.8},{"label":"LABEL_1","score":2.6},{"label":"LABEL_2","score":4.1}]]"#;

/// Test config: credential present, millisecond retry delay.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::from_lookup(|key| match key {
        "HUGGING_FACE_API_KEY" => Some("hf_test".to_string()),
        _ => None,
    })
    .unwrap();
    config.retry = RetryPolicy {
        retry_delay: Duration::from_millis(1),
        attempt_timeout: Duration::from_secs(2),
        ..RetryPolicy::default()
    };
    config
}

mod common;

use std::sync::Arc;

use common::{test_config, ScriptedTransport, SAMPLE_SCORES};
use synoid_chroma::emotion::{AnalysisError, CdfTable, HslColor, NormalizationStrategy};
use synoid_chroma::state::ServiceState;

#[tokio::test]
async fn test_reference_scores_map_to_expected_color() {
    let transport = ScriptedTransport::new(vec![(200, SAMPLE_SCORES)]);
    let state = ServiceState::with_transport(&test_config(), transport.clone(), None);

    let color = state.pipeline.analyze("What a lovely morning").await.unwrap();
    assert_eq!(color, HslColor { h: 168, s: 64, l: 61 });
    assert_eq!(transport.last_input().as_deref(), Some("What a lovely morning"));
}

#[tokio::test]
async fn test_four_warmups_then_success() {
    let transport = ScriptedTransport::new(vec![
        (503, r#"{"error":"Model is currently loading"}"#),
        (503, r#"{"error":"Model is currently loading"}"#),
        (503, r#"{"error":"Model is currently loading"}"#),
        (503, r#"{"error":"Model is currently loading"}"#),
        (200, SAMPLE_SCORES),
    ]);
    let state = ServiceState::with_transport(&test_config(), transport.clone(), None);

    assert!(state.pipeline.analyze("hi").await.is_ok());
    assert_eq!(transport.calls(), 5);
}

#[tokio::test]
async fn test_five_warmups_fail_without_sixth_attempt() {
    let transport = ScriptedTransport::new(vec![(503, "loading"); 6]);
    let state = ServiceState::with_transport(&test_config(), transport.clone(), None);

    let err = state.pipeline.analyze("hi").await.unwrap_err();
    assert!(matches!(err, AnalysisError::ServiceUnavailable { attempts: 5, .. }));
    assert_eq!(err.category(), "upstream_unavailable");
    assert_eq!(transport.calls(), 5);
}

#[tokio::test]
async fn test_missing_credential_short_circuits() {
    let transport = ScriptedTransport::new(vec![(200, SAMPLE_SCORES)]);
    let mut config = test_config();
    config.api_key = None;
    let state = ServiceState::with_transport(&config, transport.clone(), None);

    let err = state.pipeline.analyze("hi").await.unwrap_err();
    assert_eq!(err.category(), "config");
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_cdf_without_table_fails_closed() {
    let transport = ScriptedTransport::new(vec![(200, SAMPLE_SCORES)]);
    let mut config = test_config();
    config.normalization = NormalizationStrategy::Cdf;
    let state = ServiceState::with_transport(&config, transport.clone(), None);

    let err = state.pipeline.analyze("hi").await.unwrap_err();
    assert!(matches!(err, AnalysisError::NormalizationUnavailable));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_cdf_normalization_end_to_end() {
    // Valence 3.8 sits above 3 of 4 samples, arousal 2.6 above none, dominance 4.1 above all.
    let table = CdfTable::from_samples(
        vec![1.0, 2.0, 3.0, 4.0],
        vec![3.0, 3.5, 4.0, 4.5],
        vec![1.0, 2.0],
    )
    .unwrap();
    let transport = ScriptedTransport::new(vec![(200, SAMPLE_SCORES)]);
    let mut config = test_config();
    config.normalization = NormalizationStrategy::Cdf;
    let state = ServiceState::with_transport(&config, transport, Some(Arc::new(table)));

    let color = state.pipeline.analyze("hi").await.unwrap();
    assert_eq!(color, HslColor { h: 180, s: 40, l: 70 });
}

#[tokio::test]
async fn test_missing_dimension_is_neutral() {
    let transport = ScriptedTransport::new(vec![(
        200,
        r#"[{"label":"V","score":5.0},{"label":"A","score":1.0}]"#,
    )]);
    let state = ServiceState::with_transport(&test_config(), transport, None);

    let color = state.pipeline.analyze("hi").await.unwrap();
    assert_eq!(color, HslColor { h: 240, s: 40, l: 50 });
}

#[tokio::test]
async fn test_malformed_payload_surfaces_body() {
    let transport = ScriptedTransport::new(vec![(200, r#"{"unexpected":"shape"}"#)]);
    let state = ServiceState::with_transport(&test_config(), transport.clone(), None);

    let err = state.pipeline.analyze("hi").await.unwrap_err();
    assert_eq!(err.category(), "malformed_response");
    assert!(err.to_string().contains("unexpected"));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_upstream_error_is_not_retried() {
    let transport = ScriptedTransport::new(vec![(400, "bad input"), (200, SAMPLE_SCORES)]);
    let state = ServiceState::with_transport(&test_config(), transport.clone(), None);

    let err = state.pipeline.analyze("hi").await.unwrap_err();
    assert!(matches!(err, AnalysisError::ServiceError { status: 400, .. }));
    assert_eq!(transport.calls(), 1);
}

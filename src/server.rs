use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use crate::emotion::{AnalysisError, HslColor};
use crate::state::ServiceState;

pub type AppState = Arc<ServiceState>;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub category: String,
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub normalization: String,
    pub cdf_loaded: bool,
    pub credential_configured: bool,
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
}

pub async fn start_server(port: u16, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("🚀 [SERVER] Chroma API listening on http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("[SERVER] Skipping invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            warn!("[SERVER] Rejected analyze body: {}", rejection.body_text());
            return error_response(
                rejection.status(),
                "invalid_request",
                rejection.body_text(),
            );
        }
    };

    info!("[SERVER] Analyze request ({} chars)", request.text.chars().count());

    match state.pipeline.analyze(&request.text).await {
        Ok(color) => Json::<HslColor>(color).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let normalizer = state.pipeline.normalizer();
    Json(HealthResponse {
        status: "ok".to_string(),
        normalization: normalizer.strategy().as_str().to_string(),
        cdf_loaded: normalizer.has_table(),
        credential_configured: state.pipeline.client().has_credential(),
    })
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        error!("[SERVER] Analysis failed [{}]: {}", self.category(), self);
        error_response(status, self.category(), self.to_string())
    }
}

fn error_response(status: StatusCode, category: &str, detail: String) -> Response {
    (
        status,
        Json(ErrorBody {
            category: category.to_string(),
            detail,
        }),
    )
        .into_response()
}

//! HTTP surface for the estimator.
//!
//! One scoring endpoint plus a liveness probe. CORS is fully open on
//! purpose, matching the service's existing dev posture.

use crate::metrics::ServiceMetrics;
use crate::persistence::{record_estimate, EstimateSink};
use crate::scorer::LoadScorer;
use crate::types::{EstimateRecord, LoadRequest, ScoreResult};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared per-request state.
///
/// Everything in here is constructed once at startup and read-only
/// afterwards; requests share it without additional locking.
#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<LoadScorer>,
    pub sink: Option<Arc<dyn EstimateSink>>,
    pub sink_timeout: Duration,
    pub metrics: Arc<ServiceMetrics>,
}

/// Errors surfaced at the HTTP boundary.
///
/// Malformed request bodies are rejected by the extractor before the
/// handler runs; the only handler-level failure is the predictor.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("scoring unavailable")]
    ScoringUnavailable(#[source] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ScoringUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "scoring unavailable"})),
            )
                .into_response(),
        }
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/estimate-load", post(estimate_load))
        .layer(cors)
        .with_state(state)
}

/// Liveness probe.
async fn root() -> Json<serde_json::Value> {
    Json(json!({"message": "Cognitive Load API is running"}))
}

/// Score one request and, when a sink is configured, queue the audit
/// record. The sink write never delays or fails the response.
pub async fn estimate_load(
    State(state): State<AppState>,
    Json(req): Json<LoadRequest>,
) -> Result<Json<ScoreResult>, ApiError> {
    let start = Instant::now();

    let result = state.scorer.score(&req).map_err(|e| {
        state.metrics.record_failure();
        error!(error = %e, "Scoring failed");
        ApiError::ScoringUnavailable(e)
    })?;

    state.metrics.record_request(start.elapsed(), &result);

    if let Some(sink) = &state.sink {
        let record = EstimateRecord::new(req, result.clone());
        record_estimate(sink.clone(), record, state.sink_timeout);
    }

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Predictor;
    use crate::scaler::Standardizer;
    use crate::types::LoadStatus;
    use anyhow::Result;
    use async_trait::async_trait;

    struct NeutralScaler;
    impl Standardizer for NeutralScaler {
        fn transform(&self, _values: [f64; 2]) -> [f64; 2] {
            [0.0, 0.0]
        }
    }

    struct FixedPredictor(f64);
    impl Predictor for FixedPredictor {
        fn predict(&self, _features: &[f32]) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct BrokenPredictor;
    impl Predictor for BrokenPredictor {
        fn predict(&self, _features: &[f32]) -> Result<f64> {
            anyhow::bail!("inference backend gone")
        }
    }

    struct FailingSink;
    #[async_trait]
    impl EstimateSink for FailingSink {
        async fn insert(&self, _record: EstimateRecord) -> Result<()> {
            anyhow::bail!("sink unavailable")
        }
    }

    fn state(predictor: Arc<dyn Predictor>, sink: Option<Arc<dyn EstimateSink>>) -> AppState {
        AppState {
            scorer: Arc::new(LoadScorer::new(Arc::new(NeutralScaler), predictor)),
            sink,
            sink_timeout: Duration::from_millis(500),
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }

    #[tokio::test]
    async fn test_estimate_load_returns_result() {
        let state = state(Arc::new(FixedPredictor(0.5)), None);
        let req = LoadRequest::new(60, 2, "Math");

        let Json(result) = estimate_load(State(state), Json(req)).await.unwrap();
        assert_eq!(result.status, LoadStatus::Medium);
        assert_eq!(result.load_score, 0.5);
    }

    #[tokio::test]
    async fn test_predictor_failure_maps_to_bad_gateway() {
        let state = state(Arc::new(BrokenPredictor), None);
        let req = LoadRequest::new(60, 2, "Math");

        let err = estimate_load(State(state.clone()), Json(req))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            state
                .metrics
                .scoring_failures
                .load(std::sync::atomic::Ordering::Relaxed),
            1
        );
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_change_the_response() {
        let state = state(Arc::new(FixedPredictor(0.5)), Some(Arc::new(FailingSink)));
        let req = LoadRequest::new(60, 2, "Math");

        let Json(result) = estimate_load(State(state), Json(req)).await.unwrap();
        assert_eq!(result.status, LoadStatus::Medium);
        assert_eq!(result.load_score, 0.5);
    }

    #[tokio::test]
    async fn test_root_liveness_message() {
        let Json(body) = root().await;
        assert_eq!(body["message"], "Cognitive Load API is running");
    }
}

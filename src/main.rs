//! Cognitive Load Estimator - Main Entry Point
//!
//! Loads the fitted scaler and ONNX model at startup, optionally
//! connects the MongoDB audit sink, and serves the scoring endpoint.

use anyhow::{Context, Result};
use cognitive_load_estimator::{
    config::AppConfig,
    metrics::{MetricsReporter, ServiceMetrics},
    models::OnnxPredictor,
    persistence::{EstimateSink, MongoSink},
    scaler::StandardScaler,
    scorer::LoadScorer,
    server::{router, AppState},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_tracing(&config)?;
    info!("Starting Cognitive Load Estimator");
    info!(
        model_path = %config.artifacts.model_path,
        scaler_path = %config.artifacts.scaler_path,
        persistence = config.persistence_enabled(),
        "Configuration loaded successfully"
    );

    // Load fitted artifacts; both are startup-fatal when missing
    let scaler = Arc::new(StandardScaler::load(&config.artifacts.scaler_path)?);
    let predictor = Arc::new(OnnxPredictor::new(&config)?);
    let scorer = Arc::new(LoadScorer::new(scaler, predictor));
    info!("Scoring artifacts loaded");

    // Connect the optional persistence sink
    let sink: Option<Arc<dyn EstimateSink>> = if config.persistence_enabled() {
        let sink = MongoSink::connect(&config.persistence).await?;
        Some(Arc::new(sink))
    } else {
        info!("Persistence disabled (no MONGO_URI configured)");
        None
    };

    // Initialize metrics and the periodic reporter
    let metrics = Arc::new(ServiceMetrics::new());
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    let state = AppState {
        scorer,
        sink,
        sink_timeout: Duration::from_millis(config.persistence.timeout_ms),
        metrics,
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, "Listening");

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

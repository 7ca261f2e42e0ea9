//! Cognitive Load Estimator
//!
//! Estimates a cognitive load score from self-reported study session
//! metrics, blending a fitted standardization transform with a
//! pre-trained predictive model, and classifies the result into
//! low / medium / high with fixed advice.

pub mod config;
pub mod features;
pub mod metrics;
pub mod models;
pub mod persistence;
pub mod scaler;
pub mod scorer;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use features::FeatureVector;
pub use models::{OnnxPredictor, Predictor};
pub use persistence::{EstimateSink, MongoSink};
pub use scaler::{StandardScaler, Standardizer};
pub use scorer::LoadScorer;
pub use types::{LoadRequest, LoadStatus, ScoreResult};

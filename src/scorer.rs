//! Score blending and classification.
//!
//! Combines the normalization component (scaler z-scores) with the
//! predictive component (model output) into the final load score.

use crate::features::FeatureVector;
use crate::models::Predictor;
use crate::scaler::Standardizer;
use crate::types::{LoadRequest, LoadStatus, ScoreResult};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Clamp a score into the unit interval.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Round a score to 2 decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Blends the two component scores into one load estimate.
///
/// Both collaborators are constructed once at startup and shared
/// read-only across requests. Scoring itself is synchronous and
/// stateless; the only failure path is the predictor.
pub struct LoadScorer {
    scaler: Arc<dyn Standardizer>,
    predictor: Arc<dyn Predictor>,
}

impl LoadScorer {
    /// Create a scorer over injected scaler and predictor artifacts.
    pub fn new(scaler: Arc<dyn Standardizer>, predictor: Arc<dyn Predictor>) -> Self {
        Self { scaler, predictor }
    }

    /// Component score from standardized focus/fatigue.
    ///
    /// `cl_raw = z_fatigue - z_focus`, remapped from the assumed
    /// z-score range of roughly [-3, 3] into [0, 1]. Values outside
    /// that range saturate at the clamp.
    fn normalization_score(&self, req: &LoadRequest) -> f64 {
        let z = self.scaler.transform([req.focus as f64, req.fatigue as f64]);
        let cl_raw = z[1] - z[0];
        clamp01((cl_raw + 3.0) / 6.0)
    }

    /// Score one request.
    ///
    /// Total over any type-valid input; a predictor failure is the
    /// sole error and maps to a 5xx at the HTTP boundary.
    pub fn score(&self, req: &LoadRequest) -> Result<ScoreResult> {
        let features = FeatureVector::from_request(req);
        let cl_score = self.normalization_score(req);
        let model_pred = self.predictor.predict(&features.to_model_input())?;

        // Unweighted average; reweighting is deliberately not a
        // configuration point.
        let final_score = clamp01((cl_score + model_pred) / 2.0);

        // Classify on the unrounded score; rounding is presentation
        // only.
        let status = LoadStatus::from_score(final_score);
        let load_score = round2(final_score);

        debug!(
            cl_score = cl_score,
            model_pred = model_pred,
            final_score = final_score,
            load_score = load_score,
            status = status.as_str(),
            "Request scored"
        );

        Ok(ScoreResult {
            status,
            load_score,
            message: status.message().to_string(),
            recommendation: status.recommendation().to_string(),
        })
    }
}

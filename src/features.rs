//! Feature engineering for load model inference.
//!
//! This module derives the model input features from a raw request,
//! matching the preprocessing done in the Python training pipeline.
//! Features are produced in the exact order expected by the ONNX model.

use crate::types::LoadRequest;

/// Number of features fed to the predictive model.
pub const MODEL_FEATURE_COUNT: usize = 10;

/// Minutes at or above which a session counts as a long session.
pub const LONG_SESSION_MINUTES: i64 = 90;

/// Map a subject string to its trained category id.
///
/// The category set is closed; anything unrecognized (including
/// case mismatches) falls through to Other. Never an error.
pub fn subject_category(subject: &str) -> i64 {
    match subject {
        "Coding" => 0,
        "Math" => 1,
        "Reading" => 2,
        "Science" => 3,
        _ => 4,
    }
}

/// Engineered features for one request.
///
/// Derived fresh on every call and never persisted on its own.
/// Construction is pure and total: every input, however odd-looking,
/// produces a defined vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub num_sessions: i64,
    pub total_time: i64,
    pub duration_missing: i64,
    pub long_session: i64,
    pub avg_session_length: f64,
    /// Not collected by the frontend yet; always 0
    pub switch_rate: f64,
    /// Placeholder signal; always 0
    pub break_score: f64,
    /// Placeholder signal; always 0
    pub deadline_weight: f64,
    pub late_night: i64,
    pub subject_category: i64,
}

impl FeatureVector {
    /// Derive the feature vector from a raw request.
    pub fn from_request(req: &LoadRequest) -> Self {
        let avg_session_length = if req.num_sessions > 0 {
            req.total_time as f64 / req.num_sessions as f64
        } else {
            0.0
        };
        let long_session = if req.total_time >= LONG_SESSION_MINUTES {
            1
        } else {
            0
        };

        Self {
            num_sessions: req.num_sessions,
            total_time: req.total_time,
            duration_missing: req.duration_missing,
            long_session,
            avg_session_length,
            switch_rate: 0.0,
            break_score: 0.0,
            deadline_weight: 0.0,
            late_night: req.late_night,
            subject_category: subject_category(&req.subject),
        }
    }

    /// Lay the features out in model input order.
    ///
    /// The model was fit against exactly this ordering; do not reorder.
    pub fn to_model_input(&self) -> Vec<f32> {
        vec![
            self.num_sessions as f32,
            self.total_time as f32,
            self.duration_missing as f32,
            self.long_session as f32,
            self.avg_session_length as f32,
            self.switch_rate as f32,
            self.break_score as f32,
            self.deadline_weight as f32,
            self.late_night as f32,
            self.subject_category as f32,
        ]
    }

    /// Feature names in model input order.
    pub fn feature_names() -> [&'static str; MODEL_FEATURE_COUNT] {
        [
            "num_sessions",
            "total_time",
            "duration_missing",
            "long_session",
            "avg_session_length",
            "switch_rate",
            "break_score",
            "deadline_weight",
            "late_night",
            "subject_category",
        ]
    }
}

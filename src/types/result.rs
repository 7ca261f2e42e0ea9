//! Estimate result and persistence record types

use crate::types::request::LoadRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lower bound of the medium tier.
pub const MEDIUM_THRESHOLD: f64 = 0.40;
/// Lower bound of the high tier.
pub const HIGH_THRESHOLD: f64 = 0.65;

/// Load status classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Low,
    Medium,
    High,
}

impl LoadStatus {
    /// Determine the status tier for a blended score.
    ///
    /// The partition is total over [0, 1]: scores below 0.4 are low,
    /// [0.4, 0.65) is medium, and 0.65 upward is high.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            LoadStatus::High
        } else if score >= MEDIUM_THRESHOLD {
            LoadStatus::Medium
        } else {
            LoadStatus::Low
        }
    }

    /// Fixed user-facing message for this tier.
    pub fn message(&self) -> &'static str {
        match self {
            LoadStatus::Low => "You seem mentally fine today.",
            LoadStatus::Medium => "You seem mentally stretched.",
            LoadStatus::High => "You seem mentally overloaded.",
        }
    }

    /// Fixed recommendation for this tier.
    pub fn recommendation(&self) -> &'static str {
        match self {
            LoadStatus::Low => "You can continue studying normally.",
            LoadStatus::Medium => "Consider a short break or lighter work.",
            LoadStatus::High => "Take a real break or stop studying for today.",
        }
    }

    /// Lowercase name, for metrics labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Low => "low",
            LoadStatus::Medium => "medium",
            LoadStatus::High => "high",
        }
    }
}

/// Final estimate returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Status tier classification
    pub status: LoadStatus,

    /// Blended score, clamped to [0, 1] and rounded to 2 decimals
    pub load_score: f64,

    /// Fixed message for the tier
    pub message: String,

    /// Fixed advice for the tier
    pub recommendation: String,
}

impl ScoreResult {
    /// Build a result from an already clamped and rounded score.
    pub fn from_score(load_score: f64) -> Self {
        let status = LoadStatus::from_score(load_score);
        Self {
            status,
            load_score,
            message: status.message().to_string(),
            recommendation: status.recommendation().to_string(),
        }
    }
}

/// Append-only audit record written to the persistence sink.
///
/// Written once per request and never read back by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRecord {
    /// Identifier supplied by the client, if any
    pub email: Option<String>,

    /// The request exactly as received
    pub raw_input: LoadRequest,

    /// The result exactly as returned
    pub result: ScoreResult,

    /// Record creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl EstimateRecord {
    /// Create a record for one request/response pair.
    pub fn new(raw_input: LoadRequest, result: ScoreResult) -> Self {
        Self {
            email: raw_input.email.clone(),
            raw_input,
            result,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_score_tiers() {
        assert_eq!(LoadStatus::from_score(0.0), LoadStatus::Low);
        assert_eq!(LoadStatus::from_score(0.39), LoadStatus::Low);
        assert_eq!(LoadStatus::from_score(0.4), LoadStatus::Medium);
        assert_eq!(LoadStatus::from_score(0.5), LoadStatus::Medium);
        assert_eq!(LoadStatus::from_score(0.64), LoadStatus::Medium);
        assert_eq!(LoadStatus::from_score(0.65), LoadStatus::High);
        assert_eq!(LoadStatus::from_score(1.0), LoadStatus::High);
    }

    #[test]
    fn test_partition_is_total_over_unit_interval() {
        // Every score in [0, 1] lands in exactly one tier.
        for i in 0..=100 {
            let score = i as f64 / 100.0;
            let _ = LoadStatus::from_score(score);
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LoadStatus::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&LoadStatus::Low).unwrap(), "\"low\"");
    }

    #[test]
    fn test_score_result_serialization() {
        let result = ScoreResult::from_score(0.5);

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: ScoreResult = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.status, LoadStatus::Medium);
        assert_eq!(deserialized.load_score, 0.5);
        assert_eq!(deserialized.message, "You seem mentally stretched.");
        assert_eq!(
            deserialized.recommendation,
            "Consider a short break or lighter work."
        );
    }

    #[test]
    fn test_estimate_record_copies_email() {
        let mut req = LoadRequest::new(60, 2, "Math");
        req.email = Some("student@example.com".to_string());

        let record = EstimateRecord::new(req, ScoreResult::from_score(0.2));
        assert_eq!(record.email.as_deref(), Some("student@example.com"));
        assert_eq!(record.result.status, LoadStatus::Low);
    }
}

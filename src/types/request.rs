//! Incoming estimate request

use serde::{Deserialize, Serialize};

/// Self-reported study session metrics for one load estimate.
///
/// Fields are accepted as-is: out-of-range focus/fatigue, negative
/// minutes, or an unknown subject never fail a request. Substitution
/// happens downstream in the feature builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Total study time in minutes
    pub total_time: i64,

    /// Number of study sessions the time was split across
    pub num_sessions: i64,

    /// Subject studied (closed category set; anything else maps to Other)
    pub subject: String,

    /// Self-rated focus, nominally 1-5
    pub focus: i64,

    /// Self-rated fatigue, nominally 1-5
    pub fatigue: i64,

    /// 1 if the session ran late at night, else 0
    pub late_night: i64,

    /// 1 if the duration was not recorded and was backfilled
    #[serde(default)]
    pub duration_missing: i64,

    /// Optional identifier, used only for the persistence record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl LoadRequest {
    /// Create a request with neutral ratings, mainly for tests.
    pub fn new(total_time: i64, num_sessions: i64, subject: &str) -> Self {
        Self {
            total_time,
            num_sessions,
            subject: subject.to_string(),
            focus: 3,
            fatigue: 3,
            late_night: 0,
            duration_missing: 0,
            email: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_missing_defaults_to_zero() {
        let json = r#"{
            "total_time": 60,
            "num_sessions": 2,
            "subject": "Math",
            "focus": 4,
            "fatigue": 2,
            "late_night": 0
        }"#;

        let req: LoadRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.duration_missing, 0);
        assert_eq!(req.email, None);
    }

    #[test]
    fn test_email_accepted_when_present() {
        let json = r#"{
            "total_time": 120,
            "num_sessions": 3,
            "subject": "Coding",
            "focus": 2,
            "fatigue": 5,
            "late_night": 1,
            "duration_missing": 1,
            "email": "student@example.com"
        }"#;

        let req: LoadRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.email.as_deref(), Some("student@example.com"));
        assert_eq!(req.late_night, 1);
    }

    #[test]
    fn test_wrong_field_type_is_rejected_at_the_boundary() {
        let json = r#"{
            "total_time": "sixty",
            "num_sessions": 2,
            "subject": "Math",
            "focus": 4,
            "fatigue": 2,
            "late_night": 0
        }"#;

        assert!(serde_json::from_str::<LoadRequest>(json).is_err());
    }
}

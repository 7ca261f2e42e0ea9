//! Type definitions for the cognitive load estimator

pub mod request;
pub mod result;

pub use request::LoadRequest;
pub use result::{EstimateRecord, LoadStatus, ScoreResult};


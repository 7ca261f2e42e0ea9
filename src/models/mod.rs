//! ML model inference components

pub mod inference;
pub mod loader;

pub use inference::{OnnxPredictor, Predictor};
pub use loader::ModelLoader;

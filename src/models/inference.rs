//! Predictive scorer backed by the pre-trained ONNX model.
//!
//! The model is a black box: it was fit offline against the 10-feature
//! input layout produced by [`crate::features::FeatureVector`] and is
//! consumed here only through its numeric contract
//! (`predict(10-element vector) -> scalar in [0, 1]`).

use crate::config::AppConfig;
use crate::features::MODEL_FEATURE_COUNT;
use crate::models::loader::{LoadedModel, ModelLoader};
use anyhow::{bail, Context, Result};
use std::sync::Mutex;
use tracing::debug;

/// Prediction contract for the load model.
pub trait Predictor: Send + Sync {
    /// Predict a load score in [0, 1] from the model feature vector.
    fn predict(&self, features: &[f32]) -> Result<f64>;
}

/// ONNX-backed predictor.
///
/// The session is loaded once at startup and shared read-only across
/// requests; the lock exists only because running a session needs
/// exclusive access.
pub struct OnnxPredictor {
    model: Mutex<LoadedModel>,
}

impl OnnxPredictor {
    /// Load the predictor from configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::from_path(&config.artifacts.model_path, config.models.onnx_threads)
    }

    /// Load the predictor from an explicit artifact path.
    pub fn from_path(model_path: &str, onnx_threads: usize) -> Result<Self> {
        let loader = ModelLoader::with_threads(onnx_threads)?;
        let model = loader.load_model(model_path)?;

        Ok(Self {
            model: Mutex::new(model),
        })
    }

    /// Extract the prediction scalar from the output tensor.
    ///
    /// Handles both a regression output (`[1, 1]` or `[1]`) and a
    /// two-class probability output (`[1, 2]`, positive class at
    /// index 1).
    fn extract_scalar(dims: &[i64], data: &[f32]) -> Result<f64> {
        let value = match dims {
            [_, n] if *n >= 2 => data.get(1),
            [_, 1] => data.first(),
            [n] if *n >= 2 => data.get(1),
            [1] => data.first(),
            _ => data.last(),
        };

        match value {
            Some(&v) => Ok(v as f64),
            None => bail!("Model returned an empty output tensor"),
        }
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, features: &[f32]) -> Result<f64> {
        use ort::value::Tensor;

        if features.len() != MODEL_FEATURE_COUNT {
            bail!(
                "Model expects {} features, got {}",
                MODEL_FEATURE_COUNT,
                features.len()
            );
        }

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .context("Failed to create input tensor")?;

        let mut model = self
            .model
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let input_name = model.input_name.clone();
        let output_name = model.output_name.clone();

        let outputs = model
            .session
            .run(ort::inputs![input_name.as_str() => input_tensor])?;

        // Prefer the resolved output, fall back to scanning all outputs.
        if let Some(output) = outputs.get(output_name.as_str()) {
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                let pred = Self::extract_scalar(&dims, data)?;
                debug!(output = %output_name, pred = pred, "Extracted model prediction");
                return Ok(pred.clamp(0.0, 1.0));
            }
        }

        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                let pred = Self::extract_scalar(&dims, data)?;
                debug!(output = %name, pred = pred, "Extracted model prediction (fallback)");
                return Ok(pred.clamp(0.0, 1.0));
            }
        }

        bail!("Model produced no extractable prediction output")
    }
}

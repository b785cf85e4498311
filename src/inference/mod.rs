//! Model invocation
//!
//! The trained classifier is an external artifact. It is reached only through
//! the `Classifier` trait; `ModelStore` owns the loaded instance and reloads it
//! when the artifact file is replaced.

pub mod onnx;
pub mod store;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::features::FeatureRow;

pub use onnx::OnnxLoader;
pub use store::{ModelStatus, ModelStore};

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("feature row does not match the model schema: {0}")]
    Schema(String),

    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("model returned unexpected label {0}")]
    InvalidLabel(i64),
}

/// A loaded classifier: one feature row in, one class label out
pub trait Classifier: Send {
    fn predict(&mut self, row: &FeatureRow) -> Result<i64, InferenceError>;
}

/// Builds a classifier from an artifact on disk
pub trait ModelLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Box<dyn Classifier>, InferenceError>;
}

//! ONNX Runtime classifier
//!
//! Expects a classifier export with a single float input of shape
//! `[N, FEATURE_COUNT]`. The class comes from the int64 `label` output, or the
//! first output when there is none; float outputs are rounded.
//! Test graphs live in `tests/fixtures/`.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;

use super::{Classifier, InferenceError, ModelLoader};
use crate::features::{FeatureRow, FEATURE_COUNT};

/// Name of the class-label output in classifier exports
const LABEL_OUTPUT: &str = "label";

pub struct OnnxClassifier {
    session: Session,
    label_output: String,
}

impl OnnxClassifier {
    pub fn from_file(path: &Path) -> Result<Self, InferenceError> {
        tracing::info!(path = %path.display(), "Loading ONNX model");

        if !path.exists() {
            return Err(InferenceError::ArtifactMissing(path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::Load(format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Load(format!("optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| InferenceError::Load(e.to_string()))?;

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name == LABEL_OUTPUT)
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Schema("model defines no outputs".to_string()))?;

        tracing::info!(
            inputs = session.inputs.len(),
            output = %label_output,
            "ONNX model loaded"
        );

        Ok(Self {
            session,
            label_output,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&mut self, row: &FeatureRow) -> Result<i64, InferenceError> {
        let input = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), row.as_slice().to_vec())
            .map_err(|e| InferenceError::Schema(e.to_string()))?;

        let input_tensor = Value::from_array(input)
            .map_err(|e| InferenceError::Runtime(format!("tensor: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let output = outputs
            .get(&self.label_output)
            .ok_or_else(|| InferenceError::Runtime(format!("missing output {}", self.label_output)))?;

        // Classifier exports emit int64 labels; regressors squeezed into a label
        // output come back as floats.
        let label = if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            data.first().copied()
        } else if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            data.first().map(|v| v.round() as i64)
        } else {
            return Err(InferenceError::Schema(format!(
                "output {} is not a numeric tensor",
                self.label_output
            )));
        };

        label.ok_or_else(|| InferenceError::Runtime("empty prediction".to_string()))
    }
}

/// Production loader
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxLoader;

impl ModelLoader for OnnxLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn Classifier>, InferenceError> {
        Ok(Box::new(OnnxClassifier::from_file(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn row_with_risk(risk: f32) -> FeatureRow {
        let mut row = FeatureRow::new();
        assert!(row.set_by_name("AttritionRisk", risk));
        row
    }

    #[test]
    fn test_missing_artifact() {
        let err = OnnxLoader
            .load(Path::new("does/not/exist.onnx"))
            .err()
            .unwrap();
        assert!(matches!(err, InferenceError::ArtifactMissing(_)));
    }

    #[test]
    fn test_prefers_label_output() {
        // First output echoes the risk column; only `label` is the class
        let mut model = OnnxClassifier::from_file(&fixture("risk_classifier.onnx")).unwrap();
        assert_eq!(model.label_output, "label");

        assert_eq!(model.predict(&row_with_risk(3.0)).unwrap(), 1);
        assert_eq!(model.predict(&row_with_risk(1.0)).unwrap(), 0);
    }

    #[test]
    fn test_falls_back_to_first_output_and_rounds() {
        // variable = 0.4 * AttritionRisk
        let mut model = OnnxClassifier::from_file(&fixture("risk_score.onnx")).unwrap();
        assert_eq!(model.label_output, "variable");

        assert_eq!(model.predict(&row_with_risk(2.0)).unwrap(), 1);
        assert_eq!(model.predict(&row_with_risk(1.0)).unwrap(), 0);
    }

    #[test]
    fn test_rejects_model_with_other_width() {
        let mut model = OnnxClassifier::from_file(&fixture("narrow_classifier.onnx")).unwrap();

        let err = model.predict(&FeatureRow::new()).unwrap_err();
        assert!(matches!(err, InferenceError::Runtime(_)));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"not a model").unwrap();

        let err = OnnxLoader.load(&path).err().unwrap();
        assert!(matches!(err, InferenceError::Load(_)));
    }

    #[test]
    fn test_store_serves_onnx_model() {
        let store = crate::inference::ModelStore::onnx(fixture("risk_classifier.onnx"));

        assert_eq!(store.predict(&row_with_risk(2.0)).unwrap(), 1);
        assert_eq!(store.predict(&row_with_risk(0.0)).unwrap(), 0);
        assert_eq!(store.status().load_count, 1);
    }
}

//! Process-wide model handle with reload-on-replacement.
//!
//! The artifact is loaded once and kept. Each prediction stats the artifact
//! file; when its modification time, size or (on unix) inode and change time
//! differ the model is reloaded before use. The change time cannot be set
//! back by copy tools that preserve timestamps. A missing artifact fails the prediction even if a model is
//! still cached.

use std::io::ErrorKind;
#[cfg(unix)]
use std::os::unix::fs::MetadataExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use super::{Classifier, InferenceError, ModelLoader, OnnxLoader};
use crate::features::FeatureRow;

/// Identity of the artifact file as seen on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
    #[cfg(unix)]
    inode: u64,
    #[cfg(unix)]
    changed: (i64, i64),
}

struct LoadedModel {
    classifier: Box<dyn Classifier>,
    fingerprint: Fingerprint,
    loaded_at: DateTime<Utc>,
}

/// Model status for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub model_loaded: bool,
    pub model_path: String,
    pub loaded_at: Option<DateTime<Utc>>,
    pub load_count: u64,
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

pub struct ModelStore {
    path: PathBuf,
    loader: Box<dyn ModelLoader>,
    // ONNX sessions need exclusive access to run
    slot: Mutex<Option<LoadedModel>>,
    load_count: AtomicU64,
    inference_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>, loader: Box<dyn ModelLoader>) -> Self {
        Self {
            path: path.into(),
            loader,
            slot: Mutex::new(None),
            load_count: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    /// Store backed by ONNX Runtime
    pub fn onnx(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Box::new(OnnxLoader))
    }

    /// Load the artifact now instead of on the first request
    pub fn preload(&self) -> Result<(), InferenceError> {
        let fingerprint = self.fingerprint()?;
        let mut slot = self.slot.lock();
        self.reload(&mut slot, fingerprint)
    }

    /// Predict the class label for one row
    pub fn predict(&self, row: &FeatureRow) -> Result<i64, InferenceError> {
        if !row.is_compatible() {
            return Err(InferenceError::Schema(format!(
                "row built for layout v{} ({:08x})",
                row.version, row.layout_hash
            )));
        }

        let start = Instant::now();
        let fingerprint = self.fingerprint()?;

        let mut slot = self.slot.lock();
        let stale = slot
            .as_ref()
            .map_or(true, |model| model.fingerprint != fingerprint);
        if stale {
            self.reload(&mut slot, fingerprint)?;
        }

        let model = slot
            .as_mut()
            .ok_or_else(|| InferenceError::Load("model not loaded".to_string()))?;
        let label = model.classifier.predict(row)?;
        drop(slot);

        if !(0..=1).contains(&label) {
            return Err(InferenceError::InvalidLabel(label));
        }

        self.inference_count.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_us
            .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);

        Ok(label)
    }

    pub fn status(&self) -> ModelStatus {
        let loaded_at = self.slot.lock().as_ref().map(|m| m.loaded_at);

        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        ModelStatus {
            model_loaded: loaded_at.is_some(),
            model_path: self.path.display().to_string(),
            loaded_at,
            load_count: self.load_count.load(Ordering::Relaxed),
            inference_count: count,
            avg_latency_ms: avg,
        }
    }

    fn fingerprint(&self) -> Result<Fingerprint, InferenceError> {
        let meta = std::fs::metadata(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => InferenceError::ArtifactMissing(self.path.clone()),
            _ => InferenceError::Load(format!("{}: {}", self.path.display(), e)),
        })?;

        Ok(Fingerprint {
            modified: meta.modified().ok(),
            len: meta.len(),
            #[cfg(unix)]
            inode: meta.ino(),
            #[cfg(unix)]
            changed: (meta.ctime(), meta.ctime_nsec()),
        })
    }

    fn reload(
        &self,
        slot: &mut Option<LoadedModel>,
        fingerprint: Fingerprint,
    ) -> Result<(), InferenceError> {
        let replacing = slot.is_some();
        // A failed reload must not leave the old model serving
        *slot = None;

        let classifier = self.loader.load(&self.path)?;
        self.load_count.fetch_add(1, Ordering::Relaxed);

        if replacing {
            tracing::info!(path = %self.path.display(), "Model artifact replaced, reloaded");
        } else {
            tracing::info!(path = %self.path.display(), "Model artifact loaded");
        }

        *slot = Some(LoadedModel {
            classifier,
            fingerprint,
            loaded_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::testing::{BrokenLoader, CountingLoader};
    use std::fs;

    fn artifact(dir: &tempfile::TempDir, contents: &[u8]) -> PathBuf {
        let path = dir.path().join("model.onnx");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_loads_once_for_many_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CountingLoader::default();
        let store = ModelStore::new(artifact(&dir, b"v1"), Box::new(loader.clone()));

        for _ in 0..5 {
            store.predict(&FeatureRow::new()).unwrap();
        }

        assert_eq!(loader.load_count(), 1);
        assert_eq!(store.status().inference_count, 5);
    }

    #[test]
    fn test_reloads_when_artifact_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CountingLoader::default();
        let path = artifact(&dir, b"v1");
        let store = ModelStore::new(&path, Box::new(loader.clone()));

        store.predict(&FeatureRow::new()).unwrap();
        fs::write(&path, b"version two").unwrap();
        store.predict(&FeatureRow::new()).unwrap();

        assert_eq!(loader.load_count(), 2);
        assert_eq!(store.status().load_count, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_reloads_when_same_size_artifact_keeps_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CountingLoader::default();
        let path = artifact(&dir, b"AAAA");
        let store = ModelStore::new(&path, Box::new(loader.clone()));

        store.predict(&FeatureRow::new()).unwrap();
        let original_mtime = fs::metadata(&path).unwrap().modified().unwrap();

        // Let the coarse filesystem clock tick past the first write
        std::thread::sleep(std::time::Duration::from_millis(50));
        fs::write(&path, b"BBBB").unwrap();
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(original_mtime)
            .unwrap();
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), original_mtime);

        store.predict(&FeatureRow::new()).unwrap();
        assert_eq!(loader.load_count(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_reloads_when_artifact_renamed_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CountingLoader::default();
        let path = artifact(&dir, b"AAAA");
        let store = ModelStore::new(&path, Box::new(loader.clone()));

        store.predict(&FeatureRow::new()).unwrap();
        let original_mtime = fs::metadata(&path).unwrap().modified().unwrap();

        let staged = dir.path().join("model.onnx.new");
        fs::write(&staged, b"BBBB").unwrap();
        fs::File::options()
            .write(true)
            .open(&staged)
            .unwrap()
            .set_modified(original_mtime)
            .unwrap();
        fs::rename(&staged, &path).unwrap();

        store.predict(&FeatureRow::new()).unwrap();
        assert_eq!(loader.load_count(), 2);
    }

    #[test]
    fn test_missing_artifact_fails_even_when_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact(&dir, b"v1");
        let store = ModelStore::new(&path, Box::new(CountingLoader::default()));

        store.preload().unwrap();
        assert!(store.status().model_loaded);

        fs::remove_file(&path).unwrap();
        let err = store.predict(&FeatureRow::new()).unwrap_err();
        assert!(matches!(err, InferenceError::ArtifactMissing(_)));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(artifact(&dir, b"garbage"), Box::new(BrokenLoader));

        let err = store.predict(&FeatureRow::new()).unwrap_err();
        assert!(matches!(err, InferenceError::Load(_)));
        assert!(!store.status().model_loaded);
    }

    #[test]
    fn test_rejects_out_of_range_label() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CountingLoader {
            fixed_label: Some(7),
            ..Default::default()
        };
        let store = ModelStore::new(artifact(&dir, b"v1"), Box::new(loader));

        let err = store.predict(&FeatureRow::new()).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidLabel(7)));
    }

    #[test]
    fn test_rejects_row_from_other_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(artifact(&dir, b"v1"), Box::new(CountingLoader::default()));

        let mut row = FeatureRow::new();
        row.version += 1;
        let err = store.predict(&row).unwrap_err();
        assert!(matches!(err, InferenceError::Schema(_)));
    }

    #[test]
    fn test_status_before_load() {
        let store = ModelStore::new("nowhere.onnx", Box::new(CountingLoader::default()));
        let status = store.status();
        assert!(!status.model_loaded);
        assert_eq!(status.model_path, "nowhere.onnx");
        assert_eq!(status.avg_latency_ms, 0.0);
    }
}

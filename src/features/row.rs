//! Feature Row - the model's input
//!
//! Carries the layout version and hash it was built against, so a row can
//! always be checked against the layout the running process uses.

use super::layout::{feature_index, layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};

/// Versioned feature row in the order defined by `FEATURE_LAYOUT`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout
    pub layout_hash: u32,
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureRow {
    /// Zeroed row with the current layout
    pub fn new() -> Self {
        Self::from_values([0.0; FEATURE_COUNT])
    }

    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Set feature by name. Returns false for names outside the layout.
    #[cfg(test)]
    pub fn set_by_name(&mut self, name: &str, value: f32) -> bool {
        match feature_index(name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Mutable view of `width` columns starting at `offset`
    pub(crate) fn group_mut(&mut self, offset: usize, width: usize) -> &mut [f32] {
        &mut self.values[offset..offset + width]
    }

    /// Check this row was built against the running layout
    pub fn is_compatible(&self) -> bool {
        self.version == FEATURE_VERSION && self.layout_hash == layout_hash()
    }

    /// Named values for debug logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

impl Default for FeatureRow {
    fn default() -> Self {
        Self::new()
    }
}

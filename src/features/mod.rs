//! Feature engineering
//!
//! Turns a validated employee record into the fixed-width row the classifier
//! was trained on.

pub mod layout;
pub mod row;
pub mod transform;
pub mod vocab;

pub use layout::{LayoutInfo, FEATURE_COUNT};
pub use row::FeatureRow;
pub use transform::build_row;

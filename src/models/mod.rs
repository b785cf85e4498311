//! Request and response models

pub mod record;
pub mod prediction;

pub use record::{EmployeeRecord, Payload, ValidationError};
pub use prediction::PredictionResponse;

//! Prediction response model

use serde::{Deserialize, Serialize};

/// Body of a successful `POST /result/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: i64,
}

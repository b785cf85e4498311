//! Model schema handler

use axum::Json;

use crate::features::LayoutInfo;

/// Feature layout the running service feeds the model
pub async fn layout() -> Json<LayoutInfo> {
    Json(LayoutInfo::current())
}

//! Request handlers, one module per media domain.

pub mod audio;
pub mod image;
pub mod pdf;
pub mod video;

use axum::Json;

/// Health check endpoint for monitoring and load balancing.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

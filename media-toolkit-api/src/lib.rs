//! # media-toolkit-api
//!
//! REST API server for the media-toolkit library: image conversion, PDF
//! merge/split, audio extraction and video splitting/compression.
//!

mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod upload;

pub use app::app;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorResponse};

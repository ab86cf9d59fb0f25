//! Application router.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{self, audio, image, pdf, video};

/// Build the application router with all routes configured.
pub fn app(config: &ApiConfig) -> Router {
    let image_routes = Router::new()
        .route("/formats", get(image::list_formats))
        .route("/info", post(image::info))
        .route("/convert", post(image::convert))
        .route("/convert-bulk", post(image::convert_bulk));

    let pdf_routes = Router::new()
        .route("/info", post(pdf::info))
        .route("/merge", post(pdf::merge))
        .route("/split", post(pdf::split));

    let audio_routes = Router::new()
        .route("/formats", get(audio::list_formats))
        .route("/info", post(audio::info))
        .route("/extract", post(audio::extract));

    let video_routes = Router::new()
        .route("/info", post(video::info))
        .route("/split", post(video::split))
        .route("/info-local", post(video::info_local))
        .route("/split-local", post(video::split_local))
        .route("/split-local-to-folder", post(video::split_local_to_folder))
        .route("/preview-local", post(video::preview_local))
        .route("/compress/target-size", post(video::compress_target_size))
        .route("/compress/quality", post(video::compress_quality))
        .route("/compress/resolution", post(video::compress_resolution))
        .route("/compress/estimate", post(video::compress_estimate))
        .route("/compress/options", get(video::compress_options));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/image", image_routes)
        .nest("/api/pdf", pdf_routes)
        .nest("/api/audio", audio_routes)
        .nest("/api/video", video_routes)
        // Uploads can be large; disable axum's built-in cap and enforce
        // the configured one instead.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

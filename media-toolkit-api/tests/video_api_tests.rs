//! Tests for the audio and video routes.
//!
//! These endpoints ultimately shell out to ffmpeg, so the tests here
//! cover listings, upload validation and local-path validation, which
//! all short-circuit before any external tool runs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use media_toolkit_api::{app, ApiConfig, ErrorResponse};
use tower::util::ServiceExt;

const BOUNDARY: &str = "mediatoolkitboundary";

fn test_app() -> axum::Router {
    app(&ApiConfig::default())
}

fn multipart_body(files: &[(&str, &str, &[u8])], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn error_body(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    error.error
}

mod audio_routes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_formats_and_bitrates() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/audio/formats")
                    .method("GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;

        let formats = json["formats"].as_array().unwrap();
        assert_eq!(formats.len(), 5);
        assert_eq!(formats[0]["value"], "mp3");
        assert_eq!(formats[0]["label"], "MP3");
        assert_eq!(formats[0]["mime"], "audio/mpeg");
        assert_eq!(formats[2]["value"], "wav");

        let bitrates = json["bitrates"].as_array().unwrap();
        assert_eq!(bitrates.len(), 5);
        assert_eq!(bitrates[0]["value"], "64");
        assert_eq!(bitrates[4]["label"], "320 kbps");
    }

    #[tokio::test]
    async fn test_info_rejects_non_video_upload() {
        let body = multipart_body(&[("file", "track.mp3", b"ID3 tag bytes")], &[]);

        let response = test_app()
            .oneshot(multipart_request("/api/audio/info", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_body(response)
            .await
            .starts_with("Invalid file type. Allowed video formats:"));
    }

    #[tokio::test]
    async fn test_extract_rejects_unknown_output_format() {
        let body = multipart_body(
            &[("file", "clip.mp4", b"not really a video")],
            &[("output_format", "wma")],
        );

        let response = test_app()
            .oneshot(multipart_request("/api/audio/extract", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(response).await,
            "Invalid output format. Allowed: mp3, aac, wav, flac, ogg"
        );
    }

    #[tokio::test]
    async fn test_extract_rejects_non_video_upload() {
        let body = multipart_body(
            &[("file", "document.pdf", b"%PDF-1.5")],
            &[("output_format", "mp3")],
        );

        let response = test_app()
            .oneshot(multipart_request("/api/audio/extract", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extract_requires_a_file() {
        let body = multipart_body(&[], &[("output_format", "mp3")]);

        let response = test_app()
            .oneshot(multipart_request("/api/audio/extract", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await, "No file provided in upload");
    }
}

mod video_upload_routes {
    use super::*;

    #[tokio::test]
    async fn test_info_rejects_non_video_upload() {
        let body = multipart_body(&[("file", "slides.pptx", b"zip-ish bytes")], &[]);

        let response = test_app()
            .oneshot(multipart_request("/api/video/info", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = error_body(response).await;
        assert!(error.starts_with("Invalid file type. Allowed:"));
        assert!(error.contains(".mp4"));
        assert!(error.contains(".mkv"));
    }

    #[tokio::test]
    async fn test_split_rejects_non_video_upload() {
        let body = multipart_body(
            &[("file", "notes.txt", b"plain text")],
            &[("num_parts", "3")],
        );

        let response = test_app()
            .oneshot(multipart_request("/api/video/split", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

mod local_path_routes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_info_local_missing_file() {
        let response = test_app()
            .oneshot(json_request(
                "/api/video/info-local",
                serde_json::json!({"file_path": "/missing/clip.mp4"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            error_body(response).await,
            "File not found: /missing/clip.mp4"
        );
    }

    #[tokio::test]
    async fn test_info_local_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake.mp4");
        std::fs::create_dir(&fake).unwrap();

        let response = test_app()
            .oneshot(json_request(
                "/api/video/info-local",
                serde_json::json!({"file_path": fake.display().to_string()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_body(response).await.starts_with("Not a file:"));
    }

    #[tokio::test]
    async fn test_info_local_rejects_non_video_extension() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"plain text").unwrap();

        let response = test_app()
            .oneshot(json_request(
                "/api/video/info-local",
                serde_json::json!({"file_path": notes.display().to_string()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_body(response)
            .await
            .starts_with("Invalid file type. Allowed:"));
    }

    #[tokio::test]
    async fn test_split_local_missing_file() {
        let response = test_app()
            .oneshot(json_request(
                "/api/video/split-local",
                serde_json::json!({"file_path": "/missing/clip.mp4", "num_parts": 3}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_split_local_to_folder_missing_file() {
        let response = test_app()
            .oneshot(json_request(
                "/api/video/split-local-to-folder",
                serde_json::json!({
                    "file_path": "/missing/clip.mp4",
                    "num_parts": 2,
                    "output_folder": "/tmp/parts"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_local_missing_file() {
        let response = test_app()
            .oneshot(json_request(
                "/api/video/preview-local",
                serde_json::json!({"file_path": "/missing/clip.mp4", "num_parts": 4}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod compression_routes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_compress_options_listing() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/video/compress/options")
                    .method("GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(
            json["quality_presets"],
            serde_json::json!(["high", "medium", "low"])
        );
        assert_eq!(
            json["resolutions"],
            serde_json::json!(["2160p", "1440p", "1080p", "720p", "480p", "360p"])
        );
    }

    #[tokio::test]
    async fn test_target_size_missing_file() {
        let response = test_app()
            .oneshot(json_request(
                "/api/video/compress/target-size",
                serde_json::json!({"file_path": "/missing/clip.mp4", "target_size_mb": 25.0}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_quality_missing_file() {
        let response = test_app()
            .oneshot(json_request(
                "/api/video/compress/quality",
                serde_json::json!({"file_path": "/missing/clip.mp4", "quality": "high"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resolution_rejects_off_ladder_name() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&clip, b"not really a video").unwrap();

        let response = test_app()
            .oneshot(json_request(
                "/api/video/compress/resolution",
                serde_json::json!({
                    "file_path": clip.display().to_string(),
                    "resolution": "999p"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(response).await,
            "Invalid resolution. Options: 2160p, 1440p, 1080p, 720p, 480p, 360p"
        );
    }

    #[tokio::test]
    async fn test_estimate_missing_file() {
        let response = test_app()
            .oneshot(json_request(
                "/api/video/compress/estimate",
                serde_json::json!({
                    "file_path": "/missing/clip.mp4",
                    "mode": "target_size",
                    "target_size_mb": 25.0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! Web API Upload Tests
//!
//! Integration tests for the upload pipeline and its progress events.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use picwall::config::Config;
use picwall::events::ProgressEvent;
use picwall::web::handlers::AppState;
use picwall::web::router::create_router;
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test server over a temporary gallery directory.
fn create_test_server_with(
    configure: impl FnOnce(&mut Config),
) -> (TestServer, Arc<AppState>, TempDir) {
    let dir = TempDir::new().unwrap();

    let mut config = Config::default();
    config.gallery.images_dir = dir.path().join("public").to_string_lossy().into_owned();
    configure(&mut config);

    let state = Arc::new(AppState::from_config(&config).expect("Failed to create app state"));
    let router = create_router(state.clone(), &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, state, dir)
}

fn create_test_server() -> (TestServer, Arc<AppState>, TempDir) {
    create_test_server_with(|_| {})
}

/// Encode a solid-color PNG of the given size.
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 30])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn png_part(bytes: Vec<u8>, name: &str) -> Part {
    Part::bytes(bytes).file_name(name).mime_type("image/png")
}

#[tokio::test]
async fn test_upload_stores_image_thumbnail_and_record() {
    let (server, state, _dir) = create_test_server();

    let form = MultipartForm::new().add_part("files", png_part(png_bytes(8, 6), "tiny.png"));
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    let uploaded = body["data"]["uploaded"].as_array().unwrap();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0]["src"], "/tiny.png");
    assert_eq!(uploaded[0]["thumbnail"], "/thumbs/tiny.png");
    assert_eq!(uploaded[0]["width"], 8);
    assert_eq!(uploaded[0]["height"], 6);
    assert!(body["data"]["failed"].as_array().unwrap().is_empty());

    assert!(state.image_path("tiny.png").exists());
    assert!(state.thumbnail_path("tiny.png").exists());

    let records = state.store.load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].src, "/tiny.png");
}

#[tokio::test]
async fn test_upload_emits_progress_events() {
    let (server, state, _dir) = create_test_server();
    let mut rx = state.broadcaster.subscribe();

    let form = MultipartForm::new().add_part("files", png_part(png_bytes(4, 4), "one.png"));
    server.post("/api/upload").multipart(form).await.assert_status_ok();

    let started = rx.recv().await.unwrap();
    assert!(matches!(started, ProgressEvent::UploadStarted { total: 1, .. }));

    let optimized = rx.recv().await.unwrap();
    match optimized {
        ProgressEvent::FileOptimized { file, index, total, width, height, .. } => {
            assert_eq!(file, "one.png");
            assert_eq!(index, 0);
            assert_eq!(total, 1);
            assert_eq!((width, height), (4, 4));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let completed = rx.recv().await.unwrap();
    assert!(matches!(
        completed,
        ProgressEvent::UploadCompleted { total: 1, succeeded: 1, failed: 0, .. }
    ));
}

#[tokio::test]
async fn test_upload_mixed_batch_continues_after_failure() {
    let (server, state, _dir) = create_test_server();
    let mut rx = state.broadcaster.subscribe();

    let form = MultipartForm::new()
        .add_part("files", png_part(png_bytes(5, 5), "good.png"))
        .add_part("files", png_part(b"not an image at all".to_vec(), "bad.png"));

    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["uploaded"].as_array().unwrap().len(), 1);

    let failed = body["data"]["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["filename"], "bad.png");
    assert!(failed[0]["reason"]
        .as_str()
        .unwrap()
        .contains("not a decodable image"));

    // The good file made it to disk and into the sidecar
    assert!(state.image_path("good.png").exists());
    assert_eq!(state.store.load().unwrap().len(), 1);

    // started, optimized, failed, completed
    let mut names = Vec::new();
    for _ in 0..4 {
        names.push(rx.recv().await.unwrap().event_name());
    }
    assert_eq!(
        names,
        vec!["upload_started", "file_optimized", "file_failed", "upload_completed"]
    );
}

#[tokio::test]
async fn test_upload_resizes_oversized_images() {
    let (server, state, _dir) = create_test_server_with(|config| {
        config.processing.max_dimension = 16;
    });

    let form = MultipartForm::new().add_part("files", png_part(png_bytes(64, 48), "big.png"));
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["uploaded"][0]["width"], 16);
    assert_eq!(body["data"]["uploaded"][0]["height"], 12);

    let stored = image::open(state.image_path("big.png")).unwrap();
    assert_eq!((stored.width(), stored.height()), (16, 12));
}

#[tokio::test]
async fn test_upload_keeps_existing_record_on_overwrite() {
    let (server, state, _dir) = create_test_server();

    let mut record = picwall::gallery::ImageRecord::for_file("pic.png");
    record.alt = "existing caption".to_string();
    state.store.save(&[record]).unwrap();
    std::fs::write(state.image_path("pic.png"), b"stale").unwrap();

    let form = MultipartForm::new().add_part("files", png_part(png_bytes(6, 6), "pic.png"));
    server.post("/api/upload").multipart(form).await.assert_status_ok();

    let records = state.store.load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].alt, "existing caption");
}

#[tokio::test]
async fn test_upload_rejects_unsupported_extension() {
    let (server, state, _dir) = create_test_server();

    let form = MultipartForm::new().add_part(
        "files",
        Part::bytes(b"plain text".to_vec())
            .file_name("notes.txt")
            .mime_type("text/plain"),
    );

    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    let failed = body["data"]["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["reason"], "unsupported file extension");
    assert!(!state.image_path("notes.txt").exists());
}

#[tokio::test]
async fn test_upload_without_files_is_bad_request() {
    let (server, _state, _dir) = create_test_server();

    let form = MultipartForm::new().add_text("note", "no file parts here");
    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status_bad_request();
}

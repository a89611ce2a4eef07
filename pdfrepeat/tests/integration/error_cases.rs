//! Integration tests for error handling and edge cases.

use pdfrepeat::config::{OverwriteMode, RemainderPolicy};
use pdfrepeat::{Coordinator, RepeatError};
use serial_test::serial;

use crate::common::Workspace;

#[tokio::test]
async fn test_error_missing_image() {
    let ws = Workspace::new();
    let mut config = ws.config(4);
    config.image = ws.path("missing.png");

    let err = pdfrepeat::run(config.clone()).await.unwrap_err();

    assert!(matches!(err, RepeatError::ImageNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(config.partial_paths().iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn test_error_undecodable_image() {
    let ws = Workspace::new();
    let mut config = ws.config(4);
    config.image = ws.path("broken.png");
    std::fs::write(&config.image, b"not an image").unwrap();

    let err = pdfrepeat::run(config).await.unwrap_err();

    assert!(matches!(err, RepeatError::ImageDecode { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_error_no_clobber() {
    let ws = Workspace::new();
    let mut config = ws.config(4);
    config.overwrite_mode = OverwriteMode::NoClobber;
    std::fs::write(&config.output, b"existing").unwrap();

    let err = pdfrepeat::run(config.clone()).await.unwrap_err();

    assert!(matches!(err, RepeatError::OutputExists { .. }));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(std::fs::read(&config.output).unwrap(), b"existing");
    assert!(config.partial_paths().iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn test_force_overwrites_existing_output() {
    let ws = Workspace::new();
    let config = ws.config(4);
    std::fs::write(&config.output, b"existing").unwrap();

    let summary = pdfrepeat::run(config.clone()).await.unwrap();
    assert_eq!(summary.final_pages(), 4);
}

#[tokio::test]
async fn test_error_reject_policy() {
    let ws = Workspace::new();
    let mut config = ws.config(10);
    config.remainder = RemainderPolicy::Reject;

    let err = Coordinator::new(config.clone()).run().await.unwrap_err();

    assert!(matches!(err, RepeatError::InvalidConfig { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(!config.output.exists());
}

#[tokio::test]
async fn test_error_zero_workers() {
    let ws = Workspace::new();
    let mut config = ws.config(8);
    config.workers = 0;

    let err = pdfrepeat::run(config).await.unwrap_err();
    assert!(matches!(err, RepeatError::InvalidConfig { .. }));
}

#[tokio::test]
async fn test_error_missing_partial_dir() {
    let ws = Workspace::new();
    let mut config = ws.config(8);
    config.partial_dir = ws.path("does/not/exist");

    let err = pdfrepeat::run(config.clone()).await.unwrap_err();
    assert!(matches!(err, RepeatError::InvalidConfig { .. }));
    assert!(!config.output.exists());
}

#[tokio::test]
async fn test_error_output_is_a_partial_spelled_differently() {
    let ws = Workspace::new();
    let mut config = ws.config(8);
    config.keep_partials = false;
    config.output = ws.dir.path().join(".").join("partial_1.pdf");

    let err = pdfrepeat::run(config.clone()).await.unwrap_err();

    assert!(matches!(err, RepeatError::InvalidConfig { .. }));
    assert!(config.partial_paths().iter().all(|p| !p.exists()));
}

#[tokio::test]
#[serial]
async fn test_error_absolute_output_over_relative_partial() {
    let ws = Workspace::new();
    let image = ws.image(10, 20);
    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(ws.dir.path()).unwrap();

    let mut config = pdfrepeat::Config::new(image, 8, ws.path("partial_1.pdf"));
    config.keep_partials = false;
    config.quiet = true;
    let result = pdfrepeat::run(config).await;

    std::env::set_current_dir(original).unwrap();

    let err = result.unwrap_err();
    assert!(matches!(err, RepeatError::InvalidConfig { .. }));
    assert!(!ws.path("partial_1.pdf").exists());
    assert!(ws.path("tile.png").exists());
}

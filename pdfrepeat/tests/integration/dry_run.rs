//! Integration tests for dry-run functionality.

use pdfrepeat::Coordinator;

use crate::common::Workspace;

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let ws = Workspace::new();
    let mut config = ws.config(10);
    config.dry_run = true;

    let summary = Coordinator::new(config.clone()).run().await.unwrap();

    assert!(summary.dry_run);
    assert!(summary.final_document.is_none());
    assert!(summary.workers.is_empty());
    assert!(!config.output.exists());
    assert!(config.partial_paths().iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn test_dry_run_reports_plan() {
    let ws = Workspace::new();
    let mut config = ws.config(10);
    config.dry_run = true;

    let summary = Coordinator::new(config.clone()).run().await.unwrap();
    let plan = &summary.plan;

    assert_eq!(plan.partition.workers(), 4);
    assert_eq!(plan.expected_pages(), 8);
    assert_eq!(summary.dropped_pages(), 2);
    assert_eq!(plan.partial_paths, config.partial_paths());
    assert_eq!(plan.image_size.width, 50.0);
    assert!((plan.placement.width - 595.28).abs() < 1e-9);
}

#[tokio::test]
async fn test_dry_run_ignores_existing_output_under_no_clobber() {
    let ws = Workspace::new();
    let mut config = ws.config(4);
    config.dry_run = true;
    config.overwrite_mode = pdfrepeat::config::OverwriteMode::NoClobber;
    std::fs::write(&config.output, b"existing").unwrap();

    assert!(Coordinator::new(config.clone()).run().await.is_ok());
    assert_eq!(std::fs::read(&config.output).unwrap(), b"existing");
}

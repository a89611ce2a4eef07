//! Full pipeline runs: partition, parallel build, join, merge.

use pdfrepeat::Coordinator;
use pdfrepeat::config::{RemainderPolicy, WorkerFailurePolicy};
use serial_test::serial;

use crate::common::{IndexedEmbedder, Workspace, page_count, page_indices};

#[tokio::test]
async fn test_eight_pages_four_workers() {
    let ws = Workspace::new();
    let config = ws.config(8);

    let summary = Coordinator::new(config.clone())
        .with_embedder(IndexedEmbedder::new())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.final_pages(), 8);
    assert!(summary.failed_workers().is_empty());
    for (worker, path) in config.partial_paths().iter().enumerate() {
        assert_eq!(page_count(path), 2, "partial {worker}");
        assert_eq!(
            page_indices(path),
            vec![2 * worker as i64, 2 * worker as i64 + 1]
        );
    }

    assert_eq!(page_count(&config.output), 8);
    assert_eq!(page_indices(&config.output), (0..8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_ten_pages_four_workers_drops_remainder() {
    let ws = Workspace::new();
    let config = ws.config(10);

    let summary = Coordinator::new(config.clone())
        .with_embedder(IndexedEmbedder::new())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.dropped_pages(), 2);
    assert_eq!(summary.final_pages(), 8);
    assert_eq!(page_indices(&config.output), (0..8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_ten_pages_with_last_policy() {
    let ws = Workspace::new();
    let mut config = ws.config(10);
    config.remainder = RemainderPolicy::Last;

    let summary = Coordinator::new(config.clone())
        .with_embedder(IndexedEmbedder::new())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.dropped_pages(), 0);
    assert_eq!(page_indices(&config.output), (0..10).collect::<Vec<_>>());
    assert_eq!(page_count(&config.partial_path(3)), 4);
}

#[tokio::test]
async fn test_zero_repetitions_yields_empty_document() {
    let ws = Workspace::new();
    let config = ws.config(0);

    let summary = pdfrepeat::run(config.clone()).await.unwrap();

    assert_eq!(summary.final_pages(), 0);
    for path in config.partial_paths() {
        assert_eq!(page_count(&path), 0);
    }
    assert_eq!(page_count(&config.output), 0);
}

#[tokio::test]
async fn test_default_embedder_shares_one_image() {
    let ws = Workspace::new();
    let mut config = ws.config(6);
    config.workers = 3;

    pdfrepeat::run(config.clone()).await.unwrap();

    let doc = lopdf::Document::load(&config.output).unwrap();
    assert_eq!(doc.get_pages().len(), 6);
    let images = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|v| v.as_name())
                .is_ok_and(|n| n == b"Image")
        })
        .count();
    // One XObject per partial.
    assert_eq!(images, 3);
}

#[tokio::test]
async fn test_clean_removes_partials() {
    let ws = Workspace::new();
    let mut config = ws.config(4);
    config.keep_partials = false;

    let summary = pdfrepeat::run(config.clone()).await.unwrap();

    assert!(summary.partials_removed);
    assert!(config.output.exists());
    assert!(config.partial_paths().iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn test_partials_kept_by_default() {
    let ws = Workspace::new();
    let config = ws.config(4);

    let summary = pdfrepeat::run(config.clone()).await.unwrap();

    assert!(!summary.partials_removed);
    assert!(config.partial_paths().iter().all(|p| p.exists()));
}

#[tokio::test]
async fn test_single_worker() {
    let ws = Workspace::new();
    let mut config = ws.config(5);
    config.workers = 1;
    config.failure_policy = WorkerFailurePolicy::Strict;

    let summary = Coordinator::new(config.clone())
        .with_embedder(IndexedEmbedder::new())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.workers.len(), 1);
    assert_eq!(page_indices(&config.output), (0..5).collect::<Vec<_>>());
}

#[tokio::test]
#[serial]
async fn test_partials_default_to_working_directory() {
    let ws = Workspace::new();
    let image = ws.image(10, 20);
    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(ws.dir.path()).unwrap();

    let mut config = pdfrepeat::Config::new(image, 4, "final.pdf");
    config.quiet = true;
    let result = pdfrepeat::run(config).await;

    std::env::set_current_dir(original).unwrap();
    result.unwrap();

    for i in 0..4 {
        assert_eq!(page_count(&ws.path(&format!("partial_{i}.pdf"))), 1);
    }
    assert_eq!(page_count(&ws.path("final.pdf")), 4);
}

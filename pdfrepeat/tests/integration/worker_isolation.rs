//! A failing worker must not disturb any other worker.

use pdfrepeat::config::WorkerFailurePolicy;
use pdfrepeat::{Coordinator, RepeatError};

use crate::common::{IndexedEmbedder, Workspace, page_count, page_indices};

#[tokio::test]
async fn test_embed_failure_is_isolated_to_its_worker() {
    let ws = Workspace::new();
    let config = ws.config(8);

    // Page 5 belongs to worker 2, range [4, 6).
    let err = Coordinator::new(config.clone())
        .with_embedder(IndexedEmbedder::failing_on(&[5]))
        .run()
        .await
        .unwrap_err();

    // Lenient policy: the merge runs and trips over the missing partial.
    assert!(err.is_merge_error(), "unexpected error: {err:?}");
    assert!(err.to_string().contains("partial_2.pdf"));
    assert!(!config.output.exists());

    assert!(!config.partial_path(2).exists());
    for worker in [0, 1, 3] {
        let path = config.partial_path(worker);
        assert_eq!(page_count(&path), 2, "partial {worker}");
        assert_eq!(
            page_indices(&path),
            vec![2 * worker as i64, 2 * worker as i64 + 1]
        );
    }
}

#[tokio::test]
async fn test_strict_policy_reports_failed_workers() {
    let ws = Workspace::new();
    let mut config = ws.config(8);
    config.failure_policy = WorkerFailurePolicy::Strict;

    let err = Coordinator::new(config.clone())
        .with_embedder(IndexedEmbedder::failing_on(&[0, 7]))
        .run()
        .await
        .unwrap_err();

    match &err {
        RepeatError::WorkersFailed { failed } => assert_eq!(failed, &vec![0, 3]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert!(!config.output.exists());
    assert_eq!(page_count(&config.partial_path(1)), 2);
    assert_eq!(page_count(&config.partial_path(2)), 2);
}

#[tokio::test]
async fn test_stale_partial_is_not_merged() {
    let ws = Workspace::new();
    let config = ws.config(8);

    // A successful run leaves partial_1.pdf behind.
    pdfrepeat::run(config.clone()).await.unwrap();
    assert!(config.partial_path(1).exists());

    let err = Coordinator::new(config.clone())
        .with_embedder(IndexedEmbedder::failing_on(&[2]))
        .run()
        .await
        .unwrap_err();

    assert!(err.is_merge_error());
    assert!(!config.partial_path(1).exists());
}

//! Tests for the store-backed run repository.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use common::*;
use runloop::error::RunloopError;
use runloop::eventstore::{EventStore, MemoryEventStore, StoreError};
use runloop::repository::RunRepository;
use runloop::run::{Run, RunError, RunEvent, RunStatus};

/// Store whose appends always fail; loads report nothing.
struct BrokenStore;

#[async_trait]
impl EventStore for BrokenStore {
    async fn append(&self, _run_id: &str, _events: Vec<RunEvent>) -> Result<(), StoreError> {
        Err(StoreError::Io("disk full".to_string()))
    }

    async fn load(&self, _run_id: &str) -> Result<Vec<RunEvent>, StoreError> {
        Ok(Vec::new())
    }

    async fn list_run_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(Vec::new())
    }
}

fn memory_repo() -> (Arc<MemoryEventStore>, RunRepository) {
    let store = Arc::new(MemoryEventStore::default());
    let repo = RunRepository::new(store.clone());
    (store, repo)
}

#[tokio::test]
async fn load_unknown_run_is_not_found() {
    let (_store, repo) = memory_repo();

    let error = repo.load("missing").await.unwrap_err();

    assert_eq!(
        error.as_run_error(),
        Some(&RunError::RunNotFound {
            run_id: "missing".to_string()
        })
    );
}

#[tokio::test]
async fn load_history_without_created_is_not_found() {
    let (store, repo) = memory_repo();
    store
        .append(RUN_ID, vec![llm_req("step-1", 1)])
        .await
        .unwrap();

    assert!(matches!(
        repo.load(RUN_ID).await,
        Err(RunloopError::Run(RunError::RunNotFound { .. }))
    ));
}

#[tokio::test]
async fn recorded_run_reloads_identically() {
    let (_store, repo) = memory_repo();
    let mut run = Run::default();

    repo.record(&mut run, vec![created(10, 1000), llm_req("step-1", 1)])
        .await
        .unwrap();
    repo.record(&mut run, vec![llm_rsp("step-1", 100)])
        .await
        .unwrap();
    repo.record(&mut run, vec![RunEvent::completed(RUN_ID)])
        .await
        .unwrap();

    let reloaded = repo.load(RUN_ID).await.unwrap();
    assert_eq!(reloaded, run);
    assert_eq!(reloaded.status, RunStatus::Completed);
    assert_eq!(reloaded.total_tokens_used, 100);
    assert_eq!(repo.list_run_ids().await.unwrap(), vec![RUN_ID.to_string()]);
}

#[tokio::test]
async fn rejected_batch_is_not_persisted() {
    let (store, repo) = memory_repo();
    let mut run = Run::default();
    repo.record(&mut run, vec![created(1, 1000)]).await.unwrap();
    let before = run.clone();

    let result = repo
        .record(&mut run, vec![llm_req("step-1", 1), tool_req("step-2", 2)])
        .await;

    assert!(matches!(
        result,
        Err(RunloopError::Run(RunError::MaxStepsExceeded { max_steps: 1 }))
    ));
    assert_eq!(run, before);
    assert_eq!(store.load(RUN_ID).await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_append_leaves_run_unchanged() {
    let repo = RunRepository::new(Arc::new(BrokenStore));
    let mut run = Run::default();

    let error = repo
        .record(&mut run, vec![created(10, 1000)])
        .await
        .unwrap_err();

    assert!(error.is_retryable());
    assert_eq!(error, RunloopError::Store(StoreError::Io("disk full".to_string())));
    assert_eq!(run, Run::default());
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
    let (store, repo) = memory_repo();
    let mut run = Run::default();

    repo.record(&mut run, Vec::new()).await.unwrap();

    assert!(store.list_run_ids().await.unwrap().is_empty());
    assert_eq!(run, Run::default());
}

#[tokio::test]
async fn new_run_must_start_with_created() {
    let (store, repo) = memory_repo();
    let mut run = Run::default();

    let result = repo.record(&mut run, vec![llm_req("step-1", 1)]).await;

    assert_eq!(
        result,
        Err(RunloopError::Run(RunError::RunNotFound {
            run_id: RUN_ID.to_string()
        }))
    );
    assert!(store.load(RUN_ID).await.unwrap().is_empty());
    assert_eq!(run, Run::default());
}

#[tokio::test]
async fn stale_projection_is_rejected_as_conflict() {
    let (store, repo) = memory_repo();
    let mut run = Run::default();
    repo.record(&mut run, vec![created(1, 1000)]).await.unwrap();
    let mut first = run.clone();
    let mut second = run.clone();

    repo.record(&mut first, vec![llm_req("step-1", 1)])
        .await
        .unwrap();
    let result = repo.record(&mut second, vec![tool_req("step-2", 2)]).await;

    assert_eq!(
        result,
        Err(RunloopError::Conflict {
            run_id: RUN_ID.to_string(),
            stored_events: 2,
        })
    );
    assert_eq!(second, run);
    assert_eq!(store.load(RUN_ID).await.unwrap().len(), 2);

    let reloaded = repo.load(RUN_ID).await.unwrap();
    assert_eq!(reloaded, first);
    assert_eq!(reloaded.steps.len(), 1);
}

#[tokio::test]
async fn recording_a_second_new_run_with_a_taken_id_conflicts() {
    let (_store, repo) = memory_repo();
    repo.record(&mut Run::default(), vec![created(10, 1000)])
        .await
        .unwrap();

    let result = repo.record(&mut Run::default(), vec![created(10, 1000)]).await;

    assert!(matches!(result, Err(RunloopError::Conflict { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_records_from_one_projection_admit_one_writer() {
    let (_store, repo) = memory_repo();
    let mut run = Run::default();
    repo.record(&mut run, vec![created(1, 1000)]).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 1..=8u64 {
        let repo = repo.clone();
        let mut stale = run.clone();
        tasks.spawn(async move {
            repo.record(&mut stale, vec![llm_req(&format!("step-{i}"), i)])
                .await
        });
    }
    let mut accepted = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(()) => accepted += 1,
            Err(error) => assert!(matches!(error, RunloopError::Conflict { .. })),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(repo.load(RUN_ID).await.unwrap().steps.len(), 1);
}

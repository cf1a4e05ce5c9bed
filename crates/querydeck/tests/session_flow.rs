//! End-to-end session scenarios driven through the line-oriented driver.

use querydeck::cli::{SessionOutcome, run_session};
use querydeck::controller::{SavedQueryController, SelectionConsumer};
use querydeck::domain::QuerySelection;
use querydeck::output::{OutputConfig, OutputMode};
use querydeck::storage::{BackendOp, FailingBackend, InMemoryBackend, StorageBackend, open_backend};
use querydeck::store::QueryStore;
use rstest::rstest;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Emitted = Arc<Mutex<Vec<QuerySelection>>>;

fn recorder() -> (Emitted, SelectionConsumer) {
    let emitted: Emitted = Arc::default();
    let sink = Arc::clone(&emitted);
    (emitted, Box::new(move |s| sink.lock().unwrap().push(s)))
}

fn fields() -> Vec<String> {
    ["name", "score", "username"].iter().map(ToString::to_string).collect()
}

async fn drive(store: QueryStore, script: &str) -> (SessionOutcome, Vec<QuerySelection>, String) {
    let (emitted, consumer) = recorder();
    let controller = SavedQueryController::new(store, fields(), "", "objectId", consumer);
    let mut out = Vec::new();
    let config = OutputConfig::new(80, true, false);

    let outcome = run_session(
        controller,
        Cursor::new(script.to_string()),
        &mut out,
        OutputMode::Text,
        &config,
    )
    .await
    .unwrap();

    let emitted = emitted.lock().unwrap().clone();
    (outcome, emitted, String::from_utf8(out).unwrap())
}

async fn memory_store() -> QueryStore {
    QueryStore::open(Box::new(InMemoryBackend::new("q"))).await.unwrap()
}

#[tokio::test]
async fn apply_emits_exactly_once() {
    let (outcome, emitted, _) =
        drive(memory_store().await, "draft score>10\nkey username\napply\napply\n").await;

    let expected = QuerySelection::new("score>10", "username");
    assert_eq!(outcome, SessionOutcome::Selected(expected.clone()));
    assert_eq!(emitted, vec![expected]);
}

#[rstest]
#[case::explicit("draft a\ncancel\n")]
#[case::end_of_input("draft a\n")]
#[tokio::test]
async fn cancel_emits_nothing(#[case] script: &str) {
    let (outcome, emitted, _) = drive(memory_store().await, script).await;
    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert!(emitted.is_empty());
}

#[tokio::test]
async fn key_toggle_sequence() {
    let (_, _, out) = drive(
        memory_store().await,
        "key name\nkey name\nkey score\nkey missing\n",
    )
    .await;

    let keys: Vec<_> = out.lines().filter_map(|l| l.strip_prefix("search key: ")).collect();
    assert_eq!(keys, vec!["name", "objectId", "score", "score"]);
}

#[tokio::test]
async fn builder_result_replaces_draft_keeps_key() {
    let (_, emitted, _) = drive(
        memory_store().await,
        "draft old\nkey score\nbuilder {\"score\":{\"$gte\":10}}\napply\n",
    )
    .await;

    assert_eq!(
        emitted,
        vec![QuerySelection::new(r#"{"score":{"$gte":10}}"#, "score")]
    );
}

#[tokio::test]
async fn select_saved_bypasses_draft() {
    let mut store = memory_store().await;
    let saved = store.add("age>5", "objectId").await.unwrap();

    let script = format!("draft other\nkey name\nselect {}\n", saved.id);
    let (outcome, emitted, _) = drive(store, &script).await;

    let expected = QuerySelection::new("age>5", "objectId");
    assert_eq!(outcome, SessionOutcome::Selected(expected.clone()));
    assert_eq!(emitted, vec![expected]);
}

#[tokio::test]
async fn select_unknown_keeps_session_alive() {
    let (outcome, emitted, out) =
        drive(memory_store().await, "draft x\nselect q-zzzzzz\napply\n").await;

    assert!(out.contains("Saved query not found: q-zzzzzz"));
    assert_eq!(outcome, SessionOutcome::Selected(QuerySelection::new("x", "objectId")));
    assert_eq!(emitted.len(), 1);
}

#[tokio::test]
async fn edit_then_apply_leaves_record_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queries.jsonl");
    let mut store = QueryStore::open(
        open_backend(StorageBackend::Jsonl(path.clone()), "q")
            .await
            .unwrap(),
    )
    .await
    .unwrap();
    let saved = store.add("score>10", "score").await.unwrap();

    let script = format!("edit {}\ndraft score>20\napply\n", saved.id);
    let (_, emitted, _) = drive(store, &script).await;
    assert_eq!(emitted, vec![QuerySelection::new("score>20", "score")]);

    let reopened = QueryStore::open(
        open_backend(StorageBackend::Jsonl(path), "q").await.unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(reopened.list(), &[saved]);
}

#[tokio::test]
async fn save_failure_is_reported_and_session_continues() {
    let dir = TempDir::new().unwrap();
    // Parent directory does not exist, so every commit fails.
    let path = dir.path().join("missing").join("queries.jsonl");
    let store = QueryStore::open(
        open_backend(StorageBackend::Jsonl(path), "q").await.unwrap(),
    )
    .await
    .unwrap();

    let (outcome, emitted, out) = drive(store, "draft a\nsave\nshow\napply\n").await;

    assert!(out.contains("could not save query"));
    assert!(out.contains("No saved queries."));
    assert_eq!(outcome, SessionOutcome::Selected(QuerySelection::new("a", "objectId")));
    assert_eq!(emitted.len(), 1);
}

#[tokio::test]
async fn failed_save_is_never_persisted_later() {
    let backend = FailingBackend::new();
    let handle = backend.clone();
    let store = QueryStore::open(Box::new(backend)).await.unwrap();
    handle.fail(BackendOp::Commit);
    handle.fail(BackendOp::Rollback);

    let (emitted, consumer) = recorder();
    let mut controller = SavedQueryController::new(store, fields(), "ghost", "objectId", consumer);
    assert!(controller.save().await.is_err());
    assert!(controller.saved().is_empty());

    handle.heal(BackendOp::Commit);
    handle.heal(BackendOp::Rollback);
    controller.set_draft_query("kept");
    controller.save().await.unwrap();

    let committed: Vec<_> = handle
        .committed()
        .await
        .into_iter()
        .map(|q| q.constraint)
        .collect();
    assert_eq!(committed, vec!["kept"]);
    assert_eq!(controller.saved().len(), 1);
    assert_eq!(controller.saved()[0].constraint, "kept");

    controller.cancel();
    assert!(emitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn draft_keeps_tabs_verbatim() {
    let (_, emitted, _) = drive(memory_store().await, "draft name=\"a\tb\"\napply\n").await;
    assert_eq!(emitted, vec![QuerySelection::new("name=\"a\tb\"", "objectId")]);
}

#[tokio::test]
async fn save_and_delete_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queries.jsonl");
    let store = QueryStore::open(
        open_backend(StorageBackend::Jsonl(path.clone()), "q")
            .await
            .unwrap(),
    )
    .await
    .unwrap();

    let (_, _, out) = drive(store, "draft age>5\nsave\n").await;
    let id = out
        .lines()
        .find_map(|l| l.strip_prefix("saved "))
        .expect("save acknowledged")
        .to_string();

    let store = QueryStore::open(
        open_backend(StorageBackend::Jsonl(path.clone()), "q")
            .await
            .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(store.len(), 1);

    let (_, _, out) = drive(store, &format!("delete {id}\n")).await;
    assert!(out.contains(&format!("deleted {id}")));

    let store = QueryStore::open(
        open_backend(StorageBackend::Jsonl(path), "q").await.unwrap(),
    )
    .await
    .unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn unknown_command_is_reported() {
    let (_, _, out) = drive(memory_store().await, "frobnicate\n").await;
    assert!(out.contains("unknown command 'frobnicate'"));
}

//! Round-trip tests: records written with the atomic writer read back intact.

use querydeck_jsonl::{read_jsonl, write_jsonl_atomic, write_jsonl_atomic_iter, Error};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct SavedRow {
    id: String,
    constraint: String,
    #[serde(rename = "searchKey")]
    search_key: String,
}

fn row(id: &str, constraint: &str, key: &str) -> SavedRow {
    SavedRow {
        id: id.to_string(),
        constraint: constraint.to_string(),
        search_key: key.to_string(),
    }
}

#[rstest]
#[case::plain(row("q-1", "score>10", "username"))]
#[case::operators(row("q-2", r#"{"score":{"$gte":1000}}&order=-score&limit=10"#, "objectId"))]
#[case::empty_constraint(row("q-3", "", "objectId"))]
#[case::newline_inside(row("q-4", "a=1\nb=2", "a"))]
#[case::unicode(row("q-5", "name=\u{4e16}\u{754c} \u{1F600}", "name"))]
#[tokio::test]
async fn single_record_survives_roundtrip(#[case] original: SavedRow) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queries.jsonl");

    write_jsonl_atomic(&path, std::slice::from_ref(&original))
        .await
        .unwrap();
    let back: Vec<SavedRow> = read_jsonl(&path).await.unwrap();

    assert_eq!(back, vec![original]);
}

#[tokio::test]
async fn insertion_order_is_preserved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queries.jsonl");

    let rows = (0..50).map(|i| row(&format!("q-{i}"), &format!("n={i}"), "objectId"));
    write_jsonl_atomic_iter(&path, rows).await.unwrap();

    let back: Vec<SavedRow> = read_jsonl(&path).await.unwrap();
    assert_eq!(back.len(), 50);
    for (i, r) in back.iter().enumerate() {
        assert_eq!(r.id, format!("q-{i}"));
    }
}

#[tokio::test]
async fn strict_read_rejects_corruption_with_line_number() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queries.jsonl");
    std::fs::write(
        &path,
        "{\"id\":\"q-1\",\"constraint\":\"a\",\"searchKey\":\"b\"}\n{truncated\n",
    )
    .unwrap();

    let err = read_jsonl::<SavedRow, _>(&path).await.unwrap_err();
    assert!(matches!(err, Error::InvalidFormat { line_number: 2, .. }));
}

#[tokio::test]
async fn strict_read_of_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = read_jsonl::<SavedRow, _>(dir.path().join("nope.jsonl"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

use snipvault::models::{
    MemoryStorage, SnippetPersistence, SnippetRecord, StorageFormat, StorageManager,
};
use snipvault::{ErrorKind, Result, SnippetError, SnippetStore, analyzer};
use std::collections::BTreeSet;
use std::fs;
use tempfile::tempdir;

/// Backend that loads nothing and refuses every save.
struct FailingStorage;

impl SnippetPersistence for FailingStorage {
    fn load(&self) -> Result<Option<Vec<SnippetRecord>>> {
        Ok(None)
    }

    fn save(&self, _records: &[SnippetRecord]) -> Result<()> {
        Err(SnippetError::persistence("disk full"))
    }
}

fn file_store(dir: &std::path::Path) -> SnippetStore {
    let storage = StorageManager::new(dir, "snippets.json", StorageFormat::Json).unwrap();
    SnippetStore::open(storage).unwrap()
}

#[test]
fn test_scenario_ids_skip_deleted() {
    let mut store = SnippetStore::open(MemoryStorage::new()).unwrap();
    assert_eq!(store.add("T1", "Java", "x=1").unwrap().id(), 1);
    assert_eq!(store.add("T2", "Python", "y=2").unwrap().id(), 2);
    store.delete(1).unwrap();
    assert_eq!(store.add("T3", "Go", "z=3").unwrap().id(), 3);

    assert!(store.get(1).is_none());
    assert!(store.all_snippets().iter().all(|s| s.id() != 1));
    assert!(store.search("T1").unwrap().is_empty());
}

#[test]
fn test_ids_strictly_increase() {
    let mut store = SnippetStore::open(MemoryStorage::new()).unwrap();
    let mut last = 0;
    for i in 0..20 {
        let snippet = store.add(&format!("S{}", i), "Rust", "x").unwrap();
        assert!(snippet.id() > last);
        last = snippet.id();
        if i % 3 == 0 {
            store.delete(snippet.id()).unwrap();
        }
    }
}

#[test]
fn test_round_trip_through_fresh_store() {
    let dir = tempdir().unwrap();
    let original = {
        let mut store = file_store(dir.path());
        store
            .add_with_details(
                "Hello",
                "Rust",
                "fn main() {}",
                ["Entry", " cli "],
                Some("Program entry point"),
            )
            .unwrap();
        store.add("Sum", "Python", "a + b").unwrap();
        store.add("Gone", "Go", "x := 1").unwrap();
        store.delete(3).unwrap();
        store.all_snippets()
    };

    let reopened = file_store(dir.path());
    assert_eq!(reopened.all_snippets(), original);

    let first = reopened.get(1).unwrap();
    let expected: BTreeSet<String> = ["cli", "entry"].into_iter().map(String::from).collect();
    assert_eq!(first.tags(), expected);
    assert_eq!(first.description(), "Program entry point");
    assert_eq!(reopened.get(2).unwrap().description(), "");
}

#[test]
fn test_shared_memory_backend_round_trip() {
    let storage = MemoryStorage::with_format(StorageFormat::Yaml);
    let mut store = SnippetStore::open(storage.clone()).unwrap();
    store.add("A", "Rust", "a").unwrap();
    store.add_tag(1, "demo").unwrap();

    let reopened = SnippetStore::open(storage).unwrap();
    assert!(reopened.get(1).unwrap().has_tag("demo"));
}

#[test]
fn test_existing_data_is_loaded_not_wiped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snippets.json");
    fs::write(
        &path,
        r#"[{"id": 5, "title": "Kept", "language": "Rust", "code": "x", "tags": ["A"]}]"#,
    )
    .unwrap();

    let mut store = file_store(dir.path());
    assert_eq!(store.count(), 1);
    assert!(store.get(5).unwrap().has_tag("a"));
    assert_eq!(store.add("Next", "Rust", "y").unwrap().id(), 6);
}

#[test]
fn test_corrupt_file_fails_open() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("snippets.json"), "{ not json").unwrap();

    let storage = StorageManager::new(dir.path(), "snippets.json", StorageFormat::Json).unwrap();
    let err = SnippetStore::open(storage).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert_eq!(
        fs::read_to_string(dir.path().join("snippets.json")).unwrap(),
        "{ not json"
    );
}

#[test]
fn test_invalid_or_duplicate_records_fail_open() {
    let blank_title = MemoryStorage::with_bytes(
        r#"[{"id": 1, "title": " ", "language": "Rust", "code": "x"}]"#,
    );
    assert_eq!(
        SnippetStore::open(blank_title).unwrap_err().kind(),
        ErrorKind::Persistence
    );

    let duplicates = MemoryStorage::with_bytes(
        r#"[{"id": 1, "title": "a", "language": "Rust", "code": "x"},
            {"id": 1, "title": "b", "language": "Rust", "code": "y"}]"#,
    );
    assert_eq!(
        SnippetStore::open(duplicates).unwrap_err().kind(),
        ErrorKind::Persistence
    );
}

#[test]
fn test_empty_file_opens_empty_store() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("snippets.json"), "").unwrap();
    let store = file_store(dir.path());
    assert!(store.is_empty());
}

#[test]
fn test_failed_save_keeps_in_memory_change() {
    let mut store = SnippetStore::open(FailingStorage).unwrap();

    let err = store.add("Kept", "Rust", "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert_eq!(store.count(), 1);
    assert_eq!(store.get(1).unwrap().title(), "Kept");

    let err = store.edit(1, "Renamed", "Rust", "y").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert_eq!(store.get(1).unwrap().title(), "Renamed");

    assert_eq!(store.delete(1).unwrap_err().kind(), ErrorKind::Persistence);
    assert!(store.is_empty());
    assert_eq!(store.next_id().unwrap(), 2);
}

#[test]
fn test_edit_missing_on_empty_store() {
    let mut store = SnippetStore::open(MemoryStorage::new()).unwrap();
    let err = store.edit(999, "x", "y", "z").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.delete(999).unwrap_err().kind(), ErrorKind::NotFound);
    assert!(store.is_empty());
}

#[test]
fn test_edit_keeps_tags_and_description() {
    let mut store = SnippetStore::open(MemoryStorage::new()).unwrap();
    let id = store
        .add_with_details("Old", "Java", "int x;", ["typed"], Some("desc"))
        .unwrap()
        .id();
    store.edit(id, "New", "Kotlin", "val x = 1").unwrap();

    let edited = store.get(id).unwrap();
    assert_eq!(edited.title(), "New");
    assert_eq!(edited.language(), "Kotlin");
    assert_eq!(edited.code(), "val x = 1");
    assert!(edited.has_tag("typed"));
    assert_eq!(edited.description(), "desc");
}

#[test]
fn test_search_covers_every_field() {
    let mut store = SnippetStore::open(MemoryStorage::new()).unwrap();
    store
        .add_with_details(
            "Quick sort",
            "Haskell",
            "qs []",
            ["sorting"],
            Some("recursive"),
        )
        .unwrap();
    store.add("Other", "C", "int main;").unwrap();

    for keyword in ["QUICK", "qs [", "haskell", "Recursive", "sort", "sortin"] {
        let hits = store.search(keyword).unwrap();
        assert_eq!(hits.len(), 1, "keyword {keyword}");
        assert_eq!(hits[0].id(), 1);
    }
    assert!(store.search(" ").is_err());
}

#[test]
fn test_import_assigns_fresh_ids() {
    let mut store = SnippetStore::open(MemoryStorage::new()).unwrap();
    store.add("Existing", "Rust", "x").unwrap();

    let records = vec![
        SnippetRecord {
            id: 1,
            title: "Imported".into(),
            language: "Go".into(),
            code: "y".into(),
            tags: vec!["Net".into()],
            description: None,
        },
        SnippetRecord {
            id: 1,
            title: "Also imported".into(),
            language: "Go".into(),
            code: "z".into(),
            tags: vec![],
            description: Some("d".into()),
        },
    ];
    let added = store.import(&records).unwrap();
    let ids: Vec<u32> = added.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![2, 3]);
    assert!(store.get(2).unwrap().has_tag("net"));

    let bad = vec![SnippetRecord {
        code: "  ".into(),
        ..records[0].clone()
    }];
    let err = store.import(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.count(), 3);
}

#[test]
fn test_all_snippets_are_independent_copies() {
    let mut store = SnippetStore::open(MemoryStorage::new()).unwrap();
    store.add("A", "Rust", "a").unwrap();

    let mut first = store.all_snippets();
    let second = store.all_snippets();
    assert_eq!(first, second);
    first[0].add_tag("mutated");
    assert!(!store.get(1).unwrap().has_tag("mutated"));
}

#[test]
fn test_distributions_match_store_contents() {
    let mut store = SnippetStore::open(MemoryStorage::new()).unwrap();
    store
        .add_with_details("a", "Rust", "a", ["x", "y"], None)
        .unwrap();
    store.add_with_details("b", "Go", "b", ["x"], None).unwrap();
    store.add("c", "Rust", "c").unwrap();

    let root = store.root();
    let languages = analyzer::language_distribution(root);
    assert_eq!(languages.values().sum::<usize>(), root.count());
    let tags = analyzer::tag_distribution(root);
    assert_eq!(tags.values().sum::<usize>(), 3);
    assert_eq!(
        store.all_tags().into_iter().collect::<Vec<_>>(),
        vec!["x", "y"]
    );
}

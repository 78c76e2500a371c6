mod common;

use common::{names, open_people, Person, PersonField, MAX_LINE};
use linedb_core::{
    FieldOperator, IndexError, JsonDocument, Query, QueryError, Store, StoreConfig,
};
use serde_json::json;
use std::io::Cursor;

fn named(name: &str) -> Query<PersonField> {
    Query::field(PersonField::Name, FieldOperator::eq(name))
}

#[test]
fn insert_then_find_returns_record_with_fresh_index() {
    let (file, mut store) = open_people(&[MAX_LINE]);
    let log_before = std::fs::read_to_string(file.path()).unwrap();

    let id = store
        .insert(Person::new("user", "Erika Musterfrau", 33, "Tower Crane operator"))
        .unwrap();
    assert_eq!(id, 1);

    let hits = store.find_documents(&named("Erika Musterfrau")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].age, 33);

    let record = store.get(id).unwrap();
    assert!(record.is_active());
    assert!(record.index().contains("crane"));
    assert_eq!(store.find_documents(&Query::text("CRANE")).unwrap(), hits);

    // Inserts are in-memory only.
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), log_before);
}

#[test]
fn insert_with_unindexable_document_leaves_store_unchanged() {
    let config = StoreConfig::new("inline.log").text_fields(["bio".to_string()]);
    let mut store = Store::<JsonDocument>::from_reader(config, Cursor::new("")).unwrap();

    let document: JsonDocument = serde_json::from_value(json!({"name": "Max"})).unwrap();
    let err = store.insert(document).unwrap_err();

    assert!(matches!(err, IndexError::MissingTextField { .. }));
    assert!(store.is_empty());
}

#[test]
fn insert_then_delete_then_find_is_empty() {
    let (_file, mut store) = open_people(&[]);
    store
        .insert(Person::new("user", "Anna", 31, "Baker"))
        .unwrap();

    let deleted = store.delete(&named("Anna")).unwrap();
    assert_eq!(deleted, 1);
    assert!(store.find_documents(&named("Anna")).unwrap().is_empty());
    assert!(store.get(0).unwrap().is_deleted());
}

#[test]
fn delete_is_idempotent() {
    let (_file, mut store) = open_people(&[MAX_LINE, MAX_LINE]);
    let query = Query::text("chimney");

    assert_eq!(store.delete(&query).unwrap(), 2);
    let after_first = store
        .records()
        .iter()
        .map(|record| record.is_deleted())
        .collect::<Vec<_>>();

    assert_eq!(store.delete(&query).unwrap(), 0);
    let after_second = store
        .records()
        .iter()
        .map(|record| record.is_deleted())
        .collect::<Vec<_>>();

    assert_eq!(after_first, after_second);
    assert_eq!(store.len(), 2);
    assert_eq!(store.active_count(), 0);
}

#[test]
fn deleted_records_are_never_returned() {
    let (_file, mut store) = open_people(&[MAX_LINE]);
    store
        .insert(Person::new("user", "Anna", 31, "Baker"))
        .unwrap();
    store.delete(&named("Max Mustermann")).unwrap();

    for query in [
        Query::all(),
        Query::text("chimney"),
        named("Max Mustermann"),
        Query::or([named("Max Mustermann"), named("Anna")]),
    ] {
        let hits = store.find_documents(&query).unwrap();
        assert!(!names(&hits).contains(&"Max Mustermann".to_string()));
    }
}

#[test]
fn reinserting_a_deleted_document_creates_a_new_record() {
    let (_file, mut store) = open_people(&[MAX_LINE]);
    let original = store.get(0).unwrap().document().clone();

    store.delete(&Query::all()).unwrap();
    let id = store.insert(original).unwrap();

    assert_eq!(id, 1);
    assert!(store.get(0).unwrap().is_deleted());
    let hits = store.find_with_ids(&named("Max Mustermann")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, 1);
}

#[test]
fn delete_with_failing_query_changes_nothing() {
    let (_file, mut store) = open_people(&[MAX_LINE]);
    store
        .insert(Person::new("user", "Anna", 31, "Baker"))
        .unwrap();

    let err = store
        .delete(&Query::field(PersonField::Name, FieldOperator::lt(5)))
        .unwrap_err();

    assert!(matches!(err, QueryError::IncomparableScalars { .. }));
    assert_eq!(store.active_count(), 2);
}

#[test]
fn delete_only_touches_matching_records() {
    let (_file, mut store) = open_people(&[MAX_LINE]);
    store
        .insert(Person::new("admin", "Anna", 31, "Baker"))
        .unwrap();

    let deleted = store
        .delete(&Query::field(PersonField::Type, FieldOperator::eq("admin")))
        .unwrap();

    assert_eq!(deleted, 1);
    let remaining = store.find_documents(&Query::all()).unwrap();
    assert_eq!(names(&remaining), vec!["Max Mustermann"]);
}

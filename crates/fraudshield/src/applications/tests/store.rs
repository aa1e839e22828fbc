use super::common::*;
use crate::applications::domain::{ApplicationId, ApplicationStatus};
use crate::applications::store::{
    ApplicationStore, InMemoryApplicationStore, JsonFileApplicationStore, StoreError,
};
use std::fs;

#[test]
fn memory_store_rejects_duplicate_ids() {
    let store = InMemoryApplicationStore::default();
    let application = sample_applications().remove(0);

    store.insert(application.clone()).expect("first insert");
    assert!(matches!(
        store.insert(application),
        Err(StoreError::Conflict)
    ));
}

#[test]
fn memory_store_ids_continue_after_seed() {
    let store = InMemoryApplicationStore::with_applications(sample_applications());
    assert_eq!(store.next_id().unwrap(), ApplicationId::from_sequence(8));
    assert_eq!(store.next_id().unwrap(), ApplicationId::from_sequence(9));
}

#[test]
fn memory_store_update_status_reports_missing_records() {
    let store = InMemoryApplicationStore::default();
    assert!(matches!(
        store.update_status(&ApplicationId::from_sequence(1), ApplicationStatus::Approved),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn json_store_starts_empty_without_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileApplicationStore::in_dir(dir.path(), "fraudshield_applications");

    assert!(store.load_all().expect("load succeeds").is_empty());
    assert!(!store.path().exists());
}

#[test]
fn json_store_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileApplicationStore::in_dir(dir.path().join("nested"), "apps");

    for application in sample_applications() {
        store.insert(application).expect("insert succeeds");
    }
    store
        .update_status(&ApplicationId::from_sequence(2), ApplicationStatus::UnderReview)
        .expect("update succeeds");

    let reopened = JsonFileApplicationStore::in_dir(dir.path().join("nested"), "apps");
    let applications = reopened.load_all().expect("load succeeds");
    assert_eq!(applications.len(), 7);
    assert_eq!(applications[1].status, ApplicationStatus::UnderReview);
    assert_eq!(reopened.next_id().unwrap(), ApplicationId::from_sequence(8));
    assert!(!dir.path().join("nested").join("apps.json.tmp").exists());
}

#[test]
fn json_store_swallows_malformed_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileApplicationStore::in_dir(dir.path(), "apps");
    fs::write(store.path(), "{ not json").expect("write corrupt file");

    assert!(store.load_all().expect("load succeeds").is_empty());

    let application = sample_applications().remove(0);
    store
        .insert(application.clone())
        .expect("insert replaces corrupt list");
    assert_eq!(store.load_all().expect("load succeeds"), vec![application]);
}

#[test]
fn json_store_treats_blank_file_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileApplicationStore::in_dir(dir.path(), "apps");
    fs::write(store.path(), "  \n").expect("write blank file");

    assert!(store.load_all().expect("load succeeds").is_empty());
}

#[test]
fn json_store_persists_each_insert() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileApplicationStore::in_dir(dir.path(), "apps");
    for application in sample_applications().into_iter().take(2) {
        store.insert(application).expect("insert succeeds");
    }

    let reopened = JsonFileApplicationStore::in_dir(dir.path(), "apps");
    assert_eq!(reopened.load_all().expect("load succeeds").len(), 2);
    assert!(reopened
        .fetch(&ApplicationId::from_sequence(2))
        .expect("fetch succeeds")
        .is_some());
    assert!(reopened
        .fetch(&ApplicationId::from_sequence(5))
        .expect("fetch succeeds")
        .is_none());
}

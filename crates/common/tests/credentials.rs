//! Integration tests for the credential store

use std::fs;

use tempfile::TempDir;

use common::credentials::{CredentialError, CredentialStore};

fn setup() -> (CredentialStore, TempDir) {
    let temp = TempDir::new().unwrap();
    let store = CredentialStore::new(temp.path().join("users.toml"));
    (store, temp)
}

#[test]
fn test_register_then_verify() {
    let (store, _temp) = setup();

    store.register("bob", "pw123").unwrap();

    assert!(store.verify("bob", "pw123").unwrap());
    assert!(!store.verify("bob", "wrong").unwrap());
    assert!(!store.verify("nobody", "pw123").unwrap());
}

#[test]
fn test_load_all_absent_file_is_empty() {
    let (store, _temp) = setup();

    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn test_load_all_empty_file_is_empty() {
    let (store, _temp) = setup();

    fs::write(store.path(), "").unwrap();
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn test_stored_hash_is_salted_and_opaque() {
    let (store, _temp) = setup();

    store.register("bob", "pw123").unwrap();
    let credentials = store.load_all().unwrap();
    let hash = credentials.get("bob").unwrap();

    // bcrypt, never the plaintext
    assert!(hash.starts_with("$2"));
    assert_ne!(hash, "pw123");

    // A fresh salt every time.
    let other = CredentialStore::hash("pw123").unwrap();
    assert_ne!(&other, hash);
}

#[test]
fn test_register_rejects_duplicate_username() {
    let (store, _temp) = setup();

    store.register("bob", "pw123").unwrap();
    let before = store.load_all().unwrap();

    let result = store.register("bob", "different");
    assert!(matches!(result, Err(CredentialError::UsernameTaken)));

    // The stored hash is unchanged.
    assert_eq!(store.load_all().unwrap(), before);
    assert!(store.verify("bob", "pw123").unwrap());
}

#[test]
fn test_register_rejects_empty_fields() {
    let (store, _temp) = setup();

    assert!(matches!(
        store.register("", "pw123"),
        Err(CredentialError::UsernameRequired)
    ));
    assert!(matches!(
        store.register("bob", ""),
        Err(CredentialError::PasswordRequired)
    ));
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn test_register_recovers_from_malformed_file() {
    let (store, _temp) = setup();

    fs::write(store.path(), "not a mapping [").unwrap();
    assert!(matches!(
        store.load_all(),
        Err(CredentialError::TomlDe(_))
    ));

    // A persisted structure that is not a table starts over empty.
    store.register("bob", "pw123").unwrap();
    assert!(store.verify("bob", "pw123").unwrap());
    assert_eq!(store.load_all().unwrap().len(), 1);
}

#[test]
fn test_register_keeps_existing_users() {
    let (store, _temp) = setup();

    store.register("bob", "pw123").unwrap();
    store.register("carol", "hunter2").unwrap();

    let credentials = store.load_all().unwrap();
    assert_eq!(credentials.len(), 2);
    assert!(store.verify("bob", "pw123").unwrap());
    assert!(store.verify("carol", "hunter2").unwrap());
}

use parley_persist::{FileSettingsStore, Settings, SettingsStore, OPENROUTER_KEY, SYSTEM_PROMPT};
use std::sync::Arc;

#[test]
fn test_missing_file_is_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSettingsStore::open(dir.path().join("settings.json")).unwrap();

    assert_eq!(store.get(OPENROUTER_KEY).unwrap(), None);
}

#[test]
fn test_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile").join("settings.json");

    {
        let store = FileSettingsStore::open(&path).unwrap();
        store.set(OPENROUTER_KEY, "sk-or-1").unwrap();
        store.set(SYSTEM_PROMPT, "You are helpful").unwrap();
    }

    let reopened = FileSettingsStore::open(&path).unwrap();
    assert_eq!(reopened.get(OPENROUTER_KEY).unwrap().as_deref(), Some("sk-or-1"));
    assert_eq!(reopened.get(SYSTEM_PROMPT).unwrap().as_deref(), Some("You are helpful"));
}

#[test]
fn test_remove_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let store = FileSettingsStore::open(&path).unwrap();
    store.set(OPENROUTER_KEY, "k").unwrap();
    store.remove(OPENROUTER_KEY).unwrap();

    let reopened = FileSettingsStore::open(&path).unwrap();
    assert_eq!(reopened.get(OPENROUTER_KEY).unwrap(), None);
}

#[test]
fn test_file_is_flat_json_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let settings = Settings::new(Arc::new(FileSettingsStore::open(&path).unwrap()));
    settings.save_gemini_key("g-1").unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({"geminiKey": "g-1"}));
}

#[test]
fn test_corrupt_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(FileSettingsStore::open(&path).is_err());
}

#[test]
fn test_failed_write_leaves_value_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = FileSettingsStore::open(&path).unwrap();

    // A directory in the temp file's place makes every write fail
    std::fs::create_dir(dir.path().join("settings.json.tmp")).unwrap();

    assert!(store.set(OPENROUTER_KEY, "sk-or-1").is_err());
    assert_eq!(store.get(OPENROUTER_KEY).unwrap(), None);
    assert_eq!(FileSettingsStore::open(&path).unwrap().get(OPENROUTER_KEY).unwrap(), None);
}

#[test]
fn test_failed_remove_keeps_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let store = FileSettingsStore::open(&path).unwrap();
    store.set(OPENROUTER_KEY, "sk-or-1").unwrap();

    std::fs::create_dir(dir.path().join("settings.json.tmp")).unwrap();

    assert!(store.remove(OPENROUTER_KEY).is_err());
    assert_eq!(store.get(OPENROUTER_KEY).unwrap().as_deref(), Some("sk-or-1"));
}

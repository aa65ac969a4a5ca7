use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{PersistError, Result};
use crate::store::SettingsStore;

/// Storage key for the OpenRouter (completion API) credential
pub const OPENROUTER_KEY: &str = "openRouterKey";
/// Storage key for the Google Gemini credential
pub const GEMINI_KEY: &str = "geminiKey";
/// Storage key for the prompt prepended to every conversation
pub const SYSTEM_PROMPT: &str = "systemPrompt";

/// Explicit settings provider handed to whichever component needs
/// credentials or the system prompt.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn SettingsStore>,
}

/// What a settings view shows. Credentials are reported as present or not,
/// never echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    pub has_openrouter_key: bool,
    pub has_gemini_key: bool,
    pub system_prompt: String,
}

impl Settings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// OpenRouter credential; an empty stored value counts as absent
    pub fn openrouter_key(&self) -> Result<Option<String>> {
        self.non_empty(OPENROUTER_KEY)
    }

    pub fn gemini_key(&self) -> Result<Option<String>> {
        self.non_empty(GEMINI_KEY)
    }

    /// Global system prompt, empty when never set
    pub fn system_prompt(&self) -> Result<String> {
        Ok(self.store.get(SYSTEM_PROMPT)?.unwrap_or_default())
    }

    pub fn save_openrouter_key(&self, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(PersistError::EmptyValue("OpenRouter API key"));
        }
        tracing::info!("Saving OpenRouter API key");
        self.store.set(OPENROUTER_KEY, key)
    }

    pub fn save_gemini_key(&self, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(PersistError::EmptyValue("Gemini API key"));
        }
        tracing::info!("Saving Gemini API key");
        self.store.set(GEMINI_KEY, key)
    }

    /// Any text is accepted, including the empty string
    pub fn set_system_prompt(&self, prompt: &str) -> Result<()> {
        tracing::debug!(len = prompt.len(), "System prompt updated");
        self.store.set(SYSTEM_PROMPT, prompt)
    }

    pub fn snapshot(&self) -> Result<SettingsSnapshot> {
        Ok(SettingsSnapshot {
            has_openrouter_key: self.openrouter_key()?.is_some(),
            has_gemini_key: self.gemini_key()?.is_some(),
            system_prompt: self.system_prompt()?,
        })
    }

    fn non_empty(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.get(key)?.filter(|v| !v.is_empty()))
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySettingsStore;

    fn settings_with(store: MemorySettingsStore) -> Settings {
        Settings::new(Arc::new(store))
    }

    #[test]
    fn test_absent_values() {
        let settings = settings_with(MemorySettingsStore::new());
        assert_eq!(settings.openrouter_key().unwrap(), None);
        assert_eq!(settings.gemini_key().unwrap(), None);
        assert_eq!(settings.system_prompt().unwrap(), "");
    }

    #[test]
    fn test_empty_stored_key_counts_as_absent() {
        let settings = settings_with(MemorySettingsStore::new().with_entry(OPENROUTER_KEY, ""));
        assert_eq!(settings.openrouter_key().unwrap(), None);
    }

    #[test]
    fn test_blank_key_rejected() {
        let settings = settings_with(MemorySettingsStore::new());

        let err = settings.save_openrouter_key("   ").unwrap_err();
        assert!(matches!(err, PersistError::EmptyValue(_)));
        assert!(settings.save_gemini_key("").is_err());
        assert_eq!(settings.openrouter_key().unwrap(), None);
    }

    #[test]
    fn test_save_and_read_back() {
        let settings = settings_with(MemorySettingsStore::new());
        settings.save_openrouter_key("sk-or-1").unwrap();
        settings.save_gemini_key("g-1").unwrap();
        settings.set_system_prompt("Be terse").unwrap();

        assert_eq!(settings.openrouter_key().unwrap().as_deref(), Some("sk-or-1"));
        assert_eq!(settings.gemini_key().unwrap().as_deref(), Some("g-1"));
        assert_eq!(settings.system_prompt().unwrap(), "Be terse");
    }

    #[test]
    fn test_empty_system_prompt_allowed() {
        let settings = settings_with(MemorySettingsStore::new().with_entry(SYSTEM_PROMPT, "old"));
        settings.set_system_prompt("").unwrap();
        assert_eq!(settings.system_prompt().unwrap(), "");
    }

    #[test]
    fn test_snapshot_masks_credentials() {
        let settings = settings_with(
            MemorySettingsStore::new()
                .with_entry(OPENROUTER_KEY, "secret")
                .with_entry(SYSTEM_PROMPT, "p"),
        );

        let snapshot = settings.snapshot().unwrap();
        assert!(snapshot.has_openrouter_key);
        assert!(!snapshot.has_gemini_key);
        assert_eq!(snapshot.system_prompt, "p");
        assert!(!serde_json::to_string(&snapshot).unwrap().contains("secret"));
    }
}

pub mod error;
pub mod settings;
pub mod store;

pub use error::PersistError;
pub use settings::{Settings, SettingsSnapshot, GEMINI_KEY, OPENROUTER_KEY, SYSTEM_PROMPT};
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore};

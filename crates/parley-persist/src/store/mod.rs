mod file;
mod memory;

pub use file::FileSettingsStore;
pub use memory::MemorySettingsStore;

use crate::error::Result;

/// Narrow key-value interface behind which settings are persisted
///
/// Keys and values are plain strings. There is no schema version and no
/// expiry; a missing key reads back as `None`.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

use serde::{Deserialize, Serialize};

/// Model assigned to every new workspace, and used for threads that carry no snapshot.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub const DEFAULT_WORKSPACE_NAME: &str = "New Workspace";
pub const DEFAULT_THREAD_NAME: &str = "New Thread";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Per-workspace generation settings.
///
/// Recorded on the workspace but not sent with completion requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl WorkspaceSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

use parley_chat::ChatSession;
use parley_types::NoticeBoard;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: ChatSession,
    pub notices: Arc<NoticeBoard>,
    /// Whether a sync bridge was started at boot
    pub sync_enabled: bool,
}

impl AppState {
    pub fn new(config: Config, session: ChatSession, notices: Arc<NoticeBoard>) -> Self {
        Self {
            config: Arc::new(config),
            session,
            notices,
            sync_enabled: false,
        }
    }

    pub fn with_sync_enabled(mut self, enabled: bool) -> Self {
        self.sync_enabled = enabled;
        self
    }
}

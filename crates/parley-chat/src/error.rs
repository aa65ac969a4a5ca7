use parley_persist::PersistError;
use parley_types::Notice;
use thiserror::Error;

pub const MISSING_KEY_NOTICE: &str = "Please set your OpenRouter API key in settings";
pub const SEND_FAILED_NOTICE: &str = "Failed to send message. Please try again.";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("OpenRouter API key is not set")]
    MissingCredential,

    #[error("Message is empty")]
    EmptyInput,

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(uuid::Uuid),

    #[error("Thread not found: {0}")]
    ThreadNotFound(uuid::Uuid),

    #[error("Completion request failed: {0:#}")]
    Completion(anyhow::Error),

    #[error("Completion response had no message content")]
    MalformedResponse,

    #[error(transparent)]
    Settings(#[from] PersistError),
}

impl ChatError {
    /// The notice a user sees for this failure, if any.
    ///
    /// Blank input and unknown ids are silent no-ops.
    pub fn user_notice(&self) -> Option<Notice> {
        match self {
            Self::MissingCredential => Some(Notice::warning(MISSING_KEY_NOTICE)),
            Self::Completion(_) | Self::MalformedResponse => Some(Notice::error(SEND_FAILED_NOTICE)),
            Self::Settings(PersistError::EmptyValue(what)) => {
                Some(Notice::error(format!("Please enter {}", with_article(what))))
            }
            Self::Settings(e) => Some(Notice::error(e.to_string())),
            Self::EmptyInput | Self::WorkspaceNotFound(_) | Self::ThreadNotFound(_) => None,
        }
    }
}

fn with_article(what: &str) -> String {
    match what.chars().next() {
        Some(c) if "AEIOUaeiou".contains(c) => format!("an {}", what),
        _ => format!("a {}", what),
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;

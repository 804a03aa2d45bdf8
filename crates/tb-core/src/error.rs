use std::fmt;
use std::path::PathBuf;

/// Failure of a single reasoning-backend round trip. Never retried.
#[derive(Debug)]
pub enum BackendError {
    Http(String),
    Timeout(u64),
    Status { code: u16, body: String },
    EmptyResponse,
    InvalidResponse(String),
    /// A scripted fake ran out of responses or was told to fail.
    Script(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Http(msg) => write!(f, "backend request failed: {msg}"),
            BackendError::Timeout(secs) => write!(f, "backend timed out after {secs}s"),
            BackendError::Status { code, body } => {
                write!(f, "backend returned HTTP {code}: {body}")
            }
            BackendError::EmptyResponse => write!(f, "backend returned no completion text"),
            BackendError::InvalidResponse(msg) => write!(f, "invalid backend response: {msg}"),
            BackendError::Script(msg) => write!(f, "scripted backend: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A persisted record could not be turned back into a template.
    Corrupt { record: String, reason: String },
    InvalidTemplate(String),
    /// A record id that does not name a single entry inside the store.
    InvalidId(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, .. } => write!(f, "I/O error on {}", path.display()),
            StoreError::Corrupt { record, reason } => {
                write!(f, "corrupt template record '{record}': {reason}")
            }
            StoreError::InvalidTemplate(msg) => write!(f, "invalid template: {msg}"),
            StoreError::InvalidId(id) => write!(f, "invalid record id '{id}'"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Which marker-delimited extraction failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Template,
    Title,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Template => f.write_str("template"),
            Stage::Title => f.write_str("title"),
        }
    }
}

#[derive(Debug)]
pub enum BotError {
    Backend(BackendError),
    ExtractionFailed { stage: Stage, response: String },
    Store(StoreError),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::Backend(_) => write!(f, "reasoning backend call failed"),
            BotError::ExtractionFailed { stage, response } => write!(
                f,
                "{stage} extraction failed: markers not found in backend output: {response}"
            ),
            BotError::Store(_) => write!(f, "template store operation failed"),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotError::Backend(e) => Some(e),
            BotError::Store(e) => Some(e),
            BotError::ExtractionFailed { .. } => None,
        }
    }
}

impl From<BackendError> for BotError {
    fn from(e: BackendError) -> Self {
        BotError::Backend(e)
    }
}

impl From<StoreError> for BotError {
    fn from(e: StoreError) -> Self {
        BotError::Store(e)
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

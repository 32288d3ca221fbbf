use thiserror::Error;
use tracing::{error, warn};

/// Domain-specific errors for the expansion engine
#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("Snippet storage failed: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Element '{0}' is not an editable surface")]
    UnsupportedSurface(String),

    #[error("No focused editable surface")]
    NoActiveSurface,

    #[error("Snippet '{0}' not found")]
    SnippetNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExpandError {
    /// Whether the condition is an expected no-op rather than a failure.
    ///
    /// The engine treats these as silent: nothing is inserted and nothing
    /// surfaces to the user.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NoActiveSurface | Self::UnsupportedSurface(_))
    }
}

pub type Result<T> = std::result::Result<T, ExpandError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use flash_expand::error::ResultExt;
///
/// // Recording usage must never abort an insertion
/// store.save(&snippets).log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

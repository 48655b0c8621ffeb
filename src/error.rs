use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Fatal application errors. Anything surfacing as an `AppError` ends the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from the terminal or log file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Malformed remote target given on the command line.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// The listing command could not be run at all.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The starting directory could not be listed.
    #[error("Cannot open start directory: {0}")]
    Startup(#[from] NavError),
}

/// Failures reported by a listing provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("directory not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    /// Process spawn failure, non-zero exit, timeout or unparseable output.
    #[error("transport error: {message}")]
    Transport { message: String },
}

/// Outcome kinds of a rejected navigation transition.
///
/// `InvalidDescent` and `AtRoot` are expected during normal browsing and are
/// swallowed by the caller; `FetchFailed` is reported in the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("failed to list '{path}': {cause}")]
    FetchFailed { path: String, cause: ProviderError },

    #[error("selection is not a directory")]
    InvalidDescent,

    #[error("already at the root")]
    AtRoot,
}

impl NavError {
    /// Whether the error is a normal navigation outcome that shows no message.
    pub fn is_silent(&self) -> bool {
        matches!(self, NavError::InvalidDescent | NavError::AtRoot)
    }
}

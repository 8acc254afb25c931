use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mpskill-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by every modern-python-skill crate
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (serialization, unreadable home directory)
    #[error("configuration error: {0}")]
    Config(String),

    /// Required local state is missing
    #[error("{0}")]
    Precondition(#[from] PreconditionError),

    /// Recursive copy failed part way
    #[error("failed to copy skills from {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote repository errors
    #[error("{0}")]
    Remote(#[from] RemoteError),

    /// Neither the installed nor the source-tree bundle exists
    #[error("could not locate source skill directory within the package")]
    BundleNotLocated,

    /// The installed bundle lookup itself failed
    #[error("packaged skill lookup failed: {0}")]
    BundleLookup(String),
}

impl Error {
    /// Wrap an I/O error raised while copying `from` into `to`.
    pub fn copy(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Copy { from: from.into(), to: to.into(), source }
    }
}

/// Local state a command depends on is absent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// The skill cache has never been populated
    #[error("{} does not exist. Please run 'init' first.", .0.display())]
    CacheMissing(PathBuf),

    /// No project registered under this name
    #[error("project '{0}' not found")]
    ProjectNotFound(String),
}

/// Failures while pulling the bundle from a remote repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Clone failed (network, auth, not found)
    #[error("error cloning repository {url}: {reason}")]
    Clone { url: String, reason: String },

    /// The clone has none of the expected bundle directories
    #[error("could not find 'skill' directory in the repository {url}")]
    BundleNotFound { url: String },
}

impl RemoteError {
    pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Clone { url: url.into(), reason: reason.into() }
    }
}

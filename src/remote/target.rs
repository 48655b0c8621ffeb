//! Parsing of the `remote:` / `remote:/path` command-line target.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A remote name plus the starting path within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub remote: String,
    /// Path after the colon, trailing separators removed. Empty for the remote root.
    pub path: String,
}

impl FromStr for RemoteTarget {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::InvalidTarget("remote path cannot be empty".into()));
        }

        // A bare remote name means its root.
        let (remote, path) = s.split_once(':').unwrap_or((s, ""));
        if remote.is_empty() {
            return Err(AppError::InvalidTarget(format!(
                "'{s}' has no remote name before ':'"
            )));
        }

        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() && path.starts_with('/') {
            "/"
        } else {
            trimmed
        };

        Ok(Self {
            remote: remote.to_string(),
            path: path.to_string(),
        })
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.remote, self.path)
    }
}

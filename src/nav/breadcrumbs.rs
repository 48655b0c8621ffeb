use crate::error::NavError;
use crate::remote::{child_path, SEPARATOR};

/// Ancestor chain from the starting directory down to the current one.
///
/// Always holds at least the starting path, and every element is a strict
/// prefix of the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbStack {
    remote: String,
    paths: Vec<String>,
}

impl BreadcrumbStack {
    pub fn new(remote: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            paths: vec![root.into()],
        }
    }

    /// Descend into `child_name` below the current path.
    pub fn push(&mut self, child_name: &str) -> Result<(), NavError> {
        if child_name.is_empty() || child_name.contains(SEPARATOR) {
            return Err(NavError::InvalidDescent);
        }
        let next = child_path(self.current(), child_name);
        self.paths.push(next);
        Ok(())
    }

    /// Drop the current path and return the one now on top.
    pub fn pop(&mut self) -> Result<&str, NavError> {
        if self.paths.len() == 1 {
            return Err(NavError::AtRoot);
        }
        self.paths.pop();
        Ok(self.current())
    }

    pub fn current(&self) -> &str {
        // `paths` is never empty
        self.paths.last().map(String::as_str).unwrap_or_default()
    }

    #[allow(dead_code)]
    pub fn root(&self) -> &str {
        &self.paths[0]
    }

    #[allow(dead_code)]
    pub fn depth(&self) -> usize {
        self.paths.len()
    }

    #[allow(dead_code)]
    pub fn is_at_root(&self) -> bool {
        self.paths.len() == 1
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Display form, e.g. `gdrive:/backup/Media/2024`.
    pub fn render(&self) -> String {
        format!("{}:{}", self.remote, self.current())
    }
}

//! `rclone lsjson` backed listing provider.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Deserialize;
use tokio::process::Command;

use super::{Entry, ListingProvider};
use crate::error::{AppError, ProviderError};

/// Sort criteria applied to a fetched listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Alphabetical (case-insensitive), default.
    Name,
    /// By size (largest first).
    Size,
    /// By modification time (newest first).
    Modified,
}

impl SortBy {
    /// Parse sort_by from config string.
    pub fn from_config(s: &str) -> Self {
        match s {
            "size" => SortBy::Size,
            "modified" => SortBy::Modified,
            _ => SortBy::Name,
        }
    }
}

/// Ordering the provider hands to the browser. The browser never reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOrder {
    pub sort_by: SortBy,
    pub dirs_first: bool,
}

impl Default for ListingOrder {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Name,
            dirs_first: true,
        }
    }
}

impl ListingOrder {
    pub fn apply(&self, entries: &mut [Entry]) {
        let sort_by = self.sort_by;
        let dirs_first = self.dirs_first;
        entries.sort_by(|a, b| {
            let mut cmp = std::cmp::Ordering::Equal;

            if dirs_first {
                cmp = b.is_dir.cmp(&a.is_dir);
            }

            cmp.then_with(|| match sort_by {
                SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                SortBy::Size => b.size_bytes.cmp(&a.size_bytes),
                SortBy::Modified => b.modified_at.cmp(&a.modified_at),
            })
        });
    }
}

/// One record of `rclone lsjson` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsJsonItem {
    name: String,
    #[serde(default)]
    size: i64,
    #[serde(default)]
    is_dir: bool,
    #[serde(default)]
    mod_time: Option<String>,
}

impl From<LsJsonItem> for Entry {
    fn from(item: LsJsonItem) -> Self {
        let modified_at = item
            .mod_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));
        Entry {
            name: item.name,
            is_dir: item.is_dir,
            // rclone reports -1 for directories and unknown sizes.
            size_bytes: if item.is_dir { 0 } else { item.size.max(0) as u64 },
            modified_at,
        }
    }
}

/// Decode the JSON array printed by `rclone lsjson`.
pub fn parse_lsjson(output: &str) -> Result<Vec<Entry>, ProviderError> {
    let items: Vec<LsJsonItem> =
        serde_json::from_str(output).map_err(|e| ProviderError::Transport {
            message: format!("unexpected lsjson output: {e}"),
        })?;
    Ok(items.into_iter().map(Entry::from).collect())
}

/// Map a failed rclone run onto a provider error kind.
pub fn classify_failure(stderr: &str, status: Option<ExitStatus>) -> ProviderError {
    let lower = stderr.to_lowercase();
    if lower.contains("directory not found")
        || lower.contains("object not found")
        || lower.contains("no such file")
    {
        return ProviderError::NotFound;
    }
    if lower.contains("permission denied")
        || lower.contains("access denied")
        || lower.contains("error 403")
        || lower.contains("403 forbidden")
    {
        return ProviderError::PermissionDenied;
    }

    let message = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
        .or_else(|| status.map(|s| format!("rclone exited with {s}")))
        .unwrap_or_else(|| "rclone failed".to_string());
    ProviderError::Transport { message }
}

/// Lists directories of one remote by shelling out to rclone.
pub struct RcloneProvider {
    binary: String,
    remote: String,
    timeout: Duration,
    order: ListingOrder,
}

impl RcloneProvider {
    pub fn new(
        binary: impl Into<String>,
        remote: impl Into<String>,
        timeout: Duration,
        order: ListingOrder,
    ) -> Self {
        Self {
            binary: binary.into(),
            remote: remote.into(),
            timeout,
            order,
        }
    }
}

#[async_trait]
impl ListingProvider for RcloneProvider {
    async fn list(&self, path: &str) -> Result<Vec<Entry>, ProviderError> {
        let location = format!("{}:{}", self.remote, path);
        debug!("{} lsjson {}", self.binary, location);

        let mut cmd = Command::new(&self.binary);
        cmd.arg("lsjson")
            .arg(&location)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Err(_) => {
                warn!("lsjson {location} timed out after {:?}", self.timeout);
                return Err(ProviderError::Transport {
                    message: format!("timed out after {}s", self.timeout.as_secs()),
                });
            }
            Ok(Err(e)) => {
                return Err(ProviderError::Transport {
                    message: format!("failed to run {}: {e}", self.binary),
                })
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("lsjson {location} failed: {}", stderr.trim());
            return Err(classify_failure(&stderr, Some(output.status)));
        }

        let mut entries = parse_lsjson(&String::from_utf8_lossy(&output.stdout))?;
        self.order.apply(&mut entries);
        debug!("lsjson {location}: {} entries", entries.len());
        Ok(entries)
    }
}

/// Verify the rclone binary can be executed.
pub async fn check_available(binary: &str) -> Result<(), AppError> {
    let status = Command::new(binary)
        .arg("version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => Err(AppError::ProviderUnavailable(format!(
            "{binary} command not found. Please install rclone first."
        ))),
    }
}

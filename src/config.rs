//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--max-items`, `--theme`, etc.)
//! 2. `$RCX_CONFIG` environment variable (path to config file)
//! 3. Project-local `.rcx.toml` in the current working directory
//! 4. Global `~/.config/rcx/config.toml`
//! 5. Built-in defaults

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::remote::rclone::{ListingOrder, SortBy};

// ── Section configs ──────────────────────────────────────────────────────────

/// General browsing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Entries shown per page.
    pub page_size: Option<NonZeroUsize>,
}

/// How the listing command is run and how its output is ordered.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RcloneConfig {
    /// Path or name of the rclone executable.
    pub binary: Option<String>,
    /// Seconds before a single `lsjson` call is abandoned.
    pub timeout_secs: Option<u64>,
    /// Sort order: "name", "size", "modified".
    pub sort_by: Option<String>,
    /// Directories always listed first.
    pub dirs_first: Option<bool>,
}

/// Log file settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path. Defaults to `<cache dir>/rcx/rcx.log`.
    pub file: Option<PathBuf>,
    /// "off", "error", "warn", "info", "debug" or "trace".
    pub level: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub list_bg: Option<String>,
    pub list_fg: Option<String>,
    pub list_selected_bg: Option<String>,
    pub list_selected_fg: Option<String>,
    pub list_dir_fg: Option<String>,
    pub list_file_fg: Option<String>,
    pub list_meta_fg: Option<String>,
    pub title_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub rclone: RcloneConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default number of entries per page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => panic!("page size must be non-zero"),
};
/// Default rclone executable.
pub const DEFAULT_RCLONE_BINARY: &str = "rclone";
/// Default timeout for one listing call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("RCX_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".rcx.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("rcx").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                page_size: other.general.page_size.or(self.general.page_size),
            },
            rclone: RcloneConfig {
                binary: other.rclone.binary.clone().or(self.rclone.binary),
                timeout_secs: other.rclone.timeout_secs.or(self.rclone.timeout_secs),
                sort_by: other.rclone.sort_by.clone().or(self.rclone.sort_by),
                dirs_first: other.rclone.dirs_first.or(self.rclone.dirs_first),
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
                level: other.log.level.clone().or(self.log.level),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
        }
    }

    /// Load configuration from all sources and merge them.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn page_size(&self) -> NonZeroUsize {
        self.general.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn rclone_binary(&self) -> &str {
        self.rclone
            .binary
            .as_deref()
            .unwrap_or(DEFAULT_RCLONE_BINARY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.rclone.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Sort mode: "name", "size", or "modified".
    pub fn sort_by(&self) -> &str {
        self.rclone.sort_by.as_deref().unwrap_or("name")
    }

    /// Whether directories are listed before files.
    pub fn dirs_first(&self) -> bool {
        self.rclone.dirs_first.unwrap_or(true)
    }

    pub fn listing_order(&self) -> ListingOrder {
        ListingOrder {
            sort_by: SortBy::from_config(self.sort_by()),
            dirs_first: self.dirs_first(),
        }
    }

    /// Log file path; `None` when no cache directory is known.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log
            .file
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("rcx").join("rcx.log")))
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log
            .level
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or(LevelFilter::Info)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

//! TOML configuration file for the inspector host.
//!
//! The file is optional.  When `--config <path>` is not given, the host looks
//! in the platform config directory:
//! - Windows:  `%APPDATA%\LiveInspector\inspector.toml`
//! - Linux:    `~/.config/live-inspector/inspector.toml`
//! - macOS:    `~/Library/Application Support/LiveInspector/inspector.toml`
//!
//! ```toml
//! [page]
//! url = "http://10.0.2.2:3000"
//! javascript_enabled = true
//! dom_storage_enabled = true
//! start_in_loading_state = true
//!
//! [link]
//! bind_address = "127.0.0.1"
//! port = 24810
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every key is optional; a missing key takes the [`HostConfig`] default.
//! CLI flags override the file (see `main.rs`).

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::{HostConfig, DEFAULT_LINK_PORT, DEFAULT_PAGE_URL};

/// File name looked up inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "inspector.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `link.bind_address` is not an IP address.
    #[error("invalid bind address {0:?}")]
    InvalidAddress(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// On-disk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub page: PageSection,
    #[serde(default)]
    pub link: LinkSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// What the sandbox loads and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSection {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_true")]
    pub javascript_enabled: bool,
    #[serde(default = "default_true")]
    pub dom_storage_enabled: bool,
    #[serde(default = "default_true")]
    pub start_in_loading_state: bool,
}

/// Where the embedding component connects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkSection {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_queue_capacity")]
    pub event_queue_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// `tracing` level or filter directive, e.g. `"debug"` or `"page_console=warn"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_url() -> String {
    DEFAULT_PAGE_URL.to_string()
}
fn default_true() -> bool {
    true
}
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    DEFAULT_LINK_PORT
}
fn default_queue_capacity() -> usize {
    HostConfig::default().event_queue_capacity
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PageSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            javascript_enabled: true,
            dom_storage_enabled: true,
            start_in_loading_state: true,
        }
    }
}

impl Default for LinkSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            event_queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ConfigFile {
    /// Converts the file contents into the runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `link.bind_address` does not
    /// parse as an IP address.
    pub fn into_host_config(self) -> Result<HostConfig, ConfigError> {
        let ip: IpAddr = self
            .link
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.link.bind_address.clone()))?;

        Ok(HostConfig {
            page_url: self.page.url,
            ws_bind_addr: SocketAddr::new(ip, self.link.port),
            javascript_enabled: self.page.javascript_enabled,
            dom_storage_enabled: self.page.dom_storage_enabled,
            start_in_loading_state: self.page.start_in_loading_state,
            log_level: self.logging.level,
            event_queue_capacity: self.link.event_queue_capacity.max(1),
        })
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the default config file path for this platform.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the base directory cannot
/// be determined from the environment.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the configuration file.
///
/// With `Some(path)` the file must exist.  With `None` the platform default
/// path is tried and a missing file (or an undeterminable config directory)
/// yields [`ConfigFile::default()`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_file(path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Ok(p) => (p, false),
            Err(_) => return Ok(ConfigFile::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            Ok(ConfigFile::default())
        }
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Parses TOML text into a [`ConfigFile`].
pub fn parse_config(content: &str) -> Result<ConfigFile, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Resolves the platform config base directory for the inspector.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("LiveInspector"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("live-inspector"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("LiveInspector")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Host configuration types.
//!
//! [`HostConfig`] is the single source of truth for all runtime settings.
//! It is assembled once at startup from defaults, an optional TOML file and
//! CLI flags (see `infrastructure::config_file` and `main.rs`), then shared
//! read-only.
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! reads inside the domain) makes the host easy to embed in tests.

use std::net::SocketAddr;

/// Page loaded into the sandbox when nothing else is configured.
pub const DEFAULT_PAGE_URL: &str = "http://localhost:3000";

/// Port the host listens on for the embedding component.
pub const DEFAULT_LINK_PORT: u16 = 24810;

/// All runtime configuration for the inspector host.
///
/// # Example
///
/// ```rust
/// use inspector_host::domain::HostConfig;
///
/// let cfg = HostConfig::default();
/// assert_eq!(cfg.page_url, "http://localhost:3000");
/// assert_eq!(cfg.ws_bind_addr.port(), 24810);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Remote address the embedding component loads into the sandbox.
    pub page_url: String,

    /// Address the WebSocket link to the embedding component binds to.
    ///
    /// Defaults to loopback: the component normally runs on the same device.
    pub ws_bind_addr: SocketAddr,

    /// Whether the sandbox runs page scripts.  The instrumentation needs this.
    pub javascript_enabled: bool,

    /// Whether the sandbox exposes `localStorage` / `sessionStorage`.
    pub dom_storage_enabled: bool,

    /// Whether the component shows its loading indicator until the first load.
    pub start_in_loading_state: bool,

    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Capacity of the host event queue.
    pub event_queue_capacity: usize,
}

impl Default for HostConfig {
    /// | Field                  | Default                 |
    /// |------------------------|-------------------------|
    /// | page_url               | `http://localhost:3000` |
    /// | ws_bind_addr           | `127.0.0.1:24810`       |
    /// | javascript_enabled     | `true`                  |
    /// | dom_storage_enabled    | `true`                  |
    /// | start_in_loading_state | `true`                  |
    /// | log_level              | `info`                  |
    /// | event_queue_capacity   | `256`                   |
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            ws_bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_LINK_PORT)),
            javascript_enabled: true,
            dom_storage_enabled: true,
            start_in_loading_state: true,
            log_level: "info".to_string(),
            event_queue_capacity: 256,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_url_is_local_dev_server() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.page_url, "http://localhost:3000");
    }

    #[test]
    fn test_default_link_binds_loopback_24810() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.ws_bind_addr.port(), 24810);
        assert!(cfg.ws_bind_addr.ip().is_loopback());
    }

    #[test]
    fn test_default_sandbox_flags_are_enabled() {
        let cfg = HostConfig::default();
        assert!(cfg.javascript_enabled);
        assert!(cfg.dom_storage_enabled);
        assert!(cfg.start_in_loading_state);
    }

    #[test]
    fn test_default_log_level_is_info() {
        assert_eq!(HostConfig::default().log_level, "info");
    }

    #[test]
    fn test_config_can_be_cloned() {
        let cfg = HostConfig {
            page_url: "https://example.test".to_string(),
            ..HostConfig::default()
        };
        assert_eq!(cfg.clone(), cfg);
    }
}

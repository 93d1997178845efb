//! Bridge message routing and CSS commits.
//!
//! The functions here apply exactly one state transition per call and never
//! touch sockets or tasks; the infrastructure layer decides when to call them.
//!
//! ```text
//! page ──raw string──▶ route_message() ──▶ LogFeed        (Log)
//!                                    └──▶ DomInspection  (DomInfo)
//!                                    └──▶ Diagnostics    (malformed DOMINFO)
//!
//! CssDraft ──commit_css()──▶ stylesheet script ──▶ Sandbox::push_script
//! ```

use thiserror::Error;
use tracing::{debug, error, info, warn};

use inspector_core::{decode_message, injected_script, stylesheet_script, BridgeMessage, Severity};

use crate::domain::config::HostConfig;
use crate::domain::envelope::HostToSandboxMsg;
use crate::domain::sandbox::{Sandbox, SandboxError};
use crate::domain::state::{DiagnosticLevel, HostState, PageLoad};

/// `tracing` target for console lines relayed from the page.
pub const PAGE_CONSOLE_TARGET: &str = "page_console";

/// `tracing` target for DOM inspection updates.
pub const DOM_INSPECTOR_TARGET: &str = "dom_inspector";

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors returned by host-initiated operations.
///
/// None of these are fatal: the host records a diagnostic and carries on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// There is no loaded sandbox to push into yet.
    #[error("sandbox not ready: no component is attached")]
    NotReady,

    /// The push was attempted but did not reach the sandbox.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}

// ── Routing ───────────────────────────────────────────────────────────────────

/// What [`route_message`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Appended to the log feed with this severity.
    Logged(Severity),
    /// Replaced the DOM inspection state.
    Inspected,
    /// Dropped; a diagnostic was recorded.
    Dropped,
}

/// Classifies one raw page message and applies its state transition.
///
/// - `DOMINFO: ` messages replace [`HostState::inspection`]; a malformed
///   payload is dropped with an error diagnostic and the previous inspection
///   stays as it was.
/// - Everything else is appended to [`HostState::logs`] unchanged.
pub fn route_message(state: &mut HostState, raw: &str) -> RouteOutcome {
    match decode_message(raw) {
        Ok(BridgeMessage::Log(entry)) => {
            let level = entry.level;
            match level {
                Severity::Info => info!(target: PAGE_CONSOLE_TARGET, "{}", entry.text),
                Severity::Error => error!(target: PAGE_CONSOLE_TARGET, "{}", entry.text),
            }
            state.logs.push(entry);
            RouteOutcome::Logged(level)
        }
        Ok(BridgeMessage::DomInfo(info)) => {
            info!(
                target: DOM_INSPECTOR_TARGET,
                tag = %info.tag,
                id = info.id.as_deref().unwrap_or("-"),
                class = info.class_name.as_deref().unwrap_or("-"),
                "element inspected"
            );
            state.inspection.replace(info);
            RouteOutcome::Inspected
        }
        Err(e) => {
            error!("dropping bridge message: {e}");
            state
                .diagnostics
                .record(DiagnosticLevel::Error, format!("failed to parse DOMINFO: {e}"));
            RouteOutcome::Dropped
        }
    }
}

// ── CSS commit ────────────────────────────────────────────────────────────────

/// Pushes the current CSS draft into the live page.
///
/// The pushed script rewrites the single managed style element, creating it
/// on first use, so committing the same draft twice leaves one element with
/// the same content.  The draft itself is left untouched.
///
/// # Errors
///
/// - [`BridgeError::NotReady`] when `sandbox` is `None`.
/// - [`BridgeError::Sandbox`] when the push fails.
///
/// Both also record a warning diagnostic.
pub fn commit_css(state: &mut HostState, sandbox: Option<&mut dyn Sandbox>) -> Result<(), BridgeError> {
    let Some(sandbox) = sandbox else {
        warn!("cannot apply CSS: no sandbox attached");
        state
            .diagnostics
            .record(DiagnosticLevel::Warning, BridgeError::NotReady.to_string());
        return Err(BridgeError::NotReady);
    };

    let script = stylesheet_script(state.css.as_str());
    if let Err(e) = sandbox.push_script(&script) {
        warn!("CSS push failed: {e}");
        state
            .diagnostics
            .record(DiagnosticLevel::Warning, format!("CSS push failed: {e}"));
        return Err(e.into());
    }

    debug!(bytes = state.css.as_str().len(), "CSS draft pushed to sandbox");
    Ok(())
}

// ── Page lifecycle ────────────────────────────────────────────────────────────

/// Builds the frame that tells a freshly attached component what to load.
pub fn load_request(config: &HostConfig) -> HostToSandboxMsg {
    HostToSandboxMsg::Load {
        url: config.page_url.clone(),
        injected_script: injected_script().to_string(),
        javascript_enabled: config.javascript_enabled,
        dom_storage_enabled: config.dom_storage_enabled,
        start_in_loading_state: config.start_in_loading_state,
    }
}

/// Records that the sandbox finished loading `url`.
///
/// A load resets the page context, so the previous managed stylesheet is gone
/// and the component has re-run the injected script.  Host state (feed,
/// inspection, draft) is kept.
pub fn page_loaded<'a>(state: &'a mut HostState, url: &str) -> &'a PageLoad {
    let load = PageLoad::new(url);
    info!(load_id = %load.load_id, url, "page loaded");
    state.page.insert(load)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

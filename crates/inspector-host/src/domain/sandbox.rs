//! The host's view of the sandbox: somewhere to push scripts.
//!
//! Everything else about the sandbox (navigation, rendering, executing the
//! injected script on load) belongs to the embedding component.  The host
//! only ever pushes follow-up scripts, one way and best effort.
//!
//! # Testability
//!
//! Production code pushes through a channel to the WebSocket session
//! (`infrastructure::sandbox::ChannelSandbox`); tests use the in-memory
//! document (`infrastructure::sandbox::InMemorySandbox`) or a `mockall` mock.

use thiserror::Error;

/// Why a script push did not reach the sandbox.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SandboxError {
    /// The embedding component went away.
    #[error("sandbox disconnected")]
    Disconnected,

    /// The outbound queue to the component is full.
    #[error("sandbox outbound queue is full")]
    Backpressure,

    /// The sandbox refused the script.
    #[error("sandbox rejected script: {0}")]
    Rejected(String),
}

/// A loaded page the host can push scripts into.
#[cfg_attr(test, mockall::automock)]
pub trait Sandbox: Send {
    /// Runs `script` once against the live document.
    ///
    /// Must not block: the push is fire-and-forget.
    fn push_script(&mut self, script: &str) -> Result<(), SandboxError>;
}

//! Domain layer for inspector-host.
//!
//! Pure types with no I/O: configuration, the host state the bridge drives,
//! the JSON envelope spoken with the embedding component, console commands,
//! and the [`Sandbox`] port the application layer pushes scripts through.
//!
//! No `tokio`, sockets, or file access belong here.

pub mod commands;
pub mod config;
pub mod envelope;
pub mod sandbox;
pub mod state;

pub use commands::HostCommand;
pub use config::HostConfig;
pub use envelope::{HostToSandboxMsg, SandboxToHostMsg};
pub use sandbox::{Sandbox, SandboxError};
pub use state::{CssDraft, DiagnosticLevel, Diagnostics, DomInspectionState, HostState, LogFeed, PageLoad};

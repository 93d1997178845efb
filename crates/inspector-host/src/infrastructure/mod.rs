//! Infrastructure layer for inspector-host.
//!
//! Everything that touches I/O or tasks lives here:
//!
//! - the WebSocket link to the embedding component (`ws_server`),
//! - the host loop task that owns host state (`host_loop`),
//! - the stdin console and its text renderers (`console`),
//! - the optional TOML config file (`config_file`),
//! - `Sandbox` adapters (`sandbox`).
//!
//! Routing and CSS commit logic stay in the application layer; this layer
//! only decides when to call them.

pub mod config_file;
pub mod console;
pub mod host_loop;
pub mod sandbox;
pub mod ws_server;

pub use host_loop::{run_host_loop, HostEvent, HostLoop, SessionId};
pub use ws_server::run_server;

//! inspector-host library crate.
//!
//! The host side of the live page inspector.  An embedding component (the
//! native view owning the sandboxed page) connects over a WebSocket; the host
//! tells it what to load and which script to inject, then turns the page's
//! outbound messages into a console feed and a DOM inspector, and pushes CSS
//! into the live page on demand.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Embedding component (JSON over WebSocket)
//!         ↕
//! [inspector-host]
//!   ├── domain/           Pure types: HostConfig, HostState, envelope, commands, Sandbox port
//!   ├── application/      Message routing and CSS commit (inspector-core protocol)
//!   └── infrastructure/
//!         ├── ws_server/  Accept loop and per-component sessions (tokio-tungstenite)
//!         ├── host_loop/  The task that owns HostState
//!         ├── console/    stdin commands and text renderers
//!         ├── config_file/ Optional TOML configuration
//!         └── sandbox/    ChannelSandbox, InMemorySandbox
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O, no async, no frameworks.
//! - `application` depends on `domain` and `inspector-core` only.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: routing and CSS commit.
pub mod application;

/// Infrastructure layer: WebSocket link, host loop, console, config file.
pub mod infrastructure;

//! # inspector-core
//!
//! Shared library for the live page inspector: the sandbox → host wire
//! protocol and the scripts the host injects into the sandbox.
//!
//! It has no dependencies on sockets, async runtimes, or UI frameworks.
//!
//! # Architecture overview
//!
//! The host embeds a remote page in a sandboxed browsing surface.  The two
//! sides share no memory; they talk over a single string channel:
//!
//! ```text
//! host ──(injected script, once per load)──▶ page
//! page ──("LOG: …" / "ERROR: …" / "DOMINFO: {…}")──▶ host
//! host ──(stylesheet script, on demand)──▶ page
//! ```
//!
//! - **`protocol`** – the message sum type ([`BridgeMessage`]) and the
//!   prefix-based decoder that turns each raw string into one variant.
//! - **`script`** – the instrumentation script (console decorators and the
//!   capturing click inspector) and the CSS commit script.

pub mod protocol;
pub mod script;

pub use protocol::codec::{decode_message, encode_message, ProtocolError};
pub use protocol::messages::{BridgeMessage, DomInfo, InspectedElement, LogEntry, Severity, WirePrefix};
pub use script::{injected_script, stylesheet_script, MANAGED_STYLE_ID};

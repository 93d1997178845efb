//! [`Sandbox`](crate::domain::Sandbox) implementations.
//!
//! - [`ChannelSandbox`] – forwards pushes to the WebSocket session of the
//!   attached embedding component.
//! - [`InMemorySandbox`] – a simulated page for tests: it interprets the
//!   stylesheet script against a fake document and models console patching.

pub mod channel;
pub mod memory;

pub use channel::ChannelSandbox;
pub use memory::InMemorySandbox;

//! Application layer for inspector-host.
//!
//! Knows *what* to do with bridge traffic, not *how* it arrives:
//!
//! - classify page messages and update host state
//! - turn the CSS draft into a script and push it
//! - build the load request for a newly attached component
//!
//! Sockets, tasks and stdin live in the infrastructure layer.

pub mod router;

pub use router::{commit_css, load_request, page_loaded, route_message, BridgeError, RouteOutcome};

//! JavaScript generated by the host and executed inside the sandbox.
//!
//! - [`instrument`] – the constant script run at every page load.
//! - [`stylesheet`] – the on-demand script that rewrites the managed `<style>`.

pub mod instrument;
pub mod stylesheet;

pub use instrument::{injected_script, ConsoleHook, CONSOLE_HOOKS, OUTBOUND_CHANNEL};
pub use stylesheet::{
    escape_template_literal, parse_stylesheet_script, stylesheet_script, StylesheetPatch,
    MANAGED_STYLE_ID,
};

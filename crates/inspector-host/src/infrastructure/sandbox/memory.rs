//! A simulated sandbox page.
//!
//! [`InMemorySandbox`] stands in for the embedding component in tests and
//! models the parts of a real document the bridge depends on:
//!
//! - `<style>` elements in `<head>`, keyed by `id`,
//! - how many times the instrumentation script has patched the console in
//!   the current execution context,
//! - the outbound message channel, as a queue the test drains.
//!
//! Scripts pushed through [`Sandbox::push_script`] are interpreted, not
//! evaluated: a stylesheet script is read back with
//! [`parse_stylesheet_script`] and applied to the fake document, the
//! instrumentation script adds one console layer, and anything else is
//! rejected.

use std::collections::{BTreeMap, VecDeque};

use inspector_core::script::parse_stylesheet_script;
use inspector_core::{encode_message, injected_script, BridgeMessage, DomInfo, ProtocolError};
use tracing::debug;

use crate::domain::sandbox::{Sandbox, SandboxError};

const LOG_METHOD_PREFIX: &str = "LOG: ";
const ERROR_METHOD_PREFIX: &str = "ERROR: ";

/// Fake page state behind a [`Sandbox`] handle.
#[derive(Debug, Default)]
pub struct InMemorySandbox {
    loaded: bool,
    url: Option<String>,
    /// `<style>` elements keyed by id; each list is in document order.
    styles: BTreeMap<String, Vec<String>>,
    /// Number of stacked console decorators.
    layers: usize,
    outbox: VecDeque<String>,
    pushed: Vec<String>,
}

impl InMemorySandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigates to `url`: the execution context is reset, then the
    /// component runs the instrumentation script once.
    pub fn load_page(&mut self, url: &str) {
        self.loaded = true;
        self.url = Some(url.to_string());
        self.styles.clear();
        self.layers = 0;
        self.run_injected_script();
    }

    /// Runs the instrumentation script in the current context again.
    pub fn run_injected_script(&mut self) {
        self.layers += 1;
        debug!(layers = self.layers, "console decorators installed");
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Number of console decorator layers in the current context.
    pub fn console_layers(&self) -> usize {
        self.layers
    }

    /// Page code calls `console.log(args…)`.
    pub fn console_log(&mut self, args: &[&str]) {
        self.emit_console(LOG_METHOD_PREFIX, args);
    }

    /// Page code calls `console.error(args…)`.
    pub fn console_error(&mut self, args: &[&str]) {
        self.emit_console(ERROR_METHOD_PREFIX, args);
    }

    fn emit_console(&mut self, prefix: &str, args: &[&str]) {
        let line = format!("{prefix}{}", args.join(" "));
        for _ in 0..self.layers {
            self.outbox.push_back(line.clone());
        }
    }

    /// The user clicks an element described by `info`.
    ///
    /// Only the instrumented page reports clicks; with no decorator layers
    /// nothing is emitted.
    pub fn click(&mut self, info: DomInfo) -> Result<(), ProtocolError> {
        if self.layers == 0 {
            return Ok(());
        }
        let raw = encode_message(&BridgeMessage::DomInfo(info))?;
        // One capturing listener per injection.
        for _ in 0..self.layers {
            self.outbox.push_back(raw.clone());
        }
        Ok(())
    }

    /// Page code posts `raw` on the outbound channel directly.
    pub fn post_raw(&mut self, raw: impl Into<String>) {
        self.outbox.push_back(raw.into());
    }

    /// Takes every message posted since the last drain, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<String> {
        self.outbox.drain(..).collect()
    }

    /// Number of `<style>` elements with this `id`.
    pub fn style_element_count(&self, id: &str) -> usize {
        self.styles.get(id).map_or(0, Vec::len)
    }

    /// Text content of the first `<style>` element with this `id`.
    pub fn style_text(&self, id: &str) -> Option<&str> {
        self.styles.get(id)?.first().map(String::as_str)
    }

    /// Every script received through [`Sandbox::push_script`], in order.
    pub fn pushed_scripts(&self) -> &[String] {
        &self.pushed
    }
}

impl Sandbox for InMemorySandbox {
    fn push_script(&mut self, script: &str) -> Result<(), SandboxError> {
        if !self.loaded {
            return Err(SandboxError::Disconnected);
        }
        self.pushed.push(script.to_string());

        if script == injected_script() {
            self.run_injected_script();
            return Ok(());
        }

        let Some(patch) = parse_stylesheet_script(script) else {
            return Err(SandboxError::Rejected(
                "script not understood by the in-memory sandbox".to_string(),
            ));
        };

        // getElementById returns the first match; create only when absent.
        let elements = self.styles.entry(patch.element_id).or_default();
        match elements.first_mut() {
            Some(existing) => *existing = patch.css,
            None => elements.push(patch.css),
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

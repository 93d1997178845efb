//! The instrumentation script injected into every page load.
//!
//! The script is a constant: it takes no parameters and reads no host state,
//! so it is rendered once on first use and the same text is handed to the
//! embedding component for every load.
//!
//! # What the script does inside the page
//!
//! ```text
//! console.log(a, b)    → postMessage("LOG: a b")    then the original console.log
//! console.error(a, b)  → postMessage("ERROR: a b")  then the original console.error
//! click (capturing)    → outline target, postMessage("DOMINFO: {...}")
//! ```
//!
//! # Console decorators
//!
//! Each patched console method is described by a [`ConsoleHook`].  The
//! rendered script first snapshots every original function, then replaces
//! each one with `decorate(original, prefix)`: a wrapper that emits the
//! prefixed line and forwards the call to the snapshot.  Because the wrapper
//! closes over whatever function was installed at injection time, running the
//! script twice on the same page stacks two wrappers and every console call
//! is reported twice.  That behavior is kept as is.

use std::fmt::Write as _;
use std::sync::OnceLock;

use crate::protocol::messages::{DOMINFO_PREFIX, DOM_TEXT_LIMIT, ERROR_PREFIX, LOG_PREFIX};

/// JavaScript expression for the page's single outbound message channel.
pub const OUTBOUND_CHANNEL: &str = "window.ReactNativeWebView.postMessage";

/// Outline applied to a clicked element as inspection feedback.
pub const INSPECT_OUTLINE: &str = "2px solid red";

/// A console method the script shadows, and the prefix its lines carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleHook {
    /// Property name on `console` (`"log"`, `"error"`).
    pub method: &'static str,
    /// Wire prefix prepended to the joined arguments.
    pub prefix: &'static str,
}

/// The console methods patched by the instrumentation script, in patch order.
pub const CONSOLE_HOOKS: [ConsoleHook; 2] = [
    ConsoleHook {
        method: "log",
        prefix: LOG_PREFIX,
    },
    ConsoleHook {
        method: "error",
        prefix: ERROR_PREFIX,
    },
];

impl ConsoleHook {
    /// Statement that saves the original function into `originals`.
    fn render_snapshot(&self) -> String {
        format!("    {method}: console.{method},", method = self.method)
    }

    /// Statement that installs the decorated function.
    fn render_install(&self) -> String {
        format!(
            "  console.{method} = decorate(originals.{method}, {prefix});",
            method = self.method,
            prefix = js_string(self.prefix),
        )
    }
}

/// Returns the instrumentation script, rendering it on first use.
pub fn injected_script() -> &'static str {
    static SCRIPT: OnceLock<String> = OnceLock::new();
    SCRIPT.get_or_init(|| render_injected_script(&CONSOLE_HOOKS))
}

/// Renders the instrumentation script for the given console hooks.
pub fn render_injected_script(hooks: &[ConsoleHook]) -> String {
    let mut js = String::with_capacity(1536);

    js.push_str("(function() {\n");
    let _ = writeln!(js, "  const emit = function(line) {{ {OUTBOUND_CHANNEL}(line); }};");
    js.push_str(
        "  const decorate = function(original, prefix) {\n\
         \x20   return function(...args) {\n\
         \x20     emit(prefix + args.join(\" \"));\n\
         \x20     return original.apply(console, args);\n\
         \x20   };\n\
         \x20 };\n",
    );

    // Every original is captured before any method is replaced.
    js.push_str("  const originals = {\n");
    for hook in hooks {
        js.push_str(&hook.render_snapshot());
        js.push('\n');
    }
    js.push_str("  };\n");
    for hook in hooks {
        js.push_str(&hook.render_install());
        js.push('\n');
    }

    js.push_str(&render_click_inspector());
    js.push_str("})();\ntrue;\n");
    js
}

/// The capturing click listener that reports the clicked element.
fn render_click_inspector() -> String {
    format!(
        r#"  document.body.addEventListener("click", function(e) {{
    e.preventDefault();
    e.stopPropagation();
    const el = e.target;
    el.style.outline = {outline};
    const domInfo = {{
      tag: el.tagName,
      id: el.id || null,
      className: el.getAttribute("class") || null,
      text: Array.from((el.textContent || "").trim()).slice(0, {limit}).join("")
    }};
    emit({prefix} + JSON.stringify(domInfo));
  }}, true);
"#,
        outline = js_string(INSPECT_OUTLINE),
        limit = DOM_TEXT_LIMIT,
        prefix = js_string(DOMINFO_PREFIX),
    )
}

/// Quotes `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    // A JSON string literal is a valid JavaScript string literal.
    serde_json::Value::from(s).to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Message types for the sandbox → host bridge.
//!
//! Every message the instrumented page emits is a single, self-contained
//! string.  The first few characters (the *prefix*) decide what the rest of
//! the string means:
//!
//! ```text
//! LOG: <args joined by one space>          → LogEntry (Info)
//! ERROR: <args joined by one space>        → LogEntry (Error)
//! DOMINFO: {"tag":..,"id":..,"className":..,"text":..}  → DomInfo
//! INSPECTED: <tagName> - <className>       → LogEntry (legacy shape)
//! anything else                            → LogEntry (plain line)
//! ```
//!
//! Only the `DOMINFO: ` prefix changes how a message is routed.  All other
//! shapes, including the legacy `INSPECTED: ` lines, become ordinary log
//! entries whose severity is derived from the raw text.

use serde::{Deserialize, Serialize};

/// Prefix of an info-level console line.
pub const LOG_PREFIX: &str = "LOG: ";

/// Prefix of an error-level console line.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Prefix of a structured DOM inspection payload.
pub const DOMINFO_PREFIX: &str = "DOMINFO: ";

/// Prefix of the legacy, unstructured inspection line.
pub const INSPECTED_PREFIX: &str = "INSPECTED: ";

/// Substring that marks a log line as error severity.
///
/// Matched anywhere in the raw text, not only at the start.
pub const ERROR_MARKER: &str = "ERROR";

/// Maximum number of characters kept from an element's text content.
pub const DOM_TEXT_LIMIT: usize = 100;

// ── Prefix scan ───────────────────────────────────────────────────────────────

/// The fixed prefix a raw bridge message starts with.
///
/// Detection is an ordered scan: `DOMINFO: ` is checked first, then the two
/// console prefixes, then the legacy inspection prefix.  A message matching
/// none of them is [`WirePrefix::Plain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WirePrefix {
    DomInfo,
    Log,
    Error,
    Inspected,
    Plain,
}

impl WirePrefix {
    /// Returns the prefix `raw` starts with.
    pub fn detect(raw: &str) -> Self {
        if raw.starts_with(DOMINFO_PREFIX) {
            Self::DomInfo
        } else if raw.starts_with(LOG_PREFIX) {
            Self::Log
        } else if raw.starts_with(ERROR_PREFIX) {
            Self::Error
        } else if raw.starts_with(INSPECTED_PREFIX) {
            Self::Inspected
        } else {
            Self::Plain
        }
    }

    /// The literal prefix text, or `""` for [`WirePrefix::Plain`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DomInfo => DOMINFO_PREFIX,
            Self::Log => LOG_PREFIX,
            Self::Error => ERROR_PREFIX,
            Self::Inspected => INSPECTED_PREFIX,
            Self::Plain => "",
        }
    }
}

// ── Log entries ───────────────────────────────────────────────────────────────

/// Severity of a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    /// Classifies raw text: `Error` if it contains `"ERROR"` anywhere.
    pub fn of(raw: &str) -> Self {
        if raw.contains(ERROR_MARKER) {
            Self::Error
        } else {
            Self::Info
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One line of the host's log feed.
///
/// `text` is the full message exactly as it arrived, prefix included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: Severity,
    pub text: String,
}

impl LogEntry {
    /// Builds an entry from a raw message, deriving the severity from its text.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let text = raw.into();
        Self {
            level: Severity::of(&text),
            text,
        }
    }

    /// The wire prefix this entry's text starts with.
    pub fn prefix(&self) -> WirePrefix {
        WirePrefix::detect(&self.text)
    }

    /// Recovers the legacy inspection record from an `INSPECTED: ` line.
    ///
    /// Returns `None` for every other kind of line.
    pub fn inspected(&self) -> Option<InspectedElement> {
        InspectedElement::from_wire(&self.text)
    }
}

// ── DOM inspection ────────────────────────────────────────────────────────────

/// Description of the element the user last clicked inside the sandbox.
///
/// The JSON shape matches what the injected click listener emits:
///
/// ```json
/// {"tag":"DIV","id":null,"className":"card","text":"Hello"}
/// ```
///
/// A missing `id` / `className` key and an explicit `null` both decode to
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomInfo {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "className", default)]
    pub class_name: Option<String>,
    pub text: String,
}

impl DomInfo {
    /// Builds a record, trimming and truncating `text` the way the page does.
    pub fn new(
        tag: impl Into<String>,
        id: Option<String>,
        class_name: Option<String>,
        text: &str,
    ) -> Self {
        Self {
            tag: tag.into(),
            id: id.filter(|s| !s.is_empty()),
            class_name: class_name.filter(|s| !s.is_empty()),
            text: truncate_chars(text.trim(), DOM_TEXT_LIMIT).to_string(),
        }
    }

    /// Enforces the text limit on a record decoded from the wire.
    pub(crate) fn clamp_text(mut self) -> Self {
        let clamped = truncate_chars(&self.text, DOM_TEXT_LIMIT);
        if clamped.len() != self.text.len() {
            self.text = clamped.to_string();
        }
        self
    }
}

/// Returns the first `limit` characters of `text`.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// The legacy, unstructured inspection record (`INSPECTED: <tag> - <class>`).
///
/// Older builds of the page script emitted this instead of `DOMINFO: `.  It
/// is never routed into the inspection state; it only exists so the log view
/// can present such lines nicely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedElement {
    pub tag: String,
    pub class_name: String,
}

impl InspectedElement {
    /// Parses `INSPECTED: <tag> - <className>`.
    ///
    /// The class part may be empty (`"INSPECTED: P - "`).
    pub fn from_wire(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix(INSPECTED_PREFIX)?;
        let (tag, class_name) = match rest.split_once(" - ") {
            Some((tag, class_name)) => (tag, class_name),
            None => (rest.strip_suffix(" -").unwrap_or(rest), ""),
        };
        if tag.is_empty() {
            return None;
        }
        Some(Self {
            tag: tag.to_string(),
            class_name: class_name.to_string(),
        })
    }
}

// ── Bridge message ────────────────────────────────────────────────────────────

/// A classified sandbox → host message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeMessage {
    /// A console line (either protocol variant, including legacy lines).
    Log(LogEntry),
    /// A structured DOM inspection record.
    DomInfo(DomInfo),
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Host-side state driven by the bridge.
//!
//! All of it is owned by a single task (the host loop) and mutated only
//! through the router in `application`; nothing here is shared or locked.
//!
//! | piece                  | mutation                                        |
//! |------------------------|-------------------------------------------------|
//! | [`LogFeed`]            | append only, most recent last, never evicted    |
//! | [`DomInspectionState`] | replaced wholesale, no history                  |
//! | [`CssDraft`]           | edited freely; reaches the page only on commit  |
//! | [`Diagnostics`]        | append only                                     |

use inspector_core::{DomInfo, LogEntry, Severity};
use uuid::Uuid;

// ── Log feed ──────────────────────────────────────────────────────────────────

/// Ordered console lines received from the page.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LogFeed {
    entries: Vec<LogEntry>,
}

impl LogFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry at the end of the feed.
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Number of error-severity entries.
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.level == Severity::Error)
            .count()
    }
}

// ── DOM inspection ────────────────────────────────────────────────────────────

/// The element the user clicked last, if any.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DomInspectionState {
    current: Option<DomInfo>,
}

impl DomInspectionState {
    /// Replaces the whole state with `info`.
    pub fn replace(&mut self, info: DomInfo) {
        self.current = Some(info);
    }

    pub fn current(&self) -> Option<&DomInfo> {
        self.current.as_ref()
    }
}

// ── CSS draft ─────────────────────────────────────────────────────────────────

/// CSS text the user is editing but has not applied yet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CssDraft {
    text: String,
}

impl CssDraft {
    /// Replaces the draft.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Appends `line`, separated from existing text by a newline.
    pub fn append_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// How serious a host-side diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

/// A recoverable failure the host noticed and contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// Append-only list of diagnostics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn record(&mut self, level: DiagnosticLevel, message: impl Into<String>) {
        self.records.push(Diagnostic {
            level,
            message: message.into(),
        });
    }

    pub fn all(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Page load ─────────────────────────────────────────────────────────────────

/// The document currently loaded in the sandbox.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLoad {
    /// Fresh for every load reported by the embedding component.
    pub load_id: Uuid,
    pub url: String,
}

impl PageLoad {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            load_id: Uuid::new_v4(),
            url: url.into(),
        }
    }
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

/// Everything the host knows about the instrumented page.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HostState {
    pub logs: LogFeed,
    pub inspection: DomInspectionState,
    pub css: CssDraft,
    pub diagnostics: Diagnostics,
    pub page: Option<PageLoad>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

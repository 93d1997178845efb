//! Line-oriented console: the host's stand-in for a UI.
//!
//! [`run_console`] turns input lines into [`HostEvent::Command`]s; the
//! `render_*` functions turn host state into the text the host loop prints.

use std::fmt::Write as _;
use std::io::BufRead;

use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::commands::HostCommand;
use crate::domain::state::{DiagnosticLevel, Diagnostics, DomInspectionState, LogFeed};
use crate::infrastructure::host_loop::HostEvent;
use inspector_core::Severity;

/// Shown in the DOM inspector for a field the element does not have.
pub const MISSING_VALUE: &str = "—";

// ── Input ─────────────────────────────────────────────────────────────────────

/// Reads commands from `input` until EOF or until the host loop is gone.
///
/// Blocking: run it on a dedicated thread, not on the async runtime.  A
/// pending stdin read would otherwise hold up runtime shutdown.
///
/// Blank lines are skipped.  Returns the number of commands forwarded.
///
/// # Errors
///
/// Returns an I/O error if reading from `input` fails.
pub fn run_console<R: BufRead>(input: R, events: &mpsc::Sender<HostEvent>) -> std::io::Result<usize> {
    let mut forwarded = 0;

    for line in input.lines() {
        let Some(cmd) = HostCommand::parse(&line?) else {
            continue;
        };
        if events.blocking_send(HostEvent::Command(cmd)).is_err() {
            debug!("host loop closed; console reader stopping");
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// The console feed, oldest first.  Error lines are marked with `!`.
pub fn render_logs(feed: &LogFeed) -> String {
    if feed.is_empty() {
        return "(no console output yet)\n".to_string();
    }
    let mut out = String::new();
    for entry in feed.entries() {
        let mark = match entry.level {
            Severity::Error => '!',
            Severity::Info => ' ',
        };
        let _ = writeln!(out, "{mark} {}", entry.text);
    }
    let _ = writeln!(
        out,
        "({} lines, {} errors)",
        feed.len(),
        feed.error_count()
    );
    out
}

/// The DOM inspector panel.
pub fn render_dom(state: &DomInspectionState) -> String {
    let Some(info) = state.current() else {
        return "(tap an element in the page to inspect it)\n".to_string();
    };
    let or_missing = |v: Option<&str>| v.unwrap_or(MISSING_VALUE).to_string();
    let text = if info.text.is_empty() {
        MISSING_VALUE
    } else {
        info.text.as_str()
    };
    format!(
        "tag:   {}\nid:    {}\nclass: {}\ntext:  {}\n",
        info.tag,
        or_missing(info.id.as_deref()),
        or_missing(info.class_name.as_deref()),
        text,
    )
}

pub fn render_diagnostics(diags: &Diagnostics) -> String {
    if diags.is_empty() {
        return "(no diagnostics)\n".to_string();
    }
    let mut out = String::new();
    for d in diags.all() {
        let level = match d.level {
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Error => "error",
        };
        let _ = writeln!(out, "{level}: {}", d.message);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use inspector_core::{DomInfo, LogEntry};

    #[test]
    fn test_render_logs_marks_error_lines() {
        // Arrange
        let mut feed = LogFeed::new();
        feed.push(LogEntry::from_raw("LOG: ok"));
        feed.push(LogEntry::from_raw("ERROR: boom"));

        // Act
        let text = render_logs(&feed);

        // Assert
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  LOG: ok");
        assert_eq!(lines[1], "! ERROR: boom");
        assert_eq!(lines[2], "(2 lines, 1 errors)");
    }

    #[test]
    fn test_render_empty_feed() {
        assert_eq!(render_logs(&LogFeed::new()), "(no console output yet)\n");
    }

    #[test]
    fn test_render_dom_uses_placeholder_for_missing_fields() {
        let mut state = DomInspectionState::default();
        state.replace(DomInfo::new("DIV", None, Some("card".into()), "Hello"));

        let text = render_dom(&state);

        assert!(text.contains("tag:   DIV\n"));
        assert!(text.contains("id:    —\n"));
        assert!(text.contains("class: card\n"));
        assert!(text.contains("text:  Hello\n"));
    }

    #[test]
    fn test_render_dom_before_first_click() {
        let text = render_dom(&DomInspectionState::default());
        assert!(text.starts_with("(tap an element"));
    }

    #[test]
    fn test_render_diagnostics_lists_levels() {
        let mut diags = Diagnostics::default();
        diags.record(DiagnosticLevel::Error, "failed to parse DOMINFO");
        assert_eq!(render_diagnostics(&diags), "error: failed to parse DOMINFO\n");
    }

    #[test]
    fn test_run_console_forwards_parsed_commands() {
        // Arrange
        let input: &[u8] = b"css body { color: red; }\n\napply\nlogs\n";
        let (tx, mut rx) = mpsc::channel(8);

        // Act
        let forwarded = run_console(input, &tx).unwrap();

        // Assert
        assert_eq!(forwarded, 3);
        let mut cmds = Vec::new();
        while let Ok(HostEvent::Command(cmd)) = rx.try_recv() {
            cmds.push(cmd);
        }
        assert_eq!(
            cmds,
            [
                HostCommand::SetCss("body { color: red; }".to_string()),
                HostCommand::ApplyCss,
                HostCommand::ShowLogs,
            ]
        );
    }

    #[test]
    fn test_run_console_stops_when_host_loop_is_gone() {
        let input: &[u8] = b"logs\ndom\n";
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        assert_eq!(run_console(input, &tx).unwrap(), 0);
    }
}

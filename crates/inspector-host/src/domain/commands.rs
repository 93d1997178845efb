//! Console commands typed by the user at the host.
//!
//! One command per line:
//!
//! | input          | effect                                   |
//! |----------------|------------------------------------------|
//! | `css <text>`   | replace the CSS draft                    |
//! | `css+ <text>`  | append a line to the CSS draft           |
//! | `css-clear`    | empty the CSS draft                      |
//! | `apply`        | commit the draft into the live page      |
//! | `logs`         | print the log feed                       |
//! | `dom`          | print the last inspected element         |
//! | `diag`         | print host diagnostics                   |
//! | `help`         | list commands                            |

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    SetCss(String),
    AppendCss(String),
    ClearCss,
    ApplyCss,
    ShowLogs,
    ShowDom,
    ShowDiagnostics,
    Help,
    /// Anything that is not a known command, kept for the error hint.
    Unknown(String),
}

/// Help text printed by `help` and after an unknown command.
pub const HELP: &str = "\
commands:
  css <text>    replace the CSS draft
  css+ <text>   append a line to the CSS draft
  css-clear     empty the CSS draft
  apply         apply the CSS draft to the page
  logs          show the console feed
  dom           show the last inspected element
  diag          show host diagnostics
  help          show this list";

impl HostCommand {
    /// Parses one input line.  Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let (word, rest) = match line.trim_start().split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (line.trim(), ""),
        };

        let cmd = match word {
            "css" => Self::SetCss(rest.to_string()),
            "css+" => Self::AppendCss(rest.to_string()),
            "css-clear" => Self::ClearCss,
            "apply" => Self::ApplyCss,
            "logs" => Self::ShowLogs,
            "dom" => Self::ShowDom,
            "diag" => Self::ShowDiagnostics,
            "help" | "?" => Self::Help,
            _ => Self::Unknown(line.trim().to_string()),
        };
        Some(cmd)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_keeps_text_verbatim() {
        let cmd = HostCommand::parse("css body { color: red; }").unwrap();
        assert_eq!(cmd, HostCommand::SetCss("body { color: red; }".to_string()));
    }

    #[test]
    fn test_parse_css_keeps_inner_spacing_and_backticks() {
        let cmd = HostCommand::parse("css+ a::after {  content: `x`; }\n").unwrap();
        assert_eq!(
            cmd,
            HostCommand::AppendCss("a::after {  content: `x`; }".to_string())
        );
    }

    #[test]
    fn test_parse_bare_css_sets_empty_draft() {
        assert_eq!(HostCommand::parse("css"), Some(HostCommand::SetCss(String::new())));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(HostCommand::parse("apply"), Some(HostCommand::ApplyCss));
        assert_eq!(HostCommand::parse("  logs  "), Some(HostCommand::ShowLogs));
        assert_eq!(HostCommand::parse("dom"), Some(HostCommand::ShowDom));
        assert_eq!(HostCommand::parse("diag"), Some(HostCommand::ShowDiagnostics));
        assert_eq!(HostCommand::parse("css-clear"), Some(HostCommand::ClearCss));
        assert_eq!(HostCommand::parse("?"), Some(HostCommand::Help));
    }

    #[test]
    fn test_parse_blank_line_is_none() {
        assert_eq!(HostCommand::parse(""), None);
        assert_eq!(HostCommand::parse("   \r\n"), None);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            HostCommand::parse("reload now"),
            Some(HostCommand::Unknown("reload now".to_string()))
        );
    }
}

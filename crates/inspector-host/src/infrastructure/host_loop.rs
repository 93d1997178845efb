//! The host loop: the single task that owns [`HostState`].
//!
//! Every other task (WebSocket sessions, the console reader) talks to it by
//! sending a [`HostEvent`] into one bounded channel.  Events are applied one
//! at a time in arrival order, which keeps per-sender FIFO order and means
//! host state needs no locks.
//!
//! ```text
//! ws session ──Attached / Inbound / Detached──┐
//!                                             ├──▶ mpsc ──▶ HostLoop ──▶ HostState
//! console    ──Command───────────────────────┘                 │
//!                                                              └──▶ Sandbox::push_script
//! ```

use std::io::Write;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::{commit_css, page_loaded, route_message};
use crate::domain::commands::{HostCommand, HELP};
use crate::domain::envelope::SandboxToHostMsg;
use crate::domain::sandbox::Sandbox;
use crate::domain::state::HostState;
use crate::infrastructure::console::{render_diagnostics, render_dom, render_logs};

/// Identifies one connection of the embedding component.
pub type SessionId = u64;

/// Everything the host loop reacts to.
pub enum HostEvent {
    /// A component connected.  Its handle replaces any previous one.
    Attached {
        session: SessionId,
        sandbox: Box<dyn Sandbox>,
    },
    /// A component connection ended.
    Detached { session: SessionId },
    /// A frame arrived from a component.
    Inbound {
        session: SessionId,
        msg: SandboxToHostMsg,
    },
    /// The user typed a console command.
    Command(HostCommand),
}

impl std::fmt::Debug for HostEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attached { session, .. } => write!(f, "Attached({session})"),
            Self::Detached { session } => write!(f, "Detached({session})"),
            Self::Inbound { session, msg } => write!(f, "Inbound({session}, {})", msg.kind()),
            Self::Command(cmd) => write!(f, "Command({cmd:?})"),
        }
    }
}

struct Attachment {
    session: SessionId,
    sandbox: Box<dyn Sandbox>,
}

/// Owns host state and the current sandbox handle.
pub struct HostLoop<W> {
    state: HostState,
    attached: Option<Attachment>,
    out: W,
}

impl<W: Write> HostLoop<W> {
    /// Creates a loop that prints command output to `out`.
    pub fn new(state: HostState, out: W) -> Self {
        Self {
            state,
            attached: None,
            out,
        }
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    /// Whether a component is attached to push scripts into.
    ///
    /// `PageLoaded` is informational only; a component that never sends it
    /// is still ready as soon as it is attached.
    pub fn is_ready(&self) -> bool {
        self.attached.is_some()
    }

    /// Applies one event.
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Attached { session, sandbox } => {
                if let Some(old) = self.attached.as_ref() {
                    info!(old = old.session, new = session, "replacing attached component");
                } else {
                    info!(session, "component attached");
                }
                self.attached = Some(Attachment { session, sandbox });
            }
            HostEvent::Detached { session } => {
                if self.attached.as_ref().is_some_and(|a| a.session == session) {
                    info!(session, "component detached");
                    self.attached = None;
                } else {
                    debug!(session, "stale session detached");
                }
            }
            HostEvent::Inbound { session, msg } => self.handle_inbound(session, msg),
            HostEvent::Command(cmd) => self.handle_command(cmd),
        }
    }

    fn handle_inbound(&mut self, session: SessionId, msg: SandboxToHostMsg) {
        if !self.attached.as_ref().is_some_and(|a| a.session == session) {
            debug!(session, kind = msg.kind(), "ignoring frame from replaced session");
            return;
        }
        match msg {
            SandboxToHostMsg::Message { data } => {
                route_message(&mut self.state, &data);
            }
            SandboxToHostMsg::PageLoaded { url } => {
                page_loaded(&mut self.state, &url);
            }
        }
    }

    fn handle_command(&mut self, cmd: HostCommand) {
        let text = match cmd {
            HostCommand::SetCss(css) => {
                self.state.css.set(css);
                format!("draft: {} bytes\n", self.state.css.as_str().len())
            }
            HostCommand::AppendCss(line) => {
                self.state.css.append_line(&line);
                format!("draft: {} bytes\n", self.state.css.as_str().len())
            }
            HostCommand::ClearCss => {
                self.state.css.clear();
                "draft cleared\n".to_string()
            }
            HostCommand::ApplyCss => {
                let sandbox = self.attached.as_mut().map(|a| a.sandbox.as_mut());
                let result = match sandbox {
                    Some(s) => commit_css(&mut self.state, Some(s)),
                    None => commit_css(&mut self.state, None),
                };
                match result {
                    Ok(()) => "applied\n".to_string(),
                    Err(e) => format!("not applied: {e}\n"),
                }
            }
            HostCommand::ShowLogs => render_logs(&self.state.logs),
            HostCommand::ShowDom => render_dom(&self.state.inspection),
            HostCommand::ShowDiagnostics => render_diagnostics(&self.state.diagnostics),
            HostCommand::Help => format!("{HELP}\n"),
            HostCommand::Unknown(input) => format!("unknown command {input:?}\n{HELP}\n"),
        };
        self.print(&text);
    }

    fn print(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            warn!("console write failed: {e}");
        }
    }

    /// Consumes the loop, returning the final state.
    pub fn into_state(self) -> HostState {
        self.state
    }
}

/// Runs the host loop until every event sender has been dropped.
///
/// Returns the final host state.
pub async fn run_host_loop<W: Write>(
    mut events: mpsc::Receiver<HostEvent>,
    state: HostState,
    out: W,
) -> HostState {
    let mut host = HostLoop::new(state, out);
    while let Some(event) = events.recv().await {
        debug!(?event, "host event");
        host.handle(event);
    }
    debug!("all event senders dropped; host loop exiting");
    host.into_state()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sandbox::{MockSandbox, SandboxError};
    use crate::domain::state::DiagnosticLevel;
    use crate::infrastructure::sandbox::InMemorySandbox;
    use inspector_core::MANAGED_STYLE_ID;

    fn message(session: SessionId, data: &str) -> HostEvent {
        HostEvent::Inbound {
            session,
            msg: SandboxToHostMsg::Message {
                data: data.to_string(),
            },
        }
    }

    fn loaded(session: SessionId) -> HostEvent {
        HostEvent::Inbound {
            session,
            msg: SandboxToHostMsg::PageLoaded {
                url: "http://localhost:3000".to_string(),
            },
        }
    }

    fn output(host: &HostLoop<Vec<u8>>) -> String {
        String::from_utf8(host.out.clone()).unwrap()
    }

    #[test]
    fn test_apply_before_attach_is_not_ready() {
        // Arrange
        let mut host = HostLoop::new(HostState::new(), Vec::new());

        // Act
        host.handle(HostEvent::Command(HostCommand::SetCss("p { }".into())));
        host.handle(HostEvent::Command(HostCommand::ApplyCss));

        // Assert
        assert!(output(&host).contains("not applied: sandbox not ready"));
        assert_eq!(host.state().diagnostics.all()[0].level, DiagnosticLevel::Warning);
        assert_eq!(host.state().css.as_str(), "p { }");
    }

    #[test]
    fn test_apply_pushes_without_page_loaded_frame() {
        // Arrange: the component only posts page messages, never PageLoaded
        let mut sandbox = MockSandbox::new();
        sandbox
            .expect_push_script()
            .withf(|script: &str| script.contains("`body { color: red; }`"))
            .times(1)
            .returning(|_| Ok(()));
        let mut host = HostLoop::new(HostState::new(), Vec::new());
        host.handle(HostEvent::Attached {
            session: 1,
            sandbox: Box::new(sandbox),
        });
        host.handle(message(1, "LOG: page is alive"));

        // Act
        host.handle(HostEvent::Command(HostCommand::SetCss(
            "body { color: red; }".into(),
        )));
        host.handle(HostEvent::Command(HostCommand::ApplyCss));

        // Assert
        assert!(host.is_ready());
        assert!(output(&host).ends_with("applied\n"));
        assert!(host.state().diagnostics.is_empty());
        assert!(host.state().page.is_none());
    }

    #[test]
    fn test_apply_after_load_pushes_script() {
        // Arrange
        let mut sandbox = MockSandbox::new();
        sandbox
            .expect_push_script()
            .withf(|script: &str| script.contains(MANAGED_STYLE_ID))
            .times(1)
            .returning(|_| Ok(()));
        let mut host = HostLoop::new(HostState::new(), Vec::new());
        host.handle(HostEvent::Attached {
            session: 1,
            sandbox: Box::new(sandbox),
        });
        host.handle(loaded(1));

        // Act
        host.handle(HostEvent::Command(HostCommand::ApplyCss));

        // Assert
        assert!(host.is_ready());
        assert!(output(&host).ends_with("applied\n"));
        assert_eq!(host.state().page.as_ref().unwrap().url, "http://localhost:3000");
    }

    #[test]
    fn test_push_failure_is_reported_not_fatal() {
        let mut sandbox = MockSandbox::new();
        sandbox
            .expect_push_script()
            .returning(|_| Err(SandboxError::Backpressure));
        let mut host = HostLoop::new(HostState::new(), Vec::new());
        host.handle(HostEvent::Attached {
            session: 1,
            sandbox: Box::new(sandbox),
        });
        host.handle(loaded(1));

        host.handle(HostEvent::Command(HostCommand::ApplyCss));

        assert!(output(&host).contains("not applied"));
        assert_eq!(host.state().diagnostics.len(), 1);
    }

    #[test]
    fn test_messages_are_routed_in_arrival_order() {
        let mut host = HostLoop::new(HostState::new(), Vec::new());
        host.handle(HostEvent::Attached {
            session: 7,
            sandbox: Box::new(InMemorySandbox::new()),
        });

        host.handle(message(7, "LOG: one"));
        host.handle(message(7, "ERROR: two"));
        host.handle(message(7, "LOG: three"));

        let texts: Vec<&str> = host
            .state()
            .logs
            .entries()
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts, ["LOG: one", "ERROR: two", "LOG: three"]);
    }

    #[test]
    fn test_newer_session_replaces_older() {
        // Arrange
        let mut host = HostLoop::new(HostState::new(), Vec::new());
        host.handle(HostEvent::Attached {
            session: 1,
            sandbox: Box::new(InMemorySandbox::new()),
        });
        host.handle(HostEvent::Attached {
            session: 2,
            sandbox: Box::new(InMemorySandbox::new()),
        });

        // Act: the replaced session keeps talking, then goes away
        host.handle(message(1, "LOG: stale"));
        host.handle(HostEvent::Detached { session: 1 });
        host.handle(message(2, "LOG: fresh"));

        // Assert
        assert_eq!(host.state().logs.len(), 1);
        assert_eq!(host.state().logs.entries()[0].text, "LOG: fresh");
        assert!(host.attached.as_ref().is_some_and(|a| a.session == 2));
    }

    #[test]
    fn test_detach_clears_readiness() {
        let mut host = HostLoop::new(HostState::new(), Vec::new());
        host.handle(HostEvent::Attached {
            session: 3,
            sandbox: Box::new(InMemorySandbox::new()),
        });
        host.handle(loaded(3));
        host.handle(HostEvent::Detached { session: 3 });
        assert!(!host.is_ready());
    }

    #[test]
    fn test_unknown_command_prints_help() {
        let mut host = HostLoop::new(HostState::new(), Vec::new());
        host.handle(HostEvent::Command(HostCommand::Unknown("reload".into())));
        let out = output(&host);
        assert!(out.starts_with("unknown command \"reload\""));
        assert!(out.contains("css-clear"));
    }

    #[tokio::test]
    async fn test_run_host_loop_returns_state_when_senders_drop() {
        // Arrange
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_host_loop(rx, HostState::new(), std::io::sink()));

        // Act
        tx.send(HostEvent::Attached {
            session: 1,
            sandbox: Box::new(InMemorySandbox::new()),
        })
        .await
        .unwrap();
        tx.send(message(1, "LOG: hello world")).await.unwrap();
        tx.send(message(1, "DOMINFO: {not json")).await.unwrap();
        drop(tx);
        let state = tokio_test::assert_ok!(handle.await);

        // Assert
        assert_eq!(state.logs.len(), 1);
        assert_eq!(state.diagnostics.len(), 1);
        assert!(state.inspection.current().is_none());
    }
}

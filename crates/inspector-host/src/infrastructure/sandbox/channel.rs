//! Sandbox handle backed by the component session's outbound queue.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::envelope::HostToSandboxMsg;
use crate::domain::sandbox::{Sandbox, SandboxError};

/// Pushes scripts as [`HostToSandboxMsg::InjectScript`] frames.
///
/// The session task drains the receiving end and writes each frame to the
/// WebSocket.  `push_script` never waits: a full queue is reported as
/// [`SandboxError::Backpressure`] instead.
#[derive(Debug, Clone)]
pub struct ChannelSandbox {
    tx: mpsc::Sender<HostToSandboxMsg>,
}

impl ChannelSandbox {
    pub fn new(tx: mpsc::Sender<HostToSandboxMsg>) -> Self {
        Self { tx }
    }
}

impl Sandbox for ChannelSandbox {
    fn push_script(&mut self, script: &str) -> Result<(), SandboxError> {
        let frame = HostToSandboxMsg::InjectScript {
            script: script.to_string(),
        };
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => SandboxError::Backpressure,
            TrySendError::Closed(_) => SandboxError::Disconnected,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_script_queues_inject_frame() {
        // Arrange
        let (tx, mut rx) = mpsc::channel(4);
        let mut sandbox = ChannelSandbox::new(tx);

        // Act
        sandbox.push_script("document.title").unwrap();

        // Assert
        assert_eq!(
            rx.try_recv().unwrap(),
            HostToSandboxMsg::InjectScript {
                script: "document.title".to_string()
            }
        );
    }

    #[test]
    fn test_push_script_reports_full_queue() {
        let (tx, _rx) = mpsc::channel(1);
        let mut sandbox = ChannelSandbox::new(tx);
        sandbox.push_script("1").unwrap();
        assert_eq!(sandbox.push_script("2"), Err(SandboxError::Backpressure));
    }

    #[test]
    fn test_push_script_reports_closed_session() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut sandbox = ChannelSandbox::new(tx);
        assert_eq!(sandbox.push_script("1"), Err(SandboxError::Disconnected));
    }
}

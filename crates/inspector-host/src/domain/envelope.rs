//! JSON envelope for the link between the host and the embedding component.
//!
//! The embedding component owns the sandbox (navigation, rendering, script
//! execution).  The host needs exactly three things from it:
//!
//! 1. load a fixed address and run a script once the document is ready,
//! 2. call back once per outbound page message with the raw string,
//! 3. run an extra script in the already-loaded page on demand.
//!
//! Those map onto the frames below.  Every frame is a JSON object with a
//! `"type"` field naming the variant:
//!
//! ```json
//! {"type":"Load","url":"http://localhost:3000","injected_script":"(function(){…})();", …}
//! {"type":"InjectScript","script":"(function(){…})();"}
//! {"type":"Message","data":"LOG: hello"}
//! {"type":"PageLoaded","url":"http://localhost:3000/cart"}
//! ```
//!
//! Two enums keep the directions apart: sending a component-only frame to the
//! component is a compile-time error.

use serde::{Deserialize, Serialize};

// ── Host → component ──────────────────────────────────────────────────────────

/// Frames the host sends to the embedding component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostToSandboxMsg {
    /// Load `url` and run `injected_script` after every document load.
    ///
    /// Sent once, right after the component connects.  The component must
    /// re-run the script itself on each navigation: a reload resets the
    /// page's whole execution context.
    Load {
        url: String,
        injected_script: String,
        javascript_enabled: bool,
        dom_storage_enabled: bool,
        start_in_loading_state: bool,
    },

    /// Run `script` once in the page that is currently loaded.
    InjectScript { script: String },
}

// ── Component → host ──────────────────────────────────────────────────────────

/// Frames the embedding component sends to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SandboxToHostMsg {
    /// One message the page posted on its outbound channel, verbatim.
    Message { data: String },

    /// The sandbox finished loading a document (first load or navigation).
    PageLoaded { url: String },
}

impl SandboxToHostMsg {
    /// Short variant name for log lines, without payload contents.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "Message",
            Self::PageLoaded { .. } => "PageLoaded",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_serializes_with_type_discriminant() {
        // Arrange
        let msg = HostToSandboxMsg::Load {
            url: "http://localhost:3000".to_string(),
            injected_script: "true;".to_string(),
            javascript_enabled: true,
            dom_storage_enabled: true,
            start_in_loading_state: true,
        };

        // Act
        let json = serde_json::to_string(&msg).unwrap();

        // Assert
        assert!(json.contains(r#""type":"Load""#));
        assert!(json.contains(r#""url":"http://localhost:3000""#));
        assert!(json.contains(r#""injected_script":"true;""#));
    }

    #[test]
    fn test_inject_script_escapes_script_text() {
        let msg = HostToSandboxMsg::InjectScript {
            script: "style.textContent = `a\n\"b\"`;".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        // The whole script travels as one JSON string.
        assert!(!json.contains('\n'));
        let back: HostToSandboxMsg = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_message_frame_deserializes_from_component_json() {
        // Arrange: what an embedding component sends from its onMessage callback
        let json = r#"{"type":"Message","data":"LOG: hello world"}"#;

        // Act
        let msg: SandboxToHostMsg = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(
            msg,
            SandboxToHostMsg::Message {
                data: "LOG: hello world".to_string()
            }
        );
    }

    #[test]
    fn test_page_loaded_frame_deserializes() {
        let json = r#"{"type":"PageLoaded","url":"http://localhost:3000/about"}"#;
        let msg: SandboxToHostMsg = serde_json::from_str(json).unwrap();
        assert_eq!(msg.kind(), "PageLoaded");
    }

    #[test]
    fn test_unknown_frame_type_returns_error() {
        let json = r#"{"type":"Navigate","url":"x"}"#;
        let result: Result<SandboxToHostMsg, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_type_field_returns_error() {
        let json = r#"{"data":"LOG: x"}"#;
        let result: Result<SandboxToHostMsg, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_does_not_expose_payload() {
        let msg = SandboxToHostMsg::Message {
            data: "ERROR: token=secret".to_string(),
        };
        assert_eq!(msg.kind(), "Message");
    }
}

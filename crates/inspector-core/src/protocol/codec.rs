//! Decoding and encoding of raw bridge strings.
//!
//! Wire format (one string per message, no framing):
//! ```text
//! DOMINFO: <compact JSON object>   → BridgeMessage::DomInfo
//! <anything else>                  → BridgeMessage::Log (text kept verbatim)
//! ```
//!
//! Decoding is a pure function of the input string: the same message always
//! yields the same classification.

use thiserror::Error;
use tracing::trace;

use crate::protocol::messages::{BridgeMessage, DomInfo, LogEntry, WirePrefix, DOMINFO_PREFIX};

/// Errors that can occur while decoding or encoding a bridge message.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The text after `DOMINFO: ` is not a valid DOM inspection record.
    #[error("malformed DOMINFO payload: {0}")]
    MalformedDomInfo(String),

    /// A record could not be serialized to its wire form.
    #[error("failed to encode message: {0}")]
    Encode(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Classifies one raw message.
///
/// The match is ordered and total:
///
/// 1. `DOMINFO: ` prefix → the remainder is parsed as a [`DomInfo`].
/// 2. Anything else → a [`LogEntry`] holding the full, unstripped message.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedDomInfo`] when the message carries the
/// `DOMINFO: ` prefix but the payload does not parse.  Log-classified
/// messages never fail.
///
/// # Examples
///
/// ```rust
/// use inspector_core::protocol::{decode_message, BridgeMessage, Severity};
///
/// match decode_message("ERROR: boom").unwrap() {
///     BridgeMessage::Log(entry) => assert_eq!(entry.level, Severity::Error),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn decode_message(raw: &str) -> Result<BridgeMessage, ProtocolError> {
    let prefix = WirePrefix::detect(raw);
    trace!(?prefix, len = raw.len(), "classifying bridge message");

    match prefix {
        WirePrefix::DomInfo => decode_dom_info(&raw[DOMINFO_PREFIX.len()..]).map(BridgeMessage::DomInfo),
        WirePrefix::Log | WirePrefix::Error | WirePrefix::Inspected | WirePrefix::Plain => {
            Ok(BridgeMessage::Log(LogEntry::from_raw(raw)))
        }
    }
}

/// Produces the wire string for a message, the same way the page script does.
///
/// Log entries are emitted verbatim (their text already carries the prefix);
/// DOM records are serialized as compact JSON behind `DOMINFO: `.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if JSON serialization fails.
pub fn encode_message(msg: &BridgeMessage) -> Result<String, ProtocolError> {
    match msg {
        BridgeMessage::Log(entry) => Ok(entry.text.clone()),
        BridgeMessage::DomInfo(info) => {
            let json = serde_json::to_string(info).map_err(|e| ProtocolError::Encode(e.to_string()))?;
            Ok(format!("{DOMINFO_PREFIX}{json}"))
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn decode_dom_info(payload: &str) -> Result<DomInfo, ProtocolError> {
    serde_json::from_str::<DomInfo>(payload)
        .map(DomInfo::clamp_text)
        .map_err(|e| ProtocolError::MalformedDomInfo(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

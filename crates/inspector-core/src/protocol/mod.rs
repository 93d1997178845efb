//! Protocol module containing the bridge message types and the string codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_message, encode_message, ProtocolError};
pub use messages::*;

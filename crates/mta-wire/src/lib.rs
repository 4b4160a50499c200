//! Wire layer of the MtA protocol: the protobuf message schema, the
//! length-prefixed frame codec, and the validation boundary between
//! decoded messages and the protocol engine.

/// Frame codec and prost helpers
pub mod codec;

/// Conversions between wire messages and engine types
pub mod convert;

/// Protocol messages
pub mod proto;

use thiserror::Error;

/// Wire errors
#[derive(Error, Debug)]
pub enum WireError {
    /// Payload is not a valid message of the expected type
    #[error("message decode failed: {0}")]
    Decode(#[from] prost::DecodeError),
    /// A repeated field has the wrong number of elements
    #[error("invalid {field} count: expected {expected}, got {got}")]
    InvalidCount {
        /// Offending field
        field: &'static str,
        /// Required element count
        expected: usize,
        /// Count actually received
        got: usize,
    },
    /// A bytes element has the wrong length
    #[error("invalid {field} element size, expected {expected} bytes")]
    InvalidElementSize {
        /// Offending field
        field: &'static str,
        /// Required element length
        expected: usize,
    },
}

mod receiver;

pub use receiver::*;

use thiserror::Error;

/// COT errors
#[derive(Error, Debug)]
pub enum CotError {
    /// Point bytes are not a 65-byte uncompressed SEC1 encoding
    #[error("invalid point encoding, expected 65 uncompressed SEC1 bytes")]
    InvalidPointEncoding,
    /// Decoded coordinates do not satisfy the curve equation
    #[error("point is not on the secp256k1 curve")]
    PointNotOnCurve,
    /// The identity appeared where a group element is required
    #[error("unexpected identity point")]
    IdentityPoint,
}

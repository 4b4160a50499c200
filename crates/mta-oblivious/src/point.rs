use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint};

use crate::cot::CotError;
use crate::params::{PAD_BYTES, POINT_BYTES};

/// Uncompressed SEC1 tag byte.
const TAG_UNCOMPRESSED: u8 = 0x04;

/// Encode a point as `0x04 || X || Y`.
///
/// The identity has no uncompressed encoding and is rejected.
pub fn encode_point(point: &ProjectivePoint) -> Result<[u8; POINT_BYTES], CotError> {
    let encoded = point.to_encoded_point(false);

    encoded
        .as_bytes()
        .try_into()
        .map_err(|_| CotError::IdentityPoint)
}

/// Decode an uncompressed SEC1 point.
///
/// Compressed and hybrid encodings are rejected even when they name a
/// valid curve point; the wire format is fixed to 65 bytes.
pub fn decode_point(bytes: &[u8]) -> Result<ProjectivePoint, CotError> {
    if bytes.len() != POINT_BYTES || bytes[0] != TAG_UNCOMPRESSED {
        return Err(CotError::InvalidPointEncoding);
    }

    let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| CotError::InvalidPointEncoding)?;

    Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .map(ProjectivePoint::from)
        .ok_or(CotError::PointNotOnCurve)
}

/// The big-endian X coordinate of a point, used directly as a one-time
/// pad. No KDF is applied.
pub fn x_coordinate(point: &ProjectivePoint) -> Result<[u8; PAD_BYTES], CotError> {
    let encoded = point.to_encoded_point(false);

    let x = encoded.x().ok_or(CotError::IdentityPoint)?;

    x.as_slice()
        .try_into()
        .map_err(|_| CotError::InvalidPointEncoding)
}

/// XOR a ciphertext or plaintext with a pad of the same length.
pub fn xor_pad(data: &[u8; PAD_BYTES], key: &[u8; PAD_BYTES]) -> [u8; PAD_BYTES] {
    let mut out = [0u8; PAD_BYTES];
    for (o, (d, k)) in out.iter_mut().zip(data.iter().zip(key.iter())) {
        *o = d ^ k;
    }
    out
}

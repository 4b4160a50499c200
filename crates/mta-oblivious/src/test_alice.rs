//! Sender-side arithmetic used by the engine tests: derives the pad of
//! each bit instance from `X(a_i * B_i)` and encrypts `U_i` / `U_i + x`.

use std::array;

use k256::{NonZeroScalar, ProjectivePoint};
use rand::{CryptoRng, RngCore};

use crate::cot::{CotMsg1, CotMsg2};
use crate::params::{BATCH_SIZE, PAD_BYTES, POINT_BYTES};
use crate::point::{decode_point, encode_point, x_coordinate, xor_pad};

fn pad_u32(value: u32) -> [u8; PAD_BYTES] {
    let mut out = [0u8; PAD_BYTES];
    out[..4].copy_from_slice(&value.to_le_bytes());
    out
}

/// Build the sender reply for correlation `x` and offsets `us`.
pub(crate) fn respond<R: CryptoRng + RngCore>(
    x: u32,
    us: &[u32; BATCH_SIZE],
    setup: &CotMsg1,
    rng: &mut R,
) -> CotMsg2 {
    let mut points = [[0u8; POINT_BYTES]; BATCH_SIZE];
    let mut encrypted_m0 = [[0u8; PAD_BYTES]; BATCH_SIZE];
    let mut encrypted_m1 = [[0u8; PAD_BYTES]; BATCH_SIZE];

    let scalars: [_; BATCH_SIZE] = array::from_fn(|_| NonZeroScalar::random(&mut *rng));

    for i in 0..BATCH_SIZE {
        let a = &scalars[i];

        points[i] = encode_point(&(ProjectivePoint::GENERATOR * **a)).unwrap();

        let point_b = decode_point(&setup.points[i]).unwrap();
        let key = x_coordinate(&(point_b * **a)).unwrap();

        encrypted_m0[i] = xor_pad(&pad_u32(us[i]), &key);
        encrypted_m1[i] = xor_pad(&pad_u32(us[i].wrapping_add(x)), &key);
    }

    CotMsg2 {
        points,
        encrypted_m0,
        encrypted_m1,
    }
}

/// `sum(2^i * U_i) mod 2^32`, the sender's share of the product.
pub(crate) fn weighted_sum(us: &[u32; BATCH_SIZE]) -> u32 {
    us.iter()
        .enumerate()
        .fold(0u32, |acc, (i, u)| acc.wrapping_add(u << i))
}

use std::array;

use k256::{NonZeroScalar, ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::params::{BATCH_SIZE, PAD_BYTES, POINT_BYTES};
use crate::point::{decode_point, encode_point, x_coordinate, xor_pad};

use super::CotError;

/// Setup message: one `B_i = b_i * G` per bit instance, with the
/// correlation value echoed back to the sender.
pub struct CotMsg1 {
    /// Encoded `B_i` points, index ascending
    pub points: [[u8; POINT_BYTES]; BATCH_SIZE],
    /// Correlation value the instances were created for
    pub correlation: u32,
}

/// Payload message from the sender: her `A_i` points and the ciphertext
/// pair of every bit instance.
pub struct CotMsg2 {
    /// Encoded `A_i` points, index ascending
    pub points: [[u8; POINT_BYTES]; BATCH_SIZE],
    /// Ciphertexts of the uncorrelated messages `U_i`
    pub encrypted_m0: [[u8; PAD_BYTES]; BATCH_SIZE],
    /// Ciphertexts of the correlated messages `U_i + delta`
    pub encrypted_m1: [[u8; PAD_BYTES]; BATCH_SIZE],
}

/// Ephemeral per-bit scalars, wiped when the receiver goes away.
struct BitScalars([Scalar; BATCH_SIZE]);

impl Zeroize for BitScalars {
    fn zeroize(&mut self) {
        self.0.iter_mut().for_each(|b| b.zeroize());
    }
}

impl Drop for BitScalars {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for BitScalars {}

/// Bob's half of the correlated-OT multiplication: 32 parallel OT bit
/// instances whose recovered messages fold into an additive share.
pub struct CotReceiver {
    correlation: u32,
    scalars: BitScalars,
}

impl CotReceiver {
    /// Create the bit instances for correlation value `correlation`.
    ///
    /// Every `b_i` is uniform in `[1, n)`.
    pub fn new<R: CryptoRng + RngCore>(
        correlation: u32,
        rng: &mut R,
    ) -> Result<(Self, CotMsg1), CotError> {
        let scalars = BitScalars(array::from_fn(|_| *NonZeroScalar::random(&mut *rng)));

        let mut points = [[0u8; POINT_BYTES]; BATCH_SIZE];
        for (b, point) in scalars.0.iter().zip(points.iter_mut()) {
            *point = encode_point(&(ProjectivePoint::GENERATOR * b))?;
        }

        let msg = CotMsg1 {
            points,
            correlation,
        };

        Ok((
            CotReceiver {
                correlation,
                scalars,
            },
            msg,
        ))
    }

    /// Correlation value the instances were created for.
    pub fn correlation(&self) -> u32 {
        self.correlation
    }

    /// Recover `m_c` for every bit instance and fold the bit-weighted
    /// sum `V = sum(2^i * m_i) mod 2^32`.
    ///
    /// Bit `i` of `choices` selects the ciphertext, LSB first. The pad
    /// for instance `i` is the X coordinate of `b_i * A_i`; the
    /// recovered value is the little-endian `u32` in plaintext bytes
    /// `[0, 4)`.
    pub fn process(self, choices: u32, msg: &CotMsg2) -> Result<u32, CotError> {
        let mut acc = 0u32;

        for i in 0..BATCH_SIZE {
            let chosen = if (choices >> i) & 1 == 1 {
                &msg.encrypted_m1[i]
            } else {
                &msg.encrypted_m0[i]
            };

            let point_a = decode_point(&msg.points[i])?;
            let key = x_coordinate(&(point_a * &self.scalars.0[i]))?;

            let plain = xor_pad(chosen, &key);
            let m = u32::from_le_bytes([plain[0], plain[1], plain[2], plain[3]]);

            acc = acc.wrapping_add(m << i);
        }

        Ok(acc)
    }
}

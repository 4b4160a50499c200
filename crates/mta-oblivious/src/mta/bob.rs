use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cot::{CotMsg1, CotMsg2, CotReceiver};

use super::MtaError;

/// Validated input from the sender: her masked share plus the payload
/// of every OT bit instance.
pub struct AliceInput {
    /// `x * alpha mod 2^32`
    pub masked_share: u32,
    /// Points and ciphertext pairs for the 32 bit instances
    pub cot: CotMsg2,
}

/// What Bob learns from one protocol run.
pub struct MtaOutput {
    /// Bob's additive share `beta * alice_masked + V mod 2^32`
    pub additive_share: u32,
    /// Bob's masked share `y * beta mod 2^32`
    pub masked_share: u32,
    /// `(y + additive_share) XOR delta`, emitted for the peer to verify
    pub correlation_check: u32,
}

/// Bob's additive mask, wiped on drop.
struct Mask(u32);

impl Zeroize for Mask {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for Mask {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for Mask {}

/// State after COT setup, before the mask is drawn.
pub struct Setup {
    cot: CotReceiver,
}

/// State holding the mask `beta`, ready to process the sender's reply.
pub struct Ready {
    cot: CotReceiver,
    mask: Mask,
}

/// Bob's role in the MtA conversion. `y_share` is Bob's multiplicative
/// share; `correlation_delta` is the value received from the peer and
/// feeds only the COT setup echo and the correlation check.
pub struct MtaBob<T> {
    y_share: u32,
    correlation_delta: u32,
    state: T,
}

impl MtaBob<Setup> {
    /// Initialize the COT instances and produce the setup message.
    pub fn new<R: CryptoRng + RngCore>(
        y_share: u32,
        correlation_delta: u32,
        rng: &mut R,
    ) -> Result<(Self, CotMsg1), MtaError> {
        let (cot, msg) = CotReceiver::new(correlation_delta, rng)?;

        Ok((
            MtaBob {
                y_share,
                correlation_delta,
                state: Setup { cot },
            },
            msg,
        ))
    }

    /// Draw the additive mask `beta` and return the masked share
    /// `y * beta mod 2^32`.
    pub fn prepare<R: CryptoRng + RngCore>(self, rng: &mut R) -> (MtaBob<Ready>, u32) {
        let beta = rng.next_u32();
        let masked_share = self.y_share.wrapping_mul(beta);

        (
            MtaBob {
                y_share: self.y_share,
                correlation_delta: self.correlation_delta,
                state: Ready {
                    cot: self.state.cot,
                    mask: Mask(beta),
                },
            },
            masked_share,
        )
    }
}

impl MtaBob<Ready> {
    /// Run the COT multiplication with Bob's own `y` bits as choices and
    /// fold the result into Bob's additive share.
    pub fn execute(self, input: &AliceInput) -> Result<MtaOutput, MtaError> {
        let MtaBob {
            y_share,
            correlation_delta,
            state: Ready { cot, mask },
        } = self;

        let v = cot.process(y_share, &input.cot)?;

        let additive_share = mask.0.wrapping_mul(input.masked_share).wrapping_add(v);
        let masked_share = y_share.wrapping_mul(mask.0);
        let correlation_check = y_share.wrapping_add(additive_share) ^ correlation_delta;

        Ok(MtaOutput {
            additive_share,
            masked_share,
            correlation_check,
        })
    }
}

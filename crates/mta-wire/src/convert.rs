//! Validation boundary between decoded wire messages and the engine.
//! Counts and element sizes are checked here so the engine only ever
//! sees fixed-size data.

use mta_oblivious::cot::{CotMsg1, CotMsg2};
use mta_oblivious::mta::{AliceInput, MtaOutput};
use mta_oblivious::params::{BATCH_SIZE, PAD_BYTES, POINT_BYTES};

use crate::proto::{AliceMessages, BobMessages, BobSetup};
use crate::WireError;

/// The original schema caps the advertised key material at 256 bytes.
pub const MAX_PUBLIC_KEY_BYTES: usize = 256;

/// Build the `BobSetup` message from the COT setup.
pub fn bob_setup(msg: &CotMsg1, public_key: &[u8]) -> BobSetup {
    let key_len = public_key.len().min(MAX_PUBLIC_KEY_BYTES);

    BobSetup {
        success: true,
        ot_messages: msg.points.iter().map(|p| p.to_vec()).collect(),
        public_key: public_key[..key_len].to_vec(),
        num_ot_instances: BATCH_SIZE as u32,
    }
}

/// Build the final `BobMessages` from the MtA output.
pub fn bob_messages(output: &MtaOutput) -> BobMessages {
    BobMessages {
        success: true,
        ot_responses: Vec::new(),
        encrypted_result: Vec::new(),
        correlation_check: output.correlation_check,
        masked_share: output.masked_share,
    }
}

fn fixed<const N: usize>(field: &'static str, bytes: &[u8]) -> Result<[u8; N], WireError> {
    bytes
        .try_into()
        .map_err(|_| WireError::InvalidElementSize {
            field,
            expected: N,
        })
}

fn expect_count(field: &'static str, expected: usize, got: usize) -> Result<(), WireError> {
    if got != expected {
        return Err(WireError::InvalidCount {
            field,
            expected,
            got,
        });
    }
    Ok(())
}

impl TryFrom<&AliceMessages> for AliceInput {
    type Error = WireError;

    fn try_from(msg: &AliceMessages) -> Result<Self, Self::Error> {
        expect_count("ot_points", BATCH_SIZE, msg.ot_points.len())?;
        expect_count("ot_choices", BATCH_SIZE, msg.ot_choices.len())?;
        expect_count("encrypted_shares", 2 * BATCH_SIZE, msg.encrypted_shares.len())?;

        let mut points = [[0u8; POINT_BYTES]; BATCH_SIZE];
        for (slot, point) in points.iter_mut().zip(msg.ot_points.iter()) {
            *slot = fixed("ot_points", point)?;
        }

        let mut encrypted_m0 = [[0u8; PAD_BYTES]; BATCH_SIZE];
        let mut encrypted_m1 = [[0u8; PAD_BYTES]; BATCH_SIZE];
        for (i, pair) in msg.encrypted_shares.chunks_exact(2).enumerate() {
            encrypted_m0[i] = fixed("encrypted_shares", &pair[0])?;
            encrypted_m1[i] = fixed("encrypted_shares", &pair[1])?;
        }

        Ok(AliceInput {
            masked_share: msg.masked_share,
            cot: CotMsg2 {
                points,
                encrypted_m0,
                encrypted_m1,
            },
        })
    }
}

/// Number of parallel OT bit instances, one per bit of a 32-bit share.
pub const BATCH_SIZE: usize = 32;

/// Length of an uncompressed SEC1 point encoding.
pub const POINT_BYTES: usize = 65;

/// Length of a one-time pad and of a single OT ciphertext.
pub const PAD_BYTES: usize = 32;

//! The five messages of the MtA protocol.
//!
//! Field numbers are fixed by the deployed clients and must not change.
//! `ot_choices` is written unpacked (one tagged varint per element) for
//! compatibility with callback-style decoders; packed encodings are
//! still accepted on receive.

/// Opening message from Alice carrying the correlation value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CorrelationDelta {
    /// Correlation value for the COT instances
    #[prost(uint32, tag = "1")]
    pub delta: u32,
}

/// Bob's reply: one setup point per OT bit instance.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BobSetup {
    /// Whether setup succeeded
    #[prost(bool, tag = "1")]
    pub success: bool,
    /// Encoded `B_i` points, 65 bytes each, index ascending
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub ot_messages: Vec<Vec<u8>>,
    /// Long-term key material, at most 256 bytes
    #[prost(bytes = "vec", tag = "3")]
    pub public_key: Vec<u8>,
    /// Number of OT bit instances (always 32)
    #[prost(uint32, tag = "4")]
    pub num_ot_instances: u32,
}

/// Alice's payload: her masked share and the OT instance data.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AliceMessages {
    /// `x * alpha mod 2^32`
    #[prost(uint32, tag = "1")]
    pub masked_share: u32,
    /// Alice's choice bits; length 32, unused by Bob's arithmetic
    #[prost(bool, repeated, packed = "false", tag = "2")]
    pub ot_choices: Vec<bool>,
    /// 64 ciphertexts of 32 bytes, interleaved `(m0_i, m1_i)` pairs
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub encrypted_shares: Vec<Vec<u8>>,
    /// Encoded `A_i` points, 65 bytes each, index ascending
    #[prost(bytes = "vec", repeated, tag = "4")]
    pub ot_points: Vec<Vec<u8>>,
}

/// Bob's final message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BobMessages {
    /// Whether the run succeeded
    #[prost(bool, tag = "1")]
    pub success: bool,
    /// Unused by this server; kept for schema compatibility
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub ot_responses: Vec<Vec<u8>>,
    /// Unused by this server; kept for schema compatibility
    #[prost(bytes = "vec", tag = "3")]
    pub encrypted_result: Vec<u8>,
    /// `(y + additive_share) XOR delta`
    #[prost(uint32, tag = "4")]
    pub correlation_check: u32,
    /// `y * beta mod 2^32`
    #[prost(uint32, tag = "5")]
    pub masked_share: u32,
}

/// Outcome record of one protocol run.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MtaResult {
    /// Whether the run succeeded
    #[prost(bool, tag = "1")]
    pub success: bool,
    /// Bob's additive share of `x * y mod 2^32`
    #[prost(uint32, tag = "2")]
    pub additive_share: u32,
    /// Human-readable failure description, empty on success
    #[prost(string, tag = "3")]
    pub error_message: String,
}

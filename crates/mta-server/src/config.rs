use rand::Rng;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Stand-in for a long-term key in `BobSetup`; deployed clients expect
/// the field to be present but nothing reads its contents.
pub fn placeholder_public_key() -> Vec<u8> {
    (0u8..=64).collect()
}

/// Runtime configuration shared by every session.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listening port
    pub port: u16,
    /// Bob's multiplicative share, used by every session
    pub y_share: u32,
    /// Key material advertised in `BobSetup`
    pub public_key: Vec<u8>,
}

impl ServerConfig {
    /// Build a config from CLI values. A missing or zero `y_share` is
    /// replaced by a fresh uniform value in `[1, 1_000_000]`.
    pub fn new(port: Option<u16>, y_share: Option<u32>) -> Self {
        let y_share = y_share
            .filter(|&y| y != 0)
            .unwrap_or_else(|| rand::thread_rng().gen_range(1..=1_000_000));

        ServerConfig {
            port: port.unwrap_or(DEFAULT_PORT),
            y_share,
            public_key: placeholder_public_key(),
        }
    }
}

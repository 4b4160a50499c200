mod bob;

pub use bob::*;

use thiserror::Error;

/// MtA errors
#[derive(Error, Debug)]
pub enum MtaError {
    /// The correlated-OT multiplication step failed
    #[error("correlated OT multiplication failed: {0}")]
    Cot(#[from] crate::cot::CotError),
}

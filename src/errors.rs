use thiserror::Error;

/// Errors the decompilation core can return from [`crate::to_pseudo_code`].
///
/// `DecoderEmpty` and "unknown instruction" are deliberately *not* variants
/// here: both are recovered locally (an empty function body, a `Pseudo`
/// fallback statement) rather than surfaced to the caller.
#[derive(Error, Debug)]
pub enum DecompileError {
    #[error("hard decode failure at the entry instruction (0x{ip:X}): {source}")]
    Decode { ip: u64, source: zydis::Status },

    #[error("invariant violation: {detail}")]
    InvariantViolation { detail: String },
}

impl DecompileError {
    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        DecompileError::InvariantViolation {
            detail: detail.into(),
        }
    }
}

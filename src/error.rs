//! Error kinds surfaced by the core. No operation here aborts the
//! process on caller-supplied data; everything is returned as a
//! `Result`.

use std::fmt;

/// Failure modes exposed across the crate's public surface.
///
/// `AllocationFailure` has no reachable constructor in safe Rust (the
/// global allocator aborts on exhaustion rather than returning), but
/// the variant is kept for interface parity with callers porting code
/// from the C original, where allocation is fallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RlweError {
    AllocationFailure,
    UnknownParameter,
    InvalidFormat,
    ParameterMismatch,
    KdfFailure,
}

impl fmt::Display for RlweError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            RlweError::AllocationFailure => "allocation failure",
            RlweError::UnknownParameter => "descriptor does not match any supported parameter set",
            RlweError::InvalidFormat => "buffer length does not match the expected wire format",
            RlweError::ParameterMismatch => "operands belong to different parameter sets",
            RlweError::KdfFailure => "key derivation function failed",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for RlweError {}

pub type Result<T> = std::result::Result<T, RlweError>;

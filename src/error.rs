// ============================================================================
// src/error.rs – derivation failure causes
// ============================================================================

use thiserror::Error;

/// Why a derivation could not run.
///
/// Every variant means the same thing to a caller (no key was produced);
/// the variants exist for diagnostics.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfError {
    /// Iteration count was zero.
    #[error("rounds must be at least 1")]
    ZeroRounds,

    /// Requested key length was zero.
    #[error("requested key length must be at least 1 byte")]
    EmptyKey,

    /// Salt was empty.
    #[error("salt must not be empty")]
    EmptySalt,

    /// Salt leaves no room for the 4-byte block counter.
    #[error("salt of {len} bytes cannot carry the block counter")]
    SaltTooLong { len: usize },

    /// Requested key needs more than 2^32 - 1 blocks.
    #[error("requested key length {len} exceeds maximum of {max} bytes")]
    KeyTooLong { len: usize, max: u64 },

    /// Working buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes of working memory")]
    Allocation { bytes: usize },
}

/// Broad class of a [`KdfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    ResourceExhausted,
}

impl KdfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KdfError::Allocation { .. } => ErrorKind::ResourceExhausted,
            _ => ErrorKind::InvalidParameter,
        }
    }
}

/// The single failure reported by [`derive_key`](crate::derive_key).
///
/// The underlying cause is available through [`cause`](Self::cause) and
/// `std::error::Error::source`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("key derivation failed")]
pub struct DerivationFailed {
    #[from]
    cause: KdfError,
}

impl DerivationFailed {
    pub fn cause(&self) -> &KdfError {
        &self.cause
    }

    pub fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }
}

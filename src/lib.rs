// ============================================================================
// src/lib.rs – PBKDF2-HMAC-SHA-1 key derivation
// ============================================================================
//! Derive a fixed-length key from a password and salt with PBKDF2
//! (PKCS #5 v2.0, RFC 2898) over HMAC-SHA-1.
//!
//! The call is synchronous and CPU-bound; `rounds` is the work factor. Every
//! working buffer is zeroed before the call returns, on success and failure
//! alike, and the returned key scrubs itself when dropped. No secrets in logs.
//!
//! ```
//! let key = pbkdf2_sha1::derive_key(b"password", b"salt", 20, 1)?;
//! assert_eq!(key[..4], [0x0c, 0x60, 0xc8, 0x0f]);
//! # Ok::<(), pbkdf2_sha1::DerivationFailed>(())
//! ```

pub mod config;
pub mod error;
pub mod util;

use digest::core_api::BlockSizeUser;
use digest::Digest;
use sha1::Sha1;
use tracing::warn;
use zeroize::Zeroizing;

pub use config::{HashAlgorithm, KdfParams};
pub use error::{DerivationFailed, ErrorKind, KdfError};
pub use util::hmac::{hmac, hmac_sha1, SHA1_BLOCK_LENGTH, SHA1_DIGEST_LENGTH};
pub use util::kdf::{max_key_length, pbkdf2_hmac, pbkdf2_hmac_sha1, pbkdf2_sha256};

/// Derive `key_length` bytes from `password` and `salt` using `rounds`
/// iterations of PBKDF2-HMAC-SHA-1.
///
/// Fails when `rounds` or `key_length` is zero, the salt is empty or too
/// long, or working memory cannot be allocated. An empty password is
/// accepted.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    key_length: usize,
    rounds: u32,
) -> Result<Zeroizing<Vec<u8>>, DerivationFailed> {
    derive_with::<Sha1>(password, salt, key_length, rounds)
}

pub(crate) fn derive_with<D>(
    password: &[u8],
    salt: &[u8],
    key_length: usize,
    rounds: u32,
) -> Result<Zeroizing<Vec<u8>>, DerivationFailed>
where
    D: Digest + BlockSizeUser,
{
    // Reject bad parameters before sizing the output buffer.
    util::kdf::check_params::<D>(salt, key_length, rounds)?;

    let mut key = Zeroizing::new(Vec::new());
    if key.try_reserve_exact(key_length).is_err() {
        warn!(bytes = key_length, "derived key allocation failed");
        return Err(KdfError::Allocation { bytes: key_length }.into());
    }
    key.resize(key_length, 0);

    pbkdf2_hmac::<D>(password, salt, rounds, &mut key)?;
    Ok(key)
}

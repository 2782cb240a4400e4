// ============================================================================
// src/util/kdf.rs – PBKDF2 (PKCS #5 v2.0) driver over the HMAC engine
// ============================================================================

use digest::core_api::BlockSizeUser;
use digest::{Digest, Output};
use sha1::Sha1;
use sha2::Sha256;
use tracing::{debug, warn};

use super::hmac::hmac_into;
use super::scratch::Scratch;
use crate::error::KdfError;

/// Width of the big-endian block index appended to the salt.
const COUNTER_LEN: usize = 4;

/// PBKDF2-HMAC-SHA-1 into `out`.
pub fn pbkdf2_hmac_sha1(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    out: &mut [u8],
) -> Result<(), KdfError> {
    pbkdf2_hmac::<Sha1>(password, salt, rounds, out)
}

/// PBKDF2-HMAC-SHA256 into `out`.
pub fn pbkdf2_sha256(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    out: &mut [u8],
) -> Result<(), KdfError> {
    pbkdf2_hmac::<Sha256>(password, salt, rounds, out)
}

/// Largest key PBKDF2 can produce with hash `D`: (2^32 - 1) blocks.
pub fn max_key_length<D: Digest>() -> u64 {
    u64::from(u32::MAX) * <D as Digest>::output_size() as u64
}

/// Reject parameters PBKDF2 is not defined for.
///
/// Runs before any password-derived computation. Returns the length of the
/// salt‖counter message on success.
pub(crate) fn check_params<D: Digest>(
    salt: &[u8],
    key_length: usize,
    rounds: u32,
) -> Result<usize, KdfError> {
    let checked = validate::<D>(salt, key_length, rounds);
    if let Err(e) = &checked {
        warn!(
            cause = %e,
            salt_len = salt.len(),
            key_length,
            rounds,
            "pbkdf2 parameters rejected"
        );
    }
    checked
}

fn validate<D: Digest>(salt: &[u8], key_length: usize, rounds: u32) -> Result<usize, KdfError> {
    if rounds < 1 {
        return Err(KdfError::ZeroRounds);
    }
    if key_length == 0 {
        return Err(KdfError::EmptyKey);
    }
    if salt.is_empty() {
        return Err(KdfError::EmptySalt);
    }
    let message_len = salt
        .len()
        .checked_add(COUNTER_LEN)
        .ok_or(KdfError::SaltTooLong { len: salt.len() })?;
    let max = max_key_length::<D>();
    if key_length as u64 > max {
        return Err(KdfError::KeyTooLong {
            len: key_length,
            max,
        });
    }
    Ok(message_len)
}

/// PBKDF2 with HMAC over hash `D`, filling all of `out`.
///
/// Code follows RFC 2898 section 5.2 (IEEE 802.11-2007 Annex H.4.2). Nothing
/// is written to `out` unless the parameters pass validation and the working
/// buffer could be allocated. Every working buffer is zeroed before return.
pub fn pbkdf2_hmac<D>(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    out: &mut [u8],
) -> Result<(), KdfError>
where
    D: Digest + BlockSizeUser,
{
    let message_len = check_params::<D>(salt, out.len(), rounds)?;

    let mut message = salt_message(salt, message_len)?;
    let mut d1 = Scratch::new(Output::<D>::default());
    let mut d2 = Scratch::new(Output::<D>::default());
    let mut obuf = Scratch::new(Output::<D>::default());

    let digest_len = <D as Digest>::output_size();
    debug!(
        rounds,
        key_length = out.len(),
        salt_len = salt.len(),
        blocks = out.len().div_ceil(digest_len),
        "pbkdf2 derivation started"
    );

    let mut counter = 1u32;
    let mut generated = 0usize;
    while generated < out.len() {
        message[salt.len()..].copy_from_slice(&counter.to_be_bytes());

        // U1 = PRF(P, S || INT(i))
        hmac_into::<D>(&message[..], password, &mut d1);
        obuf.copy_from_slice(&d1[..]);

        // Ui = PRF(P, U{i-1}), folded into the block by XOR
        for _ in 1..rounds {
            hmac_into::<D>(&d1[..], password, &mut d2);
            d1.copy_from_slice(&d2[..]);
            for (acc, u) in obuf.iter_mut().zip(d1.iter()) {
                *acc ^= *u;
            }
        }

        let take = (out.len() - generated).min(digest_len);
        out[generated..generated + take].copy_from_slice(&obuf[..take]);
        generated += take;
        counter = counter.saturating_add(1);
    }

    debug!(key_length = out.len(), "pbkdf2 derivation finished");
    Ok(())
}

/// Salt copied into a fallibly allocated buffer with room for the counter.
fn salt_message(salt: &[u8], len: usize) -> Result<Scratch<Vec<u8>>, KdfError> {
    let mut buf = Vec::new();
    if buf.try_reserve_exact(len).is_err() {
        warn!(bytes = len, "pbkdf2 salt buffer allocation failed");
        return Err(KdfError::Allocation { bytes: len });
    }
    buf.extend_from_slice(salt);
    buf.resize(len, 0);
    Ok(Scratch::new(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::scratch::ledger;

    fn sha1_hex(password: &[u8], salt: &[u8], rounds: u32, len: usize) -> String {
        let mut out = vec![0u8; len];
        pbkdf2_hmac_sha1(password, salt, rounds, &mut out).expect("derive");
        hex::encode(out)
    }

    #[test]
    fn rfc6070_vectors() {
        assert_eq!(
            sha1_hex(b"password", b"salt", 1, 20),
            "0c60c80f961f0e71f3a9b524af6012062fe037a6"
        );
        assert_eq!(
            sha1_hex(b"password", b"salt", 2, 20),
            "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957"
        );
        assert_eq!(
            sha1_hex(b"password", b"salt", 4096, 20),
            "4b007901b765489abead49d926f721d065a429c1"
        );
    }

    #[test]
    fn rfc6070_multi_block_partial_tail() {
        // 25 bytes: one full block plus a 5-byte prefix of the second.
        assert_eq!(
            sha1_hex(
                b"passwordPASSWORDpassword",
                b"saltSALTsaltSALTsaltSALTsaltSALTsalt",
                4096,
                25
            ),
            "3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038"
        );
    }

    #[test]
    fn rfc6070_embedded_nul() {
        assert_eq!(
            sha1_hex(b"pass\0word", b"sa\0lt", 4096, 16),
            "56fa6aa75548099dcc37d7f03425e0c3"
        );
    }

    #[test]
    fn sha256_vectors() {
        let mut out = [0u8; 32];
        pbkdf2_sha256(b"password", b"salt", 1, &mut out).expect("derive");
        assert_eq!(
            hex::encode(out),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );

        pbkdf2_sha256(b"password", b"salt", 4096, &mut out).expect("derive");
        assert_eq!(
            hex::encode(out),
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"
        );

        // RFC 7914 section 11
        let mut long = [0u8; 64];
        pbkdf2_sha256(b"passwd", b"salt", 1, &mut long).expect("derive");
        assert_eq!(
            hex::encode(long),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc\
             49ca9cccf179b645991664b39d77ef317c71b845b1e30bd509112041d3a19783"
        );
    }

    #[test]
    fn invalid_parameters_leave_output_untouched() {
        let mut out = [0xeeu8; 20];
        assert_eq!(
            pbkdf2_hmac_sha1(b"password", b"salt", 0, &mut out),
            Err(KdfError::ZeroRounds)
        );
        assert_eq!(
            pbkdf2_hmac_sha1(b"password", b"", 1, &mut out),
            Err(KdfError::EmptySalt)
        );
        assert_eq!(
            pbkdf2_hmac_sha1(b"password", b"salt", 1, &mut []),
            Err(KdfError::EmptyKey)
        );
        assert!(out.iter().all(|b| *b == 0xee));
    }

    #[test]
    fn rounds_are_checked_before_key_and_salt() {
        assert_eq!(
            check_params::<Sha1>(b"", 0, 0),
            Err(KdfError::ZeroRounds)
        );
        assert_eq!(check_params::<Sha1>(b"", 0, 1), Err(KdfError::EmptyKey));
        assert_eq!(check_params::<Sha1>(b"s", 1, 1), Ok(5));
    }

    #[test]
    fn oversized_key_is_rejected() {
        let max = max_key_length::<Sha1>();
        assert_eq!(max, u64::from(u32::MAX) * 20);
        if let Ok(len) = usize::try_from(max + 1) {
            assert_eq!(
                check_params::<Sha1>(b"salt", len, 1),
                Err(KdfError::KeyTooLong { len, max })
            );
        }
    }

    #[test]
    fn empty_password_is_permitted() {
        let mut out = [0u8; 20];
        assert!(pbkdf2_hmac_sha1(b"", b"salt", 2, &mut out).is_ok());
        assert!(out.iter().any(|b| *b != 0));
    }

    #[test]
    fn every_working_buffer_is_zeroed_after_return() {
        ledger::take();
        let mut out = [0u8; 20];
        pbkdf2_hmac_sha1(b"password", b"salt", 2, &mut out).expect("derive");
        let releases = ledger::take();

        // two HMAC calls (3 buffers each) plus message, d1, d2, obuf
        assert_eq!(releases.len(), 10);
        assert!(releases.iter().all(|r| r.residual == 0), "{releases:?}");
        assert!(releases.iter().any(|r| r.len == b"salt".len() + COUNTER_LEN));
    }

    #[test]
    fn rejected_call_touches_no_working_buffer() {
        ledger::take();
        let mut out = [0u8; 20];
        assert!(pbkdf2_hmac_sha1(b"password", b"", 1, &mut out).is_err());
        assert!(ledger::take().is_empty());
    }
}

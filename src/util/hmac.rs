// ============================================================================
// src/util/hmac.rs – HMAC (RFC 2104) over a RustCrypto hash
// ============================================================================

use digest::core_api::{Block, BlockSizeUser};
use digest::{Digest, Output};
use sha1::Sha1;

use super::scratch::Scratch;

/// SHA-1 output size in bytes.
pub const SHA1_DIGEST_LENGTH: usize = 20;

/// SHA-1 input block size in bytes.
pub const SHA1_BLOCK_LENGTH: usize = 64;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC-SHA-1 (RFC 2202) of `message` under `key`.
pub fn hmac_sha1(message: &[u8], key: &[u8]) -> [u8; SHA1_DIGEST_LENGTH] {
    let digest = Scratch::new(hmac::<Sha1>(message, key));
    let mut out = [0u8; SHA1_DIGEST_LENGTH];
    out.copy_from_slice(&digest[..]);
    out
}

/// HMAC of `message` under `key` for any block-oriented hash `D`.
///
/// Keys longer than the hash block are replaced by their digest first. Total
/// over all input lengths.
pub fn hmac<D>(message: &[u8], key: &[u8]) -> Output<D>
where
    D: Digest + BlockSizeUser,
{
    let mut out = Output::<D>::default();
    hmac_into::<D>(message, key, &mut out);
    out
}

/// Same as [`hmac`], writing into a caller-held digest buffer.
pub(crate) fn hmac_into<D>(message: &[u8], key: &[u8], out: &mut Output<D>)
where
    D: Digest + BlockSizeUser,
{
    let mut shrunk = Scratch::new(Output::<D>::default());
    let key: &[u8] = if key.len() > D::block_size() {
        let mut hasher = D::new();
        Digest::update(&mut hasher, key);
        hasher.finalize_into(&mut shrunk);
        &shrunk[..]
    } else {
        key
    };

    // Inner: H(K ^ ipad || message)
    let mut pad = Scratch::new(Block::<D>::default());
    load_pad(&mut pad, key, IPAD);
    let mut inner = D::new();
    Digest::update(&mut inner, &pad[..]);
    Digest::update(&mut inner, message);
    let mut inner_digest = Scratch::new(Output::<D>::default());
    inner.finalize_into(&mut inner_digest);

    // Outer: H(K ^ opad || inner)
    load_pad(&mut pad, key, OPAD);
    let mut outer = D::new();
    Digest::update(&mut outer, &pad[..]);
    Digest::update(&mut outer, &inner_digest[..]);
    outer.finalize_into(out);
}

/// Zero-pad `key` to the block and XOR every byte with `fill`.
fn load_pad(pad: &mut [u8], key: &[u8], fill: u8) {
    pad.fill(0);
    pad[..key.len()].copy_from_slice(key);
    for b in pad.iter_mut() {
        *b ^= fill;
    }
}

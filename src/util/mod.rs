// ============================================================================
// src/util/mod.rs – HMAC engine, PBKDF2 driver and their working buffers
// ============================================================================

pub mod hmac;
pub mod kdf;
pub(crate) mod scratch;

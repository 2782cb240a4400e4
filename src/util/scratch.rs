// ============================================================================
// src/util/scratch.rs – zero-on-drop holders for working buffers
// ============================================================================

use std::ops::{Deref, DerefMut};

use zeroize::Zeroize;

/// Working buffer that is scrubbed when it goes out of scope.
///
/// Wraps pads, chained digests and the salt‖counter message so that every
/// exit path (normal return, `?`, unwinding) leaves zeros behind. Formatting
/// is intentionally not implemented; the contents are secret.
pub struct Scratch<B: AsMut<[u8]>> {
    buf: B,
}

impl<B: AsMut<[u8]>> Scratch<B> {
    pub fn new(buf: B) -> Self {
        Self { buf }
    }
}

impl<B: AsMut<[u8]>> Deref for Scratch<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.buf
    }
}

impl<B: AsMut<[u8]>> DerefMut for Scratch<B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut self.buf
    }
}

impl<B: AsMut<[u8]>> Drop for Scratch<B> {
    fn drop(&mut self) {
        let bytes = self.buf.as_mut();
        bytes.zeroize();

        #[cfg(test)]
        ledger::record(bytes);
    }
}

//! Rolling context buffer.

use crate::config::MAX_ORDER;

/// The most recent `max_order` bytes, oldest first.
///
/// Shared by the model build scan, the encoder and the decoder so that all
/// three see the same history at every position.
#[derive(Debug, Clone)]
pub(crate) struct ContextWindow {
    buf: [u8; MAX_ORDER],
    len: usize,
    max: usize,
}

impl ContextWindow {
    pub(crate) fn new(max_order: usize) -> Self {
        debug_assert!(max_order <= MAX_ORDER);
        Self {
            buf: [0; MAX_ORDER],
            len: 0,
            max: max_order.min(MAX_ORDER),
        }
    }

    /// Append a byte, dropping the oldest once the window is full.
    #[inline]
    pub(crate) fn push(&mut self, byte: u8) {
        if self.max == 0 {
            return;
        }
        if self.len == self.max {
            self.buf.copy_within(1..self.len, 0);
            self.len -= 1;
        }
        self.buf[self.len] = byte;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

//! Arithmetic encoder.

use super::bit_io::BitSink;
use super::{Interval, Renorm, SECOND_BIT};
use crate::error::Result;

/// Anything that accepts a stream of `[low, high)` out of `scale` intervals.
///
/// The order-fallback protocol is written against this trait so that the
/// interval sequence itself can be observed.
pub trait IntervalCoder {
    fn encode(&mut self, low: u32, high: u32, scale: u32) -> Result<()>;
}

/// Encoder state.
#[derive(Debug)]
pub struct ArithmeticEncoder<S: BitSink> {
    interval: Interval,
    /// Underflow bits waiting for the next settled bit.
    pending: u32,
    sink: S,
}

impl<S: BitSink> ArithmeticEncoder<S> {
    pub fn new(sink: S) -> Self {
        Self {
            interval: Interval::new(),
            pending: 0,
            sink,
        }
    }

    /// Underflow bits deferred so far.
    pub fn pending_bits(&self) -> u32 {
        self.pending
    }

    pub fn registers(&self) -> (u16, u16) {
        (self.interval.low as u16, self.interval.high as u16)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Output a settled bit followed by the deferred opposite bits.
    #[inline]
    fn emit(&mut self, bit: bool) {
        self.sink.output_bit(bit);
        for _ in 0..self.pending {
            self.sink.output_bit(!bit);
        }
        self.pending = 0;
    }

    /// Flush enough bits to pin the final interval and return the sink.
    ///
    /// Two bits (plus any pending underflow bits) identify a quarter of the
    /// register space lying wholly inside `[low, high]`, so the decoder
    /// lands inside the last interval whatever bits follow.
    pub fn finish(mut self) -> S {
        self.pending += 1;
        let bit = self.interval.low & SECOND_BIT != 0;
        self.emit(bit);
        self.sink
    }
}

impl<S: BitSink> IntervalCoder for ArithmeticEncoder<S> {
    fn encode(&mut self, low: u32, high: u32, scale: u32) -> Result<()> {
        self.interval.narrow(low, high, scale)?;
        loop {
            match self.interval.renorm() {
                Renorm::Converged(bit) => {
                    self.emit(bit);
                    self.interval.shift();
                }
                Renorm::Underflow => {
                    self.pending += 1;
                    self.interval.squeeze();
                    self.interval.shift();
                }
                Renorm::Stable => return Ok(()),
            }
        }
    }
}

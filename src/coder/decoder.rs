//! Arithmetic decoder.

use super::bit_io::BitSource;
use super::{Interval, Renorm, REGISTER_MASK, SECOND_BIT};
use crate::config::MAX_SCALE;
use crate::error::{PpmError, Result};

/// Decoder state: the encoder's registers plus the 16-bit code window.
#[derive(Debug)]
pub struct ArithmeticDecoder<S: BitSource> {
    interval: Interval,
    code: u32,
    source: S,
}

impl<S: BitSource> ArithmeticDecoder<S> {
    /// Prime the code register with the first 16 bits of `source`.
    pub fn new(mut source: S) -> Self {
        let mut code = 0u32;
        for _ in 0..16 {
            code = ((code << 1) & REGISTER_MASK) | source.input_bit() as u32;
        }
        Self {
            interval: Interval::new(),
            code,
            source,
        }
    }

    /// Whether the source still has unread bytes.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.source.has_data()
    }

    pub fn registers(&self) -> (u16, u16, u16) {
        (
            self.interval.low as u16,
            self.interval.high as u16,
            self.code as u16,
        )
    }

    /// Position of the code value inside the current interval, scaled to
    /// `[0, scale)`.
    ///
    /// `scale` must lie in `1..=MAX_SCALE`.
    #[inline]
    pub fn point(&self, scale: u32) -> Result<u32> {
        if scale == 0 || scale > MAX_SCALE {
            return Err(PpmError::InvalidInterval {
                low: 0,
                high: scale,
                scale,
            });
        }
        let Interval { low, high } = self.interval;
        if self.code < low || self.code > high {
            return Err(PpmError::CorruptStream);
        }
        let range = high - low + 1;
        Ok(((self.code - low + 1) * scale - 1) / range)
    }

    /// Consume the interval `[low, high)` out of `scale` that the caller
    /// matched against [`point`](Self::point).
    pub fn symbol_decoded(&mut self, low: u32, high: u32, scale: u32) -> Result<()> {
        self.interval.narrow(low, high, scale)?;
        loop {
            match self.interval.renorm() {
                Renorm::Converged(_) => self.shift(),
                Renorm::Underflow => {
                    self.interval.squeeze();
                    self.code ^= SECOND_BIT;
                    self.shift();
                }
                Renorm::Stable => return Ok(()),
            }
        }
    }

    #[inline]
    fn shift(&mut self) {
        self.interval.shift();
        self.code = ((self.code << 1) & REGISTER_MASK) | self.source.input_bit() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::{ArithmeticEncoder, BitReader, BitWriter, IntervalCoder};

    /// Three symbols over scale 8: [0,4), [4,6), [6,8).
    const TABLE: [(u32, u32); 3] = [(0, 4), (4, 6), (6, 8)];

    fn lookup(point: u32) -> usize {
        TABLE.iter().position(|&(_, high)| point < high).unwrap()
    }

    #[test]
    fn test_primes_sixteen_bits() {
        let data = [0xAB, 0xCD, 0xEF];
        let decoder = ArithmeticDecoder::new(BitReader::new(&data));
        assert_eq!(decoder.registers(), (0, 0xFFFF, 0xABCD));
        assert!(decoder.has_data());
    }

    #[test]
    fn test_fixed_table_roundtrip() {
        let symbols = [0usize, 1, 2, 2, 0, 0, 0, 1, 2, 0, 1, 1, 1, 2, 0];

        let mut encoder = ArithmeticEncoder::new(BitWriter::new());
        for &s in &symbols {
            let (low, high) = TABLE[s];
            encoder.encode(low, high, 8).unwrap();
        }
        let bytes = encoder.finish().finish();

        let mut decoder = ArithmeticDecoder::new(BitReader::new(&bytes));
        let mut decoded = Vec::new();
        for _ in 0..symbols.len() {
            let s = lookup(decoder.point(8).unwrap());
            let (low, high) = TABLE[s];
            decoder.symbol_decoded(low, high, 8).unwrap();
            decoded.push(s);
        }
        assert_eq!(decoded, symbols);
    }

    #[test]
    fn test_rejects_invalid_interval() {
        let mut decoder = ArithmeticDecoder::new(BitReader::new(&[0, 0]));
        assert!(decoder.symbol_decoded(3, 2, 8).is_err());
    }

    #[test]
    fn test_point_rejects_scale_beyond_precision() {
        let decoder = ArithmeticDecoder::new(BitReader::new(&[0xFF, 0xFF]));
        assert!(matches!(
            decoder.point(1 << 20),
            Err(PpmError::InvalidInterval { scale: 0x10_0000, .. })
        ));
        assert!(decoder.point(0).is_err());
        assert_eq!(decoder.point(MAX_SCALE).unwrap(), MAX_SCALE - 1);
    }
}

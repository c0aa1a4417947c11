//! 16-bit arithmetic coder.
//!
//! Classic Witten–Neal–Cleary register coder: `low` and `high` bound the
//! current interval inside `[0, 0xFFFF]`. After each narrowing the
//! registers are renormalized:
//!
//! | Case | Condition | Action |
//! |------|-----------|--------|
//! | Convergence (E1/E2) | bit 15 of `low` == bit 15 of `high` | emit/consume that bit, shift |
//! | Underflow (E3) | `low` bit 14 set, `high` bit 14 clear | defer a bit, squeeze, shift |
//!
//! Scales up to [`MAX_SCALE`](crate::config::MAX_SCALE) are resolvable:
//! once neither case applies the range is wider than a quarter of the
//! register space.

mod bit_io;
mod decoder;
mod encoder;

pub use bit_io::{BitReader, BitSink, BitSource, BitWriter};
pub use decoder::ArithmeticDecoder;
pub use encoder::{ArithmeticEncoder, IntervalCoder};

use crate::config::MAX_SCALE;
use crate::error::{PpmError, Result};

const REGISTER_MASK: u32 = 0xFFFF;
const TOP_BIT: u32 = 0x8000;
const SECOND_BIT: u32 = 0x4000;

/// What the renormalization loop must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Renorm {
    /// Top bits agree; this bit is settled.
    Converged(bool),
    /// Interval straddles the midpoint without converging.
    Underflow,
    /// Range is wide enough.
    Stable,
}

/// The `low`/`high` register pair shared by encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    low: u32,
    high: u32,
}

impl Interval {
    const fn new() -> Self {
        Self {
            low: 0,
            high: REGISTER_MASK,
        }
    }

    /// Narrow to `[p_low, p_high)` out of `p_scale`.
    ///
    /// `p_scale` may not exceed [`MAX_SCALE`]; finer scales overflow the
    /// `range * p_high` product and cannot be resolved by 16-bit registers.
    #[inline]
    fn narrow(&mut self, p_low: u32, p_high: u32, p_scale: u32) -> Result<()> {
        if p_low >= p_high || p_high > p_scale || p_scale > MAX_SCALE {
            return Err(PpmError::InvalidInterval {
                low: p_low,
                high: p_high,
                scale: p_scale,
            });
        }
        let range = self.high - self.low + 1;
        let high = self.low + range * p_high / p_scale - 1;
        let low = self.low + range * p_low / p_scale;
        if low > high {
            // Scale too fine for the current range.
            return Err(PpmError::InvalidInterval {
                low: p_low,
                high: p_high,
                scale: p_scale,
            });
        }
        self.low = low;
        self.high = high;
        Ok(())
    }

    #[inline]
    fn renorm(&self) -> Renorm {
        if (self.low & TOP_BIT) == (self.high & TOP_BIT) {
            Renorm::Converged(self.low & TOP_BIT != 0)
        } else if self.low & SECOND_BIT != 0 && self.high & SECOND_BIT == 0 {
            Renorm::Underflow
        } else {
            Renorm::Stable
        }
    }

    /// Pull the interval away from the midpoint straddle.
    #[inline]
    fn squeeze(&mut self) {
        self.low &= SECOND_BIT - 1;
        self.high |= SECOND_BIT;
    }

    #[inline]
    fn shift(&mut self) {
        self.low = (self.low << 1) & REGISTER_MASK;
        self.high = ((self.high << 1) & REGISTER_MASK) | 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_rejects_empty_interval() {
        let mut interval = Interval::new();
        assert!(interval.narrow(5, 5, 256).is_err());
        assert!(interval.narrow(6, 5, 256).is_err());
        assert!(interval.narrow(0, 257, 256).is_err());
        assert_eq!(interval, Interval::new());
    }

    #[test]
    fn test_narrow_rejects_scale_beyond_precision() {
        let mut interval = Interval::new();
        assert!(matches!(
            interval.narrow(0, 70_000, 70_000),
            Err(PpmError::InvalidInterval {
                low: 0,
                high: 70_000,
                scale: 70_000
            })
        ));
        assert!(interval.narrow(0, 1, u32::MAX).is_err());
        assert!(interval.narrow(0, 1, MAX_SCALE + 1).is_err());
        assert_eq!(interval, Interval::new());

        interval.narrow(MAX_SCALE - 1, MAX_SCALE, MAX_SCALE).unwrap();
        assert_eq!(interval.low, 0xFFFC);
        assert_eq!(interval.high, 0xFFFF);
    }

    #[test]
    fn test_narrow_keeps_order() {
        let mut interval = Interval::new();
        interval.narrow(0, 1, 1024).unwrap();
        assert_eq!(interval.low, 0);
        assert_eq!(interval.high, 63);
        assert!(interval.low <= interval.high);

        let mut interval = Interval::new();
        interval.narrow(1023, 1024, 1024).unwrap();
        assert_eq!(interval.low, 0xFFC0);
        assert_eq!(interval.high, 0xFFFF);
    }

    #[test]
    fn test_renorm_cases() {
        let converged = Interval {
            low: 0x8000,
            high: 0xC000,
        };
        assert_eq!(converged.renorm(), Renorm::Converged(true));

        let straddle = Interval {
            low: 0x4000,
            high: 0xBFFF,
        };
        assert_eq!(straddle.renorm(), Renorm::Underflow);

        let wide = Interval {
            low: 0x3FFF,
            high: 0xBFFF,
        };
        assert_eq!(wide.renorm(), Renorm::Stable);
    }

    #[test]
    fn test_squeeze_and_shift() {
        let mut interval = Interval {
            low: 0x5000,
            high: 0xA000,
        };
        interval.squeeze();
        assert_eq!(interval.low, 0x1000);
        assert_eq!(interval.high, 0xE000);
        interval.shift();
        assert_eq!(interval.low, 0x2000);
        assert_eq!(interval.high, 0xC001);
    }
}

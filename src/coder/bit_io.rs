//! Bit-level adapters between the arithmetic coder and byte buffers.
//!
//! Both directions are MSB first within each byte.

/// Destination for coder output bits.
pub trait BitSink {
    fn output_bit(&mut self, bit: bool);
}

/// Source of coder input bits.
pub trait BitSource {
    fn input_bit(&mut self) -> bool;

    /// Whether the current byte index is still inside the input.
    fn has_data(&self) -> bool;
}

impl<T: BitSink + ?Sized> BitSink for &mut T {
    #[inline]
    fn output_bit(&mut self, bit: bool) {
        (**self).output_bit(bit);
    }
}

impl<T: BitSource + ?Sized> BitSource for &mut T {
    #[inline]
    fn input_bit(&mut self) -> bool {
        (**self).input_bit()
    }

    #[inline]
    fn has_data(&self) -> bool {
        (**self).has_data()
    }
}

/// Bit writer that packs bits into a byte vector.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Partially filled byte
    current: u8,
    /// Bits held in `current`
    pending: u32,
    bits_written: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed bytes so far; a trailing partial byte is not included.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pad the last partial byte with zero bits and return the buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.pending > 0 {
            self.bytes.push(self.current << (8 - self.pending));
        }
        self.bytes
    }
}

impl BitSink for BitWriter {
    #[inline]
    fn output_bit(&mut self, bit: bool) {
        self.current = (self.current << 1) | bit as u8;
        self.pending += 1;
        self.bits_written += 1;
        if self.pending == 8 {
            self.bytes.push(self.current);
            self.current = 0;
            self.pending = 0;
        }
    }
}

/// Bit reader over a byte slice.
///
/// Reading past the end yields zero bits, which is what the decoder's
/// 16-bit look-ahead needs near the end of a stream.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    index: usize,
    /// Unread bits left in `data[index]`
    remaining: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            index: 0,
            remaining: 8,
        }
    }

    /// Index of the byte currently being read.
    pub fn byte_position(&self) -> usize {
        self.index
    }
}

impl BitSource for BitReader<'_> {
    #[inline]
    fn input_bit(&mut self) -> bool {
        // The index only advances when the next bit is requested, so a
        // fully consumed final byte still counts as data.
        if self.remaining == 0 {
            self.index += 1;
            self.remaining = 8;
        }
        self.remaining -= 1;
        self.data
            .get(self.index)
            .is_some_and(|&byte| (byte >> self.remaining) & 1 != 0)
    }

    #[inline]
    fn has_data(&self) -> bool {
        self.index < self.data.len()
    }
}

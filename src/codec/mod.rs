//! Order-fallback compression and decompression.
//!
//! Each symbol is coded against the longest context that has a leaf. If
//! that leaf does not contain the symbol, its escape interval is coded and
//! the walk drops the oldest context byte and tries again, down to the
//! root. The decoder replays exactly the same walk, so both sides agree on
//! every fallback decision.
//!
//! ## Example
//!
//! ```rust
//! use ppm_pack::{Compressor, Decompressor, FrozenModel, ModelConfig};
//!
//! let input = b"abracadabra abracadabra";
//! let model = FrozenModel::from_input(input, &ModelConfig::default())?;
//!
//! let packed = Compressor::new(&model).compress(input)?;
//! let unpacked = Decompressor::new(&model).decompress(&packed, input.len())?;
//! assert_eq!(unpacked, input);
//! # Ok::<(), ppm_pack::PpmError>(())
//! ```

use crate::coder::{
    ArithmeticDecoder, ArithmeticEncoder, BitReader, BitSink, BitSource, BitWriter, IntervalCoder,
};
use crate::error::{PpmError, Result};
use crate::model::window::ContextWindow;
use crate::model::{FrozenModel, Located};


/// Receiver of decoded symbols, called once per symbol in order.
pub trait SymbolSink {
    fn add_symbol(&mut self, symbol: u8);
}

impl SymbolSink for Vec<u8> {
    #[inline]
    fn add_symbol(&mut self, symbol: u8) {
        self.push(symbol);
    }
}

/// Code `symbol` after `context`, escaping to shorter contexts as needed.
pub fn encode_symbol<C: IntervalCoder>(
    model: &FrozenModel,
    coder: &mut C,
    symbol: u8,
    context: &[u8],
) -> Result<()> {
    if context.len() > model.max_order() {
        return Err(PpmError::ContextTooLong {
            length: context.len(),
            max_order: model.max_order(),
        });
    }

    for order in (0..=context.len()).rev() {
        let Some(leaf) = model.leaf_for(&context[context.len() - order..]) else {
            continue;
        };
        if let Some((low, high)) = leaf.symbol_interval(symbol) {
            return coder.encode(low, high, leaf.scale());
        }
        if order == 0 {
            break;
        }
        let (low, high) = leaf.escape_interval();
        coder.encode(low, high, leaf.scale())?;
    }
    Err(PpmError::ContextExhausted)
}

/// Decode one symbol that was coded after `context`.
pub fn decode_symbol<S: BitSource>(
    model: &FrozenModel,
    decoder: &mut ArithmeticDecoder<S>,
    context: &[u8],
) -> Result<u8> {
    if context.len() > model.max_order() {
        return Err(PpmError::ContextTooLong {
            length: context.len(),
            max_order: model.max_order(),
        });
    }

    for order in (0..=context.len()).rev() {
        let Some(leaf) = model.leaf_for(&context[context.len() - order..]) else {
            continue;
        };
        let scale = leaf.scale();
        match leaf.locate(decoder.point(scale)?) {
            Located::Symbol { symbol, low, high } => {
                decoder.symbol_decoded(low, high, scale)?;
                return Ok(symbol);
            }
            Located::Escape { .. } if order == 0 => break,
            Located::Escape { low, high } => decoder.symbol_decoded(low, high, scale)?,
        }
    }
    Err(PpmError::ContextExhausted)
}

/// Encoder side of a frozen model.
#[derive(Debug, Clone, Copy)]
pub struct Compressor<'m> {
    model: &'m FrozenModel,
}

impl<'m> Compressor<'m> {
    pub fn new(model: &'m FrozenModel) -> Self {
        Self { model }
    }

    /// Compress `input` into a byte vector.
    ///
    /// The output carries no header or length. Keep `input.len()` to
    /// decompress it exactly.
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let output = self.compress_into(input, BitWriter::new())?.finish();
        tracing::debug!(
            input_len = input.len(),
            output_len = output.len(),
            "compressed"
        );
        Ok(output)
    }

    /// Compress `input` into any bit sink and return it.
    ///
    /// Empty input produces no bits at all.
    pub fn compress_into<S: BitSink>(&self, input: &[u8], sink: S) -> Result<S> {
        if input.is_empty() {
            return Ok(sink);
        }
        let mut encoder = ArithmeticEncoder::new(sink);
        let mut window = ContextWindow::new(self.model.max_order());
        for &byte in input {
            encode_symbol(self.model, &mut encoder, byte, window.as_slice())?;
            window.push(byte);
        }
        Ok(encoder.finish())
    }
}

/// Decoder side of a frozen model.
#[derive(Debug, Clone, Copy)]
pub struct Decompressor<'m> {
    model: &'m FrozenModel,
}

impl<'m> Decompressor<'m> {
    pub fn new(model: &'m FrozenModel) -> Self {
        Self { model }
    }

    /// Decode exactly `symbol_count` symbols from `data`.
    pub fn decompress(&self, data: &[u8], symbol_count: usize) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(symbol_count);
        self.decode_into(BitReader::new(data), &mut output, Some(symbol_count))?;
        tracing::debug!(
            input_len = data.len(),
            output_len = output.len(),
            "decompressed"
        );
        Ok(output)
    }

    /// Decode until the source runs out of bytes.
    ///
    /// Termination is checked per byte, not per symbol, so the result may
    /// carry extra symbols decoded from the stream's padding bits.
    pub fn decompress_to_end(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.decode_into(BitReader::new(data), &mut output, None)?;
        Ok(output)
    }

    /// Decode into `sink`, stopping after `limit` symbols or, without a
    /// limit, once `source` has no more data. Returns the symbol count.
    pub fn decode_into<S: BitSource, K: SymbolSink>(
        &self,
        source: S,
        sink: &mut K,
        limit: Option<usize>,
    ) -> Result<usize> {
        if limit == Some(0) {
            return Ok(0);
        }
        let mut decoder = ArithmeticDecoder::new(source);
        let mut window = ContextWindow::new(self.model.max_order());
        let mut decoded = 0;
        loop {
            let done = match limit {
                Some(limit) => decoded >= limit,
                None => !decoder.has_data(),
            };
            if done {
                break;
            }
            let symbol = decode_symbol(self.model, &mut decoder, window.as_slice())?;
            sink.add_symbol(symbol);
            window.push(symbol);
            decoded += 1;
        }
        Ok(decoded)
    }
}

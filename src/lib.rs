//! Semi-static PPM compression.
//!
//! A two-pass compressor: byte-context frequency models of orders
//! `0..=max_order` are built from the whole input, pruned and normalized
//! to fixed integer scales, then drive a 16-bit arithmetic coder. The
//! decoder needs the identical [`FrozenModel`]; nothing about the model
//! is written into the compressed stream.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | [`ModelLeaf`], [`Model`], [`ContextModelSet`], [`FrozenModel`] |
//! | [`coder`] | [`ArithmeticEncoder`], [`ArithmeticDecoder`], bit adapters |
//! | [`codec`] | order fallback, [`Compressor`], [`Decompressor`] |
//!
//! ## Example
//!
//! ```rust
//! use ppm_pack::ModelConfig;
//!
//! let input = b"she sells sea shells by the sea shore";
//! let (model, packed) = ppm_pack::compress(input, &ModelConfig::default())?;
//! let unpacked = ppm_pack::decompress(&model, &packed, input.len())?;
//! assert_eq!(unpacked, input);
//! # Ok::<(), ppm_pack::PpmError>(())
//! ```
//!
//! ## Logging
//!
//! Phase statistics and pruning decisions are reported through `tracing`
//! at `debug`/`trace` level. No subscriber is installed by the library.

pub mod codec;
pub mod coder;
pub mod config;
pub mod error;
pub mod model;

pub use codec::{decode_symbol, encode_symbol, Compressor, Decompressor, SymbolSink};
pub use coder::{
    ArithmeticDecoder, ArithmeticEncoder, BitReader, BitSink, BitSource, BitWriter, IntervalCoder,
};
pub use config::ModelConfig;
pub use error::{PpmError, Result};
pub use model::{ContextModelSet, FrozenModel, Located, Model, ModelLeaf, ModelStats};

/// Build a model from `input` and compress `input` with it.
///
/// The returned model must be kept to decompress the output.
pub fn compress(input: &[u8], config: &ModelConfig) -> Result<(FrozenModel, Vec<u8>)> {
    let model = FrozenModel::from_input(input, config)?;
    let packed = Compressor::new(&model).compress(input)?;
    Ok((model, packed))
}

/// Decompress `symbol_count` bytes produced by [`compress`] with `model`.
pub fn decompress(model: &FrozenModel, data: &[u8], symbol_count: usize) -> Result<Vec<u8>> {
    Decompressor::new(model).decompress(data, symbol_count)
}

//! Error types for model construction and coding.
//!
//! This module provides the [`PpmError`] type. Every variant except
//! [`Io`] and [`InvalidConfig`] signals a broken internal contract: a
//! corrupted model or a coder driven outside its preconditions. None of
//! them are retried; they propagate to the caller and end the run.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Model | [`ContextLengthMismatch`], [`ScaleMismatch`] | Model tables violate their invariants |
//! | Fallback | [`ContextTooLong`], [`ContextExhausted`] | Escape walk could not finish |
//! | Coder | [`InvalidInterval`], [`CorruptStream`] | Arithmetic coder contract broken |
//! | Setup | [`InvalidConfig`], [`Io`] | Bad parameters or input read failure |
//!
//! ## Example
//!
//! ```rust
//! use ppm_pack::{ModelConfig, PpmError};
//!
//! let config = ModelConfig::default().with_root_scale(100);
//! match config.validate() {
//!     Err(PpmError::InvalidConfig(msg)) => assert!(msg.contains("root_scale")),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! [`ContextLengthMismatch`]: PpmError::ContextLengthMismatch
//! [`ScaleMismatch`]: PpmError::ScaleMismatch
//! [`ContextTooLong`]: PpmError::ContextTooLong
//! [`ContextExhausted`]: PpmError::ContextExhausted
//! [`InvalidInterval`]: PpmError::InvalidInterval
//! [`CorruptStream`]: PpmError::CorruptStream
//! [`InvalidConfig`]: PpmError::InvalidConfig
//! [`Io`]: PpmError::Io

use std::fmt;
use std::io;

/// Error type for PPM operations.
#[derive(Debug)]
pub enum PpmError {
    /// A symbol was added to a [`Model`] under a context whose length is not
    /// the model's order.
    ///
    /// [`Model`]: crate::Model
    ContextLengthMismatch {
        /// The model's order.
        expected: usize,
        /// Length of the context that was passed in.
        actual: usize,
    },

    /// A context longer than the highest modeled order was passed to the
    /// coder.
    ContextTooLong {
        /// Length of the offending context.
        length: usize,
        /// Highest order the model set carries.
        max_order: usize,
    },

    /// The arithmetic coder was asked to narrow to an empty or out-of-scale
    /// interval (`low < high <= scale` does not hold), or `scale` is finer
    /// than the 16-bit registers can resolve.
    InvalidInterval {
        /// Lower bound of the requested sub-interval.
        low: u32,
        /// Upper bound of the requested sub-interval, exclusive.
        high: u32,
        /// Total the bounds are measured against.
        scale: u32,
    },

    /// A leaf's total after normalization is not its target scale.
    ScaleMismatch {
        /// Order of the model holding the leaf.
        order: usize,
        /// Total count the leaf ended up with.
        total: u64,
        /// Total the leaf had to reach.
        scale: u32,
    },

    /// The order fallback reached the empty context without finding a leaf
    /// that can code the symbol. The root leaf covers every byte, so this
    /// only happens with a corrupted model.
    ContextExhausted,

    /// The decoder's code register left the coding interval. The stream was
    /// not produced with this model.
    CorruptStream,

    /// Model parameters are unusable.
    InvalidConfig(String),

    /// An I/O error occurred while reading input.
    Io(io::Error),
}

impl fmt::Display for PpmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextLengthMismatch { expected, actual } => write!(
                f,
                "Wrong context length: model order is {}, context has {} bytes",
                expected, actual
            ),
            Self::ContextTooLong { length, max_order } => write!(
                f,
                "Context of {} bytes exceeds maximum order {}",
                length, max_order
            ),
            Self::InvalidInterval { low, high, scale } => write!(
                f,
                "Invalid coding interval: [{}, {}) of scale {}",
                low, high, scale
            ),
            Self::ScaleMismatch {
                order,
                total,
                scale,
            } => write!(
                f,
                "Can't normalize leaf at order {}: total {} != scale {}",
                order, total, scale
            ),
            Self::ContextExhausted => write!(f, "Can't find appropriate leaf for symbol"),
            Self::CorruptStream => write!(f, "Code register outside coding interval"),
            Self::InvalidConfig(msg) => write!(f, "Invalid model config: {}", msg),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PpmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PpmError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, PpmError>;

//! Semi-static context models.
//!
//! Statistics are gathered from the whole input before anything is coded:
//!
//! ```text
//! input bytes
//!       ↓
//! ┌──────────────────┐
//! │ build            │ ← one order updated per position
//! └──────────────────┘
//!       ↓
//! ┌──────────────────┐
//! │ prune            │ ← weak contexts folded into shorter heirs
//! └──────────────────┘
//!       ↓
//! ┌──────────────────┐
//! │ normalize        │ ← every leaf scaled to a fixed integer total
//! └──────────────────┘
//!       ↓
//! FrozenModel (shared by encoder and decoder)
//! ```
//!
//! Order 0 is the root: after normalization it covers all 256 byte values
//! and has no escape, so the order fallback always terminates there.

mod leaf;
mod order;
mod set;
mod stats;
pub(crate) mod window;

pub use leaf::{Located, ModelLeaf};
pub use order::Model;
pub use set::{ContextModelSet, FrozenModel};
pub use stats::ModelStats;

//! Per-order model statistics.

use std::fmt;

/// Size summary of one [`Model`](crate::Model).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelStats {
    pub order: usize,
    /// Sum of all leaf totals, escapes included.
    pub total_count: u64,
    /// Number of (context, symbol) entries.
    pub entries_count: usize,
    /// Number of contexts.
    pub leaves_count: usize,
}

impl fmt::Display for ModelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order {}: total count {}, {} entries in {} leaves",
            self.order, self.total_count, self.entries_count, self.leaves_count
        )
    }
}

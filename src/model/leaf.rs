//! Frequency table for a single context.

use crate::config::ALPHABET_SIZE;

/// Result of mapping a coder point onto a leaf's cumulative table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located {
    /// The point falls in a symbol's bucket `[low, high)`.
    Symbol { symbol: u8, low: u32, high: u32 },
    /// The point falls in the escape bucket `[scale - exit, scale)`.
    Escape { low: u32, high: u32 },
}

/// Symbol statistics of one context.
///
/// Counts live in a 256-slot table indexed by byte value; a zero slot means
/// the symbol is absent. Ascending byte order is the cumulative-frequency
/// order, so interval bounds come straight from a prefix sum that
/// [`normalize`](Self::normalize) builds once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelLeaf {
    counts: [u64; ALPHABET_SIZE],
    exit: u64,
    scale: u32,
    /// `cumulative[s]` is the sum of counts of all symbols below `s`.
    cumulative: [u32; ALPHABET_SIZE + 1],
}

impl ModelLeaf {
    /// Create an empty leaf that will normalize to `scale`.
    pub fn new(scale: u32) -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
            exit: 0,
            scale,
            cumulative: [0; ALPHABET_SIZE + 1],
        }
    }

    /// Add `count` occurrences of `symbol`.
    #[inline]
    pub fn add_symbol(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] += count;
    }

    #[inline]
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    #[inline]
    pub fn contains(&self, symbol: u8) -> bool {
        self.counts[symbol as usize] != 0
    }

    /// Escape weight.
    #[inline]
    pub fn exit(&self) -> u64 {
        self.exit
    }

    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Sum of all symbol counts plus the escape weight.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.exit
    }

    /// Number of symbols present.
    pub fn entries_count(&self) -> usize {
        self.counts.iter().filter(|&&c| c != 0).count()
    }

    /// Present symbols with their counts, in ascending byte order.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count != 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Rescale the leaf so that its total is exactly `scale`.
    ///
    /// Non-root leaves get an escape weight of at least 1 before scaling,
    /// and every symbol whose scaled count floors to zero is dropped. The
    /// root leaf ends up covering all 256 byte values with `exit == 0`.
    ///
    /// The caller checks the resulting total; see
    /// [`Model::normalize`](crate::Model::normalize).
    pub fn normalize(&mut self, is_root: bool) {
        if is_root {
            self.exit = 0;
        } else if self.exit == 0 {
            self.exit = 1;
        }

        let current_scale = self.total_count();
        let mut desired_scale = u64::from(self.scale);
        if is_root {
            // Reserve one unit for each symbol that is forced in below.
            let missing = (ALPHABET_SIZE - self.entries_count()) as u64;
            desired_scale = desired_scale.saturating_sub(missing);
        }

        let mut dropped = 0u64;
        if current_scale != 0 {
            let mut kept = 0u64;
            for count in self.counts.iter_mut().filter(|c| **c != 0) {
                *count = *count * desired_scale / current_scale;
                if *count == 0 {
                    dropped += 1;
                }
                kept += *count;
            }
            self.exit = desired_scale - kept;
        } else {
            self.exit = desired_scale;
        }

        if is_root {
            for count in self.counts.iter_mut().filter(|c| **c == 0) {
                *count = 1;
            }
            self.settle_root(dropped);
        }

        self.rebuild_cumulative();
    }

    /// Fold the root's rounding residue back into its symbols.
    ///
    /// After the forced fill the root totals `scale + dropped` with the
    /// residue sitting in `exit`. The residue is moved onto the most
    /// frequent symbol, and the excess from re-added symbols is taken from
    /// the largest counts, never below 1.
    fn settle_root(&mut self, dropped: u64) {
        let residue = std::mem::take(&mut self.exit);
        if residue >= dropped {
            let top = self.most_frequent();
            self.counts[top] += residue - dropped;
            return;
        }

        let mut deficit = dropped - residue;
        while deficit > 0 {
            let top = self.most_frequent();
            let take = deficit.min(self.counts[top] - 1);
            if take == 0 {
                // Every slot is at 1; the total check reports the mismatch.
                break;
            }
            self.counts[top] -= take;
            deficit -= take;
        }
    }

    /// Highest-count symbol, lowest byte value on ties.
    fn most_frequent(&self) -> usize {
        let mut best = 0;
        for (symbol, &count) in self.counts.iter().enumerate() {
            if count > self.counts[best] {
                best = symbol;
            }
        }
        best
    }

    fn rebuild_cumulative(&mut self) {
        let mut running = 0u32;
        self.cumulative[0] = 0;
        for (symbol, &count) in self.counts.iter().enumerate() {
            running += count as u32;
            self.cumulative[symbol + 1] = running;
        }
    }

    /// Coding interval `[low, high)` of `symbol`, or `None` if the symbol
    /// must be escaped. Only meaningful on a normalized leaf.
    #[inline]
    pub fn symbol_interval(&self, symbol: u8) -> Option<(u32, u32)> {
        let s = symbol as usize;
        if self.counts[s] == 0 {
            return None;
        }
        Some((self.cumulative[s], self.cumulative[s + 1]))
    }

    /// The escape interval `[scale - exit, scale)`.
    #[inline]
    pub fn escape_interval(&self) -> (u32, u32) {
        (self.scale - self.exit as u32, self.scale)
    }

    /// Find the bucket containing `point`, scanning symbols in ascending
    /// byte order and falling through to the escape bucket.
    pub fn locate(&self, point: u32) -> Located {
        if point >= self.cumulative[ALPHABET_SIZE] {
            let (low, high) = self.escape_interval();
            return Located::Escape { low, high };
        }
        // First symbol whose upper bound exceeds the point. Absent symbols
        // have empty buckets and are skipped by construction.
        let s = self.cumulative[1..].partition_point(|&upper| upper <= point);
        Located::Symbol {
            symbol: s as u8,
            low: self.cumulative[s],
            high: self.cumulative[s + 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_symbol_accumulates() {
        let mut leaf = ModelLeaf::new(256);
        leaf.add_symbol(b'a', 3);
        leaf.add_symbol(b'a', 2);
        leaf.add_symbol(b'b', 1);
        assert_eq!(leaf.count(b'a'), 5);
        assert_eq!(leaf.total_count(), 6);
        assert_eq!(leaf.entries_count(), 2);
        assert_eq!(
            leaf.symbols().collect::<Vec<_>>(),
            vec![(b'a', 5), (b'b', 1)]
        );
    }

    #[test]
    fn test_normalize_single_symbol_leaf() {
        let mut leaf = ModelLeaf::new(256);
        leaf.add_symbol(b'x', 10);
        leaf.normalize(false);

        // exit forced to 1, current scale 11, 10 * 256 / 11 = 232
        assert_eq!(leaf.count(b'x'), 232);
        assert_eq!(leaf.exit(), 24);
        assert_eq!(leaf.total_count(), 256);
        assert_eq!(leaf.symbol_interval(b'x'), Some((0, 232)));
        assert_eq!(leaf.escape_interval(), (232, 256));
    }

    #[test]
    fn test_normalize_drops_vanishing_symbols() {
        let mut leaf = ModelLeaf::new(16);
        leaf.add_symbol(b'a', 1000);
        leaf.add_symbol(b'b', 1);
        leaf.normalize(false);

        assert!(leaf.contains(b'a'));
        assert!(!leaf.contains(b'b'));
        assert!(leaf.exit() >= 1);
        assert_eq!(leaf.total_count(), 16);
    }

    #[test]
    fn test_normalize_root_fills_alphabet() {
        let mut leaf = ModelLeaf::new(1024);
        leaf.add_symbol(b'A', 4);
        leaf.normalize(true);

        assert_eq!(leaf.exit(), 0);
        assert_eq!(leaf.entries_count(), 256);
        assert_eq!(leaf.count(b'A'), 769);
        assert_eq!(leaf.count(b'B'), 1);
        assert_eq!(leaf.total_count(), 1024);
    }

    #[test]
    fn test_normalize_root_folds_residue() {
        let mut leaf = ModelLeaf::new(1024);
        leaf.add_symbol(b'a', 2);
        leaf.add_symbol(b'b', 1);
        leaf.normalize(true);

        // desired 770: a = 513, b = 256, residue 1 goes to 'a'
        assert_eq!(leaf.exit(), 0);
        assert_eq!(leaf.count(b'a'), 514);
        assert_eq!(leaf.count(b'b'), 256);
        assert_eq!(leaf.total_count(), 1024);
    }

    #[test]
    fn test_normalize_root_keeps_rare_symbols() {
        let mut leaf = ModelLeaf::new(1024);
        leaf.add_symbol(0, 1_000_000);
        for symbol in 1..=200u8 {
            leaf.add_symbol(symbol, 1);
        }
        leaf.normalize(true);

        assert_eq!(leaf.exit(), 0);
        assert_eq!(leaf.entries_count(), 256);
        assert!(leaf.symbols().all(|(_, count)| count >= 1));
        assert_eq!(leaf.total_count(), 1024);
    }

    #[test]
    fn test_locate_matches_intervals() {
        let mut leaf = ModelLeaf::new(256);
        leaf.add_symbol(b'a', 5);
        leaf.add_symbol(b'c', 5);
        leaf.normalize(false);

        let (a_low, a_high) = leaf.symbol_interval(b'a').unwrap();
        let (c_low, c_high) = leaf.symbol_interval(b'c').unwrap();
        assert_eq!(a_high, c_low);

        assert_eq!(
            leaf.locate(a_low),
            Located::Symbol {
                symbol: b'a',
                low: a_low,
                high: a_high
            }
        );
        assert_eq!(
            leaf.locate(c_high - 1),
            Located::Symbol {
                symbol: b'c',
                low: c_low,
                high: c_high
            }
        );
        assert_eq!(
            leaf.locate(c_high),
            Located::Escape {
                low: c_high,
                high: 256
            }
        );
        assert_eq!(leaf.symbol_interval(b'b'), None);
    }
}

//! All contexts of one fixed order.

use std::collections::BTreeMap;

use super::leaf::ModelLeaf;
use super::stats::ModelStats;
use crate::error::{PpmError, Result};

/// Leaves of a single order, keyed by their context bytes.
///
/// Contexts are kept sorted so that iteration, statistics and pruning all
/// visit leaves in a deterministic order.
#[derive(Debug, Clone)]
pub struct Model {
    order: usize,
    scale: u32,
    contexts: BTreeMap<Vec<u8>, ModelLeaf>,
}

impl Model {
    pub fn new(order: usize, scale: u32) -> Self {
        Self {
            order,
            scale,
            contexts: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Scale every leaf of this model normalizes to.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Record `count` occurrences of `symbol` after `context`.
    ///
    /// `context` must be exactly `order` bytes long.
    pub fn add_symbol(&mut self, symbol: u8, context: &[u8], count: u64) -> Result<()> {
        if context.len() != self.order {
            return Err(PpmError::ContextLengthMismatch {
                expected: self.order,
                actual: context.len(),
            });
        }
        let scale = self.scale;
        self.contexts
            .entry(context.to_vec())
            .or_insert_with(|| ModelLeaf::new(scale))
            .add_symbol(symbol, count);
        Ok(())
    }

    #[inline]
    pub fn leaf(&self, context: &[u8]) -> Option<&ModelLeaf> {
        self.contexts.get(context)
    }

    pub fn remove_leaf(&mut self, context: &[u8]) -> Option<ModelLeaf> {
        self.contexts.remove(context)
    }

    /// Leaves in ascending context order.
    pub fn leaves(&self) -> impl Iterator<Item = (&[u8], &ModelLeaf)> {
        self.contexts
            .iter()
            .map(|(context, leaf)| (context.as_slice(), leaf))
    }

    /// Contexts whose total count is below `threshold`.
    pub(crate) fn weak_contexts(&self, threshold: u64) -> Vec<Vec<u8>> {
        self.contexts
            .iter()
            .filter(|(_, leaf)| leaf.total_count() < threshold)
            .map(|(context, _)| context.clone())
            .collect()
    }

    /// Normalize every leaf and check it landed exactly on the scale.
    pub fn normalize(&mut self) -> Result<()> {
        let is_root = self.order == 0;
        for leaf in self.contexts.values_mut() {
            leaf.normalize(is_root);
            let total = leaf.total_count();
            if total != u64::from(self.scale) {
                return Err(PpmError::ScaleMismatch {
                    order: self.order,
                    total,
                    scale: self.scale,
                });
            }
        }
        Ok(())
    }

    pub fn total_count(&self) -> u64 {
        self.contexts.values().map(ModelLeaf::total_count).sum()
    }

    pub fn entries_count(&self) -> usize {
        self.contexts.values().map(ModelLeaf::entries_count).sum()
    }

    pub fn leaves_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            order: self.order,
            total_count: self.total_count(),
            entries_count: self.entries_count(),
            leaves_count: self.leaves_count(),
        }
    }
}

//! The order-0..N model collection and its build pipeline.

use super::leaf::ModelLeaf;
use super::order::Model;
use super::stats::ModelStats;
use super::window::ContextWindow;
use crate::config::ModelConfig;
use crate::error::{PpmError, Result};

/// Models for orders `0..=max_order`, still open for updates.
///
/// The pipeline is [`build`](Self::build) → [`prune`](Self::prune) →
/// [`normalize`](Self::normalize). Normalizing consumes the set and yields
/// a [`FrozenModel`], the only form the coder accepts.
#[derive(Debug, Clone)]
pub struct ContextModelSet {
    config: ModelConfig,
    models: Vec<Model>,
}

impl ContextModelSet {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        config.validate()?;
        let models = (0..=config.max_order)
            .map(|order| Model::new(order, config.scale_for(order)))
            .collect();
        Ok(Self {
            config: config.clone(),
            models,
        })
    }

    #[inline]
    pub fn max_order(&self) -> usize {
        self.config.max_order
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Record `symbol` in the model whose order is the context length.
    pub fn add_to_model(&mut self, symbol: u8, context: &[u8]) -> Result<()> {
        let max_order = self.max_order();
        match self.models.get_mut(context.len()) {
            Some(model) => model.add_symbol(symbol, context, 1),
            None => Err(PpmError::ContextTooLong {
                length: context.len(),
                max_order,
            }),
        }
    }

    /// Scan `input` once, counting each byte under the full history window
    /// available at its position.
    ///
    /// Only one order is updated per byte: the first `max_order` bytes land
    /// in orders 0, 1, ... and every later byte lands in `max_order`.
    /// Shorter contexts fill in through [`prune`](Self::prune).
    pub fn build(&mut self, input: &[u8]) -> Result<()> {
        let mut window = ContextWindow::new(self.max_order());
        for &byte in input {
            self.add_to_model(byte, window.as_slice())?;
            window.push(byte);
        }
        tracing::debug!(input_len = input.len(), "model built");
        self.log_stats("build");
        Ok(())
    }

    /// Fold statistically weak contexts into their shorter heirs.
    ///
    /// Runs from `max_order` down to order 1. A leaf whose total is below
    /// the threshold is removed and its counts are added to the context
    /// with the oldest byte dropped, one order lower. Order 0 is never
    /// pruned. Returns the number of removed contexts.
    pub fn prune(&mut self) -> Result<usize> {
        let threshold = self.config.prune_threshold;
        let mut pruned = 0;
        for order in (1..self.models.len()).rev() {
            for context in self.models[order].weak_contexts(threshold) {
                let Some(leaf) = self.models[order].remove_leaf(&context) else {
                    continue;
                };
                tracing::trace!(
                    order,
                    context = ?context,
                    total = leaf.total_count(),
                    "dropping context"
                );
                let heir = &context[1..];
                let lower = &mut self.models[order - 1];
                for (symbol, count) in leaf.symbols() {
                    lower.add_symbol(symbol, heir, count)?;
                }
                pruned += 1;
            }
        }
        tracing::debug!(pruned, threshold, "model pruned");
        self.log_stats("prune");
        Ok(pruned)
    }

    /// Normalize every leaf to its scale and freeze the result.
    pub fn normalize(mut self) -> Result<FrozenModel> {
        for model in &mut self.models {
            model.normalize()?;
        }
        self.log_stats("normalize");
        Ok(FrozenModel {
            config: self.config,
            models: self.models,
        })
    }

    pub fn stats(&self) -> Vec<ModelStats> {
        self.models.iter().map(Model::stats).collect()
    }

    fn log_stats(&self, phase: &str) {
        for model in &self.models {
            let stats = model.stats();
            tracing::debug!(
                phase,
                order = stats.order,
                total_count = stats.total_count,
                entries = stats.entries_count,
                leaves = stats.leaves_count,
                "model stats"
            );
        }
    }
}

/// A built, pruned and normalized model set.
///
/// Read-only: the exact same value must drive both compression and
/// decompression of a stream.
#[derive(Debug, Clone)]
pub struct FrozenModel {
    config: ModelConfig,
    models: Vec<Model>,
}

impl FrozenModel {
    /// Build, prune and normalize a model from `input`.
    pub fn from_input(input: &[u8], config: &ModelConfig) -> Result<Self> {
        let mut set = ContextModelSet::new(config)?;
        set.build(input)?;
        set.prune()?;
        set.normalize()
    }

    #[inline]
    pub fn max_order(&self) -> usize {
        self.config.max_order
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Leaf for `context` in the model of order `context.len()`.
    #[inline]
    pub fn leaf_for(&self, context: &[u8]) -> Option<&ModelLeaf> {
        self.models.get(context.len())?.leaf(context)
    }

    /// The order-0 leaf, absent only when the model was built from no input.
    pub fn root(&self) -> Option<&ModelLeaf> {
        self.leaf_for(&[])
    }

    pub fn stats(&self) -> Vec<ModelStats> {
        self.models.iter().map(Model::stats).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(input: &[u8]) -> ContextModelSet {
        let mut set = ContextModelSet::new(&ModelConfig::default()).unwrap();
        set.build(input).unwrap();
        set
    }

    #[test]
    fn test_build_updates_single_order_per_byte() {
        let set = set(b"abcab");
        let models = set.models();

        // 'a' with no history, 'b' after "a", then order 2 only.
        assert_eq!(models[0].leaf(b"").unwrap().count(b'a'), 1);
        assert_eq!(models[0].total_count(), 1);
        assert_eq!(models[1].leaf(b"a").unwrap().count(b'b'), 1);
        assert_eq!(models[1].total_count(), 1);
        assert_eq!(models[2].leaf(b"ab").unwrap().count(b'c'), 1);
        assert_eq!(models[2].leaf(b"bc").unwrap().count(b'a'), 1);
        assert_eq!(models[2].leaf(b"ca").unwrap().count(b'b'), 1);
        assert_eq!(models[2].total_count(), 3);
    }

    #[test]
    fn test_add_to_model_rejects_long_context() {
        let mut set = ContextModelSet::new(&ModelConfig::default()).unwrap();
        assert!(matches!(
            set.add_to_model(b'a', b"abc"),
            Err(PpmError::ContextTooLong {
                length: 3,
                max_order: 2
            })
        ));
    }

    #[test]
    fn test_prune_merges_into_heir() {
        let mut set = set(b"AAAA");
        // order 2 "AA": {A: 2}, order 1 "A": {A: 1}, root {A: 1}
        let pruned = set.prune().unwrap();
        assert_eq!(pruned, 2);

        let models = set.models();
        assert_eq!(models[2].leaves_count(), 0);
        assert_eq!(models[1].leaves_count(), 0);
        assert_eq!(models[0].leaf(b"").unwrap().count(b'A'), 4);
    }

    #[test]
    fn test_prune_keeps_strong_contexts() {
        let input = vec![b'z'; 40];
        let mut set = set(&input);
        set.prune().unwrap();

        let models = set.models();
        // 38 occurrences under "zz" survive, the single order-1 entry folds down.
        assert_eq!(models[2].leaf(b"zz").unwrap().count(b'z'), 38);
        assert_eq!(models[1].leaves_count(), 0);
        assert_eq!(models[0].leaf(b"").unwrap().count(b'z'), 2);
    }

    #[test]
    fn test_normalize_freezes_scaled_model() {
        let mut set = set(b"AAAA");
        set.prune().unwrap();
        let model = set.normalize().unwrap();

        let root = model.root().unwrap();
        assert_eq!(root.entries_count(), 256);
        assert_eq!(root.exit(), 0);
        assert_eq!(root.total_count(), 1024);
        assert!(root.count(b'A') >= 1);
        assert!(model.leaf_for(b"AA").is_none());
    }

    #[test]
    fn test_empty_input_has_no_contexts() {
        let model = FrozenModel::from_input(b"", &ModelConfig::default()).unwrap();
        assert!(model.models().iter().all(|m| m.leaves_count() == 0));
        assert!(model.root().is_none());
    }
}

//! Model parameters.

use crate::error::{PpmError, Result};

/// Largest leaf scale the 16-bit coder can resolve.
///
/// After renormalization the coding range always spans more than `0x4000`
/// values, so every count of at least 1 still maps to a non-empty
/// sub-interval as long as the scale stays at or below this bound.
pub const MAX_SCALE: u32 = 0x4000;

/// Highest supported context order.
pub const MAX_ORDER: usize = 8;

/// Number of distinct symbols in the byte alphabet.
pub const ALPHABET_SIZE: usize = 256;

/// Parameters for building a [`ContextModelSet`](crate::ContextModelSet).
///
/// The defaults are order 2 with a root scale of 1024, a leaf scale of 256
/// and a pruning threshold of 16.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Longest context length that gets its own model.
    pub max_order: usize,
    /// Target total of the order-0 leaf.
    pub root_scale: u32,
    /// Target total of every leaf above order 0.
    pub leaf_scale: u32,
    /// Leaves whose total count is below this are folded into their heir.
    pub prune_threshold: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_order: 2,
            root_scale: 1024,
            leaf_scale: 256,
            prune_threshold: 16,
        }
    }
}

impl ModelConfig {
    pub fn with_max_order(mut self, max_order: usize) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn with_root_scale(mut self, scale: u32) -> Self {
        self.root_scale = scale;
        self
    }

    pub fn with_leaf_scale(mut self, scale: u32) -> Self {
        self.leaf_scale = scale;
        self
    }

    pub fn with_prune_threshold(mut self, threshold: u64) -> Self {
        self.prune_threshold = threshold;
        self
    }

    /// Target scale for leaves of the given order.
    #[inline]
    pub fn scale_for(&self, order: usize) -> u32 {
        if order == 0 {
            self.root_scale
        } else {
            self.leaf_scale
        }
    }

    /// Check that the parameters describe a codable model.
    pub fn validate(&self) -> Result<()> {
        if self.max_order > MAX_ORDER {
            return Err(PpmError::InvalidConfig(format!(
                "max_order {} exceeds {}",
                self.max_order, MAX_ORDER
            )));
        }
        if self.root_scale < ALPHABET_SIZE as u32 {
            return Err(PpmError::InvalidConfig(format!(
                "root_scale {} cannot hold all {} symbols",
                self.root_scale, ALPHABET_SIZE
            )));
        }
        if self.leaf_scale < 2 {
            return Err(PpmError::InvalidConfig(format!(
                "leaf_scale {} leaves no room for an escape",
                self.leaf_scale
            )));
        }
        for (name, scale) in [("root_scale", self.root_scale), ("leaf_scale", self.leaf_scale)] {
            if scale > MAX_SCALE {
                return Err(PpmError::InvalidConfig(format!(
                    "{} {} exceeds coder precision {}",
                    name, scale, MAX_SCALE
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ModelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scale_for(0), 1024);
        assert_eq!(config.scale_for(1), 256);
        assert_eq!(config.scale_for(2), 256);
    }

    #[test]
    fn test_rejects_small_root() {
        let config = ModelConfig::default().with_root_scale(255);
        assert!(matches!(config.validate(), Err(PpmError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_tiny_leaf() {
        let config = ModelConfig::default().with_leaf_scale(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_scale_beyond_precision() {
        let config = ModelConfig::default().with_leaf_scale(MAX_SCALE + 1);
        assert!(config.validate().is_err());
        let config = ModelConfig::default().with_root_scale(MAX_SCALE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_deep_order() {
        let config = ModelConfig::default().with_max_order(MAX_ORDER + 1);
        assert!(config.validate().is_err());
        let config = ModelConfig::default().with_max_order(0);
        assert!(config.validate().is_ok());
    }
}

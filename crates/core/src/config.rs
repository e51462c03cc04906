//! Solver configuration.

use serde::{Deserialize, Serialize};

/// Default memory budget for the memoization store (bytes).
const DEFAULT_MEMORY_LIMIT: usize = 256 * 1024 * 1024;

/// Default stack size for the solver thread (bytes).
///
/// The recursion depth of both the five-block and the L-block solvers is
/// bounded by the raster set cardinality, which can approach the pallet
/// length itself. A dedicated deep stack keeps large instances away from
/// the platform default.
const DEFAULT_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Configuration for a `pack` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum recursion depth for the five-block search (0 = unbounded).
    ///
    /// When the limit is hit, partitions are valued by their best known
    /// lower bound and the enclosing rectangle is flagged provisional.
    pub max_depth: u32,

    /// Memory budget in bytes for the memoization store.
    ///
    /// Tier selection starts at the dense four-dimensional layout and
    /// steps down until the estimated footprint fits the budget.
    pub memory_limit: usize,

    /// Stack size in bytes for the dedicated solver thread.
    ///
    /// 0 runs the solver on the caller's stack.
    pub stack_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 0,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum five-block recursion depth (0 = unbounded).
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the memoization memory budget in bytes.
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = bytes;
        self
    }

    /// Sets the solver thread stack size in bytes (0 = caller's stack).
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = bytes;
        self
    }

    /// The effective depth limit as a sentinel-based integer.
    pub(crate) fn depth_limit(&self) -> i32 {
        if self.max_depth == 0 {
            i32::MAX
        } else {
            self.max_depth as i32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.depth_limit(), i32::MAX);
        assert!(config.memory_limit > 0);
        assert!(config.stack_size > 0);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_max_depth(3)
            .with_memory_limit(1024)
            .with_stack_size(0);

        assert_eq!(config.max_depth, 3);
        assert_eq!(config.depth_limit(), 3);
        assert_eq!(config.memory_limit, 1024);
        assert_eq!(config.stack_size, 0);
    }
}

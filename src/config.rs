//! Build options shared by the initial build and every rebuild.

/// How the builder picks the vantage point of each subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VantageSelection {
    /// Always the first item of the subset.
    First,
    /// Uniformly at random.
    Random,
    /// Sample up to `candidates` items, and keep the one whose distances
    /// to a random sample of `sample` items have the largest variance.
    Spread { candidates: usize, sample: usize },
}

impl Default for VantageSelection {
    fn default() -> Self {
        VantageSelection::Random
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Subsets of at most this many items become a leaf bucket.
    pub leaf_threshold: usize,
    pub selection: VantageSelection,
    /// Seed for vantage selection. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            leaf_threshold: 1,
            selection: VantageSelection::default(),
            seed: None,
        }
    }
}

impl TreeConfig {
    pub fn with_leaf_threshold(mut self, leaf_threshold: usize) -> Self {
        self.leaf_threshold = leaf_threshold;
        self
    }

    pub fn with_selection(mut self, selection: VantageSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

//! Vantage-Point Trees are a data structure for fast
//! k-nearest-neighbor searches in any metric space.
//!
//! A [`VpTree`] owns its items and its node graph, and is either open or
//! closed. Closing releases the node graph; every operation except
//! [`VpTree::is_open`] and [`VpTree::close`] then fails with
//! [`Error::ClosedHandle`].
//!
//! The tree does no internal synchronization. Mutation takes `&mut self`,
//! so sharing across threads needs an external lock, as with any other
//! collection.

use std::fmt::{Debug, Display};
use std::mem;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::build::build;
use crate::config::TreeConfig;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::node::{Index, Node, ROOT};
use crate::search::{KNearest, Nearest, SearchStats, Within};

pub use num::Float;

pub trait Scalar: Float + Debug + Display {}
impl<T: Float + Debug + Display> Scalar for T {}

struct OpenTree<T, F> {
    index: Index<T, F>,
    rng: StdRng,
}

enum Handle<T, F> {
    Open(OpenTree<T, F>),
    Closed,
}

/// A vantage point tree over items of type `T`, under the metric `D`.
///
/// `D` must be a proper metric: non-negative, symmetric, zero only on
/// identical items, and obeying the triangle inequality. It must not
/// panic, return NaN, or call back into the tree. None of this is
/// checked; breaking it gives wrong answers, not errors.
pub struct VpTree<T, F, D> {
    handle: Handle<T, F>,
    dist: D,
    config: TreeConfig,
}

impl<T, F, D> VpTree<T, F, D>
where
    F: Scalar,
    D: Fn(&T, &T) -> F,
{
    /// Build a balanced tree from `items` with the default configuration.
    pub fn new<I: IntoIterator<Item = T>>(items: I, dist: D) -> Self {
        Self::with_config(items, dist, TreeConfig::default())
    }

    /// Build a balanced tree from `items`.
    pub fn with_config<I: IntoIterator<Item = T>>(items: I, dist: D, config: TreeConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let index = build(items.into_iter().collect(), &dist, &config, &mut rng);
        VpTree {
            handle: Handle::Open(OpenTree { index, rng }),
            dist,
            config,
        }
    }

    fn open(&self) -> Result<&OpenTree<T, F>> {
        match &self.handle {
            Handle::Open(tree) => Ok(tree),
            Handle::Closed => Err(Error::ClosedHandle),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.handle, Handle::Open(_))
    }

    /// Release the node graph and the items. Closing twice is a no-op.
    pub fn close(&mut self) {
        if let Handle::Open(tree) = mem::replace(&mut self.handle, Handle::Closed) {
            debug!(items = tree.index.len, "closing vantage point tree");
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The number of items in this tree.
    pub fn size(&self) -> Result<usize> {
        Ok(self.open()?.index.len)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// Every indexed item, in no particular order.
    pub fn iter(&self) -> Result<impl Iterator<Item = &T>> {
        Ok(self.open()?.index.items())
    }

    /// Tear the tree down and return its items.
    pub fn into_items(self) -> Result<Vec<T>> {
        match self.handle {
            Handle::Open(tree) => Ok(tree.index.into_items()),
            Handle::Closed => Err(Error::ClosedHandle),
        }
    }

    /// Find the nearest neighbor. `None` only for an empty tree.
    ///
    /// When several items are equally near, any one of them may be
    /// returned; the distance is exact.
    pub fn nn(&self, query: &T) -> Result<Option<Entry<&T, F>>> {
        let tree = self.open()?;
        let mut best = Nearest::new();
        tree.index
            .search(query, &self.dist, &mut best, &mut SearchStats::default());
        Ok(best.into_entry())
    }

    /// Find the `k` nearest neighbors, ascending by distance.
    ///
    /// Returns `min(k, size)` entries.
    pub fn knn(&self, query: &T, k: usize) -> Result<Vec<Entry<&T, F>>> {
        self.knn_with_stats(query, k).map(|(found, _)| found)
    }

    /// As [`knn`](Self::knn), also reporting how much of the tree was
    /// traversed.
    pub fn knn_with_stats(&self, query: &T, k: usize) -> Result<(Vec<Entry<&T, F>>, SearchStats)> {
        let tree = self.open()?;
        let mut stats = SearchStats::default();
        if k == 0 {
            return Ok((Vec::new(), stats));
        }
        let mut nearest = KNearest::new(k);
        tree.index.search(query, &self.dist, &mut nearest, &mut stats);
        Ok((nearest.into_sorted(), stats))
    }

    /// Find every item `p` with `d(query, p) <= max_dist`, in no
    /// particular order.
    pub fn all_within(&self, query: &T, max_dist: F) -> Result<Vec<Entry<&T, F>>> {
        let tree = self.open()?;
        if max_dist.is_nan() || max_dist < F::zero() {
            return Err(Error::InvalidArgument(format!(
                "max_dist must be non-negative, got {}",
                max_dist
            )));
        }
        let mut within = Within::new(max_dist);
        tree.index
            .search(query, &self.dist, &mut within, &mut SearchStats::default());
        Ok(within.into_hits())
    }

    /// Insert one item without rebalancing.
    ///
    /// The item descends by the same inside/outside test used when
    /// building and is appended to the leaf it lands in. Leaves are never
    /// split here, so many adds along one path grow a single bucket and
    /// queries through it degrade toward a linear scan. Use
    /// [`rebuild`](Self::rebuild) or [`add_rebuild`](Self::add_rebuild)
    /// to restore balance.
    pub fn add(&mut self, item: T) -> Result<()> {
        let tree = match &mut self.handle {
            Handle::Open(tree) => tree,
            Handle::Closed => return Err(Error::ClosedHandle),
        };

        let mut id = ROOT;
        while let Node::Internal { vantage, radius, inside, outside } = &tree.index.nodes[id] {
            id = if (self.dist)(vantage, &item) <= *radius {
                *inside
            } else {
                *outside
            };
        }
        if let Node::Leaf { bucket } = &mut tree.index.nodes[id] {
            bucket.push(item);
            trace!(leaf = id, bucket = bucket.len(), "added item without rebalancing");
        }
        tree.index.len += 1;
        Ok(())
    }

    /// Rebuild the whole tree from its current items.
    pub fn rebuild(&mut self) -> Result<()> {
        self.add_rebuild(Vec::new())
    }

    /// Rebuild the whole tree from its current items plus `items`, in a
    /// single pass.
    pub fn add_rebuild<I: IntoIterator<Item = T>>(&mut self, items: I) -> Result<()> {
        let tree = match &mut self.handle {
            Handle::Open(tree) => tree,
            Handle::Closed => return Err(Error::ClosedHandle),
        };

        let index = mem::replace(&mut tree.index, Index::empty());
        let before = index.len;
        let mut all = index.into_items();
        all.extend(items);

        tree.index = build(all, &self.dist, &self.config, &mut tree.rng);
        debug!(before, after = tree.index.len, "rebuilt vantage point tree");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::VpTree;
    use crate::config::TreeConfig;
    use crate::error::Error;

    fn dist(a: &i64, b: &i64) -> f64 {
        (a - b).abs() as f64
    }

    #[test]
    fn closed_tree_rejects_everything() {
        let mut tree = VpTree::new(vec![1i64, 2, 3], dist);
        assert!(tree.is_open());
        tree.close();
        assert!(!tree.is_open());
        tree.close();
        assert!(!tree.is_open());

        assert_eq!(tree.size(), Err(Error::ClosedHandle));
        assert!(matches!(tree.nn(&1), Err(Error::ClosedHandle)));
        assert!(matches!(tree.knn(&1, 2), Err(Error::ClosedHandle)));
        assert!(matches!(tree.all_within(&1, 1.0), Err(Error::ClosedHandle)));
        assert!(tree.iter().is_err());
        assert_eq!(tree.add(4), Err(Error::ClosedHandle));
        assert_eq!(tree.rebuild(), Err(Error::ClosedHandle));
        assert_eq!(tree.add_rebuild(vec![5, 6]), Err(Error::ClosedHandle));
        assert_eq!(tree.into_items(), Err(Error::ClosedHandle));
    }

    #[test]
    fn closed_check_precedes_argument_check() {
        let mut tree = VpTree::new(vec![1i64], dist);
        tree.close();
        assert!(matches!(tree.all_within(&1, -1.0), Err(Error::ClosedHandle)));
    }

    #[test]
    fn negative_radius_is_invalid() {
        let tree = VpTree::new(vec![1i64, 2], dist);
        assert!(matches!(tree.all_within(&1, -0.5), Err(Error::InvalidArgument(_))));
        assert!(matches!(tree.all_within(&1, f64::NAN), Err(Error::InvalidArgument(_))));
        assert_eq!(tree.size(), Ok(2));
    }

    #[test]
    fn add_keeps_partition_and_count() {
        let config = TreeConfig::default().with_seed(3);
        let mut tree = VpTree::with_config((0..32i64).map(|x| x * 10), dist, config);
        for x in 0..100 {
            tree.add(x * 3 + 1).unwrap();
        }
        assert_eq!(tree.size(), Ok(132));
        assert_eq!(tree.iter().unwrap().count(), 132);

        let before: Vec<i64> = {
            let mut v: Vec<i64> = tree.iter().unwrap().copied().collect();
            v.sort();
            v
        };
        tree.rebuild().unwrap();
        let mut after: Vec<i64> = tree.iter().unwrap().copied().collect();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn into_items_returns_everything() {
        let tree = VpTree::new(vec![5i64, 3, 9], dist);
        let mut items = tree.into_items().unwrap();
        items.sort();
        assert_eq!(items, vec![3, 5, 9]);
    }

    #[test]
    fn zero_k_is_empty() {
        let tree = VpTree::new(vec![5i64, 3, 9], dist);
        let (found, stats) = tree.knn_with_stats(&4, 0).unwrap();
        assert!(found.is_empty());
        assert_eq!(stats.nodes_visited, 0);
    }
}

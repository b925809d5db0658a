//! Construction of the node graph from a flat item set.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::Rng;
use tracing::debug;

use crate::config::{TreeConfig, VantageSelection};
use crate::median::split_at_median;
use crate::node::{Index, Node, NodeId, ROOT};
use crate::vptree::Scalar;

/// An item waiting to be placed, with its input position and its
/// distance to the vantage point of the subset it currently sits in.
struct TaggedItem<T, F> {
    item: T,
    seq: usize,
    dist: F,
}

fn variance<F: Scalar>(ds: &[F]) -> F {
    let n = match F::from(ds.len()) {
        Some(n) if !ds.is_empty() => n,
        _ => return F::zero(),
    };
    let mean = ds.iter().fold(F::zero(), |acc, &d| acc + d) / n;
    ds.iter().fold(F::zero(), |acc, &d| acc + (d - mean) * (d - mean)) / n
}

/// Pick the index of the vantage point for `subset`, which is never empty.
fn select_vantage_point<T, F, D>(
    subset: &[TaggedItem<T, F>],
    dist: &D,
    selection: VantageSelection,
    rng: &mut StdRng,
) -> usize
where
    F: Scalar,
    D: Fn(&T, &T) -> F,
{
    let n = subset.len();
    match selection {
        VantageSelection::First => 0,
        VantageSelection::Random => rng.gen_range(0..n),
        VantageSelection::Spread { candidates, sample: probes } => {
            let candidates = sample(rng, n, candidates.clamp(1, n));
            let mut best = (F::neg_infinity(), candidates.index(0));
            let mut ds = Vec::with_capacity(probes.clamp(1, n));
            for c in candidates.iter() {
                ds.clear();
                for j in sample(rng, n, probes.clamp(1, n)).iter() {
                    ds.push(dist(&subset[c].item, &subset[j].item));
                }
                let spread = variance(&ds);
                if spread > best.0 {
                    best = (spread, c);
                }
            }
            best.1
        }
    }
}

/// Partition `items` recursively into a vantage point tree.
///
/// Each subset larger than the leaf threshold loses its vantage point,
/// and the rest is split at the median distance to it: `⌈(n-1)/2⌉`
/// items inside, plus any further ties at the radius. Work is kept on
/// an explicit stack, so a degenerate metric (many equal distances)
/// costs time but not call stack depth.
pub(crate) fn build<T, F, D>(
    items: Vec<T>,
    dist: &D,
    config: &TreeConfig,
    rng: &mut StdRng,
) -> Index<T, F>
where
    F: Scalar,
    D: Fn(&T, &T) -> F,
{
    let mut index = Index::empty();
    index.len = items.len();

    let tagged: Vec<TaggedItem<T, F>> = items
        .into_iter()
        .enumerate()
        .map(|(seq, item)| TaggedItem { item, seq, dist: F::zero() })
        .collect();

    let mut work: Vec<(NodeId, Vec<TaggedItem<T, F>>)> = vec![(ROOT, tagged)];
    while let Some((id, mut subset)) = work.pop() {
        if subset.len() <= config.leaf_threshold {
            let bucket = subset.into_iter().map(|ti| ti.item).collect();
            index.nodes[id] = Node::Leaf { bucket };
            continue;
        }

        let sel = select_vantage_point(&subset, dist, config.selection, rng);
        let vantage = subset.swap_remove(sel).item;

        for ti in subset.iter_mut() {
            ti.dist = dist(&vantage, &ti.item);
        }
        let (split, radius) =
            split_at_median(&mut subset, |ti| (ti.dist, ti.seq)).unwrap_or((0, F::zero()));
        let outside_items = subset.split_off(split);

        let inside = index.nodes.len();
        let outside = inside + 1;
        index.nodes.push(Node::empty_leaf());
        index.nodes.push(Node::empty_leaf());
        index.nodes[id] = Node::Internal { vantage, radius, inside, outside };

        work.push((outside, outside_items));
        work.push((inside, subset));
    }

    debug!(items = index.len, nodes = index.nodes.len(), "built vantage point tree");
    index
}

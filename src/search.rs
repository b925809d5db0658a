//! Branch-and-bound queries over the node graph.
//!
//! All three queries share one traversal. At an internal node with
//! vantage distance `δ` and radius `μ`, the child on the query's side of
//! the ball is visited first; the other is visited only if its lower
//! bound on distance (`δ - μ` for inside, `μ - δ` for outside) does not
//! exceed the candidate set's current bound, checked after the near
//! side is done.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::entry::Entry;
use crate::node::{Index, Node, NodeId, ROOT};
use crate::vptree::Scalar;

/// Work counters for one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_visited: usize,
    pub distance_evaluations: usize,
}

/// Accumulates results during a traversal.
pub(crate) trait Candidates<'a, T, F> {
    /// Distance beyond which nothing more can be accepted.
    fn bound(&self) -> F;

    fn consider(&mut self, item: &'a T, distance: F);
}

/// Single best candidate. Ties keep the first discovered.
pub(crate) struct Nearest<'a, T, F> {
    best: Option<Entry<&'a T, F>>,
}

impl<'a, T, F> Nearest<'a, T, F> {
    pub(crate) fn new() -> Self {
        Nearest { best: None }
    }

    pub(crate) fn into_entry(self) -> Option<Entry<&'a T, F>> {
        self.best
    }
}

impl<'a, T, F: Scalar> Candidates<'a, T, F> for Nearest<'a, T, F> {
    fn bound(&self) -> F {
        self.best.as_ref().map_or(F::infinity(), |e| e.distance)
    }

    fn consider(&mut self, item: &'a T, distance: F) {
        if distance < self.bound() {
            self.best = Some(Entry::new(item, distance));
        }
    }
}

struct HeapElem<'a, F, T: 'a> {
    dist: F,
    seq: usize,
    item: &'a T,
}

impl<'a, F: Scalar, T: 'a> PartialOrd for HeapElem<'a, F, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, F: Scalar, T: 'a> PartialEq for HeapElem<'a, F, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<'a, F: Scalar, T: 'a> Eq for HeapElem<'a, F, T> {}

impl<'a, F: Scalar, T: 'a> Ord for HeapElem<'a, F, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .partial_cmp(&other.dist)
            .unwrap_or(Ordering::Equal)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Bounded max-heap holding the `k` closest candidates seen so far.
pub(crate) struct KNearest<'a, T, F> {
    k: usize,
    seen: usize,
    heap: BinaryHeap<HeapElem<'a, F, T>>,
}

impl<'a, T, F: Scalar> KNearest<'a, T, F> {
    pub(crate) fn new(k: usize) -> Self {
        KNearest {
            k,
            seen: 0,
            heap: BinaryHeap::with_capacity(k),
        }
    }

    /// Ascending by distance, ties in discovery order.
    pub(crate) fn into_sorted(self) -> Vec<Entry<&'a T, F>> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|he| Entry::new(he.item, he.dist))
            .collect()
    }
}

impl<'a, T, F: Scalar> Candidates<'a, T, F> for KNearest<'a, T, F> {
    fn bound(&self) -> F {
        match self.heap.peek() {
            Some(worst) if self.heap.len() >= self.k => worst.dist,
            _ => F::infinity(),
        }
    }

    fn consider(&mut self, item: &'a T, distance: F) {
        if self.k == 0 {
            return;
        }
        let elem = HeapElem { dist: distance, seq: self.seen, item };
        self.seen += 1;

        if self.heap.len() < self.k {
            self.heap.push(elem);
        } else if distance < self.bound() {
            self.heap.pop();
            self.heap.push(elem);
        }
    }
}

/// Everything within a fixed radius.
pub(crate) struct Within<'a, T, F> {
    max_dist: F,
    hits: Vec<Entry<&'a T, F>>,
}

impl<'a, T, F> Within<'a, T, F> {
    pub(crate) fn new(max_dist: F) -> Self {
        Within { max_dist, hits: Vec::new() }
    }

    pub(crate) fn into_hits(self) -> Vec<Entry<&'a T, F>> {
        self.hits
    }
}

impl<'a, T, F: Scalar> Candidates<'a, T, F> for Within<'a, T, F> {
    fn bound(&self) -> F {
        self.max_dist
    }

    fn consider(&mut self, item: &'a T, distance: F) {
        if distance <= self.max_dist {
            self.hits.push(Entry::new(item, distance));
        }
    }
}

enum Visit<F> {
    Node(NodeId),
    /// Far child of an already visited node, with its distance lower bound.
    Far(NodeId, F),
}

impl<T, F: Scalar> Index<T, F> {
    /// Walk the tree, offering every item that might beat `candidates`'
    /// bound to it.
    pub(crate) fn search<'a, D, C>(
        &'a self,
        query: &T,
        dist: &D,
        candidates: &mut C,
        stats: &mut SearchStats,
    ) where
        D: Fn(&T, &T) -> F,
        C: Candidates<'a, T, F>,
    {
        let mut stack = vec![Visit::Node(ROOT)];
        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::Node(id) => id,
                Visit::Far(id, lower) => {
                    if lower > candidates.bound() {
                        continue;
                    }
                    id
                }
            };
            stats.nodes_visited += 1;

            match &self.nodes[id] {
                Node::Leaf { bucket } => {
                    for item in bucket {
                        stats.distance_evaluations += 1;
                        candidates.consider(item, dist(item, query));
                    }
                }
                Node::Internal { vantage, radius, inside, outside } => {
                    stats.distance_evaluations += 1;
                    let delta = dist(vantage, query);
                    candidates.consider(vantage, delta);

                    // Far side goes under the near side so it is only
                    // checked once the near subtree has tightened the bound.
                    if delta <= *radius {
                        stack.push(Visit::Far(*outside, *radius - delta));
                        stack.push(Visit::Node(*inside));
                    } else {
                        stack.push(Visit::Far(*inside, delta - *radius));
                        stack.push(Visit::Node(*outside));
                    }
                }
            }
        }
    }
}

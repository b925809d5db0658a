//! Node graph of a tree, stored in an arena.
//!
//! The root always lives at [`ROOT`]. Children are referenced by index,
//! so neither traversal nor drop recurses over the depth of the tree.

pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

pub(crate) enum Node<T, F> {
    /// Unpartitioned bucket of items.
    Leaf { bucket: Vec<T> },
    /// `inside` holds exactly the items of this subset with
    /// `d(vantage, p) <= radius`, `outside` the rest. The vantage point
    /// is in neither.
    Internal {
        vantage: T,
        radius: F,
        inside: NodeId,
        outside: NodeId,
    },
}

impl<T, F> Node<T, F> {
    pub(crate) fn empty_leaf() -> Self {
        Node::Leaf { bucket: Vec::new() }
    }
}

/// The structural memory of an open tree.
pub(crate) struct Index<T, F> {
    pub(crate) nodes: Vec<Node<T, F>>,
    /// Number of items reachable from the root.
    pub(crate) len: usize,
}

impl<T, F> Index<T, F> {
    pub(crate) fn empty() -> Self {
        Index {
            nodes: vec![Node::empty_leaf()],
            len: 0,
        }
    }

    /// Every indexed item, vantage points included, in arena order.
    pub(crate) fn items(&self) -> impl Iterator<Item = &T> {
        self.nodes.iter().flat_map(|node| {
            let (vantage, bucket): (Option<&T>, &[T]) = match node {
                Node::Leaf { bucket } => (None, bucket),
                Node::Internal { vantage, .. } => (Some(vantage), &[]),
            };
            vantage.into_iter().chain(bucket)
        })
    }

    /// Tear the node graph down, handing back its items.
    pub(crate) fn into_items(self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.len);
        for node in self.nodes {
            match node {
                Node::Leaf { bucket } => items.extend(bucket),
                Node::Internal { vantage, .. } => items.push(vantage),
            }
        }
        items
    }
}

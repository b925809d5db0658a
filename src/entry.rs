use std::fmt;

use num::Float;

/// A search result: an item together with its distance to the query.
#[derive(Debug, Clone, Copy)]
pub struct Entry<T, F> {
    pub item: T,
    pub distance: F,
}

impl<T, F> Entry<T, F> {
    pub fn new(item: T, distance: F) -> Self {
        Entry { item, distance }
    }
}

/// Equal iff the items are equal and the distances are bit-equal.
impl<T: PartialEq, F: Float> PartialEq for Entry<T, F> {
    fn eq(&self, other: &Self) -> bool {
        self.item == other.item && self.distance.integer_decode() == other.distance.integer_decode()
    }
}

impl<T: fmt::Display, F: fmt::Display> fmt::Display for Entry<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.item, self.distance)
    }
}

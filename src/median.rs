use std::cmp::Ordering;

use num::Float;
use order_stat::kth_by;

/// Order by distance, then by input sequence number.
///
/// Distances are assumed comparable; a NaN breaks the metric contract
/// and is treated as equal to anything.
fn by_key<F: Float>(a: (F, usize), b: (F, usize)) -> Ordering {
    a.0.partial_cmp(&b.0)
        .unwrap_or(Ordering::Equal)
        .then(a.1.cmp(&b.1))
}

/// Partition `entries` around the median distance.
///
/// `key` yields each entry's distance to the vantage point along with
/// its input sequence number, which breaks ties so the choice of median
/// is stable. The radius is the distance of the `⌈n/2⌉`-th smallest
/// entry. On return, `entries[..split]` holds exactly the entries with
/// distance `<= radius` (every tie at the radius included) and
/// `entries[split..]` the rest. Returns `None` for an empty slice.
///
/// ```
/// use vpindex::median::split_at_median;
/// let mut v = vec![(4.0, 0), (1.0, 1), (3.0, 2), (2.0, 3)];
/// let (split, radius) = split_at_median(&mut v, |e| *e).unwrap();
/// assert_eq!(split, 2);
/// assert_eq!(radius, 2.0);
/// assert!(v[..split].iter().all(|e| e.0 <= radius));
/// assert!(v[split..].iter().all(|e| e.0 > radius));
/// ```
pub fn split_at_median<E, F, K>(entries: &mut [E], key: K) -> Option<(usize, F)>
where
    F: Float,
    K: Fn(&E) -> (F, usize),
{
    let n = entries.len();
    if n == 0 {
        return None;
    }

    let k = (n + 1) / 2 - 1;
    let radius = key(kth_by(entries, k, |a, b| by_key(key(a), key(b)))).0;

    let mut split = 0;
    for i in 0..n {
        if key(&entries[i]).0 <= radius {
            entries.swap(i, split);
            split += 1;
        }
    }
    Some((split, radius))
}

//! Vantage-point tree index over an arbitrary metric space.
//!
//! Items are only ever compared through a caller supplied distance
//! function, which must be a proper metric (symmetric, `d(x, x) == 0`,
//! triangle inequality). Nothing about coordinates is assumed.
//!
//! ```
//! use vpindex::VpTree;
//!
//! let tree = VpTree::new(vec![0i64, 10, 20, 30], |a: &i64, b: &i64| (a - b).abs() as f64);
//! let nearest = tree.nn(&7).unwrap().unwrap();
//! assert_eq!(*nearest.item, 10);
//! assert_eq!(nearest.distance, 3.0);
//! ```
mod build;
pub mod config;
pub mod entry;
pub mod error;
pub mod median;
mod node;
mod search;
pub mod vptree;

pub use config::{TreeConfig, VantageSelection};
pub use entry::Entry;
pub use error::{Error, Result};
pub use search::SearchStats;
pub use vptree::{Scalar, VpTree};

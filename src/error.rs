use thiserror::Error;

/// Failures reported at the call boundary of a [`VpTree`](crate::VpTree).
///
/// Metric contract violations (a distance function returning NaN or a
/// negative value, or calling back into the tree) are not represented
/// here: they are undefined behaviour and never checked for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The tree was closed and its memory released.
    #[error("tree handle is closed")]
    ClosedHandle,

    /// An argument was rejected before any traversal began.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;

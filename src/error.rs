use thiserror::Error;

/// Errors returned by the trees in this crate.
///
/// Looking up a key that isn't present is not an error: `search` reports it
/// as a miss and `delete` as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The operation needs at least one key but the tree is empty.
    #[error("tree is empty")]
    Empty,

    /// A B-Tree was constructed with a minimum degree below 2, or one so large
    /// that its node capacity overflows.
    #[error("invalid B-Tree order: {0} (must be >= 2 and <= usize::MAX / 2)")]
    InvalidOrder(usize),
}

/// Shorthand for results carrying a [`TreeError`].
pub type TreeResult<T> = Result<T, TreeError>;

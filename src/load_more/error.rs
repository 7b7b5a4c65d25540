use thiserror::Error;

/// Errors raised while evaluating a scroll tick.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadMoreError {
    /// The host reported a layout the evaluator cannot read positions from.
    /// This is an integration mistake, not something to retry.
    #[error("unsupported layout `{name}`; valid layouts are linear, grid and staggered")]
    UnsupportedLayout { name: String },
}

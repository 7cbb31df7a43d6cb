use thiserror::Error;

/// Signals a rejected query. All are recoverable: the session reports them and keeps its
/// previously committed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("no input")]
    InputEmpty,
    #[error("invalid input")]
    InputInvalid,
    #[error("not found")]
    NotFound,
}

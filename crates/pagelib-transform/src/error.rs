//! Transform errors

use pagelib_dom::{DomError, NodeId};

/// Result type for transform passes
pub type TransformResult<T> = Result<T, TransformError>;

/// Transform errors
///
/// Returned when the document does not have the shape a pass expects. The
/// pass stops where it failed; earlier mutations stay in place.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error(transparent)]
    Dom(#[from] DomError),

    /// Node to be wrapped or toggled has no parent
    #[error("node {0} has no parent")]
    MissingParent(NodeId),

    /// Container lacks the header/table/footer children
    #[error("collapse container {0} is malformed")]
    MalformedContainer(NodeId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

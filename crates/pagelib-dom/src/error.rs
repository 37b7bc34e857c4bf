//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node id does not refer to a node in this tree
    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Operation needs an element but got another node kind
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Insertion would create a cycle or put a node under a leaf
    #[error("hierarchy request error inserting {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// Reference node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaxonomyError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    /// The node factory refused to build a node for a path segment
    #[error("Invalid taxonomy node type: {0}")]
    InvalidNodeType(String),

    #[error("Classification path is empty")]
    EmptyPath,
}

impl TaxonomyError {
    /// Create an invalid node type error
    pub fn invalid_node_type(msg: impl Into<String>) -> Self {
        Self::InvalidNodeType(msg.into())
    }
}

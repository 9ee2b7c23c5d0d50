use midiscope_taxonomy::TaxonomyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Range bounds that can never match
    #[error("Invalid tick range: {from} > {to}")]
    InvalidRange { from: u64, to: u64 },

    #[error("Invalid channel: {0}")]
    InvalidChannel(String),

    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),
}

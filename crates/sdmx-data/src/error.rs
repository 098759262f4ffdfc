use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset already binds the other structure kind.
    #[error("invalid dataset state: {0}")]
    InvalidState(String),
    /// A dataset-level attribute required by the structure is absent.
    #[error("missing attribute {0} at dataset level (attached_attributes)")]
    MissingAttribute(String),
    /// A key that is not a dataset-level attribute of the structure.
    #[error("{0} is not an attribute at dataset level for the bound structure")]
    UnknownAttribute(String),
    /// Not a dimension of the bound structure.
    #[error("{0} is not a dimension of the bound structure")]
    UnknownDimension(String),
    #[error("table must not be empty when dataset-level attribute columns are expected")]
    EmptyTable,
    #[error("table error: {0}")]
    Table(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

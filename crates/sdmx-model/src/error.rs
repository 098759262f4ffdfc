use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("facet {facet_type} carries a non-numeric value: {value:?}")]
    InvalidFacetValue {
        facet_type: &'static str,
        value: String,
    },
    #[error("measure descriptor must contain at least one component")]
    EmptyMeasureDescriptor,
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

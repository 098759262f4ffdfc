use thiserror::Error;

use sdmx_model::ModelError;

/// Configuration errors raised by the engine.
///
/// Data-quality problems never raise; they become findings. Only a broken
/// structure definition (a facet whose value cannot be interpreted) aborts
/// the affected validation call.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Config(#[from] ModelError),
    #[error("facet pattern is not a valid regular expression: {pattern:?}")]
    InvalidPattern { pattern: String },
}

pub type Result<T> = std::result::Result<T, ValidateError>;

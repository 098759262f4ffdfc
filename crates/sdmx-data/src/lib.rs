pub mod attributes;
pub mod dataset;
pub mod error;

pub use attributes::{ALL_DIMENSIONS, Action, DatasetAttributes};
pub use dataset::{Dataset, StructureBinding, extract_attached_attributes};
pub use error::{DatasetError, Result};

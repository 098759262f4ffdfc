pub mod codelist;
pub mod component;
pub mod constraint;
pub mod error;
pub mod facet;
pub mod finding;
pub mod structure;

pub use codelist::{Code, Codelist};
pub use component::{
    AttributeDescriptor, AttributeRelationship, Component, ComponentList, Concept,
    DEFAULT_MEASURE_ID, DimensionDescriptor, MeasureDescriptor, Representation, UsageStatus,
    ValueType,
};
pub use constraint::{ConstraintRole, ContentConstraint, CubeRegion, SeriesKey};
pub use error::{ModelError, Result};
pub use facet::{Facet, FacetType};
pub use finding::{
    CheckCode, ComponentKind, ErrorLevel, Finding, RowRecord, critical_count, warning_count,
};
pub use structure::{DataStructureDefinition, DataflowDefinition};

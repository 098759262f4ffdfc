//! Content constraints attached to a data structure definition.
//!
//! A constraint narrows the value space of a structure: cube regions restrict
//! individual components to member value sets, series keys enumerate the
//! dimension sub-tuples a dataset may contain.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintRole {
    /// Keys/regions the data is allowed to contain.
    Allowed,
    /// Keys/regions actually present in some data source.
    Actual,
}

/// A slice of the component value space: component id → selected values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CubeRegion {
    pub members: BTreeMap<String, BTreeSet<String>>,
}

impl CubeRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, component: impl Into<String>, values: impl IntoIterator<Item = String>) {
        self.members
            .entry(component.into())
            .or_default()
            .extend(values);
    }
}

/// One allowed dimension sub-tuple. Components absent from the key act as
/// wildcards when rows are matched against it.
pub type SeriesKey = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConstraint {
    pub id: String,
    pub role: ConstraintRole,
    pub cube_regions: Vec<CubeRegion>,
    pub series_keys: Vec<SeriesKey>,
}

impl ContentConstraint {
    pub fn new(id: impl Into<String>, role: ConstraintRole) -> Self {
        Self {
            id: id.into(),
            role,
            cube_regions: Vec::new(),
            series_keys: Vec::new(),
        }
    }
}

//! An organised collection of data bound to its structural metadata.
//!
//! A dataset binds exactly one of a data structure definition or a dataflow
//! (the binding enum makes both-or-neither unrepresentable), carries the
//! fixed dataset-level attribute record, the attached attribute values
//! required by the structure, and the observation table itself.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::debug;

use sdmx_common::any_to_string;
use sdmx_model::{DEFAULT_MEASURE_ID, DataStructureDefinition, DataflowDefinition};

use crate::attributes::{ALL_DIMENSIONS, DatasetAttributes};
use crate::error::{DatasetError, Result};

/// The structural metadata a dataset is governed by: a structure directly,
/// or a dataflow wrapping one.
#[derive(Debug, Clone, PartialEq)]
pub enum StructureBinding {
    Structure(DataStructureDefinition),
    Dataflow(DataflowDefinition),
}

impl StructureBinding {
    /// The governing data structure definition.
    pub fn structure(&self) -> &DataStructureDefinition {
        match self {
            StructureBinding::Structure(dsd) => dsd,
            StructureBinding::Dataflow(flow) => flow.structure(),
        }
    }

    /// Identity of the bound artefact, `agency:id(version)`.
    pub fn unique_id(&self) -> String {
        match self {
            StructureBinding::Structure(dsd) => dsd.unique_id(),
            StructureBinding::Dataflow(flow) => flow.unique_id(),
        }
    }
}

/// Takes the dataset-level attribute values carried as table columns.
///
/// For every code present as a column, row 0's value is stringified into the
/// returned map and the column is dropped from the returned table. The table
/// must not be empty when `codes` is non-empty, since row 0 is the carrier.
pub fn extract_attached_attributes(
    df: &DataFrame,
    codes: &[String],
) -> Result<(BTreeMap<String, String>, DataFrame)> {
    let mut attached = BTreeMap::new();
    if codes.is_empty() {
        return Ok((attached, df.clone()));
    }
    if df.height() == 0 {
        return Err(DatasetError::EmptyTable);
    }

    let mut remaining = df.clone();
    for code in codes {
        let Ok(column) = remaining.column(code.as_str()) else {
            continue;
        };
        let value = any_to_string(column.get(0)?);
        attached.insert(code.clone(), value);
        remaining = remaining.drop(code.as_str())?;
    }
    Ok((attached, remaining))
}

/// An organised collection of data.
#[derive(Debug, Clone)]
pub struct Dataset {
    binding: StructureBinding,
    dataset_attributes: DatasetAttributes,
    attached_attributes: BTreeMap<String, String>,
    data: DataFrame,
}

impl Dataset {
    /// Creates a dataset from its binding, the attached attribute values and
    /// an optional table.
    ///
    /// Dataset-level attribute columns in the table are extracted before the
    /// attached map is reconciled against the structure, so a value may
    /// arrive either way. Reconciliation fails on the first required code
    /// with no value and silently drops keys the structure does not declare.
    pub fn new(
        binding: StructureBinding,
        attached_attributes: BTreeMap<String, String>,
        data: Option<DataFrame>,
    ) -> Result<Self> {
        let mut dataset = Self {
            dataset_attributes: DatasetAttributes::with_defaults(
                binding.structure().id.clone(),
            ),
            binding,
            attached_attributes,
            data: DataFrame::empty(),
        };
        if let Some(df) = data {
            dataset.set_data(df)?;
        }
        dataset.reconcile_attached_attributes()?;
        Ok(dataset)
    }

    /// Creates an empty dataset governed directly by a structure.
    pub fn from_structure(structure: DataStructureDefinition) -> Result<Self> {
        Self::new(StructureBinding::Structure(structure), BTreeMap::new(), None)
    }

    /// Creates an empty dataset governed by a dataflow.
    pub fn from_dataflow(dataflow: DataflowDefinition) -> Result<Self> {
        Self::new(StructureBinding::Dataflow(dataflow), BTreeMap::new(), None)
    }

    pub fn binding(&self) -> &StructureBinding {
        &self.binding
    }

    /// The governing data structure definition.
    pub fn structure(&self) -> &DataStructureDefinition {
        self.binding.structure()
    }

    /// The bound dataflow, when the dataset is dataflow-governed.
    pub fn dataflow(&self) -> Option<&DataflowDefinition> {
        match &self.binding {
            StructureBinding::Dataflow(flow) => Some(flow),
            StructureBinding::Structure(_) => None,
        }
    }

    /// Identity of the bound artefact, `agency:id(version)`.
    pub fn unique_id(&self) -> String {
        self.binding.unique_id()
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn dataset_attributes(&self) -> &DatasetAttributes {
        &self.dataset_attributes
    }

    /// Rebuilds the dataset-level attribute record from a string map.
    /// Unknown keys are dropped silently; the setId default follows the
    /// governing structure.
    pub fn set_dataset_attributes(&mut self, values: &BTreeMap<String, String>) {
        let set_id = self.structure().id.clone();
        self.dataset_attributes = DatasetAttributes::from_map(values, &set_id);
    }

    pub fn attached_attributes(&self) -> &BTreeMap<String, String> {
        &self.attached_attributes
    }

    /// Replaces the attached attribute values. The key set must equal the
    /// structure's dataset-level attribute codes exactly.
    pub fn set_attached_attributes(&mut self, values: BTreeMap<String, String>) -> Result<()> {
        let codes = self.structure().dataset_attribute_codes();
        for key in values.keys() {
            if !codes.iter().any(|code| code == key) {
                return Err(DatasetError::UnknownAttribute(key.clone()));
            }
        }
        for code in &codes {
            if !values.contains_key(code) {
                return Err(DatasetError::MissingAttribute(code.clone()));
            }
        }
        self.attached_attributes = values;
        Ok(())
    }

    /// Rebinds the dataset to a structure. Fails when a dataflow is bound;
    /// otherwise reconciles attached attributes and renames a literal
    /// `OBS_VALUE` column to the new structure's measure code.
    pub fn set_structure(&mut self, structure: DataStructureDefinition) -> Result<()> {
        if matches!(self.binding, StructureBinding::Dataflow(_)) {
            return Err(DatasetError::InvalidState(
                "dataflow is already set; a dataset binds a structure or a dataflow, not both"
                    .to_string(),
            ));
        }
        self.binding = StructureBinding::Structure(structure);
        self.rebind()
    }

    /// Rebinds the dataset to a dataflow. Fails when a structure is bound.
    pub fn set_dataflow(&mut self, dataflow: DataflowDefinition) -> Result<()> {
        if matches!(self.binding, StructureBinding::Structure(_)) {
            return Err(DatasetError::InvalidState(
                "structure is already set; a dataset binds a structure or a dataflow, not both"
                    .to_string(),
            ));
        }
        self.binding = StructureBinding::Dataflow(dataflow);
        self.rebind()
    }

    /// Assigns the observation table, extracting dataset-level attribute
    /// columns into the attached map first.
    pub fn set_data(&mut self, data: DataFrame) -> Result<()> {
        let codes = self.structure().dataset_attribute_codes();
        let (extracted, remaining) = extract_attached_attributes(&data, &codes)?;
        for (key, value) in extracted {
            debug!(attribute = %key, "extracted dataset-level attribute from table");
            self.attached_attributes.insert(key, value);
        }
        self.data = remaining;
        Ok(())
    }

    /// Sets the dimension-at-observation attribute; the value must be a
    /// dimension of the governing structure or `AllDimensions`.
    pub fn set_dimension_at_observation(&mut self, dimension: &str) -> Result<()> {
        if dimension == ALL_DIMENSIONS || self.structure().dimensions.contains(dimension) {
            self.dataset_attributes.dimension_at_observation = dimension.to_string();
            Ok(())
        } else {
            Err(DatasetError::UnknownDimension(dimension.to_string()))
        }
    }

    fn rebind(&mut self) -> Result<()> {
        self.reconcile_attached_attributes()?;
        self.rename_measure_column()?;
        self.dataset_attributes.set_id = Some(self.structure().id.clone());
        debug!(structure = %self.binding.unique_id(), "dataset rebound");
        Ok(())
    }

    fn reconcile_attached_attributes(&mut self) -> Result<()> {
        let codes = self.structure().dataset_attribute_codes();
        for code in &codes {
            if !self.attached_attributes.contains_key(code) {
                return Err(DatasetError::MissingAttribute(code.clone()));
            }
        }
        let before = self.attached_attributes.len();
        self.attached_attributes
            .retain(|key, _| codes.iter().any(|code| code == key));
        let dropped = before - self.attached_attributes.len();
        if dropped > 0 {
            debug!(dropped, "dropped attached attribute(s) not at dataset level");
        }
        Ok(())
    }

    fn rename_measure_column(&mut self) -> Result<()> {
        let measure = self.structure().measure_code().to_string();
        if measure != DEFAULT_MEASURE_ID && self.data.column(DEFAULT_MEASURE_ID).is_ok() {
            self.data.rename(DEFAULT_MEASURE_ID, measure.into())?;
        }
        Ok(())
    }
}

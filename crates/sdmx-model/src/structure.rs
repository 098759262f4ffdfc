//! Data structure definitions and dataflows.
//!
//! The DSD aggregates the three descriptors and exposes the derived indices
//! the validation engine consumes: flat code lists, the faceted-component
//! map, codelist membership sets and the constraint projections. Consumers
//! resolve each index once per validation pass rather than chasing optional
//! representation links per check.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::component::{
    AttributeDescriptor, Component, DimensionDescriptor, MeasureDescriptor, ValueType,
};
use crate::constraint::{ConstraintRole, ContentConstraint, SeriesKey};
use crate::facet::Facet;

/// A collection of metadata concepts, their structure and usage when used to
/// collect or disseminate data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataStructureDefinition {
    pub agency_id: String,
    pub id: String,
    pub version: String,
    pub dimensions: DimensionDescriptor,
    pub attributes: Option<AttributeDescriptor>,
    pub measures: MeasureDescriptor,
    pub constraints: Vec<ContentConstraint>,
}

impl DataStructureDefinition {
    pub fn new(
        agency_id: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
        dimensions: DimensionDescriptor,
        attributes: Option<AttributeDescriptor>,
        measures: MeasureDescriptor,
    ) -> Self {
        Self {
            agency_id: agency_id.into(),
            id: id.into(),
            version: version.into(),
            dimensions,
            attributes,
            measures,
            constraints: Vec::new(),
        }
    }

    /// The structure identity in `agency:id(version)` form.
    pub fn unique_id(&self) -> String {
        format!("{}:{}({})", self.agency_id, self.id, self.version)
    }

    pub fn add_constraint(&mut self, constraint: ContentConstraint) {
        self.constraints.push(constraint);
    }

    /// Dimension component ids in declaration order.
    pub fn dimension_codes(&self) -> Vec<String> {
        self.dimensions.codes()
    }

    /// Attribute component ids in declaration order.
    pub fn attribute_codes(&self) -> Vec<String> {
        self.attributes
            .as_ref()
            .map(AttributeDescriptor::codes)
            .unwrap_or_default()
    }

    /// Ids of attributes attached at dataset level. These are reported once
    /// per dataset and never appear as table columns.
    pub fn dataset_attribute_codes(&self) -> Vec<String> {
        self.attribute_components()
            .filter(|c| c.is_dataset_level())
            .map(|c| c.id.clone())
            .collect()
    }

    /// Ids of mandatory attributes that materialize as table columns.
    pub fn mandatory_attribute_codes(&self) -> Vec<String> {
        self.attribute_components()
            .filter(|c| c.is_mandatory())
            .map(|c| c.id.clone())
            .collect()
    }

    /// Id of the primary measure. Always non-empty.
    pub fn measure_code(&self) -> &str {
        self.measures.code()
    }

    /// Looks a component up across all three descriptors.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.dimensions
            .get(id)
            .or_else(|| self.attributes.as_ref().and_then(|a| a.get(id)))
            .or_else(|| self.measures.components().iter().find(|c| c.id == id))
    }

    /// Facets per component id, for every component (dimension, attribute or
    /// measure) whose effective representation is facet-based.
    pub fn faceted_components(&self) -> BTreeMap<String, Vec<Facet>> {
        let mut faceted = BTreeMap::new();
        for component in self.all_components() {
            if let Some(facets) = component.representation().facets() {
                faceted.insert(component.id.clone(), facets.to_vec());
            }
        }
        faceted
    }

    /// Codelist member ids per component id, for dimensions and attributes
    /// with an enumerated representation.
    pub fn codelist_components(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut bound = BTreeMap::new();
        for component in self
            .dimensions
            .components()
            .iter()
            .chain(self.attribute_components())
        {
            if let Some(codelist) = component.representation().codelist() {
                bound.insert(
                    component.id.clone(),
                    codelist.code_ids().map(str::to_string).collect(),
                );
            }
        }
        bound
    }

    /// Declared value type per component id; `String` when undeclared.
    pub fn component_types(&self) -> BTreeMap<String, ValueType> {
        self.all_components()
            .map(|c| (c.id.clone(), c.declared_value_type()))
            .collect()
    }

    /// Union of cube-region member selections across all constraints,
    /// component id → allowed value set.
    pub fn cube_region_values(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut cubes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for constraint in &self.constraints {
            for region in &constraint.cube_regions {
                for (component, values) in &region.members {
                    cubes
                        .entry(component.clone())
                        .or_default()
                        .extend(values.iter().cloned());
                }
            }
        }
        cubes
    }

    /// Series keys from `Allowed`-role constraints, in declaration order.
    pub fn allowed_series_keys(&self) -> Vec<SeriesKey> {
        self.constraints
            .iter()
            .filter(|c| c.role == ConstraintRole::Allowed)
            .flat_map(|c| c.series_keys.iter().cloned())
            .collect()
    }

    fn attribute_components(&self) -> impl Iterator<Item = &Component> {
        self.attributes
            .as_ref()
            .map(AttributeDescriptor::components)
            .unwrap_or_default()
            .iter()
    }

    fn all_components(&self) -> impl Iterator<Item = &Component> {
        self.dimensions
            .components()
            .iter()
            .chain(self.attribute_components())
            .chain(self.measures.components().iter())
    }
}

/// A named, versioned reference to exactly one data structure definition.
/// All derived indices delegate to the wrapped structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataflowDefinition {
    pub agency_id: String,
    pub id: String,
    pub version: String,
    pub structure: DataStructureDefinition,
}

impl DataflowDefinition {
    pub fn new(
        agency_id: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
        structure: DataStructureDefinition,
    ) -> Self {
        Self {
            agency_id: agency_id.into(),
            id: id.into(),
            version: version.into(),
            structure,
        }
    }

    /// The dataflow identity in `agency:id(version)` form.
    pub fn unique_id(&self) -> String {
        format!("{}:{}({})", self.agency_id, self.id, self.version)
    }

    pub fn structure(&self) -> &DataStructureDefinition {
        &self.structure
    }

    pub fn dimension_codes(&self) -> Vec<String> {
        self.structure.dimension_codes()
    }

    pub fn attribute_codes(&self) -> Vec<String> {
        self.structure.attribute_codes()
    }

    pub fn dataset_attribute_codes(&self) -> Vec<String> {
        self.structure.dataset_attribute_codes()
    }

    pub fn measure_code(&self) -> &str {
        self.structure.measure_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codelist::{Code, Codelist};
    use crate::component::{AttributeRelationship, ComponentList, Representation, UsageStatus};
    use crate::facet::FacetType;

    fn freq_codelist() -> Codelist {
        let mut cl = Codelist::new("SDMX", "CL_FREQ", "2.0");
        cl.insert(Code::new("A"));
        cl.insert(Code::new("M"));
        cl
    }

    fn sample_dsd() -> DataStructureDefinition {
        let mut freq = Component::new("FREQ");
        freq.local_representation = Some(Representation::Codelist(freq_codelist()));
        let dimensions = ComponentList::new(vec![freq, Component::new("REF_AREA")]);

        let mut obs_status = Component::new("OBS_STATUS");
        obs_status.relationship = Some(AttributeRelationship::PrimaryMeasure);
        obs_status.usage_status = Some(UsageStatus::Mandatory);

        let mut decimals = Component::new("DECIMALS");
        decimals.relationship = Some(AttributeRelationship::Dataset);
        decimals.usage_status = Some(UsageStatus::Mandatory);
        decimals.local_representation = Some(Representation::Facets(vec![Facet::new(
            FacetType::MaxLength,
            "2",
        )]));

        let attributes = ComponentList::new(vec![obs_status, decimals]);

        DataStructureDefinition::new(
            "BIS",
            "BIS_DER",
            "1.0",
            dimensions,
            Some(attributes),
            MeasureDescriptor::default(),
        )
    }

    #[test]
    fn derived_code_lists() {
        let dsd = sample_dsd();
        assert_eq!(dsd.dimension_codes(), vec!["FREQ", "REF_AREA"]);
        assert_eq!(dsd.attribute_codes(), vec!["OBS_STATUS", "DECIMALS"]);
        assert_eq!(dsd.dataset_attribute_codes(), vec!["DECIMALS"]);
        // DECIMALS is dataset-level, still a relationship, so it stays
        // mandatory; OBS_STATUS is mandatory at observation level.
        assert_eq!(
            dsd.mandatory_attribute_codes(),
            vec!["OBS_STATUS", "DECIMALS"]
        );
        assert_eq!(dsd.measure_code(), "OBS_VALUE");
        assert_eq!(dsd.unique_id(), "BIS:BIS_DER(1.0)");
    }

    #[test]
    fn faceted_and_codelist_indices() {
        let dsd = sample_dsd();
        let faceted = dsd.faceted_components();
        assert!(faceted.contains_key("DECIMALS"));
        assert!(!faceted.contains_key("FREQ"));

        let bound = dsd.codelist_components();
        assert!(bound["FREQ"].contains("A"));
        assert!(!bound.contains_key("REF_AREA"));
    }

    #[test]
    fn dataflow_delegates_to_structure() {
        let flow = DataflowDefinition::new("BIS", "WEBSTATS_DER", "1.0", sample_dsd());
        assert_eq!(flow.measure_code(), "OBS_VALUE");
        assert_eq!(flow.dimension_codes(), flow.structure().dimension_codes());
        assert_eq!(flow.unique_id(), "BIS:WEBSTATS_DER(1.0)");
    }
}

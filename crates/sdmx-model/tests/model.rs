//! Integration tests for the SDMX metadata model.

use sdmx_model::{
    AttributeRelationship, CheckCode, Code, Codelist, Component, ComponentKind, ComponentList,
    Concept, ConstraintRole, ContentConstraint, CubeRegion, DataStructureDefinition,
    DataflowDefinition, ErrorLevel, Facet, FacetType, Finding, MeasureDescriptor, Representation,
    UsageStatus, ValueType,
};

fn dimension(id: &str) -> Component {
    Component::new(id)
}

fn coded_dimension(id: &str, codelist: Codelist) -> Component {
    let mut component = Component::new(id);
    component.local_representation = Some(Representation::Codelist(codelist));
    component
}

fn attribute(id: &str, relationship: AttributeRelationship, usage: UsageStatus) -> Component {
    let mut component = Component::new(id);
    component.relationship = Some(relationship);
    component.usage_status = Some(usage);
    component
}

fn sample_codelist() -> Codelist {
    let mut cl = Codelist::new("SDMX", "CL_FREQ", "2.1");
    cl.insert(Code::new("A").with_name("en", "Annual"));
    cl.insert(Code::new("Q").with_name("en", "Quarterly"));
    cl.insert(Code::new("M").with_name("en", "Monthly"));
    cl
}

fn sample_dsd() -> DataStructureDefinition {
    let dimensions = ComponentList::new(vec![
        coded_dimension("FREQ", sample_codelist()),
        dimension("REF_AREA"),
    ]);
    let attributes = ComponentList::new(vec![
        attribute(
            "OBS_STATUS",
            AttributeRelationship::PrimaryMeasure,
            UsageStatus::Mandatory,
        ),
        attribute(
            "DECIMALS",
            AttributeRelationship::Dataset,
            UsageStatus::Conditional,
        ),
    ]);
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
fn concept_core_representation_is_inherited() {
    let mut concept = Concept::new("TIME_FORMAT");
    concept.core_representation = Some(Representation::Facets(vec![Facet::new(
        FacetType::MaxLength,
        "8",
    )]));

    let mut component = Component::new("TIME_FORMAT");
    component.concept_identity = Some(concept);
    assert!(component.representation().facets().is_some());

    // A local codelist overrides the inherited facets.
    component.local_representation = Some(Representation::Codelist(sample_codelist()));
    assert!(component.representation().codelist().is_some());
}

#[test]
fn dsd_indices_cover_all_descriptors() {
    let dsd = sample_dsd();
    assert_eq!(dsd.dimension_codes(), vec!["FREQ", "REF_AREA"]);
    assert_eq!(dsd.dataset_attribute_codes(), vec!["DECIMALS"]);
    assert_eq!(dsd.mandatory_attribute_codes(), vec!["OBS_STATUS"]);
    assert_eq!(dsd.measure_code(), "OBS_VALUE");

    let types = dsd.component_types();
    assert_eq!(types["REF_AREA"], ValueType::String);
    assert_eq!(types.len(), 5);
}

#[test]
fn constraint_projections() {
    let mut dsd = sample_dsd();

    let mut region = CubeRegion::new();
    region.select("FREQ", ["A".to_string(), "Q".to_string()]);
    let mut cube_constraint = ContentConstraint::new("CC_CUBE", ConstraintRole::Actual);
    cube_constraint.cube_regions.push(region);
    dsd.add_constraint(cube_constraint);

    let mut allowed = ContentConstraint::new("CC_SERIES", ConstraintRole::Allowed);
    allowed.series_keys.push(
        [("FREQ".to_string(), "A".to_string())]
            .into_iter()
            .collect(),
    );
    dsd.add_constraint(allowed);

    let cubes = dsd.cube_region_values();
    assert_eq!(cubes["FREQ"].len(), 2);

    let keys = dsd.allowed_series_keys();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["FREQ"], "A");
}

#[test]
fn dataflow_wraps_one_structure() {
    let flow = DataflowDefinition::new("BIS", "WEBSTATS", "1.0", sample_dsd());
    assert_eq!(flow.dataset_attribute_codes(), vec!["DECIMALS"]);
    assert_eq!(flow.measure_code(), "OBS_VALUE");
}

#[test]
fn finding_round_trips_through_json() {
    let finding = Finding {
        code: CheckCode::CodelistMembership,
        error_level: ErrorLevel::Critical,
        component: "FREQ".to_string(),
        component_kind: ComponentKind::Dimension,
        rows: None,
        message: "Wrong value X for dimension FREQ".to_string(),
    };
    let json = serde_json::to_string(&finding).expect("serialize finding");
    let round: Finding = serde_json::from_str(&json).expect("deserialize finding");
    assert_eq!(round, finding);
}

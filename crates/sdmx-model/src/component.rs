//! Components and descriptors.
//!
//! A component couples an id with a representation (what values it may take)
//! and optionally a concept identity. Its effective representation is the
//! local one when set, otherwise the concept's core representation. The
//! descriptors group components into the dimension, attribute and measure
//! lists of a data structure definition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codelist::Codelist;
use crate::error::ModelError;
use crate::facet::Facet;

/// Default primary measure id when none is declared.
pub const DEFAULT_MEASURE_ID: &str = "OBS_VALUE";

/// The allowable values or format for a component or concept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Representation {
    /// Values are drawn from an enumerated codelist.
    Codelist(Codelist),
    /// Values are constrained by a list of facets.
    Facets(Vec<Facet>),
    /// No value-domain constraint.
    #[default]
    None,
}

impl Representation {
    pub fn codelist(&self) -> Option<&Codelist> {
        match self {
            Representation::Codelist(cl) => Some(cl),
            _ => None,
        }
    }

    pub fn facets(&self) -> Option<&[Facet]> {
        match self {
            Representation::Facets(facets) if !facets.is_empty() => Some(facets),
            _ => None,
        }
    }
}

/// Basic value type of a component, as declared by the structure document.
///
/// The time-period variants drive the time-format check; everything else is
/// treated as plain text or number by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueType {
    #[default]
    String,
    Integer,
    Double,
    Boolean,
    ObservationalTimePeriod,
    StandardTimePeriod,
    BasicTimePeriod,
    GregorianTimePeriod,
    GregorianYear,
    GregorianYearMonth,
    GregorianDay,
    ReportingYear,
    ReportingSemester,
    ReportingTrimester,
    ReportingQuarter,
    ReportingMonth,
    ReportingWeek,
    ReportingDay,
    DateTime,
    TimeRange,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "String",
            ValueType::Integer => "Integer",
            ValueType::Double => "Double",
            ValueType::Boolean => "Boolean",
            ValueType::ObservationalTimePeriod => "ObservationalTimePeriod",
            ValueType::StandardTimePeriod => "StandardTimePeriod",
            ValueType::BasicTimePeriod => "BasicTimePeriod",
            ValueType::GregorianTimePeriod => "GregorianTimePeriod",
            ValueType::GregorianYear => "GregorianYear",
            ValueType::GregorianYearMonth => "GregorianYearMonth",
            ValueType::GregorianDay => "GregorianDay",
            ValueType::ReportingYear => "ReportingYear",
            ValueType::ReportingSemester => "ReportingSemester",
            ValueType::ReportingTrimester => "ReportingTrimester",
            ValueType::ReportingQuarter => "ReportingQuarter",
            ValueType::ReportingMonth => "ReportingMonth",
            ValueType::ReportingWeek => "ReportingWeek",
            ValueType::ReportingDay => "ReportingDay",
            ValueType::DateTime => "DateTime",
            ValueType::TimeRange => "TimeRange",
        }
    }

    /// True for types whose lexical space is a time period.
    pub fn is_time_period(&self) -> bool {
        !matches!(
            self,
            ValueType::String | ValueType::Integer | ValueType::Double | ValueType::Boolean
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "String" => Ok(ValueType::String),
            "Integer" | "BigInteger" | "Long" | "Short" | "Count" => Ok(ValueType::Integer),
            "Double" | "Float" | "Decimal" => Ok(ValueType::Double),
            "Boolean" => Ok(ValueType::Boolean),
            "ObservationalTimePeriod" => Ok(ValueType::ObservationalTimePeriod),
            "StandardTimePeriod" => Ok(ValueType::StandardTimePeriod),
            "BasicTimePeriod" => Ok(ValueType::BasicTimePeriod),
            "GregorianTimePeriod" => Ok(ValueType::GregorianTimePeriod),
            "GregorianYear" => Ok(ValueType::GregorianYear),
            "GregorianYearMonth" => Ok(ValueType::GregorianYearMonth),
            "GregorianDay" => Ok(ValueType::GregorianDay),
            "ReportingYear" => Ok(ValueType::ReportingYear),
            "ReportingSemester" => Ok(ValueType::ReportingSemester),
            "ReportingTrimester" => Ok(ValueType::ReportingTrimester),
            "ReportingQuarter" => Ok(ValueType::ReportingQuarter),
            "ReportingMonth" => Ok(ValueType::ReportingMonth),
            "ReportingWeek" => Ok(ValueType::ReportingWeek),
            "ReportingDay" => Ok(ValueType::ReportingDay),
            "DateTime" | "dateTime" => Ok(ValueType::DateTime),
            "TimeRange" => Ok(ValueType::TimeRange),
            other => Err(format!("Unknown value type: {}", other)),
        }
    }
}

/// A metadata concept a component points at. Carries the fallback
/// representation used when the component declares no local one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub core_representation: Option<Representation>,
}

impl Concept {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            core_representation: None,
        }
    }
}

/// How an attribute is attached to the data it qualifies.
///
/// `Dataset` corresponds to SDMX "NoSpecifiedRelationship": the attribute is
/// reported once per dataset, never as a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeRelationship {
    Dataset,
    Group,
    Dimension,
    PrimaryMeasure,
    None,
}

impl AttributeRelationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeRelationship::Dataset => "Dataset",
            AttributeRelationship::Group => "Group",
            AttributeRelationship::Dimension => "Dimension",
            AttributeRelationship::PrimaryMeasure => "PrimaryMeasure",
            AttributeRelationship::None => "None",
        }
    }
}

/// Whether an attribute must be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageStatus {
    Mandatory,
    Conditional,
}

impl FromStr for UsageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("mandatory") {
            Ok(UsageStatus::Mandatory)
        } else if trimmed.eq_ignore_ascii_case("conditional") {
            Ok(UsageStatus::Conditional)
        } else {
            Err(format!("Unknown usage status: {}", s))
        }
    }
}

/// One dimension, attribute or measure of a data structure definition.
///
/// `relationship` and `usage_status` are only meaningful on attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub local_representation: Option<Representation>,
    pub concept_identity: Option<Concept>,
    pub relationship: Option<AttributeRelationship>,
    pub usage_status: Option<UsageStatus>,
    pub value_type: Option<ValueType>,
}

static NO_REPRESENTATION: Representation = Representation::None;

impl Component {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            local_representation: None,
            concept_identity: None,
            relationship: None,
            usage_status: None,
            value_type: None,
        }
    }

    /// The effective representation: local if set, else the concept's core
    /// representation, else `Representation::None`.
    pub fn representation(&self) -> &Representation {
        if let Some(local) = &self.local_representation {
            return local;
        }
        self.concept_identity
            .as_ref()
            .and_then(|concept| concept.core_representation.as_ref())
            .unwrap_or(&NO_REPRESENTATION)
    }

    /// True for attributes attached at dataset level.
    pub fn is_dataset_level(&self) -> bool {
        self.relationship == Some(AttributeRelationship::Dataset)
    }

    /// True for attributes that must be reported per observation or group.
    /// Dataset-level attributes never appear as table columns, so a
    /// relationship of `None` disqualifies.
    pub fn is_mandatory(&self) -> bool {
        self.usage_status == Some(UsageStatus::Mandatory)
            && self
                .relationship
                .is_some_and(|rel| rel != AttributeRelationship::None)
    }

    pub fn declared_value_type(&self) -> ValueType {
        self.value_type.unwrap_or_default()
    }
}

/// An ordered, id-addressable list of components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentList {
    components: Vec<Component>,
}

pub type DimensionDescriptor = ComponentList;
pub type AttributeDescriptor = ComponentList;

impl ComponentList {
    pub fn new(components: Vec<Component>) -> Self {
        let mut list = Self::default();
        for component in components {
            list.insert(component);
        }
        list
    }

    /// Appends a component, replacing any existing component with the same id
    /// in place.
    pub fn insert(&mut self, component: Component) {
        if let Some(existing) = self.components.iter_mut().find(|c| c.id == component.id) {
            *existing = component;
        } else {
            self.components.push(component);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.iter().any(|c| c.id == id)
    }

    /// Component ids in declaration order.
    pub fn codes(&self) -> Vec<String> {
        self.components.iter().map(|c| c.id.clone()).collect()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// The measure list of a data structure definition. Normally holds a single
/// primary measure; never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureDescriptor {
    components: ComponentList,
}

impl MeasureDescriptor {
    pub fn new(components: Vec<Component>) -> crate::error::Result<Self> {
        if components.is_empty() {
            return Err(ModelError::EmptyMeasureDescriptor);
        }
        Ok(Self {
            components: ComponentList::new(components),
        })
    }

    /// The primary measure (first declared component).
    pub fn primary(&self) -> &Component {
        &self.components.components()[0]
    }

    /// Id of the primary measure.
    pub fn code(&self) -> &str {
        &self.primary().id
    }

    pub fn components(&self) -> &[Component] {
        self.components.components()
    }
}

impl Default for MeasureDescriptor {
    fn default() -> Self {
        Self {
            components: ComponentList::new(vec![Component::new(DEFAULT_MEASURE_ID)]),
        }
    }
}

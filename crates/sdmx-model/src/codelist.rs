//! Codelists: enumerated value domains for components.
//!
//! A codelist is an ordered collection of codes maintained by an agency under
//! a version; its identity is `agency:id(version)`. Validation only consults
//! the code id set, but localized names are kept for reporting consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single code within a codelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    pub id: String,
    /// Localized names keyed by language tag (e.g. "en").
    pub names: BTreeMap<String, String>,
}

impl Code {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            names: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.names.insert(locale.into(), text.into());
        self
    }

    pub fn name(&self, locale: &str) -> Option<&str> {
        self.names.get(locale).map(String::as_str)
    }
}

/// An identified, versioned, ordered set of codes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Codelist {
    pub agency_id: String,
    pub id: String,
    pub version: String,
    /// Codes in document order. Ids are unique; inserting an existing id
    /// replaces the previous code in place.
    items: Vec<Code>,
}

impl Codelist {
    pub fn new(
        agency_id: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            agency_id: agency_id.into(),
            id: id.into(),
            version: version.into(),
            items: Vec::new(),
        }
    }

    /// The codelist identity in `agency:id(version)` form.
    pub fn unique_id(&self) -> String {
        format!("{}:{}({})", self.agency_id, self.id, self.version)
    }

    pub fn insert(&mut self, code: Code) {
        if let Some(existing) = self.items.iter_mut().find(|c| c.id == code.id) {
            *existing = code;
        } else {
            self.items.push(code);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Code> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|c| c.id == id)
    }

    /// Code ids in document order.
    pub fn code_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|c| c.id.as_str())
    }

    pub fn items(&self) -> &[Code] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_id_in_place() {
        let mut cl = Codelist::new("SDMX", "CL_FREQ", "1.0");
        cl.insert(Code::new("A").with_name("en", "Annual"));
        cl.insert(Code::new("M").with_name("en", "Monthly"));
        cl.insert(Code::new("A").with_name("en", "Yearly"));

        assert_eq!(cl.len(), 2);
        let ids: Vec<&str> = cl.code_ids().collect();
        assert_eq!(ids, vec!["A", "M"]);
        assert_eq!(cl.get("A").unwrap().name("en"), Some("Yearly"));
    }

    #[test]
    fn unique_id_format() {
        let cl = Codelist::new("ESTAT", "CL_AREA", "2.1");
        assert_eq!(cl.unique_id(), "ESTAT:CL_AREA(2.1)");
    }
}

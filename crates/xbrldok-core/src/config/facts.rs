//! Fact registry and transformation whitelist

use std::collections::HashMap;

use serde::Deserialize;

use super::keyed_entries;
use crate::error::{Error, Result};
use crate::lexical::is_ncname;
use crate::model::FactDefinition;

/// Ordered map from fact id to its definition
#[derive(Debug, Clone, Default)]
pub struct FactRegistry {
    entries: Vec<(String, FactDefinition)>,
    index: HashMap<String, usize>,
}

impl FactRegistry {
    /// Build a registry from `(fact id, definition)` pairs
    ///
    /// A fact id given twice keeps its first position and its last definition.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FactDefinition)>,
        K: Into<String>,
    {
        let mut registry = Self::default();
        for (id, definition) in entries {
            registry.insert(id.into(), definition);
        }
        registry
    }

    /// Parse the `[facts.<id>]` tables of a TOML document
    pub fn from_toml_str(source: &str, label: &str) -> Result<Self> {
        let mut registry = Self::default();
        for (id, value) in keyed_entries(source, label, "facts", false)? {
            let definition: FactDefinition = value
                .try_into()
                .map_err(|e: toml::de::Error| Error::config(&id, e.message().to_string()))?;
            check_definition(&id, &definition)?;
            registry.insert(id, definition);
        }
        Ok(registry)
    }

    fn insert(&mut self, id: String, definition: FactDefinition) {
        match self.index.get(&id) {
            Some(&pos) => self.entries[pos].1 = definition,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, definition));
            }
        }
    }

    /// Definition of a fact id
    pub fn get(&self, fact_id: &str) -> Option<&FactDefinition> {
        self.index.get(fact_id).map(|&pos| &self.entries[pos].1)
    }

    /// Position of a fact id in registry order
    pub fn position(&self, fact_id: &str) -> Option<usize> {
        self.index.get(fact_id).copied()
    }

    /// Check whether a fact id is registered
    pub fn contains(&self, fact_id: &str) -> bool {
        self.index.contains_key(fact_id)
    }

    /// Entries in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactDefinition)> {
        self.entries.iter().map(|(id, def)| (id.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_definition(id: &str, definition: &FactDefinition) -> Result<()> {
    let local = definition
        .concept
        .rsplit_once(':')
        .map_or(definition.concept.as_str(), |(_, local)| local);
    if !is_ncname(local) {
        return Err(Error::config(
            id,
            format!("concept '{}' is not a valid element name", definition.concept),
        ));
    }
    if definition.context_ref.trim().is_empty() {
        return Err(Error::config(id, "contextRef must not be empty"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TransformEntry {
    #[serde(default)]
    description: Option<String>,
}

/// Whitelist of transformation names, in file order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformTable {
    #[serde(default)]
    transforms: toml::map::Map<String, toml::Value>,
}

impl TransformTable {
    /// Parse a `[transforms."<name>"]` TOML document
    pub fn from_toml_str(source: &str, label: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::format(label, e.message()))
    }

    /// Whitelisted names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }

    /// Check whether a name is whitelisted
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Free-form description of a whitelisted transformation
    pub fn description(&self, name: &str) -> Option<String> {
        let value = self.transforms.get(name)?.clone();
        value
            .try_into::<TransformEntry>()
            .ok()
            .and_then(|entry| entry.description)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::Decimals;

    const FACTS: &str = r#"
[facts.revenue_2025]
concept = "gri:EconomicPerformanceRevenue"
type = "xbrli:monetaryItemType"
contextRef = "FY2025"
unitRef = "EUR"
decimals = 2
transform = "ixt:num-comma-decimal"

[facts.company_name]
concept = "gri:OrganizationName"
type = "xbrli:stringItemType"
contextRef = "FY2025"

[facts.employees_2025]
concept = "gri:NumberOfEmployees"
type = "xbrli:integerItemType"
contextRef = "FY2025"
unitRef = "pure"
decimals = "INF"
"#;

    #[test]
    fn test_registry_keeps_file_order() {
        let registry = FactRegistry::from_toml_str(FACTS, "facts.toml").unwrap();
        let ids: Vec<&str> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["revenue_2025", "company_name", "employees_2025"]);
        assert_eq!(registry.position("employees_2025"), Some(2));
    }

    #[test]
    fn test_definition_fields() {
        let registry = FactRegistry::from_toml_str(FACTS, "facts.toml").unwrap();
        let revenue = registry.get("revenue_2025").unwrap();
        assert_eq!(revenue.unit_ref.as_deref(), Some("EUR"));
        assert_eq!(revenue.decimals, Some(Decimals::Places(2)));
        assert_eq!(revenue.transform.as_deref(), Some("ixt:num-comma-decimal"));

        let name = registry.get("company_name").unwrap();
        assert_eq!(name.unit_ref, None);
        assert_eq!(name.transform, None);

        let employees = registry.get("employees_2025").unwrap();
        assert_eq!(employees.decimals, Some(Decimals::Infinite));
    }

    #[test]
    fn test_missing_field_is_config_error() {
        let err = FactRegistry::from_toml_str(
            "[facts.revenue_2025]\nconcept = \"gri:Revenue\"\n",
            "facts.toml",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.key(), "revenue_2025");
    }

    #[test]
    fn test_invalid_concept_name_rejected() {
        let err = FactRegistry::from_toml_str(
            "[facts.x]\nconcept = \"gri:2025 Revenue\"\ntype = \"xbrli:stringItemType\"\ncontextRef = \"C\"\n",
            "facts.toml",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_from_entries_last_definition_wins() {
        let def = |concept: &str| FactDefinition {
            concept: concept.to_string(),
            item_type: "xbrli:stringItemType".to_string(),
            context_ref: "C".to_string(),
            unit_ref: None,
            decimals: None,
            transform: None,
        };
        let registry =
            FactRegistry::from_entries(vec![("a", def("gri:A")), ("b", def("gri:B")), ("a", def("gri:C"))]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.position("a"), Some(0));
        assert_eq!(registry.get("a").unwrap().concept, "gri:C");
    }

    #[test]
    fn test_transform_table() {
        let table = TransformTable::from_toml_str(
            r#"
[transforms."ixt:num-dot-decimal"]
description = "1,234.56 -> 1234.56"

[transforms."ixt:date-day-month-year"]
"#,
            "transforms.toml",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec!["ixt:num-dot-decimal", "ixt:date-day-month-year"]
        );
        assert_eq!(
            table.description("ixt:num-dot-decimal").as_deref(),
            Some("1,234.56 -> 1234.56")
        );
        assert_eq!(table.description("ixt:date-day-month-year"), None);
        assert!(!table.contains("ixt:boolean-true"));
    }

    #[test]
    fn test_empty_transform_table() {
        let table = TransformTable::from_toml_str("", "transforms.toml").unwrap();
        assert!(table.is_empty());
    }
}

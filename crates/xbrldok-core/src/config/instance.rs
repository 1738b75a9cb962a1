//! Context and unit registries

use std::collections::HashMap;

use super::keyed_entries;
use super::taxonomy::Taxonomy;
use crate::error::{Error, Result};
use crate::lexical::{is_iso_date, is_ncname};
use crate::model::{Context, Period, Unit};

/// Contexts in file order, addressed by id
#[derive(Debug, Clone, Default)]
pub struct Contexts {
    items: Vec<Context>,
    index: HashMap<String, usize>,
}

impl Contexts {
    /// Build the registry, rejecting duplicate ids and malformed periods
    pub fn new(items: Vec<Context>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, context) in items.iter().enumerate() {
            check_id(&context.id)?;
            check_period(&context.id, &context.period)?;
            if context.identifier().value.trim().is_empty() {
                return Err(Error::config(&context.id, "entity identifier is empty"));
            }
            if index.insert(context.id.clone(), pos).is_some() {
                return Err(Error::config(&context.id, "duplicate context id"));
            }
        }
        Ok(Self { items, index })
    }

    /// Parse the `[contexts.<key>]` tables of a TOML document
    ///
    /// The table key doubles as the context id unless `id` is given.
    pub fn from_toml_str(source: &str, label: &str) -> Result<Self> {
        let mut items = Vec::new();
        for (key, value) in keyed_entries(source, label, "contexts", true)? {
            let context: Context = value
                .try_into()
                .map_err(|e: toml::de::Error| Error::config(&key, e.message().to_string()))?;
            items.push(context);
        }
        Self::new(items)
    }

    pub fn get(&self, id: &str) -> Option<&Context> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Units in file order, addressed by id
#[derive(Debug, Clone, Default)]
pub struct Units {
    items: Vec<Unit>,
    index: HashMap<String, usize>,
}

impl Units {
    /// Build the registry, rejecting duplicate ids and unqualified measures
    pub fn new(items: Vec<Unit>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, unit) in items.iter().enumerate() {
            check_id(&unit.id)?;
            match unit.measure.split_once(':') {
                Some((prefix, local)) if is_ncname(prefix) && is_ncname(local) => {}
                _ => {
                    return Err(Error::config(
                        &unit.id,
                        format!("measure '{}' must be a prefixed name", unit.measure),
                    ))
                }
            }
            if index.insert(unit.id.clone(), pos).is_some() {
                return Err(Error::config(&unit.id, "duplicate unit id"));
            }
        }
        Ok(Self { items, index })
    }

    /// Parse the `[units.<key>]` tables of a TOML document
    pub fn from_toml_str(source: &str, label: &str) -> Result<Self> {
        let mut items = Vec::new();
        for (key, value) in keyed_entries(source, label, "units", true)? {
            let unit: Unit = value
                .try_into()
                .map_err(|e: toml::de::Error| Error::config(&key, e.message().to_string()))?;
            items.push(unit);
        }
        Self::new(items)
    }

    /// Fail on the first unit whose measure prefix has no namespace binding
    pub fn check_measures(&self, taxonomy: &Taxonomy) -> Result<()> {
        for unit in &self.items {
            if let Some((prefix, _)) = unit.measure.split_once(':') {
                if taxonomy.namespace(prefix).is_none() {
                    return Err(Error::config(
                        &unit.id,
                        format!(
                            "measure '{}' uses prefix '{}', which has no namespace binding",
                            unit.measure, prefix
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn check_id(id: &str) -> Result<()> {
    if is_ncname(id) {
        Ok(())
    } else {
        Err(Error::config(id, "id must be a valid XML NCName"))
    }
}

fn check_period(id: &str, period: &Period) -> Result<()> {
    for date in period.dates() {
        if !is_iso_date(date) {
            return Err(Error::config(
                id,
                format!("period date '{}' is not YYYY-MM-DD", date),
            ));
        }
    }
    if let Period::Duration {
        start_date,
        end_date,
    } = period
    {
        // Zero-padded ISO dates order lexically.
        if start_date > end_date {
            return Err(Error::config(id, "period startDate is after endDate"));
        }
    }
    Ok(())
}

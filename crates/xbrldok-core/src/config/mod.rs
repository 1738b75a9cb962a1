//! Configuration registries
//!
//! The pipeline is driven by five read-only registries, each kept in its own
//! TOML file:
//!
//! ```text
//! model/facts.toml          factId -> concept, type, contextRef, unitRef, decimals, transform
//! model/transforms.toml     whitelist of transformation names
//! model/contexts.toml       contexts (entity + period)
//! model/units.toml          units (measure)
//! taxonomy/entrypoints.toml schema entry point and namespace bindings
//! ```
//!
//! Registries are loaded once at the start of a run into immutable structs
//! that are handed to each component at construction. Table order in a file
//! is the iteration order of its registry.
//!
//! ```toml
//! [facts.revenue_2025]
//! concept = "gri:EconomicPerformanceRevenue"
//! type = "xbrli:monetaryItemType"
//! contextRef = "FY2025"
//! unitRef = "EUR"
//! decimals = 2
//! transform = "ixt:num-comma-decimal"
//! ```

mod facts;
mod instance;
mod taxonomy;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

pub use facts::{FactRegistry, TransformTable};
pub use instance::{Contexts, Units};
pub use taxonomy::{Taxonomy, STANDARD_NAMESPACES};

/// Default location of the fact registry, relative to the project root
pub const FACTS_FILE: &str = "model/facts.toml";
/// Default location of the transformation whitelist
pub const TRANSFORMS_FILE: &str = "model/transforms.toml";
/// Default location of the context registry
pub const CONTEXTS_FILE: &str = "model/contexts.toml";
/// Default location of the unit registry
pub const UNITS_FILE: &str = "model/units.toml";
/// Default location of the taxonomy bindings
pub const TAXONOMY_FILE: &str = "taxonomy/entrypoints.toml";

/// Paths of the registry files of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub facts: PathBuf,
    pub transforms: PathBuf,
    pub contexts: PathBuf,
    pub units: PathBuf,
    pub taxonomy: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::from_root(".")
    }
}

impl ProjectConfig {
    /// Use the default file layout below a project root
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            facts: root.join(FACTS_FILE),
            transforms: root.join(TRANSFORMS_FILE),
            contexts: root.join(CONTEXTS_FILE),
            units: root.join(UNITS_FILE),
            taxonomy: root.join(TAXONOMY_FILE),
        }
    }

    /// Load the fact registry
    pub fn load_facts(&self) -> Result<FactRegistry> {
        let source = read_config(&self.facts)?;
        FactRegistry::from_toml_str(&source, &self.facts.display().to_string())
    }

    /// Load the transformation whitelist
    pub fn load_transforms(&self) -> Result<TransformTable> {
        let source = read_config(&self.transforms)?;
        TransformTable::from_toml_str(&source, &self.transforms.display().to_string())
    }

    /// Load the context registry
    pub fn load_contexts(&self) -> Result<Contexts> {
        let source = read_config(&self.contexts)?;
        Contexts::from_toml_str(&source, &self.contexts.display().to_string())
    }

    /// Load the unit registry
    pub fn load_units(&self) -> Result<Units> {
        let source = read_config(&self.units)?;
        Units::from_toml_str(&source, &self.units.display().to_string())
    }

    /// Load the taxonomy bindings
    pub fn load_taxonomy(&self) -> Result<Taxonomy> {
        let source = read_config(&self.taxonomy)?;
        Taxonomy::from_toml_str(&source, &self.taxonomy.display().to_string())
    }

    /// Load every registry
    ///
    /// Unit measures must use prefixes the taxonomy binds.
    pub fn load(&self) -> Result<Registries> {
        let facts = self.load_facts()?;
        let transforms = self.load_transforms()?;
        let contexts = self.load_contexts()?;
        let units = self.load_units()?;
        let taxonomy = self.load_taxonomy()?;
        units.check_measures(&taxonomy)?;

        Ok(Registries {
            facts,
            transforms,
            contexts,
            units,
            taxonomy,
        })
    }
}

/// All registries of a run
#[derive(Debug, Clone)]
pub struct Registries {
    pub facts: FactRegistry,
    pub transforms: TransformTable,
    pub contexts: Contexts,
    pub units: Units,
    pub taxonomy: Taxonomy,
}

fn read_config(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    debug!("Loaded configuration: {}", path.display());
    Ok(source)
}

/// Parse a TOML document and return the entries of one top-level table
///
/// A missing section yields no entries. Entries that are tables get their
/// key inserted as `id` unless they carry one already.
pub(crate) fn keyed_entries(
    source: &str,
    label: &str,
    section: &str,
    insert_id: bool,
) -> Result<Vec<(String, toml::Value)>> {
    let document: toml::Table = source.parse().map_err(|e| Error::format(label, e))?;

    let table = match document.get(section) {
        Some(toml::Value::Table(table)) => table,
        Some(_) => {
            return Err(Error::config(
                section,
                format!("'{}' in {} must be a table", section, label),
            ))
        }
        None => return Ok(Vec::new()),
    };

    let mut entries = Vec::with_capacity(table.len());
    for (key, value) in table {
        let mut value = value.clone();
        if insert_id {
            if let toml::Value::Table(ref mut entry) = value {
                entry
                    .entry("id")
                    .or_insert_with(|| toml::Value::String(key.clone()));
            }
        }
        entries.push((key.clone(), value));
    }
    Ok(entries)
}

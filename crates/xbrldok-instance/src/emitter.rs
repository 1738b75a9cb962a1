//! Instance Emitter
//!
//! Writes canonical facts into an XBRL 2.1 instance document:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <xbrli:xbrl xmlns:gri="..." xmlns:xbrli="..." xmlns:link="..." xmlns:xlink="...">
//!   <link:schemaRef xlink:type="simple" xlink:href="https://example.org/gri.xsd"/>
//!   <xbrli:context id="C_2025">...</xbrli:context>
//!   <xbrli:unit id="EUR"><xbrli:measure>iso4217:EUR</xbrli:measure></xbrli:unit>
//!   <gri:Revenue contextRef="C_2025" unitRef="EUR" decimals="2">1234.56</gri:Revenue>
//! </xbrli:xbrl>
//! ```
//!
//! Every context and unit of the registries is written, followed by one
//! element per fact in input order. References are checked before any
//! output is produced; a fact whose concept cannot be resolved to a
//! namespace is left out with a warning.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use xbrldok_core::artifact::atomic_write;
use xbrldok_core::lexical::is_ncname;
use xbrldok_core::{
    BatchResult, CanonicalFact, Context, Contexts, Error, Period, Result, Taxonomy, Unit, Units,
};

/// An instance document rendered in memory
#[derive(Debug)]
pub struct EmittedInstance {
    /// Serialized XML
    pub xml: String,
    pub contexts: usize,
    pub units: usize,
    /// Per-fact outcome keyed by fact id; written facts carry their element name
    pub outcomes: BatchResult<String>,
}

impl EmittedInstance {
    /// Number of fact elements written
    pub fn fact_count(&self) -> usize {
        self.outcomes.ok_count()
    }

    /// Write the rendered instance atomically to `path`
    pub fn write(self, path: &Path) -> Result<EmitReport> {
        atomic_write(path, self.xml.as_bytes())?;

        info!(
            "Wrote {} ({} contexts, {} units, {} facts, {} skipped)",
            path.display(),
            self.contexts,
            self.units,
            self.outcomes.ok_count(),
            self.outcomes.skipped_count()
        );
        Ok(EmitReport {
            path: path.to_path_buf(),
            bytes: self.xml.len(),
            contexts: self.contexts,
            units: self.units,
            outcomes: self.outcomes,
        })
    }
}

/// Summary of an instance written to disk
#[derive(Debug)]
pub struct EmitReport {
    pub path: PathBuf,
    /// Size of the written file
    pub bytes: usize,
    pub contexts: usize,
    pub units: usize,
    pub outcomes: BatchResult<String>,
}

impl EmitReport {
    /// Number of fact elements written
    pub fn fact_count(&self) -> usize {
        self.outcomes.ok_count()
    }

    /// Facts left out as `(fact id, reason)`
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.skipped()
    }
}

/// Renders canonical facts as an XBRL instance
pub struct InstanceEmitter<'a> {
    contexts: &'a Contexts,
    units: &'a Units,
    taxonomy: &'a Taxonomy,
    /// XML output buffer
    output: String,
}

impl<'a> InstanceEmitter<'a> {
    pub fn new(contexts: &'a Contexts, units: &'a Units, taxonomy: &'a Taxonomy) -> Self {
        Self {
            contexts,
            units,
            taxonomy,
            output: String::new(),
        }
    }

    /// Fail on the first fact that refers to an unknown context or unit, or
    /// on a unit measure whose prefix is not bound
    pub fn check_references(&self, facts: &[CanonicalFact]) -> Result<()> {
        self.units.check_measures(self.taxonomy)?;
        for fact in facts {
            if !self.contexts.contains(&fact.context_ref) {
                return Err(Error::config(
                    &fact.fact_id,
                    format!("contextRef '{}' is not a defined context", fact.context_ref),
                ));
            }
            if let Some(unit_ref) = &fact.unit_ref {
                if !self.units.contains(unit_ref) {
                    return Err(Error::config(
                        &fact.fact_id,
                        format!("unitRef '{}' is not a defined unit", unit_ref),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Render the instance
    pub fn build(mut self, facts: &[CanonicalFact]) -> Result<EmittedInstance> {
        self.check_references(facts)?;

        self.output
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        self.generate_root_start();
        self.generate_schema_ref();

        let (contexts, units) = (self.contexts, self.units);
        for context in contexts.iter() {
            self.generate_context(context);
        }
        for unit in units.iter() {
            self.generate_unit(unit);
        }

        let mut outcomes = BatchResult::new();
        for fact in facts {
            match self.element_name(fact) {
                Ok(name) => {
                    self.generate_fact(&name, fact);
                    outcomes.push_ok(&fact.fact_id, name);
                }
                Err(e) => {
                    warn!("{}: {}, fact skipped", fact.fact_id, e);
                    outcomes.push_skipped(&fact.fact_id, e.to_string());
                }
            }
        }

        self.output.push_str("</xbrli:xbrl>\n");
        Ok(EmittedInstance {
            xml: self.output,
            contexts: contexts.len(),
            units: units.len(),
            outcomes,
        })
    }

    /// Render the instance and write it atomically to `path`
    pub fn write(self, facts: &[CanonicalFact], path: &Path) -> Result<EmitReport> {
        self.build(facts)?.write(path)
    }

    /// Qualified element name of a fact
    fn element_name(&self, fact: &CanonicalFact) -> Result<String> {
        let (prefix, local) = fact.concept_parts();
        if !is_ncname(local) {
            return Err(Error::Validation {
                key: fact.fact_id.clone(),
                value: fact.concept.clone(),
                expected: "a concept whose local name is an XML NCName".to_string(),
            });
        }
        let (prefix, _) = self.taxonomy.resolve(prefix)?;
        Ok(format!("{}:{}", prefix, local))
    }

    fn generate_root_start(&mut self) {
        self.output.push_str("<xbrli:xbrl");
        for (prefix, uri) in self.taxonomy.namespaces() {
            self.output.push_str(&format!(
                "\n    xmlns:{}=\"{}\"",
                prefix,
                escape_xml(uri)
            ));
        }
        self.output.push_str(">\n");
    }

    fn generate_schema_ref(&mut self) {
        self.output.push_str(&format!(
            "  <link:schemaRef xlink:type=\"simple\" xlink:href=\"{}\"/>\n",
            escape_xml(self.taxonomy.entrypoint())
        ));
    }

    fn generate_context(&mut self, context: &Context) {
        let identifier = context.identifier();
        self.output.push_str(&format!(
            "  <xbrli:context id=\"{}\">\n",
            escape_xml(&context.id)
        ));
        self.output.push_str("    <xbrli:entity>\n");
        self.output.push_str(&format!(
            "      <xbrli:identifier scheme=\"{}\">{}</xbrli:identifier>\n",
            escape_xml(&identifier.scheme),
            escape_xml(&identifier.value)
        ));
        self.output.push_str("    </xbrli:entity>\n");
        self.output.push_str("    <xbrli:period>\n");
        match &context.period {
            Period::Instant { instant } => {
                self.output.push_str(&format!(
                    "      <xbrli:instant>{}</xbrli:instant>\n",
                    escape_xml(instant)
                ));
            }
            Period::Duration {
                start_date,
                end_date,
            } => {
                self.output.push_str(&format!(
                    "      <xbrli:startDate>{}</xbrli:startDate>\n",
                    escape_xml(start_date)
                ));
                self.output.push_str(&format!(
                    "      <xbrli:endDate>{}</xbrli:endDate>\n",
                    escape_xml(end_date)
                ));
            }
        }
        self.output.push_str("    </xbrli:period>\n");
        self.output.push_str("  </xbrli:context>\n");
    }

    fn generate_unit(&mut self, unit: &Unit) {
        self.output.push_str(&format!(
            "  <xbrli:unit id=\"{}\">\n    <xbrli:measure>{}</xbrli:measure>\n  </xbrli:unit>\n",
            escape_xml(&unit.id),
            escape_xml(&unit.measure)
        ));
    }

    fn generate_fact(&mut self, name: &str, fact: &CanonicalFact) {
        debug!("{} -> {} = {}", fact.fact_id, name, fact.canonical_value);
        self.output.push_str(&format!(
            "  <{} contextRef=\"{}\"",
            name,
            escape_xml(&fact.context_ref)
        ));
        if let Some(unit_ref) = &fact.unit_ref {
            self.output
                .push_str(&format!(" unitRef=\"{}\"", escape_xml(unit_ref)));
        }
        if let Some(decimals) = &fact.decimals {
            self.output.push_str(&format!(" decimals=\"{}\"", decimals));
        }
        self.output.push_str(&format!(
            ">{}</{}>\n",
            escape_xml(&fact.canonical_value),
            name
        ));
    }
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

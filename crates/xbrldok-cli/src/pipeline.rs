//! DOCX to XBRL pipeline
//!
//! Four stages run strictly in order, each persisting its artifact before the
//! next one starts:
//!
//! ```text
//! report.docx ──extract──► raw_facts.json ──normalize──► canonical_facts.json
//!             ──emit──► report.xbrl ──validate──► validation.txt
//! ```
//!
//! A stage that yields no usable facts, and any normalization failure, stops
//! the run. Validation is advisory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::warn;

use xbrldok_core::artifact::{write_canonical_facts, write_raw_facts};
use xbrldok_core::{
    CanonicalFact, Contexts, FactNormalizer, FactRegistry, Outcome, ProjectConfig, RawFact,
    Taxonomy, TransformRegistry, TransformTable, Units,
};
use xbrldok_instance::{EmitReport, InstanceEmitter};
use xbrldok_ooxml::ContentControlExtractor;
use xbrldok_validate::{Expected, ValidationAdapter, ValidationReport};

pub const RAW_FACTS_FILE: &str = "raw_facts.json";
pub const CANONICAL_FACTS_FILE: &str = "canonical_facts.json";
pub const INSTANCE_FILE: &str = "report.xbrl";
pub const VALIDATION_FILE: &str = "validation.txt";

const RULE_WIDTH: usize = 70;

/// Paths of the files a run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub raw_facts: PathBuf,
    pub canonical_facts: PathBuf,
    pub instance: PathBuf,
    pub validation: PathBuf,
}

impl Artifacts {
    /// Standard file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            raw_facts: dir.join(RAW_FACTS_FILE),
            canonical_facts: dir.join(CANONICAL_FACTS_FILE),
            instance: dir.join(INSTANCE_FILE),
            validation: dir.join(VALIDATION_FILE),
        }
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub raw_facts: usize,
    pub canonical_facts: usize,
    pub emitted_facts: usize,
    /// Validation status line, `None` when validation was not requested
    pub validation: Option<String>,
    pub validation_passed: Option<bool>,
    pub duration_secs: f64,
    /// Every file written, in the order it was written
    pub artifacts: Vec<PathBuf>,
}

impl PipelineSummary {
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let validation = self.validation.as_deref().unwrap_or("NOT RUN");

        let mut lines = vec![
            rule.clone(),
            "PIPELINE SUMMARY".to_string(),
            rule.clone(),
            format!("Input DOCX:        {}", self.input.display()),
            format!("Output XBRL:       {}", self.output.display()),
            String::new(),
            format!("Raw facts:         {}", self.raw_facts),
            format!("Canonical facts:   {}", self.canonical_facts),
            format!("Emitted facts:     {}", self.emitted_facts),
            format!("Validation:        {}", validation),
            String::new(),
            format!("Duration:          {:.2} seconds", self.duration_secs),
            String::new(),
            "Artifacts:".to_string(),
        ];
        lines.extend(self.artifacts.iter().map(|p| format!("  {}", p.display())));
        lines.push(rule);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// A configured end-to-end run over one document
pub struct Pipeline {
    input: PathBuf,
    config: ProjectConfig,
    artifacts: Artifacts,
    validator: Option<ValidationAdapter>,
}

impl Pipeline {
    /// Run `input` against the registries in `config`, writing into `out_dir`
    pub fn new(input: impl Into<PathBuf>, config: ProjectConfig, out_dir: impl AsRef<Path>) -> Self {
        Self {
            input: input.into(),
            config,
            artifacts: Artifacts::in_dir(out_dir),
            validator: Some(ValidationAdapter::new()),
        }
    }

    pub fn with_validator(mut self, adapter: ValidationAdapter) -> Self {
        self.validator = Some(adapter);
        self
    }

    pub fn without_validation(mut self) -> Self {
        self.validator = None;
        self
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Run every stage, printing the progress trail to stdout
    pub fn run(&self) -> Result<PipelineSummary> {
        let started = Instant::now();

        banner("DOCX -> XBRL PIPELINE");
        println!("Input:  {}", self.input.display());
        println!("Output: {}", self.artifacts.instance.display());
        println!();

        println!("Loading configuration...");
        let registries = self
            .config
            .load()
            .context("Failed to load configuration registries")?;
        for path in [
            &self.config.facts,
            &self.config.transforms,
            &self.config.contexts,
            &self.config.units,
            &self.config.taxonomy,
        ] {
            println!("  [OK] {}", path.display());
        }
        println!();

        let mut artifacts = Vec::new();

        stage(1, "Extract Content Controls");
        let raw = extract(&self.input, &self.artifacts.raw_facts)?;
        artifacts.push(self.artifacts.raw_facts.clone());

        stage(2, "Normalize Values");
        let canonical = normalize(
            &registries.facts,
            &registries.transforms,
            &raw,
            &self.artifacts.canonical_facts,
        )?;
        artifacts.push(self.artifacts.canonical_facts.clone());

        stage(3, "Emit XBRL Instance");
        let emitted = emit(
            &registries.contexts,
            &registries.units,
            &registries.taxonomy,
            &canonical,
            &self.artifacts.instance,
        )?;
        artifacts.push(self.artifacts.instance.clone());

        let mut summary = PipelineSummary {
            input: self.input.clone(),
            output: self.artifacts.instance.clone(),
            raw_facts: raw.len(),
            canonical_facts: canonical.len(),
            emitted_facts: emitted.fact_count(),
            validation: None,
            validation_passed: None,
            duration_secs: 0.0,
            artifacts,
        };

        if let Some(adapter) = &self.validator {
            stage(4, "Validate XBRL");
            let expected = Expected::counts(emitted.contexts, emitted.units);
            match validate(adapter, &self.artifacts.instance, &expected, &self.artifacts.validation) {
                Ok(report) => {
                    summary.validation = Some(report.status().to_string());
                    summary.validation_passed = Some(report.passed);
                    summary.artifacts.push(self.artifacts.validation.clone());
                }
                Err(e) => {
                    warn!("Validation not completed: {:#}", e);
                    println!("  [WARNING] Validation not completed: {:#}", e);
                    summary.validation = Some("NOT COMPLETED".to_string());
                    summary.validation_passed = Some(false);
                }
            }
            println!();
        }

        summary.duration_secs = started.elapsed().as_secs_f64();
        Ok(summary)
    }
}

/// Extract tagged content controls from `input` into the raw-facts artifact
///
/// Fails when the document has no tagged controls.
pub fn extract(input: &Path, output: &Path) -> Result<Vec<RawFact>> {
    let batch = ContentControlExtractor::new()
        .extract(input)
        .with_context(|| format!("Failed to extract content controls: {}", input.display()))?;

    for (key, reason) in batch.skipped() {
        println!("  [SKIP] {}: {}", key, reason);
    }
    let skipped = batch.skipped_count();
    let facts = batch.into_values();
    if facts.is_empty() {
        bail!("No tagged content controls found in {}", input.display());
    }
    for fact in &facts {
        println!("  #{:<3} {:<32} {:?}", fact.position, fact.fact_id, fact.raw_text);
    }

    write_raw_facts(output, &facts)
        .with_context(|| format!("Failed to write raw facts: {}", output.display()))?;
    println!();
    println!("  {} tagged, {} untagged", facts.len(), skipped);
    println!("  Created: {}", output.display());
    println!();
    Ok(facts)
}

/// Normalize raw facts into the canonical-facts artifact
///
/// The artifact is written only when every fact normalized. On failure any
/// canonical facts left by an earlier run are removed, so `emit` cannot pick
/// up a stale or partial set.
pub fn normalize(
    facts: &FactRegistry,
    table: &TransformTable,
    raw: &[RawFact],
    output: &Path,
) -> Result<Vec<CanonicalFact>> {
    let transforms =
        TransformRegistry::from_table(table).context("Invalid transformation whitelist")?;
    let report = FactNormalizer::new(facts, &transforms).normalize(raw);

    for item in report.outcomes.items() {
        match &item.outcome {
            Outcome::Ok(value) => println!("  [OK]   {:<32} {}", item.key, value),
            Outcome::Skipped(reason) => println!("  [SKIP] {:<32} {}", item.key, reason),
            Outcome::Failed(e) => println!("  [FAIL] {:<32} {}", item.key, e),
        }
    }
    println!();
    println!(
        "  {} normalized, {} skipped, {} failed",
        report.facts.len(),
        report.outcomes.skipped_count(),
        report.error_count()
    );

    if report.facts.is_empty() || !report.is_success() {
        discard_stale(output)?;
    }
    if report.facts.is_empty() {
        bail!("No facts were normalized ({} errors)", report.error_count());
    }
    if !report.is_success() {
        bail!(
            "{} of {} facts failed normalization",
            report.error_count(),
            raw.len()
        );
    }

    write_canonical_facts(output, &report.facts)
        .with_context(|| format!("Failed to write canonical facts: {}", output.display()))?;
    println!("  Created: {}", output.display());
    println!();
    Ok(report.facts)
}

/// Remove an artifact left behind by an earlier run of a stage that failed now
fn discard_stale(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            warn!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to remove stale artifact: {}", path.display()))
        }
    }
}

/// Write canonical facts as an XBRL instance
///
/// Nothing is written unless at least one fact element can be rendered.
pub fn emit(
    contexts: &Contexts,
    units: &Units,
    taxonomy: &Taxonomy,
    facts: &[CanonicalFact],
    output: &Path,
) -> Result<EmitReport> {
    if facts.is_empty() {
        bail!("No canonical facts to emit");
    }
    let instance = match InstanceEmitter::new(contexts, units, taxonomy).build(facts) {
        Ok(instance) => instance,
        Err(e) => {
            discard_stale(output)?;
            return Err(e)
                .with_context(|| format!("Failed to emit instance: {}", output.display()));
        }
    };

    for (key, reason) in instance.outcomes.skipped() {
        println!("  [SKIP] {}: {}", key, reason);
    }
    if instance.fact_count() == 0 {
        discard_stale(output)?;
        bail!("No facts could be emitted to {}", output.display());
    }

    let report = instance
        .write(output)
        .with_context(|| format!("Failed to write instance: {}", output.display()))?;
    println!(
        "  {} contexts, {} units, {} facts ({} bytes)",
        report.contexts,
        report.units,
        report.fact_count(),
        report.bytes
    );
    println!("  Created: {}", output.display());
    println!();

    Ok(report)
}

/// Validate an instance and write the validation report
pub fn validate(
    adapter: &ValidationAdapter,
    instance: &Path,
    expected: &Expected,
    output: &Path,
) -> Result<ValidationReport> {
    let report = adapter
        .validate(instance, expected)
        .with_context(|| format!("Failed to validate {}", instance.display()))?;

    for reason in &report.fallbacks {
        println!("  [SKIP] {}", reason);
    }
    println!("  Engine:   {}", report.engine);
    println!("  Errors:   {}", report.errors.len());
    println!("  Warnings: {}", report.warnings.len());
    println!("  Info:     {}", report.info.len());
    for line in &report.errors {
        println!("    {}", line);
    }

    report
        .write(output)
        .with_context(|| format!("Failed to write validation report: {}", output.display()))?;
    println!("  Created: {}", output.display());
    println!("  [{}]", report.status());
    Ok(report)
}

fn banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{}", rule);
    println!("{}", title);
    println!("{}", rule);
}

fn stage(number: usize, title: &str) {
    banner(&format!("STEP {}: {}", number, title));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifacts_in_dir() {
        let artifacts = Artifacts::in_dir("build");
        assert_eq!(artifacts.raw_facts, Path::new("build/raw_facts.json"));
        assert_eq!(artifacts.canonical_facts, Path::new("build/canonical_facts.json"));
        assert_eq!(artifacts.instance, Path::new("build/report.xbrl"));
        assert_eq!(artifacts.validation, Path::new("build/validation.txt"));
    }

    #[test]
    fn test_summary_render() {
        let summary = PipelineSummary {
            input: PathBuf::from("report.docx"),
            output: PathBuf::from("build/report.xbrl"),
            raw_facts: 11,
            canonical_facts: 11,
            emitted_facts: 10,
            validation: None,
            validation_passed: None,
            duration_secs: 0.25,
            artifacts: vec![PathBuf::from("build/raw_facts.json")],
        };
        let text = summary.render();
        assert!(text.contains("Emitted facts:     10"));
        assert!(text.contains("Validation:        NOT RUN"));
        assert!(text.contains("Duration:          0.25 seconds"));
        assert!(text.contains("  build/raw_facts.json\n"));
    }

    #[test]
    fn test_emit_without_renderable_facts_writes_nothing() {
        use tempfile::TempDir;
        use xbrldok_core::{Context, Unit};

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("report.xbrl");
        fs::write(&output, "<stale/>").unwrap();

        let contexts = Contexts::new(vec![Context::instant(
            "C_2025",
            "http://standards.iso.org/iso/17442",
            "LEI0000TEST",
            "2025-12-31",
        )])
        .unwrap();
        let units = Units::new(vec![Unit::new("EUR", "iso4217:EUR")]).unwrap();
        let taxonomy = Taxonomy::new("https://example.org/gri-2025.xsd", Vec::new(), None).unwrap();
        let fact = CanonicalFact {
            fact_id: "revenue_2025".to_string(),
            raw_value: "1 234,56".to_string(),
            canonical_value: "1234.56".to_string(),
            concept: "gri:Revenue".to_string(),
            item_type: "xbrli:monetaryItemType".to_string(),
            context_ref: "C_2025".to_string(),
            decimals: None,
            unit_ref: Some("EUR".to_string()),
        };

        let err = emit(&contexts, &units, &taxonomy, &[fact], &output).unwrap_err();
        assert!(err.to_string().contains("No facts could be emitted"));
        assert!(!output.exists());
    }

    #[test]
    fn test_summary_json_keys() {
        let summary = PipelineSummary {
            input: PathBuf::from("report.docx"),
            output: PathBuf::from("build/report.xbrl"),
            raw_facts: 1,
            canonical_facts: 1,
            emitted_facts: 1,
            validation: Some("PASSED".to_string()),
            validation_passed: Some(true),
            duration_secs: 1.0,
            artifacts: Vec::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["canonicalFacts"], 1);
        assert_eq!(json["validationPassed"], true);
        assert_eq!(json["durationSecs"], 1.0);
    }
}

//! Validator trait and the report every validator produces

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Context and unit counts the caller knows the instance should contain
///
/// The emitter reports these; a structural check compares them against what
/// it actually finds in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expected {
    pub contexts: Option<usize>,
    pub units: Option<usize>,
}

impl Expected {
    /// Expect exactly this many contexts and units
    pub fn counts(contexts: usize, units: usize) -> Self {
        Self {
            contexts: Some(contexts),
            units: Some(units),
        }
    }
}

/// Element counts found by a structural pass over the instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructureCounts {
    pub contexts: usize,
    pub units: usize,
    pub elements: usize,
}

impl StructureCounts {
    /// Every element that is not a context, a unit or the root
    ///
    /// Children of contexts and units (entity, period, measure) and the
    /// schema reference are counted too, hence approximate.
    pub fn facts_approx(&self) -> usize {
        self.elements.saturating_sub(self.contexts + self.units + 1)
    }
}

/// Verdict on one instance document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Name of the validator that produced the verdict
    pub engine: String,
    pub instance: PathBuf,
    pub passed: bool,
    /// True when only well-formedness and counts were checked
    pub basic_only: bool,
    pub exit_code: Option<i32>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
    pub counts: Option<StructureCounts>,
    /// Verbatim engine output
    pub output: String,
    /// Why earlier validators in the chain were passed over
    pub fallbacks: Vec<String>,
}

impl ValidationReport {
    /// An empty passing report for `engine`
    pub fn new(engine: impl Into<String>, instance: &Path) -> Self {
        Self {
            engine: engine.into(),
            instance: instance.to_path_buf(),
            passed: true,
            basic_only: false,
            exit_code: None,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            counts: None,
            output: String::new(),
            fallbacks: Vec::new(),
        }
    }

    /// Short status word for summaries
    pub fn status(&self) -> &'static str {
        match (self.passed, self.basic_only) {
            (true, false) => "PASSED",
            (true, true) => "PASSED (basic-only)",
            (false, _) => "FAILED",
        }
    }

    /// Text form written to `validation.txt`
    pub fn render(&self) -> String {
        let rule = "=".repeat(70);
        let mut out = String::new();

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "XBRL VALIDATION REPORT");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out);
        let _ = writeln!(out, "Instance: {}", self.instance.display());
        match self.exit_code {
            Some(code) => {
                let _ = writeln!(out, "Engine:   {} (exit {})", self.engine, code);
            }
            None if self.basic_only => {
                let _ = writeln!(out, "Engine:   {} (basic-only)", self.engine);
            }
            None => {
                let _ = writeln!(out, "Engine:   {}", self.engine);
            }
        }
        for reason in &self.fallbacks {
            let _ = writeln!(out, "Skipped:  {}", reason);
        }
        let _ = writeln!(out, "Result:   {}", self.status());
        let _ = writeln!(out);
        let _ = writeln!(out, "Errors:   {}", self.errors.len());
        let _ = writeln!(out, "Warnings: {}", self.warnings.len());
        let _ = writeln!(out, "Info:     {}", self.info.len());

        if let Some(counts) = &self.counts {
            let _ = writeln!(out);
            let _ = writeln!(out, "Contexts:       {}", counts.contexts);
            let _ = writeln!(out, "Units:          {}", counts.units);
            let _ = writeln!(out, "Elements:       {}", counts.elements);
            let _ = writeln!(out, "Facts (approx): {}", counts.facts_approx());
        }

        if self.output.is_empty() {
            let messages: Vec<&String> = self
                .errors
                .iter()
                .chain(&self.warnings)
                .chain(&self.info)
                .collect();
            if !messages.is_empty() {
                let _ = writeln!(out);
                for line in messages {
                    let _ = writeln!(out, "{}", line);
                }
            }
        } else {
            let _ = writeln!(out);
            out.push_str(&self.output);
            if !self.output.ends_with('\n') {
                out.push('\n');
            }
        }

        out
    }

    /// Write the rendered report atomically
    pub fn write(&self, path: &Path) -> xbrldok_core::Result<()> {
        xbrldok_core::artifact::atomic_write(path, self.render().as_bytes())
    }
}

/// A validation engine that can judge an instance document
pub trait InstanceValidator: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Whether this validator can run in the current environment
    fn is_available(&self) -> bool {
        true
    }

    /// Validate the instance at `path`
    ///
    /// Returns `Ok` with a failing report when the instance is invalid;
    /// `Err` only when no verdict could be reached.
    fn validate(&self, path: &Path, expected: &Expected) -> Result<ValidationReport>;
}

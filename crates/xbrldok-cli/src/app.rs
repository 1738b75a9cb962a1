//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use xbrldok_core::artifact::{read_canonical_facts, read_raw_facts, write_json};
use xbrldok_core::ProjectConfig;
use xbrldok_ooxml::{esg_sample, ESG_SAMPLE_VALUES};
use xbrldok_validate::{Expected, ExternalValidator, ValidationAdapter, DEFAULT_COMMAND};

use crate::logging;
use crate::pipeline::{self, Pipeline};

#[derive(Parser)]
#[command(name = "xbrldok")]
#[command(author, version, about = "DOCX content controls to XBRL instances", long_about = None)]
struct Cli {
    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tagged content controls from a DOCX file
    Extract {
        /// Input DOCX file
        input: PathBuf,

        /// Raw facts JSON output
        #[arg(short, long, default_value = "build/raw_facts.json")]
        output: PathBuf,
    },

    /// Normalize raw facts against the fact registry
    Normalize {
        /// Raw facts JSON input
        #[arg(default_value = "build/raw_facts.json")]
        input: PathBuf,

        /// Canonical facts JSON output
        #[arg(short, long, default_value = "build/canonical_facts.json")]
        output: PathBuf,

        /// Project root containing model/ and taxonomy/
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Emit an XBRL instance from canonical facts
    Emit {
        /// Canonical facts JSON input
        #[arg(default_value = "build/canonical_facts.json")]
        input: PathBuf,

        /// XBRL instance output
        #[arg(short, long, default_value = "build/report.xbrl")]
        output: PathBuf,

        /// Project root containing model/ and taxonomy/
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Validate an XBRL instance (exits non-zero when it fails)
    Validate {
        /// XBRL instance to validate
        #[arg(default_value = "build/report.xbrl")]
        input: PathBuf,

        /// Validation report output
        #[arg(short, long, default_value = "build/validation.txt")]
        output: PathBuf,

        /// Expected number of contexts (structural check)
        #[arg(long)]
        contexts: Option<usize>,

        /// Expected number of units (structural check)
        #[arg(long)]
        units: Option<usize>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Run extract, normalize, emit and validate in one go
    Run {
        /// Input DOCX file
        input: PathBuf,

        /// Project root containing model/ and taxonomy/
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Directory for all artifacts
        #[arg(short, long, default_value = "build")]
        out_dir: PathBuf,

        /// Skip the validation step
        #[arg(long)]
        no_validate: bool,

        /// Also write the run summary as JSON
        #[arg(long)]
        summary: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Write a sample ESG report with tagged content controls
    Sample {
        /// Output DOCX file
        #[arg(default_value = "sample_report.docx")]
        output: PathBuf,
    },
}

/// Options for the external XBRL processor
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// External processor command
    #[arg(long, default_value = DEFAULT_COMMAND)]
    pub engine: String,

    /// Seconds before the external processor is killed
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    /// Skip the external processor; structural check only
    #[arg(long)]
    pub basic: bool,
}

impl Default for EngineArgs {
    fn default() -> Self {
        Self {
            engine: DEFAULT_COMMAND.to_string(),
            timeout: 300,
            basic: false,
        }
    }
}

impl EngineArgs {
    /// The validation chain these options describe
    pub fn adapter(&self) -> ValidationAdapter {
        if self.basic {
            return ValidationAdapter::structural_only();
        }
        ValidationAdapter::with_external(
            ExternalValidator::new()
                .with_command(&self.engine)
                .with_timeout(Duration::from_secs(self.timeout)),
        )
    }
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Extract { input, output } => {
            extract_command(&input, &output)?;
        }
        Commands::Normalize {
            input,
            output,
            project,
        } => {
            normalize_command(&input, &output, &project)?;
        }
        Commands::Emit {
            input,
            output,
            project,
        } => {
            emit_command(&input, &output, &project)?;
        }
        Commands::Validate {
            input,
            output,
            contexts,
            units,
            engine,
        } => {
            let expected = Expected { contexts, units };
            validate_command(&input, &output, &engine.adapter(), &expected)?;
        }
        Commands::Run {
            input,
            project,
            out_dir,
            no_validate,
            summary,
            engine,
        } => {
            let adapter = (!no_validate).then(|| engine.adapter());
            run_command(&input, &project, &out_dir, adapter, summary.as_deref())?;
        }
        Commands::Sample { output } => {
            sample_command(&output)?;
        }
    }

    Ok(())
}

/// Execute the extract command
pub fn extract_command(input: &Path, output: &Path) -> Result<()> {
    println!("xbrldok v{}", xbrldok_core::VERSION);
    println!("Extracting: {}", input.display());
    println!();

    pipeline::extract(input, output)?;
    Ok(())
}

/// Execute the normalize command
pub fn normalize_command(input: &Path, output: &Path, project: &Path) -> Result<()> {
    println!("xbrldok v{}", xbrldok_core::VERSION);
    println!("Normalizing: {}", input.display());
    println!();

    let config = ProjectConfig::from_root(project);
    let facts = config
        .load_facts()
        .with_context(|| format!("Failed to load fact registry: {}", config.facts.display()))?;
    let transforms = config.load_transforms().with_context(|| {
        format!(
            "Failed to load transformation whitelist: {}",
            config.transforms.display()
        )
    })?;
    let raw = read_raw_facts(input)
        .with_context(|| format!("Failed to read raw facts: {}", input.display()))?;
    if raw.is_empty() {
        bail!("No raw facts in {}", input.display());
    }

    pipeline::normalize(&facts, &transforms, &raw, output)?;
    Ok(())
}

/// Execute the emit command
pub fn emit_command(input: &Path, output: &Path, project: &Path) -> Result<()> {
    println!("xbrldok v{}", xbrldok_core::VERSION);
    println!("Emitting: {}", input.display());
    println!();

    let config = ProjectConfig::from_root(project);
    let contexts = config
        .load_contexts()
        .with_context(|| format!("Failed to load contexts: {}", config.contexts.display()))?;
    let units = config
        .load_units()
        .with_context(|| format!("Failed to load units: {}", config.units.display()))?;
    let taxonomy = config
        .load_taxonomy()
        .with_context(|| format!("Failed to load taxonomy: {}", config.taxonomy.display()))?;
    let facts = read_canonical_facts(input)
        .with_context(|| format!("Failed to read canonical facts: {}", input.display()))?;

    pipeline::emit(&contexts, &units, &taxonomy, &facts, output)?;
    Ok(())
}

/// Execute the validate command
///
/// Unlike the `run` command, a failing verdict is an error here.
pub fn validate_command(
    input: &Path,
    output: &Path,
    adapter: &ValidationAdapter,
    expected: &Expected,
) -> Result<()> {
    println!("xbrldok v{}", xbrldok_core::VERSION);
    println!("Validating: {}", input.display());
    println!();

    let report = pipeline::validate(adapter, input, expected, output)?;
    if !report.passed {
        bail!(
            "Validation failed with {} error(s), see {}",
            report.errors.len(),
            output.display()
        );
    }
    Ok(())
}

/// Execute the run command
pub fn run_command(
    input: &Path,
    project: &Path,
    out_dir: &Path,
    adapter: Option<ValidationAdapter>,
    summary_path: Option<&Path>,
) -> Result<()> {
    println!("xbrldok v{}", xbrldok_core::VERSION);

    let pipeline = Pipeline::new(input, ProjectConfig::from_root(project), out_dir);
    let pipeline = match adapter {
        Some(adapter) => pipeline.with_validator(adapter),
        None => pipeline.without_validation(),
    };

    let summary = pipeline.run()?;
    print!("{}", summary.render());

    if let Some(path) = summary_path {
        write_json(path, &summary)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
        println!("Summary: {}", path.display());
    }
    Ok(())
}

/// Execute the sample command
pub fn sample_command(output: &Path) -> Result<()> {
    println!("xbrldok v{}", xbrldok_core::VERSION);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    esg_sample()
        .write_to_file(output)
        .with_context(|| format!("Failed to write sample report: {}", output.display()))?;

    println!("  Created: {}", output.display());
    println!("  {} tagged content controls", ESG_SAMPLE_VALUES.len());
    Ok(())
}

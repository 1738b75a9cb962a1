//! xbrldok CLI - Command-line interface library
//!
//! This library provides the CLI functionality for xbrldok:
//! - Extract: tagged DOCX content controls to raw facts
//! - Normalize: raw facts to canonical facts
//! - Emit: canonical facts to an XBRL instance
//! - Validate: check an instance with Arelle or structurally
//! - Run: all of the above
//!
//! # Library Usage
//!
//! ```no_run
//! use std::path::Path;
//! use xbrldok_cli::{run_command, EngineArgs};
//!
//! run_command(
//!     Path::new("report.docx"),
//!     Path::new("."),
//!     Path::new("build"),
//!     Some(EngineArgs::default().adapter()),
//!     None,
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Generate a sample report and run the whole pipeline on it
//! xbrldok sample report.docx
//! xbrldok run report.docx --out-dir build
//!
//! # Or stage by stage
//! xbrldok extract report.docx
//! xbrldok normalize
//! xbrldok emit
//! xbrldok validate --basic
//! ```

pub mod app;
pub mod logging;
pub mod pipeline;

// Re-export main entry point and types
pub use app::{
    emit_command, extract_command, normalize_command, run_command, sample_command,
    validate_command,
};
pub use app::{run_cli, EngineArgs};
pub use pipeline::{Artifacts, Pipeline, PipelineSummary};

//! # xbrldok-instance
//!
//! XBRL instance generation for xbrldok.
//!
//! The [`InstanceEmitter`] turns canonical facts plus the context, unit and
//! taxonomy registries into a namespace-correct instance document.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use xbrldok_core::artifact::read_canonical_facts;
//! use xbrldok_core::ProjectConfig;
//! use xbrldok_instance::InstanceEmitter;
//!
//! let config = ProjectConfig::from_root(".");
//! let (contexts, units, taxonomy) =
//!     (config.load_contexts()?, config.load_units()?, config.load_taxonomy()?);
//! let facts = read_canonical_facts(Path::new("build/canonical_facts.json"))?;
//!
//! let report = InstanceEmitter::new(&contexts, &units, &taxonomy)
//!     .write(&facts, Path::new("build/report.xbrl"))?;
//! println!("{} facts written", report.fact_count());
//! # Ok::<(), xbrldok_core::Error>(())
//! ```

pub mod emitter;

pub use emitter::{EmitReport, EmittedInstance, InstanceEmitter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

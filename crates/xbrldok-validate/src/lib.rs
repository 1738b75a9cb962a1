//! # xbrldok-validate
//!
//! Validation of emitted XBRL instances.
//!
//! The [`ValidationAdapter`] runs an external XBRL processor when one is
//! installed and falls back to a structural check otherwise. Validation is
//! advisory: a failing verdict is a report, not an error.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use xbrldok_validate::{Expected, ValidationAdapter};
//!
//! let report = ValidationAdapter::new()
//!     .validate(Path::new("build/report.xbrl"), &Expected::counts(2, 3))?;
//! println!("{}: {}", report.engine, report.status());
//! report.write(Path::new("build/validation.txt"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapter;
pub mod error;
pub mod external;
pub mod structural;
pub mod validator;

pub use adapter::ValidationAdapter;
pub use error::{Result, ValidateError};
pub use external::{classify_output, ExternalValidator, DEFAULT_COMMAND, DEFAULT_TIMEOUT};
pub use structural::{StructuralValidator, XBRLI_NAMESPACE};
pub use validator::{Expected, InstanceValidator, StructureCounts, ValidationReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # xbrldok-core
//!
//! Core library for xbrldok: turns raw indicator values lifted from a
//! report document into canonical XBRL facts.
//!
//! This crate provides:
//! - The fact data model (`RawFact`, `FactDefinition`, `CanonicalFact`,
//!   `Context`, `Unit`)
//! - The transformation registry (`ixt:*` parsers)
//! - The fact normalizer with exhaustive, per-fact outcomes
//! - Loading of the TOML configuration registries
//! - Persistence of the intermediate JSON artifacts
//!
//! ## Example
//!
//! ```
//! use xbrldok_core::transform::TransformRegistry;
//!
//! let registry = TransformRegistry::with_builtins();
//! let value = registry.apply("ixt:num-comma-decimal", "1 234,56")?;
//! assert_eq!(value, "1234.56");
//! # Ok::<(), xbrldok_core::Error>(())
//! ```

pub mod artifact;
pub mod batch;
pub mod config;
pub mod error;
pub mod lexical;
pub mod model;
pub mod normalize;
pub mod transform;

pub use batch::{BatchResult, ItemOutcome, Outcome};
pub use config::{
    Contexts, FactRegistry, ProjectConfig, Registries, Taxonomy, TransformTable, Units,
};
pub use error::{Error, ErrorKind, LookupTarget, Result};
pub use model::{
    CanonicalFact, Context, Decimals, Entity, EntityIdentifier, FactDefinition, ItemType,
    Period, RawFact, Unit,
};
pub use normalize::{FactNormalizer, NormalizeReport};
pub use transform::{Transform, TransformError, TransformRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

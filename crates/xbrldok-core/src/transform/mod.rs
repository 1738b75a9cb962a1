//! Transformation registry
//!
//! A transformation turns a human-formatted string ("1 234,56",
//! "31.12.2025") into the lexical form an XBRL instance requires
//! ("1234.56", "2025-12-31"). Transformations are pure: they either return
//! the canonical string or reject the input, and never guess.
//!
//! Each transformation implements [`Transform`]; the [`TransformRegistry`]
//! is the dispatch table that maps registry names such as
//! `ixt:num-comma-decimal` onto implementations.
//!
//! # Example
//!
//! ```
//! use xbrldok_core::transform::TransformRegistry;
//!
//! let registry = TransformRegistry::with_builtins();
//! assert_eq!(registry.apply("ixt:date-day-month-year", "31.12.2025")?, "2025-12-31");
//! assert!(registry.apply("ixt:date-day-month-year", "45.13.2025").is_err());
//! # Ok::<(), xbrldok_core::Error>(())
//! ```

pub mod date;
pub mod numeric;
pub mod text;

use std::fmt;

use tracing::debug;

use crate::config::TransformTable;
use crate::error::{Error, LookupTarget, Result};

pub use date::{DateDayMonthYear, DateDayMonthYearSlash, DateMonthDayYear};
pub use numeric::{NumCommaDecimal, NumDotDecimal, NumUnitDecimal};
pub use text::{BooleanFalse, BooleanTrue, NormalizeSpace};

/// Registry name of the whitespace normalization applied by default
pub const NORMALIZE_SPACE: &str = "ixt:normalize-space";

/// Rejection of an input by a transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformError {
    /// The offending input, verbatim
    pub value: String,
    /// The pattern the transformation expected
    pub expected: String,
}

impl TransformError {
    pub fn new(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Attach the key of the item being transformed
    pub fn into_error(self, key: impl Into<String>) -> Error {
        Error::Validation {
            key: key.into(),
            value: self.value,
            expected: self.expected,
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value '{}' (expected {})",
            self.value, self.expected
        )
    }
}

impl std::error::Error for TransformError {}

/// A named, side-effect free parser from raw text to a lexical value
pub trait Transform: Send + Sync {
    /// Registry name, e.g. `ixt:num-dot-decimal`
    fn name(&self) -> &'static str;

    /// Human-readable description of accepted input
    fn input_pattern(&self) -> &'static str;

    /// Lexical form of the output
    fn output_form(&self) -> &'static str;

    /// Parse the input or reject it
    fn apply(&self, raw: &str) -> std::result::Result<String, TransformError>;
}

/// Dispatch table of transformations
pub struct TransformRegistry {
    transforms: Vec<Box<dyn Transform>>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transforms", &self.names())
            .finish()
    }
}

impl TransformRegistry {
    /// Create a registry with no transformations
    pub fn empty() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Create a registry with every built-in transformation
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(NumDotDecimal));
        registry.register(Box::new(NumCommaDecimal));
        registry.register(Box::new(NumUnitDecimal));
        registry.register(Box::new(DateDayMonthYear));
        registry.register(Box::new(DateDayMonthYearSlash));
        registry.register(Box::new(DateMonthDayYear));
        registry.register(Box::new(BooleanTrue));
        registry.register(Box::new(BooleanFalse));
        registry.register(Box::new(NormalizeSpace));
        registry
    }

    /// Restrict the built-ins to the names whitelisted in a transforms table
    ///
    /// An empty table enables every built-in. A whitelisted name without an
    /// implementation is a configuration error. `ixt:normalize-space` stays
    /// available regardless, since facts without a transform rely on it.
    pub fn from_table(table: &TransformTable) -> Result<Self> {
        let builtins = Self::with_builtins();
        if table.is_empty() {
            return Ok(builtins);
        }

        for name in table.names() {
            if !builtins.contains(name) {
                return Err(Error::config(
                    name,
                    "transformation is whitelisted but has no implementation",
                ));
            }
        }

        let transforms = builtins
            .transforms
            .into_iter()
            .filter(|t| t.name() == NORMALIZE_SPACE || table.contains(t.name()))
            .collect();
        let registry = Self { transforms };
        debug!("Enabled transformations: {:?}", registry.names());
        Ok(registry)
    }

    /// Add a transformation, replacing any with the same name
    pub fn register(&mut self, transform: Box<dyn Transform>) {
        self.transforms.retain(|t| t.name() != transform.name());
        self.transforms.push(transform);
    }

    /// Names of all registered transformations
    pub fn names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Number of registered transformations
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Check whether a transformation is registered
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.iter().any(|t| t.name() == name)
    }

    /// Look up a transformation by name
    pub fn get(&self, name: &str) -> Result<&dyn Transform> {
        self.transforms
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
            .ok_or_else(|| Error::lookup(LookupTarget::Transform, name))
    }

    /// Apply a transformation by name
    ///
    /// Rejections become [`Error::Validation`] keyed by the transform name.
    pub fn apply(&self, name: &str, raw: &str) -> Result<String> {
        self.get(name)?
            .apply(raw)
            .map_err(|e| e.into_error(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_builtins_registered() {
        let registry = TransformRegistry::with_builtins();
        assert_eq!(registry.len(), 9);
        for name in [
            "ixt:num-dot-decimal",
            "ixt:num-comma-decimal",
            "ixt:num-unit-decimal",
            "ixt:date-day-month-year",
            "ixt:date-day-month-year-slash",
            "ixt:date-month-day-year",
            "ixt:boolean-true",
            "ixt:boolean-false",
            "ixt:normalize-space",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_unknown_transform_is_lookup_error() {
        let registry = TransformRegistry::with_builtins();
        let err = registry.apply("ixt:num-word", "twelve").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.key(), "ixt:num-word");
    }

    #[test]
    fn test_rejection_is_validation_error() {
        let registry = TransformRegistry::with_builtins();
        let err = registry
            .apply("ixt:date-day-month-year", "45.13.2025")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("45.13.2025"));
    }

    #[test]
    fn test_whitelist_restricts_registry() {
        let table: TransformTable = toml::from_str(
            r#"
[transforms."ixt:num-comma-decimal"]
description = "1 234,56 -> 1234.56"
"#,
        )
        .unwrap();
        let registry = TransformRegistry::from_table(&table).unwrap();
        assert!(registry.contains("ixt:num-comma-decimal"));
        assert!(registry.contains(NORMALIZE_SPACE));
        assert!(!registry.contains("ixt:num-dot-decimal"));
    }

    #[test]
    fn test_whitelist_with_unknown_name_fails() {
        let table: TransformTable = toml::from_str(
            r#"
[transforms."ixt:num-word-en"]
"#,
        )
        .unwrap();
        let err = TransformRegistry::from_table(&table).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.key(), "ixt:num-word-en");
    }

    #[test]
    fn test_register_replaces_same_name() {
        struct Upper;
        impl Transform for Upper {
            fn name(&self) -> &'static str {
                NORMALIZE_SPACE
            }
            fn input_pattern(&self) -> &'static str {
                "any text"
            }
            fn output_form(&self) -> &'static str {
                "upper-case text"
            }
            fn apply(&self, raw: &str) -> std::result::Result<String, TransformError> {
                Ok(raw.to_uppercase())
            }
        }

        let mut registry = TransformRegistry::with_builtins();
        registry.register(Box::new(Upper));
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.apply(NORMALIZE_SPACE, "abc").unwrap(), "ABC");
    }
}

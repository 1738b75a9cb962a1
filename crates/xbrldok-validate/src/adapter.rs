//! Validation adapter with fallback chain
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              ValidationAdapter               │
//! ├──────────────────────────────────────────────┤
//! │  1. ExternalValidator (arelleCmdLine)        │
//! │  2. StructuralValidator (basic-only)         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! A validator that is unavailable, cannot be started or times out hands
//! over to the next one. A verdict from any validator, passing or not, ends
//! the chain.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, ValidateError};
use crate::external::ExternalValidator;
use crate::structural::StructuralValidator;
use crate::validator::{Expected, InstanceValidator, ValidationReport};

/// Runs validators in priority order until one reaches a verdict
pub struct ValidationAdapter {
    validators: Vec<Box<dyn InstanceValidator>>,
}

impl Default for ValidationAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationAdapter {
    /// Default chain: `arelleCmdLine` then the structural check
    pub fn new() -> Self {
        Self::with_external(ExternalValidator::new())
    }

    /// Chain a configured external validator before the structural check
    pub fn with_external(external: ExternalValidator) -> Self {
        let mut adapter = Self::empty();
        adapter.add_validator(Box::new(external));
        adapter.add_validator(Box::new(StructuralValidator::new()));
        adapter
    }

    /// Only the structural check
    pub fn structural_only() -> Self {
        let mut adapter = Self::empty();
        adapter.add_validator(Box::new(StructuralValidator::new()));
        adapter
    }

    /// An adapter with no validators (for testing)
    pub fn empty() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Append a validator; validators run in the order they were added
    pub fn add_validator(&mut self, validator: Box<dyn InstanceValidator>) {
        debug!("Added validator: {}", validator.name());
        self.validators.push(validator);
    }

    /// Insert a validator at a priority position (lower runs first)
    pub fn insert_validator(&mut self, index: usize, validator: Box<dyn InstanceValidator>) {
        debug!("Inserted validator at position {}: {}", index, validator.name());
        self.validators.insert(index.min(self.validators.len()), validator);
    }

    pub fn validator_names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Validate the instance at `path` with the first validator that can
    ///
    /// The returned report lists, in `fallbacks`, every validator that was
    /// passed over and why.
    pub fn validate(&self, path: &Path, expected: &Expected) -> Result<ValidationReport> {
        if self.validators.is_empty() {
            return Err(ValidateError::Unavailable("no validators configured".to_string()));
        }

        let mut fallbacks = Vec::new();
        let mut last_error = None;

        for validator in &self.validators {
            if !validator.is_available() {
                debug!("Validator {} is not available, skipping", validator.name());
                fallbacks.push(format!("{}: not available", validator.name()));
                continue;
            }

            match validator.validate(path, expected) {
                Ok(mut report) => {
                    info!(
                        "Validated {} with {}: {}",
                        path.display(),
                        validator.name(),
                        report.status()
                    );
                    report.fallbacks = fallbacks;
                    return Ok(report);
                }
                Err(e) if e.is_fallback() => {
                    warn!("Validator {} failed: {}", validator.name(), e);
                    fallbacks.push(format!("{}: {}", validator.name(), e));
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ValidateError::Unavailable("no validator is available".to_string())
        }))
    }
}

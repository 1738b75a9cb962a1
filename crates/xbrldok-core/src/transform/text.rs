//! Boolean and whitespace transformations

use super::{Transform, TransformError};

/// Any input → `true`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTrue;

/// Any input → `false`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanFalse;

/// Collapse whitespace runs to single spaces and trim both ends
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeSpace;

impl Transform for BooleanTrue {
    fn name(&self) -> &'static str {
        "ixt:boolean-true"
    }

    fn input_pattern(&self) -> &'static str {
        "any text (e.g. a checked box or \"yes\")"
    }

    fn output_form(&self) -> &'static str {
        "true"
    }

    fn apply(&self, _raw: &str) -> Result<String, TransformError> {
        Ok("true".to_string())
    }
}

impl Transform for BooleanFalse {
    fn name(&self) -> &'static str {
        "ixt:boolean-false"
    }

    fn input_pattern(&self) -> &'static str {
        "any text (e.g. an unchecked box or \"no\")"
    }

    fn output_form(&self) -> &'static str {
        "false"
    }

    fn apply(&self, _raw: &str) -> Result<String, TransformError> {
        Ok("false".to_string())
    }
}

impl Transform for NormalizeSpace {
    fn name(&self) -> &'static str {
        super::NORMALIZE_SPACE
    }

    fn input_pattern(&self) -> &'static str {
        "any text"
    }

    fn output_form(&self) -> &'static str {
        "text with single inner spaces and no leading or trailing whitespace"
    }

    fn apply(&self, raw: &str) -> Result<String, TransformError> {
        Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

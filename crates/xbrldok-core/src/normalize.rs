//! Fact normalization
//!
//! Looks up every raw fact in the fact registry, runs the configured
//! transformation and checks the result against the lexical grammar of the
//! declared item type. Processing never stops at the first bad fact: every
//! input ends up in the report as processed, skipped or failed.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::batch::BatchResult;
use crate::config::FactRegistry;
use crate::error::{Error, LookupTarget, Result};
use crate::model::{CanonicalFact, ItemType, RawFact};
use crate::transform::{TransformRegistry, NORMALIZE_SPACE};

/// Result of normalizing a batch of raw facts
#[derive(Debug, Default)]
pub struct NormalizeReport {
    /// Canonical facts in fact-registry order
    pub facts: Vec<CanonicalFact>,
    /// Per-input outcome in input order, keyed by fact id
    ///
    /// Processed entries carry the canonical value.
    pub outcomes: BatchResult<String>,
}

impl NormalizeReport {
    /// True when no input failed
    pub fn is_success(&self) -> bool {
        self.outcomes.is_success()
    }

    /// Failed inputs as `(fact id, error)`
    pub fn errors(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.outcomes.errors()
    }

    /// Number of failed inputs
    pub fn error_count(&self) -> usize {
        self.outcomes.error_count()
    }
}

/// Turns raw facts into canonical facts
pub struct FactNormalizer<'a> {
    facts: &'a FactRegistry,
    transforms: &'a TransformRegistry,
}

impl<'a> FactNormalizer<'a> {
    pub fn new(facts: &'a FactRegistry, transforms: &'a TransformRegistry) -> Self {
        Self { facts, transforms }
    }

    /// Normalize a single raw fact
    pub fn normalize_one(&self, raw: &RawFact) -> Result<CanonicalFact> {
        let definition = self
            .facts
            .get(&raw.fact_id)
            .ok_or_else(|| Error::lookup(LookupTarget::FactId, &raw.fact_id))?;

        let transform = definition.transform.as_deref().unwrap_or(NORMALIZE_SPACE);
        let value = self
            .transforms
            .get(transform)?
            .apply(&raw.raw_text)
            .map_err(|e| e.into_error(&raw.fact_id))?;

        let item_type = ItemType::from_type_name(&definition.item_type);
        if !item_type.accepts(&value) {
            return Err(Error::Validation {
                key: raw.fact_id.clone(),
                value,
                expected: format!("{} for {}", item_type.expected(), definition.item_type),
            });
        }

        Ok(CanonicalFact::from_definition(raw, definition, value))
    }

    /// Normalize a batch of raw facts
    ///
    /// A fact id seen again with the same canonical value is skipped; with a
    /// different value it fails, since an instance cannot carry both.
    pub fn normalize(&self, raw_facts: &[RawFact]) -> NormalizeReport {
        let mut report = NormalizeReport::default();
        let mut seen: HashMap<&str, (usize, usize)> = HashMap::new();

        for raw in raw_facts {
            let fact = match self.normalize_one(raw) {
                Ok(fact) => fact,
                Err(e) => {
                    warn!("{} (content control #{}): {}", raw.fact_id, raw.position, e);
                    report.outcomes.push_failed(&raw.fact_id, e);
                    continue;
                }
            };

            if let Some(&(index, position)) = seen.get(raw.fact_id.as_str()) {
                let first = &report.facts[index];
                if first.canonical_value == fact.canonical_value {
                    debug!(
                        "{}: duplicate of content control #{}, skipped",
                        raw.fact_id, position
                    );
                    report.outcomes.push_skipped(
                        &raw.fact_id,
                        format!("duplicate of content control #{}", position),
                    );
                } else {
                    let e = Error::Validation {
                        key: raw.fact_id.clone(),
                        value: fact.canonical_value,
                        expected: format!(
                            "the value '{}' of content control #{}",
                            first.canonical_value, position
                        ),
                    };
                    warn!("{}: conflicting duplicate: {}", raw.fact_id, e);
                    report.outcomes.push_failed(&raw.fact_id, e);
                }
                continue;
            }

            debug!(
                "{}: '{}' -> '{}'",
                fact.fact_id, fact.raw_value, fact.canonical_value
            );
            seen.insert(raw.fact_id.as_str(), (report.facts.len(), raw.position));
            report
                .outcomes
                .push_ok(&raw.fact_id, fact.canonical_value.clone());
            report.facts.push(fact);
        }

        let facts = self.facts;
        report
            .facts
            .sort_by_key(|fact| facts.position(&fact.fact_id).unwrap_or(usize::MAX));

        info!(
            "Normalized {} of {} facts ({} failed, {} skipped)",
            report.outcomes.ok_count(),
            raw_facts.len(),
            report.outcomes.error_count(),
            report.outcomes.skipped_count()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{Decimals, FactDefinition};

    fn definition(concept: &str, item_type: &str, transform: Option<&str>) -> FactDefinition {
        FactDefinition {
            concept: concept.to_string(),
            item_type: item_type.to_string(),
            context_ref: "C_2025".to_string(),
            unit_ref: None,
            decimals: None,
            transform: transform.map(str::to_string),
        }
    }

    fn registry() -> FactRegistry {
        let mut revenue = definition(
            "gri:Revenue",
            "xbrli:monetaryItemType",
            Some("ixt:num-comma-decimal"),
        );
        revenue.unit_ref = Some("EUR".to_string());
        revenue.decimals = Some(Decimals::Places(2));

        FactRegistry::from_entries(vec![
            ("company_name", definition("gri:OrganizationName", "xbrli:stringItemType", None)),
            (
                "report_date",
                definition(
                    "gri:ReportingDate",
                    "xbrli:dateItemType",
                    Some("ixt:date-day-month-year"),
                ),
            ),
            ("revenue_2025", revenue),
            (
                "employees_2025",
                definition(
                    "gri:Employees",
                    "xbrli:integerItemType",
                    Some("ixt:num-dot-decimal"),
                ),
            ),
        ])
    }

    #[test]
    fn test_normalize_revenue() {
        let facts = registry();
        let transforms = TransformRegistry::with_builtins();
        let normalizer = FactNormalizer::new(&facts, &transforms);

        let fact = normalizer
            .normalize_one(&RawFact::new("revenue_2025", "1 234,56", 1))
            .unwrap();
        assert_eq!(fact.canonical_value, "1234.56");
        assert_eq!(fact.raw_value, "1 234,56");
        assert_eq!(fact.concept, "gri:Revenue");
        assert_eq!(fact.unit_ref.as_deref(), Some("EUR"));
        assert_eq!(fact.decimals, Some(Decimals::Places(2)));
    }

    #[test]
    fn test_default_transform_normalizes_space() {
        let facts = registry();
        let transforms = TransformRegistry::with_builtins();
        let normalizer = FactNormalizer::new(&facts, &transforms);

        let fact = normalizer
            .normalize_one(&RawFact::new("company_name", "Test   Company\tLLC", 1))
            .unwrap();
        assert_eq!(fact.canonical_value, "Test Company LLC");
    }

    #[test]
    fn test_unknown_fact_id() {
        let facts = registry();
        let transforms = TransformRegistry::with_builtins();
        let normalizer = FactNormalizer::new(&facts, &transforms);

        let report = normalizer.normalize(&[
            RawFact::new("revenue_2025", "1 234,56", 1),
            RawFact::new("revenue_2026", "5", 2),
        ]);
        assert!(!report.is_success());
        assert_eq!(report.facts.len(), 1);
        let (key, err) = report.errors().next().unwrap();
        assert_eq!(key, "revenue_2026");
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_bad_date_is_validation_error() {
        let facts = registry();
        let transforms = TransformRegistry::with_builtins();
        let normalizer = FactNormalizer::new(&facts, &transforms);

        let err = normalizer
            .normalize_one(&RawFact::new("report_date", "45.13.2025", 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.key(), "report_date");
        assert!(err.to_string().contains("45.13.2025"));
    }

    #[test]
    fn test_type_check_after_transform() {
        let facts = registry();
        let transforms = TransformRegistry::with_builtins();
        let normalizer = FactNormalizer::new(&facts, &transforms);

        // A valid decimal, but not an integer.
        let err = normalizer
            .normalize_one(&RawFact::new("employees_2025", "250.5", 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_all_failures_reported() {
        let facts = registry();
        let transforms = TransformRegistry::with_builtins();
        let normalizer = FactNormalizer::new(&facts, &transforms);

        let report = normalizer.normalize(&[
            RawFact::new("report_date", "31.12.2025", 1),
            RawFact::new("revenue_2025", "lots", 2),
            RawFact::new("unknown", "x", 3),
            RawFact::new("employees_2025", "two hundred", 4),
        ]);
        assert_eq!(report.error_count(), 3);
        assert_eq!(report.facts.len(), 1);
        let keys: Vec<&str> = report.errors().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["revenue_2025", "unknown", "employees_2025"]);
    }

    #[test]
    fn test_output_in_registry_order() {
        let facts = registry();
        let transforms = TransformRegistry::with_builtins();
        let normalizer = FactNormalizer::new(&facts, &transforms);

        let report = normalizer.normalize(&[
            RawFact::new("employees_2025", "250", 1),
            RawFact::new("revenue_2025", "1 234,56", 2),
            RawFact::new("company_name", "Test Company LLC", 3),
        ]);
        let ids: Vec<&str> = report.facts.iter().map(|f| f.fact_id.as_str()).collect();
        assert_eq!(ids, vec!["company_name", "revenue_2025", "employees_2025"]);
    }

    #[test]
    fn test_duplicate_fact_ids() {
        let facts = registry();
        let transforms = TransformRegistry::with_builtins();
        let normalizer = FactNormalizer::new(&facts, &transforms);

        let report = normalizer.normalize(&[
            RawFact::new("revenue_2025", "1 234,56", 1),
            RawFact::new("revenue_2025", "1.234,56", 2),
            RawFact::new("revenue_2025", "99", 3),
        ]);
        assert_eq!(report.facts.len(), 1);
        assert_eq!(report.outcomes.skipped_count(), 1);
        assert_eq!(report.error_count(), 1);
        let (_, err) = report.errors().next().unwrap();
        assert!(err.to_string().contains("#1"));
    }
}

//! Per-item outcomes of a batch step
//!
//! Extraction, normalization and emission never stop at the first bad item.
//! Each item ends up `Ok`, `Skipped` (tolerated, warned about) or `Failed`,
//! and callers decide what the aggregate means for the step.

use crate::error::Error;

/// What happened to one item
#[derive(Debug)]
pub enum Outcome<T> {
    /// The item was processed
    Ok(T),
    /// The item was left out on purpose
    Skipped(String),
    /// The item could not be processed
    Failed(Error),
}

/// An outcome together with the key identifying its item
#[derive(Debug)]
pub struct ItemOutcome<T> {
    /// Fact id, content-control position or concept, depending on the step
    pub key: String,
    pub outcome: Outcome<T>,
}

impl<T> ItemOutcome<T> {
    /// Whether the item was processed
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok(_))
    }
}

/// Ordered outcomes of a batch step
#[derive(Debug)]
pub struct BatchResult<T> {
    items: Vec<ItemOutcome<T>>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BatchResult<T> {
    /// Create an empty batch
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a processed item
    pub fn push_ok(&mut self, key: impl Into<String>, value: T) {
        self.push(key, Outcome::Ok(value));
    }

    /// Record a skipped item
    pub fn push_skipped(&mut self, key: impl Into<String>, reason: impl Into<String>) {
        self.push(key, Outcome::Skipped(reason.into()));
    }

    /// Record a failed item
    pub fn push_failed(&mut self, key: impl Into<String>, error: Error) {
        self.push(key, Outcome::Failed(error));
    }

    fn push(&mut self, key: impl Into<String>, outcome: Outcome<T>) {
        self.items.push(ItemOutcome {
            key: key.into(),
            outcome,
        });
    }

    /// All outcomes in input order
    pub fn items(&self) -> &[ItemOutcome<T>] {
        &self.items
    }

    /// Processed values in input order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(|item| match &item.outcome {
            Outcome::Ok(value) => Some(value),
            _ => None,
        })
    }

    /// Consume the batch, keeping only processed values
    pub fn into_values(self) -> Vec<T> {
        self.items
            .into_iter()
            .filter_map(|item| match item.outcome {
                Outcome::Ok(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Skipped items as `(key, reason)`
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            Outcome::Skipped(reason) => Some((item.key.as_str(), reason.as_str())),
            _ => None,
        })
    }

    /// Failed items as `(key, error)`
    pub fn errors(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            Outcome::Failed(error) => Some((item.key.as_str(), error)),
            _ => None,
        })
    }

    /// Number of processed items
    pub fn ok_count(&self) -> usize {
        self.values().count()
    }

    /// Number of skipped items
    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }

    /// Number of failed items
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Total number of items seen
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item was seen at all
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when no item failed
    pub fn is_success(&self) -> bool {
        self.error_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupTarget;

    #[test]
    fn test_counts_and_order() {
        let mut batch = BatchResult::new();
        batch.push_ok("a", 1);
        batch.push_skipped("b", "no tag");
        batch.push_failed("c", Error::lookup(LookupTarget::FactId, "c"));
        batch.push_ok("d", 4);

        assert_eq!(batch.len(), 4);
        assert_eq!(batch.ok_count(), 2);
        assert_eq!(batch.skipped_count(), 1);
        assert_eq!(batch.error_count(), 1);
        assert!(!batch.is_success());
        assert_eq!(batch.skipped().next(), Some(("b", "no tag")));
        assert_eq!(batch.errors().next().map(|(k, _)| k), Some("c"));
        assert_eq!(batch.into_values(), vec![1, 4]);
    }

    #[test]
    fn test_skips_alone_are_success() {
        let mut batch: BatchResult<()> = BatchResult::new();
        batch.push_skipped("1", "untagged");
        assert!(batch.is_success());
        assert_eq!(batch.ok_count(), 0);
        assert!(!batch.is_empty());
    }
}

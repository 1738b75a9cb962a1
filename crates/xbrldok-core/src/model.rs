//! Fact data model
//!
//! The types here double as the schema of the JSON artifacts written between
//! pipeline stages, hence the camelCase field names on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexical;

/// A tagged value region as found in the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFact {
    /// Tag of the content control
    pub fact_id: String,
    /// Concatenated text of the region
    pub raw_text: String,
    /// 1-based position among all content controls of the document
    pub position: usize,
}

impl RawFact {
    /// Create a raw fact
    pub fn new(fact_id: impl Into<String>, raw_text: impl Into<String>, position: usize) -> Self {
        Self {
            fact_id: fact_id.into(),
            raw_text: raw_text.into(),
            position,
        }
    }
}

/// The `decimals` attribute of a numeric fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DecimalsRepr", into = "DecimalsRepr")]
pub enum Decimals {
    /// Accurate to this many decimal places (negative rounds to tens, hundreds, ...)
    Places(i32),
    /// Exact value (`INF`)
    Infinite,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DecimalsRepr {
    Places(i32),
    Literal(String),
}

impl TryFrom<DecimalsRepr> for Decimals {
    type Error = String;

    fn try_from(repr: DecimalsRepr) -> Result<Self, Self::Error> {
        match repr {
            DecimalsRepr::Places(n) => Ok(Decimals::Places(n)),
            DecimalsRepr::Literal(s) if s == "INF" => Ok(Decimals::Infinite),
            DecimalsRepr::Literal(s) => s
                .trim()
                .parse()
                .map(Decimals::Places)
                .map_err(|_| format!("decimals must be an integer or \"INF\", got \"{}\"", s)),
        }
    }
}

impl From<Decimals> for DecimalsRepr {
    fn from(decimals: Decimals) -> Self {
        match decimals {
            Decimals::Places(n) => DecimalsRepr::Places(n),
            Decimals::Infinite => DecimalsRepr::Literal("INF".to_string()),
        }
    }
}

impl fmt::Display for Decimals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decimals::Places(n) => write!(f, "{}", n),
            Decimals::Infinite => f.write_str("INF"),
        }
    }
}

/// Registry entry describing how a fact id becomes an XBRL fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactDefinition {
    /// Concept QName, e.g. `gri:EconomicPerformanceRevenue`
    pub concept: String,
    /// Item type, e.g. `xbrli:monetaryItemType`
    #[serde(rename = "type")]
    pub item_type: String,
    /// Id of the context the fact is reported in
    pub context_ref: String,
    /// Id of the unit for numeric facts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_ref: Option<String>,
    /// Precision of numeric facts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<Decimals>,
    /// Transformation applied to the raw text (normalize-space when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

/// A fact whose value has been transformed into its lexical form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalFact {
    pub fact_id: String,
    pub raw_value: String,
    pub canonical_value: String,
    pub concept: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub context_ref: String,
    #[serde(default)]
    pub decimals: Option<Decimals>,
    #[serde(default)]
    pub unit_ref: Option<String>,
}

impl CanonicalFact {
    /// Combine a raw fact, its definition and the transformed value
    pub fn from_definition(raw: &RawFact, definition: &FactDefinition, value: String) -> Self {
        Self {
            fact_id: raw.fact_id.clone(),
            raw_value: raw.raw_text.clone(),
            canonical_value: value,
            concept: definition.concept.clone(),
            item_type: definition.item_type.clone(),
            context_ref: definition.context_ref.clone(),
            decimals: definition.decimals,
            unit_ref: definition.unit_ref.clone(),
        }
    }

    /// Split the concept into `(prefix, local name)`
    pub fn concept_parts(&self) -> (Option<&str>, &str) {
        match self.concept.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, self.concept.as_str()),
        }
    }
}

/// The lexical grammar a declared item type demands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// `xs:decimal` based types (monetary, shares, pure, ...)
    Numeric,
    /// `xs:integer` based types
    Integer,
    /// `xs:date`
    Date,
    /// `xs:boolean`
    Boolean,
    /// Anything else is accepted as text
    String,
}

impl ItemType {
    /// Classify a type name such as `xbrli:monetaryItemType`
    pub fn from_type_name(name: &str) -> Self {
        let local = name.rsplit(':').next().unwrap_or(name);
        match local {
            "monetaryItemType" | "decimalItemType" | "sharesItemType" | "pureItemType"
            | "percentItemType" | "floatItemType" | "doubleItemType" | "energyItemType"
            | "massItemType" | "volumeItemType" | "areaItemType" => ItemType::Numeric,
            "integerItemType"
            | "nonNegativeIntegerItemType"
            | "positiveIntegerItemType"
            | "nonPositiveIntegerItemType"
            | "negativeIntegerItemType"
            | "longItemType"
            | "intItemType"
            | "shortItemType" => ItemType::Integer,
            "dateItemType" => ItemType::Date,
            "booleanItemType" => ItemType::Boolean,
            _ => ItemType::String,
        }
    }

    /// Whether the value is a valid lexical form of this type
    pub fn accepts(self, value: &str) -> bool {
        match self {
            ItemType::Numeric => lexical::is_decimal(value),
            ItemType::Integer => lexical::is_integer(value),
            ItemType::Date => lexical::is_iso_date(value),
            ItemType::Boolean => lexical::is_boolean(value),
            ItemType::String => true,
        }
    }

    /// Description of the grammar, used in validation errors
    pub fn expected(self) -> &'static str {
        match self {
            ItemType::Numeric => "a decimal number such as 1234.56",
            ItemType::Integer => "an integer",
            ItemType::Date => "an ISO-8601 date YYYY-MM-DD",
            ItemType::Boolean => "true or false",
            ItemType::String => "any text",
        }
    }
}

/// Identifier of the reporting entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityIdentifier {
    /// Identifier scheme URI
    pub scheme: String,
    /// Identifier value, e.g. an LEI
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub identifier: EntityIdentifier,
}

/// Reporting period of a context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Period {
    /// A point in time
    Instant { instant: String },
    /// A span of time
    Duration {
        #[serde(rename = "startDate")]
        start_date: String,
        #[serde(rename = "endDate")]
        end_date: String,
    },
}

impl Period {
    /// All dates named by this period
    pub fn dates(&self) -> Vec<&str> {
        match self {
            Period::Instant { instant } => vec![instant.as_str()],
            Period::Duration {
                start_date,
                end_date,
            } => vec![start_date.as_str(), end_date.as_str()],
        }
    }
}

/// An XBRL context: entity plus period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub entity: Entity,
    pub period: Period,
}

impl Context {
    /// Create an instant context
    pub fn instant(
        id: impl Into<String>,
        scheme: impl Into<String>,
        value: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entity: Entity {
                identifier: EntityIdentifier {
                    scheme: scheme.into(),
                    value: value.into(),
                },
            },
            period: Period::Instant {
                instant: date.into(),
            },
        }
    }

    /// Create a duration context
    pub fn duration(
        id: impl Into<String>,
        scheme: impl Into<String>,
        value: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entity: Entity {
                identifier: EntityIdentifier {
                    scheme: scheme.into(),
                    value: value.into(),
                },
            },
            period: Period::Duration {
                start_date: start.into(),
                end_date: end.into(),
            },
        }
    }

    /// The entity identifier
    pub fn identifier(&self) -> &EntityIdentifier {
        &self.entity.identifier
    }
}

/// An XBRL unit with a single measure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    /// Measure QName, e.g. `iso4217:EUR`
    pub measure: String,
}

impl Unit {
    pub fn new(id: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            measure: measure.into(),
        }
    }
}

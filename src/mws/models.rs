//! Data models for normalized MWS product lookups.

use serde::{Deserialize, Serialize};

/// Flattened product record returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductSummary {
    /// Product title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Dimensions of the item itself
    pub item_dimensions: Dimensions,
    /// Dimensions of the shipping package
    pub package_dimensions: Dimensions,
    /// Full-size image URL
    pub image: String,
}

/// Height, length, width and weight as reported upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Measure>,
}

impl Dimensions {
    /// Returns true if no field was reported.
    pub fn is_empty(&self) -> bool {
        self.height.is_none() && self.length.is_none() && self.width.is_none() && self.weight.is_none()
    }
}

/// A raw upstream measurement. Neither value nor units are validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measure {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl Measure {
    pub fn new(value: impl Into<String>, units: Option<&str>) -> Self {
        Self { value: value.into(), units: units.map(String::from) }
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.units {
            Some(units) => write!(f, "{} {}", self.value, units),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Business outcome of a lookup. Transport faults are reported separately as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(ProductSummary),
    /// No ASIN in the query, or MWS matched nothing
    NotFound,
    /// MWS answered with a non-200 status
    UpstreamUnavailable,
    /// MWS answered, but not in the expected shape
    ParseError,
}

impl LookupOutcome {
    /// Plain-text body used for the non-success outcomes.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LookupOutcome::Found(_) => None,
            LookupOutcome::NotFound => Some("No Products Found"),
            LookupOutcome::UpstreamUnavailable => Some("Error"),
            LookupOutcome::ParseError => Some("No Products Found (parse error)"),
        }
    }

    pub fn product(&self) -> Option<&ProductSummary> {
        match self {
            LookupOutcome::Found(product) => Some(product),
            _ => None,
        }
    }
}

//! Normalizes `ListMatchingProducts` responses into a [`ProductSummary`].
//!
//! The normalizer is total: any shape it does not recognize becomes
//! [`LookupOutcome::ParseError`] instead of an error. Only XML that cannot be
//! read at all is reported as an error, by [`parse_response`].

use crate::mws::models::{Dimensions, LookupOutcome, Measure, ProductSummary};
use crate::mws::xml::{self, TEXT_KEY};
use anyhow::{Context, Result};
use regex_lite::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Path from the document root to the product list.
const PRODUCTS: [&str; 3] = ["ListMatchingProductsResponse", "ListMatchingProductsResult", "Products"];

/// Image size modifier, e.g. `._SL75_` in `.../I/41abc._SL75_.jpg`.
static IMAGE_SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\._.*?_").unwrap());

/// Parses a raw XML response body and normalizes it.
pub fn parse_response(body: &str) -> Result<LookupOutcome> {
    let document = xml::to_tree(body).context("Failed to parse MWS response")?;
    Ok(normalize(&document))
}

/// Maps a product-list document tree to a lookup outcome.
pub fn normalize(document: &Value) -> LookupOutcome {
    let Some(products) = descend(document, &PRODUCTS) else {
        warn!("Response has no product list");
        return LookupOutcome::ParseError;
    };

    // An empty match set comes back as a list holding only its namespace
    // declarations, which the reported count sees as a single entry.
    if products.get("Product").is_none()
        && (reported_len(products) == 1 || only_namespaces(products))
    {
        debug!("Product list is empty");
        return LookupOutcome::NotFound;
    }

    match summarize(products) {
        Some(summary) => LookupOutcome::Found(summary),
        None => {
            warn!("Product list does not have the expected attributes");
            LookupOutcome::ParseError
        }
    }
}

/// Strips the first size modifier from an image URL.
pub fn full_size_image(url: &str) -> String {
    IMAGE_SIZE_TOKEN.replace(url, "").into_owned()
}

fn summarize(products: &Value) -> Option<ProductSummary> {
    let product = first(products.get("Product")?);
    let attributes = first(product.get("AttributeSets")?.get("ns2:ItemAttributes")?);

    let item_dimensions = dimensions(attributes.get("ns2:ItemDimensions")?);
    let package_dimensions = dimensions(attributes.get("ns2:PackageDimensions")?);

    let small_image = first(attributes.get("ns2:SmallImage")?);
    let image = full_size_image(text(small_image.get("ns2:URL")?)?);

    Some(ProductSummary {
        title: attributes.get("ns2:Title").and_then(text).map(String::from),
        item_dimensions,
        package_dimensions,
        image,
    })
}

fn dimensions(node: &Value) -> Dimensions {
    let field = |name: &str| node.get(name).and_then(measure);
    Dimensions {
        height: field("ns2:Height"),
        length: field("ns2:Length"),
        width: field("ns2:Width"),
        weight: field("ns2:Weight"),
    }
}

fn measure(node: &Value) -> Option<Measure> {
    let units = node.get("Units").and_then(Value::as_str);
    text(node).map(|value| Measure::new(value, units))
}

/// Element text, whether the element was text-only or carried attributes.
fn text(node: &Value) -> Option<&str> {
    match node {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(TEXT_KEY).and_then(Value::as_str),
        _ => None,
    }
}

/// First element of a repeated node, or the node itself.
fn first(node: &Value) -> &Value {
    match node {
        Value::Array(items) => items.first().unwrap_or(node),
        _ => node,
    }
}

fn descend<'a>(node: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(node, |current, key| current.get(*key))
}

/// Number of entries the product list reports (attributes and child groups).
fn reported_len(node: &Value) -> usize {
    match node {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

/// True for a non-empty node whose entries are all `xmlns` declarations.
fn only_namespaces(node: &Value) -> bool {
    match node {
        Value::Object(map) => {
            !map.is_empty()
                && map.keys().all(|key| key == "xmlns" || key.starts_with("xmlns:"))
        }
        _ => false,
    }
}

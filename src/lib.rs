//! mws-lookup - Amazon product dimensions by ASIN or product URL
//!
//! Resolves a query to an ASIN, issues a signed MWS `ListMatchingProducts`
//! call and normalizes the XML reply into a small product summary. Runs as a
//! CLI or as an HTTP-triggered function.

pub mod asin;
pub mod commands;
pub mod config;
pub mod format;
pub mod http;
pub mod mws;

pub use asin::{extract_asin, AsinMatch};
pub use config::Config;
pub use mws::{LookupOutcome, ProductSummary, Region};

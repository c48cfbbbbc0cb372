//! MWS Products API: request signing, HTTP client, response parsing and models.

pub mod client;
pub mod models;
pub mod params;
pub mod parser;
pub mod regions;
pub mod signer;
pub mod xml;

pub use client::{MwsClient, ProductsApi, UpstreamReply};
pub use models::{Dimensions, LookupOutcome, Measure, ProductSummary};
pub use params::RequestParams;
pub use regions::Region;

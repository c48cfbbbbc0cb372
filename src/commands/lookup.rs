//! Product lookup: one signed `ListMatchingProducts` round trip.

use crate::asin::{extract_asin, AsinMatch};
use crate::config::Config;
use crate::format::Formatter;
use crate::mws::params::{timestamp_now, PRODUCTS_PATH};
use crate::mws::{parser, LookupOutcome, MwsClient, ProductsApi, RequestParams};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// HTTP method used for Products calls.
const METHOD: &str = "POST";

/// Resolves a query to an ASIN, signs the request, calls MWS and normalizes the reply.
pub struct LookupCommand {
    config: Config,
}

impl LookupCommand {
    /// Creates a new lookup command. Credentials come in with the config.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Looks up a query and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let outcome = self.lookup(query).await?;
        Ok(Formatter::new(self.config.format).format_outcome(&outcome))
    }

    /// Looks up a query against the configured endpoint.
    pub async fn lookup(&self, query: &str) -> Result<LookupOutcome> {
        let client = MwsClient::new(&self.config).context("Failed to create HTTP client")?;
        self.lookup_with_client(&client, query).await
    }

    /// Looks up a query with a provided client (for testing).
    ///
    /// Business outcomes come back as `Ok`; only transport failures and
    /// unreadable XML are errors.
    pub async fn lookup_with_client(
        &self,
        client: &impl ProductsApi,
        query: &str,
    ) -> Result<LookupOutcome> {
        let asin = match extract_asin(query) {
            AsinMatch::Found(asin) => asin,
            AsinMatch::NotFound => {
                info!("No ASIN found in query: {}", query);
                return Ok(LookupOutcome::NotFound);
            }
        };

        info!("Looking up product: {}", asin);

        let url = self.signed_url(client, &asin, &timestamp_now())?;
        let reply = client.post(&url).await?;

        if !reply.is_ok() {
            warn!("Upstream call failed with status {}", reply.status);
            return Ok(LookupOutcome::UpstreamUnavailable);
        }

        let outcome = parser::parse_response(&reply.body)?;
        debug!("Lookup outcome for {}: {}", asin, outcome.message().unwrap_or("found"));
        Ok(outcome)
    }

    /// Builds the signed request URL for an ASIN at a given timestamp.
    pub fn signed_url(
        &self,
        client: &impl ProductsApi,
        asin: &str,
        timestamp: &str,
    ) -> Result<String> {
        let credentials = &self.config.credentials;

        let params = RequestParams::list_matching_products(
            credentials,
            &self.config.marketplace_id(),
            asin,
            timestamp,
        )
        .sign(METHOD, client.host(), PRODUCTS_PATH, &credentials.client_secret)?;

        Ok(format!("{}{}?{}", client.base_url(), PRODUCTS_PATH, params.to_query_string()))
    }
}

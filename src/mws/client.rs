//! HTTP client for the MWS Products endpoint, built on wreq.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;

/// Raw upstream reply: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Trait for issuing signed Products API calls - enables mocking for tests.
#[async_trait]
pub trait ProductsApi: Send + Sync {
    /// Base URL of the endpoint (scheme and host, no trailing slash).
    fn base_url(&self) -> &str;

    /// POSTs to a fully built, signed request URL.
    async fn post(&self, url: &str) -> Result<UpstreamReply>;

    /// Host part of the base URL, as used in the string to sign.
    fn host(&self) -> &str {
        authority(self.base_url())
    }
}

fn without_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

/// The `host[:port]` part of a URL.
fn authority(url: &str) -> &str {
    let rest = without_scheme(url);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

/// MWS HTTP client with explicit request and connect timeouts.
pub struct MwsClient {
    client: Client,
    base_url: String,
}

impl MwsClient {
    /// Creates a new client for the configured endpoint.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| config.base_url());

        // Requests are signed against the bare products path
        if authority(&base_url) != without_scheme(&base_url) {
            anyhow::bail!("Endpoint must not contain a path: {}", base_url);
        }

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ProductsApi for MwsClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, url: &str) -> Result<UpstreamReply> {
        debug!("POST {}", redact_signature(url));

        let response = self.client.post(url).send().await.context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status != 200 {
            // The body is only diagnostic here
            let body = response.text().await.unwrap_or_default();
            warn!("MWS returned {}: {}", status, body.chars().take(200).collect::<String>());
            return Ok(UpstreamReply { status: status.as_u16(), body });
        }

        let body = response.text().await.context("Failed to read response body")?;
        Ok(UpstreamReply { status: status.as_u16(), body })
    }
}

/// Replaces the `Signature` value in a URL, for logging.
pub fn redact_signature(url: &str) -> String {
    url.split('&')
        .map(|pair| if pair.starts_with("Signature=") { "Signature=***" } else { pair })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config { timeout_secs: 5, connect_timeout_secs: 2, ..Config::default() }
    }

    #[test]
    fn test_redact_signature() {
        let url = "https://h/p?A=1&Signature=abc%3D&SignatureMethod=HmacSHA256";
        assert_eq!(redact_signature(url), "https://h/p?A=1&Signature=***&SignatureMethod=HmacSHA256");
    }

    #[tokio::test]
    async fn test_base_url_default() {
        let client = MwsClient::new(&make_test_config()).unwrap();
        assert_eq!(client.base_url(), "https://mws.amazonservices.com");
        assert_eq!(client.host(), "mws.amazonservices.com");
    }

    #[tokio::test]
    async fn test_base_url_custom() {
        let client =
            MwsClient::with_base_url(&make_test_config(), Some("http://127.0.0.1:9000/".to_string()))
                .unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9000");
        assert_eq!(client.host(), "127.0.0.1:9000");
    }

    struct FixedBase(&'static str);

    #[async_trait]
    impl ProductsApi for FixedBase {
        fn base_url(&self) -> &str {
            self.0
        }

        async fn post(&self, _url: &str) -> Result<UpstreamReply> {
            anyhow::bail!("not used")
        }
    }

    #[test]
    fn test_host_is_authority_only() {
        assert_eq!(FixedBase("https://mws-eu.amazonservices.com").host(), "mws-eu.amazonservices.com");
        assert_eq!(FixedBase("http://127.0.0.1:9000/mws/v1").host(), "127.0.0.1:9000");
        assert_eq!(FixedBase("http://mock.local?x=1").host(), "mock.local");
        assert_eq!(FixedBase("mock.local/").host(), "mock.local");
    }

    #[tokio::test]
    async fn test_endpoint_with_path_is_rejected() {
        let result =
            MwsClient::with_base_url(&make_test_config(), Some("http://127.0.0.1:9000/mws".to_string()));
        let err = result.err().unwrap();
        assert!(err.to_string().contains("must not contain a path"));

        let mut config = make_test_config();
        config.endpoint = Some("https://proxy.local/mws/".to_string());
        assert!(MwsClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_base_url_from_config_endpoint() {
        let mut config = make_test_config();
        config.endpoint = Some("http://mock.local".to_string());
        let client = MwsClient::new(&config).unwrap();
        assert_eq!(client.host(), "mock.local");
    }

    #[tokio::test]
    async fn test_post_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/Products/2011-10-01"))
            .and(query_param("Action", "ListMatchingProducts"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
            .mount(&mock_server)
            .await;

        let client =
            MwsClient::with_base_url(&make_test_config(), Some(mock_server.uri())).unwrap();
        let url = format!("{}/Products/2011-10-01?Action=ListMatchingProducts", client.base_url());

        let reply = client.post(&url).await.unwrap();
        assert!(reply.is_ok());
        assert_eq!(reply.body, "<ok/>");
    }

    #[tokio::test]
    async fn test_post_non_200_is_a_reply() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<ErrorResponse/>"))
            .mount(&mock_server)
            .await;

        let client =
            MwsClient::with_base_url(&make_test_config(), Some(mock_server.uri())).unwrap();
        let reply = client.post(&format!("{}/Products/2011-10-01", mock_server.uri())).await.unwrap();

        assert!(!reply.is_ok());
        assert_eq!(reply.status, 503);
    }

    #[tokio::test]
    async fn test_post_connection_refused() {
        let client = MwsClient::with_base_url(
            &make_test_config(),
            Some("http://127.0.0.1:1".to_string()),
        )
        .unwrap();

        let err = client.post("http://127.0.0.1:1/Products/2011-10-01").await.unwrap_err();
        assert!(err.to_string().contains("Failed to send request"));
    }

    #[tokio::test]
    async fn test_post_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let config = Config { timeout_secs: 1, ..make_test_config() };
        let client = MwsClient::with_base_url(&config, Some(mock_server.uri())).unwrap();

        let result = client.post(&format!("{}/Products/2011-10-01", mock_server.uri())).await;
        assert!(result.is_err());
    }
}

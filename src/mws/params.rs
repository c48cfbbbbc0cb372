//! Request parameters for MWS Products API calls.

use crate::config::Credentials;
use crate::mws::signer;
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Products API version.
pub const API_VERSION: &str = "2011-10-01";

/// Products API path.
pub const PRODUCTS_PATH: &str = "/Products/2011-10-01";

/// Operation used for product lookups.
pub const LIST_MATCHING_PRODUCTS: &str = "ListMatchingProducts";

pub const SIGNATURE_METHOD: &str = "HmacSHA256";
pub const SIGNATURE_VERSION: &str = "2";

/// Name of the parameter carrying the request signature.
pub const SIGNATURE: &str = "Signature";

/// Request parameters, kept in canonical (byte-sorted) key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    /// Builds the unsigned parameters for a `ListMatchingProducts` call.
    pub fn list_matching_products(
        credentials: &Credentials,
        marketplace_id: &str,
        query: &str,
        timestamp: &str,
    ) -> Self {
        let mut params = Self::default();
        params.insert("AWSAccessKeyId", &credentials.aws_access_key_id);
        params.insert("Action", LIST_MATCHING_PRODUCTS);
        params.insert("MWSAuthToken", &credentials.mws_auth_token);
        params.insert("MarketplaceId", marketplace_id);
        params.insert("SellerId", &credentials.seller_id);
        params.insert("SignatureMethod", SIGNATURE_METHOD);
        params.insert("SignatureVersion", SIGNATURE_VERSION);
        params.insert("Timestamp", timestamp);
        params.insert("Version", API_VERSION);
        params.insert("Query", query);
        params
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates parameters in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Signs every other parameter, then adds the result as `Signature`.
    pub fn sign(mut self, method: &str, domain: &str, path: &str, secret: &str) -> Result<Self> {
        self.0.remove(SIGNATURE);
        let signature = signer::sign(method, domain, path, secret, &self.0)?;
        self.insert(SIGNATURE, signature);
        Ok(self)
    }

    /// Serializes all parameters, signature included, as a URL query string.
    pub fn to_query_string(&self) -> String {
        signer::canonical_query(&self.0)
    }
}

/// Current UTC time in the ISO 8601 form MWS expects (millisecond precision).
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn test_credentials() -> Credentials {
        Credentials {
            aws_access_key_id: "AKIAEXAMPLEKEY".to_string(),
            client_secret: "test-client-secret".to_string(),
            mws_auth_token: "amzn.mws.0000-test".to_string(),
            marketplace_id: None,
            seller_id: "A1SELLERTEST".to_string(),
        }
    }

    fn test_params() -> RequestParams {
        RequestParams::list_matching_products(
            &test_credentials(),
            "ATVPDKIKX0DER",
            "B072X2HHQ3",
            "2024-01-15T10:30:00.000Z",
        )
    }

    #[test]
    fn test_list_matching_products_fields() {
        let params = test_params();
        assert_eq!(params.iter().count(), 10);
        assert_eq!(params.get("Action"), Some("ListMatchingProducts"));
        assert_eq!(params.get("SignatureMethod"), Some("HmacSHA256"));
        assert_eq!(params.get("SignatureVersion"), Some("2"));
        assert_eq!(params.get("Version"), Some("2011-10-01"));
        assert_eq!(params.get("Query"), Some("B072X2HHQ3"));
        assert_eq!(params.get("MarketplaceId"), Some("ATVPDKIKX0DER"));
        assert_eq!(params.get("SellerId"), Some("A1SELLERTEST"));
        assert!(params.get(SIGNATURE).is_none());
    }

    #[test]
    fn test_secret_is_not_a_parameter() {
        let params = test_params();
        assert!(params.iter().all(|(_, v)| v != "test-client-secret"));
    }

    #[test]
    fn test_sign_adds_signature_last() {
        let params = test_params()
            .sign("POST", "mws.amazonservices.com", PRODUCTS_PATH, "test-client-secret")
            .unwrap();

        assert_eq!(params.iter().count(), 11);
        assert_eq!(params.get(SIGNATURE), Some("K6BxBHfhKHWFFr83w766u+tYSG5hJv2mOFTuQLTgRBc="));
    }

    #[test]
    fn test_resign_ignores_previous_signature() {
        let once = test_params()
            .sign("POST", "mws.amazonservices.com", PRODUCTS_PATH, "test-client-secret")
            .unwrap();
        let twice = once
            .clone()
            .sign("POST", "mws.amazonservices.com", PRODUCTS_PATH, "test-client-secret")
            .unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_query_string_includes_escaped_signature() {
        let query = test_params()
            .sign("POST", "mws.amazonservices.com", PRODUCTS_PATH, "test-client-secret")
            .unwrap()
            .to_query_string();

        assert!(query.starts_with("AWSAccessKeyId=AKIAEXAMPLEKEY&Action=ListMatchingProducts"));
        assert!(query.contains("&Signature=K6BxBHfhKHWFFr83w766u%2BtYSG5hJv2mOFTuQLTgRBc%3D&"));
        assert!(query.contains("Timestamp=2024-01-15T10%3A30%3A00.000Z"));
    }

    #[test]
    fn test_timestamp_now_format() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-15T10:30:00.000Z".len());
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}

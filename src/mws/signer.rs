//! MWS Signature Version 2 (HmacSHA256) request signing.
//!
//! The string to sign is:
//!
//! ```text
//! METHOD\n
//! host\n
//! /path\n
//! k1=v1&k2=v2...
//! ```
//!
//! with keys in ascending byte order and values percent-encoded per
//! RFC 3986 (space becomes `%20`, never `+`).

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Builds the canonical query string: keys sorted, values escaped, `&`-joined.
pub fn canonical_query<K, V>(params: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = params.into_iter().collect();
    pairs.sort_by(|a, b| a.0.as_ref().as_bytes().cmp(b.0.as_ref().as_bytes()));

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), urlencoding::encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the full string to sign.
pub fn string_to_sign<K, V>(
    method: &str,
    domain: &str,
    path: &str,
    params: impl IntoIterator<Item = (K, V)>,
) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    format!("{}\n{}\n{}\n{}", method, domain, path, canonical_query(params))
}

/// Computes the base64 HMAC-SHA256 signature of a request.
///
/// Pure: the same inputs always produce the same signature.
pub fn sign<K, V>(
    method: &str,
    domain: &str,
    path: &str,
    secret: &str,
    params: impl IntoIterator<Item = (K, V)>,
) -> Result<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let message = string_to_sign(method, domain, path, params);

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).context("Failed to create HMAC")?;
    mac.update(message.as_bytes());

    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

//! HTTP-triggered entry point.
//!
//! Resolves the query from the request, runs a lookup and maps the outcome to
//! a response. Every business outcome is a 200 unless `strict_status` is set;
//! unexpected faults are a 501 carrying the error message.

use crate::commands::LookupCommand;
use crate::mws::{LookupOutcome, ProductsApi};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Request, RequestExt, Response};
use serde_json::Value;
use tracing::{error, info};

/// Handles one request/response cycle.
pub async fn handle_request(
    event: Request,
    command: &LookupCommand,
    client: &impl ProductsApi,
) -> Result<Response<Body>, Error> {
    let config = command.config();
    let query = resolve_query(&event, &config.default_query);
    info!("{} {} query={}", event.method(), event.uri().path(), query);

    match command.lookup_with_client(client, &query).await {
        Ok(outcome) => outcome_response(&outcome, config.strict_status),
        Err(e) => {
            error!("Lookup failed: {:#}", e);
            text_response(StatusCode::NOT_IMPLEMENTED, &format!("{:#}", e))
        }
    }
}

/// Picks the query: URL parameter, then body field, then the default.
///
/// Empty values count as missing.
pub fn resolve_query(event: &Request, default_query: &str) -> String {
    event
        .query_string_parameters()
        .first("query")
        .map(String::from)
        .or_else(|| event.uri().query().and_then(|q| form_field(q, "query")))
        .filter(|q| !q.is_empty())
        .or_else(|| body_query(event.body()))
        .unwrap_or_else(|| default_query.to_string())
}

/// Reads `query` from a JSON object or form-encoded body.
fn body_query(body: &Body) -> Option<String> {
    let bytes: &[u8] = body.as_ref();
    if bytes.is_empty() {
        return None;
    }

    let query = match serde_json::from_slice::<Value>(bytes) {
        Ok(json) => json.get("query").and_then(Value::as_str).map(String::from),
        Err(_) => std::str::from_utf8(bytes).ok().and_then(|text| form_field(text, "query")),
    };

    query.filter(|q| !q.is_empty())
}

/// Decodes a single field from `application/x-www-form-urlencoded` text.
fn form_field(text: &str, name: &str) -> Option<String> {
    text.split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| {
            urlencoding::decode(&value.replace('+', " ")).ok().map(|value| value.into_owned())
        })
}

/// HTTP status for a lookup outcome.
pub fn status_for(outcome: &LookupOutcome, strict: bool) -> StatusCode {
    match (outcome, strict) {
        (_, false) | (LookupOutcome::Found(_), true) => StatusCode::OK,
        (LookupOutcome::NotFound, true) => StatusCode::NOT_FOUND,
        (LookupOutcome::ParseError | LookupOutcome::UpstreamUnavailable, true) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn outcome_response(outcome: &LookupOutcome, strict: bool) -> Result<Response<Body>, Error> {
    let status = status_for(outcome, strict);

    match outcome {
        LookupOutcome::Found(product) => {
            let resp = Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(serde_json::to_string(product)?.into())
                .map_err(Box::new)?;
            Ok(resp)
        }
        other => text_response(status, other.message().unwrap_or_default()),
    }
}

fn text_response(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    let resp = Response::builder()
        .status(status)
        .header("content-type", "text/plain; charset=utf-8")
        .body(message.to_string().into())
        .map_err(Box::new)?;
    Ok(resp)
}

//! ASIN extraction from product URLs or raw product codes.
//!
//! Anything that does not look like an Amazon URL is taken to be the code
//! itself. URLs are split once into path segments and scanned left to right
//! for the `/dp/<ASIN>` and `/gp/product/<ASIN>` shapes.

/// Marker that identifies an Amazon product URL.
const AMAZON_MARKER: &str = "amazon.com";

/// Result of an ASIN extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsinMatch {
    /// Product identifier, possibly the unvalidated input itself.
    Found(String),
    /// The input was an Amazon URL without a recognizable product segment.
    NotFound,
}

/// Extracts the ASIN from a product URL, or passes a raw code through.
///
/// Never panics: short or malformed URLs resolve to [`AsinMatch::NotFound`].
pub fn extract_asin(query: &str) -> AsinMatch {
    let Some(start) = query.find(AMAZON_MARKER) else {
        return AsinMatch::Found(query.to_string());
    };

    let segments: Vec<&str> = query[start..].split('/').collect();

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "dp" => return candidate(segments.get(i + 1).copied()),
            "gp" if segments.get(i + 1).copied() == Some("product") => {
                return candidate(segments.get(i + 2).copied());
            }
            _ => {}
        }
    }

    AsinMatch::NotFound
}

fn candidate(segment: Option<&str>) -> AsinMatch {
    match segment {
        Some(segment) => AsinMatch::Found(strip_query(segment).to_string()),
        None => AsinMatch::NotFound,
    }
}

/// Drops a trailing `?query` from a path segment.
fn strip_query(segment: &str) -> &str {
    segment.split_once('?').map_or(segment, |(head, _)| head)
}

//! Request normalization.
//!
//! # Responsibilities
//! - Parse raw client input (query string or JSON body) into the canonical
//!   `SearchRequest` sent upstream
//! - Reject requests with no resolvable query text
//! - Apply defaults for optional fields
//!
//! # Design Decisions
//! - The required field (query) fails hard; optional numeric/list fields
//!   fail soft into defaults, even when malformed
//! - `filters` is attached only when at least one field is populated; an
//!   empty filter object is never sent upstream

use serde::{Deserialize, Deserializer, Serialize};

use crate::http::response::ApiError;

/// Default result count when `top_k` is absent, non-positive or unparsable.
pub const DEFAULT_TOP_K: i64 = 20;

/// Raw client parameters, as they arrive on the query string or in a JSON
/// body. Both encodings use the same field names; list-valued filters are
/// comma-separated strings in either case.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Primary query parameter.
    pub query: Option<String>,

    /// Fallback alias for `query`.
    pub q: Option<String>,

    #[serde(deserialize_with = "lenient_int")]
    pub top_k: Option<i64>,

    #[serde(deserialize_with = "lenient_int")]
    pub level: Option<i64>,

    /// Comma-separated license identifiers.
    pub license: Option<String>,

    #[serde(deserialize_with = "lenient_int")]
    pub duration: Option<i64>,

    /// Comma-separated media-type identifiers.
    pub media: Option<String>,
}

/// Canonical search request, serialized verbatim as the upstream wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,

    pub top_k: i64,

    /// Omitted from the wire entirely when no filter field is populated;
    /// the upstream distinguishes "no filters" from an empty filter object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

/// Filter set, materialized only when non-trivial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_lte: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_in: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_lte: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_in: Option<Vec<String>>,
}

impl SearchFilters {
    /// True when no field is populated.
    pub fn is_empty(&self) -> bool {
        self.level_lte.is_none()
            && self.license_in.is_none()
            && self.duration_lte.is_none()
            && self.media_in.is_none()
    }
}

/// Build the canonical request from raw client parameters.
///
/// The only possible failure is missing query text; every optional field
/// degrades to its default instead of failing the request.
pub fn normalize(params: SearchParams) -> Result<SearchRequest, ApiError> {
    let query = params
        .query
        .filter(|s| !s.is_empty())
        .or(params.q.filter(|s| !s.is_empty()))
        .ok_or(ApiError::MissingQuery)?;

    let top_k = params
        .top_k
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_TOP_K);

    let filters = SearchFilters {
        level_lte: params.level,
        license_in: params.license.as_deref().map(csv_list).filter(|v| !v.is_empty()),
        duration_lte: params.duration,
        media_in: params.media.as_deref().map(csv_list).filter(|v| !v.is_empty()),
    };

    Ok(SearchRequest {
        query,
        top_k,
        filters: if filters.is_empty() { None } else { Some(filters) },
    })
}

/// Split comma-separated text into trimmed, non-empty segments.
///
/// Only horizontal whitespace (spaces and tabs) is trimmed. Original order
/// is preserved; duplicates are kept.
pub fn csv_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|segment| segment.trim_matches([' ', '\t']))
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accept an integer, a string holding an integer, or garbage (→ `None`).
///
/// Query strings always deliver strings; JSON bodies may deliver numbers.
/// Malformed values degrade to `None` rather than rejecting the request.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer) {
        Ok(Some(Raw::Int(n))) => Some(n),
        Ok(Some(Raw::Text(s))) => s.trim().parse().ok(),
        Ok(None) | Err(_) => None,
    })
}

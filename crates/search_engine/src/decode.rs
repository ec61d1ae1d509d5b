use serde::Deserialize;

use crate::{FailureKind, FetchError, Suggestion};

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    predictions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "companiesList")]
    companies_list: Vec<serde_json::Value>,
}

/// Decode a `POST /completion/complete` body: `{ "predictions": [{ "text": .. }] }`.
pub fn decode_predictions(bytes: &[u8]) -> Result<Vec<Suggestion>, FetchError> {
    serde_json::from_slice::<CompletionResponse>(bytes)
        .map(|response| response.predictions)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
}

/// Decode a `GET /api/v2/search` body: `{ "companiesList": [..] }`.
///
/// Entries are kept as raw JSON; their shape belongs to the results page.
pub fn decode_search_results(bytes: &[u8]) -> Result<Vec<serde_json::Value>, FetchError> {
    serde_json::from_slice::<SearchResponse>(bytes)
        .map(|response| response.companies_list)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
}

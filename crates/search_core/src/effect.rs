use crate::{NavigationTarget, RequestId, SearchResultEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the prediction service for completions of `text`.
    FetchPredictions { request_id: RequestId, text: String },
    /// Ask the search service for entities matching `query`.
    RunSearch { request_id: RequestId, query: String },
    /// Update the location. Fire-and-forget relative to `RunSearch`.
    Navigate(NavigationTarget),
    /// Hand search results to the owning page.
    PublishResults(Vec<SearchResultEntry>),
    /// The component went away; drop whatever is still in flight.
    CancelInFlight,
}

use crate::SearchResultEntry;

/// Location updates, injected so the coordinator never touches a router directly.
pub trait Navigator {
    fn navigate_to(&mut self, path: &str, query: &[(String, String)]);
}

/// The externally owned results store. The coordinator only ever writes to it.
pub trait ResultsStore {
    fn update_search_results(&mut self, results: Vec<SearchResultEntry>);
}

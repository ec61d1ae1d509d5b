use std::sync::{Arc, Mutex};

use search_core::{ResultsStore, SearchResultEntry};
use search_logging::search_info;

/// Results owned by the surrounding page; the search bar only writes here.
#[derive(Debug, Clone, Default)]
pub struct SharedResults {
    entries: Arc<Mutex<Vec<SearchResultEntry>>>,
}

impl SharedResults {
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn snapshot(&self) -> Vec<SearchResultEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl ResultsStore for SharedResults {
    fn update_search_results(&mut self, results: Vec<SearchResultEntry>) {
        search_info!("Publishing {} search results", results.len());
        if let Ok(mut entries) = self.entries.lock() {
            *entries = results;
        }
    }
}

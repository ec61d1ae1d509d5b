use std::sync::{Arc, Mutex};

use search_core::{Navigator, NavigationTarget};
use search_logging::search_info;

/// In-process location history standing in for the browser router.
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl HistoryNavigator {
    pub fn current(&self) -> Option<String> {
        self.history.lock().ok()?.last().cloned()
    }

    #[cfg(test)]
    pub fn entries(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate_to(&mut self, path: &str, query: &[(String, String)]) {
        let location = NavigationTarget {
            path: path.to_string(),
            query: query.to_vec(),
        }
        .to_location();
        search_info!("Navigate to {}", location);
        if let Ok(mut history) = self.history.lock() {
            history.push(location);
        }
    }
}

use crate::completion::remove_last_word;
use crate::view_model::{AppViewModel, SuggestionRow};

/// Monotonic token attached to every outgoing request.
pub type RequestId = u64;

/// One candidate completion, ranked by the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub text: String,
}

impl Prediction {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Entity record returned by the search service. Opaque to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultEntry(pub serde_json::Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Empty text, no predictions.
    #[default]
    Idle,
    /// Text present or predictions shown.
    Editing,
    /// A search call is in flight.
    Searching,
}

/// How the most recent search resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Succeeded { count: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    text: String,
    predictions: Vec<Prediction>,
    last_request_id: RequestId,
    latest_prediction_request: Option<RequestId>,
    pending_search: Option<RequestId>,
    last_outcome: Option<SearchOutcome>,
    unmounted: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }

    pub fn latest_prediction_request(&self) -> Option<RequestId> {
        self.latest_prediction_request
    }

    pub fn pending_search(&self) -> Option<RequestId> {
        self.pending_search
    }

    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    pub fn phase(&self) -> Phase {
        if self.pending_search.is_some() {
            Phase::Searching
        } else if self.text.is_empty() && self.predictions.is_empty() {
            Phase::Idle
        } else {
            Phase::Editing
        }
    }

    pub fn view(&self) -> AppViewModel {
        let prefix = remove_last_word(&self.text);
        AppViewModel {
            text: self.text.clone(),
            phase: self.phase(),
            suggestions: self
                .predictions
                .iter()
                .map(|prediction| SuggestionRow {
                    prefix: prefix.to_string(),
                    completion: prediction.text.clone(),
                })
                .collect(),
            show_divider: !self.predictions.is_empty(),
            search_error: match &self.last_outcome {
                Some(SearchOutcome::Failed { message }) => Some(message.clone()),
                _ => None,
            },
            last_result_count: match &self.last_outcome {
                Some(SearchOutcome::Succeeded { count }) => Some(*count),
                _ => None,
            },
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Replaces the text and issues the prediction request that must follow it.
    pub(crate) fn set_text(&mut self, text: String) -> RequestId {
        self.text = text;
        self.dirty = true;
        let request_id = self.next_request_id();
        self.latest_prediction_request = Some(request_id);
        request_id
    }

    /// Replaces the whole list if `request_id` is still the latest one.
    pub(crate) fn accept_predictions(
        &mut self,
        request_id: RequestId,
        predictions: Vec<Prediction>,
    ) -> bool {
        if self.latest_prediction_request != Some(request_id) {
            return false;
        }
        self.predictions = predictions;
        self.dirty = true;
        true
    }

    /// Starts a search for the current text.
    ///
    /// Prediction requests issued before this point can no longer land.
    pub(crate) fn begin_search(&mut self) -> RequestId {
        let request_id = self.next_request_id();
        self.pending_search = Some(request_id);
        self.latest_prediction_request = None;
        self.last_outcome = None;
        self.dirty = true;
        request_id
    }

    pub(crate) fn is_current_search(&self, request_id: RequestId) -> bool {
        self.pending_search == Some(request_id)
    }

    pub(crate) fn finish_search(&mut self, outcome: SearchOutcome) {
        self.pending_search = None;
        self.last_outcome = Some(outcome);
        self.predictions.clear();
        self.dirty = true;
    }

    pub(crate) fn unmount(&mut self) {
        self.unmounted = true;
        self.latest_prediction_request = None;
        self.pending_search = None;
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_request_id = self.last_request_id.saturating_add(1);
        self.last_request_id
    }
}

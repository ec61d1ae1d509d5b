use crate::{Prediction, RequestId, SearchResultEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the text field; carries the full new value.
    TextChanged(String),
    /// User clicked the suggestion at `index` in the rendered list.
    PredictionSelected { index: usize },
    /// Enter pressed while the text field has focus.
    EnterPressed,
    /// User activated the submit arrow.
    SubmitClicked,
    /// Prediction service answered a request.
    PredictionsLoaded {
        request_id: RequestId,
        result: Result<Vec<Prediction>, String>,
    },
    /// Search service answered a request.
    SearchCompleted {
        request_id: RequestId,
        result: Result<Vec<SearchResultEntry>, String>,
    },
    /// The component was unmounted.
    Unmounted,
}

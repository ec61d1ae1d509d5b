use search_logging::{query_preview, search_debug, search_warn};

use crate::completion::apply_completion;
use crate::state::SearchOutcome;
use crate::{AppState, Effect, Msg, NavigationTarget};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.is_unmounted() {
        // Late responses for a discarded component.
        search_debug!("Ignoring {} after unmount", msg_name(&msg));
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::TextChanged(text) => {
            let request_id = state.set_text(text);
            vec![Effect::FetchPredictions {
                request_id,
                text: state.text().to_string(),
            }]
        }
        Msg::PredictionSelected { index } => {
            let Some(prediction) = state.predictions().get(index) else {
                search_warn!(
                    "Prediction index {} out of range ({} shown)",
                    index,
                    state.predictions().len()
                );
                return (state, Vec::new());
            };
            let next = apply_completion(state.text(), prediction);
            let request_id = state.set_text(next);
            vec![Effect::FetchPredictions {
                request_id,
                text: state.text().to_string(),
            }]
        }
        Msg::EnterPressed | Msg::SubmitClicked => {
            let query = state.text().to_string();
            let request_id = state.begin_search();
            vec![
                Effect::Navigate(NavigationTarget::search(&query)),
                Effect::RunSearch { request_id, query },
            ]
        }
        Msg::PredictionsLoaded { request_id, result } => {
            match result {
                Ok(predictions) => {
                    let count = predictions.len();
                    if !state.accept_predictions(request_id, predictions) {
                        search_debug!(
                            "Discarding stale predictions request_id={} latest={:?}",
                            request_id,
                            state.latest_prediction_request()
                        );
                    } else {
                        search_debug!(
                            "Applied {} predictions for {:?}",
                            count,
                            query_preview(state.text())
                        );
                    }
                }
                Err(message) => {
                    // Best effort: the list stays as it was.
                    search_warn!(
                        "Prediction request {} failed: {}",
                        request_id,
                        message
                    );
                }
            }
            Vec::new()
        }
        Msg::SearchCompleted { request_id, result } => {
            if !state.is_current_search(request_id) {
                search_debug!(
                    "Discarding superseded search response request_id={}",
                    request_id
                );
                return (state, Vec::new());
            }
            match result {
                Ok(results) => {
                    state.finish_search(SearchOutcome::Succeeded {
                        count: results.len(),
                    });
                    vec![Effect::PublishResults(results)]
                }
                Err(message) => {
                    search_warn!("Search request {} failed: {}", request_id, message);
                    state.finish_search(SearchOutcome::Failed { message });
                    Vec::new()
                }
            }
        }
        Msg::Unmounted => {
            state.unmount();
            vec![Effect::CancelInFlight]
        }
    };

    (state, effects)
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::TextChanged(_) => "TextChanged",
        Msg::PredictionSelected { .. } => "PredictionSelected",
        Msg::EnterPressed => "EnterPressed",
        Msg::SubmitClicked => "SubmitClicked",
        Msg::PredictionsLoaded { .. } => "PredictionsLoaded",
        Msg::SearchCompleted { .. } => "SearchCompleted",
        Msg::Unmounted => "Unmounted",
    }
}

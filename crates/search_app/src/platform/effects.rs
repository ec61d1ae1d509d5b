use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use search_core::{Effect, Msg, Navigator, Prediction, ResultsStore, SearchResultEntry};
use search_engine::{EngineEvent, EngineHandle};
use search_logging::{query_preview, search_debug, search_info};

const EVENT_POLL: Duration = Duration::from_millis(50);

/// Executes core effects against the engine, the navigator and the results store.
pub struct EffectRunner {
    engine: EngineHandle,
    navigator: Box<dyn Navigator>,
    results: Box<dyn ResultsStore>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        navigator: Box<dyn Navigator>,
        results: Box<dyn ResultsStore>,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        let runner = Self {
            engine,
            navigator,
            results,
        };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPredictions { request_id, text } => {
                    search_debug!(
                        "FetchPredictions request_id={} text={:?}",
                        request_id,
                        query_preview(&text)
                    );
                    self.engine.predict(request_id, text);
                }
                Effect::RunSearch { request_id, query } => {
                    search_info!(
                        "RunSearch request_id={} query={:?}",
                        request_id,
                        query_preview(&query)
                    );
                    self.engine.search(request_id, query);
                }
                Effect::Navigate(target) => {
                    self.navigator.navigate_to(&target.path, &target.query);
                }
                Effect::PublishResults(results) => {
                    self.results.update_search_results(results);
                }
                Effect::CancelInFlight => {
                    self.engine.cancel_in_flight();
                }
            }
        }
    }

    /// Forwards engine events as messages until either side goes away.
    ///
    /// The loop holds only the event receiver, so dropping the runner drops
    /// the engine handle and the loop ends once the engine has wound down.
    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let events = self.engine.events();
        thread::spawn(move || loop {
            let event = match events.recv_timeout(EVENT_POLL) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    search_debug!("Engine stopped; ending event loop");
                    break;
                }
            };
            if msg_tx.send(map_event(event)).is_err() {
                search_debug!("Message channel closed; stopping engine event loop");
                break;
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PredictionsFetched { request_id, result } => Msg::PredictionsLoaded {
            request_id,
            result: result
                .map(|suggestions| {
                    suggestions
                        .into_iter()
                        .map(|suggestion| Prediction::new(suggestion.text))
                        .collect()
                })
                .map_err(|err| err.to_string()),
        },
        EngineEvent::SearchFetched { request_id, result } => Msg::SearchCompleted {
            request_id,
            result: result
                .map(|entries| entries.into_iter().map(SearchResultEntry).collect())
                .map_err(|err| err.to_string()),
        },
    }
}

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use search_logging::{search_debug, search_info};
use tokio_util::sync::CancellationToken;

use crate::fetch::{CompletionService, ReqwestServices, SearchService, ServiceSettings};
use crate::{EngineEvent, FetchError, RequestId};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}

enum EngineCommand {
    Predict { request_id: RequestId, text: String },
    Search { request_id: RequestId, query: String },
    CancelInFlight,
}

/// Receiving side of the engine's events.
///
/// Holding one does not keep the engine alive: once the [`EngineHandle`] is
/// dropped and the engine thread has wound down, receives report
/// [`RecvTimeoutError::Disconnected`].
#[derive(Clone)]
pub struct EngineEvents {
    rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineEvents {
    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        match self.rx.lock() {
            Ok(rx) => rx.recv_timeout(timeout),
            Err(_) => Err(RecvTimeoutError::Disconnected),
        }
    }
}

/// Runs service calls on a background tokio runtime.
///
/// Every call is independent: responses come back through [`EngineEvents`]
/// in arrival order, tagged with the request id they were issued with.
/// Dropping the handle stops the engine thread, its runtime and any
/// request still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    events: EngineEvents,
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings) -> Result<Self, EngineError> {
        let services = Arc::new(ReqwestServices::new(settings)?);
        Self::with_services(services.clone(), services)
    }

    pub fn with_services(
        completion: Arc<dyn CompletionService>,
        search: Arc<dyn SearchService>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let mut cancel = CancellationToken::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Predict { request_id, text } => {
                        let completion = completion.clone();
                        let event_tx = event_tx.clone();
                        let token = cancel.clone();
                        runtime.spawn(async move {
                            tokio::select! {
                                _ = token.cancelled() => {
                                    search_debug!("Prediction request {} cancelled", request_id);
                                }
                                result = completion.complete(&text) => {
                                    let _ = event_tx.send(EngineEvent::PredictionsFetched {
                                        request_id,
                                        result,
                                    });
                                }
                            }
                        });
                    }
                    EngineCommand::Search { request_id, query } => {
                        let search = search.clone();
                        let event_tx = event_tx.clone();
                        let token = cancel.clone();
                        runtime.spawn(async move {
                            tokio::select! {
                                _ = token.cancelled() => {
                                    search_debug!("Search request {} cancelled", request_id);
                                }
                                result = search.search(&query) => {
                                    let _ = event_tx.send(EngineEvent::SearchFetched {
                                        request_id,
                                        result,
                                    });
                                }
                            }
                        });
                    }
                    EngineCommand::CancelInFlight => {
                        search_info!("Cancelling in-flight requests");
                        cancel.cancel();
                        cancel = CancellationToken::new();
                    }
                }
            }
            search_debug!("Engine handle dropped; shutting down runtime");
            cancel.cancel();
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
            // Services and the event sender drop with this closure.
        });

        Ok(Self {
            cmd_tx,
            events: EngineEvents {
                rx: Arc::new(Mutex::new(event_rx)),
            },
        })
    }

    pub fn predict(&self, request_id: RequestId, text: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Predict {
            request_id,
            text: text.into(),
        });
    }

    pub fn search(&self, request_id: RequestId, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Search {
            request_id,
            query: query.into(),
        });
    }

    /// Drops every request issued so far without emitting events for them.
    pub fn cancel_in_flight(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelInFlight);
    }

    /// A receiver for events that does not keep the engine running.
    pub fn events(&self) -> EngineEvents {
        self.events.clone()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.events.try_recv()
    }
}

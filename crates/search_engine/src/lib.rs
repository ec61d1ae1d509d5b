//! Search engine: HTTP adapters for the prediction and search services.
mod decode;
mod engine;
mod fetch;
mod types;

pub use decode::{decode_predictions, decode_search_results};
pub use engine::{EngineError, EngineEvents, EngineHandle};
pub use fetch::{CompletionService, Endpoint, ReqwestServices, SearchService, ServiceSettings};
pub use types::{EngineEvent, FailureKind, FetchError, RequestId, Suggestion};

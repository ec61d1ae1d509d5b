//! Search core: pure state machine for the incremental search bar.
mod capability;
mod completion;
mod effect;
mod msg;
mod navigation;
mod state;
mod update;
mod view_model;

pub use capability::{Navigator, ResultsStore};
pub use completion::{apply_completion, remove_last_word};
pub use effect::Effect;
pub use msg::Msg;
pub use navigation::{NavigationTarget, SEARCH_PATH, SEARCH_QUERY_KEY};
pub use state::{AppState, Phase, Prediction, RequestId, SearchOutcome, SearchResultEntry};
pub use update::update;
pub use view_model::{AppViewModel, SuggestionRow};

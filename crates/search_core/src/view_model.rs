use crate::Phase;

/// Everything a front end needs to draw the search bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub text: String,
    pub phase: Phase,
    pub suggestions: Vec<SuggestionRow>,
    /// Separator between the input and the suggestion list.
    pub show_divider: bool,
    pub search_error: Option<String>,
    pub last_result_count: Option<usize>,
    pub dirty: bool,
}

/// One rendered suggestion: the kept text followed by the completion (shown bold).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRow {
    pub prefix: String,
    pub completion: String,
}

use search_core::{AppViewModel, Phase, SearchResultEntry};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const RESULT_PREVIEW: usize = 5;

/// Renders the search bar and the tail of the owning page as terminal lines.
pub fn render(
    view: &AppViewModel,
    location: Option<&str>,
    results: &[SearchResultEntry],
) -> Vec<String> {
    let phase = match view.phase {
        Phase::Idle => "idle",
        Phase::Editing => "editing",
        Phase::Searching => "searching…",
    };

    let mut lines = vec![format!("> {}", view.text)];

    if view.show_divider {
        lines.push("  ───".to_string());
    }
    for (n, row) in view.suggestions.iter().enumerate() {
        lines.push(format!(
            "  {}. {}{BOLD}{}{RESET}",
            n + 1,
            row.prefix,
            row.completion
        ));
    }

    if let Some(error) = &view.search_error {
        lines.push(format!("  search failed: {error}"));
    }

    lines.push(format!(
        "  [{phase}] location: {} | results: {}",
        location.unwrap_or("/"),
        results.len()
    ));
    for entry in results.iter().take(RESULT_PREVIEW) {
        lines.push(format!("    - {}", entry.0));
    }
    if results.len() > RESULT_PREVIEW {
        lines.push(format!("    … {} more", results.len() - RESULT_PREVIEW));
    }

    lines
}

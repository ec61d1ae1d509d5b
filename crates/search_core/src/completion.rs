use crate::Prediction;

/// Returns `text` with its trailing partial word removed.
///
/// Everything up to and including the rightmost whitespace character is kept,
/// so `"new yor"` becomes `"new "` and a single word becomes `""`.
pub fn remove_last_word(text: &str) -> &str {
    match text.char_indices().rev().find(|(_, ch)| ch.is_whitespace()) {
        Some((idx, ch)) => &text[..idx + ch.len_utf8()],
        None => "",
    }
}

/// Merges a selected prediction into `text` at word granularity.
///
/// The trailing word is replaced by the prediction, followed by one space so
/// the next keystroke starts a new word.
pub fn apply_completion(text: &str, prediction: &Prediction) -> String {
    let kept = remove_last_word(text);
    let mut next = String::with_capacity(kept.len() + prediction.text.len() + 1);
    next.push_str(kept);
    next.push_str(&prediction.text);
    next.push(' ');
    next
}

//! Text helpers

/// Return at most `max_chars` characters of `text`, appending `…` when cut
///
/// Used for log previews of prompts, model replies, and tool output.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

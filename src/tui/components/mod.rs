// Reusable render components

pub mod status_bar;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate a string to a display width, appending an ellipsis when cut.
/// Width-aware so CJK and emoji do not overflow their cell.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

//! Length limiting for display strings.
//!
//! Limits are counted in characters, not bytes, so CJK text is never split
//! inside a code point.

pub const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `max_chars` characters plus [`ELLIPSIS`].
///
/// Cut points, in order of preference:
///
/// 1. the first newline, if the first line fits;
/// 2. the last whole space-separated word that fits;
/// 3. a hard cut at `max_chars`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    if let Some((first_line, _)) = text.split_once('\n') {
        if first_line.chars().count() <= max_chars {
            return format!("{first_line}{ELLIPSIS}");
        }
    }

    if text.contains(' ') {
        let mut result = String::new();
        let mut len = 0;
        for word in text.split(' ') {
            let word_len = word.chars().count();
            // +1 reserves room for the joining space even on the first word
            if len + word_len + 1 > max_chars {
                break;
            }
            if !result.is_empty() {
                result.push(' ');
                len += 1;
            }
            result.push_str(word);
            len += word_len;
        }
        if !result.is_empty() {
            return format!("{result}{ELLIPSIS}");
        }
    }

    let head: String = text.chars().take(max_chars).collect();
    format!("{head}{ELLIPSIS}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

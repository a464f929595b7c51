//! Grapheme-aware width, wrapping and truncation helpers.

use std::borrow::Cow;

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 3;

/// Marker appended to text cut short by [`truncate_chars`].
pub const ELLIPSIS: &str = "…";

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if grapheme == "\t" {
        return TAB_WIDTH;
    }

    if emoji_get(grapheme).is_some() {
        return 2;
    }

    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

pub fn visible_width(input: &str) -> usize {
    input.graphemes(true).map(grapheme_width).sum()
}

/// Right-pad `line` with spaces up to `width` columns.
pub fn pad_to_width(line: &str, width: usize) -> String {
    let padding = width.saturating_sub(visible_width(line));
    format!("{line}{}", " ".repeat(padding))
}

/// Cut `text` to at most `max_width` columns, ending in `ellipsis` when cut.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(text) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = visible_width(ellipsis);
    if ellipsis_width >= max_width {
        return take_width(ellipsis, max_width);
    }

    let mut out = take_width(text, max_width - ellipsis_width);
    out.push_str(ellipsis);
    out
}

/// First `limit` characters of `text` followed by [`ELLIPSIS`], or the whole
/// text borrowed unchanged when it is not longer than `limit`.
pub fn truncate_chars(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..byte_index])),
        None => Cow::Borrowed(text),
    }
}

/// Word-wrap `text` to `width` columns. Explicit newlines are kept, words
/// longer than the width are broken on grapheme boundaries.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let normalized = text.replace('\t', "   ").replace("\r\n", "\n");
    let mut lines = Vec::new();

    for paragraph in normalized.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split(' ') {
            let word_width = visible_width(word);
            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + 1 + word_width
            };

            if needed <= width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_width = needed;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
                continue;
            }

            for grapheme in word.graphemes(true) {
                let grapheme_cols = grapheme_width(grapheme);
                if current_width + grapheme_cols > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push_str(grapheme);
                current_width += grapheme_cols;
            }
        }

        lines.push(current);
    }

    lines
}

fn take_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let cols = grapheme_width(grapheme);
        if used + cols > max_width {
            break;
        }
        out.push_str(grapheme);
        used += cols;
    }
    out
}

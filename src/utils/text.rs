/// Code point ranges rendered two columns wide (CJK, Hangul, fullwidth forms, emoji)
const WIDE_RANGES: &[(char, char)] = &[
    ('\u{1100}', '\u{115F}'),
    ('\u{2E80}', '\u{303E}'),
    ('\u{3040}', '\u{33FF}'),
    ('\u{3400}', '\u{4DBF}'),
    ('\u{4E00}', '\u{9FFF}'),
    ('\u{A000}', '\u{A4CF}'),
    ('\u{AC00}', '\u{D7AF}'),
    ('\u{F900}', '\u{FAFF}'),
    ('\u{FE30}', '\u{FE4F}'),
    ('\u{FF00}', '\u{FF60}'),
    ('\u{FFE0}', '\u{FFE6}'),
    ('\u{1F300}', '\u{1F64F}'),
    ('\u{1F900}', '\u{1F9FF}'),
    ('\u{20000}', '\u{2FFFD}'),
];

pub fn char_width(c: char) -> usize {
    if WIDE_RANGES.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c)) {
        2
    } else {
        1
    }
}

/// Calculate the display width of a string, accounting for wide characters
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Wrap a string into lines with a given maximum display width.
///
/// Breaks at the last space that fits; words longer than a line are split.
pub fn wrap_text(text: &str, max_line_len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if display_width(remaining) <= max_line_len {
            lines.push(remaining.to_string());
            break;
        }

        let mut break_pos = None;
        let mut char_end = 0;
        let mut current_width = 0;
        for (pos, ch) in remaining.char_indices() {
            let width = char_width(ch);
            if current_width + width > max_line_len {
                break;
            }
            if ch == ' ' && pos > 0 {
                break_pos = Some(pos);
            }
            char_end = pos + ch.len_utf8();
            current_width += width;
        }

        match break_pos {
            Some(pos) => {
                lines.push(remaining[..pos].to_string());
                remaining = remaining[pos + 1..].trim_start();
            }
            None => {
                // Always consume at least one character
                if char_end == 0 {
                    char_end = remaining.chars().next().map_or(0, char::len_utf8);
                }
                lines.push(remaining[..char_end].to_string());
                remaining = &remaining[char_end..];
            }
        }
    }
    lines
}

//! Terminal display width helpers.
//!
//! Provides ANSI-aware width calculation so preview labels line up even when
//! persisted zone content carries escape sequences.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(strip_ansi(text).as_str())
}

/// Remove ANSI escape sequences.
pub fn strip_ansi(text: &str) -> String {
    let clean = strip_ansi_escapes::strip(text);
    String::from_utf8_lossy(&clean).into_owned()
}

/// Longest prefix of `text` (escapes removed) that fits in `width` columns.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in strip_ansi(text).chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_escapes() {
        assert_eq!(display_width("\x1b[31mclock\x1b[0m"), 5);
        assert_eq!(display_width("2×1"), 3);
    }

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate_to_width("天気予報", 5), "天気");
        assert_eq!(truncate_to_width("\x1b[1mrss\x1b[0m", 2), "rs");
    }
}

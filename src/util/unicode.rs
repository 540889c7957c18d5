//! Grapheme- and width-aware helpers for task text and the input fields.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Terminal cells needed to draw `s`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_cells` cells, ending in `…` when anything was cut.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }

    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::with_capacity(s.len());
    for g in s.graphemes(true) {
        used += display_width(g);
        if used > budget {
            break;
        }
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Byte offset of the grapheme after the one at `at`, or None at the end.
pub fn next_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    let rest = s.get(at..).filter(|r| !r.is_empty())?;
    let len = rest.graphemes(true).next().map_or(rest.len(), str::len);
    Some(at + len)
}

/// Byte offset where the grapheme ending at `at` starts, or None at the start.
pub fn prev_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    if at == 0 {
        return None;
    }
    s[..at].grapheme_indices(true).next_back().map(|(i, _)| i)
}

/// Cell column of byte offset `at`.
pub fn byte_offset_to_display_col(s: &str, at: usize) -> usize {
    display_width(&s[..at.min(s.len())])
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word left of `at`, skipping any whitespace first.
pub fn word_boundary_left(s: &str, at: usize) -> usize {
    let mut start = at.min(s.len());
    let mut seen_word = false;
    for (i, g) in s[..start].grapheme_indices(true).rev() {
        if is_blank(g) {
            if seen_word {
                break;
            }
        } else {
            seen_word = true;
        }
        start = i;
    }
    start
}

/// Start of the next word right of `at`, or the end of `s`.
pub fn word_boundary_right(s: &str, at: usize) -> usize {
    let at = at.min(s.len());
    let mut in_gap = false;
    for (i, g) in s[at..].grapheme_indices(true) {
        if is_blank(g) {
            in_gap = true;
        } else if in_gap {
            return at + i;
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(display_width("Buy milk"), 8);
        assert_eq!(display_width("买牛奶"), 6);
        assert_eq!(display_width("\u{1F514} 09:00"), 8);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Buy milk", 8), "Buy milk");
        assert_eq!(truncate_to_width("Buy milk", 20), "Buy milk");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("Walk the dog", 9), "Walk the\u{2026}");
        assert_eq!(truncate_to_width("Walk the dog", 1), "\u{2026}");
        assert_eq!(truncate_to_width("Walk the dog", 0), "");
    }

    #[test]
    fn truncate_respects_wide_graphemes() {
        // 买 and 牛 are two cells each; only one fits before the ellipsis
        assert_eq!(truncate_to_width("买牛奶", 4), "买\u{2026}");
        assert_eq!(truncate_to_width("\u{1F389}\u{1F680}\u{1F4AB}", 5), "\u{1F389}\u{1F680}\u{2026}");
    }

    #[test]
    fn grapheme_steps() {
        let s = "a\u{1F389}e\u{0301}";
        assert_eq!(next_grapheme_boundary(s, 0), Some(1));
        assert_eq!(next_grapheme_boundary(s, 1), Some(5));
        assert_eq!(next_grapheme_boundary(s, 5), Some(s.len()));
        assert_eq!(next_grapheme_boundary(s, s.len()), None);

        assert_eq!(prev_grapheme_boundary(s, s.len()), Some(5));
        assert_eq!(prev_grapheme_boundary(s, 5), Some(1));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn zwj_sequence_is_one_step() {
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
        assert_eq!(next_grapheme_boundary(family, 0), Some(family.len()));
        assert_eq!(prev_grapheme_boundary(family, family.len()), Some(0));
    }

    #[test]
    fn display_col_of_offset() {
        assert_eq!(byte_offset_to_display_col("milk", 2), 2);
        assert_eq!(byte_offset_to_display_col("买牛奶", 3), 2);
        assert_eq!(byte_offset_to_display_col("买牛奶", 99), 6);
    }

    #[test]
    fn word_moves() {
        let s = "call  the vet";
        assert_eq!(word_boundary_left(s, s.len()), 10);
        assert_eq!(word_boundary_left(s, 10), 6);
        assert_eq!(word_boundary_left(s, 6), 0);
        assert_eq!(word_boundary_left(s, 0), 0);

        assert_eq!(word_boundary_right(s, 0), 6);
        assert_eq!(word_boundary_right(s, 6), 10);
        assert_eq!(word_boundary_right(s, 10), s.len());
    }

    #[test]
    fn word_moves_over_wide_text() {
        let s = "buy 牛奶";
        assert_eq!(word_boundary_left(s, s.len()), 4);
        assert_eq!(word_boundary_right(s, 0), 4);
    }
}

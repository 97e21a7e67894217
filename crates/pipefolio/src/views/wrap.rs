//! Width-aware text helpers

use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cut `text` to at most `width` columns, ending in `…` when shortened
pub fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Pad with spaces to exactly `width` columns (truncating if longer)
pub fn pad_to(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(display_width(&text));
    format!("{text}{}", " ".repeat(fill))
}

/// Greedy word wrap. Words longer than the width are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = display_width(word);
        if current_width > 0 && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
            continue;
        }
        if current_width > 0 {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }
        // Hard split
        for ch in word.chars() {
            let w = ch.width().unwrap_or(0);
            if current_width + w > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += w;
        }
    }
    if current_width > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay out groups of spans left to right, starting a new line when the next
/// group would overflow. Groups are separated by `gap` spaces.
pub fn flow(groups: Vec<Vec<Span<'static>>>, width: usize, indent: usize, gap: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for group in groups {
        let group_width: usize = group.iter().map(|span| display_width(&span.content)).sum();
        let needed = if current.is_empty() { group_width } else { gap + group_width };
        if !current.is_empty() && indent + used + needed > width {
            lines.push(Line::from(std::mem::take(&mut current)));
            used = 0;
        }
        if current.is_empty() {
            current.push(Span::raw(" ".repeat(indent)));
        } else {
            current.push(Span::raw(" ".repeat(gap)));
            used += gap;
        }
        used += group_width;
        current.extend(group);
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_breaks_on_words() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_empty_gives_one_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_truncate_respects_wide_chars() {
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("日本語", 5), "日本…");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_pad_to_exact_width() {
        assert_eq!(pad_to("ab", 4), "ab  ");
        assert_eq!(display_width(&pad_to("abcdef", 4)), 4);
    }

    #[test]
    fn test_flow_wraps_groups() {
        let groups = vec![
            vec![Span::raw("aaaa")],
            vec![Span::raw("bbbb")],
            vec![Span::raw("cccc")],
        ];
        let lines = flow(groups, 10, 0, 1);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].to_string(), "aaaa bbbb");
        assert_eq!(lines[1].to_string(), "cccc");
    }
}

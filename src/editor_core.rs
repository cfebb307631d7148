//! Headless authoring logic for the blog editor.
//!
//! The view layer owns a plain `<textarea>`; everything that manipulates its
//! text lives here so it can be tested without a DOM. Offsets are byte
//! offsets into the Rust string; the UTF-16 helpers at the bottom convert to
//! and from the units `selectionStart`/`selectionEnd` report.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// Toolbar snippets. Each one is a fixed piece of markdown dropped at the
/// caret; there is no wrap-around-selection mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Snippet {
    Heading,
    Bold,
    Italic,
    BulletList,
    OrderedList,
    Image,
    Link,
}

impl Snippet {
    pub fn text(self) -> &'static str {
        match self {
            Snippet::Heading => "# ",
            Snippet::Bold => "**bold**",
            Snippet::Italic => "*italic*",
            Snippet::BulletList => "- ",
            Snippet::OrderedList => "1. ",
            Snippet::Image => "![alt text](https://InsertImageLinkHere)",
            Snippet::Link => "[link text](https://www.example.com)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Snippet::Heading => "Heading",
            Snippet::Bold => "Bold",
            Snippet::Italic => "Italic",
            Snippet::BulletList => "Bullet list",
            Snippet::OrderedList => "Numbered list",
            Snippet::Image => "Image",
            Snippet::Link => "Link",
        }
    }

    /// Toolbar order.
    pub const ALL: [Snippet; 7] = [
        Snippet::Heading,
        Snippet::Bold,
        Snippet::Italic,
        Snippet::BulletList,
        Snippet::OrderedList,
        Snippet::Image,
        Snippet::Link,
    ];
}

/// Replaces `selection` in `text` with `snippet` and returns the new text
/// together with the caret position, which lands right after the insert.
pub fn insert_snippet(text: &str, selection: Selection, snippet: &str) -> (String, usize) {
    let selection = clamp_to_boundary(text, selection);
    let mut out = String::with_capacity(text.len() + snippet.len());
    out.push_str(&text[..selection.start]);
    out.push_str(snippet);
    out.push_str(&text[selection.end..]);
    (out, selection.start + snippet.len())
}

fn clamp_to_boundary(text: &str, selection: Selection) -> Selection {
    let selection = selection.clamp(text.len());
    Selection::new(
        floor_char_boundary(text, selection.start),
        floor_char_boundary(text, selection.end),
    )
}

fn floor_char_boundary(text: &str, mut pos: usize) -> usize {
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Byte offset for a UTF-16 position, as reported by a textarea.
pub fn utf16_to_byte_idx(s: &str, pos_utf16: u32) -> usize {
    if pos_utf16 == 0 {
        return 0;
    }
    let mut acc: u32 = 0;
    for (i, ch) in s.char_indices() {
        let w = ch.len_utf16() as u32;
        if acc + w > pos_utf16 {
            return i;
        }
        acc += w;
        if acc == pos_utf16 {
            return i + ch.len_utf8();
        }
    }
    s.len()
}

/// UTF-16 position for a byte offset, for writing the caret back.
pub fn byte_idx_to_utf16(s: &str, byte_idx: usize) -> u32 {
    s[..byte_idx.min(s.len())].encode_utf16().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_at_cursor() {
        let (text, caret) = insert_snippet("Hello world", Selection::cursor(5), "**bold**");
        assert_eq!(text, "Hello**bold** world");
        assert_eq!(caret, 5 + "**bold**".len());
    }

    #[test]
    fn replaces_active_selection() {
        let (text, caret) = insert_snippet("Hello world", Selection::new(6, 11), "*italic*");
        assert_eq!(text, "Hello *italic*");
        assert_eq!(caret, text.len());
    }

    #[test]
    fn clamps_out_of_range_selection() {
        let (text, caret) = insert_snippet("ab", Selection::new(10, 20), "# ");
        assert_eq!(text, "ab# ");
        assert_eq!(caret, 4);
    }

    #[test]
    fn respects_char_boundaries() {
        // A caret reported inside the 4-byte emoji gets snapped back.
        let base = "a\u{1f600}b";
        let (text, caret) = insert_snippet(base, Selection::cursor(2), "- ");
        assert_eq!(text, "a- \u{1f600}b");
        assert_eq!(caret, 3);
    }

    #[test]
    fn utf16_conversion_round_trips() {
        let s = "a\u{1f600}b\u{00e9}c";
        for (byte_idx, _) in s.char_indices() {
            let u16_idx = byte_idx_to_utf16(s, byte_idx);
            assert_eq!(utf16_to_byte_idx(s, u16_idx), byte_idx);
        }
        assert_eq!(utf16_to_byte_idx(s, byte_idx_to_utf16(s, s.len())), s.len());
    }

    #[test]
    fn snippet_texts_match_toolbar() {
        assert_eq!(Snippet::Heading.text(), "# ");
        assert_eq!(Snippet::Bold.text(), "**bold**");
        assert_eq!(Snippet::OrderedList.text(), "1. ");
    }
}

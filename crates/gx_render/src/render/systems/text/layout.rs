//! Paragraph layout
//!
//! Greedy word wrapping over an arbitrary advance function. Rows borrow from
//! the source text; words are never split, so a word wider than the limit
//! ends up alone on its own row.

/// Horizontal text alignment inside a box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// Rows start at the left edge
    #[default]
    Left,
    /// Rows are centered
    Center,
    /// Rows end at the right edge
    Right,
}

/// Vertical text alignment inside a box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Paragraph starts at the top edge
    #[default]
    Top,
    /// Paragraph is centered
    Middle,
    /// Paragraph ends at the bottom edge
    Bottom,
}

impl HorizontalAlign {
    /// Offset of a row of `row_width` inside a box of `box_width`
    pub fn offset(self, row_width: f32, box_width: f32) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5 * (box_width - row_width),
            Self::Right => box_width - row_width,
        }
    }
}

impl VerticalAlign {
    /// Offset of a paragraph of `text_height` inside a box of `box_height`
    pub fn offset(self, text_height: f32, box_height: f32) -> f32 {
        match self {
            Self::Top => 0.0,
            Self::Middle => 0.5 * (box_height - text_height),
            Self::Bottom => box_height - text_height,
        }
    }
}

/// One laid-out row of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRow<'t> {
    /// Row contents, without the space it was broken at
    pub text: &'t str,
    /// Sum of the advances of the row's characters
    pub width: f32,
}

/// Break `text` into rows no wider than `max_width` where possible
///
/// Rows are split at runs of spaces. A word that would push the current row
/// past `max_width` starts a new row; a word wider than the limit on its own
/// keeps a row to itself. The space run a row was broken at belongs to
/// neither row, and leading or trailing spaces never produce a row.
pub fn break_lines<F>(text: &str, max_width: f32, mut advance: F) -> Vec<TextRow<'_>>
where
    F: FnMut(char) -> f32,
{
    let mut rows = Vec::new();
    // (start byte, end byte, width) of the row being filled
    let mut row: Option<(usize, usize, f32)> = None;
    let mut gap_width = 0.0;
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch == ' ' {
            gap_width += advance(ch);
            chars.next();
            continue;
        }

        let mut end = start;
        let mut word_width = 0.0;
        while let Some(&(i, ch)) = chars.peek() {
            if ch == ' ' {
                break;
            }
            word_width += advance(ch);
            end = i + ch.len_utf8();
            chars.next();
        }

        row = match row {
            Some((row_start, _, width)) if width + gap_width + word_width <= max_width => {
                Some((row_start, end, width + gap_width + word_width))
            }
            Some((row_start, row_end, width)) => {
                rows.push(TextRow {
                    text: &text[row_start..row_end],
                    width,
                });
                Some((start, end, word_width))
            }
            None => Some((start, end, word_width)),
        };
        gap_width = 0.0;
    }

    if let Some((row_start, row_end, width)) = row {
        rows.push(TextRow {
            text: &text[row_start..row_end],
            width,
        });
    }

    rows
}

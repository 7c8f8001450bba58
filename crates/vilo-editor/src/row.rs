//! A single line of text with its tab-expanded rendering.
//!
//! Every row carries two strings: the raw characters as loaded, and the
//! rendered form where each tab is replaced by enough spaces to reach the
//! next multiple-of-[`TAB_STOP`] column. The render is a pure function of
//! the raw content and is computed at construction, so it can never go
//! stale relative to its source.
//!
//! Columns come in two coordinate systems: `cx` counts raw characters,
//! `rx` counts rendered columns. [`Row::cx_to_rx`] maps between them with
//! the same tab-stop rule the renderer uses.

// ---------------------------------------------------------------------------
// Tab stops
// ---------------------------------------------------------------------------

/// Tab stop width: a tab advances to the next multiple of this column.
pub const TAB_STOP: usize = 8;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of the text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Raw characters, trailing newline already stripped.
    chars: String,
    /// Tab-expanded form of `chars`.
    render: String,
}

impl Row {
    /// Build a row from raw text, computing its rendered form.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let chars = text.into();
        let render = expand_tabs(&chars);
        Self { chars, render }
    }

    /// Raw content.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.chars
    }

    /// Rendered content (tabs expanded to spaces).
    #[inline]
    #[must_use]
    pub fn render(&self) -> &str {
        &self.render
    }

    /// Raw character count — the upper bound for a cursor on this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.chars().count()
    }

    /// True if the row holds no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Rendered character count.
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.chars().count()
    }

    /// Map a raw column to its rendered column.
    ///
    /// Walks the raw characters before `cx`, advancing by the tab-stop
    /// rule for each tab and by one for everything else. Does not mutate
    /// the row. Monotonically non-decreasing in `cx`, and the identity
    /// when no tab precedes `cx`.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for ch in self.chars.chars().take(cx) {
            if ch == '\t' {
                rx += TAB_STOP - (rx % TAB_STOP);
            } else {
                rx += 1;
            }
        }
        rx
    }
}

// ---------------------------------------------------------------------------
// Tab expansion
// ---------------------------------------------------------------------------

/// Expand tabs to spaces at [`TAB_STOP`]-column boundaries.
///
/// Each tab inserts `TAB_STOP - (column % TAB_STOP)` spaces — between one
/// and [`TAB_STOP`] of them. All other characters copy through 1:1.
fn expand_tabs(raw: &str) -> String {
    let mut render = String::with_capacity(raw.len());
    let mut col = 0;

    for ch in raw.chars() {
        if ch == '\t' {
            let pad = TAB_STOP - (col % TAB_STOP);
            for _ in 0..pad {
                render.push(' ');
            }
            col += pad;
        } else {
            render.push(ch);
            col += 1;
        }
    }

    render
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- Rendering ------------------------------------------------------------

    #[test]
    fn plain_text_renders_unchanged() {
        let row = Row::new("hello world");
        assert_eq!(row.render(), "hello world");
        assert_eq!(row.len(), row.render_len());
    }

    #[test]
    fn tab_after_one_char_fills_to_column_eight() {
        let row = Row::new("a\tb");
        assert_eq!(row.render(), "a       b");
        assert_eq!(row.render_len(), 9);
    }

    #[test]
    fn tab_at_line_start_is_eight_spaces() {
        let row = Row::new("\tx");
        assert_eq!(row.render(), "        x");
    }

    #[test]
    fn tab_exactly_at_stop_advances_a_full_stop() {
        // Eight chars land the tab on a stop boundary; it still advances.
        let row = Row::new("12345678\tx");
        assert_eq!(row.render(), "12345678        x");
    }

    #[test]
    fn consecutive_tabs() {
        let row = Row::new("\t\t");
        assert_eq!(row.render(), " ".repeat(16));
    }

    #[test]
    fn tab_near_stop_inserts_single_space() {
        let row = Row::new("1234567\tx");
        assert_eq!(row.render(), "1234567 x");
    }

    #[test]
    fn empty_row() {
        let row = Row::new("");
        assert!(row.is_empty());
        assert_eq!(row.len(), 0);
        assert_eq!(row.render_len(), 0);
    }

    #[test]
    fn rendering_is_idempotent() {
        let a = Row::new("a\tb\tc");
        let b = Row::new("a\tb\tc");
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn identical_raw_content_contributes_identical_expansion() {
        let once = Row::new("ab\t");
        let twice = Row::new("ab\tab\t");
        // Each copy ends on a stop boundary, so the second contributes
        // exactly the same rendered length again.
        assert_eq!(twice.render_len(), 2 * once.render_len());
    }

    // -- cx_to_rx ---------------------------------------------------------------

    #[test]
    fn cx_to_rx_identity_without_tabs() {
        let row = Row::new("abcdef");
        for cx in 0..=row.len() {
            assert_eq!(row.cx_to_rx(cx), cx);
        }
    }

    #[test]
    fn cx_to_rx_jumps_across_tab() {
        let row = Row::new("a\tb");
        assert_eq!(row.cx_to_rx(0), 0);
        assert_eq!(row.cx_to_rx(1), 1); // before the tab
        assert_eq!(row.cx_to_rx(2), 8); // after the tab
        assert_eq!(row.cx_to_rx(3), 9); // after 'b'
    }

    #[test]
    fn cx_to_rx_is_monotonic() {
        let row = Row::new("\ta\tbc\t\td");
        let mut prev = 0;
        for cx in 0..=row.len() {
            let rx = row.cx_to_rx(cx);
            assert!(rx >= prev, "rx must never decrease (cx={cx})");
            prev = rx;
        }
    }

    #[test]
    fn cx_to_rx_identity_before_first_tab() {
        let row = Row::new("abc\tdef");
        assert_eq!(row.cx_to_rx(3), 3);
        assert_eq!(row.cx_to_rx(4), 8);
    }
}

//! Scroll offsets mapping buffer coordinates to the visible window.
//!
//! Recomputed once per frame, before rendering, as a pure function of the
//! cursor position and the previous offsets. The adjustment is minimal:
//! an offset only moves when the cursor would otherwise leave the visible
//! window — no recentering.
//!
//! After [`Viewport::scroll`] the invariants hold:
//!
//! ```text
//! rowoff <= cy < rowoff + visible_rows
//! coloff <= rx < coloff + visible_cols
//! ```
//!
//! where `rx` is the rendered column of the cursor (see
//! [`Row::cx_to_rx`](crate::row::Row::cx_to_rx)).

use crate::buffer::TextBuffer;
use crate::cursor::Cursor;

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Scroll state: which slice of the buffer is on screen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible buffer row.
    rowoff: usize,
    /// First visible rendered column.
    coloff: usize,
    /// Rendered column of the cursor, derived on each scroll.
    rx: usize,
}

impl Viewport {
    /// A viewport at the top-left of the buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rowoff: 0,
            coloff: 0,
            rx: 0,
        }
    }

    /// First visible buffer row.
    #[inline]
    #[must_use]
    pub const fn rowoff(&self) -> usize {
        self.rowoff
    }

    /// First visible rendered column.
    #[inline]
    #[must_use]
    pub const fn coloff(&self) -> usize {
        self.coloff
    }

    /// Rendered cursor column, as of the last [`scroll`](Self::scroll).
    #[inline]
    #[must_use]
    pub const fn rx(&self) -> usize {
        self.rx
    }

    /// Bring the cursor back inside a `rows` × `cols` window.
    ///
    /// Derives `rx` from the cursor's raw column (or carries `cx`
    /// unchanged when `cy` is past the last row), then applies the
    /// minimal offset adjustment on each axis.
    pub fn scroll(&mut self, cursor: &Cursor, buffer: &TextBuffer, rows: usize, cols: usize) {
        self.rx = buffer
            .row(cursor.cy)
            .map_or(cursor.cx, |row| row.cx_to_rx(cursor.cx));

        if rows == 0 || cols == 0 {
            return;
        }

        self.rowoff = self.rowoff.min(cursor.cy);
        if cursor.cy >= self.rowoff + rows {
            self.rowoff = cursor.cy - rows + 1;
        }

        self.coloff = self.coloff.min(cursor.cx);
        if self.rx >= self.coloff + cols {
            self.coloff = self.rx - cols + 1;
        }
    }

    /// Screen position of the cursor as `(row, col)`, both zero-based.
    ///
    /// Only meaningful after [`scroll`](Self::scroll) — the per-frame
    /// recomputation is what keeps these subtractions in range.
    #[must_use]
    pub const fn cursor_screen_pos(&self, cursor: &Cursor) -> (usize, usize) {
        (cursor.cy - self.rowoff, self.rx - self.coloff)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Cursor position and clamped movement.
//!
//! The cursor lives in buffer coordinates: `cx` counts raw characters on
//! the row, `cy` counts rows. Movement never leaves the buffer:
//!
//! - Left floors at column 0; Right stops at end-of-row.
//! - Up floors at row 0; Down holds at the last row.
//! - After any vertical move, `cx` is clamped to the length of the row
//!   the cursor landed on — moving onto a shorter row truncates the
//!   column, never leaving the cursor past end-of-line.
//!
//! A `cy` past the last row (the empty-buffer case) is treated as a
//! zero-length row everywhere, so no operation ever needs a row to exist.

use crate::buffer::TextBuffer;
use crate::row::Row;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// A single-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Cursor position in buffer coordinates (both zero-based).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Column index, counted in raw characters (not rendered columns).
    pub cx: usize,
    /// Row index.
    pub cy: usize,
}

impl Cursor {
    /// A cursor at the top-left of the buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { cx: 0, cy: 0 }
    }

    /// Move one step in `dir`, clamped to the buffer.
    pub fn step(&mut self, dir: Direction, buffer: &TextBuffer) {
        match dir {
            Direction::Left => {
                self.cx = self.cx.saturating_sub(1);
            }
            Direction::Right => {
                if let Some(row) = buffer.row(self.cy) {
                    if self.cx < row.len() {
                        self.cx += 1;
                    }
                }
            }
            Direction::Up => {
                self.cy = self.cy.saturating_sub(1);
            }
            Direction::Down => {
                if self.cy + 1 < buffer.len() {
                    self.cy += 1;
                }
            }
        }

        self.clamp_column(buffer);
    }

    /// Move to column 0 of the current row.
    pub fn line_start(&mut self) {
        self.cx = 0;
    }

    /// Move past the last character of the current row.
    ///
    /// An absent row (cursor past the buffer end) counts as zero-length.
    pub fn line_end(&mut self, buffer: &TextBuffer) {
        self.cx = buffer.row(self.cy).map_or(0, Row::len);
    }

    /// Clamp `cx` to the length of the row now under the cursor.
    fn clamp_column(&mut self, buffer: &TextBuffer) {
        let len = buffer.row(self.cy).map_or(0, Row::len);
        if self.cx > len {
            self.cx = len;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> TextBuffer {
        let mut buffer = TextBuffer::new();
        for line in lines {
            buffer.append_row(line);
        }
        buffer
    }

    // -- Horizontal -----------------------------------------------------------

    #[test]
    fn left_floors_at_zero() {
        let buf = buffer(&["abc"]);
        let mut cursor = Cursor::new();
        cursor.step(Direction::Left, &buf);
        assert_eq!(cursor, Cursor { cx: 0, cy: 0 });
    }

    #[test]
    fn right_advances_within_row() {
        let buf = buffer(&["abc"]);
        let mut cursor = Cursor::new();
        cursor.step(Direction::Right, &buf);
        assert_eq!(cursor.cx, 1);
    }

    #[test]
    fn right_stops_at_end_of_row() {
        let buf = buffer(&["ab"]);
        let mut cursor = Cursor { cx: 2, cy: 0 };
        cursor.step(Direction::Right, &buf);
        assert_eq!(cursor.cx, 2);
    }

    #[test]
    fn right_in_empty_buffer_is_a_noop() {
        let buf = TextBuffer::new();
        let mut cursor = Cursor::new();
        cursor.step(Direction::Right, &buf);
        assert_eq!(cursor, Cursor::new());
    }

    // -- Vertical -------------------------------------------------------------

    #[test]
    fn up_floors_at_first_row() {
        let buf = buffer(&["a", "b"]);
        let mut cursor = Cursor::new();
        cursor.step(Direction::Up, &buf);
        assert_eq!(cursor.cy, 0);
    }

    #[test]
    fn down_holds_at_last_row() {
        let buf = buffer(&["a", "b"]);
        let mut cursor = Cursor { cx: 0, cy: 1 };
        cursor.step(Direction::Down, &buf);
        assert_eq!(cursor.cy, 1);
    }

    #[test]
    fn down_in_empty_buffer_is_a_noop() {
        let buf = TextBuffer::new();
        let mut cursor = Cursor::new();
        cursor.step(Direction::Down, &buf);
        assert_eq!(cursor, Cursor::new());
    }

    #[test]
    fn moving_onto_shorter_row_clamps_column() {
        // Rows "abc"/"de", cursor at end of "abc": Down lands on row 1
        // with cx clamped to 2.
        let buf = buffer(&["abc", "de"]);
        let mut cursor = Cursor { cx: 3, cy: 0 };
        cursor.step(Direction::Down, &buf);
        assert_eq!(cursor, Cursor { cx: 2, cy: 1 });
    }

    #[test]
    fn moving_onto_longer_row_keeps_column() {
        let buf = buffer(&["de", "abc"]);
        let mut cursor = Cursor { cx: 2, cy: 0 };
        cursor.step(Direction::Down, &buf);
        assert_eq!(cursor, Cursor { cx: 2, cy: 1 });
    }

    // -- Line start / end -------------------------------------------------------

    #[test]
    fn line_start_resets_column() {
        let mut cursor = Cursor { cx: 5, cy: 0 };
        cursor.line_start();
        assert_eq!(cursor.cx, 0);
    }

    #[test]
    fn line_end_moves_past_last_char() {
        let buf = buffer(&["hello"]);
        let mut cursor = Cursor::new();
        cursor.line_end(&buf);
        assert_eq!(cursor.cx, 5);
    }

    #[test]
    fn line_end_without_a_row_clamps_to_zero() {
        let buf = TextBuffer::new();
        let mut cursor = Cursor { cx: 3, cy: 0 };
        cursor.line_end(&buf);
        assert_eq!(cursor.cx, 0);
    }
}

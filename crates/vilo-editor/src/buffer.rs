//! The text buffer: an ordered sequence of [`Row`]s.
//!
//! Row order is line order — index 0 is the first line of the file.
//! The buffer owns its rows exclusively; the only way content gets in is
//! [`TextBuffer::append_row`], which computes the rendered form as part
//! of construction.
//!
//! Loading a file strips the entire trailing `\r`/`\n` run from each line
//! before appending it, so rows never carry line terminators.

use std::fs;
use std::io;
use std::path::Path;

use crate::row::Row;

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// An ordered, owned sequence of text rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    rows: Vec<Row>,
}

impl TextBuffer {
    /// An empty buffer (what the editor starts with when no file is named).
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Load a buffer from a file on disk.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be opened or
    /// read. The caller treats this as fatal — there is nothing to edit.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut buffer = Self::new();
        buffer.extend_from_text(&text);
        Ok(buffer)
    }

    /// Append the lines of `text` as rows.
    ///
    /// Splits on `\n`; a trailing newline does not produce a final empty
    /// row (matching line-at-a-time file reads). Each line loses its
    /// trailing run of `\r` characters.
    pub fn extend_from_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let body = text.strip_suffix('\n').unwrap_or(text);
        for line in body.split('\n') {
            self.append_row(line.trim_end_matches('\r'));
        }
    }

    /// Append one row of raw content at the end of the buffer.
    ///
    /// The caller has already stripped any line terminator. The rendered
    /// form is computed here.
    pub fn append_row(&mut self, text: &str) {
        self.rows.push(Row::new(text));
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the buffer has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `at`, or `None` past the last row.
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// All rows in line order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_lines(buffer: &TextBuffer) -> Vec<&str> {
        buffer.rows().iter().map(Row::raw).collect()
    }

    // -- Construction -----------------------------------------------------------

    #[test]
    fn new_buffer_is_empty() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.row(0).is_none());
    }

    #[test]
    fn append_preserves_order() {
        let mut buffer = TextBuffer::new();
        buffer.append_row("first");
        buffer.append_row("second");
        buffer.append_row("third");
        assert_eq!(raw_lines(&buffer), ["first", "second", "third"]);
    }

    #[test]
    fn append_computes_render() {
        let mut buffer = TextBuffer::new();
        buffer.append_row("a\tb");
        assert_eq!(buffer.row(0).unwrap().render(), "a       b");
    }

    // -- Text population ----------------------------------------------------------

    #[test]
    fn extend_splits_lines() {
        let mut buffer = TextBuffer::new();
        buffer.extend_from_text("one\ntwo\nthree\n");
        assert_eq!(raw_lines(&buffer), ["one", "two", "three"]);
    }

    #[test]
    fn trailing_newline_adds_no_empty_row() {
        let mut with = TextBuffer::new();
        with.extend_from_text("abc\n");
        let mut without = TextBuffer::new();
        without.extend_from_text("abc");
        assert_eq!(with, without);
    }

    #[test]
    fn blank_lines_are_kept() {
        let mut buffer = TextBuffer::new();
        buffer.extend_from_text("a\n\nb\n");
        assert_eq!(raw_lines(&buffer), ["a", "", "b"]);
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let mut buffer = TextBuffer::new();
        buffer.extend_from_text("dos\r\nstyle\r\r\n");
        assert_eq!(raw_lines(&buffer), ["dos", "style"]);
    }

    #[test]
    fn empty_text_adds_nothing() {
        let mut buffer = TextBuffer::new();
        buffer.extend_from_text("");
        assert!(buffer.is_empty());
    }

    #[test]
    fn lone_newline_is_one_empty_row() {
        let mut buffer = TextBuffer::new();
        buffer.extend_from_text("\n");
        assert_eq!(raw_lines(&buffer), [""]);
    }

    // -- File loading -------------------------------------------------------------

    #[test]
    fn load_reads_file_contents() {
        let path = std::env::temp_dir().join(format!("vilo-buffer-test-{}", std::process::id()));
        fs::write(&path, "alpha\nbeta\n").unwrap();

        let buffer = TextBuffer::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(raw_lines(&buffer), ["alpha", "beta"]);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let path = Path::new("/nonexistent/vilo-no-such-file");
        assert!(TextBuffer::load(path).is_err());
    }
}

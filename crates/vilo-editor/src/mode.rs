//! Vim-style modal input state.
//!
//! The editor is always in exactly one [`Mode`]. Normal mode interprets
//! letter keys as commands; Insert mode reserves them for (future) text
//! input, so the movement letters are swallowed there. This is a pure
//! data type — key dispatch lives in the binary.

use std::fmt;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current input mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Default mode. Keys are commands, not text input.
    #[default]
    Normal,
    /// Text entry mode. Movement letters are reserved as literal input.
    Insert,
}

impl Mode {
    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
        }
    }

    /// Status-bar indicator field.
    ///
    /// Equal width in both modes so the rest of the status line never
    /// shifts when the mode changes.
    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Normal => "             ",
            Self::Insert => "-- INSERT -- ",
        }
    }

    /// True in Insert mode.
    #[inline]
    #[must_use]
    pub const fn is_insert(self) -> bool {
        matches!(self, Self::Insert)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

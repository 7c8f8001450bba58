// SPDX-License-Identifier: MIT
//
// Terminal key decoding.
#![allow(unsafe_code)]
//
// Turns the raw stdin byte stream into logical keys. Handles the legacy
// escape sequences a VT100-descendant terminal emits for the navigation
// cluster:
//
// - CSI letter sequences (`ESC [ A` .. `ESC [ D`, `ESC [ H`, `ESC [ F`)
// - CSI tilde sequences (`ESC [ 3 ~` and friends)
// - SS3 sequences (`ESC O H` / `ESC O F` from application-mode terminals)
//
// Everything else passes through verbatim: a printable byte is a
// [`Key::Char`], and so is a control byte — no filtering, no case
// conversion. The dispatcher decides what Ctrl-Q means, not the decoder.
//
// # The ESC ambiguity
//
// A bare ESC byte (0x1B) could be the Escape key or the start of a
// sequence. Raw mode is configured with `VMIN=0, VTIME=1`, so a read
// returns empty after 100 ms of silence. The decoder exploits that: after
// an ESC it attempts the continuation reads, and the moment one of them
// comes back empty (or the bytes don't form a known sequence) it resolves
// to a plain [`Key::Escape`]. Incomplete input is never an error.
//
// # Testability
//
// The decoder pulls bytes through the [`ByteSource`] trait rather than
// reading stdin directly, so tests drive it with a scripted source where
// `None` plays the role of a read timeout.

use std::io;

// ─── Keys ───────────────────────────────────────────────────────────────────

/// A decoded logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A literal byte, control characters included, passed through
    /// verbatim as its one-byte character value.
    Char(char),
    /// The Escape key — also the resolution of any incomplete or
    /// unrecognized escape sequence.
    Escape,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Editing ─────────────────────────────────────────────────
    Delete,
}

/// The character produced by holding Ctrl with `c`.
///
/// Mirrors what the terminal sends: Ctrl clears the top three bits of the
/// ASCII value, so Ctrl-Q arrives as byte `0x11`.
#[must_use]
pub const fn ctrl(c: char) -> char {
    ((c as u8) & 0x1f) as char
}

// ─── Byte Sources ───────────────────────────────────────────────────────────

/// One-byte-at-a-time input with timeout semantics.
///
/// `Ok(Some(byte))` is data, `Ok(None)` is a read that returned empty
/// (the `VTIME` timeout elapsed — an expected poll, not a failure), and
/// `Err` is a real I/O error.
pub trait ByteSource {
    /// Read the next byte, or `None` on timeout.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than the timeout itself.
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

/// The process's stdin as a [`ByteSource`].
///
/// Relies on raw mode's `VMIN=0, VTIME=1` configuration: each `read(2)`
/// returns one byte as soon as it is available, or zero bytes after
/// 100 ms of silence.
pub struct Stdin;

#[cfg(unix)]
impl ByteSource for Stdin {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                (&raw mut byte).cast::<libc::c_void>(),
                1,
            )
        };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                // EAGAIN shows up on some platforms instead of a zero-byte
                // return; treat it as the same timeout.
                if err.kind() == io::ErrorKind::WouldBlock {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for Stdin {
    /// Degraded fallback: blocking one-byte reads with no timeout, so a
    /// lone ESC is only resolved when the next key arrives.
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Block until one logical key is available and decode it.
///
/// Empty reads before the first byte are retried transparently (the
/// caller never sees the timeout). Once an ESC arrives, up to two
/// continuation bytes are read; an empty read there means the ESC stood
/// alone, and the sequence resolves to [`Key::Escape`]. The same applies
/// to any sequence the table below doesn't recognize.
///
/// Sequence table:
///
/// | bytes               | key                                   |
/// |---------------------|---------------------------------------|
/// | `ESC [ A/B/C/D`     | Up / Down / Right / Left              |
/// | `ESC [ H` / `ESC [ F` | Home / End                          |
/// | `ESC [ 1~` / `ESC [ 7~` | Home                              |
/// | `ESC [ 4~` / `ESC [ 8~` | End                               |
/// | `ESC [ 3~`          | Delete                                |
/// | `ESC [ 5~` / `ESC [ 6~` | PageUp / PageDown                 |
/// | `ESC O H` / `ESC O F` | Home / End                          |
///
/// # Errors
///
/// Returns any I/O error from the underlying source.
pub fn read_key(src: &mut impl ByteSource) -> io::Result<Key> {
    let first = loop {
        if let Some(byte) = src.next_byte()? {
            break byte;
        }
    };

    if first != 0x1B {
        return Ok(Key::Char(first as char));
    }

    let Some(one) = src.next_byte()? else {
        return Ok(Key::Escape);
    };
    let Some(two) = src.next_byte()? else {
        return Ok(Key::Escape);
    };

    let key = match (one, two) {
        (b'[', b'0'..=b'9') => match src.next_byte()? {
            Some(b'~') => match two {
                b'1' | b'7' => Key::Home,
                b'3' => Key::Delete,
                b'4' | b'8' => Key::End,
                b'5' => Key::PageUp,
                b'6' => Key::PageDown,
                _ => Key::Escape,
            },
            // Anything but the tilde terminator (a timeout included) is
            // a sequence we don't speak.
            _ => Key::Escape,
        },
        (b'[', b'A') => Key::Up,
        (b'[', b'B') => Key::Down,
        (b'[', b'C') => Key::Right,
        (b'[', b'D') => Key::Left,
        (b'[', b'H') | (b'O', b'H') => Key::Home,
        (b'[', b'F') | (b'O', b'F') => Key::End,
        _ => Key::Escape,
    };

    Ok(key)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted byte source: `Some(b)` is data, `None` is a timeout.
    /// Running off the end of the script is an endless timeout.
    struct Script(VecDeque<Option<u8>>);

    impl Script {
        fn bytes(data: &[u8]) -> Self {
            Self(data.iter().map(|&b| Some(b)).collect())
        }

        fn steps(steps: &[Option<u8>]) -> Self {
            Self(steps.iter().copied().collect())
        }
    }

    impl ByteSource for Script {
        fn next_byte(&mut self) -> io::Result<Option<u8>> {
            Ok(self.0.pop_front().unwrap_or(None))
        }
    }

    fn decode(data: &[u8]) -> Key {
        read_key(&mut Script::bytes(data)).unwrap()
    }

    // ── ctrl ──────────────────────────────────────────────────────────

    #[test]
    fn ctrl_masks_to_control_range() {
        assert_eq!(ctrl('q'), '\x11');
        assert_eq!(ctrl('c'), '\x03');
        assert_eq!(ctrl('a'), '\x01');
    }

    // ── Verbatim bytes ───────────────────────────────────────────────

    #[test]
    fn printable_byte_passes_through() {
        assert_eq!(decode(b"x"), Key::Char('x'));
        assert_eq!(decode(b"$"), Key::Char('$'));
        assert_eq!(decode(b" "), Key::Char(' '));
    }

    #[test]
    fn control_byte_passes_through() {
        assert_eq!(decode(b"\x11"), Key::Char(ctrl('q')));
        assert_eq!(decode(b"\x03"), Key::Char(ctrl('c')));
        assert_eq!(decode(b"\r"), Key::Char('\r'));
    }

    #[test]
    fn no_case_conversion() {
        assert_eq!(decode(b"H"), Key::Char('H'));
        assert_eq!(decode(b"h"), Key::Char('h'));
    }

    // ── Timeout retry before the first byte ─────────────────────────

    #[test]
    fn empty_reads_before_first_byte_retry() {
        let mut src = Script::steps(&[None, None, Some(b'k')]);
        assert_eq!(read_key(&mut src).unwrap(), Key::Char('k'));
    }

    // ── CSI letter sequences ─────────────────────────────────────────

    #[test]
    fn arrow_keys() {
        assert_eq!(decode(b"\x1b[A"), Key::Up);
        assert_eq!(decode(b"\x1b[B"), Key::Down);
        assert_eq!(decode(b"\x1b[C"), Key::Right);
        assert_eq!(decode(b"\x1b[D"), Key::Left);
    }

    #[test]
    fn csi_home_and_end() {
        assert_eq!(decode(b"\x1b[H"), Key::Home);
        assert_eq!(decode(b"\x1b[F"), Key::End);
    }

    #[test]
    fn unknown_csi_letter_is_escape() {
        assert_eq!(decode(b"\x1b[Z"), Key::Escape);
        assert_eq!(decode(b"\x1b[Q"), Key::Escape);
    }

    // ── CSI tilde sequences ──────────────────────────────────────────

    #[test]
    fn tilde_sequences() {
        assert_eq!(decode(b"\x1b[1~"), Key::Home);
        assert_eq!(decode(b"\x1b[3~"), Key::Delete);
        assert_eq!(decode(b"\x1b[4~"), Key::End);
        assert_eq!(decode(b"\x1b[5~"), Key::PageUp);
        assert_eq!(decode(b"\x1b[6~"), Key::PageDown);
        assert_eq!(decode(b"\x1b[7~"), Key::Home);
        assert_eq!(decode(b"\x1b[8~"), Key::End);
    }

    #[test]
    fn unmapped_tilde_digit_is_escape() {
        assert_eq!(decode(b"\x1b[0~"), Key::Escape);
        assert_eq!(decode(b"\x1b[2~"), Key::Escape);
        assert_eq!(decode(b"\x1b[9~"), Key::Escape);
    }

    #[test]
    fn digit_without_tilde_terminator_is_escape() {
        assert_eq!(decode(b"\x1b[3x"), Key::Escape);
    }

    #[test]
    fn digit_with_timed_out_terminator_is_escape() {
        let mut src = Script::steps(&[Some(0x1B), Some(b'['), Some(b'3'), None]);
        assert_eq!(read_key(&mut src).unwrap(), Key::Escape);
    }

    // ── SS3 sequences ────────────────────────────────────────────────

    #[test]
    fn ss3_home_and_end() {
        assert_eq!(decode(b"\x1bOH"), Key::Home);
        assert_eq!(decode(b"\x1bOF"), Key::End);
    }

    #[test]
    fn unknown_ss3_is_escape() {
        assert_eq!(decode(b"\x1bOP"), Key::Escape);
    }

    // ── Lone and truncated ESC ───────────────────────────────────────

    #[test]
    fn lone_escape() {
        assert_eq!(decode(b"\x1b"), Key::Escape);
    }

    #[test]
    fn escape_then_timeout_on_first_continuation() {
        let mut src = Script::steps(&[Some(0x1B), None]);
        assert_eq!(read_key(&mut src).unwrap(), Key::Escape);
    }

    #[test]
    fn escape_then_timeout_on_second_continuation() {
        let mut src = Script::steps(&[Some(0x1B), Some(b'['), None]);
        assert_eq!(read_key(&mut src).unwrap(), Key::Escape);
    }

    #[test]
    fn escape_with_unknown_introducer_is_escape() {
        assert_eq!(decode(b"\x1bXY"), Key::Escape);
    }

    // ── Sequence leaves trailing bytes untouched ─────────────────────

    #[test]
    fn decoder_consumes_one_key_per_call() {
        let mut src = Script::bytes(b"\x1b[Aj");
        assert_eq!(read_key(&mut src).unwrap(), Key::Up);
        assert_eq!(read_key(&mut src).unwrap(), Key::Char('j'));
    }
}

// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, window geometry, and guaranteed restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and ioctl (TIOCGWINSZ). These are the standard POSIX
// interfaces for terminal control — there is no safe alternative. Each
// unsafe block is minimal and documented.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. Entering raw mode captures
// the line-discipline configuration once; every exit path gives it back:
// `disable()` and Drop on the normal path, [`restore_on_fatal`] on the
// error path, and a panic hook for everything else. A terminal left in
// raw mode is unusable for the user's shell, so restoration is the one
// invariant this module exists to defend.
//
// The panic hook bypasses Rust's stdout lock entirely, writing a
// pre-built restore sequence directly to fd 1. This prevents deadlock if
// the panic happened while holding the stdout lock (common during frame
// rendering). One raw write, termios reapplied, then the original panic
// handler prints its message to a working terminal.
//
// Why not crossterm? A modal editor needs direct control over every
// terminal interaction — the exact iflag/lflag bits, the exact read
// timeout — not an abstraction layer that might make different choices.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::input::{ByteSource, Stdin};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Direct Size Query ──────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal, the query fails, or the
/// reported width is zero (some terminals answer the ioctl with a zeroed
/// struct — treat that as "unavailable" and let the caller fall back).
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

// ─── Reporting-Based Fallback ───────────────────────────────────────────────

/// Longest cursor-position report we accept: `ESC [ rrrrr ; ccccc R`.
const REPORT_MAX: usize = 32;

/// Determine the terminal size, falling back to cursor-position reporting.
///
/// Tries `ioctl(TIOCGWINSZ)` first. If that is unavailable or reports a
/// zero width, pushes the cursor to the bottom-right corner with
/// `ESC[999C ESC[999B` (cursor movement clamps at the screen edge) and
/// asks the terminal where it ended up via `ESC[6n`.
///
/// Requires raw mode to be active — the reply arrives on stdin and must
/// not be echoed or line-buffered.
///
/// # Errors
///
/// Returns an error if both the direct query and the reporting fallback
/// fail. The caller cannot render without geometry, so this is fatal.
pub fn window_size() -> io::Result<Size> {
    if let Some(size) = query_size() {
        return Ok(size);
    }

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(b"\x1b[999C\x1b[999B")?;
    lock.flush()?;
    drop(lock);

    cursor_position(&mut Stdin)
}

/// Ask the terminal for the cursor position and parse the reply.
///
/// Writes the DSR query `ESC[6n` and reads the `ESC [ rows ; cols R`
/// reply byte by byte from `src`, stopping at the terminating `R` (which
/// is not included in the parsed slice). A read timeout mid-reply ends
/// the collection; whatever arrived is handed to the parser.
fn cursor_position(src: &mut impl ByteSource) -> io::Result<Size> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    lock.write_all(b"\x1b[6n")?;
    lock.flush()?;
    drop(lock);

    let mut reply = Vec::with_capacity(REPORT_MAX);
    while reply.len() < REPORT_MAX {
        let Some(byte) = src.next_byte()? else {
            break;
        };
        if byte == b'R' {
            break;
        }
        reply.push(byte);
    }

    parse_cursor_report(&reply).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "terminal did not answer the cursor position query",
        )
    })
}

/// Parse a cursor position report: `ESC [ rows ; cols` (the trailing `R`
/// already stripped by the reader).
///
/// Returns `None` on any malformed or truncated report.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;

    Some(Size {
        rows: rows.parse().ok()?,
        cols: cols.parse().ok()?,
    })
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for out-of-band recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook and the
/// fatal-error path can't access it. This global backup — behind a
/// [`Mutex`], not `static mut` — lets them restore raw mode without the
/// struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

#[cfg(not(unix))]
fn restore_termios_from_backup() {}

/// Emergency screen reset: clear, home the cursor, make it visible again.
///
/// Cursor visibility comes last so the sequence also recovers from a
/// panic that happened between the hide and show of a frame.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message. The hook
/// writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's stdout
/// lock to avoid deadlock), restores termios, then delegates to the
/// original panic handler so the error prints to a working terminal.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_on_fatal();
            original(info);
        }));
    });
}

/// Clear the screen and hand the terminal back to the shell.
///
/// Used by the panic hook and by the binary's fatal-error routine: the
/// screen is cleared first so the error text that follows is visible
/// against a clean terminal, and termios is restored so that text is not
/// mangled by raw-mode output processing.
pub fn restore_on_fatal() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }

    restore_termios_from_backup();
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Raw-mode session handle with RAII cleanup.
///
/// Call [`enable`](Self::enable) to capture the current line-discipline
/// configuration and switch to raw mode. The original configuration is
/// reapplied by [`disable`](Self::disable), automatically on drop, and by
/// the panic hook — whichever exit path runs first.
///
/// # Example
///
/// ```no_run
/// use vilo_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enable()?;
/// // ... render frames, read keys ...
/// // Raw mode is disabled automatically on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Whether raw mode is currently active.
    active: bool,
}

impl Terminal {
    /// Create an inactive terminal handle.
    ///
    /// Does **not** touch the terminal — call [`enable`](Self::enable)
    /// for that.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            active: false,
        }
    }

    /// Whether raw mode is currently active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter raw mode.
    ///
    /// Captures the current termios configuration, then applies a derived
    /// one with:
    ///
    /// - input: no break signal, no CR→NL translation, no parity check,
    ///   no high-bit strip, no XON/XOFF flow control
    /// - output: no NL→CRNL translation
    /// - control: 8-bit characters
    /// - local: no echo, no canonical buffering, no extended processing,
    ///   no signal keys (interrupt/suspend)
    /// - `VMIN = 0`, `VTIME = 1`: `read()` returns as soon as any bytes
    ///   are available, or after 100 ms with none
    ///
    /// Also installs the panic hook (once per process) and saves the
    /// original termios to the global backup for out-of-band restore.
    ///
    /// Idempotent: enabling while already active is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal attributes cannot be read or
    /// applied. The caller must treat this as fatal — continuing without
    /// a known terminal state risks corrupting the user's shell.
    pub fn enable(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;
        self.active = true;
        Ok(())
    }

    /// Leave raw mode, reapplying the captured original configuration.
    ///
    /// Idempotent: disabling while inactive is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the original attributes cannot be reapplied.
    pub fn disable(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        self.disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            // Save original for restore.
            self.original_termios = Some(termios);

            // Also save to the global backup for the panic hook and the
            // fatal-error path.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_iflag &=
                !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

            // VMIN=0, VTIME=1: read() returns immediately with whatever is
            // available, or after one decisecond with nothing. The key
            // decoder relies on this timeout to resolve lone-ESC input.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            // Clear the global backup — we've restored successfully.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.disable();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

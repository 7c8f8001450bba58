// SPDX-License-Identifier: MIT
//
// vilo — a modal terminal line editor engine.
//
// This is the binary that wires the crates together:
//
//   vilo-term   → raw mode, window geometry, ANSI output, key decoding
//   vilo-editor → rows, text buffer, cursor, viewport, modes
//
// The Editor struct owns the single per-run session. Each iteration of
// the main loop renders one full frame, blocks for one key, and
// dispatches it against the current mode:
//
//   scroll → compose frame → single write → read_key → handle_key
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text rows / ~ fill           │  ← height - 2
//   ├──────────────────────────────┤
//   │ status bar (reverse video)   │  ← 1 row
//   ├──────────────────────────────┤
//   │ message line                 │  ← 1 row
//   └──────────────────────────────┘
//
// Every fatal error funnels through `die`: clear the screen so the error
// text is readable, restore the terminal, print operation + call site,
// exit 1. Quit (Ctrl-Q) clears the screen and exits 0.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use vilo_editor::buffer::TextBuffer;
use vilo_editor::cursor::{Cursor, Direction};
use vilo_editor::mode::Mode;
use vilo_editor::viewport::Viewport;

use vilo_term::ansi;
use vilo_term::input::{self, Key, ctrl};
use vilo_term::terminal::{self, Size, Terminal};

// ─── Keys and limits ─────────────────────────────────────────────────────────

/// Ctrl-Q: quit.
const QUIT_KEY: char = ctrl('q');

/// Ctrl-C: the interrupt combination is swallowed, not a quit. With ISIG
/// disabled it arrives as an ordinary byte; ignoring it keeps the only
/// exit deliberate.
const INTERRUPT_KEY: char = ctrl('c');

/// Status messages disappear after this long.
const STATUS_MSG_TTL: Duration = Duration::from_secs(5);

/// Longest filename shown in the status bar.
const STATUS_FILENAME_MAX: usize = 20;

/// Two screen rows are reserved: status bar and message line.
const RESERVED_ROWS: u16 = 2;

// ─── Dispatch result ─────────────────────────────────────────────────────────

/// What the dispatcher tells the main loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Keep looping.
    Continue,
    /// Exit cleanly.
    Quit,
}

// ─── Editor ──────────────────────────────────────────────────────────────────

/// The process-wide editor session: one instance, lifecycle = program run.
struct Editor {
    /// File shown in the status bar; `None` until a file is opened.
    filename: Option<PathBuf>,
    /// Visible text rows (terminal height minus the two reserved rows).
    screen_rows: usize,
    /// Visible columns (full terminal width).
    screen_cols: usize,
    buffer: TextBuffer,
    cursor: Cursor,
    viewport: Viewport,
    mode: Mode,
    /// Last transient status message and when it was set.
    status_msg: String,
    status_time: Option<Instant>,
}

impl Editor {
    fn new(size: Size) -> Self {
        Self {
            filename: None,
            screen_rows: size.rows.saturating_sub(RESERVED_ROWS) as usize,
            screen_cols: size.cols as usize,
            buffer: TextBuffer::new(),
            cursor: Cursor::new(),
            viewport: Viewport::new(),
            mode: Mode::Normal,
            status_msg: String::new(),
            status_time: None,
        }
    }

    // ── Status messages ─────────────────────────────────────────────

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_msg = msg.into();
        self.status_time = Some(Instant::now());
    }

    /// The current message, if one was set within the last 5 seconds.
    fn status_message(&self) -> Option<&str> {
        let set_at = self.status_time?;
        if self.status_msg.is_empty() || set_at.elapsed() >= STATUS_MSG_TTL {
            return None;
        }
        Some(&self.status_msg)
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Draw one frame: recompute the viewport, compose the entire frame
    /// into one buffer, and flush it with a single write. Incremental
    /// writes would tear; the terminal only ever sees complete frames.
    fn refresh_screen(&mut self) -> io::Result<()> {
        self.viewport.scroll(
            &self.cursor,
            &self.buffer,
            self.screen_rows,
            self.screen_cols,
        );

        let frame = self.compose_frame()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(&frame)?;
        lock.flush()
    }

    /// Compose the full frame. Assumes the viewport was just scrolled.
    fn compose_frame(&self) -> io::Result<Vec<u8>> {
        let mut frame = Vec::with_capacity((self.screen_rows + 2) * (self.screen_cols + 8));

        ansi::cursor_hide(&mut frame)?;
        ansi::cursor_home(&mut frame)?;

        self.draw_rows(&mut frame)?;
        self.draw_status_bar(&mut frame)?;
        self.draw_message_line(&mut frame)?;

        let (row, col) = self.viewport.cursor_screen_pos(&self.cursor);
        ansi::cursor_to(
            &mut frame,
            u16::try_from(col).unwrap_or(u16::MAX),
            u16::try_from(row).unwrap_or(u16::MAX),
        )?;
        ansi::cursor_show(&mut frame)?;

        Ok(frame)
    }

    /// Content rows: the visible buffer slice, `~` markers past the end,
    /// and the welcome banner on an empty buffer. Every row ends with a
    /// line-clear so stale content never survives a redraw.
    fn draw_rows(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        for y in 0..self.screen_rows {
            let frow = y + self.viewport.rowoff();

            match self.buffer.row(frow) {
                Some(row) => {
                    let visible: String = row
                        .render()
                        .chars()
                        .skip(self.viewport.coloff())
                        .take(self.screen_cols)
                        .collect();
                    frame.write_all(visible.as_bytes())?;
                }
                None if self.buffer.is_empty() && y == self.screen_rows / 5 => {
                    self.draw_banner(frame)?;
                }
                None => {
                    frame.write_all(b"~")?;
                }
            }

            ansi::clear_line(frame)?;
            frame.write_all(b"\r\n")?;
        }
        Ok(())
    }

    /// Centered welcome banner, truncated to the screen width.
    fn draw_banner(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        let banner: String = concat!("vilo editor ", env!("CARGO_PKG_VERSION"))
            .chars()
            .take(self.screen_cols)
            .collect();

        let mut pad = (self.screen_cols - banner.chars().count()) / 2;
        if pad > 0 {
            frame.write_all(b"~")?;
            pad -= 1;
        }
        for _ in 0..pad {
            frame.write_all(b" ")?;
        }
        frame.write_all(banner.as_bytes())
    }

    /// Reverse-video status bar: mode indicator, filename (truncated, or
    /// a placeholder) and row count on the left, `current/total` rows on
    /// the right. The right segment is emitted only when it lands flush
    /// against the right edge; either side is truncated at the width.
    fn draw_status_bar(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        ansi::reverse_video(frame)?;

        let name: String = self.filename.as_ref().map_or_else(
            || "[no name]".to_string(),
            |path| {
                path.to_string_lossy()
                    .chars()
                    .take(STATUS_FILENAME_MAX)
                    .collect()
            },
        );

        let left: String = format!(
            "{}{} - {} lines",
            self.mode.indicator(),
            name,
            self.buffer.len()
        )
        .chars()
        .take(self.screen_cols)
        .collect();

        let right = format!("{}/{}", self.cursor.cy + 1, self.buffer.len());

        frame.write_all(left.as_bytes())?;
        let mut used = left.chars().count();
        while used < self.screen_cols {
            if self.screen_cols - used == right.len() {
                frame.write_all(right.as_bytes())?;
                break;
            }
            frame.write_all(b" ")?;
            used += 1;
        }

        ansi::reset_video(frame)?;
        frame.write_all(b"\r\n")
    }

    /// Message line: blank unless a status message is still fresh.
    fn draw_message_line(&self, frame: &mut Vec<u8>) -> io::Result<()> {
        ansi::clear_line(frame)?;
        if let Some(msg) = self.status_message() {
            let visible: String = msg.chars().take(self.screen_cols).collect();
            frame.write_all(visible.as_bytes())?;
        }
        Ok(())
    }

    // ── Key dispatch ────────────────────────────────────────────────

    /// The (mode, key) decision table.
    ///
    /// Arrow keys and the named navigation keys act in every mode; the
    /// letter forms (`h j k l ^ $`) act only in Normal and are swallowed
    /// in Insert, reserved for future literal input. Ctrl-C is swallowed
    /// in both modes — interrupt is not quit.
    fn handle_key(&mut self, key: Key) -> Action {
        match (self.mode, key) {
            (_, Key::Char(QUIT_KEY)) => return Action::Quit,
            (_, Key::Char(INTERRUPT_KEY)) => {}

            (_, Key::Escape) => self.mode = Mode::Normal,
            (Mode::Normal, Key::Char('i')) => self.mode = Mode::Insert,

            (_, Key::PageUp) => self.page_move(Direction::Up),
            (_, Key::PageDown) => self.page_move(Direction::Down),

            (Mode::Normal, Key::Char('h')) | (_, Key::Left) => {
                self.cursor.step(Direction::Left, &self.buffer);
            }
            (Mode::Normal, Key::Char('j')) | (_, Key::Down) => {
                self.cursor.step(Direction::Down, &self.buffer);
            }
            (Mode::Normal, Key::Char('k')) | (_, Key::Up) => {
                self.cursor.step(Direction::Up, &self.buffer);
            }
            (Mode::Normal, Key::Char('l')) | (_, Key::Right) => {
                self.cursor.step(Direction::Right, &self.buffer);
            }

            (Mode::Normal, Key::Char('^')) | (_, Key::Home) => self.cursor.line_start(),
            (Mode::Normal, Key::Char('$')) | (_, Key::End) => self.cursor.line_end(&self.buffer),

            // Editing keys (Delete, typed characters) are not wired up
            // yet; in Insert mode the movement letters land here too.
            _ => {}
        }

        Action::Continue
    }

    /// PageUp/PageDown: one full window of single-row moves, so the
    /// same clamping applies as for any vertical step.
    fn page_move(&mut self, dir: Direction) {
        for _ in 0..self.screen_rows {
            self.cursor.step(dir, &self.buffer);
        }
    }
}

// ─── Fatal errors ────────────────────────────────────────────────────────────

/// Report a fatal error and terminate.
///
/// Clears the screen and restores the terminal first so the report is
/// readable in a working shell, then prints the failed operation and the
/// call site, and exits 1.
#[track_caller]
fn die(op: &str, err: &io::Error) -> ! {
    terminal::restore_on_fatal();
    let loc = std::panic::Location::caller();
    eprintln!("{}:{} - {op}: {err}", loc.file(), loc.line());
    process::exit(1);
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() {
    let path = env::args_os().nth(1).map(PathBuf::from);

    let mut term = Terminal::new();
    if let Err(err) = term.enable() {
        die("enable raw mode", &err);
    }

    // Geometry needs raw mode: the fallback probe reads a report off stdin.
    let size = match terminal::window_size() {
        Ok(size) => size,
        Err(err) => die("window size", &err),
    };

    let mut editor = Editor::new(size);

    if let Some(path) = path {
        match TextBuffer::load(&path) {
            Ok(buffer) => {
                editor.buffer = buffer;
                editor.filename = Some(path);
            }
            Err(err) => die("open file", &err),
        }
    }

    editor.set_status_message("help: ctrl+q to quit");

    let mut stdin = input::Stdin;
    loop {
        if let Err(err) = editor.refresh_screen() {
            die("refresh screen", &err);
        }

        match input::read_key(&mut stdin) {
            Ok(key) => {
                if editor.handle_key(key) == Action::Quit {
                    break;
                }
            }
            Err(err) => die("read key", &err),
        }
    }

    // Clean exit: wipe the frame, hand the terminal back.
    {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        let _ = ansi::clear_screen(&mut lock);
        let _ = ansi::cursor_home(&mut lock);
        let _ = lock.flush();
    }
    let _ = term.disable();
}

// ─── Tests ───────────────────────────────────────────────────────────────────

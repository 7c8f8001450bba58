// SPDX-License-Identifier: MIT
//
// vilo-term — terminal backend for vilo.
//
// Raw-mode session management, window geometry (with a cursor-report
// fallback for terminals that won't answer the size ioctl), escape
// sequence output, and the byte-stream key decoder.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape
// sequences and raw termios. Every byte sent to the terminal is
// accounted for. Every escape code is earned.

pub mod ansi;
pub mod input;
pub mod terminal;

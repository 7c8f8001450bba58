//! # vilo-editor — editor core for vilo
//!
//! The fundamental building blocks of the editor engine:
//!
//! - **[`row`]** — one line of text with its tab-expanded rendering
//! - **[`buffer`]** — the ordered row sequence, with file loading
//! - **[`cursor`]** — cursor position and clamped movement
//! - **[`viewport`]** — scroll offsets keeping the cursor on screen
//! - **[`mode`]** — modal input state (`Normal`, `Insert`)
//!
//! Everything here is pure state and computation — no terminal I/O. The
//! binary owns the render loop and key dispatch that drive these types.

pub mod buffer;
pub mod cursor;
pub mod mode;
pub mod row;
pub mod viewport;

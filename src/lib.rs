//! virtterm: a virtual terminal emulation engine
//!
//! Consumes the byte stream a program writes to its terminal and keeps the
//! visible state of a character-cell display, and translates host key and
//! mouse input back into the bytes that program expects to read.
//!
//! - `core`: cells, grid, cursor, modes, events, screen operations, snapshots
//! - `parser`: bounded escape-sequence parser producing actions
//! - `input`: key and mouse encoders
//! - `terminal`: the public engine tying them together
//! - `app`: configuration and logging
//! - `pty`: spawns a program on a pseudo-terminal and pumps it through a [`Terminal`]
//!
//! ```
//! use virtterm::{Config, Terminal};
//!
//! let mut term = Terminal::new(10, 20, Config::default());
//! term.write(b"hi\x1b[1mthere");
//! assert_eq!(term.raw_cell(0, 0).unwrap().ch, b'h');
//! assert_eq!(term.cursor().col, 7);
//! ```

pub mod app;
pub mod core;
pub mod input;
pub mod parser;
pub mod pty;
pub mod terminal;

pub use app::{Config, DebugLevel};
pub use terminal::Terminal;

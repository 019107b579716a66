//! Terminal escape sequence parser
//!
//! A stateful parser that converts bytes into terminal actions. Escape
//! sequences accumulate in a bounded buffer and are recognized against a
//! static table of byte templates.

mod action;
mod buffer;
mod state;
mod table;

pub use action::{Action, Command, ControlCode};
pub use buffer::{BufferFull, EscBuffer, ESC_BUFFER_CAPACITY};
pub use state::Parser;

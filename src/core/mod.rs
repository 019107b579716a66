//! Terminal Core Module
//!
//! Platform-independent terminal state management. This module contains:
//! - Cell attributes and the SGR state machine
//! - The cell grid with bounds-safe region operations
//! - Cursor, modes and mouse state
//! - The screen model (primary and alternate buffers, scroll region)
//! - The event queue
//! - Deterministic snapshot generation
//!
//! The core is completely deterministic: given the same sequence of
//! operations, it will always produce the same state.

mod attributes;
mod cell;
mod cursor;
mod event;
mod grid;
mod modes;
mod screen;
mod snapshot;

pub use attributes::{Attributes, Color, Flags};
pub use cell::Cell;
pub use cursor::Cursor;
pub use event::{Event, EventQueue, TextKind};
pub use grid::{Grid, GridError};
pub use modes::{Modes, MouseButton, MouseModifiers, MouseState, MouseTracking};
pub use screen::{AlternateScreen, Screen};
pub use snapshot::{CellSnapshot, Snapshot};

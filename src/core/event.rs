//! Terminal events
//!
//! Observable state changes recorded while input is processed. Events
//! queue up in FIFO order until the consumer drains them with
//! `next_event`; a `TextReceived` payload is moved out to the consumer.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// What an OSC text capture was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    /// OSC 0 and OSC 2
    WindowTitle,
    /// OSC 1
    IconName,
    /// OSC 7, the shell's working directory
    DirectoryHint,
    /// Any other OSC number
    Other(u16),
}

impl TextKind {
    pub fn from_osc(number: u16) -> Self {
        match number {
            0 | 2 => TextKind::WindowTitle,
            1 => TextKind::IconName,
            7 => TextKind::DirectoryHint,
            n => TextKind::Other(n),
        }
    }
}

/// A recorded state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Cells in the inclusive rectangle changed
    CellsUpdated {
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
    },
    CursorMoved,
    Bell,
    TextReceived { kind: TextKind, text: String },
}

impl Event {
    pub fn cells(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Event::CellsUpdated {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }
}

/// FIFO of pending events
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Remove and return the oldest event
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove every pending event, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

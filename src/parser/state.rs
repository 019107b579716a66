//! Parser State Machine
//!
//! Converts a byte stream into [`Action`]s. The parser handles arbitrary
//! chunk boundaries: a sequence split across two `parse` calls is
//! completed by the second.
//!
//! # State Machine
//!
//! - Idle: printable bytes and C0 controls; ESC starts a sequence
//! - Accumulating: bytes collect in a bounded buffer until the sequence
//!   matches the dispatch table, is recognized as unknown, or overflows
//! - Capturing: an OSC payload collects until BEL or ST
//!
//! An overflowing sequence is treated as malformed: the parser rings the
//! bell and feeds the buffered bytes, minus the leading ESC, back through
//! Idle processing so no input is lost.

use tracing::{debug, trace, warn};

use super::action::{Action, ControlCode};
use super::buffer::EscBuffer;
use super::table;
use crate::app::DebugLevel;
use crate::core::TextKind;

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Accumulating,
    Capturing(TextKind),
}

/// The terminal parser
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    /// Escape sequence in progress
    buffer: EscBuffer,
    /// OSC payload in progress
    text: Vec<u8>,
    debug: DebugLevel,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in the idle state
    pub fn new() -> Self {
        Self::with_debug(DebugLevel::None)
    }

    pub fn with_debug(debug: DebugLevel) -> Self {
        Self {
            state: State::Idle,
            buffer: EscBuffer::new(),
            text: Vec::new(),
            debug,
        }
    }

    pub fn set_debug(&mut self, debug: DebugLevel) {
        self.debug = debug;
    }

    /// Abandon any sequence or capture in progress
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.buffer.clear();
        self.text.clear();
    }

    /// Whether no sequence or capture is in progress
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Process a chunk of bytes, returning actions
    pub fn parse(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        for &byte in data {
            self.process_byte(byte, &mut actions);
        }
        actions
    }

    /// Process a single byte
    fn process_byte(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.debug.bytes() {
            trace!("byte {:#04x}", byte);
        }

        match self.state {
            State::Idle => self.process_idle(byte, actions),
            State::Accumulating => self.process_escape(byte, actions),
            State::Capturing(kind) => self.process_capture(kind, byte, actions),
        }
    }

    fn process_idle(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if byte == ESC {
            self.buffer.clear();
            // an empty buffer always has room
            let _ = self.buffer.push(ESC);
            self.state = State::Accumulating;
            return;
        }

        if let Some(control) = ControlCode::from_byte(byte) {
            actions.push(Action::Control(control));
        } else if byte < 0x20 || byte == 0x7f {
            if self.debug.bytes() {
                trace!("ignoring control byte {:#04x}", byte);
            }
        } else {
            actions.push(Action::Print(byte));
        }
    }

    fn process_escape(&mut self, byte: u8, actions: &mut Vec<Action>) {
        if self.buffer.push(byte).is_err() {
            self.abandon_overflow(byte, actions);
            return;
        }

        let seq = self.buffer.as_slice();

        if let Some(number) = table::osc_introducer(seq) {
            self.buffer.clear();
            self.text.clear();
            self.state = State::Capturing(TextKind::from_osc(number));
            return;
        }

        if matches!(self.buffer.last(), Some(ESC | b';' | b'[')) {
            return;
        }

        if let Some(command) = table::dispatch(seq) {
            if self.debug.sequences() {
                debug!("sequence ESC{:?}", String::from_utf8_lossy(&seq[1..]));
            }
            actions.push(Action::Command(command));
            self.finish_sequence();
        } else if table::is_terminated(seq) {
            if self.debug.errors() {
                warn!("escape sequence not recognized: ESC{:?}", String::from_utf8_lossy(&seq[1..]));
            }
            self.finish_sequence();
        }
    }

    fn finish_sequence(&mut self) {
        self.buffer.clear();
        self.state = State::Idle;
    }

    /// Ring the bell and replay everything after the ESC
    fn abandon_overflow(&mut self, byte: u8, actions: &mut Vec<Action>) {
        let mut replay = self.buffer.as_slice()[1..].to_vec();
        replay.push(byte);

        if self.debug.errors() {
            warn!("invalid escape sequence: ESC{:?}", String::from_utf8_lossy(&replay));
        }

        self.finish_sequence();
        actions.push(Action::Control(ControlCode::Bell));
        for b in replay {
            self.process_byte(b, actions);
        }
    }

    fn process_capture(&mut self, kind: TextKind, byte: u8, actions: &mut Vec<Action>) {
        self.text.push(byte);

        let payload_len = if self.text.ends_with(&[BEL]) {
            self.text.len() - 1
        } else if self.text.ends_with(&[ESC, b'\\']) {
            self.text.len() - 2
        } else {
            return;
        };

        let text = String::from_utf8_lossy(&self.text[..payload_len]).into_owned();
        if self.debug.sequences() {
            debug!("captured {:?} text {:?}", kind, text);
        }
        actions.push(Action::TextCaptured { kind, text });
        self.text.clear();
        self.state = State::Idle;
    }
}

//! A terminal attached to a running child

use tracing::debug;

use super::{Pty, PtyResult, Status, WindowSize};
use crate::core::{MouseButton, MouseModifiers};
use crate::input::Key;
use crate::Terminal;

/// Default number of bytes read from the pty per `read` call
pub const DEFAULT_READ_CHUNK: usize = 4096;

/// Couples a [`Terminal`] with the [`Pty`] its child writes to
#[derive(Debug)]
pub struct Session {
    terminal: Terminal,
    pty: Pty,
    buf: Vec<u8>,
}

impl Session {
    /// `read_chunk` bounds each pty read; zero selects the default.
    pub fn new(terminal: Terminal, pty: Pty, read_chunk: usize) -> Self {
        let read_chunk = if read_chunk == 0 {
            DEFAULT_READ_CHUNK
        } else {
            read_chunk
        };
        Self {
            terminal,
            pty,
            buf: vec![0; read_chunk],
        }
    }

    /// Spawn `program` on a pty sized to `terminal`
    pub fn spawn(terminal: Terminal, program: &str, args: &[&str]) -> PtyResult<Self> {
        let size = WindowSize::from_grid(terminal.rows(), terminal.columns());
        let pty = Pty::spawn(program, args, size)?;
        Ok(Self::new(terminal, pty, DEFAULT_READ_CHUNK))
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal {
        &mut self.terminal
    }

    pub fn pty(&self) -> &Pty {
        &self.pty
    }

    pub fn pty_mut(&mut self) -> &mut Pty {
        &mut self.pty
    }

    /// Give back the terminal and the pty
    pub fn into_parts(self) -> (Terminal, Pty) {
        (self.terminal, self.pty)
    }

    /// Feed all currently available child output to the terminal.
    ///
    /// Keeps reading while reads fill the whole chunk.
    pub fn process(&mut self) -> PtyResult<Status> {
        loop {
            match self.pty.read(&mut self.buf)? {
                None => return Ok(Status::Continue),
                Some(0) => {
                    debug!("pty closed by child");
                    return Ok(Status::Closed);
                },
                Some(n) => {
                    self.terminal.write(&self.buf[..n]);
                    if n < self.buf.len() {
                        return Ok(Status::Continue);
                    }
                },
            }
        }
    }

    /// Send the bytes for a key press to the child
    pub fn keypress(&mut self, key: Key, shift: bool, ctrl: bool) -> PtyResult<()> {
        let bytes = self.terminal.translate_key(key, shift, ctrl);
        self.send(&bytes)
    }

    /// Send a mouse button report, if the child asked for one
    pub fn mouse_click(
        &mut self,
        row: usize,
        col: usize,
        button: MouseButton,
        down: bool,
        modifiers: MouseModifiers,
    ) -> PtyResult<()> {
        let bytes = self
            .terminal
            .translate_mouse_click(row, col, button, down, modifiers);
        self.send(&bytes)
    }

    /// Send a motion report, if the child asked for one
    pub fn mouse_move(&mut self, row: usize, col: usize) -> PtyResult<()> {
        let bytes = self.terminal.translate_mouse_move(row, col);
        self.send(&bytes)
    }

    /// Resize the pty first, then the terminal
    pub fn resize(&mut self, rows: usize, cols: usize) -> PtyResult<()> {
        self.pty.resize(WindowSize::from_grid(rows, cols))?;
        self.terminal.resize(rows, cols);
        Ok(())
    }

    fn send(&self, bytes: &[u8]) -> PtyResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.pty.write_all(bytes)
    }
}

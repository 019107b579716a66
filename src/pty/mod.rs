//! Pseudo-terminal transport
//!
//! Spawns a program on a pty and pumps its output into a [`Terminal`],
//! forwarding translated key and mouse bytes back the other way. The
//! engine itself never depends on this module.
//!
//! [`Terminal`]: crate::Terminal

#[cfg(unix)]
mod session;
#[cfg(unix)]
mod unix;

use thiserror::Error;

#[cfg(unix)]
pub use session::{Session, DEFAULT_READ_CHUNK};
#[cfg(unix)]
pub use unix::Pty;

/// Errors that can occur during PTY operations
#[derive(Debug, Error)]
pub enum PtyError {
    #[error("failed to open PTY master: {0}")]
    OpenMaster(#[source] nix::Error),

    #[error("failed to grant PTY: {0}")]
    GrantPty(#[source] nix::Error),

    #[error("failed to unlock PTY: {0}")]
    UnlockPty(#[source] nix::Error),

    #[error("failed to get PTY slave name: {0}")]
    PtsName(#[source] nix::Error),

    #[error("failed to open PTY slave: {0}")]
    OpenSlave(#[source] nix::Error),

    #[error("failed to fork: {0}")]
    Fork(#[source] nix::Error),

    #[error("failed to create session: {0}")]
    Setsid(#[source] nix::Error),

    #[error("failed to duplicate file descriptor: {0}")]
    Dup2(#[source] nix::Error),

    #[error("failed to execute program: {0}")]
    Exec(#[source] nix::Error),

    #[error("failed to set window size: {0}")]
    SetWinsize(#[source] nix::Error),

    #[error("failed to read from PTY: {0}")]
    Read(#[source] nix::Error),

    #[error("failed to write to PTY: {0}")]
    Write(#[source] nix::Error),

    #[error("failed to set non-blocking mode: {0}")]
    SetNonBlocking(#[source] nix::Error),

    #[error("failed to poll PTY: {0}")]
    Poll(#[source] nix::Error),

    #[error("failed to wait for child: {0}")]
    Wait(#[source] nix::Error),

    #[error("argument contains a NUL byte: {0}")]
    NulByte(#[from] std::ffi::NulError),

    #[error("child process was killed by signal {0}")]
    ChildSignaled(i32),
}

/// Result type for PTY operations
pub type PtyResult<T> = Result<T, PtyError>;

/// Outcome of pumping the pty once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No more output for now; call again when the pty is readable
    Continue,
    /// The child closed its side of the pty
    Closed,
}

/// Window size for the PTY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
    pub pixel_width: u16,
    pub pixel_height: u16,
}

impl WindowSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        }
    }

    /// Size of a terminal grid, saturating at `u16::MAX`
    pub fn from_grid(rows: usize, cols: usize) -> Self {
        let clamp = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
        Self::new(clamp(cols), clamp(rows))
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

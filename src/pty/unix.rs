//! Unix PTY implementation
//!
//! Creates the pty pair and the child process with POSIX APIs.

use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::os::fd::BorrowedFd;
use std::os::unix::io::{AsRawFd, RawFd};

use nix::errno::Errno;
use nix::fcntl::{fcntl, open, FcntlArg, OFlag};
use nix::libc::{self, STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::poll::{poll, PollFd, PollFlags};
use nix::pty::{grantpt, posix_openpt, ptsname, unlockpt, PtyMaster};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{close, dup2, execvp, fork, read, setsid, write, ForkResult, Pid};

use super::{PtyError, PtyResult, WindowSize};

/// Value of `TERM` in the child's environment
const CHILD_TERM: &str = "xterm";
/// Cells hold single Latin-1 bytes, so the child is told to emit Latin-1
const CHILD_LOCALE: &str = "en_US.ISO-8859-1";
/// Exit status of a child that could not start its program
const EXEC_FAILED: i32 = 127;

/// A pseudoterminal with a spawned child process
pub struct Pty {
    master: PtyMaster,
    child_pid: Pid,
    child_alive: bool,
}

impl std::fmt::Debug for Pty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pty")
            .field("master", &self.master.as_raw_fd())
            .field("child_pid", &self.child_pid)
            .field("child_alive", &self.child_alive)
            .finish()
    }
}

impl Pty {
    /// Run `program` with `args` on a new pty of the given size.
    ///
    /// The program is looked up in `PATH`. The master side is
    /// non-blocking.
    pub fn spawn(program: &str, args: &[&str], size: WindowSize) -> PtyResult<Self> {
        // Everything the child needs is allocated before forking.
        let program = CString::new(program)?;
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(program.clone());
        for arg in args {
            argv.push(CString::new(*arg)?);
        }

        let master = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY).map_err(PtyError::OpenMaster)?;
        grantpt(&master).map_err(PtyError::GrantPty)?;
        unlockpt(&master).map_err(PtyError::UnlockPty)?;

        // SAFETY: no other thread calls ptsname while this runs
        let slave_name = unsafe { ptsname(&master) }.map_err(PtyError::PtsName)?;
        let slave_name = CString::new(slave_name)?;

        set_window_size(master.as_raw_fd(), size)?;

        // SAFETY: the child only performs async-signal-safe calls before exec
        match unsafe { fork() }.map_err(PtyError::Fork)? {
            ForkResult::Child => {
                drop(master);
                let _ = exec_child(&slave_name, &program, &argv);
                // SAFETY: leaves the forked child without running destructors
                unsafe { libc::_exit(EXEC_FAILED) }
            },
            ForkResult::Parent { child } => {
                let flags = fcntl(master.as_raw_fd(), FcntlArg::F_GETFL)
                    .map_err(PtyError::SetNonBlocking)?;
                let flags = OFlag::from_bits_truncate(flags);
                fcntl(
                    master.as_raw_fd(),
                    FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK),
                )
                .map_err(PtyError::SetNonBlocking)?;

                tracing::debug!("spawned {:?} as pid {}", program, child);
                Ok(Pty {
                    master,
                    child_pid: child,
                    child_alive: true,
                })
            },
        }
    }

    /// Spawn the user's login shell, falling back to `/bin/sh`
    pub fn spawn_shell(size: WindowSize) -> PtyResult<Self> {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
        Self::spawn(&shell, &[], size)
    }

    pub fn master_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }

    pub fn child_pid(&self) -> Pid {
        self.child_pid
    }

    /// Check if the child process is still running
    pub fn is_alive(&mut self) -> bool {
        if !self.child_alive {
            return false;
        }

        match waitpid(self.child_pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => true,
            Ok(_) | Err(_) => {
                self.child_alive = false;
                false
            },
        }
    }

    /// Wait for the child process to exit and return its exit code
    pub fn wait(&mut self) -> PtyResult<i32> {
        if !self.child_alive {
            return Ok(0);
        }

        match waitpid(self.child_pid, None).map_err(PtyError::Wait)? {
            WaitStatus::Exited(_, code) => {
                self.child_alive = false;
                Ok(code)
            },
            WaitStatus::Signaled(_, signal, _) => {
                self.child_alive = false;
                Err(PtyError::ChildSignaled(signal as i32))
            },
            _ => Ok(0),
        }
    }

    /// Read whatever output is available.
    ///
    /// `Ok(None)` means nothing is ready yet. `Ok(Some(0))` means the
    /// child closed the pty; Linux reports that as `EIO` on the master.
    pub fn read(&self, buf: &mut [u8]) -> PtyResult<Option<usize>> {
        match read(self.master.as_raw_fd(), buf) {
            Ok(n) => Ok(Some(n)),
            Err(Errno::EAGAIN) | Err(Errno::EINTR) => Ok(None),
            Err(Errno::EIO) => Ok(Some(0)),
            Err(e) => Err(PtyError::Read(e)),
        }
    }

    /// Write all of `data`, waiting for the pty to drain when it is full
    pub fn write_all(&self, mut data: &[u8]) -> PtyResult<()> {
        while !data.is_empty() {
            match write(self.master.as_raw_fd(), data) {
                Ok(n) => data = &data[n..],
                Err(Errno::EINTR) => {},
                Err(Errno::EAGAIN) => {
                    self.poll(PollFlags::POLLOUT, -1)?;
                },
                Err(e) => return Err(PtyError::Write(e)),
            }
        }
        Ok(())
    }

    /// Wait up to `timeout_ms` for output; negative waits forever
    pub fn poll_read(&self, timeout_ms: i32) -> PtyResult<bool> {
        self.poll(PollFlags::POLLIN, timeout_ms)
    }

    /// Tell the child its window changed size
    pub fn resize(&self, size: WindowSize) -> PtyResult<()> {
        set_window_size(self.master.as_raw_fd(), size)
    }

    fn poll(&self, events: PollFlags, timeout_ms: i32) -> PtyResult<bool> {
        // SAFETY: the master fd is valid for the lifetime of this Pty
        let borrowed_fd = unsafe { BorrowedFd::borrow_raw(self.master.as_raw_fd()) };
        let mut fds = [PollFd::new(&borrowed_fd, events | PollFlags::POLLHUP)];
        let n = poll(&mut fds, timeout_ms).map_err(PtyError::Poll)?;
        Ok(n > 0 && fds[0].revents().is_some_and(|r| r.intersects(events | PollFlags::POLLHUP)))
    }
}

impl Drop for Pty {
    fn drop(&mut self) {
        if self.child_alive {
            let _ = waitpid(self.child_pid, Some(WaitPidFlag::WNOHANG));
        }
    }
}

/// Child side of `spawn`: attach to the slave and exec. Only returns on
/// failure.
fn exec_child(slave_name: &CStr, program: &CStr, argv: &[CString]) -> PtyResult<Infallible> {
    setsid().map_err(PtyError::Setsid)?;

    let slave_fd = open(slave_name, OFlag::O_RDWR, Mode::empty()).map_err(PtyError::OpenSlave)?;

    // SAFETY: TIOCSCTTY on a freshly opened slave fd
    unsafe {
        libc::ioctl(slave_fd, libc::TIOCSCTTY as _, 0);
    }

    dup2(slave_fd, STDIN_FILENO).map_err(PtyError::Dup2)?;
    dup2(slave_fd, STDOUT_FILENO).map_err(PtyError::Dup2)?;
    dup2(slave_fd, STDERR_FILENO).map_err(PtyError::Dup2)?;
    if slave_fd > STDERR_FILENO {
        let _ = close(slave_fd);
    }

    std::env::set_var("TERM", CHILD_TERM);
    std::env::set_var("LC_ALL", CHILD_LOCALE);

    execvp(program, argv).map_err(PtyError::Exec)
}

fn set_window_size(fd: RawFd, size: WindowSize) -> PtyResult<()> {
    let winsize = libc::winsize {
        ws_row: size.rows,
        ws_col: size.cols,
        ws_xpixel: size.pixel_width,
        ws_ypixel: size.pixel_height,
    };

    // SAFETY: TIOCSWINSZ reads a winsize struct
    let result = unsafe { libc::ioctl(fd, libc::TIOCSWINSZ, &winsize) };

    if result < 0 {
        Err(PtyError::SetWinsize(Errno::last()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
fn get_window_size(fd: RawFd) -> PtyResult<WindowSize> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ writes a winsize struct
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut winsize) };

    if result < 0 {
        Err(PtyError::SetWinsize(Errno::last()))
    } else {
        Ok(WindowSize {
            rows: winsize.ws_row,
            cols: winsize.ws_col,
            pixel_width: winsize.ws_xpixel,
            pixel_height: winsize.ws_ypixel,
        })
    }
}

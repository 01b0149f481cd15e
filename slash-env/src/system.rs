// This file is part of slash, a POSIX command language interpreter.
// Copyright (C) 2026 The slash developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Interface to the underlying operating system
//!
//! The rest of the workspace performs process and descriptor plumbing
//! exclusively through this module. Process control goes through `nix`;
//! the raw descriptor calls use `libc` with [`Errno`] mapping the error
//! values.

pub mod signal;

use crate::semantics::ExitStatus;
pub use nix::errno::Errno;
pub use nix::unistd::{ForkResult, Pid};
use std::ffi::{c_int, CStr, CString};

/// Returns the process ID of this process.
#[must_use]
pub fn getpid() -> Pid {
    nix::unistd::getpid()
}

/// Creates a child process.
///
/// # Safety-related caveat
///
/// The shell is single-threaded, so continuing with the full environment
/// in the child after `fork` is safe.
pub fn fork() -> Result<ForkResult, Errno> {
    unsafe { nix::unistd::fork() }
}

/// Replaces the current process image.
///
/// This function only returns on failure.
pub fn execve(path: &CStr, args: &[CString], env: &[CString]) -> Errno {
    match nix::unistd::execve(path, args, env) {
        Ok(infallible) => match infallible {},
        Err(errno) => errno,
    }
}

/// Terminates this process with the given exit status.
pub fn exit_process(exit_status: ExitStatus) -> ! {
    std::process::exit(exit_status.0)
}

/// Result of waiting for a child process
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChildStatus {
    /// The child exited with the given status.
    Exited(ExitStatus),
    /// The child was killed by the given signal.
    Signaled(c_int),
    /// The child was stopped (job control is external; treated as alive).
    Stopped,
}

impl ChildStatus {
    /// Converts the status to the shell's `$?` value.
    #[must_use]
    pub fn exit_status(self) -> ExitStatus {
        match self {
            ChildStatus::Exited(exit_status) => exit_status,
            ChildStatus::Signaled(signal) => ExitStatus::from_signal(signal),
            ChildStatus::Stopped => ExitStatus::from_signal(libc::SIGSTOP),
        }
    }
}

fn convert_wait_status(status: nix::sys::wait::WaitStatus) -> Option<(Pid, ChildStatus)> {
    use nix::sys::wait::WaitStatus::*;
    match status {
        Exited(pid, code) => Some((pid, ChildStatus::Exited(ExitStatus(code)))),
        Signaled(pid, signal, _core_dumped) => Some((pid, ChildStatus::Signaled(signal as c_int))),
        Stopped(pid, _signal) => Some((pid, ChildStatus::Stopped)),
        _ => None,
    }
}

/// Waits for the given child process to terminate.
///
/// `EINTR` is *not* retried here: the caller runs pending traps at its
/// safe points and calls again.
pub fn wait_for_child(pid: Pid) -> Result<Option<(Pid, ChildStatus)>, Errno> {
    match nix::sys::wait::waitpid(pid, None) {
        Ok(status) => Ok(convert_wait_status(status)),
        Err(errno) => Err(errno),
    }
}

/// Reaps any terminated child without blocking.
pub fn wait_any_nonblocking() -> Result<Option<(Pid, ChildStatus)>, Errno> {
    use nix::sys::wait::WaitPidFlag;
    match nix::sys::wait::waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
        Ok(nix::sys::wait::WaitStatus::StillAlive) => Ok(None),
        Ok(status) => Ok(convert_wait_status(status)),
        Err(Errno::ECHILD) => Ok(None),
        Err(errno) => Err(errno),
    }
}

/// Sends a signal to a process or process group.
pub fn kill(pid: Pid, signal: Option<c_int>) -> Result<(), Errno> {
    let signal = match signal {
        Some(signo) => Some(nix::sys::signal::Signal::try_from(signo)?),
        None => None,
    };
    nix::sys::signal::kill(pid, signal)
}

/// Creates a pipe; returns `(read_end, write_end)`.
pub fn pipe() -> Result<(c_int, c_int), Errno> {
    let mut fds = [0 as c_int; 2];
    Errno::result(unsafe { libc::pipe(fds.as_mut_ptr()) })?;
    Ok((fds[0], fds[1]))
}

/// Opens a file; returns the new descriptor.
pub fn open(path: &CStr, flags: c_int, mode: libc::mode_t) -> Result<c_int, Errno> {
    Errno::result(unsafe { libc::open(path.as_ptr(), flags, mode as c_int) })
}

/// Closes a descriptor, ignoring `EBADF`.
pub fn close(fd: c_int) {
    let _ = unsafe { libc::close(fd) };
}

/// Duplicates a descriptor to the lowest free number.
pub fn dup(fd: c_int) -> Result<c_int, Errno> {
    Errno::result(unsafe { libc::dup(fd) })
}

/// Duplicates `from` onto `to`, closing `to` first if open.
pub fn dup_over(from: c_int, to: c_int) -> Result<(), Errno> {
    Errno::result(unsafe { libc::dup2(from, to) })?;
    Ok(())
}

/// Duplicates a descriptor to a free number at or above `min`, with the
/// close-on-exec flag set.
pub fn dup_cloexec_from(fd: c_int, min: c_int) -> Result<c_int, Errno> {
    Errno::result(unsafe { libc::fcntl(fd, libc::F_DUPFD_CLOEXEC, min) })
}

/// Reads from a descriptor.
pub fn read(fd: c_int, buffer: &mut [u8]) -> Result<usize, Errno> {
    let count =
        Errno::result(unsafe { libc::read(fd, buffer.as_mut_ptr().cast(), buffer.len()) })?;
    Ok(count as usize)
}

/// Writes a whole buffer to a descriptor, retrying partial writes.
pub fn write_all(fd: c_int, mut buffer: &[u8]) -> Result<(), Errno> {
    while !buffer.is_empty() {
        match Errno::result(unsafe { libc::write(fd, buffer.as_ptr().cast(), buffer.len()) }) {
            Ok(written) => buffer = &buffer[written as usize..],
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(errno),
        }
    }
    Ok(())
}

/// Tests whether a path names an executable regular file.
#[must_use]
pub fn is_executable_file(path: &CStr) -> bool {
    let mut stat = std::mem::MaybeUninit::uninit();
    let is_regular = unsafe {
        libc::stat(path.as_ptr(), stat.as_mut_ptr()) == 0
            && (stat.assume_init().st_mode & libc::S_IFMT) == libc::S_IFREG
    };
    is_regular && unsafe { libc::access(path.as_ptr(), libc::X_OK) } == 0
}

/// Tests whether a path exists.
#[must_use]
pub fn path_exists(path: &CStr) -> bool {
    unsafe { libc::access(path.as_ptr(), libc::F_OK) == 0 }
}

/// Returns the home directory of the named user, if any.
#[must_use]
pub fn home_directory(login_name: &str) -> Option<std::path::PathBuf> {
    let user = nix::unistd::User::from_name(login_name).ok()??;
    Some(user.dir)
}

/// Changes the working directory.
pub fn chdir(path: &CStr) -> Result<(), Errno> {
    nix::unistd::chdir(path)
}

/// Returns the current working directory.
pub fn getcwd() -> Result<std::path::PathBuf, Errno> {
    nix::unistd::getcwd()
}

/// Sets the file mode creation mask, returning the previous mask.
pub fn umask(mask: libc::mode_t) -> libc::mode_t {
    unsafe { libc::umask(mask) }
}

/// Returns process times in clock ticks:
/// `(user, system, children_user, children_system)` and the tick rate.
pub fn times() -> Result<(libc::tms, libc::clock_t), Errno> {
    let mut tms = std::mem::MaybeUninit::uninit();
    Errno::result(unsafe { libc::times(tms.as_mut_ptr()) })?;
    let ticks_per_second = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    Ok((unsafe { tms.assume_init() }, ticks_per_second))
}

/// Tests whether a descriptor refers to a terminal.
#[must_use]
pub fn isatty(fd: c_int) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

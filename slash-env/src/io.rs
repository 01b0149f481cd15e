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

//! File descriptor bookkeeping
//!
//! The [`FdTable`] tracks the descriptors the shell has touched: which
//! were opened by redirections and which are saved copies made so a
//! redirection applied around a built-in can be undone. Restoration is
//! deterministic even if user code moved descriptors around, because the
//! saved copy (not the possibly clobbered original) is the source of
//! truth.

use crate::system::{self, Errno};
pub use slash_syntax::syntax::Fd;

/// Lowest descriptor number used for saved copies
///
/// Descriptors 0 through 9 are addressable in redirection syntax and must
/// not be occupied by the shell's internal copies.
pub const MIN_SAVE_FD: std::ffi::c_int = 10;

/// State of one descriptor the shell knows about
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FdEntry {
    /// Descriptor number
    pub fd: Fd,
    /// For a saved copy, the descriptor it preserves
    pub saved_from: Option<Fd>,
    /// Whether the close-on-exec flag is set
    pub close_on_exec: bool,
    /// Whether the descriptor was produced by a redirection
    pub redirected: bool,
    /// Path the descriptor was opened from, if known
    pub path: Option<String>,
    /// Whether the descriptor is currently open
    pub open: bool,
}

/// Saved state of a descriptor, used to undo a redirection
#[derive(Debug)]
#[must_use = "a saved descriptor must be restored or dropped explicitly"]
pub struct SavedFd {
    /// The descriptor the redirection replaced
    pub original: Fd,
    /// Copy of the previous open description, or `None` if the descriptor
    /// was closed before the redirection
    pub copy: Option<Fd>,
}

/// Table of descriptors the shell has opened or saved
#[derive(Clone, Debug, Default)]
pub struct FdTable {
    entries: Vec<FdEntry>,
}

impl FdTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> FdTable {
        Default::default()
    }

    /// Saves the current state of a descriptor before a redirection.
    ///
    /// If the descriptor is open, it is duplicated to a close-on-exec
    /// descriptor at or above [`MIN_SAVE_FD`]. A closed descriptor is
    /// recorded as such.
    pub fn save(&mut self, fd: Fd) -> Result<SavedFd, Errno> {
        match system::dup_cloexec_from(fd.0, MIN_SAVE_FD) {
            Ok(copy) => {
                self.entries.push(FdEntry {
                    fd: Fd(copy),
                    saved_from: Some(fd),
                    close_on_exec: true,
                    redirected: false,
                    path: None,
                    open: true,
                });
                Ok(SavedFd {
                    original: fd,
                    copy: Some(Fd(copy)),
                })
            }
            Err(Errno::EBADF) => Ok(SavedFd {
                original: fd,
                copy: None,
            }),
            Err(errno) => Err(errno),
        }
    }

    /// Restores a descriptor saved with [`save`](Self::save).
    ///
    /// The saved copy is moved back over the original number (or the
    /// original is closed again if it had been closed) and the copy is
    /// released.
    pub fn restore(&mut self, saved: SavedFd) {
        match saved.copy {
            Some(copy) => {
                let _ = system::dup_over(copy.0, saved.original.0);
                system::close(copy.0);
                self.forget(copy);
            }
            None => {
                system::close(saved.original.0);
            }
        }
        // The original number now carries its pre-redirection description.
        if let Some(entry) = self.entries.iter_mut().find(|e| e.fd == saved.original) {
            entry.redirected = false;
        }
    }

    /// Abandons a saved descriptor, making the redirection permanent.
    ///
    /// The saved copy is closed without being moved back; the `exec`
    /// built-in uses this to keep its redirections in effect.
    pub fn discard(&mut self, saved: SavedFd) {
        if let Some(copy) = saved.copy {
            system::close(copy.0);
            self.forget(copy);
        }
    }

    /// Records that a redirection opened the given descriptor.
    pub fn record_redirection(&mut self, fd: Fd, path: Option<String>) {
        self.forget(fd);
        self.entries.push(FdEntry {
            fd,
            saved_from: None,
            close_on_exec: false,
            redirected: true,
            path,
            open: true,
        });
    }

    /// Records that the given descriptor was closed.
    pub fn record_close(&mut self, fd: Fd) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.fd == fd) {
            entry.open = false;
        }
    }

    /// Drops bookkeeping for a descriptor.
    pub fn forget(&mut self, fd: Fd) {
        self.entries.retain(|e| e.fd != fd);
    }

    /// Iterates over the known descriptor entries.
    pub fn iter(&self) -> impl Iterator<Item = &FdEntry> {
        self.entries.iter()
    }
}

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

//! Signal dispositions and the pending-signal set
//!
//! The handler installed for trapped signals does exactly one
//! async-signal-safe thing: it sets the signal's bit in an atomic pending
//! set. The executor drains the set at its safe points and runs the
//! recorded trap actions there.

use nix::errno::Errno;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::ffi::c_int;
use std::sync::atomic::{AtomicU64, Ordering};

/// Pending-signal bit set; bit N-1 stands for signal number N.
static PENDING: AtomicU64 = AtomicU64::new(0);

extern "C" fn catch_signal(signo: c_int) {
    if (1..=64).contains(&signo) {
        PENDING.fetch_or(1 << (signo - 1), Ordering::SeqCst);
    }
}

/// What the system does when a signal is delivered
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Disposition {
    /// Default action
    Default,
    /// Ignore the signal.
    Ignore,
    /// Record the signal in the pending set.
    Catch,
}

/// Installs a disposition for a signal, returning the previous one.
///
/// Handlers are installed without `SA_RESTART` so a blocking `wait` is
/// interrupted and the shell reaches a safe point promptly.
pub fn set_disposition(signo: c_int, disposition: Disposition) -> Result<Disposition, Errno> {
    let signal = Signal::try_from(signo)?;
    let handler = match disposition {
        Disposition::Default => SigHandler::SigDfl,
        Disposition::Ignore => SigHandler::SigIgn,
        Disposition::Catch => SigHandler::Handler(catch_signal),
    };
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    let old = unsafe { nix::sys::signal::sigaction(signal, &action) }?;
    Ok(match old.handler() {
        SigHandler::SigIgn => Disposition::Ignore,
        SigHandler::SigDfl => Disposition::Default,
        _ => Disposition::Catch,
    })
}

/// Takes and clears the set of pending caught signals.
#[must_use]
pub fn take_pending() -> Vec<c_int> {
    let bits = PENDING.swap(0, Ordering::SeqCst);
    (1..=64).filter(|signo| bits & (1 << (signo - 1)) != 0).collect()
}

/// Whether any caught signal is pending.
#[must_use]
pub fn any_pending() -> bool {
    PENDING.load(Ordering::SeqCst) != 0
}

/// Clears the pending set without reporting it.
///
/// Used when entering a subshell, which does not inherit pending traps.
pub fn clear_pending() {
    PENDING.store(0, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_set_round_trip() {
        clear_pending();
        assert!(!any_pending());
        catch_signal(2);
        catch_signal(15);
        assert!(any_pending());
        assert_eq!(take_pending(), [2, 15]);
        assert!(!any_pending());
        assert_eq!(take_pending(), Vec::<c_int>::new());
    }

    #[test]
    fn out_of_range_signals_are_ignored() {
        clear_pending();
        catch_signal(0);
        catch_signal(65);
        assert!(!any_pending());
    }
}

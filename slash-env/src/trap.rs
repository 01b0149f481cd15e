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

//! Signal and exit trap settings
//!
//! A [`TrapSet`] maps [`Condition`]s to [`Action`]s. Setting an action for
//! a signal installs the corresponding disposition through
//! [`system::signal`]; delivery then only marks the signal pending, and
//! the executor runs the recorded action at its safe points. The set
//! archives the disposition each signal had before the shell touched it so
//! a subshell can reset what it must not inherit.

use crate::system::signal::{self, Disposition};
use crate::system::Errno;
use std::collections::BTreeMap;
use std::ffi::c_int;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Event a trap action can be attached to
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Condition {
    /// Normal shell exit
    Exit,
    /// Delivery of the signal with the given number
    Signal(c_int),
}

/// Returns the numbers of all signals the system knows.
#[must_use]
pub fn all_signal_numbers() -> Vec<c_int> {
    nix::sys::signal::Signal::iterator()
        .map(|signal| signal as c_int)
        .collect()
}

/// Returns the conventional name of a signal, without the `SIG` prefix.
#[must_use]
pub fn signal_name(signo: c_int) -> String {
    match nix::sys::signal::Signal::try_from(signo) {
        Ok(signal) => signal
            .as_str()
            .strip_prefix("SIG")
            .unwrap_or(signal.as_str())
            .to_string(),
        Err(_) => signo.to_string(),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Exit => f.write_str("EXIT"),
            Condition::Signal(signo) => f.write_str(&signal_name(*signo)),
        }
    }
}

/// Error parsing a condition name
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("`{0}` is not a valid trap condition")]
pub struct ParseConditionError(pub String);

impl FromStr for Condition {
    type Err = ParseConditionError;

    /// Parses a condition: `EXIT`, `0`, a signal number, or a signal name
    /// with or without the `SIG` prefix.
    fn from_str(s: &str) -> Result<Condition, ParseConditionError> {
        if s == "EXIT" || s == "0" {
            return Ok(Condition::Exit);
        }
        if let Ok(signo) = s.parse::<c_int>() {
            if nix::sys::signal::Signal::try_from(signo).is_ok() {
                return Ok(Condition::Signal(signo));
            }
            return Err(ParseConditionError(s.to_string()));
        }
        let name = if s.starts_with("SIG") {
            s.to_string()
        } else {
            format!("SIG{s}")
        };
        nix::sys::signal::Signal::iterator()
            .find(|signal| signal.as_str() == name)
            .map(|signal| Condition::Signal(signal as c_int))
            .ok_or_else(|| ParseConditionError(s.to_string()))
    }
}

/// What to do when a condition occurs
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    /// Default behavior (no trap)
    Default,
    /// Ignore the condition.
    Ignore,
    /// Execute a command string.
    Command(Rc<str>),
}

/// Error setting a trap
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SetActionError {
    /// The signal cannot be caught or ignored (`KILL`, `STOP`, or a number
    /// the system rejects).
    #[error("cannot trap this signal")]
    Unsettable,
    /// System failure installing the disposition
    #[error("{0}")]
    SystemError(Errno),
}

/// State of one configured trap
#[derive(Clone, Debug, Eq, PartialEq)]
struct TrapState {
    action: Action,
    /// Disposition the signal had before the first trap touched it
    original: Option<Disposition>,
}

/// Collection of trap settings
#[derive(Clone, Debug, Default)]
pub struct TrapSet {
    entries: BTreeMap<Condition, TrapState>,
}

impl TrapSet {
    /// Creates an empty trap set.
    #[must_use]
    pub fn new() -> TrapSet {
        Default::default()
    }

    /// Returns the action configured for a condition.
    #[must_use]
    pub fn get_action(&self, condition: Condition) -> &Action {
        self.entries
            .get(&condition)
            .map(|state| &state.action)
            .unwrap_or(&Action::Default)
    }

    /// Configures the action for a condition.
    ///
    /// For a signal condition this installs the matching disposition in
    /// the system. `KILL` and `STOP` are rejected.
    pub fn set_action(&mut self, condition: Condition, action: Action) -> Result<(), SetActionError> {
        if let Condition::Signal(signo) = condition {
            if signo == libc::SIGKILL || signo == libc::SIGSTOP {
                return Err(SetActionError::Unsettable);
            }
            let disposition = match &action {
                Action::Default => Disposition::Default,
                Action::Ignore => Disposition::Ignore,
                Action::Command(_) => Disposition::Catch,
            };
            let previous = signal::set_disposition(signo, disposition).map_err(|errno| {
                if errno == Errno::EINVAL {
                    SetActionError::Unsettable
                } else {
                    SetActionError::SystemError(errno)
                }
            })?;
            self.entries
                .entry(condition)
                .or_insert(TrapState {
                    action: Action::Default,
                    original: Some(previous),
                })
                .action = action;
        } else {
            self.entries
                .entry(condition)
                .or_insert(TrapState {
                    action: Action::Default,
                    original: None,
                })
                .action = action;
        }
        Ok(())
    }

    /// Iterates over conditions with a non-default action, for `trap`
    /// output.
    pub fn iter(&self) -> impl Iterator<Item = (Condition, &Action)> {
        self.entries
            .iter()
            .filter(|(_, state)| state.action != Action::Default)
            .map(|(condition, state)| (*condition, &state.action))
    }

    /// Resets traps on entry to a subshell.
    ///
    /// Trapped commands revert to the default action (and disposition);
    /// ignored conditions stay ignored. Pending signals recorded for the
    /// parent are discarded.
    pub fn enter_subshell(&mut self) {
        signal::clear_pending();
        let commands: Vec<Condition> = self
            .entries
            .iter()
            .filter(|(_, state)| matches!(state.action, Action::Command(_)))
            .map(|(condition, _)| *condition)
            .collect();
        for condition in commands {
            if let Condition::Signal(signo) = condition {
                let _ = signal::set_disposition(signo, Disposition::Default);
            }
            self.entries.remove(&condition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parsing() {
        assert_eq!("EXIT".parse(), Ok(Condition::Exit));
        assert_eq!("0".parse(), Ok(Condition::Exit));
        assert_eq!("INT".parse(), Ok(Condition::Signal(libc::SIGINT)));
        assert_eq!("SIGINT".parse(), Ok(Condition::Signal(libc::SIGINT)));
        assert_eq!("TERM".parse(), Ok(Condition::Signal(libc::SIGTERM)));
        assert_eq!(
            libc::SIGUSR1.to_string().parse(),
            Ok(Condition::Signal(libc::SIGUSR1))
        );
        assert!("NOSUCH".parse::<Condition>().is_err());
        assert!("99999".parse::<Condition>().is_err());
    }

    #[test]
    fn condition_display() {
        assert_eq!(Condition::Exit.to_string(), "EXIT");
        assert_eq!(Condition::Signal(libc::SIGINT).to_string(), "INT");
    }

    #[test]
    fn default_action_is_implicit() {
        let traps = TrapSet::new();
        assert_eq!(traps.get_action(Condition::Exit), &Action::Default);
        assert_eq!(traps.iter().count(), 0);
    }

    #[test]
    fn exit_trap_round_trip() {
        let mut traps = TrapSet::new();
        let action = Action::Command("echo bye".into());
        traps.set_action(Condition::Exit, action.clone()).unwrap();
        assert_eq!(traps.get_action(Condition::Exit), &action);
        assert_eq!(traps.iter().count(), 1);

        traps.set_action(Condition::Exit, Action::Default).unwrap();
        assert_eq!(traps.get_action(Condition::Exit), &Action::Default);
        assert_eq!(traps.iter().count(), 0);
    }

    #[test]
    fn kill_and_stop_cannot_be_trapped() {
        let mut traps = TrapSet::new();
        let error = traps
            .set_action(Condition::Signal(libc::SIGKILL), Action::Ignore)
            .unwrap_err();
        assert_eq!(error, SetActionError::Unsettable);
        let error = traps
            .set_action(Condition::Signal(libc::SIGSTOP), Action::Ignore)
            .unwrap_err();
        assert_eq!(error, SetActionError::Unsettable);
    }

    #[test]
    fn subshell_resets_command_traps_but_keeps_ignored() {
        let mut traps = TrapSet::new();
        traps
            .set_action(Condition::Signal(libc::SIGUSR1), Action::Command("echo".into()))
            .unwrap();
        traps
            .set_action(Condition::Signal(libc::SIGUSR2), Action::Ignore)
            .unwrap();
        traps
            .set_action(Condition::Exit, Action::Command("echo bye".into()))
            .unwrap();

        traps.enter_subshell();
        assert_eq!(
            traps.get_action(Condition::Signal(libc::SIGUSR1)),
            &Action::Default
        );
        assert_eq!(
            traps.get_action(Condition::Signal(libc::SIGUSR2)),
            &Action::Ignore
        );
        assert_eq!(traps.get_action(Condition::Exit), &Action::Default);
    }
}

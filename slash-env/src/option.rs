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

//! Type definitions for shell options
//!
//! An [`OptionSet`] records which `set` options are in effect. It only
//! stores the state; honoring an option is up to the component the option
//! concerns (the expander for `noglob`, the redirection engine for
//! `noclobber`, and so on).

use enumset::EnumSet;
use enumset::EnumSetType;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Shell option
#[derive(Debug, EnumSetType, Hash, Ord, PartialOrd)]
pub enum ShellOption {
    /// `-a`: export all variables on assignment
    AllExport,
    /// `-b`: report terminated background jobs immediately
    Notify,
    /// `-C`: refuse to clobber existing files with `>`
    NoClobber,
    /// `-e`: exit on a command failure outside a condition
    ErrExit,
    /// `-f`: disable pathname expansion
    NoGlob,
    /// `-m`: job control (accepted; the facility itself is external)
    Monitor,
    /// `-n`: read commands but do not execute them
    NoExec,
    /// `-u`: treat unset parameters as an error during expansion
    NoUnset,
    /// `-v`: write input lines to standard error as they are read
    Verbose,
    /// `-x`: write expanded commands to standard error before execution
    XTrace,
    /// Interactive shell (`-i` on invocation, not settable via `set`)
    Interactive,
}

impl ShellOption {
    /// Iterates over every shell option.
    pub fn all() -> impl Iterator<Item = ShellOption> {
        EnumSet::<ShellOption>::all().iter()
    }

    /// Returns the option letter, if the option has one.
    #[must_use]
    pub const fn short_name(self) -> Option<char> {
        use ShellOption::*;
        match self {
            AllExport => Some('a'),
            Notify => Some('b'),
            NoClobber => Some('C'),
            ErrExit => Some('e'),
            NoGlob => Some('f'),
            Monitor => Some('m'),
            NoExec => Some('n'),
            NoUnset => Some('u'),
            Verbose => Some('v'),
            XTrace => Some('x'),
            Interactive => Some('i'),
        }
    }

    /// Returns the name used with `set -o`.
    #[must_use]
    pub const fn long_name(self) -> &'static str {
        use ShellOption::*;
        match self {
            AllExport => "allexport",
            Notify => "notify",
            NoClobber => "noclobber",
            ErrExit => "errexit",
            NoGlob => "noglob",
            Monitor => "monitor",
            NoExec => "noexec",
            NoUnset => "nounset",
            Verbose => "verbose",
            XTrace => "xtrace",
            Interactive => "interactive",
        }
    }

    /// Converts an option letter to the option it names.
    ///
    /// Only options settable from the command line are returned; `i` is
    /// recognized at invocation only.
    #[must_use]
    pub fn from_short_name(c: char) -> Option<ShellOption> {
        ShellOption::all()
            .find(|option| option.short_name() == Some(c) && *option != ShellOption::Interactive)
    }
}

impl fmt::Display for ShellOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

/// Error parsing an option name
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("not a shell option")]
pub struct ParseOptionError;

impl FromStr for ShellOption {
    type Err = ParseOptionError;
    fn from_str(s: &str) -> Result<ShellOption, ParseOptionError> {
        ShellOption::all()
            .find(|option| option.long_name() == s)
            .ok_or(ParseOptionError)
    }
}

/// State of all shell options
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OptionSet(pub EnumSet<ShellOption>);

impl OptionSet {
    /// Creates an option set with every option off.
    #[must_use]
    pub fn new() -> OptionSet {
        Default::default()
    }

    /// Whether the given option is on.
    #[must_use]
    pub fn is_on(&self, option: ShellOption) -> bool {
        self.0.contains(option)
    }

    /// Turns an option on or off.
    pub fn set_to(&mut self, option: ShellOption, on: bool) {
        if on {
            self.0.insert(option);
        } else {
            self.0.remove(option);
        }
    }

    /// Renders the active option letters for the special parameter `$-`.
    ///
    /// Letters appear in ascending ASCII order.
    #[must_use]
    pub fn flag_string(&self) -> String {
        let mut letters: Vec<char> = self.0.iter().filter_map(ShellOption::short_name).collect();
        letters.sort_unstable();
        letters.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_round_trip() {
        for option in EnumSet::<ShellOption>::all() {
            if option == ShellOption::Interactive {
                continue;
            }
            let letter = option.short_name().unwrap();
            assert_eq!(ShellOption::from_short_name(letter), Some(option));
        }
        assert_eq!(ShellOption::from_short_name('z'), None);
        assert_eq!(ShellOption::from_short_name('i'), None);
    }

    #[test]
    fn long_name_round_trip() {
        assert_eq!("errexit".parse(), Ok(ShellOption::ErrExit));
        assert_eq!("noclobber".parse(), Ok(ShellOption::NoClobber));
        assert_eq!("oops".parse::<ShellOption>(), Err(ParseOptionError));
    }

    #[test]
    fn setting_and_testing() {
        let mut options = OptionSet::new();
        assert!(!options.is_on(ShellOption::ErrExit));
        options.set_to(ShellOption::ErrExit, true);
        assert!(options.is_on(ShellOption::ErrExit));
        options.set_to(ShellOption::ErrExit, false);
        assert!(!options.is_on(ShellOption::ErrExit));
    }

    #[test]
    fn flag_string_is_sorted() {
        let mut options = OptionSet::new();
        options.set_to(ShellOption::XTrace, true);
        options.set_to(ShellOption::ErrExit, true);
        options.set_to(ShellOption::NoClobber, true);
        assert_eq!(options.flag_string(), "Cex");
    }
}

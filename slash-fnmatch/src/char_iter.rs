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

//! Conversion from strings to pattern character sequences

/// Character in a pattern, distinguishing pattern-special occurrences from
/// literal ones
///
/// Quote removal happens before pattern matching in the shell, so a pattern
/// cannot use plain characters to tell `*` from a quoted `*`. The shell
/// therefore hands the matcher `PatternChar`s: a `Normal` character keeps
/// its special meaning, while a `Literal` character only matches itself.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PatternChar {
    /// Character with its pattern meaning
    Normal(char),
    /// Character stripped of any special meaning
    Literal(char),
}

impl PatternChar {
    /// Returns the character value.
    #[must_use]
    pub fn char_value(self) -> char {
        match self {
            PatternChar::Normal(c) | PatternChar::Literal(c) => c,
        }
    }
}

/// Converts a string to pattern characters, treating every character as
/// [`Normal`](PatternChar::Normal).
pub fn without_escape(pattern: &str) -> impl Iterator<Item = PatternChar> + Clone + '_ {
    pattern.chars().map(PatternChar::Normal)
}

/// Converts a string to pattern characters, handling backslash escapes.
///
/// A backslash makes the next character [`Literal`](PatternChar::Literal);
/// the backslash itself does not appear in the result. A trailing backslash
/// is a literal backslash.
pub fn with_escape(pattern: &str) -> impl Iterator<Item = PatternChar> + Clone + '_ {
    let mut chars = pattern.chars();
    std::iter::from_fn(move || match chars.next()? {
        '\\' => match chars.next() {
            Some(c) => Some(PatternChar::Literal(c)),
            None => Some(PatternChar::Literal('\\')),
        },
        c => Some(PatternChar::Normal(c)),
    })
}

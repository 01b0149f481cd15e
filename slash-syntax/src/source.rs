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

//! Source code positions
//!
//! Every token, word part and diagnostic carries a [`Location`] or a [`Span`]
//! identifying where in the input it came from. The lexer counts lines and
//! columns as it consumes characters; a newline advances the line number and
//! resets the column to one.

use std::fmt;
use std::num::NonZeroU64;

/// Line-column position in the source code
///
/// Both components are one-based: the first character of the input is at line
/// 1, column 1.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Location {
    /// Line number, counted from 1
    pub line: NonZeroU64,
    /// Column number, counted from 1
    pub column: NonZeroU64,
}

impl Location {
    /// Position of the first character of the input.
    #[must_use]
    pub const fn start() -> Location {
        Location {
            line: NonZeroU64::MIN,
            column: NonZeroU64::MIN,
        }
    }

    /// Creates a location for use in tests and synthesized syntax.
    #[must_use]
    pub const fn dummy() -> Location {
        Location::start()
    }

    /// Returns the location of the next column on the same line.
    #[must_use]
    pub fn next_column(self) -> Location {
        Location {
            line: self.line,
            column: self.column.saturating_add(1),
        }
    }

    /// Returns the location of the first column of the next line.
    #[must_use]
    pub fn next_line(self) -> Location {
        Location {
            line: self.line.saturating_add(1),
            column: NonZeroU64::MIN,
        }
    }
}

impl Default for Location {
    fn default() -> Location {
        Location::start()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start and end position of a syntactic element
///
/// The `end` position is exclusive: it names the first character after the
/// element.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    /// Position of the first character of the element
    pub begin: Location,
    /// Position just past the last character of the element
    pub end: Location,
}

impl Span {
    /// Creates an empty span at the given location.
    #[must_use]
    pub const fn at(location: Location) -> Span {
        Span {
            begin: location,
            end: location,
        }
    }

    /// Creates a span for use in tests and synthesized syntax.
    #[must_use]
    pub const fn dummy() -> Span {
        Span::at(Location::dummy())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.begin.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_display() {
        assert_eq!(Location::start().to_string(), "1:1");
        let location = Location::start().next_line().next_column();
        assert_eq!(location.to_string(), "2:2");
    }

    #[test]
    fn next_line_resets_column() {
        let location = Location::start().next_column().next_column().next_line();
        assert_eq!(location.line.get(), 2);
        assert_eq!(location.column.get(), 1);
    }
}

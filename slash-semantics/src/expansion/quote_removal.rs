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

//! Quote removal
//!
//! The final expansion stage strips the characters that only marked
//! quoting and yields the plain field strings.

use super::attr::AttrChar;
use slash_env::semantics::Field;
use slash_syntax::source::Span;

/// Converts attributed characters to a field, dropping quoting marks.
#[must_use]
pub fn remove_quotes(chars: &[AttrChar], origin: Span) -> Field {
    let value = chars
        .iter()
        .filter(|c| !c.is_quoting)
        .map(|c| c.value)
        .collect();
    Field { value, origin }
}

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

//! Syntax parser for while and until loops

use super::{Parser, Result};
use crate::lexer::Keyword;
use crate::syntax::CompoundCommand;

impl Parser<'_> {
    /// Parses a `while` loop.
    pub(super) fn while_clause(&mut self) -> Result<CompoundCommand> {
        self.expect_keyword(Keyword::While)?;
        let condition = self.compound_list()?;
        let body = self.do_group()?;
        Ok(CompoundCommand::While { condition, body })
    }

    /// Parses an `until` loop.
    pub(super) fn until_clause(&mut self) -> Result<CompoundCommand> {
        self.expect_keyword(Keyword::Until)?;
        let condition = self.compound_list()?;
        let body = self.do_group()?;
        Ok(CompoundCommand::Until { condition, body })
    }
}

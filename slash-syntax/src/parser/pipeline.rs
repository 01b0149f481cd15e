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

//! Syntax parser for pipelines

use super::{Parser, Result};
use crate::lexer::{Keyword, Operator, TokenId};
use crate::syntax::Pipeline;

impl Parser<'_> {
    /// Parses a pipeline: commands connected with `|`, optionally preceded
    /// by the `!` reserved word.
    pub(super) fn pipeline(&mut self) -> Result<Pipeline> {
        let negation = match self.peek()?.id {
            TokenId::Token(Some(Keyword::Bang)) => {
                self.take()?;
                true
            }
            _ => false,
        };

        let mut commands = vec![self.command()?];
        while self.accept_operator(Operator::Bar)? {
            self.linebreak()?;
            commands.push(self.command()?);
        }

        Ok(Pipeline { commands, negation })
    }
}

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

//! Syntax parser for the for loop

use super::{Parser, ParseError, ParseErrorCause, Result};
use crate::lexer::{Keyword, Operator, TokenId};
use crate::syntax::{is_name, CompoundCommand};

impl Parser<'_> {
    /// Parses a `for` loop.
    ///
    /// The `in` reserved word is only recognized here, in the head of the
    /// loop.
    pub(super) fn for_clause(&mut self) -> Result<CompoundCommand> {
        self.expect_keyword(Keyword::For)?;

        let token = self.peek()?;
        let name = match token.id {
            TokenId::Token(_) => self.take()?.word,
            TokenId::EndOfInput => return Err(self.end_of_input("name")),
            _ => return Err(self.unexpected()),
        };
        match name.to_string_if_literal() {
            Some(value) if is_name(value) => {}
            _ => {
                return Err(ParseError {
                    cause: ParseErrorCause::InvalidForName {
                        name: name.to_string(),
                    },
                    location: name.span.begin,
                })
            }
        }

        self.linebreak()?;

        let values = if let TokenId::Token(Some(Keyword::In)) = self.peek()?.id {
            self.take()?;
            let mut words = Vec::new();
            while let TokenId::Token(_) = self.peek()?.id {
                words.push(self.take()?.word);
            }
            // A sequential separator is required before `do`.
            if !self.accept_operator(Operator::Semicolon)?
                && self.peek()?.id != TokenId::Operator(Operator::Newline)
            {
                return Err(self.unexpected());
            }
            self.linebreak()?;
            Some(words)
        } else {
            if self.accept_operator(Operator::Semicolon)? {
                self.linebreak()?;
            }
            None
        };

        let body = self.do_group()?;
        Ok(CompoundCommand::For { name, values, body })
    }
}

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

//! Syntax parser for the case conditional construct

use super::{Parser, Result};
use crate::lexer::{Keyword, Operator, TokenId};
use crate::syntax::{CaseItem, CompoundCommand};

impl Parser<'_> {
    /// Parses a `case` clause.
    pub(super) fn case_clause(&mut self) -> Result<CompoundCommand> {
        self.expect_keyword(Keyword::Case)?;

        let token = self.peek()?;
        let subject = match token.id {
            TokenId::Token(_) => self.take()?.word,
            TokenId::EndOfInput => return Err(self.end_of_input("word")),
            _ => return Err(self.unexpected()),
        };

        self.linebreak()?;
        self.expect_keyword(Keyword::In)?;
        self.linebreak()?;

        let mut items = Vec::new();
        loop {
            if let TokenId::Token(Some(Keyword::Esac)) = self.peek()?.id {
                self.take()?;
                break;
            }
            self.accept_operator(Operator::OpenParen)?;

            let mut patterns = Vec::new();
            loop {
                let token = self.peek()?;
                match token.id {
                    TokenId::Token(_) => patterns.push(self.take()?.word),
                    TokenId::EndOfInput => return Err(self.end_of_input("pattern")),
                    _ => return Err(self.unexpected()),
                }
                if !self.accept_operator(Operator::Bar)? {
                    break;
                }
            }
            self.expect_operator(Operator::CloseParen)?;

            let body = self.compound_list()?;
            items.push(CaseItem { patterns, body });

            if self.accept_operator(Operator::SemicolonSemicolon)? {
                self.linebreak()?;
                continue;
            }
            self.expect_keyword(Keyword::Esac)?;
            break;
        }

        Ok(CompoundCommand::Case { subject, items })
    }
}

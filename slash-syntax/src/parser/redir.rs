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

//! Syntax parser for redirections

use super::{Parser, Result};
use crate::lexer::{Operator, TokenId};
use crate::syntax::{Redir, RedirBody, RedirOp};

impl Parser<'_> {
    /// Parses one redirection, including any `IO_NUMBER` or `IO_LOCATION`
    /// prefix.
    pub(super) fn redirection(&mut self) -> Result<Redir> {
        let (fd, fd_location) = match self.peek()?.id {
            TokenId::IoNumber(fd) => {
                self.take()?;
                (Some(fd), None)
            }
            TokenId::IoLocation => {
                let token = self.take()?;
                let value = token
                    .word
                    .to_string_if_literal()
                    .expect("an IO_LOCATION token is a literal word");
                (None, Some(value[1..value.len() - 1].to_string()))
            }
            _ => (None, None),
        };

        let operator = match self.peek()?.id {
            TokenId::Operator(op) => op,
            _ => return Err(self.unexpected()),
        };
        let operator = match operator {
            Operator::Less => RedirOp::FileIn,
            Operator::LessGreater => RedirOp::FileInOut,
            Operator::Greater => RedirOp::FileOut,
            Operator::GreaterGreater => RedirOp::FileAppend,
            Operator::GreaterBar => RedirOp::FileClobber,
            Operator::LessAnd => RedirOp::FdIn,
            Operator::GreaterAnd => RedirOp::FdOut,
            Operator::LessLess | Operator::LessLessDash => {
                let token = self.take()?;
                let here_doc = token
                    .here_doc
                    .expect("a here-doc operator token carries its here-document");
                // The delimiter word follows the operator token.
                let delimiter = self.take()?;
                debug_assert!(matches!(delimiter.id, TokenId::Token(_)));
                return Ok(Redir {
                    fd,
                    fd_location,
                    body: RedirBody::HereDoc(here_doc),
                });
            }
            _ => return Err(self.unexpected()),
        };
        self.take()?;

        let token = self.peek()?;
        match token.id {
            TokenId::Token(_) => {}
            TokenId::EndOfInput => return Err(self.end_of_input("filename")),
            _ => return Err(self.unexpected()),
        }
        let operand = self.take()?.word;
        Ok(Redir {
            fd,
            fd_location,
            body: RedirBody::Normal { operator, operand },
        })
    }
}

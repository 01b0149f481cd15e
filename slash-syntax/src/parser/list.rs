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

//! Syntax parser for lists and and-or lists

use super::{starts_command, Parser, Result};
use crate::lexer::{Operator, TokenId};
use crate::syntax::{AndOr, AndOrList, Item, List};

impl Parser<'_> {
    /// Parses a list inside a compound command.
    ///
    /// Commands may be separated by `;`, `&` and newlines. Parsing stops
    /// (without an error) before the first token that cannot start a
    /// command, which the caller checks against the expected closing
    /// keyword or operator.
    pub(super) fn compound_list(&mut self) -> Result<List> {
        let mut items = Vec::new();
        self.linebreak()?;
        loop {
            if !starts_command(self.peek()?) {
                break;
            }
            self.active_aliases.clear();
            let and_or = self.and_or()?;
            let is_async = match self.peek()?.id {
                TokenId::Operator(Operator::And) => {
                    self.take()?;
                    true
                }
                TokenId::Operator(Operator::Semicolon) => {
                    self.take()?;
                    false
                }
                _ => false,
            };
            items.push(Item { and_or, is_async });
            self.linebreak()?;
        }
        Ok(List(items))
    }

    /// Parses an and-or list: pipelines connected with `&&` and `||`.
    pub(super) fn and_or(&mut self) -> Result<AndOrList> {
        let first = self.pipeline()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek()?.id {
                TokenId::Operator(Operator::AndAnd) => AndOr::AndThen,
                TokenId::Operator(Operator::BarBar) => AndOr::OrElse,
                _ => break,
            };
            self.take()?;
            self.linebreak()?;
            rest.push((op, self.pipeline()?));
        }
        Ok(AndOrList { first, rest })
    }
}

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

//! Syntax parser for compound commands

use super::{Parser, Result};
use crate::lexer::{Keyword, Operator, TokenId};
use crate::syntax::{CompoundCommand, FullCompoundCommand, List};

impl Parser<'_> {
    /// Parses a compound command with its trailing redirections.
    pub(super) fn full_compound_command(&mut self) -> Result<FullCompoundCommand> {
        let command = self.compound_command()?;
        let mut redirs = Vec::new();
        loop {
            match self.peek()?.id {
                TokenId::IoNumber(_) | TokenId::IoLocation => redirs.push(self.redirection()?),
                TokenId::Operator(op) if op.is_redirection() => redirs.push(self.redirection()?),
                _ => break,
            }
        }
        Ok(FullCompoundCommand { command, redirs })
    }

    /// Parses a compound command.
    fn compound_command(&mut self) -> Result<CompoundCommand> {
        match self.peek()?.id {
            TokenId::Operator(Operator::OpenParen) => self.subshell(),
            TokenId::Token(Some(Keyword::OpenBrace)) => self.brace_group(),
            TokenId::Token(Some(Keyword::If)) => self.if_clause(),
            TokenId::Token(Some(Keyword::While)) => self.while_clause(),
            TokenId::Token(Some(Keyword::Until)) => self.until_clause(),
            TokenId::Token(Some(Keyword::For)) => self.for_clause(),
            TokenId::Token(Some(Keyword::Case)) => self.case_clause(),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses a parenthesised subshell.
    fn subshell(&mut self) -> Result<CompoundCommand> {
        self.expect_operator(Operator::OpenParen)?;
        let body = self.compound_list()?;
        self.expect_operator(Operator::CloseParen)?;
        Ok(CompoundCommand::Subshell(body))
    }

    /// Parses a brace group.
    fn brace_group(&mut self) -> Result<CompoundCommand> {
        self.expect_keyword(Keyword::OpenBrace)?;
        let body = self.compound_list()?;
        self.expect_keyword(Keyword::CloseBrace)?;
        Ok(CompoundCommand::Grouping(body))
    }

    /// Parses a `do ... done` group.
    pub(super) fn do_group(&mut self) -> Result<List> {
        self.expect_keyword(Keyword::Do)?;
        let body = self.compound_list()?;
        self.expect_keyword(Keyword::Done)?;
        Ok(body)
    }
}

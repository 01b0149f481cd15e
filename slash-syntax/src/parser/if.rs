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

//! Syntax parser for the if conditional construct

use super::{Parser, Result};
use crate::lexer::{Keyword, TokenId};
use crate::syntax::{CompoundCommand, ElifThen};

impl Parser<'_> {
    /// Parses an `if` clause.
    pub(super) fn if_clause(&mut self) -> Result<CompoundCommand> {
        self.expect_keyword(Keyword::If)?;
        let condition = self.compound_list()?;
        self.expect_keyword(Keyword::Then)?;
        let body = self.compound_list()?;

        let mut elifs = Vec::new();
        while let TokenId::Token(Some(Keyword::Elif)) = self.peek()?.id {
            self.take()?;
            let condition = self.compound_list()?;
            self.expect_keyword(Keyword::Then)?;
            let body = self.compound_list()?;
            elifs.push(ElifThen { condition, body });
        }

        let r#else = match self.peek()?.id {
            TokenId::Token(Some(Keyword::Else)) => {
                self.take()?;
                Some(self.compound_list()?)
            }
            _ => None,
        };

        self.expect_keyword(Keyword::Fi)?;
        Ok(CompoundCommand::If {
            condition,
            body,
            elifs,
            r#else,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::compound_command::tests::compound_of;
    use super::super::tests::parse_error;
    use crate::syntax::CompoundCommand;
    use assert_matches::assert_matches;

    #[test]
    fn plain_if() {
        let full = compound_of("if true; then echo y; fi\n");
        assert_matches!(full.command, CompoundCommand::If { condition, body, elifs, r#else } => {
            assert_eq!(condition.0.len(), 1);
            assert_eq!(body.0.len(), 1);
            assert!(elifs.is_empty());
            assert!(r#else.is_none());
        });
    }

    #[test]
    fn if_else() {
        let full = compound_of("if true; then echo y; else echo n; fi\n");
        assert_matches!(full.command, CompoundCommand::If { r#else, .. } => {
            assert_eq!(r#else.unwrap().0.len(), 1);
        });
    }

    #[test]
    fn elif_chain() {
        let full = compound_of("if a; then x; elif b; then y; elif c; then z; else w; fi\n");
        assert_matches!(full.command, CompoundCommand::If { elifs, r#else, .. } => {
            assert_eq!(elifs.len(), 2);
            assert!(r#else.is_some());
        });
    }

    #[test]
    fn multi_line_if() {
        let full = compound_of("if true\nthen\necho y\nfi\n");
        assert_matches!(full.command, CompoundCommand::If { .. });
    }

    #[test]
    fn missing_then() {
        let error = parse_error("if true; fi\n");
        assert!(!error.is_incomplete());
    }

    #[test]
    fn missing_fi_is_incomplete() {
        let error = parse_error("if true; then echo y;\n");
        assert!(error.is_incomplete());
    }
}

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

//! Syntax parser for commands

use super::{Parser, ParseError, ParseErrorCause, Result};
use crate::lexer::{Keyword, Operator, TokenId};
use crate::syntax::Command;

impl Parser<'_> {
    /// Parses a command: simple, compound or function definition.
    pub(super) fn command(&mut self) -> Result<Command> {
        let token = self.peek()?;
        match token.id {
            TokenId::Operator(Operator::OpenParen) => {
                self.full_compound_command().map(Command::Compound)
            }
            TokenId::Token(Some(keyword)) => match keyword {
                Keyword::If
                | Keyword::While
                | Keyword::Until
                | Keyword::For
                | Keyword::Case
                | Keyword::OpenBrace => self.full_compound_command().map(Command::Compound),
                // `!` is consumed by the pipeline parser; any other keyword
                // cannot start a command.
                _ => Err(self.unexpected()),
            },
            TokenId::Token(None) | TokenId::IoNumber(_) | TokenId::IoLocation => {
                self.simple_command()
            }
            TokenId::Operator(op) if op.is_redirection() => self.simple_command(),
            TokenId::EndOfInput => Err(ParseError {
                cause: ParseErrorCause::UnexpectedEndOfInput {
                    expected: "command".to_string(),
                },
                location: token.span().begin,
            }),
            TokenId::Operator(_) => Err(self.unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_command, parse_error};
    use crate::syntax::{Command, CompoundCommand};
    use assert_matches::assert_matches;

    #[test]
    fn dispatches_to_simple_command() {
        assert_matches!(parse_command("echo hi\n"), Command::Simple(_));
    }

    #[test]
    fn dispatches_to_compound_command() {
        assert_matches!(parse_command("(ls)\n"), Command::Compound(full) => {
            assert_matches!(full.command, CompoundCommand::Subshell(_));
        });
    }

    #[test]
    fn dispatches_to_function_definition() {
        assert_matches!(parse_command("f() { echo x; }\n"), Command::Function(_));
    }

    #[test]
    fn clause_delimiter_cannot_start_command() {
        for source in ["fi\n", "done\n", "esac\n", "then\n", "in\n"] {
            let error = parse_error(source);
            assert!(!error.is_incomplete(), "source: {source:?}");
        }
    }
}

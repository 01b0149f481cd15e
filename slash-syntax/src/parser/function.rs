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

//! Syntax parser for function definitions

use super::{Parser, ParseError, ParseErrorCause, Result};
use crate::lexer::Operator;
use crate::syntax::{is_name, FunctionDefinition, Word};
use std::rc::Rc;

impl Parser<'_> {
    /// Parses a function definition after its name.
    ///
    /// The name word has been consumed by the simple-command parser, which
    /// detected the following `(`.
    pub(super) fn function_definition(&mut self, name: Word) -> Result<FunctionDefinition> {
        match name.to_string_if_literal() {
            Some(value) if is_name(value) => {}
            _ => {
                return Err(ParseError {
                    cause: ParseErrorCause::InvalidFunctionName {
                        name: name.to_string(),
                    },
                    location: name.span.begin,
                })
            }
        }

        self.expect_operator(Operator::OpenParen)?;
        self.expect_operator(Operator::CloseParen)?;
        self.linebreak()?;

        let body = self.full_compound_command()?;
        Ok(FunctionDefinition {
            name,
            body: Rc::new(body),
        })
    }
}

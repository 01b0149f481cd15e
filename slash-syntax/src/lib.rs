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

//! Shell language syntax for slash
//!
//! This crate provides the front end of the shell: a streaming
//! [lexer](lexer::Lexer) that turns source bytes into tokens with segmented
//! word structure, and a [parser](parser::Parser) that builds the
//! [syntax tree](syntax) following the POSIX shell grammar. The
//! [alias](alias) module holds the alias definitions the parser consults
//! during word recognition.
//!
//! The typical driving loop appends source to the lexer, calls
//! [`tokenize`](lexer::Lexer::tokenize) until it reports a safe boundary,
//! and then lets a parser consume the tokens:
//!
//! ```
//! use slash_syntax::alias::AliasSet;
//! use slash_syntax::lexer::Lexer;
//! use slash_syntax::parser::Parser;
//!
//! let mut lexer = Lexer::with_source("echo hello | cat\n");
//! lexer.tokenize().unwrap();
//! let aliases = AliasSet::new();
//! let mut parser = Parser::new(&mut lexer, &aliases);
//! let program = parser.program().unwrap();
//! assert_eq!(program.0.len(), 1);
//! assert_eq!(program.0[0].and_or.first.commands.len(), 2);
//! ```

pub mod alias;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod syntax;

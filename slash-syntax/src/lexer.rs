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

//! Lexical analysis of shell source code
//!
//! The [`Lexer`] turns an evolving byte stream into a stream of
//! [`Token`]s. Input arrives through [`append_input`](Lexer::append_input);
//! [`tokenize`](Lexer::tokenize) scans as much of the buffer as possible
//! and either completes at a safe boundary, asks for more input, or reports
//! an error. Completed tokens are handed over one at a time by
//! [`pop_first_token`](Lexer::pop_first_token).
//!
//! A word token carries the segmented structure of the word as a sequence
//! of [parts](crate::syntax::WordPart). Reserved words are only *tagged* at
//! this layer ([`TokenId::Token`]); promotion to an actual keyword is a
//! parser decision.

mod braced_param;
mod core;
mod dollar;
mod heredoc;
mod keyword;
mod op;
mod word;

pub use self::core::{
    is_blank, LexError, LexErrorCause, Lexer, Token, TokenId, TokenizeResult,
};
pub use self::keyword::{Keyword, ParseKeywordError};
pub use self::op::{starts_operator, Edge, Operator, Trie, OPERATORS};

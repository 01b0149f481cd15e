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

//! Syntax parser for the shell language
//!
//! The [`Parser`] consumes tokens produced by a [`Lexer`] and builds the
//! syntax tree defined in [`syntax`](crate::syntax), following the POSIX
//! shell grammar. It is a one-pass recursive-descent parser; grammar
//! context decides when a word tagged with a keyword is promoted to a
//! reserved word and when alias substitution applies.
//!
//! Parsing is line-oriented: [`command_line`](Parser::command_line) returns
//! one newline-terminated list at a time so the caller can execute it
//! before the next line is parsed. This matters for alias substitution,
//! which must see alias definitions made by previously executed commands.
//!
//! When the parser runs out of tokens in the middle of a construct, it
//! reports an error whose [`is_incomplete`](ParseError::is_incomplete)
//! method returns true; an interactive caller reads more input and retries
//! while a script runner treats it as fatal.

mod case;
mod command;
mod compound_command;
mod for_loop;
mod function;
mod r#if;
mod list;
mod pipeline;
mod redir;
mod simple_command;
mod while_loop;

use crate::alias::AliasSet;
use crate::lexer::{Keyword, Lexer, Operator, Token, TokenId};
use crate::source::Location;
use crate::syntax::{Item, List};
use std::collections::HashSet;
use std::collections::VecDeque;
use thiserror::Error;

/// Kinds of syntax errors
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseErrorCause {
    /// A token appeared where no grammar rule accepts it.
    #[error("syntax error near unexpected token `{token}`")]
    UnexpectedToken { token: String },
    /// The input ended inside an unfinished construct.
    #[error("unexpected end of input, expecting `{expected}`")]
    UnexpectedEndOfInput { expected: String },
    /// The token stream is exhausted but more input may be appended.
    #[error("more input is needed to complete the command")]
    PendingInput,
    /// A function definition with an invalid name
    #[error("`{name}` is not a valid function name")]
    InvalidFunctionName { name: String },
    /// A `for` loop with an invalid variable name
    #[error("`{name}` is not a valid for-loop variable name")]
    InvalidForName { name: String },
    /// An alias whose replacement text does not tokenize
    #[error("alias `{name}` has an invalid replacement")]
    InvalidAliasReplacement { name: String },
}

/// Syntax error with the position it occurred at
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{cause}")]
pub struct ParseError {
    pub cause: ParseErrorCause,
    pub location: Location,
}

impl ParseError {
    /// Whether more input could turn this error into a successful parse.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self.cause,
            ParseErrorCause::PendingInput | ParseErrorCause::UnexpectedEndOfInput { .. }
        )
    }
}

/// Entire result of parsing
pub type Result<T> = std::result::Result<T, ParseError>;

/// The shell syntax parser
///
/// A parser borrows the lexer that provides tokens and the alias set used
/// for alias substitution. Lookahead that is still unconsumed when the
/// parser is dropped is returned to the lexer, so a new parser can pick up
/// where the previous one left off.
#[derive(Debug)]
#[must_use = "Parser must be used to parse syntax"]
pub struct Parser<'a> {
    /// Lexer that provides tokens
    lexer: &'a mut Lexer,
    /// Aliases the parser applies to substitute command words
    aliases: &'a AliasSet,
    /// Tokens spliced in by alias substitution, consumed before the lexer
    queue: VecDeque<Token>,
    /// One-token lookahead
    peeked: Option<Token>,
    /// Alias names already substituted in the current command
    ///
    /// A name in this set is not substituted again, which bounds recursive
    /// aliases. The set is cleared when a new command starts.
    active_aliases: HashSet<String>,
    /// Whether the next command word is checked for alias substitution
    /// because the previous alias replacement ended in a blank
    check_word_after_alias: bool,
}

impl<'a> Parser<'a> {
    /// Creates a parser reading from the given lexer.
    pub fn new(lexer: &'a mut Lexer, aliases: &'a AliasSet) -> Parser<'a> {
        Parser {
            lexer,
            aliases,
            queue: VecDeque::new(),
            peeked: None,
            active_aliases: HashSet::new(),
            check_word_after_alias: false,
        }
    }

    /// Parses one newline-terminated list of commands.
    ///
    /// Leading newlines are skipped. Returns `None` when the input is
    /// exhausted. The terminating newline, if any, is consumed.
    pub fn command_line(&mut self) -> Result<Option<List>> {
        loop {
            match self.peek()?.id {
                TokenId::Operator(Operator::Newline) => {
                    self.take()?;
                }
                TokenId::EndOfInput => return Ok(None),
                _ => break,
            }
        }

        let mut items = Vec::new();
        loop {
            self.active_aliases.clear();
            let and_or = self.and_or()?;

            let mut separated = false;
            let mut is_async = false;
            match self.peek()?.id {
                TokenId::Operator(Operator::And) => {
                    self.take()?;
                    separated = true;
                    is_async = true;
                }
                TokenId::Operator(Operator::Semicolon) => {
                    self.take()?;
                    separated = true;
                }
                _ => {}
            }
            items.push(Item { and_or, is_async });

            let token = self.peek()?;
            match token.id {
                TokenId::Operator(Operator::Newline) => {
                    self.take()?;
                    break;
                }
                TokenId::EndOfInput => break,
                _ if separated && starts_command(token) => continue,
                _ => return Err(self.unexpected()),
            }
        }
        Ok(Some(List(items)))
    }

    /// Parses the whole input as a program.
    ///
    /// This is the entry point for `eval`, command substitution and other
    /// sources that are available in full.
    pub fn program(&mut self) -> Result<List> {
        let mut items = Vec::new();
        while let Some(list) = self.command_line()? {
            items.extend(list.0);
        }
        Ok(List(items))
    }

    // Token plumbing

    /// Makes sure the lookahead slot is filled.
    fn fill(&mut self) -> Result<()> {
        if self.peeked.is_none() {
            self.peeked = self
                .queue
                .pop_front()
                .or_else(|| self.lexer.pop_first_token());
        }
        if self.peeked.is_none() {
            return Err(ParseError {
                cause: ParseErrorCause::PendingInput,
                location: self.lexer.location(),
            });
        }
        Ok(())
    }

    /// Peeks the next token.
    fn peek(&mut self) -> Result<&Token> {
        self.fill()?;
        Ok(self.peeked.as_ref().unwrap())
    }

    /// Consumes the next token.
    fn take(&mut self) -> Result<Token> {
        self.fill()?;
        Ok(self.peeked.take().unwrap())
    }

    /// Skips any number of newline tokens.
    fn linebreak(&mut self) -> Result<()> {
        while let TokenId::Operator(Operator::Newline) = self.peek()?.id {
            self.take()?;
        }
        Ok(())
    }

    /// Consumes the next token, requiring it to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        let token = self.peek()?;
        match token.id {
            TokenId::Token(Some(kw)) if kw == keyword => {
                self.take()?;
                Ok(())
            }
            TokenId::EndOfInput => Err(self.end_of_input(keyword.as_str())),
            _ => Err(self.unexpected()),
        }
    }

    /// Consumes the next token, requiring it to be the given operator.
    fn expect_operator(&mut self, operator: Operator) -> Result<()> {
        let token = self.peek()?;
        match token.id {
            TokenId::Operator(op) if op == operator => {
                self.take()?;
                Ok(())
            }
            TokenId::EndOfInput => Err(self.end_of_input(operator.as_str().trim())),
            _ => Err(self.unexpected()),
        }
    }

    /// Consumes the next token if it is the given operator.
    fn accept_operator(&mut self, operator: Operator) -> Result<bool> {
        if self.peek()?.id == TokenId::Operator(operator) {
            self.take()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Creates an error for the (already peeked) unexpected token.
    fn unexpected(&mut self) -> ParseError {
        let token = self.peeked.as_ref().expect("a token must have been peeked");
        ParseError {
            cause: ParseErrorCause::UnexpectedToken {
                token: token.to_string(),
            },
            location: token.span().begin,
        }
    }

    /// Creates an error for input ending before the expected token.
    fn end_of_input(&mut self, expected: &str) -> ParseError {
        let location = self
            .peeked
            .as_ref()
            .map(|token| token.span().begin)
            .unwrap_or_else(|| self.lexer.location());
        ParseError {
            cause: ParseErrorCause::UnexpectedEndOfInput {
                expected: expected.to_string(),
            },
            location,
        }
    }
}

/// Returns unconsumed lookahead to the lexer so a subsequent parser can
/// continue from the same position.
impl Drop for Parser<'_> {
    fn drop(&mut self) {
        for token in self.queue.drain(..).rev() {
            self.lexer.unpop_token(token);
        }
        if let Some(token) = self.peeked.take() {
            self.lexer.unpop_token(token);
        }
    }
}

/// Tests whether a token can start a command.
fn starts_command(token: &Token) -> bool {
    match token.id {
        TokenId::Token(Some(keyword)) => !keyword.is_clause_delimiter(),
        TokenId::Token(None) | TokenId::IoNumber(_) | TokenId::IoLocation => true,
        TokenId::Operator(op) => op == Operator::OpenParen || op.is_redirection(),
        TokenId::EndOfInput => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::syntax::Command;

    /// Parses a complete source string into a program, asserting success.
    pub(crate) fn parse(source: &str) -> List {
        let mut lexer = Lexer::with_source(source);
        lexer
            .tokenize()
            .unwrap_or_else(|e| panic!("tokenize {source:?}: {e}"));
        let aliases = AliasSet::new();
        let mut parser = Parser::new(&mut lexer, &aliases);
        parser
            .program()
            .unwrap_or_else(|e| panic!("parse {source:?}: {e}"))
    }

    /// Parses a source string expected to contain one command.
    pub(crate) fn parse_command(source: &str) -> Command {
        let mut list = parse(source);
        assert_eq!(list.0.len(), 1, "source: {source:?}");
        let mut and_or = list.0.pop().unwrap().and_or;
        assert!(and_or.rest.is_empty());
        assert_eq!(and_or.first.commands.len(), 1);
        and_or.first.commands.pop().unwrap()
    }

    /// Parses a source string expected to fail.
    pub(crate) fn parse_error(source: &str) -> ParseError {
        let mut lexer = Lexer::with_source(source);
        lexer.tokenize().unwrap();
        let aliases = AliasSet::new();
        let mut parser = Parser::new(&mut lexer, &aliases);
        parser
            .program()
            .expect_err(&format!("parse {source:?} should fail"))
    }

    #[test]
    fn empty_line_yields_nothing() {
        assert_eq!(parse("\n\n"), List(Vec::new()));
        assert_eq!(parse(""), List(Vec::new()));
    }

    #[test]
    fn semicolon_separates_items() {
        let list = parse("echo a; echo b\n");
        assert_eq!(list.0.len(), 2);
        assert!(!list.0[0].is_async);
        assert!(!list.0[1].is_async);
    }

    #[test]
    fn ampersand_marks_async() {
        let list = parse("sleep 1& echo b\n");
        assert_eq!(list.0.len(), 2);
        assert!(list.0[0].is_async);
        assert!(!list.0[1].is_async);
    }

    #[test]
    fn trailing_separator_is_allowed() {
        let list = parse("echo a;\n");
        assert_eq!(list.0.len(), 1);
    }

    #[test]
    fn commands_on_multiple_lines() {
        let list = parse("echo a\necho b\n");
        assert_eq!(list.0.len(), 2);
    }

    #[test]
    fn missing_separator_is_an_error() {
        let error = parse_error("echo a ; ; echo b\n");
        assert_matches::assert_matches!(error.cause, ParseErrorCause::UnexpectedToken { .. });
        assert!(!error.is_incomplete());
    }

    #[test]
    fn pending_input_is_incomplete() {
        let mut lexer = Lexer::new();
        lexer.append_input("if true\n");
        let _ = lexer.tokenize().unwrap();
        let aliases = AliasSet::new();
        let mut parser = Parser::new(&mut lexer, &aliases);
        let error = parser.command_line().unwrap_err();
        assert!(error.is_incomplete());
    }

    #[test]
    fn end_of_input_mid_construct_is_incomplete() {
        let error = parse_error("if true; then echo a;\n");
        assert_matches::assert_matches!(
            &error.cause,
            ParseErrorCause::UnexpectedEndOfInput { expected } => {
                assert_eq!(expected, "fi");
            }
        );
        assert!(error.is_incomplete());
    }

    #[test]
    fn lookahead_is_returned_on_drop() {
        let mut lexer = Lexer::with_source("echo a\necho b\n");
        lexer.tokenize().unwrap();
        let aliases = AliasSet::new();

        let mut parser = Parser::new(&mut lexer, &aliases);
        let first = parser.command_line().unwrap().unwrap();
        assert_eq!(first.0.len(), 1);
        // Peek into the next line, then abandon this parser.
        let _ = parser.peek();
        drop(parser);

        let mut parser = Parser::new(&mut lexer, &aliases);
        let second = parser.command_line().unwrap().unwrap();
        assert_eq!(second.0.len(), 1);
    }
}

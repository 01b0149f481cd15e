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

//! Fundamental building blocks of the lexical analyzer
//!
//! The [`Lexer`] consumes an append-only input buffer and produces a queue
//! of [`Token`]s. Tokenization is driven by [`tokenize`](Lexer::tokenize),
//! which scans as far as the buffer allows and reports one of three
//! outcomes per call:
//!
//! - `Ok(TokenizeResult::Complete)`: the buffer was consumed up to a safe
//!   boundary (no partial token, no pending here-document body).
//! - `Ok(TokenizeResult::Incomplete)`: the buffer ends in the middle of a
//!   token, quotation, substitution or here-document body. Appending more
//!   input with [`append_input`](Lexer::append_input) and calling
//!   `tokenize` again resumes cleanly.
//! - `Err(_)`: the input is malformed. The first error is also recorded in
//!   the lexer and reported again until [`reset_error`](Lexer::reset_error)
//!   is called.
//!
//! Scanning a token is atomic: either the whole token (together with any
//! dependent piece such as a here-document delimiter) is scanned and
//! committed, or the cursor is rolled back to the position where the token
//! started. The lexer therefore needs no persistent mid-token state; the
//! nesting of quotations and substitutions lives on the call stack of the
//! scanning functions.

use super::keyword::Keyword;
use super::op::Operator;
use crate::source::{Location, Span};
use crate::syntax::{is_name, Fd, HereDoc, Word};
use std::collections::VecDeque;
use std::rc::Rc;
use thiserror::Error;

/// Returns true if the character is a blank character.
#[must_use]
pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Token identifier, or classification of tokens
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenId {
    /// Ordinary word token (`TOKEN`)
    ///
    /// If the token _looks like_ a reserved word, the associated value names
    /// the [`Keyword`]. Whether the token actually acts as a reserved word
    /// depends on context; the parser decides when it accepts the token.
    Token(Option<Keyword>),
    /// Operator token
    Operator(Operator),
    /// `IO_NUMBER` (a digit sequence immediately preceding a redirection)
    IoNumber(Fd),
    /// `IO_LOCATION` (a `{name}` word immediately preceding a redirection)
    IoLocation,
    /// Imaginary token identifier for the end of input
    EndOfInput,
}

/// Result of lexical analysis produced by the [`Lexer`]
#[derive(Clone, Debug)]
pub struct Token {
    /// Content of the token
    ///
    /// For an operator token, the word contains the operator lexeme as a
    /// single literal part.
    pub word: Word,
    /// Token identifier
    pub id: TokenId,
    /// Here-document carried by a `<<` or `<<-` operator token
    pub here_doc: Option<Rc<HereDoc>>,
}

impl Token {
    /// Returns the position of the token in the source code.
    #[must_use]
    pub fn span(&self) -> Span {
        self.word.span
    }

    /// Returns the keyword this token may act as, if any.
    #[must_use]
    pub fn keyword(&self) -> Option<Keyword> {
        match self.id {
            TokenId::Token(keyword) => keyword,
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            TokenId::EndOfInput => f.write_str("end of input"),
            _ => write!(f, "{}", self.word),
        }
    }
}

/// Kinds of unrecoverable tokenization errors
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LexErrorCause {
    #[error("unterminated single-quoted string")]
    UnclosedSingleQuote,
    #[error("unterminated double-quoted string")]
    UnclosedDoubleQuote,
    #[error("unterminated parameter expansion")]
    UnclosedParam,
    #[error("unterminated command substitution")]
    UnclosedCommandSubst,
    #[error("unterminated backquoted command substitution")]
    UnclosedBackquote,
    #[error("unterminated arithmetic expansion")]
    UnclosedArith,
    #[error("invalid parameter expansion")]
    InvalidParam,
    #[error("the `))` terminating an arithmetic expansion must be adjacent")]
    UnbalancedArith,
    #[error("missing here-document delimiter")]
    MissingHereDocDelimiter,
    #[error("here-document delimiter may not contain expansions")]
    InvalidHereDocDelimiter,
    #[error("here-document not terminated by `{delimiter}`")]
    UnclosedHereDocContent { delimiter: String },
}

/// Tokenization error with the position it occurred at
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{cause}")]
pub struct LexError {
    pub cause: LexErrorCause,
    pub location: Location,
}

/// Reason a scanning function stopped short of a full token
///
/// `Incomplete` propagates to the caller of [`Lexer::tokenize`] as
/// [`TokenizeResult::Incomplete`] after the cursor is rolled back to the
/// start of the partial token.
#[derive(Clone, Debug)]
pub(super) enum Interrupt {
    Incomplete,
    Error(LexError),
}

pub(super) type Scan<T> = Result<T, Interrupt>;

/// Result of a successful [`Lexer::tokenize`] call
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub enum TokenizeResult {
    /// The buffer was consumed up to a safe boundary.
    Complete,
    /// More input is needed to finish the current token.
    Incomplete,
}

/// Saved cursor state for rolling back a partial scan
#[derive(Clone, Copy, Debug)]
pub(super) struct Checkpoint {
    cursor: usize,
    location: Location,
}

/// Outcome of scanning one token
enum Step {
    /// A token was emitted; scanning continues.
    Progress,
    /// The buffer is exhausted between tokens and input is still open.
    SafeBoundary,
    /// The buffer is exhausted and the input is closed.
    EndOfInput,
}

/// Lexical analyzer
///
/// See the [module documentation](self) for the scanning protocol.
#[derive(Debug, Default)]
pub struct Lexer {
    /// Accumulated source code
    buffer: String,
    /// Byte index of the next unconsumed character
    cursor: usize,
    /// Line-column position of the next unconsumed character
    location: Location,
    /// Whether `finish_input` has been called
    input_closed: bool,
    /// Completed tokens not yet popped by the caller
    tokens: VecDeque<Token>,
    /// Here-documents whose bodies are read at the next newline, in order
    pub(super) pending_here_docs: VecDeque<Rc<HereDoc>>,
    /// First unrecoverable error
    error: Option<LexError>,
    /// Whether the end-of-input token has been emitted
    end_emitted: bool,
}

impl Lexer {
    /// Creates a lexer with an empty input buffer.
    #[must_use]
    pub fn new() -> Lexer {
        Lexer::default()
    }

    /// Creates a lexer over a complete source string.
    ///
    /// The input is appended and the input end is marked, so a single
    /// `tokenize` call sees the whole program. This is the constructor used
    /// for `eval`, command substitution, alias substitution and tests.
    #[must_use]
    pub fn with_source(source: &str) -> Lexer {
        let mut lexer = Lexer::new();
        lexer.append_input(source);
        lexer.finish_input();
        lexer
    }

    /// Appends source bytes to the input buffer.
    ///
    /// This function never consumes or scans anything by itself.
    pub fn append_input(&mut self, source: &str) {
        debug_assert!(!self.input_closed, "input appended after finish_input");
        self.buffer.push_str(source);
    }

    /// Declares that no more input will be appended.
    ///
    /// After this call, a partial token at the end of the buffer is an
    /// error rather than an incomplete result.
    pub fn finish_input(&mut self) {
        self.input_closed = true;
    }

    /// Returns the recorded error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    /// Forgets the recorded error so tokenization can be retried.
    pub fn reset_error(&mut self) {
        self.error = None;
    }

    /// Transfers ownership of the frontmost completed token to the caller.
    pub fn pop_first_token(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Puts a token back at the front of the completed-token queue.
    ///
    /// The parser uses this to return unconsumed lookahead.
    pub(crate) fn unpop_token(&mut self, token: Token) {
        self.tokens.push_front(token)
    }

    /// Returns the position of the next character to be scanned.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Drains the input buffer, producing tokens.
    ///
    /// Tokens become available through
    /// [`pop_first_token`](Self::pop_first_token). See the [module
    /// documentation](self) for the meaning of the result.
    pub fn tokenize(&mut self) -> Result<TokenizeResult, LexError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        loop {
            let checkpoint = self.checkpoint();
            match self.scan_step() {
                Ok(Step::Progress) => continue,
                Ok(Step::SafeBoundary) => {
                    return if self.pending_here_docs.is_empty() {
                        Ok(TokenizeResult::Complete)
                    } else {
                        Ok(TokenizeResult::Incomplete)
                    }
                }
                Ok(Step::EndOfInput) => {
                    if !self.end_emitted {
                        self.end_emitted = true;
                        let span = Span::at(self.location);
                        self.tokens.push_back(Token {
                            word: Word::empty(span),
                            id: TokenId::EndOfInput,
                            here_doc: None,
                        });
                    }
                    return Ok(TokenizeResult::Complete);
                }
                Err(Interrupt::Incomplete) => {
                    self.restore(checkpoint);
                    return Ok(TokenizeResult::Incomplete);
                }
                Err(Interrupt::Error(error)) => {
                    self.error = Some(error.clone());
                    return Err(error);
                }
            }
        }
    }

    /// Scans one token, or detects the end of the buffer.
    fn scan_step(&mut self) -> Scan<Step> {
        self.skip_blanks_and_comment()?;

        let Some(c) = self.peek_char() else {
            return if self.input_closed {
                if let Some(here_doc) = self.pending_here_docs.front() {
                    return Err(self.error_here(LexErrorCause::UnclosedHereDocContent {
                        delimiter: here_doc.delimiter.clone(),
                    }));
                }
                Ok(Step::EndOfInput)
            } else if self.pending_here_docs.is_empty() {
                Ok(Step::SafeBoundary)
            } else {
                Err(Interrupt::Incomplete)
            };
        };

        if super::op::starts_operator(c) {
            self.operator_token()?;
        } else {
            let token = self.word_token()?;
            self.tokens.push_back(token);
        }
        Ok(Step::Progress)
    }

    /// Skips blanks, line continuations and a comment before a token.
    fn skip_blanks_and_comment(&mut self) -> Scan<()> {
        loop {
            self.skip_line_continuations()?;
            match self.peek_char() {
                Some(c) if is_blank(c) => {
                    self.next_char();
                }
                Some('#') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.next_char();
                    }
                    // An unfinished comment line may still grow.
                    if self.peek_char().is_none() && !self.input_closed {
                        return Err(Interrupt::Incomplete);
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Builds a word token out of a scanned word.
    pub(super) fn finalize_word_token(&self, word: Word) -> Token {
        let keyword = word
            .to_string_if_literal()
            .and_then(|value| value.parse().ok());
        Token {
            word,
            id: TokenId::Token(keyword),
            here_doc: None,
        }
    }

    /// Appends a completed token to the output queue.
    pub(super) fn push_token(&mut self, token: Token) {
        self.tokens.push_back(token)
    }

    /// Reclassifies the last token if it prefixes a redirection operator.
    ///
    /// A word consisting of a single unquoted all-digit literal that ends
    /// exactly where the redirection operator begins becomes an `IO_NUMBER`;
    /// a `{name}` word in the same position becomes an `IO_LOCATION`.
    pub(super) fn reclassify_io_prefix(&mut self, operator_begin: Location) {
        let Some(last) = self.tokens.back_mut() else {
            return;
        };
        if last.word.span.end != operator_begin || !matches!(last.id, TokenId::Token(_)) {
            return;
        }
        let Some(value) = last.word.to_string_if_literal() else {
            return;
        };
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(fd) = value.parse() {
                last.id = TokenId::IoNumber(Fd(fd));
            }
        } else if let Some(name) = value
            .strip_prefix('{')
            .and_then(|value| value.strip_suffix('}'))
        {
            if is_name(name) {
                last.id = TokenId::IoLocation;
            }
        }
    }

    // Cursor primitives

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.cursor,
            location: self.location,
        }
    }

    pub(super) fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor = checkpoint.cursor;
        self.location = checkpoint.location;
    }

    /// Returns the position of the next unconsumed character.
    #[must_use]
    pub(super) fn here(&self) -> Location {
        self.location
    }

    /// Returns the unconsumed part of the buffer.
    #[must_use]
    pub(super) fn remaining(&self) -> &str {
        &self.buffer[self.cursor..]
    }

    /// Whether the input is known to be finished.
    #[must_use]
    pub(super) fn input_closed(&self) -> bool {
        self.input_closed
    }

    /// Peeks the next character without consuming it.
    #[must_use]
    pub(super) fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consumes the next character and returns it.
    pub(super) fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.cursor += c.len_utf8();
        self.location = if c == '\n' {
            self.location.next_line()
        } else {
            self.location.next_column()
        };
        Some(c)
    }

    /// Consumes the next character if the decider function returns true.
    pub(super) fn next_char_if<F: FnOnce(char) -> bool>(&mut self, f: F) -> Option<char> {
        match self.peek_char() {
            Some(c) if f(c) => self.next_char(),
            _ => None,
        }
    }

    /// Peeks the next character, distinguishing "not yet arrived" from
    /// "input finished".
    ///
    /// Returns `Err(Interrupt::Incomplete)` if the buffer is exhausted but
    /// more input may be appended; `Ok(None)` if the input is finished.
    pub(super) fn peek_or_interrupt(&self) -> Scan<Option<char>> {
        match self.peek_char() {
            Some(c) => Ok(Some(c)),
            None if self.input_closed => Ok(None),
            None => Err(Interrupt::Incomplete),
        }
    }

    /// Skips any backslash-newline pairs at the cursor.
    pub(super) fn skip_line_continuations(&mut self) -> Scan<()> {
        loop {
            let mut chars = self.remaining().chars();
            match (chars.next(), chars.next()) {
                (Some('\\'), Some('\n')) => {
                    self.next_char();
                    self.next_char();
                }
                // A trailing backslash may yet become a continuation.
                (Some('\\'), None) if !self.input_closed => return Err(Interrupt::Incomplete),
                _ => return Ok(()),
            }
        }
    }

    /// Creates an error interrupt at the current position.
    pub(super) fn error_here(&self, cause: LexErrorCause) -> Interrupt {
        Interrupt::Error(LexError {
            cause,
            location: self.location,
        })
    }
}

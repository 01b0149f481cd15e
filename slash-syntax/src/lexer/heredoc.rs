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

//! Part of the lexer that handles here-documents
//!
//! A `<<` or `<<-` operator consumes the following word as its delimiter
//! and queues a pending here-document. When the lexer emits the next
//! newline token in normal mode, it drains the queue in FIFO order, reading
//! one body per entry: lines are collected until a line equals the
//! delimiter (after optional leading-tab stripping for `<<-`). The body is
//! stored in the [`HereDoc::content`] cell shared with the operator token,
//! so the parser can attach the here-document to a redirection before its
//! content has been read.

use super::core::{is_blank, Interrupt, LexError, LexErrorCause, Scan, Token};
use super::word::{WordBuilder, WordMode};
use super::Lexer;
use crate::source::Span;
use crate::syntax::{HereDoc, Word, WordPart};
use std::cell::OnceCell;
use std::rc::Rc;

impl Lexer {
    /// Scans the delimiter word following a here-document operator.
    ///
    /// Returns the queued here-document and the delimiter token to emit
    /// after the operator token.
    pub(super) fn here_doc_delimiter(&mut self, remove_tabs: bool) -> Scan<(Rc<HereDoc>, Token)> {
        loop {
            self.skip_line_continuations()?;
            if self.next_char_if(is_blank).is_none() {
                break;
            }
        }
        match self.peek_or_interrupt()? {
            Some(c) if !super::op::starts_operator(c) => {}
            _ => return Err(self.error_here(LexErrorCause::MissingHereDocDelimiter)),
        }

        let word = self.scan_word(WordMode::HereDocDelimiter)?;
        let mut delimiter = String::new();
        let mut quoted = false;
        for part in &word.parts {
            match part {
                WordPart::Literal {
                    value,
                    single_quoted,
                    double_quoted,
                } => {
                    quoted |= *single_quoted || *double_quoted;
                    delimiter.push_str(value);
                }
                _ => {
                    return Err(Interrupt::Error(LexError {
                        cause: LexErrorCause::InvalidHereDocDelimiter,
                        location: word.span.begin,
                    }))
                }
            }
        }

        let here_doc = Rc::new(HereDoc {
            delimiter,
            quoted,
            remove_tabs,
            content: OnceCell::new(),
        });
        let token = self.finalize_word_token(word);
        Ok((here_doc, token))
    }

    /// Reads the bodies of all pending here-documents.
    ///
    /// Nothing is committed here: the caller fills the content cells and
    /// clears the queue once the whole batch has been read, so an
    /// incomplete body rolls the entire newline step back.
    pub(super) fn read_here_doc_bodies(&mut self) -> Scan<Vec<(Rc<HereDoc>, Word)>> {
        let mut bodies = Vec::new();
        for here_doc in self.pending_here_docs.clone() {
            let content = self.here_doc_body(&here_doc)?;
            bodies.push((here_doc, content));
        }
        Ok(bodies)
    }

    /// Reads one here-document body up to and including its terminator line.
    fn here_doc_body(&mut self, here_doc: &HereDoc) -> Scan<Word> {
        let begin = self.here();
        let mut body = String::new();
        loop {
            if here_doc.remove_tabs {
                while self.next_char_if(|c| c == '\t').is_some() {}
            }

            let mut line = String::new();
            let mut terminated = false;
            loop {
                match self.peek_or_interrupt()? {
                    None => break,
                    Some('\n') => {
                        self.next_char();
                        terminated = true;
                        break;
                    }
                    Some(c) => {
                        self.next_char();
                        line.push(c);
                    }
                }
            }

            if line == here_doc.delimiter {
                break;
            }
            if !terminated {
                // The input ended without a terminator line.
                return Err(Interrupt::Error(LexError {
                    cause: LexErrorCause::UnclosedHereDocContent {
                        delimiter: here_doc.delimiter.clone(),
                    },
                    location: self.here(),
                }));
            }
            body.push_str(&line);
            body.push('\n');
        }

        let span = Span {
            begin,
            end: self.here(),
        };
        if here_doc.quoted {
            if body.is_empty() {
                Ok(Word::empty(span))
            } else {
                Ok(Word {
                    parts: vec![WordPart::unquoted(body)],
                    span,
                })
            }
        } else {
            parse_here_doc_text(&body, span)
        }
    }
}

/// Lexes the collected body of an unquoted-delimiter here-document.
///
/// The body recognizes `$` and backquote expansions; a backslash escapes
/// only `$`, `` ` ``, `\` and the newline.
fn parse_here_doc_text(body: &str, span: Span) -> Scan<Word> {
    let mut lexer = Lexer::with_source(body);
    let mut builder = WordBuilder::new();
    loop {
        match lexer.peek_char() {
            None => break,
            Some('\\') => {
                lexer.next_char();
                match lexer.peek_char() {
                    Some(d @ ('$' | '`' | '\\')) => {
                        lexer.next_char();
                        builder.push_char(d, true, false);
                    }
                    Some('\n') => {
                        // Line continuation
                        lexer.next_char();
                    }
                    _ => builder.push_char('\\', false, false),
                }
            }
            Some('$') => {
                lexer.next_char();
                lexer.dollar_unit(false, &mut builder)?;
            }
            Some('`') => {
                lexer.next_char();
                lexer.backquote(false, &mut builder)?;
            }
            Some(c) => {
                lexer.next_char();
                builder.push_char(c, false, false);
            }
        }
    }
    Ok(builder.into_word(span))
}

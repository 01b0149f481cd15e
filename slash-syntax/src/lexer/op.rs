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

//! Part of the lexer that parses operators

use super::core::{Interrupt, Scan, Token, TokenId};
use super::Lexer;
use crate::source::Span;
use crate::syntax::Word;
use std::fmt;
use std::rc::Rc;

/// Operator token identifier
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    /// Newline
    Newline,
    /// `&`
    And,
    /// `&&`
    AndAnd,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `;`
    Semicolon,
    /// `;;`
    SemicolonSemicolon,
    /// `<`
    Less,
    /// `<&`
    LessAnd,
    /// `<<`
    LessLess,
    /// `<<-`
    LessLessDash,
    /// `<>`
    LessGreater,
    /// `>`
    Greater,
    /// `>&`
    GreaterAnd,
    /// `>>`
    GreaterGreater,
    /// `>|`
    GreaterBar,
    /// `|`
    Bar,
    /// `||`
    BarBar,
}

impl Operator {
    /// Returns the operator lexeme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use Operator::*;
        match self {
            Newline => "\n",
            And => "&",
            AndAnd => "&&",
            OpenParen => "(",
            CloseParen => ")",
            Semicolon => ";",
            SemicolonSemicolon => ";;",
            Less => "<",
            LessAnd => "<&",
            LessLess => "<<",
            LessLessDash => "<<-",
            LessGreater => "<>",
            Greater => ">",
            GreaterAnd => ">&",
            GreaterGreater => ">>",
            GreaterBar => ">|",
            Bar => "|",
            BarBar => "||",
        }
    }

    /// Whether this operator introduces a redirection.
    ///
    /// An `IO_NUMBER` or `IO_LOCATION` token may immediately precede a
    /// redirection operator.
    #[must_use]
    pub const fn is_redirection(self) -> bool {
        use Operator::*;
        matches!(
            self,
            Less | LessAnd
                | LessLess
                | LessLessDash
                | LessGreater
                | Greater
                | GreaterAnd
                | GreaterGreater
                | GreaterBar
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trie data structure that defines the set of operator tokens
///
/// This struct represents a node of the trie: a sorted array of [`Edge`]s.
#[derive(Clone, Copy, Debug)]
pub struct Trie(&'static [Edge]);

/// Edge of a [`Trie`]
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    /// Character value of this edge
    pub key: char,
    /// Operator delimited after taking this edge if there is no longer match
    pub value: Option<Operator>,
    /// Sub-trie containing operators that have this prefix
    pub next: Trie,
}

impl Trie {
    /// Tests if this trie is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finds an edge for the given key.
    #[must_use]
    pub fn edge(&self, key: char) -> Option<&Edge> {
        self.0
            .binary_search_by_key(&key, |edge| edge.key)
            .ok()
            .map(|i| &self.0[i])
    }
}

const NONE: Trie = Trie(&[]);

/// Trie of the operators that start with `&`.
const AND: Trie = Trie(&[Edge {
    key: '&',
    value: Some(Operator::AndAnd),
    next: NONE,
}]);

/// Trie of the operators that start with `;`.
const SEMICOLON: Trie = Trie(&[Edge {
    key: ';',
    value: Some(Operator::SemicolonSemicolon),
    next: NONE,
}]);

/// Trie of the operators that start with `<<`.
const LESS_LESS: Trie = Trie(&[Edge {
    key: '-',
    value: Some(Operator::LessLessDash),
    next: NONE,
}]);

/// Trie of the operators that start with `<`.
const LESS: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::LessAnd),
        next: NONE,
    },
    Edge {
        key: '<',
        value: Some(Operator::LessLess),
        next: LESS_LESS,
    },
    Edge {
        key: '>',
        value: Some(Operator::LessGreater),
        next: NONE,
    },
]);

/// Trie of the operators that start with `>`.
const GREATER: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::GreaterAnd),
        next: NONE,
    },
    Edge {
        key: '>',
        value: Some(Operator::GreaterGreater),
        next: NONE,
    },
    Edge {
        key: '|',
        value: Some(Operator::GreaterBar),
        next: NONE,
    },
]);

/// Trie of the operators that start with `|`.
const BAR: Trie = Trie(&[Edge {
    key: '|',
    value: Some(Operator::BarBar),
    next: NONE,
}]);

/// Trie containing all the operators
pub const OPERATORS: Trie = Trie(&[
    Edge {
        key: '\n',
        value: Some(Operator::Newline),
        next: NONE,
    },
    Edge {
        key: '&',
        value: Some(Operator::And),
        next: AND,
    },
    Edge {
        key: '(',
        value: Some(Operator::OpenParen),
        next: NONE,
    },
    Edge {
        key: ')',
        value: Some(Operator::CloseParen),
        next: NONE,
    },
    Edge {
        key: ';',
        value: Some(Operator::Semicolon),
        next: SEMICOLON,
    },
    Edge {
        key: '<',
        value: Some(Operator::Less),
        next: LESS,
    },
    Edge {
        key: '>',
        value: Some(Operator::Greater),
        next: GREATER,
    },
    Edge {
        key: '|',
        value: Some(Operator::Bar),
        next: BAR,
    },
]);

/// Tests whether a character can start an operator.
#[must_use]
pub fn starts_operator(c: char) -> bool {
    OPERATORS.edge(c).is_some()
}

impl Lexer {
    /// Scans an operator token and everything it entails.
    ///
    /// A here-document operator additionally consumes its delimiter word; a
    /// newline operator triggers reading of all pending here-document
    /// bodies.
    pub(super) fn operator_token(&mut self) -> Scan<()> {
        let begin = self.here();
        let operator = self.scan_operator()?;
        if operator.is_redirection() {
            self.reclassify_io_prefix(begin);
        }
        let span = Span {
            begin,
            end: self.here(),
        };
        let word = Word::unquoted(operator.as_str(), span);
        let id = TokenId::Operator(operator);

        match operator {
            Operator::Newline => {
                let bodies = self.read_here_doc_bodies()?;
                self.push_token(Token {
                    word,
                    id,
                    here_doc: None,
                });
                for (here_doc, content) in bodies {
                    here_doc
                        .content
                        .set(content)
                        .expect("here-doc content is read only once");
                }
                self.pending_here_docs.clear();
            }
            Operator::LessLess | Operator::LessLessDash => {
                let remove_tabs = operator == Operator::LessLessDash;
                let (here_doc, delimiter) = self.here_doc_delimiter(remove_tabs)?;
                self.push_token(Token {
                    word,
                    id,
                    here_doc: Some(Rc::clone(&here_doc)),
                });
                self.pending_here_docs.push_back(here_doc);
                self.push_token(delimiter);
            }
            _ => self.push_token(Token {
                word,
                id,
                here_doc: None,
            }),
        }
        Ok(())
    }

    /// Scans the longest operator at the cursor.
    fn scan_operator(&mut self) -> Scan<Operator> {
        let mut trie = OPERATORS;
        let mut last = None;
        loop {
            if trie.is_empty() {
                break;
            }
            self.skip_line_continuations()?;
            let Some(c) = self.peek_char() else {
                if self.input_closed() {
                    break;
                }
                // A longer operator may still arrive.
                return Err(Interrupt::Incomplete);
            };
            let Some(edge) = trie.edge(c) else {
                break;
            };
            self.next_char();
            if let Some(operator) = edge.value {
                last = Some((operator, self.checkpoint()));
            }
            trie = edge.next;
        }

        let (operator, checkpoint) =
            last.expect("operator_token must start at an operator character");
        self.restore(checkpoint);
        Ok(operator)
    }
}

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

//! Part of the lexer that parses dollar and backquote expansions
//!
//! A `$` introduces a parameter expansion, a command substitution or an
//! arithmetic expansion depending on the following characters. Command
//! substitutions and arithmetic expansions are captured as raw source text;
//! the content is re-entered through the lexer and parser when the word is
//! expanded.

use super::core::{Interrupt, LexErrorCause, Scan};
use super::word::WordBuilder;
use super::Lexer;
use crate::syntax::{Modifier, Param, ParamId, SpecialParam, WordPart};

impl Lexer {
    /// Parses the expansion after a `$`.
    ///
    /// The `$` itself has been consumed. `quoted` tells whether the
    /// expansion occurs inside double quotes. A `$` that introduces nothing
    /// becomes a literal character.
    pub(super) fn dollar_unit(&mut self, quoted: bool, builder: &mut WordBuilder) -> Scan<()> {
        let Some(c) = self.peek_or_interrupt()? else {
            builder.push_char('$', false, quoted);
            return Ok(());
        };
        match c {
            '{' => {
                self.next_char();
                let part = self.braced_param(quoted)?;
                builder.push_part(part);
            }
            '(' => {
                self.next_char();
                if self.peek_or_interrupt()? == Some('(') {
                    self.next_char();
                    let expression = self.arith_content()?;
                    builder.push_part(WordPart::Arith { expression, quoted });
                } else {
                    let content = self.command_subst_content()?;
                    builder.push_part(WordPart::CommandSubst {
                        content,
                        backquoted: false,
                        quoted,
                    });
                }
            }
            '0' => {
                self.next_char();
                builder.push_part(WordPart::Param {
                    param: Param {
                        id: ParamId::Special(SpecialParam::Zero),
                        modifier: Modifier::None,
                    },
                    quoted,
                });
            }
            '1'..='9' => {
                self.next_char();
                let index = c as usize - '0' as usize;
                builder.push_part(WordPart::Param {
                    param: Param {
                        id: ParamId::Positional(index),
                        modifier: Modifier::None,
                    },
                    quoted,
                });
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let name = self.scan_name()?;
                builder.push_part(WordPart::Param {
                    param: Param::variable(name),
                    quoted,
                });
            }
            c => match SpecialParam::from_char(c) {
                Some(special) => {
                    self.next_char();
                    builder.push_part(WordPart::Param {
                        param: Param {
                            id: ParamId::Special(special),
                            modifier: Modifier::None,
                        },
                        quoted,
                    });
                }
                None => builder.push_char('$', false, quoted),
            },
        }
        Ok(())
    }

    /// Scans a variable name at the cursor.
    pub(super) fn scan_name(&mut self) -> Scan<String> {
        let mut name = String::new();
        loop {
            self.skip_line_continuations()?;
            match self.peek_char() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                    self.next_char();
                    name.push(c);
                }
                Some(_) => return Ok(name),
                None if self.input_closed() => return Ok(name),
                None => return Err(Interrupt::Incomplete),
            }
        }
    }

    /// Captures the content of a `$(...)` command substitution.
    ///
    /// The opening `$(` has been consumed; the closing `)` is consumed but
    /// not included in the result. The scan tracks quoting so that
    /// parentheses inside quotes or behind a backslash do not count towards
    /// nesting; the captured text is re-parsed in full when the substitution
    /// is expanded.
    fn command_subst_content(&mut self) -> Scan<String> {
        let mut content = String::new();
        let mut depth: u32 = 0;
        let mut single = false;
        let mut double = false;
        loop {
            let Some(c) = self.peek_or_interrupt()? else {
                return Err(self.error_here(LexErrorCause::UnclosedCommandSubst));
            };
            if single {
                self.next_char();
                content.push(c);
                if c == '\'' {
                    single = false;
                }
                continue;
            }
            match c {
                '\\' => {
                    self.next_char();
                    content.push('\\');
                    match self.peek_or_interrupt()? {
                        None => return Err(self.error_here(LexErrorCause::UnclosedCommandSubst)),
                        Some(d) => {
                            self.next_char();
                            content.push(d);
                        }
                    }
                }
                '\'' if !double => {
                    self.next_char();
                    content.push(c);
                    single = true;
                }
                '"' => {
                    self.next_char();
                    content.push(c);
                    double = !double;
                }
                '(' if !double => {
                    self.next_char();
                    content.push(c);
                    depth += 1;
                }
                ')' if !double => {
                    self.next_char();
                    if depth == 0 {
                        return Ok(content);
                    }
                    content.push(c);
                    depth -= 1;
                }
                _ => {
                    self.next_char();
                    content.push(c);
                }
            }
        }
    }

    /// Captures the expression of a `$((...))` arithmetic expansion.
    ///
    /// The opening `$((` has been consumed; the closing `))` is consumed
    /// but not included in the result. Parentheses inside the expression
    /// must be balanced.
    fn arith_content(&mut self) -> Scan<String> {
        let mut content = String::new();
        let mut depth: u32 = 0;
        loop {
            self.skip_line_continuations()?;
            if depth == 0 && self.remaining().starts_with("))") {
                self.next_char();
                self.next_char();
                return Ok(content);
            }
            if depth == 0 && self.remaining() == ")" && !self.input_closed() {
                // The second `)` may yet arrive.
                return Err(Interrupt::Incomplete);
            }
            match self.peek_or_interrupt()? {
                None => return Err(self.error_here(LexErrorCause::UnclosedArith)),
                Some('(') => {
                    self.next_char();
                    depth += 1;
                    content.push('(');
                }
                Some(')') => {
                    if depth == 0 {
                        return Err(self.error_here(LexErrorCause::UnbalancedArith));
                    }
                    self.next_char();
                    depth -= 1;
                    content.push(')');
                }
                Some(c) => {
                    self.next_char();
                    content.push(c);
                }
            }
        }
    }

    /// Captures the content of a backquoted command substitution.
    ///
    /// The opening backquote has been consumed. Within backquotes, a
    /// backslash escapes `$`, `` ` `` and `\`; the escape is resolved here
    /// so the captured content can be re-parsed like a `$(...)` body.
    pub(super) fn backquote(&mut self, quoted: bool, builder: &mut WordBuilder) -> Scan<()> {
        let mut content = String::new();
        loop {
            let Some(c) = self.peek_or_interrupt()? else {
                return Err(self.error_here(LexErrorCause::UnclosedBackquote));
            };
            match c {
                '`' => {
                    self.next_char();
                    break;
                }
                '\\' => {
                    let mut chars = self.remaining().chars();
                    chars.next();
                    match chars.next() {
                        None if !self.input_closed() => return Err(Interrupt::Incomplete),
                        Some(d @ ('$' | '`' | '\\')) => {
                            self.next_char();
                            self.next_char();
                            content.push(d);
                        }
                        _ => {
                            self.next_char();
                            content.push('\\');
                        }
                    }
                }
                _ => {
                    self.next_char();
                    content.push(c);
                }
            }
        }
        builder.push_part(WordPart::CommandSubst {
            content,
            backquoted: true,
            quoted,
        });
        Ok(())
    }
}

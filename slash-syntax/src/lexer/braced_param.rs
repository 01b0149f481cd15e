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

//! Part of the lexer that parses braced parameter expansions
//!
//! The supported forms are `${param}`, the length form `${#param}`, the
//! switches `${param:-word}` / `${param-word}` (and the `=`, `?`, `+`
//! variants), and the pattern trims `${param#word}`, `${param##word}`,
//! `${param%word}` and `${param%%word}`.

use super::core::{Interrupt, LexErrorCause, Scan};
use super::word::WordMode;
use super::Lexer;
use crate::syntax::{
    Modifier, Param, ParamId, SpecialParam, Switch, SwitchCondition, SwitchType, Trim, TrimLength,
    TrimSide, WordPart,
};

/// Converts a character to the switch type it names.
fn switch_type(c: char) -> Option<SwitchType> {
    match c {
        '+' => Some(SwitchType::Alter),
        '-' => Some(SwitchType::Default),
        '=' => Some(SwitchType::Assign),
        '?' => Some(SwitchType::Error),
        _ => None,
    }
}

impl Lexer {
    /// Parses a braced parameter expansion.
    ///
    /// The opening `${` has been consumed; the closing `}` is consumed on
    /// success.
    pub(super) fn braced_param(&mut self, quoted: bool) -> Scan<WordPart> {
        self.skip_line_continuations()?;
        let Some(c) = self.peek_or_interrupt()? else {
            return Err(self.error_here(LexErrorCause::UnclosedParam));
        };

        // A `#` may be the length modifier, the special parameter itself,
        // or the special parameter with a modifier. Try the length form
        // first and fall back on failure.
        if c == '#' {
            let checkpoint = self.checkpoint();
            self.next_char();
            match self.braced_param_id() {
                Ok(id) => {
                    if self.peek_or_interrupt()? == Some('}') {
                        self.next_char();
                        let param = Param {
                            id,
                            modifier: Modifier::Length,
                        };
                        return Ok(WordPart::Param { param, quoted });
                    }
                }
                Err(Interrupt::Incomplete) => return Err(Interrupt::Incomplete),
                Err(Interrupt::Error(_)) => {}
            }
            self.restore(checkpoint);
        }

        let id = self.braced_param_id()?;
        let modifier = self.braced_param_modifier()?;

        match self.peek_or_interrupt()? {
            Some('}') => {
                self.next_char();
            }
            Some(_) => return Err(self.error_here(LexErrorCause::InvalidParam)),
            None => return Err(self.error_here(LexErrorCause::UnclosedParam)),
        }

        let param = Param { id, modifier };
        Ok(WordPart::Param { param, quoted })
    }

    /// Parses the parameter identifier inside braces.
    fn braced_param_id(&mut self) -> Scan<ParamId> {
        let Some(c) = self.peek_or_interrupt()? else {
            return Err(self.error_here(LexErrorCause::UnclosedParam));
        };
        if c.is_ascii_alphabetic() || c == '_' {
            let name = self.scan_name()?;
            return Ok(ParamId::Variable(name));
        }
        if c.is_ascii_digit() {
            let mut digits = String::new();
            loop {
                self.skip_line_continuations()?;
                match self.peek_or_interrupt()? {
                    Some(c) if c.is_ascii_digit() => {
                        self.next_char();
                        digits.push(c);
                    }
                    _ => break,
                }
            }
            return Ok(if digits == "0" {
                ParamId::Special(SpecialParam::Zero)
            } else {
                // An index too large for usize can never name a parameter.
                ParamId::Positional(digits.parse().unwrap_or(usize::MAX))
            });
        }
        match SpecialParam::from_char(c) {
            Some(special) => {
                self.next_char();
                Ok(ParamId::Special(special))
            }
            None => Err(self.error_here(LexErrorCause::InvalidParam)),
        }
    }

    /// Parses the modifier following the parameter identifier, if any.
    ///
    /// The cursor is left on the closing `}` on success.
    fn braced_param_modifier(&mut self) -> Scan<Modifier> {
        self.skip_line_continuations()?;
        let Some(c) = self.peek_or_interrupt()? else {
            return Err(self.error_here(LexErrorCause::UnclosedParam));
        };
        match c {
            '}' => Ok(Modifier::None),
            ':' => {
                self.next_char();
                let Some(c) = self.peek_or_interrupt()? else {
                    return Err(self.error_here(LexErrorCause::UnclosedParam));
                };
                let Some(r#type) = switch_type(c) else {
                    return Err(self.error_here(LexErrorCause::InvalidParam));
                };
                self.next_char();
                let word = self.scan_word(WordMode::BracedParamWord)?;
                Ok(Modifier::Switch(Switch {
                    r#type,
                    condition: SwitchCondition::UnsetOrEmpty,
                    word,
                }))
            }
            '#' | '%' => {
                self.next_char();
                let side = if c == '#' {
                    TrimSide::Prefix
                } else {
                    TrimSide::Suffix
                };
                let length = if self.peek_or_interrupt()? == Some(c) {
                    self.next_char();
                    TrimLength::Longest
                } else {
                    TrimLength::Shortest
                };
                let pattern = self.scan_word(WordMode::BracedParamWord)?;
                Ok(Modifier::Trim(Trim {
                    side,
                    length,
                    pattern,
                }))
            }
            c => match switch_type(c) {
                Some(r#type) => {
                    self.next_char();
                    let word = self.scan_word(WordMode::BracedParamWord)?;
                    Ok(Modifier::Switch(Switch {
                        r#type,
                        condition: SwitchCondition::Unset,
                        word,
                    }))
                }
                None => Err(self.error_here(LexErrorCause::InvalidParam)),
            },
        }
    }
}

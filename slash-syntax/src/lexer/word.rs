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

//! Part of the lexer that assembles words out of parts
//!
//! A word is scanned character by character. Literal runs accumulate in a
//! [`WordBuilder`], which fuses adjacent characters with identical quote
//! flags into one [literal part](WordPart::Literal) and interleaves
//! expansion parts produced by the `$`, backquote and quote scanners.

use super::core::{is_blank, Interrupt, LexErrorCause, Scan, Token};
use super::Lexer;
use crate::source::Span;
use crate::syntax::{Word, WordPart};

/// Context a word is scanned in
///
/// The context determines which characters delimit the word and whether a
/// leading tilde is split off.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum WordMode {
    /// Ordinary token: delimited by blanks, operators and newlines.
    Normal,
    /// Here-document delimiter: delimited like a normal word, but without
    /// tilde recognition.
    HereDocDelimiter,
    /// Word inside `${...}`: extends to the matching `}`; blanks, newlines
    /// and operator characters are ordinary word characters.
    BracedParamWord,
}

/// Accumulator for the parts of one word
#[derive(Debug, Default)]
pub(super) struct WordBuilder {
    parts: Vec<WordPart>,
    run: String,
    single: bool,
    double: bool,
    run_open: bool,
}

impl WordBuilder {
    pub(super) fn new() -> WordBuilder {
        WordBuilder::default()
    }

    /// Starts a literal run with the given quote flags.
    ///
    /// Starting a run makes sure a literal part is emitted even if no
    /// character follows, which is how an empty quotation `''` or `""`
    /// leaves its mark on the word.
    pub(super) fn begin_run(&mut self, single: bool, double: bool) {
        if self.run_open && self.single == single && self.double == double {
            return;
        }
        self.flush();
        self.single = single;
        self.double = double;
        self.run_open = true;
    }

    /// Appends one literal character with the given quote flags.
    pub(super) fn push_char(&mut self, c: char, single: bool, double: bool) {
        self.begin_run(single, double);
        self.run.push(c);
    }

    /// Appends a non-literal part.
    pub(super) fn push_part(&mut self, part: WordPart) {
        self.flush();
        self.parts.push(part);
    }

    fn flush(&mut self) {
        if self.run_open && (!self.run.is_empty() || self.single || self.double) {
            self.parts.push(WordPart::Literal {
                value: std::mem::take(&mut self.run),
                single_quoted: self.single,
                double_quoted: self.double,
            });
        }
        self.run.clear();
        self.run_open = false;
    }

    /// Finishes the word.
    pub(super) fn into_word(mut self, span: Span) -> Word {
        self.flush();
        Word {
            parts: self.parts,
            span,
        }
    }
}

impl Lexer {
    /// Scans one ordinary word token.
    pub(super) fn word_token(&mut self) -> Scan<Token> {
        let word = self.scan_word(WordMode::Normal)?;
        Ok(self.finalize_word_token(word))
    }

    /// Scans a word in the given context.
    ///
    /// The cursor is left on the delimiting character, which is not part of
    /// the word.
    pub(super) fn scan_word(&mut self, mode: WordMode) -> Scan<Word> {
        let begin = self.here();
        let mut builder = WordBuilder::new();
        loop {
            self.skip_line_continuations()?;
            let Some(c) = self.peek_or_interrupt()? else {
                break;
            };
            match mode {
                WordMode::Normal | WordMode::HereDocDelimiter => {
                    if is_blank(c) || super::op::starts_operator(c) {
                        break;
                    }
                }
                WordMode::BracedParamWord => {
                    if c == '}' {
                        break;
                    }
                }
            }
            match c {
                '\\' => {
                    self.next_char();
                    match self.peek_or_interrupt()? {
                        // A backslash at the end of input stays literal.
                        None => builder.push_char('\\', false, false),
                        Some(d) => {
                            self.next_char();
                            builder.push_char(d, true, false);
                        }
                    }
                }
                '\'' => self.single_quote(&mut builder)?,
                '"' => self.double_quote(&mut builder)?,
                '$' => {
                    self.next_char();
                    self.dollar_unit(false, &mut builder)?;
                }
                '`' => {
                    self.next_char();
                    self.backquote(false, &mut builder)?;
                }
                _ => {
                    self.next_char();
                    builder.push_char(c, false, false);
                }
            }
        }

        let span = Span {
            begin,
            end: self.here(),
        };
        let mut word = builder.into_word(span);
        if mode != WordMode::HereDocDelimiter {
            word.parse_tilde_front();
        }
        Ok(word)
    }

    /// Scans a single-quoted string, including both quotes.
    fn single_quote(&mut self, builder: &mut WordBuilder) -> Scan<()> {
        self.next_char();
        builder.begin_run(true, false);
        loop {
            match self.peek_char() {
                Some('\'') => {
                    self.next_char();
                    return Ok(());
                }
                Some(c) => {
                    self.next_char();
                    builder.push_char(c, true, false);
                }
                None if self.input_closed() => {
                    return Err(self.error_here(LexErrorCause::UnclosedSingleQuote))
                }
                None => return Err(Interrupt::Incomplete),
            }
        }
    }

    /// Scans a double-quoted string, including both quotes.
    fn double_quote(&mut self, builder: &mut WordBuilder) -> Scan<()> {
        self.next_char();
        builder.begin_run(false, true);
        loop {
            let Some(c) = self.peek_or_interrupt()? else {
                return Err(self.error_here(LexErrorCause::UnclosedDoubleQuote));
            };
            match c {
                '"' => {
                    self.next_char();
                    return Ok(());
                }
                '\\' => {
                    let mut chars = self.remaining().chars();
                    chars.next();
                    match chars.next() {
                        None if !self.input_closed() => return Err(Interrupt::Incomplete),
                        Some('\n') => {
                            // Line continuation
                            self.next_char();
                            self.next_char();
                        }
                        Some(d @ ('$' | '`' | '"' | '\\')) => {
                            self.next_char();
                            self.next_char();
                            builder.push_char(d, false, true);
                        }
                        // Before any other character the backslash stays.
                        _ => {
                            self.next_char();
                            builder.push_char('\\', false, true);
                        }
                    }
                }
                '$' => {
                    self.next_char();
                    self.dollar_unit(true, builder)?;
                }
                '`' => {
                    self.next_char();
                    self.backquote(true, builder)?;
                }
                _ => {
                    self.next_char();
                    builder.push_char(c, false, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::core::{Lexer, TokenizeResult};
    use crate::syntax::{Modifier, Param, ParamId, SpecialParam, WordPart};
    use assert_matches::assert_matches;

    fn word_parts(source: &str) -> Vec<WordPart> {
        let mut lexer = Lexer::with_source(source);
        assert_eq!(lexer.tokenize().unwrap(), TokenizeResult::Complete);
        lexer.pop_first_token().unwrap().word.parts
    }

    #[test]
    fn adjacent_literals_fuse() {
        let parts = word_parts("a'b'c");
        assert_eq!(
            parts,
            [
                WordPart::unquoted("a"),
                WordPart::single_quoted("b"),
                WordPart::unquoted("c"),
            ]
        );

        let parts = word_parts("'a''b'");
        assert_eq!(parts, [WordPart::single_quoted("ab")]);
    }

    #[test]
    fn empty_quotes_leave_a_part() {
        let parts = word_parts("''");
        assert_eq!(parts, [WordPart::single_quoted("")]);

        let parts = word_parts("\"\"");
        assert_eq!(parts, [WordPart::double_quoted("")]);
    }

    #[test]
    fn backslash_escapes_any_character() {
        let parts = word_parts("a\\$b");
        assert_eq!(
            parts,
            [
                WordPart::unquoted("a"),
                WordPart::single_quoted("$"),
                WordPart::unquoted("b"),
            ]
        );
    }

    #[test]
    fn double_quote_escapes() {
        // Within double quotes, backslash escapes only $ ` " and \.
        let parts = word_parts(r#""\$\a""#);
        assert_eq!(parts, [WordPart::double_quoted("$\\a")]);
    }

    #[test]
    fn dollar_in_double_quotes_expands() {
        let parts = word_parts("\"$x\"");
        assert_matches!(&parts[..], [WordPart::Param { param, quoted: true }] => {
            assert_eq!(param.id, ParamId::Variable("x".to_string()));
        });
    }

    #[test]
    fn dollar_in_single_quotes_is_literal() {
        let parts = word_parts("'$x'");
        assert_eq!(parts, [WordPart::single_quoted("$x")]);
    }

    #[test]
    fn raw_parameters() {
        let parts = word_parts("$foo/$2$?");
        assert_matches!(&parts[..], [
            WordPart::Param { param: p1, quoted: false },
            WordPart::Literal { value, .. },
            WordPart::Param { param: p2, .. },
            WordPart::Param { param: p3, .. },
        ] => {
            assert_eq!(p1.id, ParamId::Variable("foo".to_string()));
            assert_eq!(value, "/");
            assert_eq!(p2.id, ParamId::Positional(2));
            assert_eq!(p3.id, ParamId::Special(SpecialParam::Question));
        });
    }

    #[test]
    fn multi_digit_positional_needs_braces() {
        // `$10` is the first positional parameter followed by a literal 0.
        let parts = word_parts("$10");
        assert_matches!(&parts[..], [
            WordPart::Param { param, .. },
            WordPart::Literal { value, .. },
        ] => {
            assert_eq!(*param, Param { id: ParamId::Positional(1), modifier: Modifier::None });
            assert_eq!(value, "0");
        });

        let parts = word_parts("${10}");
        assert_matches!(&parts[..], [WordPart::Param { param, .. }] => {
            assert_eq!(param.id, ParamId::Positional(10));
        });
    }

    #[test]
    fn lone_dollar_is_literal() {
        let parts = word_parts("$%");
        assert_eq!(parts, [WordPart::unquoted("$%")]);
    }

    #[test]
    fn command_substitution() {
        let parts = word_parts("$(echo hi)");
        assert_eq!(
            parts,
            [WordPart::CommandSubst {
                content: "echo hi".to_string(),
                backquoted: false,
                quoted: false,
            }]
        );
    }

    #[test]
    fn command_substitution_nests() {
        let parts = word_parts("$(echo $(pwd))");
        assert_eq!(
            parts,
            [WordPart::CommandSubst {
                content: "echo $(pwd)".to_string(),
                backquoted: false,
                quoted: false,
            }]
        );
    }

    #[test]
    fn command_substitution_with_quoted_paren() {
        let parts = word_parts("$(echo ')')");
        assert_eq!(
            parts,
            [WordPart::CommandSubst {
                content: "echo ')'".to_string(),
                backquoted: false,
                quoted: false,
            }]
        );
    }

    #[test]
    fn backquote_substitution() {
        let parts = word_parts("`echo \\`date\\``");
        assert_eq!(
            parts,
            [WordPart::CommandSubst {
                content: "echo `date`".to_string(),
                backquoted: true,
                quoted: false,
            }]
        );
    }

    #[test]
    fn arithmetic_expansion() {
        let parts = word_parts("$((1 + (2 * 3)))");
        assert_eq!(
            parts,
            [WordPart::Arith {
                expression: "1 + (2 * 3)".to_string(),
                quoted: false,
            }]
        );
    }

    #[test]
    fn tilde_word() {
        let parts = word_parts("~fred/bin");
        assert_eq!(
            parts,
            [
                WordPart::Tilde("fred".to_string()),
                WordPart::unquoted("/bin"),
            ]
        );
    }
}

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

//! POSIX pattern matching for the shell
//!
//! This crate implements matching of shell globbing patterns, used for
//! pathname expansion, `case` branch selection and the pattern-removal
//! parameter expansions. Supported syntax:
//!
//! - Any single character (`?`)
//! - Any character sequence (`*`)
//! - Bracket expressions (`[...]`) with ranges (`a-z`), complement
//!   (`[!...]`) and character classes (`[:alpha:]`)
//!
//! Matching works by translating the pattern to a [`regex::Regex`]
//! anchored at both ends. Input characters are [`PatternChar`]s so quoted
//! characters never act as pattern syntax; see [`without_escape`] and
//! [`with_escape`] for plain-string entry points.

use regex::Regex;
use std::fmt::Write;
use thiserror::Error;

mod char_iter;

pub use char_iter::{with_escape, without_escape, PatternChar};

/// Error in pattern compilation
#[derive(Clone, Debug, Error)]
#[error("invalid pattern: {0}")]
pub struct Error(#[from] regex::Error);

/// Whether a match should be as short or as long as possible
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchLength {
    Shortest,
    Longest,
}

/// Names accepted in a `[:class:]` bracket item
const CLASS_NAMES: &[&str] = &[
    "alnum", "alpha", "blank", "cntrl", "digit", "graph", "lower", "print", "punct", "space",
    "upper", "xdigit",
];

/// Compiled pattern
#[derive(Clone, Debug)]
pub struct Pattern {
    body: Body,
}

#[derive(Clone, Debug)]
enum Body {
    /// A pattern with no special characters, compared directly
    Literal(String),
    /// A translated pattern, anchored at both ends
    Regex(Regex),
}

impl Pattern {
    /// Compiles a pattern from pattern characters.
    pub fn parse<I>(pattern: I) -> Result<Pattern, Error>
    where
        I: IntoIterator<Item = PatternChar>,
    {
        let chars: Vec<PatternChar> = pattern.into_iter().collect();
        let body = match translate(&chars) {
            None => Body::Literal(chars.iter().map(|c| c.char_value()).collect()),
            Some(regex) => Body::Regex(Regex::new(&format!(r"\A(?s:{regex})\z"))?),
        };
        Ok(Pattern { body })
    }

    /// Returns the pattern as a literal string if it has no special
    /// characters.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match &self.body {
            Body::Literal(literal) => Some(literal),
            Body::Regex(_) => None,
        }
    }

    /// Tests whether the pattern matches the whole of the given text.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match &self.body {
            Body::Literal(literal) => literal == text,
            Body::Regex(regex) => regex.is_match(text),
        }
    }

    /// Returns the length of the matching prefix of the text.
    ///
    /// This drives the `${name#pattern}` and `${name##pattern}`
    /// expansions. `None` means no prefix (not even the empty one)
    /// matches.
    #[must_use]
    pub fn prefix_match_length(&self, text: &str, length: MatchLength) -> Option<usize> {
        let boundaries = (0..=text.len()).filter(|&i| text.is_char_boundary(i));
        match length {
            MatchLength::Shortest => {
                for i in boundaries {
                    if self.is_match(&text[..i]) {
                        return Some(i);
                    }
                }
            }
            MatchLength::Longest => {
                for i in boundaries.collect::<Vec<_>>().into_iter().rev() {
                    if self.is_match(&text[..i]) {
                        return Some(i);
                    }
                }
            }
        }
        None
    }

    /// Returns the start index of the matching suffix of the text.
    ///
    /// This drives the `${name%pattern}` and `${name%%pattern}`
    /// expansions. The shortest suffix corresponds to the largest start
    /// index.
    #[must_use]
    pub fn suffix_match_start(&self, text: &str, length: MatchLength) -> Option<usize> {
        let boundaries = (0..=text.len()).filter(|&i| text.is_char_boundary(i));
        match length {
            MatchLength::Shortest => {
                for i in boundaries.collect::<Vec<_>>().into_iter().rev() {
                    if self.is_match(&text[i..]) {
                        return Some(i);
                    }
                }
            }
            MatchLength::Longest => {
                for i in boundaries {
                    if self.is_match(&text[i..]) {
                        return Some(i);
                    }
                }
            }
        }
        None
    }
}

/// Translates a pattern to regex source.
///
/// Returns `None` if the pattern contains no special characters, in which
/// case literal comparison is used instead.
fn translate(chars: &[PatternChar]) -> Option<String> {
    let mut regex = String::new();
    let mut special = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            PatternChar::Normal('?') => {
                regex.push('.');
                special = true;
                i += 1;
            }
            PatternChar::Normal('*') => {
                regex.push_str(".*");
                special = true;
                i += 1;
            }
            PatternChar::Normal('[') => match translate_bracket(chars, i) {
                Some((class, end)) => {
                    regex.push_str(&class);
                    special = true;
                    i = end;
                }
                // An unmatched `[` matches itself.
                None => {
                    regex.push_str(r"\[");
                    i += 1;
                }
            },
            PatternChar::Normal(c) | PatternChar::Literal(c) => {
                push_escaped(&mut regex, c);
                i += 1;
            }
        }
    }
    special.then_some(regex)
}

/// Translates a bracket expression starting at `chars[start]`.
///
/// Returns the regex character class and the index just past the closing
/// `]`, or `None` if the bracket expression is not terminated.
fn translate_bracket(chars: &[PatternChar], start: usize) -> Option<(String, usize)> {
    let mut i = start + 1;
    let mut items = String::new();

    let negated = match chars.get(i) {
        Some(PatternChar::Normal('!' | '^')) => {
            i += 1;
            true
        }
        _ => false,
    };

    let mut first = true;
    loop {
        match chars.get(i)? {
            PatternChar::Normal(']') if !first => break,
            PatternChar::Normal('[')
                if matches!(chars.get(i + 1), Some(PatternChar::Normal(':'))) =>
            {
                let name_start = i + 2;
                let mut j = name_start;
                while let Some(PatternChar::Normal(c)) = chars.get(j) {
                    if !c.is_ascii_lowercase() {
                        break;
                    }
                    j += 1;
                }
                let name: String = chars[name_start..j]
                    .iter()
                    .map(|c| c.char_value())
                    .collect();
                if matches!(chars.get(j), Some(PatternChar::Normal(':')))
                    && matches!(chars.get(j + 1), Some(PatternChar::Normal(']')))
                    && CLASS_NAMES.contains(&name.as_str())
                {
                    write!(items, "[:{name}:]").ok()?;
                    i = j + 2;
                } else {
                    class_escape(&mut items, '[');
                    i += 1;
                }
            }
            &c => {
                // Range item?
                if matches!(chars.get(i + 1), Some(PatternChar::Normal('-')))
                    && !matches!(chars.get(i + 2), None | Some(PatternChar::Normal(']')))
                {
                    let end = chars[i + 2];
                    class_escape(&mut items, c.char_value());
                    items.push('-');
                    class_escape(&mut items, end.char_value());
                    i += 3;
                } else {
                    class_escape(&mut items, c.char_value());
                    i += 1;
                }
            }
        }
        first = false;
    }

    let negation = if negated { "^" } else { "" };
    Some((format!("[{negation}{items}]"), i + 1))
}

/// Appends a character to regex source, escaped if necessary.
fn push_escaped(regex: &mut String, c: char) {
    if regex_syntax::is_meta_character(c) {
        regex.push('\\');
    }
    regex.push(c);
}

/// Appends a character to a regex character class, escaped if necessary.
fn class_escape(items: &mut String, c: char) {
    if matches!(c, '\\' | ']' | '^' | '-' | '[' | '&' | '~') {
        items.push('\\');
    }
    items.push(c);
}

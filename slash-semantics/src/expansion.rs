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

//! Word expansion
//!
//! Expansion turns a [`Word`] into fields. The stages run in the POSIX
//! order:
//!
//! 1. The initial expansion ([`initial`]) walks the word parts and
//!    produces [attributed characters](attr): tilde expansion, parameter
//!    expansion, command substitution and arithmetic expansion happen
//!    here.
//! 2. [Field splitting](split) divides the result at `$IFS` characters
//!    that came from unquoted expansions.
//! 3. [Pathname expansion](glob) matches fields with unquoted pattern
//!    characters against the file system (disabled by `set -f`).
//! 4. [Quote removal](quote_removal) strips the quotation marks and
//!    yields the final strings.
//!
//! Contexts that take exactly one field (assignment values, redirection
//! targets, `case` subjects) use [`expand_word_single`], which skips
//! splitting and globbing.

pub mod attr;
pub mod glob;
pub mod initial;
pub mod param;
pub mod quote_removal;
pub mod split;

use self::attr::{AttrChar, FieldsBuilder, Origin};
use slash_env::option::ShellOption;
use slash_env::semantics::Field;
use slash_env::system::Errno;
use slash_env::variable::AssignError;
use slash_env::Env;
use slash_fnmatch::Pattern;
use slash_syntax::source::Span;
use slash_syntax::syntax::Word;
use thiserror::Error;

/// Cause of an expansion error
#[derive(Clone, Debug, Error)]
pub enum ErrorCause {
    /// An unset parameter was expanded under `set -u`.
    #[error("{name}: parameter not set")]
    UnsetParameter { name: String },
    /// A `${name:?...}` expansion failed.
    #[error("{name}: {message}")]
    EmptyExpansion { name: String, message: String },
    /// `${name=...}` applied to something that is not a variable
    #[error("{name}: cannot assign in this way")]
    NotAssignable { name: String },
    /// Error in an arithmetic expansion
    #[error("arithmetic expansion: {message}")]
    Arith { message: String },
    /// System failure performing a command substitution
    #[error("cannot perform command substitution: {0}")]
    CommandSubst(Errno),
    /// Assignment to a read-only variable
    #[error(transparent)]
    AssignVariable(#[from] AssignError),
    /// A pattern that does not compile
    #[error("invalid pattern: {message}")]
    InvalidPattern { message: String },
}

/// Expansion error with the position of the originating word
#[derive(Clone, Debug, Error)]
#[error("{cause}")]
pub struct Error {
    pub cause: ErrorCause,
    pub span: Span,
}

/// Result of word expansion
pub type Result<T> = std::result::Result<T, Error>;

/// Expands a word to fields: the full pipeline including field splitting
/// and pathname expansion.
pub fn expand_word(env: &mut Env, word: &Word) -> Result<Vec<Field>> {
    let mut builder = FieldsBuilder::new();
    initial::expand_parts(env, &word.parts, initial::PartContext::WORD, word.span, &mut builder)?;
    let pre_fields = builder.into_fields();

    let ifs = env
        .variables
        .value("IFS")
        .unwrap_or(split::DEFAULT_IFS)
        .to_string();
    let mut char_fields = Vec::new();
    for pre_field in pre_fields {
        char_fields.extend(split::split(pre_field, &ifs));
    }

    let globbing = !env.options.is_on(ShellOption::NoGlob);
    let mut fields = Vec::new();
    for chars in char_fields {
        match globbing.then(|| glob::glob_field(&chars)).flatten() {
            Some(paths) => fields.extend(paths.into_iter().map(|value| Field {
                value,
                origin: word.span,
            })),
            None => fields.push(quote_removal::remove_quotes(&chars, word.span)),
        }
    }
    Ok(fields)
}

/// Expands each word in order, concatenating the resulting fields.
pub fn expand_words(env: &mut Env, words: &[Word]) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    for word in words {
        fields.extend(expand_word(env, word)?);
    }
    Ok(fields)
}

/// Expands a word to exactly one field.
///
/// Field splitting and pathname expansion do not apply. If the word
/// contains `$@`, the would-be fields are joined with single spaces.
pub fn expand_word_single(env: &mut Env, word: &Word) -> Result<Field> {
    let chars = expand_single_chars(env, word)?;
    Ok(quote_removal::remove_quotes(&chars, word.span))
}

/// Expands a word to a plain string (single field, quote removal).
pub fn expand_text(env: &mut Env, word: &Word) -> Result<String> {
    Ok(expand_word_single(env, word)?.value)
}

/// Expands a word to a matching pattern.
///
/// Quoted characters in the word match only themselves in the resulting
/// pattern.
pub fn expand_pattern(env: &mut Env, word: &Word) -> Result<Pattern> {
    let chars = expand_single_chars(env, word)?;
    let pattern_chars = chars
        .iter()
        .filter(|c| !c.is_quoting)
        .map(|c| c.to_pattern_char());
    Pattern::parse(pattern_chars).map_err(|e| Error {
        cause: ErrorCause::InvalidPattern {
            message: e.to_string(),
        },
        span: word.span,
    })
}

/// Runs the initial expansion and joins any field breaks with spaces.
fn expand_single_chars(env: &mut Env, word: &Word) -> Result<Vec<AttrChar>> {
    let mut builder = FieldsBuilder::new();
    initial::expand_parts(env, &word.parts, initial::PartContext::WORD, word.span, &mut builder)?;
    let mut fields = builder.into_fields().into_iter();
    let mut chars = fields.next().unwrap_or_default();
    for field in fields {
        chars.push(AttrChar {
            value: ' ',
            origin: Origin::SoftExpansion,
            is_quoted: true,
            is_quoting: false,
        });
        chars.extend(field);
    }
    Ok(chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slash_syntax::syntax::{Modifier, Param, ParamId, WordPart};

    fn env_with(vars: &[(&str, &str)]) -> Env {
        let mut env = Env::new("slash");
        for (name, value) in vars {
            env.variables.assign(name, *value).unwrap();
        }
        env
    }

    fn word_of(parts: Vec<WordPart>) -> Word {
        Word {
            parts,
            span: Span::dummy(),
        }
    }

    fn param_part(name: &str, quoted: bool) -> WordPart {
        WordPart::Param {
            param: Param {
                id: ParamId::Variable(name.to_string()),
                modifier: Modifier::None,
            },
            quoted,
        }
    }

    #[test]
    fn single_quoted_literal_expands_to_itself() {
        // A word whose parts are all quoted literals yields exactly one
        // field with the literal bytes.
        let mut env = env_with(&[]);
        let word = word_of(vec![WordPart::single_quoted("hello world")]);
        let fields = expand_word(&mut env, &word).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value, "hello world");
    }

    #[test]
    fn unquoted_variable_is_split() {
        let mut env = env_with(&[("x", "a b  c")]);
        let word = word_of(vec![param_part("x", false)]);
        let fields = expand_word(&mut env, &word).unwrap();
        let values: Vec<_> = fields.iter().map(|f| &f.value).collect();
        assert_eq!(values, ["a", "b", "c"]);
    }

    #[test]
    fn quoted_variable_is_not_split() {
        let mut env = env_with(&[("x", "a b")]);
        let word = word_of(vec![param_part("x", true)]);
        let fields = expand_word(&mut env, &word).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value, "a b");
    }

    #[test]
    fn unset_variable_expands_to_no_field() {
        let mut env = env_with(&[]);
        let word = word_of(vec![param_part("nope", false)]);
        let fields = expand_word(&mut env, &word).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn quoted_unset_variable_expands_to_one_empty_field() {
        let mut env = env_with(&[]);
        let word = word_of(vec![param_part("nope", true)]);
        let fields = expand_word(&mut env, &word).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value, "");
    }

    #[test]
    fn literal_glues_split_fields() {
        let mut env = env_with(&[("x", "1 2")]);
        let word = word_of(vec![WordPart::unquoted("pre"), param_part("x", false)]);
        let fields = expand_word(&mut env, &word).unwrap();
        let values: Vec<_> = fields.iter().map(|f| &f.value).collect();
        assert_eq!(values, ["pre1", "2"]);
    }

    #[test]
    fn custom_ifs() {
        let mut env = env_with(&[("x", "a:b"), ("IFS", ":")]);
        let word = word_of(vec![param_part("x", false)]);
        let fields = expand_word(&mut env, &word).unwrap();
        let values: Vec<_> = fields.iter().map(|f| &f.value).collect();
        assert_eq!(values, ["a", "b"]);
    }

    #[test]
    fn arithmetic_expansion() {
        let mut env = env_with(&[("x", "1"), ("y", "2")]);
        let word = word_of(vec![WordPart::Arith {
            expression: "x+y".to_string(),
            quoted: false,
        }]);
        let fields = expand_word(&mut env, &word).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value, "3");
    }

    #[test]
    fn arithmetic_error_is_reported() {
        let mut env = env_with(&[]);
        let word = word_of(vec![WordPart::Arith {
            expression: "1/0".to_string(),
            quoted: false,
        }]);
        let error = expand_word(&mut env, &word).unwrap_err();
        assert_matches::assert_matches!(error.cause, ErrorCause::Arith { .. });
    }

    #[test]
    fn nounset_rejects_unset_parameters() {
        let mut env = env_with(&[]);
        env.options.set_to(ShellOption::NoUnset, true);
        let word = word_of(vec![param_part("nope", false)]);
        let error = expand_word(&mut env, &word).unwrap_err();
        assert_matches::assert_matches!(error.cause, ErrorCause::UnsetParameter { name } => {
            assert_eq!(name, "nope");
        });
    }

    #[test]
    fn positional_parameters_at_quoted() {
        let mut env = env_with(&[]);
        env.positional_params = vec!["a b".to_string(), "".to_string(), "c".to_string()];
        let word = word_of(vec![WordPart::Param {
            param: Param {
                id: ParamId::Special(slash_syntax::syntax::SpecialParam::At),
                modifier: Modifier::None,
            },
            quoted: true,
        }]);
        let fields = expand_word(&mut env, &word).unwrap();
        let values: Vec<_> = fields.iter().map(|f| &f.value).collect();
        assert_eq!(values, ["a b", "", "c"]);
    }

    #[test]
    fn at_with_no_parameters_yields_no_field() {
        let mut env = env_with(&[]);
        let word = word_of(vec![WordPart::Param {
            param: Param {
                id: ParamId::Special(slash_syntax::syntax::SpecialParam::At),
                modifier: Modifier::None,
            },
            quoted: true,
        }]);
        let fields = expand_word(&mut env, &word).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn star_quoted_joins_on_first_ifs_character() {
        let mut env = env_with(&[("IFS", ":,")]);
        env.positional_params = vec!["a".to_string(), "b".to_string()];
        let word = word_of(vec![WordPart::Param {
            param: Param {
                id: ParamId::Special(slash_syntax::syntax::SpecialParam::Asterisk),
                modifier: Modifier::None,
            },
            quoted: true,
        }]);
        let fields = expand_word(&mut env, &word).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value, "a:b");
    }

    #[test]
    fn single_expansion_joins_and_skips_splitting() {
        let mut env = env_with(&[("x", "a  b")]);
        let word = word_of(vec![param_part("x", false)]);
        let field = expand_word_single(&mut env, &word).unwrap();
        assert_eq!(field.value, "a  b");
    }

    #[test]
    fn pattern_expansion_respects_quoting() {
        let mut env = env_with(&[]);
        let word = word_of(vec![
            WordPart::unquoted("*"),
            WordPart::single_quoted("*"),
        ]);
        let pattern = expand_pattern(&mut env, &word).unwrap();
        assert!(pattern.is_match("anything*"));
        assert!(!pattern.is_match("anything!"));
    }
}

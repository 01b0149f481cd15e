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

//! Parameter expansion
//!
//! Resolves a parameter to its raw value and applies the modifier: the
//! length form, the `:-`-family switches and the `#`/`%` pattern trims.
//! `$@` and `$*` carry the positional parameters as separate values so
//! the field structure mandated by POSIX can be produced.

use super::attr::{FieldsBuilder, Origin};
use super::{Error, ErrorCause, Result};
use slash_env::option::ShellOption;
use slash_env::Env;
use slash_fnmatch::MatchLength;
use slash_syntax::source::Span;
use slash_syntax::syntax::{
    Modifier, Param, ParamId, SpecialParam, Switch, SwitchCondition, SwitchType, Trim, TrimLength,
    TrimSide,
};

/// Raw value of a parameter before any modifier applies
#[derive(Clone, Debug)]
enum RawValue {
    /// The parameter is unset.
    Unset,
    /// Single value
    Scalar(String),
    /// The positional parameters (`$@` and `$*`)
    Positional(Vec<String>),
}

/// Expands one parameter into the builder.
pub fn expand_param(
    env: &mut Env,
    param: &Param,
    quoted: bool,
    builder: &mut FieldsBuilder,
    span: Span,
) -> Result<()> {
    let raw = raw_value(env, &param.id);
    match &param.modifier {
        Modifier::None => {
            let raw = check_set(env, &param.id, raw, span)?;
            emit(env, &param.id, raw, quoted, builder);
            Ok(())
        }
        Modifier::Length => {
            let raw = check_set(env, &param.id, raw, span)?;
            let length = match raw {
                RawValue::Unset => 0,
                RawValue::Scalar(value) => value.chars().count(),
                RawValue::Positional(values) => values.len(),
            };
            if quoted {
                builder.push_quoting();
            }
            builder.push_str(&length.to_string(), Origin::SoftExpansion, quoted);
            Ok(())
        }
        Modifier::Switch(switch) => expand_switch(env, param, switch, raw, quoted, builder, span),
        Modifier::Trim(trim) => {
            let raw = check_set(env, &param.id, raw, span)?;
            let trimmed = apply_trim(env, trim, raw, span)?;
            emit(env, &param.id, trimmed, quoted, builder);
            Ok(())
        }
    }
}

/// Resolves a parameter to its raw value.
fn raw_value(env: &Env, id: &ParamId) -> RawValue {
    match id {
        ParamId::Variable(name) => match env.variables.value(name) {
            Some(value) => RawValue::Scalar(value.to_string()),
            None => RawValue::Unset,
        },
        ParamId::Positional(index) => match index
            .checked_sub(1)
            .and_then(|i| env.positional_params.get(i))
        {
            Some(value) => RawValue::Scalar(value.clone()),
            None => RawValue::Unset,
        },
        ParamId::Special(special) => match special {
            SpecialParam::At | SpecialParam::Asterisk => {
                RawValue::Positional(env.positional_params.clone())
            }
            SpecialParam::Number => RawValue::Scalar(env.positional_params.len().to_string()),
            SpecialParam::Question => RawValue::Scalar(env.exit_status.to_string()),
            SpecialParam::Hyphen => RawValue::Scalar(env.options.flag_string()),
            SpecialParam::Dollar => RawValue::Scalar(env.shell_pid.to_string()),
            SpecialParam::Exclamation => match env.jobs.last_async_pid {
                Some(pid) => RawValue::Scalar(pid.to_string()),
                None => RawValue::Unset,
            },
            SpecialParam::Zero => RawValue::Scalar(env.shell_name.clone()),
        },
    }
}

/// Enforces `set -u` on an unset parameter.
fn check_set(env: &Env, id: &ParamId, raw: RawValue, span: Span) -> Result<RawValue> {
    if matches!(raw, RawValue::Unset) && env.options.is_on(ShellOption::NoUnset) {
        return Err(Error {
            cause: ErrorCause::UnsetParameter {
                name: id.to_string(),
            },
            span,
        });
    }
    Ok(raw)
}

/// Emits a raw value into the builder.
fn emit(env: &Env, id: &ParamId, raw: RawValue, quoted: bool, builder: &mut FieldsBuilder) {
    match raw {
        RawValue::Unset => {
            if quoted {
                builder.push_quoting();
            }
        }
        RawValue::Scalar(value) => {
            if quoted {
                builder.push_quoting();
            }
            builder.push_str(&value, Origin::SoftExpansion, quoted);
        }
        RawValue::Positional(values) => {
            if quoted && *id == ParamId::Special(SpecialParam::Asterisk) {
                // "$*" joins on the first IFS character.
                let ifs = env.variables.value("IFS").unwrap_or(" ");
                let separator: String = ifs.chars().next().map(String::from).unwrap_or_default();
                builder.push_quoting();
                let joined = values.join(&separator);
                builder.push_str(&joined, Origin::SoftExpansion, true);
            } else {
                // "$@" yields one field per parameter; unquoted $@ and $*
                // yield separate values that are then split further.
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        builder.break_field();
                    }
                    if quoted {
                        builder.push_quoting();
                    }
                    builder.push_str(value, Origin::SoftExpansion, quoted);
                }
            }
        }
    }
}

/// Expansion context for the word of a switch.
///
/// The word's unquoted literal characters become expansion output, so
/// they are subject to field splitting.
fn switch_context(quoted: bool) -> super::initial::PartContext {
    super::initial::PartContext {
        quoted,
        literal_origin: Origin::SoftExpansion,
    }
}

/// Applies a `:-`-family switch.
fn expand_switch(
    env: &mut Env,
    param: &Param,
    switch: &Switch,
    raw: RawValue,
    quoted: bool,
    builder: &mut FieldsBuilder,
    span: Span,
) -> Result<()> {
    let missing = match (switch.condition, &raw) {
        (_, RawValue::Unset) => true,
        (SwitchCondition::UnsetOrEmpty, RawValue::Scalar(value)) => value.is_empty(),
        (SwitchCondition::UnsetOrEmpty, RawValue::Positional(values)) => values.is_empty(),
        (SwitchCondition::Unset, _) => false,
    };

    match switch.r#type {
        SwitchType::Alter => {
            if missing {
                if quoted {
                    builder.push_quoting();
                }
                Ok(())
            } else {
                // The quoting mark keeps an empty word as an empty field.
                if quoted {
                    builder.push_quoting();
                }
                super::initial::expand_parts(
                    env,
                    &switch.word.parts,
                    switch_context(quoted),
                    span,
                    builder,
                )
            }
        }
        SwitchType::Default => {
            if missing {
                if quoted {
                    builder.push_quoting();
                }
                super::initial::expand_parts(
                    env,
                    &switch.word.parts,
                    switch_context(quoted),
                    span,
                    builder,
                )
            } else {
                emit(env, &param.id, raw, quoted, builder);
                Ok(())
            }
        }
        SwitchType::Assign => {
            if missing {
                let ParamId::Variable(name) = &param.id else {
                    return Err(Error {
                        cause: ErrorCause::NotAssignable {
                            name: param.id.to_string(),
                        },
                        span,
                    });
                };
                let name = name.clone();
                let value = super::expand_text(env, &switch.word)?;
                env.variables
                    .assign(&name, value.clone())
                    .map_err(|e| Error {
                        cause: ErrorCause::AssignVariable(e),
                        span,
                    })?;
                if env.options.is_on(ShellOption::AllExport) {
                    env.variables.export(&name);
                }
                emit(env, &param.id, RawValue::Scalar(value), quoted, builder);
                Ok(())
            } else {
                emit(env, &param.id, raw, quoted, builder);
                Ok(())
            }
        }
        SwitchType::Error => {
            if missing {
                let message = if switch.word.parts.is_empty() {
                    match switch.condition {
                        SwitchCondition::Unset => "parameter not set".to_string(),
                        SwitchCondition::UnsetOrEmpty => "parameter null or not set".to_string(),
                    }
                } else {
                    super::expand_text(env, &switch.word)?
                };
                Err(Error {
                    cause: ErrorCause::EmptyExpansion {
                        name: param.id.to_string(),
                        message,
                    },
                    span,
                })
            } else {
                emit(env, &param.id, raw, quoted, builder);
                Ok(())
            }
        }
    }
}

/// Applies a `#`/`%` pattern trim to the raw value.
fn apply_trim(env: &mut Env, trim: &Trim, raw: RawValue, span: Span) -> Result<RawValue> {
    let pattern = super::expand_pattern(env, &trim.pattern)?;
    let length = match trim.length {
        TrimLength::Shortest => MatchLength::Shortest,
        TrimLength::Longest => MatchLength::Longest,
    };
    let _ = span;

    let trim_one = |value: &str| -> String {
        match trim.side {
            TrimSide::Prefix => match pattern.prefix_match_length(value, length) {
                Some(end) => value[end..].to_string(),
                None => value.to_string(),
            },
            TrimSide::Suffix => match pattern.suffix_match_start(value, length) {
                Some(start) => value[..start].to_string(),
                None => value.to_string(),
            },
        }
    };

    Ok(match raw {
        RawValue::Unset => RawValue::Scalar(String::new()),
        RawValue::Scalar(value) => RawValue::Scalar(trim_one(&value)),
        RawValue::Positional(values) => {
            RawValue::Positional(values.iter().map(|v| trim_one(v)).collect())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::super::{expand_word, expand_word_single, ErrorCause};
    use slash_env::Env;
    use slash_syntax::source::Span;
    use slash_syntax::syntax::{Switch, Word, WordPart};

    fn env_with(vars: &[(&str, &str)]) -> Env {
        let mut env = Env::new("slash");
        for (name, value) in vars {
            env.variables.assign(name, *value).unwrap();
        }
        env
    }

    fn param_word(name: &str, modifier: Modifier) -> Word {
        Word {
            parts: vec![WordPart::Param {
                param: Param {
                    id: ParamId::Variable(name.to_string()),
                    modifier,
                },
                quoted: false,
            }],
            span: Span::dummy(),
        }
    }

    fn switch(r#type: SwitchType, condition: SwitchCondition, word: &str) -> Modifier {
        Modifier::Switch(Switch {
            r#type,
            condition,
            word: Word::unquoted(word, Span::dummy()),
        })
    }

    use super::*;

    #[test]
    fn length_modifier() {
        let mut env = env_with(&[("x", "hello")]);
        let word = param_word("x", Modifier::Length);
        let field = expand_word_single(&mut env, &word).unwrap();
        assert_eq!(field.value, "5");

        let word = param_word("unset_var", Modifier::Length);
        let field = expand_word_single(&mut env, &word).unwrap();
        assert_eq!(field.value, "0");
    }

    #[test]
    fn default_switch_uses_word_when_unset_or_empty() {
        let mut env = env_with(&[("empty", "")]);
        let modifier = switch(
            SwitchType::Default,
            SwitchCondition::UnsetOrEmpty,
            "fallback",
        );
        let word = param_word("unset_var", modifier.clone());
        assert_eq!(
            expand_word_single(&mut env, &word).unwrap().value,
            "fallback"
        );
        let word = param_word("empty", modifier);
        assert_eq!(
            expand_word_single(&mut env, &word).unwrap().value,
            "fallback"
        );
    }

    #[test]
    fn unquoted_default_word_is_field_split() {
        let mut env = env_with(&[]);
        let modifier = switch(SwitchType::Default, SwitchCondition::UnsetOrEmpty, "a b");
        let word = param_word("unset_var", modifier);
        let fields = expand_word(&mut env, &word).unwrap();
        let values: Vec<_> = fields.iter().map(|f| &f.value).collect();
        assert_eq!(values, ["a", "b"]);
    }

    #[test]
    fn default_switch_without_colon_keeps_empty_value() {
        let mut env = env_with(&[("empty", "")]);
        let modifier = switch(SwitchType::Default, SwitchCondition::Unset, "fallback");
        let word = param_word("empty", modifier);
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "");
    }

    #[test]
    fn assign_switch_assigns_and_expands() {
        let mut env = env_with(&[]);
        let modifier = switch(SwitchType::Assign, SwitchCondition::UnsetOrEmpty, "value");
        let word = param_word("x", modifier);
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "value");
        assert_eq!(env.variables.value("x"), Some("value"));
    }

    #[test]
    fn error_switch_reports_message() {
        let mut env = env_with(&[]);
        let modifier = switch(SwitchType::Error, SwitchCondition::UnsetOrEmpty, "need x");
        let word = param_word("x", modifier);
        let error = expand_word(&mut env, &word).unwrap_err();
        assert_matches::assert_matches!(error.cause, ErrorCause::EmptyExpansion { name, message } => {
            assert_eq!(name, "x");
            assert_eq!(message, "need x");
        });
    }

    #[test]
    fn alter_switch_uses_word_when_set() {
        let mut env = env_with(&[("x", "whatever")]);
        let modifier = switch(SwitchType::Alter, SwitchCondition::UnsetOrEmpty, "alt");
        let word = param_word("x", modifier.clone());
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "alt");
        let word = param_word("unset_var", modifier);
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "");
    }

    #[test]
    fn prefix_and_suffix_trims() {
        let mut env = env_with(&[("path", "a/b/c.txt")]);

        let trim = Modifier::Trim(Trim {
            side: TrimSide::Prefix,
            length: TrimLength::Shortest,
            pattern: Word::unquoted("*/", Span::dummy()),
        });
        let word = param_word("path", trim);
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "b/c.txt");

        let trim = Modifier::Trim(Trim {
            side: TrimSide::Prefix,
            length: TrimLength::Longest,
            pattern: Word::unquoted("*/", Span::dummy()),
        });
        let word = param_word("path", trim);
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "c.txt");

        let trim = Modifier::Trim(Trim {
            side: TrimSide::Suffix,
            length: TrimLength::Shortest,
            pattern: Word::unquoted(".*", Span::dummy()),
        });
        let word = param_word("path", trim);
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "a/b/c");

        let trim = Modifier::Trim(Trim {
            side: TrimSide::Suffix,
            length: TrimLength::Shortest,
            pattern: Word::unquoted("nomatch", Span::dummy()),
        });
        let word = param_word("path", trim);
        assert_eq!(
            expand_word_single(&mut env, &word).unwrap().value,
            "a/b/c.txt"
        );
    }

    #[test]
    fn special_parameters() {
        let mut env = env_with(&[]);
        env.positional_params = vec!["one".to_string(), "two".to_string()];
        env.exit_status = slash_env::semantics::ExitStatus(7);

        let number = Word {
            parts: vec![WordPart::Param {
                param: Param {
                    id: ParamId::Special(SpecialParam::Number),
                    modifier: Modifier::None,
                },
                quoted: false,
            }],
            span: Span::dummy(),
        };
        assert_eq!(expand_word_single(&mut env, &number).unwrap().value, "2");

        let question = Word {
            parts: vec![WordPart::Param {
                param: Param {
                    id: ParamId::Special(SpecialParam::Question),
                    modifier: Modifier::None,
                },
                quoted: false,
            }],
            span: Span::dummy(),
        };
        assert_eq!(expand_word_single(&mut env, &question).unwrap().value, "7");

        let zero = Word {
            parts: vec![WordPart::Param {
                param: Param {
                    id: ParamId::Special(SpecialParam::Zero),
                    modifier: Modifier::None,
                },
                quoted: false,
            }],
            span: Span::dummy(),
        };
        assert_eq!(expand_word_single(&mut env, &zero).unwrap().value, "slash");
    }

    #[test]
    fn positional_parameter_lookup() {
        let mut env = env_with(&[]);
        env.positional_params = vec!["one".to_string()];

        let word = Word {
            parts: vec![WordPart::Param {
                param: Param {
                    id: ParamId::Positional(1),
                    modifier: Modifier::None,
                },
                quoted: false,
            }],
            span: Span::dummy(),
        };
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "one");

        let word = Word {
            parts: vec![WordPart::Param {
                param: Param {
                    id: ParamId::Positional(2),
                    modifier: Modifier::None,
                },
                quoted: false,
            }],
            span: Span::dummy(),
        };
        assert_eq!(expand_word_single(&mut env, &word).unwrap().value, "");
    }
}

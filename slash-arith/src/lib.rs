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

//! This crate implements arithmetic expansion for the shell.
//!
//! [`eval`] evaluates an expression with standard C integer semantics over
//! `i64`, including assignment operators, the conditional operator and the
//! comma operator. Variables are read from and assigned to an [`Env`]
//! implementation provided by the caller; a parameter that is unset
//! evaluates as zero.
//!
//! The operands of `&&`, `||` and `? :` that C does not evaluate are
//! parsed but not evaluated here either: their side effects (assignments,
//! division by zero) do not take place.

use std::fmt::Display;
use std::ops::Range;
use thiserror::Error;

mod token;

use token::Operator;
use token::TokenValue;
pub use token::TokenError;
use token::Tokens;

/// Variable environment an expression is evaluated in
pub trait Env {
    /// Error returned by a failed assignment
    type Error;

    /// Returns the value of a variable, or `None` if unset.
    fn get(&self, name: &str) -> Option<String>;

    /// Assigns a value to a variable.
    fn assign(&mut self, name: &str, value: i64) -> Result<(), Self::Error>;
}

/// Grammar errors in an expression
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum SyntaxError {
    /// A token where an operand or operator cannot appear
    #[error("unexpected token")]
    UnexpectedToken,
    /// The expression ended where an operand was expected
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    /// A `(` without a matching `)`
    #[error("missing `)`")]
    MissingCloseParen,
    /// A `?` without a matching `:`
    #[error("missing `:` in conditional expression")]
    MissingColon,
}

/// Cause of an arithmetic expansion error
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum ErrorCause<E> {
    /// Error in tokenization
    #[error(transparent)]
    Token(TokenError),
    /// Error in the expression grammar
    #[error(transparent)]
    Syntax(SyntaxError),
    /// A variable value that is not a valid number
    #[error("variable value {0:?} cannot be parsed as a number")]
    InvalidVariableValue(String),
    /// Result or intermediate value out of bounds
    #[error("overflow")]
    Overflow,
    /// Division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,
    /// The left operand of an assignment is not a variable.
    #[error("assignment to a non-variable")]
    AssignToNonVariable,
    /// Error assigning a variable value
    #[error("{0}")]
    AssignVariable(E),
}

/// Description of an error that occurred during evaluation
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("{cause}")]
pub struct Error<E: Display> {
    /// Cause of the error
    pub cause: ErrorCause<E>,
    /// Range of the substring in the expression where the error occurred
    pub location: Range<usize>,
}

impl<E: Display> From<token::Error> for Error<E> {
    fn from(e: token::Error) -> Self {
        Error {
            cause: ErrorCause::Token(e.cause),
            location: e.location,
        }
    }
}

/// Intermediate result of evaluating part of an expression
#[derive(Clone, Debug)]
enum Term<'a> {
    /// Known value
    Value(i64),
    /// Variable that has not been read yet
    Variable {
        name: &'a str,
        location: Range<usize>,
    },
}

/// Evaluates an arithmetic expression.
pub fn eval<E: Env>(expression: &str, env: &mut E) -> Result<i64, Error<E::Error>>
where
    E::Error: Display,
{
    let mut eval = Eval {
        tokens: Tokens::new(expression),
        env,
    };
    let term = eval.comma(true)?;
    let value = eval.value_of(term, true)?;
    if let Some(token) = eval.tokens.peek()? {
        return Err(Error {
            cause: ErrorCause::Syntax(SyntaxError::UnexpectedToken),
            location: token.location.clone(),
        });
    }
    Ok(value)
}

/// Precedence of a binary operator, or `None` for non-binary tokens
///
/// Higher binds tighter. Unary, assignment, conditional and comma operators
/// are handled structurally, not through this table.
fn binary_precedence(operator: Operator) -> Option<u8> {
    use Operator::*;
    match operator {
        BarBar => Some(4),
        AmpersandAmpersand => Some(5),
        Bar => Some(6),
        Caret => Some(7),
        Ampersand => Some(8),
        EqualEqual | BangEqual => Some(9),
        Less | LessEqual | Greater | GreaterEqual => Some(10),
        LessLess | GreaterGreater => Some(11),
        Plus | Minus => Some(12),
        Asterisk | Slash | Percent => Some(13),
        _ => None,
    }
}

const LOWEST_BINARY: u8 = 4;

struct Eval<'a, E> {
    tokens: Tokens<'a>,
    env: &'a mut E,
}

type TermResult<'a, E> = Result<Term<'a>, Error<<E as Env>::Error>>;

impl<'a, E: Env> Eval<'a, E>
where
    E::Error: Display,
{
    /// Resolves a term to its numeric value.
    ///
    /// In an inactive (unevaluated) context the value is not read and zero
    /// is returned.
    fn value_of(&mut self, term: Term<'a>, active: bool) -> Result<i64, Error<E::Error>> {
        match term {
            Term::Value(value) => Ok(value),
            Term::Variable { name, location } => {
                if !active {
                    return Ok(0);
                }
                match self.env.get(name) {
                    None => Ok(0),
                    Some(value) => {
                        let trimmed = value.trim();
                        if trimmed.is_empty() {
                            return Ok(0);
                        }
                        trimmed.parse().map_err(|_| Error {
                            cause: ErrorCause::InvalidVariableValue(value),
                            location,
                        })
                    }
                }
            }
        }
    }

    /// Parses and evaluates a comma expression.
    fn comma(&mut self, active: bool) -> TermResult<'a, E> {
        let mut term = self.assignment(active)?;
        loop {
            match self.tokens.peek()? {
                Some(token) if token.value == TokenValue::Operator(Operator::Comma) => {
                    self.tokens.next()?;
                    // The left operand is evaluated for its side effects.
                    self.value_of(term, active)?;
                    term = self.assignment(active)?;
                }
                _ => return Ok(term),
            }
        }
    }

    /// Parses and evaluates an assignment expression.
    fn assignment(&mut self, active: bool) -> TermResult<'a, E> {
        let lhs = self.conditional(active)?;

        let operator = match self.tokens.peek()? {
            Some(token) => match token.value {
                TokenValue::Operator(op) if op.is_assignment() => op,
                _ => return Ok(lhs),
            },
            None => return Ok(lhs),
        };
        let operator_location = self.tokens.peek()?.unwrap().location.clone();
        self.tokens.next()?;

        let Term::Variable { name, location } = lhs else {
            return Err(Error {
                cause: ErrorCause::AssignToNonVariable,
                location: operator_location,
            });
        };

        let rhs = self.assignment(active)?;
        let rhs = self.value_of(rhs, active)?;
        let value = match operator.compound_assignment() {
            None => rhs,
            Some(binary) => {
                let lhs_value = self.value_of(
                    Term::Variable {
                        name,
                        location: location.clone(),
                    },
                    active,
                )?;
                if active {
                    apply_binary(binary, lhs_value, rhs, &operator_location)?
                } else {
                    0
                }
            }
        };

        if active {
            self.env.assign(name, value).map_err(|e| Error {
                cause: ErrorCause::AssignVariable(e),
                location,
            })?;
        }
        Ok(Term::Value(value))
    }

    /// Parses and evaluates a conditional (`? :`) expression.
    fn conditional(&mut self, active: bool) -> TermResult<'a, E> {
        let condition = self.binary(LOWEST_BINARY, active)?;

        match self.tokens.peek()? {
            Some(token) if token.value == TokenValue::Operator(Operator::Question) => {}
            _ => return Ok(condition),
        }
        let condition = self.value_of(condition, active)?;
        self.tokens.next()?;

        let then_term = self.comma(active && condition != 0)?;
        let then_value = self.value_of(then_term, active && condition != 0)?;

        match self.tokens.next()? {
            Some(token) if token.value == TokenValue::Operator(Operator::Colon) => {}
            _ => {
                return Err(Error {
                    cause: ErrorCause::Syntax(SyntaxError::MissingColon),
                    location: self.tokens.index()..self.tokens.index(),
                })
            }
        }

        let else_term = self.assignment(active && condition == 0)?;
        let else_value = self.value_of(else_term, active && condition == 0)?;

        Ok(Term::Value(if condition != 0 {
            then_value
        } else {
            else_value
        }))
    }

    /// Parses and evaluates binary operators of at least the given
    /// precedence, by precedence climbing.
    fn binary(&mut self, min_precedence: u8, active: bool) -> TermResult<'a, E> {
        use Operator::*;
        let mut lhs = self.unary(active)?;
        loop {
            let (operator, precedence, location) = match self.tokens.peek()? {
                Some(token) => match token.value {
                    TokenValue::Operator(op) => match binary_precedence(op) {
                        Some(precedence) if precedence >= min_precedence => {
                            (op, precedence, token.location.clone())
                        }
                        _ => return Ok(lhs),
                    },
                    _ => return Ok(lhs),
                },
                None => return Ok(lhs),
            };
            self.tokens.next()?;

            match operator {
                AmpersandAmpersand => {
                    let left = self.value_of(lhs, active)?;
                    let right_active = active && left != 0;
                    let rhs = self.binary(precedence + 1, right_active)?;
                    let right = self.value_of(rhs, right_active)?;
                    lhs = Term::Value(i64::from(left != 0 && right != 0));
                }
                BarBar => {
                    let left = self.value_of(lhs, active)?;
                    let right_active = active && left == 0;
                    let rhs = self.binary(precedence + 1, right_active)?;
                    let right = self.value_of(rhs, right_active)?;
                    lhs = Term::Value(i64::from(left != 0 || right != 0));
                }
                _ => {
                    let left = self.value_of(lhs, active)?;
                    let rhs = self.binary(precedence + 1, active)?;
                    let right = self.value_of(rhs, active)?;
                    lhs = Term::Value(if active {
                        apply_binary(operator, left, right, &location)?
                    } else {
                        0
                    });
                }
            }
        }
    }

    /// Parses and evaluates a unary expression.
    fn unary(&mut self, active: bool) -> TermResult<'a, E> {
        use Operator::*;
        let Some(token) = self.tokens.next()? else {
            return Err(Error {
                cause: ErrorCause::Syntax(SyntaxError::UnexpectedEnd),
                location: self.tokens.index()..self.tokens.index(),
            });
        };
        let location = token.location.clone();
        match token.value {
            TokenValue::Number(number) => Ok(Term::Value(number)),
            TokenValue::Name(name) => Ok(Term::Variable { name, location }),
            TokenValue::Operator(OpenParen) => {
                let term = self.comma(active)?;
                match self.tokens.next()? {
                    Some(token) if token.value == TokenValue::Operator(CloseParen) => Ok(term),
                    _ => Err(Error {
                        cause: ErrorCause::Syntax(SyntaxError::MissingCloseParen),
                        location,
                    }),
                }
            }
            TokenValue::Operator(Plus) => {
                let term = self.unary(active)?;
                self.value_of(term, active).map(Term::Value)
            }
            TokenValue::Operator(Minus) => {
                let term = self.unary(active)?;
                let value = self.value_of(term, active)?;
                match value.checked_neg() {
                    Some(value) => Ok(Term::Value(value)),
                    None if !active => Ok(Term::Value(0)),
                    None => Err(Error {
                        cause: ErrorCause::Overflow,
                        location,
                    }),
                }
            }
            TokenValue::Operator(Tilde) => {
                let term = self.unary(active)?;
                let value = self.value_of(term, active)?;
                Ok(Term::Value(!value))
            }
            TokenValue::Operator(Bang) => {
                let term = self.unary(active)?;
                let value = self.value_of(term, active)?;
                Ok(Term::Value(i64::from(value == 0)))
            }
            TokenValue::Operator(_) => Err(Error {
                cause: ErrorCause::Syntax(SyntaxError::UnexpectedToken),
                location,
            }),
        }
    }
}

/// Applies a binary operator to two values.
fn apply_binary<E: Display>(
    operator: Operator,
    left: i64,
    right: i64,
    location: &Range<usize>,
) -> Result<i64, Error<E>> {
    use Operator::*;
    let overflow = |value: Option<i64>| {
        value.ok_or_else(|| Error {
            cause: ErrorCause::Overflow,
            location: location.clone(),
        })
    };
    let nonzero = |value: i64| {
        if value == 0 {
            Err(Error {
                cause: ErrorCause::DivisionByZero,
                location: location.clone(),
            })
        } else {
            Ok(value)
        }
    };
    Ok(match operator {
        Plus => overflow(left.checked_add(right))?,
        Minus => overflow(left.checked_sub(right))?,
        Asterisk => overflow(left.checked_mul(right))?,
        Slash => overflow(left.checked_div(nonzero(right)?))?,
        Percent => overflow(left.checked_rem(nonzero(right)?))?,
        LessLess => left.wrapping_shl(right as u32),
        GreaterGreater => left.wrapping_shr(right as u32),
        Less => i64::from(left < right),
        LessEqual => i64::from(left <= right),
        Greater => i64::from(left > right),
        GreaterEqual => i64::from(left >= right),
        EqualEqual => i64::from(left == right),
        BangEqual => i64::from(left != right),
        Ampersand => left & right,
        Caret => left ^ right,
        Bar => left | right,
        _ => unreachable!("not a binary operator: {operator:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    /// Simple variable environment for tests
    #[derive(Debug, Default)]
    struct TestEnv(HashMap<String, String>);

    impl TestEnv {
        fn with<const N: usize>(vars: [(&str, &str); N]) -> TestEnv {
            TestEnv(
                vars.into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl Env for TestEnv {
        type Error = std::convert::Infallible;
        fn get(&self, name: &str) -> Option<String> {
            self.0.get(name).cloned()
        }
        fn assign(&mut self, name: &str, value: i64) -> Result<(), Self::Error> {
            self.0.insert(name.to_string(), value.to_string());
            Ok(())
        }
    }

    fn eval_str(expression: &str) -> i64 {
        eval(expression, &mut TestEnv::default()).unwrap()
    }

    #[test]
    fn constants_and_precedence() {
        assert_eq!(eval_str("1 + 2"), 3);
        assert_eq!(eval_str("2 + 3 * 4"), 14);
        assert_eq!(eval_str("(2 + 3) * 4"), 20);
        assert_eq!(eval_str("10 - 4 - 3"), 3);
        assert_eq!(eval_str("17 % 5"), 2);
        assert_eq!(eval_str("7 / 2"), 3);
        assert_eq!(eval_str("-7 / 2"), -3);
    }

    #[test]
    fn unary_operators() {
        assert_eq!(eval_str("-3"), -3);
        assert_eq!(eval_str("+3"), 3);
        assert_eq!(eval_str("!3"), 0);
        assert_eq!(eval_str("!0"), 1);
        assert_eq!(eval_str("~0"), -1);
        assert_eq!(eval_str("- -3"), 3);
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(eval_str("1 < 2"), 1);
        assert_eq!(eval_str("2 <= 1"), 0);
        assert_eq!(eval_str("3 == 3"), 1);
        assert_eq!(eval_str("3 != 3"), 0);
        assert_eq!(eval_str("1 && 2"), 1);
        assert_eq!(eval_str("1 && 0"), 0);
        assert_eq!(eval_str("0 || 5"), 1);
        assert_eq!(eval_str("0 || 0"), 0);
    }

    #[test]
    fn bit_operations() {
        assert_eq!(eval_str("6 & 3"), 2);
        assert_eq!(eval_str("6 | 3"), 7);
        assert_eq!(eval_str("6 ^ 3"), 5);
        assert_eq!(eval_str("1 << 4"), 16);
        assert_eq!(eval_str("32 >> 2"), 8);
    }

    #[test]
    fn conditional_operator() {
        assert_eq!(eval_str("1 ? 2 : 3"), 2);
        assert_eq!(eval_str("0 ? 2 : 3"), 3);
        assert_eq!(eval_str("1 ? 0 ? 4 : 5 : 6"), 5);
    }

    #[test]
    fn comma_operator() {
        assert_eq!(eval_str("1, 2, 3"), 3);
    }

    #[test]
    fn variables() {
        let mut env = TestEnv::with([("x", "1"), ("y", "2")]);
        assert_eq!(eval("x+y", &mut env), Ok(3));
        // Unset variables evaluate as zero.
        assert_eq!(eval("x + nope", &mut env), Ok(1));
        // Whitespace around a value is tolerated.
        let mut env = TestEnv::with([("x", " 5 ")]);
        assert_eq!(eval("x", &mut env), Ok(5));
    }

    #[test]
    fn invalid_variable_value() {
        let mut env = TestEnv::with([("x", "oops")]);
        let error = eval("x + 1", &mut env).unwrap_err();
        assert_matches!(error.cause, ErrorCause::InvalidVariableValue(value) => {
            assert_eq!(value, "oops");
        });
        assert_eq!(error.location, 0..1);
    }

    #[test]
    fn assignments() {
        let mut env = TestEnv::default();
        assert_eq!(eval("x = 5", &mut env), Ok(5));
        assert_eq!(env.get("x").as_deref(), Some("5"));
        assert_eq!(eval("x += 3", &mut env), Ok(8));
        assert_eq!(eval("x <<= 2", &mut env), Ok(32));
        assert_eq!(eval("x %= 5", &mut env), Ok(2));
        assert_eq!(eval("y = x = 7", &mut env), Ok(7));
        assert_eq!(env.get("y").as_deref(), Some("7"));
    }

    #[test]
    fn assignment_to_non_variable() {
        let error = eval("1 = 2", &mut TestEnv::default()).unwrap_err();
        assert_matches!(error.cause, ErrorCause::AssignToNonVariable);
    }

    #[test]
    fn short_circuit_skips_side_effects() {
        let mut env = TestEnv::default();
        assert_eq!(eval("0 && (x = 1)", &mut env), Ok(0));
        assert_eq!(env.get("x"), None);
        assert_eq!(eval("1 || (x = 1)", &mut env), Ok(1));
        assert_eq!(env.get("x"), None);
        assert_eq!(eval("1 ? 2 : (x = 1)", &mut env), Ok(2));
        assert_eq!(env.get("x"), None);
        // Division by zero in a skipped branch does not occur.
        assert_eq!(eval("0 && 1 / 0", &mut env), Ok(0));
        assert_eq!(eval("1 ? 5 : 1 / 0", &mut env), Ok(5));
    }

    #[test]
    fn division_by_zero() {
        let error = eval("1 / 0", &mut TestEnv::default()).unwrap_err();
        assert_matches!(error.cause, ErrorCause::DivisionByZero);
        let error = eval("1 % 0", &mut TestEnv::default()).unwrap_err();
        assert_matches!(error.cause, ErrorCause::DivisionByZero);
    }

    #[test]
    fn overflow() {
        let mut env = TestEnv::with([("max", "9223372036854775807")]);
        let error = eval("max + 1", &mut env).unwrap_err();
        assert_matches!(error.cause, ErrorCause::Overflow);
        let error = eval("max * 2", &mut env).unwrap_err();
        assert_matches!(error.cause, ErrorCause::Overflow);
    }

    #[test]
    fn syntax_errors() {
        let error = eval("1 +", &mut TestEnv::default()).unwrap_err();
        assert_matches!(error.cause, ErrorCause::Syntax(SyntaxError::UnexpectedEnd));
        let error = eval("(1", &mut TestEnv::default()).unwrap_err();
        assert_matches!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::MissingCloseParen)
        );
        let error = eval("1 ? 2", &mut TestEnv::default()).unwrap_err();
        assert_matches!(error.cause, ErrorCause::Syntax(SyntaxError::MissingColon));
        let error = eval("1 2", &mut TestEnv::default()).unwrap_err();
        assert_matches!(error.cause, ErrorCause::Syntax(SyntaxError::UnexpectedToken));
        let error = eval("", &mut TestEnv::default()).unwrap_err();
        assert_matches!(error.cause, ErrorCause::Syntax(SyntaxError::UnexpectedEnd));
    }
}

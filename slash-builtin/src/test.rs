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

//! Test built-in (`test` and `[`)
//!
//! Evaluates a conditional expression: unary file and string operators,
//! binary string comparison, binary integer comparison, `!` negation and
//! the obsolescent `-a`/`-o` connectives with `( )` grouping. The exit
//! status is 0 for true, 1 for false and 2 for a malformed expression.

use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::Continue;
use std::os::unix::fs::MetadataExt;
use std::os::unix::fs::PermissionsExt;

/// Error in the expression syntax
#[derive(Debug)]
struct ExprError(String);

struct Parser<'a> {
    args: &'a [String],
    index: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.args.get(self.index).map(String::as_str)
    }

    fn next(&mut self) -> Option<&'a str> {
        let arg = self.peek();
        if arg.is_some() {
            self.index += 1;
        }
        arg
    }

    /// expression: and-or chain
    fn expression(&mut self) -> std::result::Result<bool, ExprError> {
        let mut value = self.and_term()?;
        while self.peek() == Some("-o") {
            self.next();
            let right = self.and_term()?;
            value = value || right;
        }
        Ok(value)
    }

    fn and_term(&mut self) -> std::result::Result<bool, ExprError> {
        let mut value = self.term()?;
        while self.peek() == Some("-a") {
            self.next();
            let right = self.term()?;
            value = value && right;
        }
        Ok(value)
    }

    fn term(&mut self) -> std::result::Result<bool, ExprError> {
        match self.peek() {
            Some("!") => {
                self.next();
                Ok(!self.term()?)
            }
            Some("(") => {
                self.next();
                let value = self.expression()?;
                match self.next() {
                    Some(")") => Ok(value),
                    _ => Err(ExprError("missing `)`".to_string())),
                }
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> std::result::Result<bool, ExprError> {
        let Some(first) = self.next() else {
            return Err(ExprError("missing operand".to_string()));
        };

        // Binary operator?
        if let Some(operator) = self.peek() {
            if is_binary_operator(operator) {
                let operator = self.next().unwrap();
                let Some(right) = self.next() else {
                    return Err(ExprError(format!("missing operand after `{operator}`")));
                };
                return binary(first, operator, right);
            }
        }

        // Unary operator?
        if first.len() == 2 && first.starts_with('-') {
            if let Some(operand) = self.next() {
                return unary(first, operand);
            }
            // `test -n` with nothing after: `-n` is a non-empty string.
            return Ok(true);
        }

        // A lone operand is true if non-empty.
        Ok(!first.is_empty())
    }
}

fn is_binary_operator(op: &str) -> bool {
    matches!(
        op,
        "=" | "!=" | "-eq" | "-ne" | "-gt" | "-ge" | "-lt" | "-le"
    )
}

fn integer(value: &str) -> std::result::Result<i64, ExprError> {
    value
        .trim()
        .parse()
        .map_err(|_| ExprError(format!("`{value}` is not an integer")))
}

fn binary(left: &str, operator: &str, right: &str) -> std::result::Result<bool, ExprError> {
    Ok(match operator {
        "=" => left == right,
        "!=" => left != right,
        "-eq" => integer(left)? == integer(right)?,
        "-ne" => integer(left)? != integer(right)?,
        "-gt" => integer(left)? > integer(right)?,
        "-ge" => integer(left)? >= integer(right)?,
        "-lt" => integer(left)? < integer(right)?,
        "-le" => integer(left)? <= integer(right)?,
        _ => unreachable!("is_binary_operator is checked first"),
    })
}

fn unary(operator: &str, operand: &str) -> std::result::Result<bool, ExprError> {
    let metadata = || std::fs::metadata(operand);
    let symlink_metadata = || std::fs::symlink_metadata(operand);
    Ok(match operator {
        "-n" => !operand.is_empty(),
        "-z" => operand.is_empty(),
        "-e" => metadata().is_ok(),
        "-f" => metadata().map(|m| m.is_file()).unwrap_or(false),
        "-d" => metadata().map(|m| m.is_dir()).unwrap_or(false),
        "-h" | "-L" => symlink_metadata()
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false),
        "-b" => metadata()
            .map(|m| m.mode() & libc::S_IFMT as u32 == libc::S_IFBLK as u32)
            .unwrap_or(false),
        "-c" => metadata()
            .map(|m| m.mode() & libc::S_IFMT as u32 == libc::S_IFCHR as u32)
            .unwrap_or(false),
        "-p" => metadata()
            .map(|m| m.mode() & libc::S_IFMT as u32 == libc::S_IFIFO as u32)
            .unwrap_or(false),
        "-S" => metadata()
            .map(|m| m.mode() & libc::S_IFMT as u32 == libc::S_IFSOCK as u32)
            .unwrap_or(false),
        "-s" => metadata().map(|m| m.size() > 0).unwrap_or(false),
        "-g" => metadata()
            .map(|m| m.permissions().mode() & 0o2000 != 0)
            .unwrap_or(false),
        "-u" => metadata()
            .map(|m| m.permissions().mode() & 0o4000 != 0)
            .unwrap_or(false),
        "-r" => access(operand, libc::R_OK),
        "-w" => access(operand, libc::W_OK),
        "-x" => access(operand, libc::X_OK),
        "-t" => operand
            .parse::<std::ffi::c_int>()
            .map(slash_env::system::isatty)
            .unwrap_or(false),
        _ => return Err(ExprError(format!("unknown operator `{operator}`"))),
    })
}

fn access(path: &str, mode: std::ffi::c_int) -> bool {
    let Ok(c_path) = std::ffi::CString::new(path) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

/// Evaluates a complete expression.
fn evaluate(args: &[String]) -> std::result::Result<bool, ExprError> {
    // Zero arguments: false. One argument: true if non-empty.
    match args {
        [] => return Ok(false),
        [only] => return Ok(!only.is_empty()),
        _ => {}
    }
    let mut parser = Parser { args, index: 0 };
    let value = parser.expression()?;
    if parser.index != args.len() {
        return Err(ExprError(format!(
            "unexpected operand `{}`",
            args[parser.index]
        )));
    }
    Ok(value)
}

fn run(env: &mut Env, args: Vec<String>) -> Result<ExitStatus> {
    match evaluate(&args) {
        Ok(true) => Continue(ExitStatus::SUCCESS),
        Ok(false) => Continue(ExitStatus::FAILURE),
        Err(ExprError(message)) => {
            env.print_error(&format!("test: {message}"));
            Continue(ExitStatus::ERROR)
        }
    }
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let args = args.into_iter().map(|f| f.value).collect();
    run(env, args)
}

/// Entry point for the `[` spelling, which requires a closing `]`.
pub fn bracket_main(env: &mut Env, mut args: Vec<Field>) -> Result<ExitStatus> {
    match args.pop() {
        Some(last) if last.value == "]" => {}
        _ => {
            env.print_error("[: missing `]`");
            return Continue(ExitStatus::ERROR);
        }
    }
    let args = args.into_iter().map(|f| f.value).collect();
    run(env, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(args: &[&str]) -> bool {
        evaluate(&args.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn argument_counts() {
        assert!(!eval(&[]));
        assert!(eval(&["x"]));
        assert!(!eval(&[""]));
    }

    #[test]
    fn string_tests() {
        assert!(eval(&["-n", "x"]));
        assert!(!eval(&["-n", ""]));
        assert!(eval(&["-z", ""]));
        assert!(!eval(&["-z", "x"]));
        assert!(eval(&["abc", "=", "abc"]));
        assert!(eval(&["abc", "!=", "abd"]));
    }

    #[test]
    fn integer_comparisons() {
        assert!(eval(&["2", "-eq", "2"]));
        assert!(eval(&["2", "-ne", "3"]));
        assert!(eval(&["2", "-lt", "3"]));
        assert!(eval(&["3", "-ge", "3"]));
        assert!(eval(&["-1", "-le", "0"]));
        assert!(eval(&[" 5", "-gt", "4"]));
    }

    #[test]
    fn invalid_integer_is_an_error() {
        let args = vec!["x".to_string(), "-eq".to_string(), "1".to_string()];
        assert!(evaluate(&args).is_err());
    }

    #[test]
    fn negation_and_connectives() {
        assert!(eval(&["!", ""]));
        assert!(!eval(&["!", "x"]));
        assert!(eval(&["x", "-a", "y"]));
        assert!(!eval(&["x", "-a", ""]));
        assert!(eval(&["", "-o", "y"]));
        assert!(!eval(&["", "-o", ""]));
    }

    #[test]
    fn parentheses_group() {
        assert!(eval(&["(", "x", ")"]));
        assert!(eval(&["!", "(", "", "-a", "y", ")"]));
    }

    #[test]
    fn file_tests() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "content").unwrap();
        let dir_str = dir.path().display().to_string();
        let file_str = file.display().to_string();

        assert!(eval(&["-e", &file_str]));
        assert!(eval(&["-f", &file_str]));
        assert!(!eval(&["-d", &file_str]));
        assert!(eval(&["-d", &dir_str]));
        assert!(eval(&["-s", &file_str]));
        assert!(eval(&["-r", &file_str]));
        assert!(!eval(&["-e", &format!("{dir_str}/absent")]));
    }

    #[test]
    fn bracket_requires_closing_bracket() {
        let mut env = Env::new("slash");
        let result = bracket_main(&mut env, Field::dummies(["x"]));
        assert_eq!(result, Continue(ExitStatus::ERROR));

        let result = bracket_main(&mut env, Field::dummies(["x", "]"]));
        assert_eq!(result, Continue(ExitStatus::SUCCESS));
    }
}

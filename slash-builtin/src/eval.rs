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

//! Eval built-in
//!
//! Concatenates its arguments with spaces and feeds the result back
//! through the lexer, parser and executor in the current environment.

use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::{Break, Continue};

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let source = args
        .iter()
        .map(|f| f.value.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if source.is_empty() {
        return Continue(ExitStatus::SUCCESS);
    }
    match slash_semantics::runner::eval_fragment(env, &source) {
        Continue(()) => Continue(env.exit_status),
        Break(divert) => Break(divert),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_eval_succeeds() {
        let mut env = Env::new("slash");
        env.exit_status = ExitStatus(9);
        assert_eq!(main(&mut env, Vec::new()), Continue(ExitStatus::SUCCESS));
    }

    #[test]
    fn eval_joins_arguments_and_executes() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["x=a", "y=b"]));
        // `x=a y=b` is one command with two assignments.
        assert_eq!(result, Continue(ExitStatus::SUCCESS));
        assert_eq!(env.variables.value("x"), Some("a"));
        assert_eq!(env.variables.value("y"), Some("b"));
    }

    #[test]
    fn eval_reports_syntax_errors() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["fi"]));
        assert_eq!(result, Continue(ExitStatus::ERROR));
    }
}

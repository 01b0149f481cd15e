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

//! Helpers shared by the built-in implementations

use slash_env::semantics::ExitStatus;
use slash_env::system;
use slash_env::Env;

/// Writes text to the built-in's standard output.
///
/// A write failure is reported and turns into a non-zero exit status.
#[must_use]
pub fn output(env: &mut Env, text: &str) -> ExitStatus {
    match system::write_all(1, text.as_bytes()) {
        Ok(()) => ExitStatus::SUCCESS,
        Err(errno) => {
            env.print_error(&format!("cannot write output: {errno}"));
            ExitStatus::FAILURE
        }
    }
}

/// Reports a usage error, yielding exit status 2.
#[must_use]
pub fn usage_error(env: &mut Env, builtin: &str, message: &str) -> ExitStatus {
    env.print_error(&format!("{builtin}: {message}"));
    ExitStatus::ERROR
}

/// Reports a runtime failure of a built-in, yielding exit status 1.
#[must_use]
pub fn failure(env: &mut Env, builtin: &str, message: &str) -> ExitStatus {
    env.print_error(&format!("{builtin}: {message}"));
    ExitStatus::FAILURE
}

/// Quotes a value for re-input, as `export -p` and friends print it.
#[must_use]
pub fn quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '='))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

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

//! Read built-in
//!
//! Reads one line from standard input and splits it into the named
//! variables using `$IFS`; the last variable receives the remainder of
//! the line. Without `-r`, a backslash escapes the next character and a
//! backslash-newline continues the line.

use crate::common::usage_error;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::system::{self, Errno};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

/// Reads one logical line from standard input.
///
/// Returns the line without its terminating newline, and whether the end
/// of input was reached before any byte was read.
fn read_line(raw: bool) -> std::result::Result<(String, bool), Errno> {
    let mut bytes = Vec::new();
    let mut at_eof = true;
    let mut byte = [0u8; 1];
    loop {
        match system::read(0, &mut byte) {
            Ok(0) => break,
            Ok(_) => {
                at_eof = false;
                match byte[0] {
                    b'\n' => break,
                    b'\\' if !raw => {
                        // Escape: drop the backslash, keep the next byte;
                        // a backslash-newline joins lines.
                        loop {
                            match system::read(0, &mut byte) {
                                Ok(0) => break,
                                Ok(_) if byte[0] == b'\n' => break,
                                Ok(_) => {
                                    bytes.push(byte[0]);
                                    break;
                                }
                                Err(Errno::EINTR) => continue,
                                Err(errno) => return Err(errno),
                            }
                        }
                    }
                    other => bytes.push(other),
                }
            }
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(errno),
        }
    }
    Ok((String::from_utf8_lossy(&bytes).into_owned(), at_eof))
}

/// Splits a line into `count` fields on the IFS characters.
///
/// The last field receives the unsplit remainder with trailing IFS
/// whitespace removed.
fn split_fields(line: &str, ifs: &str, count: usize) -> Vec<String> {
    let is_ifs_ws = |c: char| ifs.contains(c) && c.is_ascii_whitespace();
    let mut fields = Vec::with_capacity(count);
    let mut rest = line.trim_start_matches(is_ifs_ws);
    for _ in 0..count.saturating_sub(1) {
        if rest.is_empty() {
            break;
        }
        match rest.find(|c| ifs.contains(c)) {
            Some(end) => {
                fields.push(rest[..end].to_string());
                // Drop the separator and any adjacent IFS whitespace.
                let mut after = rest[end..].chars();
                after.next();
                rest = after.as_str().trim_start_matches(is_ifs_ws);
            }
            None => {
                fields.push(rest.to_string());
                rest = "";
            }
        }
    }
    if !rest.is_empty() || fields.len() < count {
        fields.push(rest.trim_end_matches(is_ifs_ws).to_string());
    }
    fields
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let mut raw = false;
    let mut names = Vec::new();
    for arg in &args {
        match arg.value.as_str() {
            "-r" => raw = true,
            name => names.push(name.to_string()),
        }
    }
    if names.is_empty() {
        return Continue(usage_error(env, "read", "missing variable name"));
    }

    let (line, at_eof) = match read_line(raw) {
        Ok(result) => result,
        Err(errno) => {
            env.print_error(&format!("read: {errno}"));
            return Continue(ExitStatus::FAILURE);
        }
    };

    let ifs = env
        .variables
        .value("IFS")
        .unwrap_or(" \t\n")
        .to_string();
    let mut values = split_fields(&line, &ifs, names.len()).into_iter();
    for name in &names {
        let value = values.next().unwrap_or_default();
        if let Err(error) = env.variables.assign(name, value) {
            env.print_error(&error.to_string());
            return Continue(ExitStatus::FAILURE);
        }
    }

    Continue(if at_eof {
        ExitStatus::FAILURE
    } else {
        ExitStatus::SUCCESS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitting_into_fields() {
        assert_eq!(split_fields("a b c", " \t\n", 2), ["a", "b c"]);
        assert_eq!(split_fields("a b c", " \t\n", 3), ["a", "b", "c"]);
        assert_eq!(split_fields("  a  ", " \t\n", 1), ["a"]);
        assert_eq!(split_fields("a", " \t\n", 3), ["a", ""]);
        assert_eq!(split_fields("", " \t\n", 2), [""]);
    }

    #[test]
    fn splitting_with_non_whitespace_ifs() {
        assert_eq!(split_fields("a:b:c", ":", 2), ["a", "b:c"]);
        assert_eq!(split_fields("a::c", ":", 3), ["a", "", "c"]);
    }

    #[test]
    fn missing_variable_name_is_a_usage_error() {
        let mut env = Env::new("slash");
        assert_eq!(main(&mut env, Vec::new()), Continue(ExitStatus::ERROR));
    }
}

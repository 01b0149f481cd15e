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

//! Alias built-in
//!
//! Defines aliases (`name=value` operands), prints individual
//! definitions (`name` operands) or, without operands, prints all
//! definitions in a re-input format.

use crate::common::{failure, output};
use itertools::Itertools;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use slash_syntax::alias::{Alias, HashEntry};
use std::fmt::Write;
use std::ops::ControlFlow::Continue;

fn render(alias: &Alias) -> String {
    format!("alias {}='{}'\n", alias.name, alias.replacement.replace('\'', r"'\''"))
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    if args.is_empty() {
        let mut out = String::new();
        for entry in env.aliases.iter().sorted_by(|a, b| a.0.name.cmp(&b.0.name)) {
            out.push_str(&render(&entry.0));
        }
        return Continue(output(env, &out));
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &args {
        match arg.value.split_once('=') {
            Some((name, replacement)) => {
                if !Alias::is_valid_name(name) {
                    status = failure(env, "alias", &format!("`{name}` is not a valid alias name"));
                    continue;
                }
                env.aliases.replace(HashEntry::new(name, replacement));
            }
            None => match env.aliases.get(arg.value.as_str()) {
                Some(entry) => {
                    let text = render(&entry.0);
                    let print_status = output(env, &text);
                    if status == ExitStatus::SUCCESS {
                        status = print_status;
                    }
                }
                None => {
                    status = failure(env, "alias", &format!("{}: not found", arg.value));
                }
            },
        }
    }
    Continue(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_an_alias() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["ll=ls -l"]));
        assert_eq!(result, Continue(ExitStatus::SUCCESS));
        assert_eq!(env.aliases.get("ll").unwrap().0.replacement, "ls -l");
    }

    #[test]
    fn redefines_an_alias() {
        let mut env = Env::new("slash");
        let _ = main(&mut env, Field::dummies(["ll=ls -l"]));
        let _ = main(&mut env, Field::dummies(["ll=ls -al"]));
        assert_eq!(env.aliases.get("ll").unwrap().0.replacement, "ls -al");
    }

    #[test]
    fn invalid_name_fails() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["bad name=x"]));
        assert_eq!(result, Continue(ExitStatus::FAILURE));
    }

    #[test]
    fn unknown_name_fails() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["nope"]));
        assert_eq!(result, Continue(ExitStatus::FAILURE));
    }
}

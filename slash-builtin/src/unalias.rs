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

//! Unalias built-in
//!
//! Removes alias definitions; `-a` removes them all.

use crate::common::failure;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    if args.iter().any(|f| f.value == "-a") {
        env.aliases.clear();
        return Continue(ExitStatus::SUCCESS);
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &args {
        if !env.aliases.remove(arg.value.as_str()) {
            status = failure(env, "unalias", &format!("{}: not found", arg.value));
        }
    }
    Continue(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slash_syntax::alias::HashEntry;

    #[test]
    fn removes_named_aliases() {
        let mut env = Env::new("slash");
        env.aliases.insert(HashEntry::new("ll", "ls -l"));
        env.aliases.insert(HashEntry::new("la", "ls -a"));

        let result = main(&mut env, Field::dummies(["ll"]));
        assert_eq!(result, Continue(ExitStatus::SUCCESS));
        assert!(env.aliases.get("ll").is_none());
        assert!(env.aliases.get("la").is_some());
    }

    #[test]
    fn removes_all_aliases() {
        let mut env = Env::new("slash");
        env.aliases.insert(HashEntry::new("ll", "ls -l"));
        let result = main(&mut env, Field::dummies(["-a"]));
        assert_eq!(result, Continue(ExitStatus::SUCCESS));
        assert!(env.aliases.is_empty());
    }

    #[test]
    fn unknown_alias_fails() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["nope"]));
        assert_eq!(result, Continue(ExitStatus::FAILURE));
    }
}

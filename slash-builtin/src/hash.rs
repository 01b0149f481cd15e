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

//! Hash built-in
//!
//! Prints the remembered command locations, forgets them with `-r`, or
//! looks up and remembers the named utilities.

use crate::common::{failure, output};
use itertools::Itertools;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::fmt::Write;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    if args.iter().any(|f| f.value == "-r") {
        env.hashed_commands.clear();
        return Continue(ExitStatus::SUCCESS);
    }

    if args.is_empty() {
        let mut out = String::new();
        for (name, path) in env
            .hashed_commands
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
        {
            let _ = writeln!(out, "{name}={}", path.display());
        }
        return Continue(output(env, &out));
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &args {
        let name = &arg.value;
        if name.contains('/') {
            status = failure(env, "hash", &format!("{name}: names with slashes are not hashed"));
            continue;
        }
        env.hashed_commands.remove(name);
        if slash_semantics::command_search::search(env, name).is_none() {
            status = failure(env, "hash", &format!("{name}: not found"));
        }
    }
    Continue(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn remembers_and_forgets() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        let mut permissions = std::fs::metadata(&tool).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&tool, permissions).unwrap();

        let mut env = Env::new("slash");
        env.variables
            .assign("PATH", dir.path().display().to_string())
            .unwrap();

        let result = main(&mut env, Field::dummies(["tool"]));
        assert_eq!(result, Continue(ExitStatus::SUCCESS));
        assert!(env.hashed_commands.contains_key("tool"));

        let result = main(&mut env, Field::dummies(["-r"]));
        assert_eq!(result, Continue(ExitStatus::SUCCESS));
        assert!(env.hashed_commands.is_empty());
    }

    #[test]
    fn missing_utility_fails() {
        let mut env = Env::new("slash");
        env.variables.assign("PATH", "/nonexistent").unwrap();
        let result = main(&mut env, Field::dummies(["absent"]));
        assert_eq!(result, Continue(ExitStatus::FAILURE));
    }
}

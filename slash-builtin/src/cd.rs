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

//! Cd built-in
//!
//! Changes the working directory. The operand defaults to `$HOME`; a
//! single `-` means `$OLDPWD` (and prints the new directory). A relative
//! operand whose first component is neither `.` nor `..` is searched for
//! in the directories of `$CDPATH`. With the default `-L`, the new `$PWD`
//! is derived logically from the old one; with `-P` it is the physical
//! path reported by the system.

use crate::common::{failure, output, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::system;
use slash_env::Env;
use std::ffi::CString;
use std::ops::ControlFlow::Continue;

/// Removes `.` components and resolves `..` components textually.
///
/// The input must be absolute. Returns `None` when `..` would climb above
/// the root.
fn canonicalize_logical(path: &str) -> Option<String> {
    let mut components: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop()?;
            }
            component => components.push(component),
        }
    }
    let mut result = String::from("/");
    result.push_str(&components.join("/"));
    Some(result)
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let mut logical = true;
    let mut operands = Vec::new();
    for arg in &args {
        match arg.value.as_str() {
            "-L" => logical = true,
            "-P" => logical = false,
            "-" => operands.push(arg.value.clone()),
            value if value.starts_with('-') && value.len() > 1 => {
                return Continue(usage_error(env, "cd", &format!("unknown option `{value}`")))
            }
            value => operands.push(value.to_string()),
        }
    }
    if operands.len() > 1 {
        return Continue(usage_error(env, "cd", "too many operands"));
    }

    let mut print_destination = false;
    let operand = match operands.pop() {
        Some(operand) if operand == "-" => {
            print_destination = true;
            match env.variables.value("OLDPWD") {
                Some(oldpwd) if !oldpwd.is_empty() => oldpwd.to_string(),
                _ => return Continue(failure(env, "cd", "OLDPWD not set")),
            }
        }
        Some(operand) => operand,
        None => match env.variables.value("HOME") {
            Some(home) if !home.is_empty() => home.to_string(),
            _ => return Continue(failure(env, "cd", "HOME not set")),
        },
    };

    // CDPATH search for relative operands not starting with . or ..
    let mut target = operand.clone();
    let first_component = operand.split('/').next().unwrap_or("");
    if !operand.starts_with('/') && first_component != "." && first_component != ".." {
        let cdpath = env.variables.value("CDPATH").unwrap_or_default().to_string();
        for directory in cdpath.split(':') {
            if directory.is_empty() {
                continue;
            }
            let candidate = format!("{directory}/{operand}");
            if std::fs::metadata(&candidate).map(|m| m.is_dir()).unwrap_or(false) {
                target = candidate;
                print_destination = true;
                break;
            }
        }
    }

    // The logical new PWD, before asking the system
    let old_pwd = env.variables.value("PWD").unwrap_or_default().to_string();
    let logical_path = if target.starts_with('/') {
        canonicalize_logical(&target)
    } else {
        canonicalize_logical(&format!("{old_pwd}/{target}"))
    };

    let chdir_path = match (logical, &logical_path) {
        (true, Some(path)) => path.clone(),
        _ => target.clone(),
    };
    let Ok(c_path) = CString::new(chdir_path.as_str()) else {
        return Continue(failure(env, "cd", "invalid directory name"));
    };
    if let Err(errno) = system::chdir(&c_path) {
        return Continue(failure(env, "cd", &format!("{chdir_path}: {errno}")));
    }

    let new_pwd = if logical {
        logical_path.unwrap_or_else(|| {
            system::getcwd()
                .map(|p| p.display().to_string())
                .unwrap_or(chdir_path)
        })
    } else {
        match system::getcwd() {
            Ok(path) => path.display().to_string(),
            Err(_) => chdir_path,
        }
    };

    let _ = env.variables.assign("OLDPWD", old_pwd);
    let _ = env.variables.assign("PWD", new_pwd.clone());
    env.variables.export("PWD");
    env.variables.export("OLDPWD");

    if print_destination {
        return Continue(output(env, &format!("{new_pwd}\n")));
    }
    Continue(ExitStatus::SUCCESS)
}

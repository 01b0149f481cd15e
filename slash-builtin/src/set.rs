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

//! Set built-in
//!
//! With no arguments, prints all shell variables in a re-input format.
//! Option arguments (`-e`, `+x`, `-o errexit`, ...) switch shell options;
//! remaining operands replace the positional parameters. `--` forces the
//! rest to be operands even if they look like options; a lone `-` also
//! ends option processing.

use crate::common::{output, quote, usage_error};
use slash_env::option::ShellOption;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::fmt::Write;
use std::ops::ControlFlow::Continue;

/// Applies one `-x`/`+x` style option group.
fn apply_short_options(env: &mut Env, letters: &str, on: bool) -> std::result::Result<(), String> {
    for letter in letters.chars() {
        match ShellOption::from_short_name(letter) {
            Some(option) => env.options.set_to(option, on),
            None => return Err(format!("unknown option `-{letter}`")),
        }
    }
    Ok(())
}

/// Renders the `set -o` listing.
fn render_option_listing(env: &Env) -> String {
    let mut out = String::new();
    for option in ShellOption::all() {
        let state = if env.options.is_on(option) { "on" } else { "off" };
        let _ = writeln!(out, "{:<15} {}", option.long_name(), state);
    }
    out
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    if args.is_empty() {
        let mut out = String::new();
        for (name, variable) in env.variables.iter() {
            if let Some(value) = &variable.value {
                let _ = writeln!(out, "{name}={}", quote(value));
            }
        }
        return Continue(output(env, &out));
    }

    let mut arguments = args.iter().map(|f| f.value.as_str()).peekable();
    let mut new_params: Option<Vec<String>> = None;
    while let Some(argument) = arguments.next() {
        match argument {
            "--" | "-" => {
                new_params = Some(arguments.map(String::from).collect());
                break;
            }
            "-o" | "+o" => {
                let on = argument == "-o";
                match arguments.next() {
                    Some(name) => match name.parse::<ShellOption>() {
                        Ok(option) => env.options.set_to(option, on),
                        Err(_) => {
                            return Continue(usage_error(
                                env,
                                "set",
                                &format!("unknown option name `{name}`"),
                            ))
                        }
                    },
                    // `set -o` without a name lists the option states.
                    None => return Continue(output(env, &render_option_listing(env))),
                }
            }
            _ if argument.starts_with('-') => {
                if let Err(message) = apply_short_options(env, &argument[1..], true) {
                    return Continue(usage_error(env, "set", &message));
                }
            }
            _ if argument.starts_with('+') => {
                if let Err(message) = apply_short_options(env, &argument[1..], false) {
                    return Continue(usage_error(env, "set", &message));
                }
            }
            operand => {
                let mut params = vec![operand.to_string()];
                params.extend(arguments.map(String::from));
                new_params = Some(params);
                break;
            }
        }
    }

    if let Some(params) = new_params {
        env.positional_params = params;
    }
    Continue(ExitStatus::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_options_toggle() {
        let mut env = Env::new("slash");
        let _ = main(&mut env, Field::dummies(["-ex"]));
        assert!(env.options.is_on(ShellOption::ErrExit));
        assert!(env.options.is_on(ShellOption::XTrace));

        let _ = main(&mut env, Field::dummies(["+e"]));
        assert!(!env.options.is_on(ShellOption::ErrExit));
        assert!(env.options.is_on(ShellOption::XTrace));
    }

    #[test]
    fn long_options_by_name() {
        let mut env = Env::new("slash");
        let _ = main(&mut env, Field::dummies(["-o", "noglob"]));
        assert!(env.options.is_on(ShellOption::NoGlob));
        let _ = main(&mut env, Field::dummies(["+o", "noglob"]));
        assert!(!env.options.is_on(ShellOption::NoGlob));
    }

    #[test]
    fn unknown_option_is_a_usage_error() {
        let mut env = Env::new("slash");
        let result = main(&mut env, Field::dummies(["-Z"]));
        assert_eq!(result, Continue(ExitStatus::ERROR));
    }

    #[test]
    fn operands_become_positional_parameters() {
        let mut env = Env::new("slash");
        let _ = main(&mut env, Field::dummies(["a", "b"]));
        assert_eq!(env.positional_params, ["a", "b"]);

        // `--` separates options from operands that look like options.
        let _ = main(&mut env, Field::dummies(["--", "-x"]));
        assert_eq!(env.positional_params, ["-x"]);
        assert!(!env.options.is_on(ShellOption::XTrace));
    }

    #[test]
    fn options_and_operands_combine() {
        let mut env = Env::new("slash");
        let _ = main(&mut env, Field::dummies(["-e", "one", "two"]));
        assert!(env.options.is_on(ShellOption::ErrExit));
        assert_eq!(env.positional_params, ["one", "two"]);
    }
}

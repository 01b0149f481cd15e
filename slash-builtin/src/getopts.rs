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

//! Getopts built-in
//!
//! Parses positional parameters (or explicit arguments) one option at a
//! time, driving the `OPTIND`/`OPTARG` protocol. A leading `:` in the
//! option string selects silent error reporting, where `?` and `:` are
//! stored in the result variable instead of a diagnostic.

use crate::common::usage_error;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

fn assign(env: &mut Env, name: &str, value: &str) {
    if let Err(error) = env.variables.assign(name, value) {
        env.print_error(&error.to_string());
    }
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let (optstring, rest) = match args.split_first() {
        Some(split) => split,
        None => return Continue(usage_error(env, "getopts", "missing option string")),
    };
    let Some((name, explicit_args)) = rest.split_first() else {
        return Continue(usage_error(env, "getopts", "missing variable name"));
    };
    let optstring = optstring.value.clone();
    let name = name.value.clone();
    let (silent, optstring) = match optstring.strip_prefix(':') {
        Some(rest) => (true, rest.to_string()),
        None => (false, optstring),
    };

    let arguments: Vec<String> = if explicit_args.is_empty() {
        env.positional_params.clone()
    } else {
        explicit_args.iter().map(|f| f.value.clone()).collect()
    };

    // OPTIND is 1-based; a value the shell did not expect resets the scan.
    let optind: usize = env
        .variables
        .value("OPTIND")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let mut offset = match env.getopts_state {
        Some((recorded, offset)) if recorded == optind => offset,
        _ => 0,
    };
    let mut index = optind;

    let end = |env: &mut Env, name: &str, index: usize| {
        env.getopts_state = None;
        assign(env, "OPTIND", &index.to_string());
        assign(env, name, "?");
        Continue(ExitStatus::FAILURE)
    };

    loop {
        let Some(argument) = arguments.get(index - 1) else {
            return end(env, &name, index);
        };
        if offset == 0 {
            if argument == "--" {
                return end(env, &name, index + 1);
            }
            if !argument.starts_with('-') || argument == "-" {
                return end(env, &name, index);
            }
            offset = 1;
        }

        let Some(option) = argument.chars().nth(offset) else {
            // Exhausted this argument; move to the next.
            index += 1;
            offset = 0;
            continue;
        };
        offset += 1;

        let takes_argument = optstring
            .chars()
            .zip(optstring.chars().skip(1).chain([' ']))
            .any(|(c, next)| c == option && next == ':');
        let known = option != ':' && optstring.contains(option);

        if !known {
            env.variables.unset("OPTARG").ok();
            if silent {
                assign(env, "OPTARG", &option.to_string());
            } else {
                env.print_error(&format!("getopts: -{option}: unknown option"));
            }
            save_state(env, index, offset, &arguments);
            assign(env, &name, "?");
            return Continue(ExitStatus::SUCCESS);
        }

        if takes_argument {
            let (value, next_index) = if argument.len() > offset {
                (argument[offset..].to_string(), index + 1)
            } else if let Some(next) = arguments.get(index) {
                (next.clone(), index + 2)
            } else {
                // Missing option argument
                env.variables.unset("OPTARG").ok();
                if silent {
                    assign(env, "OPTARG", &option.to_string());
                    assign(env, &name, ":");
                } else {
                    env.print_error(&format!("getopts: -{option}: argument missing"));
                    assign(env, &name, "?");
                }
                env.getopts_state = None;
                assign(env, "OPTIND", &(index + 1).to_string());
                return Continue(ExitStatus::SUCCESS);
            };
            assign(env, "OPTARG", &value);
            env.getopts_state = None;
            assign(env, "OPTIND", &next_index.to_string());
            assign(env, &name, &option.to_string());
            return Continue(ExitStatus::SUCCESS);
        }

        env.variables.unset("OPTARG").ok();
        save_state(env, index, offset, &arguments);
        assign(env, &name, &option.to_string());
        return Continue(ExitStatus::SUCCESS);
    }
}

/// Records the scan position for the next invocation.
fn save_state(env: &mut Env, index: usize, offset: usize, arguments: &[String]) {
    let exhausted = arguments
        .get(index - 1)
        .map(|argument| offset >= argument.len())
        .unwrap_or(true);
    let (optind, offset) = if exhausted {
        (index + 1, 0)
    } else {
        (index, offset)
    };
    env.getopts_state = Some((optind, offset));
    assign(env, "OPTIND", &optind.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoke(env: &mut Env, args: &[&str]) -> ExitStatus {
        match main(env, Field::dummies(args.to_vec())) {
            Continue(status) => status,
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn scans_simple_options() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["-a".into(), "-b".into(), "operand".into()];

        assert_eq!(invoke(&mut env, &["ab", "opt"]), ExitStatus::SUCCESS);
        assert_eq!(env.variables.value("opt"), Some("a"));

        assert_eq!(invoke(&mut env, &["ab", "opt"]), ExitStatus::SUCCESS);
        assert_eq!(env.variables.value("opt"), Some("b"));

        // The scan ends at the first operand.
        assert_eq!(invoke(&mut env, &["ab", "opt"]), ExitStatus::FAILURE);
        assert_eq!(env.variables.value("opt"), Some("?"));
        assert_eq!(env.variables.value("OPTIND"), Some("3"));
    }

    #[test]
    fn grouped_options_are_scanned_one_at_a_time() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["-ab".into()];

        assert_eq!(invoke(&mut env, &["ab", "opt"]), ExitStatus::SUCCESS);
        assert_eq!(env.variables.value("opt"), Some("a"));
        assert_eq!(invoke(&mut env, &["ab", "opt"]), ExitStatus::SUCCESS);
        assert_eq!(env.variables.value("opt"), Some("b"));
        assert_eq!(invoke(&mut env, &["ab", "opt"]), ExitStatus::FAILURE);
    }

    #[test]
    fn option_arguments() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["-o".into(), "value".into(), "-xinline".into()];

        assert_eq!(invoke(&mut env, &["o:x:", "opt"]), ExitStatus::SUCCESS);
        assert_eq!(env.variables.value("opt"), Some("o"));
        assert_eq!(env.variables.value("OPTARG"), Some("value"));

        assert_eq!(invoke(&mut env, &["o:x:", "opt"]), ExitStatus::SUCCESS);
        assert_eq!(env.variables.value("opt"), Some("x"));
        assert_eq!(env.variables.value("OPTARG"), Some("inline"));

        assert_eq!(invoke(&mut env, &["o:x:", "opt"]), ExitStatus::FAILURE);
    }

    #[test]
    fn double_dash_ends_the_scan() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["--".into(), "-a".into()];
        assert_eq!(invoke(&mut env, &["a", "opt"]), ExitStatus::FAILURE);
        assert_eq!(env.variables.value("OPTIND"), Some("2"));
    }

    #[test]
    fn unknown_option_in_silent_mode() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["-q".into()];
        assert_eq!(invoke(&mut env, &[":a", "opt"]), ExitStatus::SUCCESS);
        assert_eq!(env.variables.value("opt"), Some("?"));
        assert_eq!(env.variables.value("OPTARG"), Some("q"));
    }

    #[test]
    fn missing_argument_in_silent_mode() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["-o".into()];
        assert_eq!(invoke(&mut env, &[":o:", "opt"]), ExitStatus::SUCCESS);
        assert_eq!(env.variables.value("opt"), Some(":"));
        assert_eq!(env.variables.value("OPTARG"), Some("o"));
    }

    #[test]
    fn explicit_arguments_override_positional_parameters() {
        let mut env = Env::new("slash");
        env.positional_params = vec!["-z".into()];
        assert_eq!(
            invoke(&mut env, &["a", "opt", "-a"]),
            ExitStatus::SUCCESS
        );
        assert_eq!(env.variables.value("opt"), Some("a"));
    }
}

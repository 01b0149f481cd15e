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

//! Shell startup
//!
//! This crate ties the pieces together: it parses the invocation
//! according to
//!
//! ```text
//! slash [-abCefmnuvx] [-o option]... [+abCefmnuvx] [+o option]...
//!       [-c command_string [command_name [argument...]]
//!       | -s [argument...] | script_file [argument...]]
//! ```
//!
//! seeds the environment from the process environment, installs the
//! built-in registry and drives the read–eval loop over the selected
//! input source.

use slash_env::option::{OptionSet, ShellOption};
use slash_env::semantics::{Divert, ExitStatus};
use slash_env::system::{self, Errno};
use slash_env::variable::VariableSet;
use slash_env::Env;
use slash_semantics::runner::{read_eval_loop, FdInput, Input, StringInput};
use slash_semantics::trap::run_exit_trap;
use std::ffi::CString;
use std::ops::ControlFlow::{Break, Continue};
use thiserror::Error;

/// Where the shell reads commands from
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// `-c`: the given command string
    Command {
        command: String,
        name: Option<String>,
    },
    /// `-s` (or no operands): standard input
    Stdin,
    /// A script file operand
    Script { path: String },
}

/// Parsed invocation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    pub source: Source,
    pub options: OptionSet,
    /// Force interactive mode (`-i`)
    pub interactive: Option<bool>,
    /// Positional parameters
    pub arguments: Vec<String>,
}

/// Invocation syntax error
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvocationError {
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("option `-o` requires an argument")]
    MissingOptionName,
    #[error("option `-c` requires a command string")]
    MissingCommandString,
}

/// Parses the command-line arguments (not including `argv[0]`).
pub fn parse_arguments(args: &[String]) -> Result<Invocation, InvocationError> {
    let mut options = OptionSet::new();
    let mut interactive = None;
    let mut command_mode = false;
    let mut stdin_mode = false;

    let mut index = 0;
    while let Some(arg) = args.get(index) {
        match arg.as_str() {
            // A lone `-` or `--` ends option processing and is ignored.
            "-" | "--" => {
                index += 1;
                break;
            }
            "-o" | "+o" => {
                let on = arg == "-o";
                index += 1;
                let Some(name) = args.get(index) else {
                    return Err(InvocationError::MissingOptionName);
                };
                let option = name
                    .parse::<ShellOption>()
                    .map_err(|_| InvocationError::UnknownOption(format!("-o {name}")))?;
                options.set_to(option, on);
            }
            arg if arg.starts_with('-') || arg.starts_with('+') => {
                let on = arg.starts_with('-');
                for letter in arg[1..].chars() {
                    match letter {
                        'c' if on => command_mode = true,
                        's' if on => stdin_mode = true,
                        'i' => interactive = Some(on),
                        letter => match ShellOption::from_short_name(letter) {
                            Some(option) => options.set_to(option, on),
                            None => {
                                return Err(InvocationError::UnknownOption(format!(
                                    "{}{letter}",
                                    &arg[..1]
                                )))
                            }
                        },
                    }
                }
            }
            _ => break,
        }
        index += 1;
    }
    let operands = &args[index..];

    if command_mode {
        let Some((command, rest)) = operands.split_first() else {
            return Err(InvocationError::MissingCommandString);
        };
        let (name, arguments) = match rest.split_first() {
            Some((name, arguments)) => (Some(name.clone()), arguments.to_vec()),
            None => (None, Vec::new()),
        };
        return Ok(Invocation {
            source: Source::Command {
                command: command.clone(),
                name,
            },
            options,
            interactive,
            arguments,
        });
    }

    if stdin_mode || operands.is_empty() {
        return Ok(Invocation {
            source: Source::Stdin,
            options,
            interactive,
            arguments: operands.to_vec(),
        });
    }

    let (path, arguments) = operands.split_first().unwrap();
    Ok(Invocation {
        source: Source::Script { path: path.clone() },
        options,
        interactive,
        arguments: arguments.to_vec(),
    })
}

/// Seeds variables the shell guarantees to exist.
fn default_variables(variables: &mut VariableSet) {
    if variables.value("IFS").is_none() {
        let _ = variables.assign("IFS", " \t\n");
    }
    if variables.value("PS1").is_none() {
        let _ = variables.assign("PS1", "$ ");
    }
    if variables.value("PS2").is_none() {
        let _ = variables.assign("PS2", "> ");
    }
    if variables.value("PATH").is_none() {
        let _ = variables.assign("PATH", "/usr/bin:/bin");
    }
    if variables.value("PWD").is_none() {
        if let Ok(pwd) = system::getcwd() {
            let _ = variables.assign("PWD", pwd.display().to_string());
            variables.export("PWD");
        }
    }
    let _ = variables.assign("OPTIND", "1");
}

/// Runs the shell and returns its final exit status.
pub fn run(shell_name: &str, args: &[String]) -> ExitStatus {
    let invocation = match parse_arguments(args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let message = format!("{shell_name}: {error}\n");
            let _ = system::write_all(2, message.as_bytes());
            return ExitStatus::ERROR;
        }
    };

    let name = match &invocation.source {
        Source::Command {
            name: Some(name), ..
        } => name.clone(),
        Source::Script { path } => path.clone(),
        _ => shell_name.to_string(),
    };

    let mut env = Env::new(name);
    env.variables = VariableSet::from_environment();
    default_variables(&mut env.variables);
    env.builtins = slash_builtin::builtins();
    env.options = invocation.options;
    env.positional_params = invocation.arguments.clone();

    let interactive = invocation.interactive.unwrap_or_else(|| {
        matches!(invocation.source, Source::Stdin) && system::isatty(0) && system::isatty(2)
    });
    env.options.set_to(ShellOption::Interactive, interactive);

    // An interactive shell sources the file named by $ENV at startup.
    if interactive {
        if let Some(startup) = env.variables.value("ENV").map(String::from) {
            if let Ok(source) = std::fs::read_to_string(&startup) {
                let _ = slash_semantics::runner::eval_fragment(&mut env, &source);
            }
        }
    }

    let mut input: Box<dyn Input> = match &invocation.source {
        Source::Command { command, .. } => Box::new(StringInput::new(command.clone())),
        Source::Stdin => Box::new(FdInput::new(0)),
        Source::Script { path } => {
            let Ok(c_path) = CString::new(path.as_str()) else {
                env.print_error(&format!("{path}: invalid file name"));
                return ExitStatus::NOT_FOUND;
            };
            match system::open(&c_path, libc::O_RDONLY | libc::O_CLOEXEC, 0) {
                Ok(fd) => Box::new(FdInput::new(fd)),
                Err(errno) => {
                    env.print_error(&format!("{path}: {errno}"));
                    return if errno == Errno::ENOENT {
                        ExitStatus::NOT_FOUND
                    } else {
                        ExitStatus::NOEXEC
                    };
                }
            }
        }
    };

    let status = match read_eval_loop(&mut env, &mut *input) {
        Continue(()) => env.exit_status,
        Break(Divert::Exit(status)) => status.unwrap_or(env.exit_status),
        Break(_) => env.exit_status,
    };
    env.exit_status = status;
    run_exit_trap(&mut env);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_reads_stdin() {
        let invocation = parse_arguments(&[]).unwrap();
        assert_eq!(invocation.source, Source::Stdin);
        assert!(invocation.arguments.is_empty());
    }

    #[test]
    fn command_string_mode() {
        let invocation = parse_arguments(&strings(&["-c", "echo hi"])).unwrap();
        assert_matches!(invocation.source, Source::Command { command, name } => {
            assert_eq!(command, "echo hi");
            assert_eq!(name, None);
        });

        let invocation =
            parse_arguments(&strings(&["-c", "echo hi", "myname", "a", "b"])).unwrap();
        assert_matches!(invocation.source, Source::Command { name, .. } => {
            assert_eq!(name.as_deref(), Some("myname"));
        });
        assert_eq!(invocation.arguments, ["a", "b"]);
    }

    #[test]
    fn command_mode_without_string_is_an_error() {
        assert_eq!(
            parse_arguments(&strings(&["-c"])),
            Err(InvocationError::MissingCommandString)
        );
    }

    #[test]
    fn script_mode() {
        let invocation = parse_arguments(&strings(&["script.sh", "x"])).unwrap();
        assert_matches!(invocation.source, Source::Script { path } => {
            assert_eq!(path, "script.sh");
        });
        assert_eq!(invocation.arguments, ["x"]);
    }

    #[test]
    fn stdin_mode_with_arguments() {
        let invocation = parse_arguments(&strings(&["-s", "a", "b"])).unwrap();
        assert_eq!(invocation.source, Source::Stdin);
        assert_eq!(invocation.arguments, ["a", "b"]);
    }

    #[test]
    fn option_letters() {
        let invocation = parse_arguments(&strings(&["-ex", "+f", "script"])).unwrap();
        assert!(invocation.options.is_on(ShellOption::ErrExit));
        assert!(invocation.options.is_on(ShellOption::XTrace));
        assert!(!invocation.options.is_on(ShellOption::NoGlob));
    }

    #[test]
    fn long_options() {
        let invocation = parse_arguments(&strings(&["-o", "nounset"])).unwrap();
        assert!(invocation.options.is_on(ShellOption::NoUnset));
        assert_eq!(
            parse_arguments(&strings(&["-o"])),
            Err(InvocationError::MissingOptionName)
        );
        assert_matches!(
            parse_arguments(&strings(&["-o", "wombat"])),
            Err(InvocationError::UnknownOption(_))
        );
    }

    #[test]
    fn unknown_letter_is_an_error() {
        assert_matches!(
            parse_arguments(&strings(&["-q"])),
            Err(InvocationError::UnknownOption(_))
        );
    }

    #[test]
    fn lone_dash_is_ignored() {
        let invocation = parse_arguments(&strings(&["-e", "-", "script"])).unwrap();
        assert_matches!(invocation.source, Source::Script { path } => {
            assert_eq!(path, "script");
        });
    }

    #[test]
    fn double_dash_ends_options() {
        let invocation = parse_arguments(&strings(&["--", "-e"])).unwrap();
        assert_matches!(invocation.source, Source::Script { path } => {
            assert_eq!(path, "-e");
        });
    }

    #[test]
    fn running_a_command_string() {
        let status = run("slash", &strings(&["-c", "exit 7"]));
        assert_eq!(status, ExitStatus(7));
    }

    #[test]
    fn running_a_missing_script() {
        let status = run("slash", &strings(&["/definitely/not/a/script"]));
        assert_eq!(status, ExitStatus::NOT_FOUND);
    }
}

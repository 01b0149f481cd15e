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

//! The read–eval loop
//!
//! [`read_eval_loop`] drives the shell: it reads input line by line,
//! tokenizes and parses one newline-terminated command at a time, and
//! executes it before the next line is read, so that alias definitions
//! take effect for subsequent lines. When the accumulated input is
//! syntactically incomplete (open quote, pending here-document, unfinished
//! compound command), the loop reads another line — the interactive prompt
//! switches to `$PS2` — and re-parses from the start of the unfinished
//! command.
//!
//! [`run_string`] and [`eval_fragment`] feed a complete in-memory source
//! through the same machinery for `-c`, `eval`, `.`, command substitution
//! and trap actions.

use crate::command::Command;
use crate::trap::run_pending_traps;
use slash_env::option::ShellOption;
use slash_env::semantics::{Divert, ExitStatus, Result};
use slash_env::system::{self, Errno};
use slash_env::Env;
use slash_syntax::lexer::{Lexer, TokenizeResult};
use slash_syntax::parser::Parser;
use slash_syntax::syntax::List;
use std::ops::ControlFlow::{Break, Continue};

/// Source of shell input lines
pub trait Input {
    /// Reads the next line, including its terminating newline.
    ///
    /// Returns `None` at the end of input.
    fn next_line(&mut self) -> std::result::Result<Option<String>, Errno>;
}

/// Input reading from a file descriptor
///
/// Bytes are read one at a time so the shell never consumes input beyond
/// the newline it needs; commands like `read` that share the descriptor
/// see everything after the current line.
#[derive(Debug)]
pub struct FdInput {
    fd: std::ffi::c_int,
}

impl FdInput {
    #[must_use]
    pub fn new(fd: std::ffi::c_int) -> FdInput {
        FdInput { fd }
    }
}

impl Input for FdInput {
    fn next_line(&mut self) -> std::result::Result<Option<String>, Errno> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match system::read(self.fd, &mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(errno),
            }
        }
        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&line).into_owned()))
        }
    }
}

/// Input over an in-memory string
#[derive(Debug)]
pub struct StringInput {
    content: String,
    position: usize,
}

impl StringInput {
    #[must_use]
    pub fn new<S: Into<String>>(content: S) -> StringInput {
        StringInput {
            content: content.into(),
            position: 0,
        }
    }
}

impl Input for StringInput {
    fn next_line(&mut self) -> std::result::Result<Option<String>, Errno> {
        let rest = &self.content[self.position..];
        if rest.is_empty() {
            return Ok(None);
        }
        let end = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
        self.position += end;
        Ok(Some(rest[..end].to_string()))
    }
}

/// Reads, parses and executes commands until the input is exhausted.
///
/// Lexical and syntax errors are reported on standard error with exit
/// status 2; they terminate a non-interactive shell but only discard the
/// offending line in an interactive one.
pub fn read_eval_loop(env: &mut Env, input: &mut dyn Input) -> Result {
    let interactive = env.options.is_on(ShellOption::Interactive);
    let mut pending = String::new();

    loop {
        run_pending_traps(env)?;

        if interactive {
            let prompt = if pending.is_empty() {
                env.variables.value("PS1").unwrap_or("$ ").to_string()
            } else {
                env.variables.value("PS2").unwrap_or("> ").to_string()
            };
            let _ = system::write_all(2, prompt.as_bytes());
        }

        let line = match input.next_line() {
            Ok(line) => line,
            Err(errno) => {
                env.print_error(&format!("cannot read input: {errno}"));
                env.exit_status = ExitStatus::ERROR;
                return Break(Divert::Exit(Some(ExitStatus::ERROR)));
            }
        };
        let at_end = line.is_none();
        if let Some(line) = line {
            if env.options.is_on(ShellOption::Verbose) {
                let _ = system::write_all(2, line.as_bytes());
            }
            pending.push_str(&line);
        } else if pending.is_empty() {
            return Continue(());
        }

        match parse_pending(env, &pending, at_end) {
            Parsed::Incomplete => {
                if at_end {
                    // The input ended inside an unfinished command.
                    env.print_error("unexpected end of input");
                    return syntax_error_disposition(env, interactive, &mut pending);
                }
            }
            Parsed::Error => {
                let disposition = syntax_error_disposition(env, interactive, &mut pending);
                if disposition.is_break() || at_end {
                    return disposition;
                }
            }
            Parsed::Complete(lists) => {
                pending.clear();
                if !env.options.is_on(ShellOption::NoExec) {
                    for list in &lists {
                        list.execute(env)?;
                        run_pending_traps(env)?;
                    }
                }
                if at_end {
                    return Continue(());
                }
            }
        }
    }
}

/// Result of attempting to parse the accumulated input
enum Parsed {
    /// More input is needed.
    Incomplete,
    /// The input is malformed; the error has been reported.
    Error,
    /// The input parsed into these command lists.
    Complete(Vec<List>),
}

/// Tokenizes and parses the accumulated input from scratch.
fn parse_pending(env: &mut Env, pending: &str, at_end: bool) -> Parsed {
    let mut lexer = Lexer::new();
    lexer.append_input(pending);
    if at_end {
        lexer.finish_input();
    }
    match lexer.tokenize() {
        Ok(TokenizeResult::Complete) => {}
        Ok(TokenizeResult::Incomplete) => return Parsed::Incomplete,
        Err(error) => {
            env.print_error(&format!("{}: {}", error.location, error));
            return Parsed::Error;
        }
    }

    let mut lists = Vec::new();
    let mut parser = Parser::new(&mut lexer, &env.aliases);
    loop {
        match parser.command_line() {
            Ok(Some(list)) => lists.push(list),
            Ok(None) => return Parsed::Complete(lists),
            Err(error) if error.is_incomplete() && !at_end => return Parsed::Incomplete,
            Err(error) => {
                drop(parser);
                env.print_error(&format!("{}: {}", error.location, error));
                return Parsed::Error;
            }
        }
    }
}

/// Applies the §7 policy for a lexical or syntax error.
fn syntax_error_disposition(env: &mut Env, interactive: bool, pending: &mut String) -> Result {
    env.exit_status = ExitStatus::ERROR;
    pending.clear();
    if interactive {
        Continue(())
    } else {
        Break(Divert::Exit(Some(ExitStatus::ERROR)))
    }
}

/// Parses and executes a complete source string, reporting errors.
///
/// Used for `eval`, `.`, trap actions and command-line `-c` bodies that
/// are already fully available.
pub fn eval_fragment(env: &mut Env, source: &str) -> Result {
    let mut lexer = Lexer::with_source(source);
    match lexer.tokenize() {
        Ok(TokenizeResult::Complete) => {}
        Ok(TokenizeResult::Incomplete) => {
            env.print_error("unexpected end of input");
            env.exit_status = ExitStatus::ERROR;
            return Continue(());
        }
        Err(error) => {
            env.print_error(&format!("{}: {}", error.location, error));
            env.exit_status = ExitStatus::ERROR;
            return Continue(());
        }
    }

    let program = {
        let mut parser = Parser::new(&mut lexer, &env.aliases);
        match parser.program() {
            Ok(program) => program,
            Err(error) => {
                drop(parser);
                env.print_error(&format!("{}: {}", error.location, error));
                env.exit_status = ExitStatus::ERROR;
                return Continue(());
            }
        }
    };
    program.execute(env)
}

/// Runs a complete source string to completion, returning the final exit
/// status.
///
/// This is the entry point for forked children (command substitution,
/// subshell re-entry): diverts are consumed here.
#[must_use]
pub fn run_string(env: &mut Env, source: &str) -> ExitStatus {
    match eval_fragment(env, source) {
        Continue(()) => env.exit_status,
        Break(Divert::Exit(status)) => status.unwrap_or(env.exit_status),
        Break(_) => env.exit_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::test_env;

    #[test]
    fn string_input_yields_lines() {
        let mut input = StringInput::new("one\ntwo\nthree");
        assert_eq!(input.next_line().unwrap().as_deref(), Some("one\n"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("two\n"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("three"));
        assert_eq!(input.next_line().unwrap(), None);
    }

    #[test]
    fn loop_executes_commands_line_by_line() {
        let mut env = test_env();
        let mut input = StringInput::new("setvar a=1\nsetvar b=2\n");
        let result = read_eval_loop(&mut env, &mut input);
        assert_eq!(result, Continue(()));
        assert_eq!(env.variables.value("a"), Some("1"));
        assert_eq!(env.variables.value("b"), Some("2"));
    }

    #[test]
    fn loop_joins_continuation_lines() {
        let mut env = test_env();
        let mut input = StringInput::new("if true\nthen setvar x=1\nfi\n");
        let result = read_eval_loop(&mut env, &mut input);
        assert_eq!(result, Continue(()));
        assert_eq!(env.variables.value("x"), Some("1"));
    }

    #[test]
    fn syntax_error_exits_a_script_with_status_2() {
        let mut env = test_env();
        let mut input = StringInput::new("fi\nsetvar x=1\n");
        let result = read_eval_loop(&mut env, &mut input);
        assert_eq!(result, Break(Divert::Exit(Some(ExitStatus::ERROR))));
        assert_eq!(env.variables.value("x"), None);
    }

    #[test]
    fn unterminated_command_at_eof_is_an_error() {
        let mut env = test_env();
        let mut input = StringInput::new("if true; then setvar x=1\n");
        let result = read_eval_loop(&mut env, &mut input);
        assert_eq!(result, Break(Divert::Exit(Some(ExitStatus::ERROR))));
    }

    #[test]
    fn noexec_parses_but_does_not_run() {
        let mut env = test_env();
        env.options.set_to(ShellOption::NoExec, true);
        let mut input = StringInput::new("setvar x=1\n");
        let result = read_eval_loop(&mut env, &mut input);
        assert_eq!(result, Continue(()));
        assert_eq!(env.variables.value("x"), None);
    }

    #[test]
    fn eval_fragment_runs_source() {
        let mut env = test_env();
        let result = eval_fragment(&mut env, "setvar x=42");
        assert_eq!(result, Continue(()));
        assert_eq!(env.variables.value("x"), Some("42"));
    }

    #[test]
    fn eval_fragment_reports_syntax_errors() {
        let mut env = test_env();
        let result = eval_fragment(&mut env, "if then fi");
        assert_eq!(result, Continue(()));
        assert_eq!(env.exit_status, ExitStatus::ERROR);
    }

    #[test]
    fn run_string_returns_the_final_status() {
        let mut env = test_env();
        assert_eq!(run_string(&mut env, "status 3"), ExitStatus(3));
    }
}

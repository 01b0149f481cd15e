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

//! Initial expansion: word parts to attributed characters
//!
//! This stage performs tilde expansion, parameter expansion, command
//! substitution and arithmetic expansion, producing the attributed
//! characters the later stages operate on.

use super::attr::{FieldsBuilder, Origin};
use super::{Error, ErrorCause, Result};
use slash_env::system::{self, Errno, ForkResult};
use slash_env::Env;
use slash_syntax::source::Span;
use slash_syntax::syntax::WordPart;

/// Context the parts are expanded in
#[derive(Clone, Copy, Debug)]
pub struct PartContext {
    /// Whether an enclosing quoted context applies, as for the word of a
    /// switch in a double-quoted parameter expansion
    pub quoted: bool,
    /// Origin assigned to literal characters
    ///
    /// Literal text of an ordinary word keeps [`Origin::Literal`]; the
    /// word of a parameter-expansion switch produces expansion output,
    /// so its unquoted literal characters are subject to field splitting.
    pub literal_origin: Origin,
}

impl PartContext {
    /// Context for an ordinary word
    pub const WORD: PartContext = PartContext {
        quoted: false,
        literal_origin: Origin::Literal,
    };
}

/// Expands a sequence of word parts into the builder.
pub fn expand_parts(
    env: &mut Env,
    parts: &[WordPart],
    context: PartContext,
    span: Span,
    builder: &mut FieldsBuilder,
) -> Result<()> {
    for part in parts {
        match part {
            WordPart::Literal {
                value,
                single_quoted,
                double_quoted,
            } => {
                let quoted = context.quoted || *single_quoted || *double_quoted;
                if quoted {
                    builder.push_quoting();
                }
                let origin = if quoted {
                    Origin::Literal
                } else {
                    context.literal_origin
                };
                builder.push_str(value, origin, quoted);
            }
            WordPart::Tilde(name) => {
                let value = tilde_value(env, name);
                builder.push_str(&value, Origin::HardExpansion, context.quoted);
            }
            WordPart::Param { param, quoted } => {
                super::param::expand_param(env, param, *quoted || context.quoted, builder, span)?;
            }
            WordPart::CommandSubst { content, quoted, .. } => {
                let quoted = *quoted || context.quoted;
                let output = command_substitution(env, content, span)?;
                if quoted {
                    builder.push_quoting();
                }
                builder.push_str(&output, Origin::SoftExpansion, quoted);
            }
            WordPart::Arith { expression, quoted } => {
                let quoted = *quoted || context.quoted;
                let value = arithmetic(env, expression, span)?;
                if quoted {
                    builder.push_quoting();
                }
                builder.push_str(&value, Origin::SoftExpansion, quoted);
            }
        }
    }
    Ok(())
}

/// Computes the value a tilde prefix expands to.
///
/// A plain `~` is the value of `$HOME`; `~name` is the home directory of
/// the named user. Lookup is best-effort: on failure the literal prefix is
/// kept.
fn tilde_value(env: &Env, name: &str) -> String {
    if name.is_empty() {
        match env.variables.value("HOME") {
            Some(home) => home.to_string(),
            None => "~".to_string(),
        }
    } else {
        match system::home_directory(name) {
            Some(dir) => dir.display().to_string(),
            None => format!("~{name}"),
        }
    }
}

/// Performs a command substitution, capturing the child's standard
/// output.
///
/// The inner text is re-entered through the lexer, parser and executor in
/// a forked subshell. Trailing newlines are removed from the captured
/// output. The exit status of the substitution is recorded in the
/// environment; a simple command with no command name completes with it.
fn command_substitution(env: &mut Env, content: &str, span: Span) -> Result<String> {
    let error = |errno: Errno| Error {
        cause: ErrorCause::CommandSubst(errno),
        span,
    };

    let (read_fd, write_fd) = system::pipe().map_err(error)?;
    match system::fork().map_err(error)? {
        ForkResult::Child => {
            system::close(read_fd);
            let _ = system::dup_over(write_fd, 1);
            if write_fd != 1 {
                system::close(write_fd);
            }
            env.enter_subshell();
            let status = crate::runner::run_string(env, content);
            system::exit_process(status);
        }
        ForkResult::Parent { child } => {
            system::close(write_fd);
            let mut output = Vec::new();
            let mut buffer = [0; 4096];
            loop {
                match system::read(read_fd, &mut buffer) {
                    Ok(0) => break,
                    Ok(count) => output.extend_from_slice(&buffer[..count]),
                    Err(Errno::EINTR) => continue,
                    Err(errno) => {
                        system::close(read_fd);
                        return Err(error(errno));
                    }
                }
            }
            system::close(read_fd);

            loop {
                match system::wait_for_child(child) {
                    Ok(Some((_, status))) => {
                        env.last_command_subst_status = Some(status.exit_status());
                        break;
                    }
                    Ok(None) | Err(Errno::EINTR) => continue,
                    Err(errno) => return Err(error(errno)),
                }
            }

            let mut output = String::from_utf8_lossy(&output).into_owned();
            while output.ends_with('\n') {
                output.pop();
            }
            Ok(output)
        }
    }
}

/// Variable access adapter for the arithmetic evaluator
struct ArithVariables<'e> {
    env: &'e mut Env,
}

impl slash_arith::Env for ArithVariables<'_> {
    type Error = slash_env::variable::AssignError;

    fn get(&self, name: &str) -> Option<String> {
        self.env.variables.value(name).map(String::from)
    }

    fn assign(&mut self, name: &str, value: i64) -> std::result::Result<(), Self::Error> {
        self.env.variables.assign(name, value.to_string())
    }
}

/// Evaluates an arithmetic expansion, formatting the result in base 10.
fn arithmetic(env: &mut Env, expression: &str, span: Span) -> Result<String> {
    let mut variables = ArithVariables { env };
    match slash_arith::eval(expression, &mut variables) {
        Ok(value) => Ok(value.to_string()),
        Err(error) => {
            let cause = match error.cause {
                slash_arith::ErrorCause::AssignVariable(e) => ErrorCause::AssignVariable(e),
                cause => ErrorCause::Arith {
                    message: cause.to_string(),
                },
            };
            Err(Error { cause, span })
        }
    }
}

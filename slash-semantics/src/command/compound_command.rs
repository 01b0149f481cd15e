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

//! Compound command semantics: groups, subshells, conditionals and loops

use super::{child_exit, Command};
use crate::expansion::{expand_pattern, expand_word_single, expand_words};
use crate::trap::run_pending_traps;
use slash_env::option::ShellOption;
use slash_env::semantics::{Divert, ExitStatus, Field, Result};
use slash_env::system::{self, ChildStatus, Errno, ForkResult};
use slash_env::{Env, Frame};
use slash_syntax::syntax::{CaseItem, CompoundCommand, ElifThen, FullCompoundCommand, List, Word};
use std::ops::ControlFlow::{Break, Continue};

impl Command for FullCompoundCommand {
    fn execute(&self, env: &mut Env) -> Result {
        let saved_fds = match crate::redir::apply(env, &self.redirs) {
            Ok(saved) => saved,
            Err(error) => {
                env.print_error(&error.to_string());
                env.exit_status = ExitStatus::FAILURE;
                return Continue(());
            }
        };
        let result = self.command.execute(env);
        crate::redir::restore(env, saved_fds);
        result
    }
}

impl Command for CompoundCommand {
    fn execute(&self, env: &mut Env) -> Result {
        use CompoundCommand::*;
        match self {
            Grouping(body) => body.execute(env),
            Subshell(body) => execute_subshell(env, body),
            For { name, values, body } => execute_for(env, name, values.as_deref(), body),
            While { condition, body } => execute_loop(env, condition, body, false),
            Until { condition, body } => execute_loop(env, condition, body, true),
            If {
                condition,
                body,
                elifs,
                r#else,
            } => execute_if(env, condition, body, elifs, r#else.as_ref()),
            Case { subject, items } => execute_case(env, subject, items),
        }
    }
}

/// Runs a list in a forked subshell.
///
/// State mutations in the child do not leak out; the parent's exit status
/// becomes that of the child.
fn execute_subshell(env: &mut Env, body: &List) -> Result {
    match system::fork() {
        Ok(ForkResult::Child) => {
            env.enter_subshell();
            let result = body.execute(env);
            child_exit(env, result);
        }
        Ok(ForkResult::Parent { child }) => loop {
            match system::wait_for_child(child) {
                Ok(Some((_, status))) => {
                    if let ChildStatus::Stopped = status {
                        continue;
                    }
                    env.exit_status = status.exit_status();
                    return Continue(());
                }
                Ok(None) => continue,
                Err(Errno::EINTR) => {
                    run_pending_traps(env)?;
                }
                Err(errno) => {
                    env.print_error(&format!("cannot await subshell: {errno}"));
                    env.exit_status = ExitStatus::NOEXEC;
                    return Continue(());
                }
            }
        },
        Err(errno) => {
            env.print_error(&format!("cannot start subshell: {errno}"));
            env.exit_status = ExitStatus::NOEXEC;
            Continue(())
        }
    }
}

/// What a loop should do after one body execution
enum LoopFlow {
    Next,
    Exit,
    Propagate(Divert),
}

/// Interprets the result of running a loop body (or condition), peeling
/// one level off `break`/`continue` counts.
fn loop_flow(result: Result) -> LoopFlow {
    match result {
        Continue(()) => LoopFlow::Next,
        Break(Divert::Break { count: 1 }) => LoopFlow::Exit,
        Break(Divert::Break { count }) => LoopFlow::Propagate(Divert::Break { count: count - 1 }),
        Break(Divert::Continue { count: 1 }) => LoopFlow::Next,
        Break(Divert::Continue { count }) => {
            LoopFlow::Propagate(Divert::Continue { count: count - 1 })
        }
        Break(other) => LoopFlow::Propagate(other),
    }
}

/// Executes a `for` loop.
fn execute_for(env: &mut Env, name: &Word, values: Option<&[Word]>, body: &List) -> Result {
    let name = name
        .to_string_if_literal()
        .expect("the parser validates for-loop variable names")
        .to_string();

    let fields: Vec<Field> = match values {
        Some(words) => match expand_words(env, words) {
            Ok(fields) => fields,
            Err(error) => {
                env.print_error(&format!("{}: {}", error.span, error));
                env.exit_status = ExitStatus::FAILURE;
                return Continue(());
            }
        },
        None => Field::dummies(env.positional_params.clone()),
    };

    let mut last_status = ExitStatus::SUCCESS;
    let mut env = env.push_frame(Frame::Loop);
    for field in fields {
        if let Err(error) = env.variables.assign(&name, field.value) {
            env.print_error(&error.to_string());
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
        if env.options.is_on(ShellOption::AllExport) {
            env.variables.export(&name);
        }

        match loop_flow(body.execute(&mut env)) {
            LoopFlow::Next => last_status = env.exit_status,
            LoopFlow::Exit => return Continue(()),
            LoopFlow::Propagate(divert) => return Break(divert),
        }
        run_pending_traps(&mut env)?;
    }
    env.exit_status = last_status;
    Continue(())
}

/// Executes a `while` loop (`until` is false) or an `until` loop.
fn execute_loop(env: &mut Env, condition: &List, body: &List, until: bool) -> Result {
    let mut last_status = ExitStatus::SUCCESS;
    let mut env = env.push_frame(Frame::Loop);
    loop {
        run_pending_traps(&mut env)?;

        let condition_result = {
            let mut env = env.push_frame(Frame::Condition);
            condition.execute(&mut env)
        };
        match loop_flow(condition_result) {
            LoopFlow::Next => {}
            LoopFlow::Exit => return Continue(()),
            LoopFlow::Propagate(divert) => return Break(divert),
        }
        if env.exit_status.is_successful() == until {
            break;
        }

        match loop_flow(body.execute(&mut env)) {
            LoopFlow::Next => last_status = env.exit_status,
            LoopFlow::Exit => return Continue(()),
            LoopFlow::Propagate(divert) => return Break(divert),
        }
    }
    env.exit_status = last_status;
    Continue(())
}

/// Executes an `if` clause.
fn execute_if(
    env: &mut Env,
    condition: &List,
    body: &List,
    elifs: &[ElifThen],
    r#else: Option<&List>,
) -> Result {
    {
        let mut env = env.push_frame(Frame::Condition);
        condition.execute(&mut env)?;
    }
    if env.exit_status.is_successful() {
        return body.execute(env);
    }

    for elif in elifs {
        {
            let mut env = env.push_frame(Frame::Condition);
            elif.condition.execute(&mut env)?;
        }
        if env.exit_status.is_successful() {
            return elif.body.execute(env);
        }
    }

    match r#else {
        Some(body) => body.execute(env),
        None => {
            env.exit_status = ExitStatus::SUCCESS;
            Continue(())
        }
    }
}

/// Executes a `case` clause.
///
/// The subject and the patterns expand without field splitting; the first
/// matching pattern selects its item and no further item is considered.
fn execute_case(env: &mut Env, subject: &Word, items: &[CaseItem]) -> Result {
    let subject = match expand_word_single(env, subject) {
        Ok(field) => field,
        Err(error) => {
            env.print_error(&format!("{}: {}", error.span, error));
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
    };

    for item in items {
        for pattern in &item.patterns {
            let pattern = match expand_pattern(env, pattern) {
                Ok(pattern) => pattern,
                Err(error) => {
                    env.print_error(&format!("{}: {}", error.span, error));
                    env.exit_status = ExitStatus::FAILURE;
                    return Continue(());
                }
            };
            if pattern.is_match(&subject.value) {
                env.exit_status = ExitStatus::SUCCESS;
                return item.body.execute(env);
            }
        }
    }

    env.exit_status = ExitStatus::SUCCESS;
    Continue(())
}

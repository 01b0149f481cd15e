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

//! Applying and undoing redirections
//!
//! [`apply`] performs a redirection list, saving the previous state of
//! each affected descriptor in the environment's descriptor table;
//! [`restore`] undoes them in reverse order. When a redirection in the
//! middle of a list fails, the ones already applied are undone before the
//! error is reported.

use crate::expansion::expand_text;
use slash_env::io::{Fd, SavedFd, MIN_SAVE_FD};
use slash_env::option::ShellOption;
use slash_env::system::{self, Errno, ForkResult};
use slash_env::Env;
use slash_syntax::syntax::{Redir, RedirBody, RedirOp};
use std::ffi::{c_int, CString};
use thiserror::Error;

/// Error performing a redirection
#[derive(Clone, Debug, Error)]
pub enum RedirError {
    /// Failure expanding the target word
    #[error("{0}")]
    Expansion(#[from] crate::expansion::Error),
    /// Failure opening the target file
    #[error("cannot open `{path}`: {errno}")]
    OpenFile { path: String, errno: Errno },
    /// `<&` / `>&` operand that is neither a number nor `-`
    #[error("`{operand}`: not a valid file descriptor")]
    InvalidFdOperand { operand: String },
    /// Failure duplicating a descriptor
    #[error("cannot duplicate file descriptor: {0}")]
    Dup(Errno),
    /// Failure saving the previous descriptor state
    #[error("cannot save file descriptor: {0}")]
    Save(Errno),
    /// Failure feeding a here-document
    #[error("cannot write here-document: {0}")]
    HereDoc(Errno),
    /// A path or body containing a NUL byte
    #[error("invalid file name")]
    InvalidPath,
}

/// Applies a redirection list.
///
/// On success the returned saves undo the redirections when passed to
/// [`restore`]. On failure everything already applied has been undone.
pub fn apply(env: &mut Env, redirs: &[Redir]) -> Result<Vec<SavedFd>, RedirError> {
    let mut saved = Vec::with_capacity(redirs.len());
    for redir in redirs {
        match apply_one(env, redir) {
            Ok(Some(save)) => saved.push(save),
            Ok(None) => {}
            Err(error) => {
                restore(env, saved);
                return Err(error);
            }
        }
    }
    Ok(saved)
}

/// Undoes redirections in reverse order of application.
pub fn restore(env: &mut Env, saved: Vec<SavedFd>) {
    for save in saved.into_iter().rev() {
        env.fd_table.restore(save);
    }
}

/// Makes applied redirections permanent by abandoning the saved state.
///
/// Used for the redirections of the `exec` special built-in.
pub fn discard(env: &mut Env, saved: Vec<SavedFd>) {
    for save in saved {
        env.fd_table.discard(save);
    }
}

/// Applies one redirection, returning the saved descriptor state.
///
/// A `{name}` redirection allocates a fresh descriptor that outlives the
/// command, so nothing is saved for it.
fn apply_one(env: &mut Env, redir: &Redir) -> Result<Option<SavedFd>, RedirError> {
    if let Some(name) = &redir.fd_location {
        let fd = open_fd_location(env, redir)?;
        // Assignment failure (read-only) surfaces as an expansion-level
        // error; the descriptor stays open as in other shells.
        if let Err(error) = env.variables.assign(name, fd.to_string()) {
            env.print_error(&error.to_string());
        }
        return Ok(None);
    }

    let target = redir.fd_or_default();
    let save = env.fd_table.save(target).map_err(RedirError::Save)?;
    match install(env, redir, target) {
        Ok(()) => Ok(Some(save)),
        Err(error) => {
            env.fd_table.restore(save);
            Err(error)
        }
    }
}

/// Opens the body of a `{name}` redirection at a free descriptor.
fn open_fd_location(env: &mut Env, redir: &Redir) -> Result<c_int, RedirError> {
    let RedirBody::Normal { operator, operand } = &redir.body else {
        // `{name}<<EOF`: open the here-document pipe at a fresh number.
        let RedirBody::HereDoc(here_doc) = &redir.body else {
            unreachable!();
        };
        let read = here_doc_fd(env, here_doc)?;
        let moved = system::dup_cloexec_from(read, MIN_SAVE_FD).map_err(RedirError::Dup)?;
        system::close(read);
        return Ok(moved);
    };
    let fd = open_file(env, *operator, operand)?;
    let moved = system::dup_cloexec_from(fd, MIN_SAVE_FD).map_err(RedirError::Dup)?;
    system::close(fd);
    Ok(moved)
}

/// Installs the redirection body at the target descriptor.
fn install(env: &mut Env, redir: &Redir, target: Fd) -> Result<(), RedirError> {
    match &redir.body {
        RedirBody::Normal { operator, operand } => match operator {
            RedirOp::FdIn | RedirOp::FdOut => {
                let operand = expand_text(env, operand)?;
                if operand == "-" {
                    system::close(target.0);
                    env.fd_table.record_close(target);
                    return Ok(());
                }
                let source: c_int = operand
                    .parse()
                    .map_err(|_| RedirError::InvalidFdOperand {
                        operand: operand.clone(),
                    })?;
                system::dup_over(source, target.0)
                    .map_err(|_| RedirError::InvalidFdOperand { operand })?;
                env.fd_table.record_redirection(target, None);
                Ok(())
            }
            _ => {
                let fd = open_file(env, *operator, operand)?;
                if fd != target.0 {
                    system::dup_over(fd, target.0).map_err(RedirError::Dup)?;
                    system::close(fd);
                }
                let path = expand_text(env, operand).ok();
                env.fd_table.record_redirection(target, path);
                Ok(())
            }
        },
        RedirBody::HereDoc(here_doc) => {
            let read = here_doc_fd(env, here_doc)?;
            if read != target.0 {
                system::dup_over(read, target.0).map_err(RedirError::Dup)?;
                system::close(read);
            }
            env.fd_table.record_redirection(target, None);
            Ok(())
        }
    }
}

/// Opens the file named by a redirection operand.
fn open_file(
    env: &mut Env,
    operator: RedirOp,
    operand: &slash_syntax::syntax::Word,
) -> Result<c_int, RedirError> {
    let path = expand_text(env, operand)?;
    let flags = match operator {
        RedirOp::FileIn => libc::O_RDONLY,
        RedirOp::FileInOut => libc::O_RDWR | libc::O_CREAT,
        RedirOp::FileOut => {
            if env.options.is_on(ShellOption::NoClobber) {
                libc::O_WRONLY | libc::O_CREAT | libc::O_EXCL
            } else {
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC
            }
        }
        RedirOp::FileClobber => libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
        RedirOp::FileAppend => libc::O_WRONLY | libc::O_CREAT | libc::O_APPEND,
        RedirOp::FdIn | RedirOp::FdOut => unreachable!("handled by the caller"),
    };
    let c_path = CString::new(path.as_str()).map_err(|_| RedirError::InvalidPath)?;
    system::open(&c_path, flags, 0o666).map_err(|errno| RedirError::OpenFile { path, errno })
}

/// Produces a readable descriptor delivering a here-document body.
///
/// The body is expanded unless the delimiter was quoted. Small bodies are
/// written into the pipe up front; larger ones are fed by a forked writer
/// so the command never deadlocks against a full pipe.
fn here_doc_fd(
    env: &mut Env,
    here_doc: &slash_syntax::syntax::HereDoc,
) -> Result<c_int, RedirError> {
    let content = here_doc
        .content
        .get()
        .expect("here-document content must be read before execution");
    let body = if here_doc.quoted {
        content
            .to_string_if_literal()
            .unwrap_or_default()
            .to_string()
    } else {
        expand_text(env, content)?
    };

    let (read, write) = system::pipe().map_err(RedirError::HereDoc)?;
    if body.len() <= 4096 {
        system::write_all(write, body.as_bytes()).map_err(RedirError::HereDoc)?;
        system::close(write);
        return Ok(read);
    }

    match system::fork().map_err(RedirError::HereDoc)? {
        ForkResult::Child => {
            system::close(read);
            let _ = system::write_all(write, body.as_bytes());
            system::exit_process(slash_env::semantics::ExitStatus::SUCCESS);
        }
        ForkResult::Parent { .. } => {
            system::close(write);
            Ok(read)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use slash_env::semantics::ExitStatus;
    use slash_syntax::alias::AliasSet;
    use slash_syntax::lexer::Lexer;
    use slash_syntax::parser::Parser;
    use std::io::Read;

    fn run(env: &mut Env, source: &str) {
        let mut lexer = Lexer::with_source(source);
        lexer.tokenize().unwrap();
        let aliases = AliasSet::new();
        let program = {
            let mut parser = Parser::new(&mut lexer, &aliases);
            parser.program().unwrap()
        };
        let _ = program.execute(env);
    }

    #[test]
    fn output_redirection_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out");
        let mut env = Env::new("slash");
        run(&mut env, &format!("> {}\n", path.display()));
        assert!(path.exists());
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
    }

    #[test]
    fn noclobber_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out");
        std::fs::write(&path, "keep").unwrap();

        let mut env = Env::new("slash");
        env.options.set_to(ShellOption::NoClobber, true);
        run(&mut env, &format!("> {}\n", path.display()));
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep");

        // `>|` clobbers regardless.
        run(&mut env, &format!(">| {}\n", path.display()));
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn descriptors_are_restored_after_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in");
        std::fs::write(&path, "data").unwrap();

        // Use a high descriptor so the test does not disturb the standard
        // input of the test harness.
        let mut env = Env::new("slash");
        let redirs = vec![Redir {
            fd: Some(Fd(21)),
            fd_location: None,
            body: RedirBody::Normal {
                operator: RedirOp::FileIn,
                operand: slash_syntax::syntax::Word::unquoted(
                    path.display().to_string(),
                    slash_syntax::source::Span::dummy(),
                ),
            },
        }];

        let saved = apply(&mut env, &redirs).unwrap();
        // Descriptor 21 now reads from the file.
        let mut buffer = [0u8; 4];
        let count = system::read(21, &mut buffer).unwrap();
        assert_eq!(&buffer[..count], b"data");
        restore(&mut env, saved);
        // Restoring re-closes the descriptor that was closed before.
        assert_eq!(system::read(21, &mut buffer), Err(Errno::EBADF));
    }

    #[test]
    fn missing_input_file_fails_without_running() {
        let mut env = Env::new("slash");
        let redirs = vec![Redir {
            fd: None,
            fd_location: None,
            body: RedirBody::Normal {
                operator: RedirOp::FileIn,
                operand: slash_syntax::syntax::Word::unquoted(
                    "/definitely/not/a/file",
                    slash_syntax::source::Span::dummy(),
                ),
            },
        }];
        let error = apply(&mut env, &redirs).unwrap_err();
        assert_matches::assert_matches!(error, RedirError::OpenFile { .. });
    }

    #[test]
    fn here_doc_feeds_the_redirected_descriptor() {
        let mut env = Env::new("slash");
        let source = "22<<EOF\nhello heredoc\nEOF\n";
        let mut lexer = Lexer::with_source(source);
        lexer.tokenize().unwrap();
        let aliases = AliasSet::new();
        let program = {
            let mut parser = Parser::new(&mut lexer, &aliases);
            parser.program().unwrap()
        };
        // Dig the redirection out of the parsed tree.
        let item = &program.0[0];
        let slash_syntax::syntax::Command::Simple(simple) =
            &item.and_or.first.commands[0]
        else {
            panic!("expected a simple command");
        };

        let saved = apply(&mut env, &simple.redirs).unwrap();
        let mut content = String::new();
        let mut reader = unsafe {
            use std::os::unix::io::FromRawFd;
            std::fs::File::from_raw_fd(libc::dup(22))
        };
        reader.read_to_string(&mut content).unwrap();
        restore(&mut env, saved);
        assert_eq!(content, "hello heredoc\n");
    }
}

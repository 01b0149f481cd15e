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

//! Semantics of the shell language
//!
//! This crate implements the execution half of the shell: [word
//! expansion](expansion), the tree-walking [executor](command),
//! [redirections](redir), [trap running](trap) and the
//! [read–eval loop](runner) that ties the front end to the executor.
//!
//! A syntax tree node is executed by calling
//! [`Command::execute`](command::Command::execute) with the shell
//! [environment](slash_env::Env).

pub mod command;
pub mod command_search;
pub mod expansion;
pub mod redir;
pub mod runner;
pub mod trap;

pub use command::Command;

#[doc(no_inline)]
pub use slash_env::semantics::*;

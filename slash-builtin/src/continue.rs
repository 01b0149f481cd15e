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

//! Continue built-in: resumes an enclosing loop

use crate::r#break::parse_count;
use slash_env::semantics::{Divert, ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::{Break, Continue};

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let Some(count) = parse_count(env, "continue", &args) else {
        return Continue(ExitStatus::ERROR);
    };
    let count = count.min(env.loop_depth());
    if count == 0 {
        env.print_error("continue: only meaningful in a loop");
        return Continue(ExitStatus::SUCCESS);
    }
    Break(Divert::Continue { count })
}

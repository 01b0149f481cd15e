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

//! Fg built-in
//!
//! Brings a background job to the foreground by waiting for it. The full
//! job-control facility (process groups and terminal handover) is
//! provided by the host environment; this shell core only transfers its
//! attention to the job.

use crate::common::{failure, output};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let job = match args.first() {
        Some(operand) => env.jobs.find_by_job_id(&operand.value),
        None => env.jobs.iter().last(),
    };
    let Some(job) = job else {
        return Continue(failure(env, "fg", "no current job"));
    };
    let pid = job.pid;
    let command = job.command.clone();

    let _ = output(env, &format!("{command}\n"));
    crate::wait::main(env, Field::dummies([pid.to_string()]))
}

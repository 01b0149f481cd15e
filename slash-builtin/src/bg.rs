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

//! Bg built-in
//!
//! Resumes a stopped job in the background by sending it `SIGCONT`.
//! Suspension itself is part of the external job-control facility, so
//! without it this built-in can only report the job it signalled.

use crate::common::{failure, output};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::system;
use slash_env::Env;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let job = match args.first() {
        Some(operand) => env.jobs.find_by_job_id(&operand.value),
        None => env.jobs.iter().last(),
    };
    let Some(job) = job else {
        return Continue(failure(env, "bg", "no current job"));
    };
    let pid = job.pid;
    let number = job.number;
    let command = job.command.clone();

    if let Err(errno) = system::kill(pid, Some(libc::SIGCONT)) {
        return Continue(failure(env, "bg", &format!("cannot resume job: {errno}")));
    }
    Continue(output(env, &format!("[{number}] {command}\n")))
}

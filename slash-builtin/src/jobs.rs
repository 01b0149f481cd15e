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

//! Jobs built-in
//!
//! Lists the known background jobs. Finished jobs are reported once and
//! then forgotten.

use crate::common::output;
use slash_env::job::JobStatus;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::fmt::Write;
use std::ops::ControlFlow::Continue;

pub fn main(env: &mut Env, _args: Vec<Field>) -> Result<ExitStatus> {
    env.jobs.poll();

    let mut out = String::new();
    for job in env.jobs.iter() {
        let state = match job.status {
            JobStatus::Running => "Running".to_string(),
            JobStatus::Done(status) if status.is_successful() => "Done".to_string(),
            JobStatus::Done(status) => format!("Done({status})"),
        };
        let _ = writeln!(out, "[{}] {:<10} {}", job.number, state, job.command);
    }
    env.jobs.drain_done();
    Continue(output(env, &out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slash_env::system::Pid;

    #[test]
    fn finished_jobs_are_forgotten_after_listing() {
        let mut env = Env::new("slash");
        env.jobs.add(Pid::from_raw(77777), "a &".to_string());
        env.jobs
            .set_status(Pid::from_raw(77777), JobStatus::Done(ExitStatus(0)));
        let _ = main(&mut env, Vec::new());
        assert!(env.jobs.is_empty());
    }
}

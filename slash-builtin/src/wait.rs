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

//! Wait built-in
//!
//! Without operands, waits for every known background job. With pid or
//! `%job` operands, waits for those jobs; the exit status is that of the
//! last operand (127 if it names no known process).

use slash_env::job::JobStatus;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::system::{self, ChildStatus, Errno, Pid};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

/// Waits for one process, running traps while interrupted.
fn await_pid(env: &mut Env, pid: Pid) -> Result<ExitStatus> {
    if let Some(job) = env.jobs.find_by_pid(pid) {
        if let JobStatus::Done(status) = job.status {
            env.jobs.remove(pid);
            return Continue(status);
        }
    }
    loop {
        match system::wait_for_child(pid) {
            Ok(Some((_, status))) => {
                if let ChildStatus::Stopped = status {
                    continue;
                }
                env.jobs.remove(pid);
                return Continue(status.exit_status());
            }
            Ok(None) => continue,
            Err(Errno::EINTR) => {
                slash_semantics::trap::run_pending_traps(env)?;
            }
            Err(_) => {
                env.jobs.remove(pid);
                return Continue(ExitStatus::NOT_FOUND);
            }
        }
    }
}

/// Resolves a `wait` operand to a process ID.
fn resolve(env: &Env, operand: &str) -> Option<Pid> {
    if operand.starts_with('%') {
        return env.jobs.find_by_job_id(operand).map(|job| job.pid);
    }
    operand.parse().ok().map(Pid::from_raw)
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    if args.is_empty() {
        let pids: Vec<Pid> = env.jobs.iter().map(|job| job.pid).collect();
        for pid in pids {
            await_pid(env, pid)?;
        }
        return Continue(ExitStatus::SUCCESS);
    }

    let mut status = ExitStatus::SUCCESS;
    for arg in &args {
        status = match resolve(env, &arg.value) {
            Some(pid) => await_pid(env, pid)?,
            None => ExitStatus::NOT_FOUND,
        };
    }
    Continue(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_with_no_jobs_succeeds() {
        let mut env = Env::new("slash");
        assert_eq!(main(&mut env, Vec::new()), Continue(ExitStatus::SUCCESS));
    }

    #[test]
    fn unknown_operand_reports_127() {
        let mut env = Env::new("slash");
        assert_eq!(
            main(&mut env, Field::dummies(["%7"])),
            Continue(ExitStatus::NOT_FOUND)
        );
    }

    #[test]
    fn already_reaped_job_reports_its_status() {
        let mut env = Env::new("slash");
        let pid = Pid::from_raw(4242);
        env.jobs.add(pid, "sleep &".to_string());
        env.jobs.set_status(pid, JobStatus::Done(ExitStatus(7)));
        assert_eq!(
            main(&mut env, Field::dummies(["4242"])),
            Continue(ExitStatus(7))
        );
        assert!(env.jobs.is_empty());
    }
}

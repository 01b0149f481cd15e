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

//! Background job bookkeeping
//!
//! The executor registers every asynchronous command here. The job list
//! feeds `$!`, and the `wait`, `jobs` and `kill` built-ins consult it.
//! Full job control (process groups, suspension, terminal handover) is an
//! external facility; this module only records processes.

use crate::semantics::ExitStatus;
use crate::system::{self, ChildStatus, Pid};

/// State of a background job
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobStatus {
    /// Still running (as far as the shell knows)
    Running,
    /// Terminated with the given status
    Done(ExitStatus),
}

/// One background job
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// Job number, as printed by `jobs` (`%1` is number 1)
    pub number: usize,
    /// Process ID of the job
    pub pid: Pid,
    /// Source text of the command, for display
    pub command: String,
    /// Last known state
    pub status: JobStatus,
}

/// List of background jobs
#[derive(Clone, Debug, Default)]
pub struct JobSet {
    jobs: Vec<Job>,
    /// Process ID of the last asynchronous command (`$!`)
    pub last_async_pid: Option<Pid>,
}

impl JobSet {
    /// Creates an empty job set.
    #[must_use]
    pub fn new() -> JobSet {
        Default::default()
    }

    /// Registers a new background job and returns its job number.
    pub fn add(&mut self, pid: Pid, command: String) -> usize {
        let number = self.jobs.iter().map(|j| j.number).max().unwrap_or(0) + 1;
        self.jobs.push(Job {
            number,
            pid,
            command,
            status: JobStatus::Running,
        });
        self.last_async_pid = Some(pid);
        number
    }

    /// Finds a job by process ID.
    #[must_use]
    pub fn find_by_pid(&self, pid: Pid) -> Option<&Job> {
        self.jobs.iter().find(|j| j.pid == pid)
    }

    /// Finds a job by a `%`-prefixed job ID.
    ///
    /// `%n` names job number n; `%%` and `%+` name the most recent job.
    #[must_use]
    pub fn find_by_job_id(&self, job_id: &str) -> Option<&Job> {
        let spec = job_id.strip_prefix('%')?;
        match spec {
            "%" | "+" => self.jobs.last(),
            _ => {
                let number: usize = spec.parse().ok()?;
                self.jobs.iter().find(|j| j.number == number)
            }
        }
    }

    /// Records that a process has terminated.
    pub fn set_status(&mut self, pid: Pid, status: JobStatus) {
        if let Some(job) = self.jobs.iter_mut().find(|j| j.pid == pid) {
            job.status = status;
        }
    }

    /// Reaps any terminated children and updates job states.
    pub fn poll(&mut self) {
        while let Ok(Some((pid, status))) = system::wait_any_nonblocking() {
            self.set_status(pid, JobStatus::Done(status.exit_status()));
            if let ChildStatus::Stopped = status {
                // No job control: a stopped child stays listed as running.
                self.set_status(pid, JobStatus::Running);
            }
        }
    }

    /// Removes finished jobs from the list, returning them.
    pub fn drain_done(&mut self) -> Vec<Job> {
        let (done, running) = self
            .jobs
            .drain(..)
            .partition(|j| matches!(j.status, JobStatus::Done(_)));
        self.jobs = running;
        done
    }

    /// Removes a job by process ID, returning it.
    pub fn remove(&mut self, pid: Pid) -> Option<Job> {
        let index = self.jobs.iter().position(|j| j.pid == pid)?;
        Some(self.jobs.remove(index))
    }

    /// Iterates over the jobs, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_jobs_numbers_them_and_sets_last_async_pid() {
        let mut jobs = JobSet::new();
        let n1 = jobs.add(Pid::from_raw(100), "sleep 1 &".to_string());
        let n2 = jobs.add(Pid::from_raw(101), "sleep 2 &".to_string());
        assert_eq!(n1, 1);
        assert_eq!(n2, 2);
        assert_eq!(jobs.last_async_pid, Some(Pid::from_raw(101)));
    }

    #[test]
    fn job_id_lookup() {
        let mut jobs = JobSet::new();
        jobs.add(Pid::from_raw(100), "a".to_string());
        jobs.add(Pid::from_raw(101), "b".to_string());

        assert_eq!(jobs.find_by_job_id("%1").unwrap().command, "a");
        assert_eq!(jobs.find_by_job_id("%%").unwrap().command, "b");
        assert_eq!(jobs.find_by_job_id("%+").unwrap().command, "b");
        assert!(jobs.find_by_job_id("%9").is_none());
        assert!(jobs.find_by_job_id("1").is_none());
    }

    #[test]
    fn draining_done_jobs() {
        let mut jobs = JobSet::new();
        jobs.add(Pid::from_raw(100), "a".to_string());
        jobs.add(Pid::from_raw(101), "b".to_string());
        jobs.set_status(Pid::from_raw(100), JobStatus::Done(ExitStatus(0)));

        let done = jobs.drain_done();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].command, "a");
        assert_eq!(jobs.iter().count(), 1);
    }

    #[test]
    fn numbers_are_not_reused_while_jobs_remain() {
        let mut jobs = JobSet::new();
        jobs.add(Pid::from_raw(100), "a".to_string());
        jobs.add(Pid::from_raw(101), "b".to_string());
        jobs.remove(Pid::from_raw(100));
        let n = jobs.add(Pid::from_raw(102), "c".to_string());
        assert_eq!(n, 3);
    }
}

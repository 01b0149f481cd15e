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

//! Times built-in
//!
//! Prints the accumulated user and system times of the shell and of its
//! terminated children.

use crate::common::{failure, output};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::system;
use slash_env::Env;
use std::ops::ControlFlow::Continue;

/// Formats clock ticks as `MmS.SSs`.
fn format_ticks(ticks: libc::clock_t, ticks_per_second: libc::clock_t) -> String {
    let ticks_per_second = ticks_per_second.max(1) as f64;
    let seconds = ticks as f64 / ticks_per_second;
    let minutes = (seconds / 60.0) as u64;
    format!("{}m{:.2}s", minutes, seconds - (minutes as f64) * 60.0)
}

pub fn main(env: &mut Env, _args: Vec<Field>) -> Result<ExitStatus> {
    match system::times() {
        Ok((tms, ticks_per_second)) => {
            let text = format!(
                "{} {}\n{} {}\n",
                format_ticks(tms.tms_utime, ticks_per_second),
                format_ticks(tms.tms_stime, ticks_per_second),
                format_ticks(tms.tms_cutime, ticks_per_second),
                format_ticks(tms.tms_cstime, ticks_per_second),
            );
            Continue(output(env, &text))
        }
        Err(errno) => Continue(failure(env, "times", &errno.to_string())),
    }
}

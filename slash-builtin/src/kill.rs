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

//! Kill built-in
//!
//! Sends a signal to processes named by pid or `%job` operands. The
//! signal is selected with `-s name`, `-NAME` or `-N`; `-l` lists signal
//! names or translates a number or `128+N` exit status to a name.

use crate::common::{failure, output, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::system::{self, Pid};
use slash_env::trap::{all_signal_numbers, signal_name, Condition};
use slash_env::Env;
use std::ffi::c_int;
use std::ops::ControlFlow::Continue;

/// Parses a signal name (with or without `SIG`) or number.
fn parse_signal(value: &str) -> Option<c_int> {
    match value.parse::<Condition>() {
        Ok(Condition::Signal(signo)) => Some(signo),
        _ => None,
    }
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let mut signal: Option<c_int> = None;
    let mut list = false;
    let mut operands = Vec::new();
    let mut index = 0;
    while let Some(arg) = args.get(index) {
        let value = arg.value.as_str();
        match value {
            "-l" => list = true,
            "-s" => {
                index += 1;
                let Some(name) = args.get(index) else {
                    return Continue(usage_error(env, "kill", "missing signal name"));
                };
                match parse_signal(&name.value) {
                    Some(signo) => signal = Some(signo),
                    None => {
                        return Continue(usage_error(
                            env,
                            "kill",
                            &format!("`{}` is not a valid signal", name.value),
                        ))
                    }
                }
            }
            "--" => {
                operands.extend(args[index + 1..].iter().map(|f| f.value.clone()));
                break;
            }
            _ if value.starts_with('-') && value.len() > 1 && signal.is_none() && !list => {
                match parse_signal(&value[1..]) {
                    Some(signo) => signal = Some(signo),
                    None => {
                        return Continue(usage_error(
                            env,
                            "kill",
                            &format!("`{value}` is not a valid option"),
                        ))
                    }
                }
            }
            _ => operands.push(value.to_string()),
        }
        index += 1;
    }

    if list {
        if operands.is_empty() {
            let names: Vec<String> =
                all_signal_numbers().into_iter().map(signal_name).collect();
            return Continue(output(env, &format!("{}\n", names.join(" "))));
        }
        let mut out = String::new();
        for operand in &operands {
            let Ok(mut number) = operand.parse::<c_int>() else {
                return Continue(usage_error(
                    env,
                    "kill",
                    &format!("`{operand}` is not a signal number"),
                ));
            };
            if number > 128 {
                number -= 128;
            }
            out.push_str(&signal_name(number));
            out.push('\n');
        }
        return Continue(output(env, &out));
    }

    if operands.is_empty() {
        return Continue(usage_error(env, "kill", "missing process operand"));
    }

    let mut status = ExitStatus::SUCCESS;
    for operand in &operands {
        let pid = if operand.starts_with('%') {
            env.jobs.find_by_job_id(operand).map(|job| job.pid)
        } else {
            operand.parse().ok().map(Pid::from_raw)
        };
        let Some(pid) = pid else {
            status = failure(env, "kill", &format!("{operand}: no such job"));
            continue;
        };
        if let Err(errno) = system::kill(pid, Some(signal.unwrap_or(libc::SIGTERM))) {
            status = failure(env, "kill", &format!("{operand}: {errno}"));
        }
    }
    Continue(status)
}

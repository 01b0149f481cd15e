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

//! Umask built-in
//!
//! Prints or sets the file mode creation mask. Without an operand the
//! mask is printed in octal, or with `-S` in the symbolic
//! `u=rwx,g=rx,o=rx` form.

use crate::common::{output, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::system;
use slash_env::Env;
use std::ops::ControlFlow::Continue;

/// Renders the permissions the mask allows, symbolically.
fn symbolic(mask: libc::mode_t) -> String {
    let class = |shift: u32| {
        let bits = (!mask >> shift) & 0o7;
        let mut text = String::new();
        if bits & 0o4 != 0 {
            text.push('r');
        }
        if bits & 0o2 != 0 {
            text.push('w');
        }
        if bits & 0o1 != 0 {
            text.push('x');
        }
        text
    };
    format!("u={},g={},o={}", class(6), class(3), class(0))
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let mut symbolic_output = false;
    let mut operand = None;
    for arg in &args {
        match arg.value.as_str() {
            "-S" => symbolic_output = true,
            value => operand = Some(value.to_string()),
        }
    }

    match operand {
        None => {
            // Reading the mask means setting it twice.
            let mask = system::umask(0);
            system::umask(mask);
            let text = if symbolic_output {
                format!("{}\n", symbolic(mask))
            } else {
                format!("{:04o}\n", mask)
            };
            Continue(output(env, &text))
        }
        Some(operand) => match libc::mode_t::from_str_radix(&operand, 8) {
            Ok(mask) if mask <= 0o777 => {
                system::umask(mask);
                Continue(ExitStatus::SUCCESS)
            }
            _ => Continue(usage_error(
                env,
                "umask",
                &format!("`{operand}` is not a valid mask"),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbolic_rendering() {
        assert_eq!(symbolic(0o022), "u=rwx,g=rx,o=rx");
        assert_eq!(symbolic(0o077), "u=rwx,g=,o=");
        assert_eq!(symbolic(0o000), "u=rwx,g=rwx,o=rwx");
    }

    #[test]
    fn invalid_mask_is_a_usage_error() {
        let mut env = Env::new("slash");
        assert_eq!(
            main(&mut env, Field::dummies(["9999"])),
            Continue(ExitStatus::ERROR)
        );
        assert_eq!(
            main(&mut env, Field::dummies(["rwx"])),
            Continue(ExitStatus::ERROR)
        );
    }
}

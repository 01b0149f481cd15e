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

//! Echo built-in
//!
//! Writes its arguments separated by spaces and terminated by a newline.
//! Per the XSI option of POSIX, backslash escapes are interpreted and
//! there are no options: a first argument of `-n` is printed like any
//! other.

use crate::common::output;
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::ops::ControlFlow::Continue;

/// Expands the XSI escape sequences in one argument.
///
/// Returns the expanded text and whether a `\c` was seen, which ends the
/// output without a newline.
fn expand_escapes(argument: &str, out: &mut String) -> bool {
    let mut chars = argument.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('c') => return true,
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{b}'),
            Some('\\') => out.push('\\'),
            Some('0') => {
                // Up to three octal digits
                let mut value = 0u32;
                for _ in 0..3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            value = value * 8 + d.to_digit(8).unwrap();
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if let Some(c) = char::from_u32(value) {
                    out.push(c);
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    false
}

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let mut text = String::new();
    let mut suppress_newline = false;
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            text.push(' ');
        }
        if expand_escapes(&arg.value, &mut text) {
            suppress_newline = true;
            break;
        }
    }
    if !suppress_newline {
        text.push('\n');
    }
    Continue(output(env, &text))
}

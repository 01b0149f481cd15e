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

//! Printf built-in
//!
//! Formats and prints its arguments. The `%d`, `%i`, `%o`, `%u`, `%x`,
//! `%X`, `%c`, `%s` and `%%` conversions are supported with the `-` and
//! `0` flags, a field width and a precision. If there are more arguments
//! than conversions, the format is reused until the arguments are
//! exhausted; missing arguments format as empty strings or zero.

use crate::common::{output, usage_error};
use slash_env::semantics::{ExitStatus, Field, Result};
use slash_env::Env;
use std::fmt::Write;
use std::ops::ControlFlow::Continue;

#[derive(Clone, Copy, Debug, Default)]
struct Spec {
    left_align: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Error from formatting, carrying the offending construct
#[derive(Debug)]
struct FormatError(String);

/// Formats one pass of the format string, consuming arguments.
///
/// Returns whether any conversion consumed an argument, which decides
/// whether the format is reused.
fn format_once<'a>(
    format: &str,
    args: &mut impl Iterator<Item = &'a str>,
    out: &mut String,
) -> std::result::Result<bool, FormatError> {
    let mut consumed = false;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => expand_escape(&mut chars, out),
            '%' => {
                if chars.peek() == Some(&'%') {
                    chars.next();
                    out.push('%');
                    continue;
                }
                let mut spec = Spec::default();
                // Flags
                loop {
                    match chars.peek() {
                        Some('-') => {
                            spec.left_align = true;
                            chars.next();
                        }
                        Some('0') => {
                            spec.zero_pad = true;
                            chars.next();
                        }
                        _ => break,
                    }
                }
                // Width
                let mut width = String::new();
                while let Some(d) = chars.peek().filter(|c| c.is_ascii_digit()) {
                    width.push(*d);
                    chars.next();
                }
                if !width.is_empty() {
                    spec.width = width.parse().ok();
                }
                // Precision
                if chars.peek() == Some(&'.') {
                    chars.next();
                    let mut precision = String::new();
                    while let Some(d) = chars.peek().filter(|c| c.is_ascii_digit()) {
                        precision.push(*d);
                        chars.next();
                    }
                    spec.precision = Some(precision.parse().unwrap_or(0));
                }

                let conversion = chars
                    .next()
                    .ok_or_else(|| FormatError("%".to_string()))?;
                let argument = args.next();
                consumed |= argument.is_some();
                convert(conversion, spec, argument.unwrap_or(""), out)?;
            }
            c => out.push(c),
        }
    }
    Ok(consumed)
}

/// Applies one conversion to an argument.
fn convert(
    conversion: char,
    spec: Spec,
    argument: &str,
    out: &mut String,
) -> std::result::Result<(), FormatError> {
    let formatted = match conversion {
        's' => {
            let mut value = argument.to_string();
            if let Some(precision) = spec.precision {
                value = value.chars().take(precision).collect();
            }
            value
        }
        'c' => argument.chars().next().map(String::from).unwrap_or_default(),
        'd' | 'i' => parse_integer(argument)?.to_string(),
        'u' => (parse_integer(argument)? as u64).to_string(),
        'o' => {
            let mut s = String::new();
            write!(s, "{:o}", parse_integer(argument)? as u64).unwrap();
            s
        }
        'x' => {
            let mut s = String::new();
            write!(s, "{:x}", parse_integer(argument)? as u64).unwrap();
            s
        }
        'X' => {
            let mut s = String::new();
            write!(s, "{:X}", parse_integer(argument)? as u64).unwrap();
            s
        }
        other => return Err(FormatError(format!("%{other}"))),
    };

    let Some(width) = spec.width else {
        out.push_str(&formatted);
        return Ok(());
    };
    let length = formatted.chars().count();
    if length >= width {
        out.push_str(&formatted);
    } else if spec.left_align {
        out.push_str(&formatted);
        out.extend(std::iter::repeat(' ').take(width - length));
    } else {
        let pad = if spec.zero_pad && conversion != 's' && conversion != 'c' {
            '0'
        } else {
            ' '
        };
        // A zero-padded negative number keeps its sign in front.
        if pad == '0' && formatted.starts_with('-') {
            out.push('-');
            out.extend(std::iter::repeat('0').take(width - length));
            out.push_str(&formatted[1..]);
        } else {
            out.extend(std::iter::repeat(pad).take(width - length));
            out.push_str(&formatted);
        }
    }
    Ok(())
}

/// Parses an integer argument.
///
/// A leading quote makes the value of the next character the number, per
/// POSIX. An empty argument is zero.
fn parse_integer(argument: &str) -> std::result::Result<i64, FormatError> {
    if argument.is_empty() {
        return Ok(0);
    }
    if let Some(rest) = argument.strip_prefix('\'').or_else(|| argument.strip_prefix('"')) {
        return Ok(rest.chars().next().map(|c| c as i64).unwrap_or(0));
    }
    let (digits, radix) = if let Some(hex) = argument
        .strip_prefix("0x")
        .or_else(|| argument.strip_prefix("0X"))
    {
        (hex.to_string(), 16)
    } else if argument.len() > 1 && argument.starts_with('0') {
        (argument[1..].to_string(), 8)
    } else if argument.len() > 2 && argument.starts_with("-0") {
        (format!("-{}", &argument[2..]), 8)
    } else {
        (argument.to_string(), 10)
    };
    i64::from_str_radix(&digits, radix).map_err(|_| FormatError(argument.to_string()))
}

/// Expands a backslash escape in the format string.
fn expand_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    match chars.next() {
        Some('a') => out.push('\u{7}'),
        Some('b') => out.push('\u{8}'),
        Some('f') => out.push('\u{c}'),
        Some('n') => out.push('\n'),
        Some('r') => out.push('\r'),
        Some('t') => out.push('\t'),
        Some('v') => out.push('\u{b}'),
        Some('\\') => out.push('\\'),
        Some(d @ '0'..='7') => {
            let mut value = d.to_digit(8).unwrap();
            for _ in 0..2 {
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

pub fn main(env: &mut Env, args: Vec<Field>) -> Result<ExitStatus> {
    let Some((format, operands)) = args.split_first() else {
        return Continue(usage_error(env, "printf", "missing format operand"));
    };
    let format = format.value.clone();
    let mut operands = operands.iter().map(|f| f.value.as_str());

    let mut out = String::new();
    loop {
        match format_once(&format, &mut operands, &mut out) {
            Ok(consumed) => {
                let mut remaining = operands.clone().peekable();
                if !consumed || remaining.peek().is_none() {
                    break;
                }
            }
            Err(FormatError(construct)) => {
                return Continue(usage_error(
                    env,
                    "printf",
                    &format!("invalid conversion or operand `{construct}`"),
                ));
            }
        }
    }
    Continue(output(env, &out))
}

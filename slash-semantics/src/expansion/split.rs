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

//! Field splitting
//!
//! Field splitting divides the result of expansion at occurrences of
//! `$IFS` characters. Only unquoted characters that resulted from
//! parameter expansion, command substitution or arithmetic expansion are
//! considered for delimiting.
//!
//! A whitespace separator collapses with adjacent whitespace separators
//! and never produces an empty field; a non-whitespace separator
//! terminates the field before it, producing an empty field for each
//! adjacent pair. A trailing separator does not produce a final empty
//! field. As a side effect, the operation drops fields that end up with
//! no characters at all, which is how a word that expands to nothing
//! yields no field while an empty quotation survives (its quotation mark
//! still counts as a character).

use super::attr::{AttrChar, Origin};

/// Default field separators used when `$IFS` is unset
pub const DEFAULT_IFS: &str = " \t\n";

fn is_separator(c: &AttrChar, ifs: &str) -> bool {
    c.origin == Origin::SoftExpansion && !c.is_quoted && !c.is_quoting && ifs.contains(c.value)
}

fn is_ifs_whitespace(value: char) -> bool {
    matches!(value, ' ' | '\t' | '\n')
}

/// Splits one expanded word into fields.
pub fn split(chars: Vec<AttrChar>, ifs: &str) -> Vec<Vec<AttrChar>> {
    let mut fields = Vec::new();
    let mut current: Vec<AttrChar> = Vec::new();
    let mut chars = chars.into_iter().peekable();

    while let Some(c) = chars.next() {
        if !is_separator(&c, ifs) {
            current.push(c);
            continue;
        }
        if is_ifs_whitespace(c.value) {
            // Collapse the whitespace run, absorbing at most one
            // non-whitespace separator.
            while let Some(next) = chars.peek() {
                if is_separator(next, ifs) && is_ifs_whitespace(next.value) {
                    chars.next();
                } else {
                    break;
                }
            }
            if !current.is_empty() {
                fields.push(std::mem::take(&mut current));
            }
            if let Some(next) = chars.peek() {
                if is_separator(next, ifs) && !is_ifs_whitespace(next.value) {
                    let non_ws = *next;
                    chars.next();
                    // Trailing whitespace of the non-whitespace separator
                    while let Some(next) = chars.peek() {
                        if is_separator(next, ifs) && is_ifs_whitespace(next.value) {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if chars.peek().is_some() {
                        continue;
                    }
                    // A trailing non-whitespace separator terminates the
                    // (already pushed) field without adding a new one.
                    let _ = non_ws;
                    return fields;
                }
            }
        } else {
            // Non-whitespace separator: terminate the field, empty or not.
            fields.push(std::mem::take(&mut current));
            // Absorb following whitespace separators.
            while let Some(next) = chars.peek() {
                if is_separator(next, ifs) && is_ifs_whitespace(next.value) {
                    chars.next();
                } else {
                    break;
                }
            }
            if chars.peek().is_none() {
                return fields;
            }
        }
    }

    if !current.is_empty() {
        fields.push(current);
    }
    fields
}

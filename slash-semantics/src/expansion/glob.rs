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

//! Pathname expansion
//!
//! A field containing unquoted pattern characters is matched against the
//! file system, one pattern component per pathname component. Quoted and
//! tilde-produced characters never act as pattern syntax, and a component
//! only matches names starting with a dot if its pattern spells the dot
//! out literally. A field that matches nothing is kept as it is (after
//! quote removal); the results of a successful match are sorted.

use super::attr::AttrChar;
use slash_fnmatch::{Pattern, PatternChar};

/// Expands one field against the file system.
///
/// Returns `None` if the field contains no unquoted pattern character or
/// matches no pathname; the caller then falls back to quote removal.
#[must_use]
pub fn glob_field(chars: &[AttrChar]) -> Option<Vec<String>> {
    let pattern: Vec<PatternChar> = chars
        .iter()
        .filter(|c| !c.is_quoting)
        .map(|c| c.to_pattern_char())
        .collect();
    if !has_unquoted_special(&pattern) {
        return None;
    }

    // Split into pathname components. A slash separates components
    // whether quoted or not.
    let mut components: Vec<Vec<PatternChar>> = vec![Vec::new()];
    for &c in &pattern {
        if c.char_value() == '/' {
            components.push(Vec::new());
        } else {
            components.last_mut().unwrap().push(c);
        }
    }
    let absolute = components.first().is_some_and(|c| c.is_empty()) && components.len() > 1;
    if absolute {
        components.remove(0);
    }
    // A trailing slash restricts matches to directories.
    let directories_only = components.last().is_some_and(|c| c.is_empty());
    if directories_only {
        components.pop();
    }

    let mut candidates: Vec<String> = vec![if absolute {
        "/".to_string()
    } else {
        String::new()
    }];
    for (index, component) in components.iter().enumerate() {
        let is_last = index == components.len() - 1;
        candidates = expand_component(&candidates, component, is_last && !directories_only);
        if candidates.is_empty() {
            return None;
        }
    }

    let mut results: Vec<String> = if directories_only {
        candidates.iter().map(|c| format!("{c}/")).collect()
    } else {
        candidates
    };
    results.sort_unstable();
    Some(results)
}

/// Whether any unquoted pattern-special character occurs.
fn has_unquoted_special(pattern: &[PatternChar]) -> bool {
    pattern
        .iter()
        .any(|c| matches!(c, PatternChar::Normal('*' | '?' | '[')))
}

/// Expands one pattern component against each candidate directory.
fn expand_component(
    candidates: &[String],
    component: &[PatternChar],
    allow_non_directory: bool,
) -> Vec<String> {
    let mut results = Vec::new();
    let special = has_unquoted_special(component);

    for candidate in candidates {
        let prefix = if candidate.is_empty() {
            String::new()
        } else if candidate.ends_with('/') {
            candidate.clone()
        } else {
            format!("{candidate}/")
        };

        if !special {
            // A literal component is appended if the result exists.
            let literal: String = component.iter().map(|c| c.char_value()).collect();
            let path = format!("{prefix}{literal}");
            let exists = std::fs::symlink_metadata(&path)
                .map(|metadata| allow_non_directory || metadata.is_dir())
                .unwrap_or(false);
            if exists {
                results.push(path);
            }
            continue;
        }

        let Ok(pattern) = Pattern::parse(component.iter().copied()) else {
            continue;
        };
        let directory = if candidate.is_empty() { "." } else { candidate };
        let Ok(entries) = std::fs::read_dir(directory) else {
            continue;
        };
        let wants_dot = matches!(
            component.first(),
            Some(PatternChar::Literal('.')) | Some(PatternChar::Normal('.'))
        );
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') && !wants_dot {
                continue;
            }
            if !pattern.is_match(&name) {
                continue;
            }
            if !allow_non_directory {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    continue;
                }
            }
            results.push(format!("{prefix}{name}"));
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::attr::Origin;
    use std::fs::File;

    fn unquoted(s: &str) -> Vec<AttrChar> {
        s.chars()
            .map(|value| AttrChar {
                value,
                origin: Origin::Literal,
                is_quoted: false,
                is_quoting: false,
            })
            .collect()
    }

    #[test]
    fn literal_field_is_not_expanded() {
        assert_eq!(glob_field(&unquoted("plain")), None);
    }

    #[test]
    fn quoted_pattern_is_not_expanded() {
        let mut chars = unquoted("*");
        chars[0].is_quoted = true;
        assert_eq!(glob_field(&chars), None);
    }

    #[test]
    fn matching_files_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("c.log")).unwrap();

        let pattern = format!("{}/*.txt", dir.path().display());
        let results = glob_field(&unquoted(&pattern)).unwrap();
        assert_eq!(
            results,
            [
                format!("{}/a.txt", dir.path().display()),
                format!("{}/b.txt", dir.path().display()),
            ]
        );
    }

    #[test]
    fn unmatched_pattern_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.nope", dir.path().display());
        assert_eq!(glob_field(&unquoted(&pattern)), None);
    }

    #[test]
    fn dot_files_need_explicit_dot() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join("shown")).unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let results = glob_field(&unquoted(&pattern)).unwrap();
        assert_eq!(results, [format!("{}/shown", dir.path().display())]);

        let pattern = format!("{}/.*", dir.path().display());
        let results = glob_field(&unquoted(&pattern)).unwrap();
        assert!(results.contains(&format!("{}/.hidden", dir.path().display())));
    }

    #[test]
    fn directory_only_match_with_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("file")).unwrap();

        let pattern = format!("{}/*/", dir.path().display());
        let results = glob_field(&unquoted(&pattern)).unwrap();
        assert_eq!(results, [format!("{}/sub/", dir.path().display())]);
    }
}

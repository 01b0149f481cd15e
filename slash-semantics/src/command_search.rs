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

//! Locating external utilities
//!
//! A command name containing a slash is used as a path directly; other
//! names are searched for in the directories of `$PATH`. Successful
//! lookups are remembered in the environment so repeated invocations skip
//! the search; the `hash` built-in exposes and clears that cache.

use slash_env::system;
use slash_env::Env;
use std::ffi::CString;
use std::path::PathBuf;

/// Locates an external utility, consulting and filling the cache.
#[must_use]
pub fn search(env: &mut Env, name: &str) -> Option<PathBuf> {
    if name.contains('/') {
        return Some(PathBuf::from(name));
    }
    if let Some(path) = env.hashed_commands.get(name) {
        return Some(path.clone());
    }
    let path = find_in_path(env, name)?;
    env.hashed_commands.insert(name.to_string(), path.clone());
    Some(path)
}

/// Searches the directories of `$PATH` without touching the cache.
#[must_use]
pub fn find_in_path(env: &Env, name: &str) -> Option<PathBuf> {
    let path = env.variables.value("PATH").unwrap_or_default().to_string();
    for directory in path.split(':') {
        let directory = if directory.is_empty() { "." } else { directory };
        let candidate = PathBuf::from(directory).join(name);
        let Ok(c_path) = CString::new(candidate.as_os_str().as_encoded_bytes()) else {
            continue;
        };
        if system::is_executable_file(&c_path) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn env_with_path(path: &str) -> Env {
        let mut env = Env::new("slash");
        env.variables.assign("PATH", path).unwrap();
        env
    }

    fn make_executable(path: &std::path::Path) {
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        let mut permissions = std::fs::metadata(path).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(path, permissions).unwrap();
    }

    #[test]
    fn name_with_slash_bypasses_path() {
        let mut env = env_with_path("/nowhere");
        assert_eq!(
            search(&mut env, "./relative/cmd"),
            Some(PathBuf::from("./relative/cmd"))
        );
        assert!(env.hashed_commands.is_empty());
    }

    #[test]
    fn path_directories_are_searched_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_executable(&second.path().join("tool"));

        let path = format!("{}:{}", first.path().display(), second.path().display());
        let mut env = env_with_path(&path);
        let found = search(&mut env, "tool").unwrap();
        assert_eq!(found, second.path().join("tool"));

        // Now shadow it in the first directory; the cache still answers
        // with the earlier result until cleared.
        make_executable(&first.path().join("tool"));
        let found = search(&mut env, "tool").unwrap();
        assert_eq!(found, second.path().join("tool"));

        env.hashed_commands.clear();
        let found = search(&mut env, "tool").unwrap();
        assert_eq!(found, first.path().join("tool"));
    }

    #[test]
    fn non_executable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data"), "not a program").unwrap();
        let mut env = env_with_path(&dir.path().display().to_string());
        assert_eq!(search(&mut env, "data"), None);
    }

    #[test]
    fn missing_command_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = env_with_path(&dir.path().display().to_string());
        assert_eq!(search(&mut env, "absent"), None);
    }
}

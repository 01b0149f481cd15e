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

//! Defining aliases
//!
//! This module provides the data structures for alias definitions. The
//! parser consults an [`AliasSet`] when it accepts a word in command-name
//! position; the `alias` and `unalias` built-ins mutate the set.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;

/// Name-replacement pair that defines an alias
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alias {
    /// Name matched against command words by the parser
    pub name: String,
    /// Source text substituted for the matched word
    pub replacement: String,
}

impl Alias {
    /// Tests whether a string can be used as an alias name.
    ///
    /// A valid name is non-empty and contains no blank, newline or character
    /// that is significant to the tokenizer in a command word position:
    /// `$`, `=`, `#`, `&`, `*`.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && !name
                .chars()
                .any(|c| matches!(c, ' ' | '\t' | '\n' | '$' | '=' | '#' | '&' | '*'))
    }
}

/// Wrapper of [`Alias`] for inserting into a hash set
///
/// A `HashEntry` wraps an `Alias` in `Rc` so a definition stays alive while
/// the parser holds it even if `unalias` removes it mid-parse. The `Hash`
/// and `PartialEq` implementations compare only names.
#[derive(Clone, Debug, Eq)]
pub struct HashEntry(pub Rc<Alias>);

impl HashEntry {
    /// Convenience constructor for a new alias definition
    pub fn new<N: Into<String>, R: Into<String>>(name: N, replacement: R) -> HashEntry {
        HashEntry(Rc::new(Alias {
            name: name.into(),
            replacement: replacement.into(),
        }))
    }
}

impl PartialEq for HashEntry {
    fn eq(&self, other: &HashEntry) -> bool {
        self.0.name == other.0.name
    }
}

impl Hash for HashEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state)
    }
}

impl Borrow<str> for HashEntry {
    fn borrow(&self) -> &str {
        &self.0.name
    }
}

/// Collection of aliases
pub type AliasSet = HashSet<HashEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(Alias::is_valid_name("ll"));
        assert!(Alias::is_valid_name("g.it"));
        assert!(Alias::is_valid_name(".."));
        assert!(!Alias::is_valid_name(""));
        assert!(!Alias::is_valid_name("a b"));
        assert!(!Alias::is_valid_name("a\tb"));
        assert!(!Alias::is_valid_name("a\nb"));
        assert!(!Alias::is_valid_name("a$b"));
        assert!(!Alias::is_valid_name("a=b"));
        assert!(!Alias::is_valid_name("a#b"));
        assert!(!Alias::is_valid_name("a&b"));
        assert!(!Alias::is_valid_name("a*b"));
    }

    #[test]
    fn replacement_is_keyed_by_name() {
        let mut aliases = AliasSet::new();
        aliases.insert(HashEntry::new("ll", "ls -l"));
        let old = aliases.replace(HashEntry::new("ll", "ls -al")).unwrap();
        assert_eq!(old.0.replacement, "ls -l");
        assert_eq!(aliases.get("ll").unwrap().0.replacement, "ls -al");
    }
}

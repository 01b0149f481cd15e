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

//! Shell command language syntax
//!
//! This module defines the two layers of the syntax data model:
//!
//! - The lexical layer: a [`Word`] is an ordered sequence of [`WordPart`]s,
//!   each of which is a literal run, a parameter expansion, a command
//!   substitution, an arithmetic expansion, or a tilde prefix. Every part
//!   records the quoting context it was produced in.
//! - The grammatical layer: the abstract syntax tree rooted at [`List`],
//!   following the POSIX shell grammar. Every node is a distinct typed
//!   variant owned by its parent, so traversal and destruction never have to
//!   guess a payload shape.
//!
//! The parser builds the tree from tokens produced by the
//! [lexer](crate::lexer); the executor in the `slash-semantics` crate walks
//! it.

use crate::source::Span;
use std::cell::OnceCell;
use std::fmt;
#[cfg(unix)]
use std::os::unix::io::RawFd;
use std::rc::Rc;

#[cfg(not(unix))]
type RawFd = i32;

/// Returns true if the string is a valid shell variable name.
///
/// A name is a non-empty sequence of ASCII letters, digits and underscores
/// that does not start with a digit.
#[must_use]
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Special parameter
///
/// Each special parameter is a single character with a fixed meaning in the
/// shell language, e.g. `?` expands to the exit status of the last command.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SpecialParam {
    /// `@` (all positional parameters, separate fields)
    At,
    /// `*` (all positional parameters, joined)
    Asterisk,
    /// `#` (number of positional parameters)
    Number,
    /// `?` (exit status of the last command)
    Question,
    /// `-` (currently active shell option letters)
    Hyphen,
    /// `$` (process ID of the shell)
    Dollar,
    /// `!` (process ID of the last asynchronous command)
    Exclamation,
    /// `0` (name of the shell or shell script)
    Zero,
}

impl SpecialParam {
    /// Converts a character to the special parameter it names.
    #[must_use]
    pub fn from_char(c: char) -> Option<SpecialParam> {
        use SpecialParam::*;
        match c {
            '@' => Some(At),
            '*' => Some(Asterisk),
            '#' => Some(Number),
            '?' => Some(Question),
            '-' => Some(Hyphen),
            '$' => Some(Dollar),
            '!' => Some(Exclamation),
            '0' => Some(Zero),
            _ => None,
        }
    }

    /// Returns the character that names this special parameter.
    #[must_use]
    pub const fn as_char(self) -> char {
        use SpecialParam::*;
        match self {
            At => '@',
            Asterisk => '*',
            Number => '#',
            Question => '?',
            Hyphen => '-',
            Dollar => '$',
            Exclamation => '!',
            Zero => '0',
        }
    }
}

/// Identity of an expanded parameter
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ParamId {
    /// Named parameter (a variable)
    Variable(String),
    /// Special parameter
    Special(SpecialParam),
    /// Positional parameter, indexed from 1
    ///
    /// An index of 0 never matches a parameter; `$0` is the special parameter
    /// [`Zero`](SpecialParam::Zero).
    Positional(usize),
}

/// How a [switch](Switch) substitutes the value being expanded
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchType {
    /// Use the alternative word if the value is present (`+`)
    Alter,
    /// Use the default word if the value is missing (`-`)
    Default,
    /// Assign the default word if the value is missing (`=`)
    Assign,
    /// Error out if the value is missing (`?`)
    Error,
}

/// Condition that triggers a [switch](Switch)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwitchCondition {
    /// Without a colon: the switch applies if the parameter is unset.
    Unset,
    /// With a colon: the switch applies if the parameter is unset or empty.
    UnsetOrEmpty,
}

/// Parameter expansion modifier that conditionally substitutes the value
///
/// Examples: `+foo`, `:-bar`, `:=baz`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Switch {
    /// How the value is substituted
    pub r#type: SwitchType,
    /// When the substitution applies
    pub condition: SwitchCondition,
    /// Word that substitutes the parameter value
    pub word: Word,
}

/// Which end of the value a [trim](Trim) removes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimSide {
    /// `#`: remove a matching prefix
    Prefix,
    /// `%`: remove a matching suffix
    Suffix,
}

/// How much a [trim](Trim) removes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrimLength {
    /// Remove the shortest match.
    Shortest,
    /// Remove the longest match.
    Longest,
}

/// Parameter expansion modifier that removes a matching prefix or suffix
///
/// Examples: `#foo`, `##bar*`, `%%.o`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trim {
    /// Which side of the value is removed
    pub side: TrimSide,
    /// Whether the shortest or longest match is removed
    pub length: TrimLength,
    /// Pattern matched against the value
    pub pattern: Word,
}

/// Modifier applied to a braced parameter expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Modifier {
    /// No modifier (`${foo}`)
    None,
    /// `#` prefix (`${#foo}`)
    Length,
    /// `-`, `=`, `?` or `+` suffix, optionally preceded by `:`
    Switch(Switch),
    /// `#`, `##`, `%` or `%%` suffix with a pattern
    Trim(Trim),
}

/// Parameter expansion
///
/// A parameter expansion names a [parameter](ParamId) and an optional
/// [modifier](Modifier) that transforms the value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Param {
    /// Parameter to be expanded
    pub id: ParamId,
    /// Modifier applied to the value
    pub modifier: Modifier,
}

impl Param {
    /// Creates a parameter expansion of a variable with no modifier.
    #[must_use]
    pub fn variable<N: Into<String>>(name: N) -> Param {
        Param {
            id: ParamId::Variable(name.into()),
            modifier: Modifier::None,
        }
    }
}

/// Segment of a [`Word`]
///
/// Every part records the quoting context it originated in. For literal
/// parts the quote flags double as the result of quote removal: the quote
/// characters themselves are consumed by the lexer and only the flags
/// remain. A character escaped with a backslash is recorded as a
/// single-quoted literal since it behaves identically in all later stages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordPart {
    /// Literal character run
    Literal {
        /// The characters themselves, quote characters removed
        value: String,
        /// Whether the run was single-quoted (or backslash-escaped)
        single_quoted: bool,
        /// Whether the run was double-quoted
        double_quoted: bool,
    },
    /// Parameter expansion (`$name`, `${name...}`)
    Param {
        param: Param,
        /// Whether the expansion occurred inside double quotes
        quoted: bool,
    },
    /// Command substitution (`$(...)` or `` `...` ``)
    CommandSubst {
        /// Command source to be parsed and executed on expansion
        content: String,
        /// Whether the substitution was written in backquotes
        backquoted: bool,
        /// Whether the substitution occurred inside double quotes
        quoted: bool,
    },
    /// Arithmetic expansion (`$((...))`)
    Arith {
        /// Expression source to be evaluated on expansion
        expression: String,
        /// Whether the expansion occurred inside double quotes
        quoted: bool,
    },
    /// Tilde prefix at the start of a word
    ///
    /// The string is the login name following the tilde; it is empty for a
    /// plain `~`.
    Tilde(String),
}

impl WordPart {
    /// Creates an unquoted literal part.
    #[must_use]
    pub fn unquoted<V: Into<String>>(value: V) -> WordPart {
        WordPart::Literal {
            value: value.into(),
            single_quoted: false,
            double_quoted: false,
        }
    }

    /// Creates a single-quoted literal part.
    #[must_use]
    pub fn single_quoted<V: Into<String>>(value: V) -> WordPart {
        WordPart::Literal {
            value: value.into(),
            single_quoted: true,
            double_quoted: false,
        }
    }

    /// Creates a double-quoted literal part.
    #[must_use]
    pub fn double_quoted<V: Into<String>>(value: V) -> WordPart {
        WordPart::Literal {
            value: value.into(),
            single_quoted: false,
            double_quoted: true,
        }
    }

    /// Whether any quoting applies to this part.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        match self {
            WordPart::Literal {
                single_quoted,
                double_quoted,
                ..
            } => *single_quoted || *double_quoted,
            WordPart::Param { quoted, .. }
            | WordPart::CommandSubst { quoted, .. }
            | WordPart::Arith { quoted, .. } => *quoted,
            WordPart::Tilde(_) => false,
        }
    }

    /// Whether this part is subject to expansion at execution time.
    #[must_use]
    pub fn is_expansion(&self) -> bool {
        matches!(
            self,
            WordPart::Param { .. } | WordPart::CommandSubst { .. } | WordPart::Arith { .. }
        )
    }
}

/// Token content: a sequence of [`WordPart`]s
///
/// After tokenization a word contains at least one part, and no two adjacent
/// literal parts have identical quote flags (the lexer fuses them).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word {
    /// Parts that constitute the word
    pub parts: Vec<WordPart>,
    /// Position of the word in the source code
    pub span: Span,
}

impl Word {
    /// Creates a word with a single unquoted literal part.
    #[must_use]
    pub fn unquoted<V: Into<String>>(value: V, span: Span) -> Word {
        Word {
            parts: vec![WordPart::unquoted(value)],
            span,
        }
    }

    /// Creates a word with no parts.
    ///
    /// An empty word only occurs as the value side of an assignment like
    /// `foo=` or as a modifier word in `${foo:-}`.
    #[must_use]
    pub fn empty(span: Span) -> Word {
        Word {
            parts: Vec::new(),
            span,
        }
    }

    /// If the word is a single unquoted literal, returns its value.
    ///
    /// This is the test used for keyword promotion and alias lookup: any
    /// quoting or expansion inhibits both.
    #[must_use]
    pub fn to_string_if_literal(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [WordPart::Literal {
                value,
                single_quoted: false,
                double_quoted: false,
            }] => Some(value),
            _ => None,
        }
    }

    /// Whether any part of the word was quoted.
    ///
    /// A word containing an empty quoted run (`''`) counts as quoted even
    /// though the run contributes no characters.
    #[must_use]
    pub fn was_quoted(&self) -> bool {
        self.parts.iter().any(WordPart::is_quoted)
    }

    /// Whether expansion of the word may produce more than one field.
    ///
    /// True if the word contains an unquoted parameter, command or
    /// arithmetic expansion whose result is subject to field splitting.
    #[must_use]
    pub fn needs_field_splitting(&self) -> bool {
        self.parts
            .iter()
            .any(|part| part.is_expansion() && !part.is_quoted())
    }

    /// Whether the expanded word may be subject to pathname expansion.
    ///
    /// True if any unquoted part can contribute a pattern character, either
    /// literally or through an expansion.
    #[must_use]
    pub fn needs_pathname_expansion(&self) -> bool {
        self.parts.iter().any(|part| match part {
            WordPart::Literal {
                value,
                single_quoted: false,
                double_quoted: false,
            } => value.contains(['*', '?', '[']),
            part => part.is_expansion() && !part.is_quoted(),
        })
    }

    /// Splits a leading unquoted tilde prefix into a [`WordPart::Tilde`].
    ///
    /// The tilde prefix extends from an initial unquoted `~` to the first
    /// `/` or the end of the word. If any part of the prefix is quoted or
    /// non-literal, the word is left unmodified.
    pub fn parse_tilde_front(&mut self) {
        let Some(WordPart::Literal {
            value,
            single_quoted: false,
            double_quoted: false,
        }) = self.parts.first()
        else {
            return;
        };
        let Some(rest) = value.strip_prefix('~') else {
            return;
        };

        let (name, remainder) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => {
                // The prefix only ends the tilde if the next part does not
                // extend the login name.
                if self.parts.len() > 1 {
                    return;
                }
                (rest, "")
            }
        };

        let tilde = WordPart::Tilde(name.to_string());
        if remainder.is_empty() {
            self.parts[0] = tilde;
        } else {
            let remainder = WordPart::unquoted(remainder);
            self.parts.splice(0..1, [tilde, remainder]);
        }
    }
}

/// Assignment word
///
/// An assignment word has the form `name=value` where `name` is a valid
/// variable name and the `=` is unquoted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assign {
    /// Name of the variable to assign to
    pub name: String,
    /// Word producing the assigned value
    pub value: Word,
    /// Location of the whole assignment word
    pub span: Span,
}

/// Converts a word into an assignment if it has the `name=value` form.
///
/// On failure the original word is returned unchanged so the caller can use
/// it as an ordinary command word.
impl TryFrom<Word> for Assign {
    type Error = Word;
    fn try_from(mut word: Word) -> Result<Assign, Word> {
        let Some(WordPart::Literal {
            value,
            single_quoted: false,
            double_quoted: false,
        }) = word.parts.first_mut()
        else {
            return Err(word);
        };
        let Some(eq) = value.find('=') else {
            return Err(word);
        };
        if !is_name(&value[..eq]) {
            return Err(word);
        }

        let name = value[..eq].to_string();
        let rest = value[eq + 1..].to_string();
        if rest.is_empty() {
            word.parts.remove(0);
        } else {
            *value = rest;
        }
        let span = word.span;
        let mut value = word;
        value.parse_tilde_front();
        Ok(Assign { name, value, span })
    }
}

/// File descriptor number
///
/// This is the `newtype` pattern applied to [`RawFd`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fd(pub RawFd);

impl Fd {
    /// File descriptor for the standard input
    pub const STDIN: Fd = Fd(0);
    /// File descriptor for the standard output
    pub const STDOUT: Fd = Fd(1);
    /// File descriptor for the standard error
    pub const STDERR: Fd = Fd(2);
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Redirection operators other than here-documents
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirOp {
    /// `<` (open a file for input)
    FileIn,
    /// `<>` (open a file for input and output)
    FileInOut,
    /// `>` (open a file for output; refuses to clobber under `noclobber`)
    FileOut,
    /// `>>` (open a file for appending)
    FileAppend,
    /// `>|` (open a file for output; always truncate)
    FileClobber,
    /// `<&` (copy or close a file descriptor for input)
    FdIn,
    /// `>&` (copy or close a file descriptor for output)
    FdOut,
}

/// Here-document
///
/// The operator token for `<<` and `<<-` carries a shared `HereDoc`. The
/// delimiter and flags are fixed when the operator is tokenized; the content
/// cell is filled when the lexer reaches the newline that starts the body.
#[derive(Debug, Eq, PartialEq)]
pub struct HereDoc {
    /// Delimiter after quote removal
    pub delimiter: String,
    /// Whether any part of the delimiter was quoted
    ///
    /// A quoted delimiter makes the content entirely literal.
    pub quoted: bool,
    /// Whether leading tabs are stripped from content and terminator lines
    ///
    /// This is true for the `<<-` operator and false for `<<`.
    pub remove_tabs: bool,
    /// Content of the here-document, excluding the terminator line
    ///
    /// For an unquoted delimiter the content is lexed with `$` and backquote
    /// expansions recognised; for a quoted delimiter it is a single literal
    /// part. The cell is empty until the lexer has read the body.
    pub content: OnceCell<Word>,
}

/// Nature of the file descriptor produced by a redirection
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RedirBody {
    /// Normal redirection with a target word
    Normal { operator: RedirOp, operand: Word },
    /// Here-document
    HereDoc(Rc<HereDoc>),
}

/// Redirection
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redir {
    /// Explicit file descriptor number preceding the operator, if any
    pub fd: Option<Fd>,
    /// `{name}` descriptor reference preceding the operator, if any
    ///
    /// The shell allocates a free descriptor and stores its number in the
    /// named variable.
    pub fd_location: Option<String>,
    /// Nature of the resulting file descriptor
    pub body: RedirBody,
}

impl Redir {
    /// Returns the file descriptor this redirection modifies.
    ///
    /// If no descriptor was written in the source, the default is selected
    /// by the operator: standard input for input operators, standard output
    /// for output operators.
    #[must_use]
    pub fn fd_or_default(&self) -> Fd {
        use RedirOp::*;
        self.fd.unwrap_or(match &self.body {
            RedirBody::Normal { operator, .. } => match operator {
                FileIn | FileInOut | FdIn => Fd::STDIN,
                FileOut | FileAppend | FileClobber | FdOut => Fd::STDOUT,
            },
            RedirBody::HereDoc(_) => Fd::STDIN,
        })
    }
}

/// Command that involves assignments, words and redirections
///
/// A syntactically valid simple command contains at least one assignment,
/// word or redirection.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SimpleCommand {
    /// Assignments preceding the command name
    pub assigns: Vec<Assign>,
    /// Command name and arguments
    pub words: Vec<Word>,
    /// Redirections
    pub redirs: Vec<Redir>,
}

impl SimpleCommand {
    /// Returns true if the command has no assignments, words or redirections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assigns.is_empty() && self.words.is_empty() && self.redirs.is_empty()
    }
}

/// `elif`-`then` clause of an `if` command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElifThen {
    pub condition: List,
    pub body: List,
}

/// Branch of a `case` command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseItem {
    /// Patterns matched against the subject word
    ///
    /// A valid case item has at least one pattern.
    pub patterns: Vec<Word>,
    /// Commands executed when a pattern matches
    pub body: List,
}

/// Command that contains other commands
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompoundCommand {
    /// Brace group, executed in the current environment
    Grouping(List),
    /// Parenthesised list, executed in a subshell
    Subshell(List),
    /// `for` loop
    For {
        /// Loop variable name (a single literal word)
        name: Word,
        /// Words to iterate over; `None` means the positional parameters
        values: Option<Vec<Word>>,
        body: List,
    },
    /// `while` loop
    While { condition: List, body: List },
    /// `until` loop
    Until { condition: List, body: List },
    /// `if` conditional
    If {
        condition: List,
        body: List,
        elifs: Vec<ElifThen>,
        r#else: Option<List>,
    },
    /// `case` conditional
    Case { subject: Word, items: Vec<CaseItem> },
}

/// Compound command with redirections
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FullCompoundCommand {
    /// The main part
    pub command: CompoundCommand,
    /// Redirections applied to the whole compound command
    pub redirs: Vec<Redir>,
}

/// Function definition command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDefinition {
    /// Function name
    pub name: Word,
    /// Function body
    ///
    /// The body is reference-counted so defining the function only clones
    /// the pointer out of the syntax tree.
    pub body: Rc<FullCompoundCommand>,
}

/// Element of a pipe sequence
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Simple command
    Simple(SimpleCommand),
    /// Compound command, possibly with redirections
    Compound(FullCompoundCommand),
    /// Function definition command
    Function(FunctionDefinition),
}

/// Commands separated by `|`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    /// Elements of the pipeline
    ///
    /// A valid pipeline has at least one command.
    pub commands: Vec<Command>,
    /// Whether the pipeline begins with a `!`
    pub negation: bool,
}

/// Connective between pipelines in an [and-or list](AndOrList)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AndOr {
    /// `&&`
    AndThen,
    /// `||`
    OrElse,
}

/// Pipelines separated by `&&` and `||`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AndOrList {
    pub first: Pipeline,
    pub rest: Vec<(AndOr, Pipeline)>,
}

/// Element of a [`List`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Item {
    /// Main part of this item
    pub and_or: AndOrList,
    /// Whether the item is terminated by `&`
    pub is_async: bool,
}

/// Sequence of [and-or lists](AndOrList) separated by `;` or `&`
///
/// A `List` is also the root node of a parsed program.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct List(pub Vec<Item>);

mod impl_display;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validity() {
        assert!(is_name("foo"));
        assert!(is_name("_foo_bar"));
        assert!(is_name("a1"));
        assert!(!is_name(""));
        assert!(!is_name("1a"));
        assert!(!is_name("foo-bar"));
        assert!(!is_name("foo=bar"));
    }

    #[test]
    fn word_literal_check() {
        let word = Word::unquoted("if", Span::dummy());
        assert_eq!(word.to_string_if_literal(), Some("if"));

        let word = Word {
            parts: vec![WordPart::single_quoted("if")],
            span: Span::dummy(),
        };
        assert_eq!(word.to_string_if_literal(), None);
    }

    #[test]
    fn word_quoting_flags() {
        let mut word = Word::unquoted("abc", Span::dummy());
        assert!(!word.was_quoted());
        word.parts.push(WordPart::double_quoted(""));
        assert!(word.was_quoted());
    }

    #[test]
    fn tilde_alone() {
        let mut word = Word::unquoted("~", Span::dummy());
        word.parse_tilde_front();
        assert_eq!(word.parts, [WordPart::Tilde("".to_string())]);
    }

    #[test]
    fn tilde_with_name_and_slash() {
        let mut word = Word::unquoted("~fred/src", Span::dummy());
        word.parse_tilde_front();
        assert_eq!(
            word.parts,
            [
                WordPart::Tilde("fred".to_string()),
                WordPart::unquoted("/src"),
            ]
        );
    }

    #[test]
    fn tilde_not_first() {
        let mut word = Word::unquoted("a~b", Span::dummy());
        word.parse_tilde_front();
        assert_eq!(word.parts, [WordPart::unquoted("a~b")]);
    }

    #[test]
    fn tilde_quoted_is_literal() {
        let mut word = Word {
            parts: vec![WordPart::single_quoted("~")],
            span: Span::dummy(),
        };
        word.parse_tilde_front();
        assert_eq!(word.parts, [WordPart::single_quoted("~")]);
    }

    #[test]
    fn tilde_followed_by_expansion_is_literal() {
        // `~$x` must not be split since the login name is not yet complete.
        let mut word = Word {
            parts: vec![
                WordPart::unquoted("~"),
                WordPart::Param {
                    param: Param::variable("x"),
                    quoted: false,
                },
            ],
            span: Span::dummy(),
        };
        let before = word.clone();
        word.parse_tilde_front();
        assert_eq!(word, before);
    }

    #[test]
    fn assign_from_word() {
        let word = Word::unquoted("foo=bar", Span::dummy());
        let assign = Assign::try_from(word).unwrap();
        assert_eq!(assign.name, "foo");
        assert_eq!(assign.value.parts, [WordPart::unquoted("bar")]);
    }

    #[test]
    fn assign_empty_value() {
        let word = Word::unquoted("foo=", Span::dummy());
        let assign = Assign::try_from(word).unwrap();
        assert_eq!(assign.name, "foo");
        assert_eq!(assign.value.parts, []);
    }

    #[test]
    fn assign_tilde_value() {
        let word = Word::unquoted("home=~/src", Span::dummy());
        let assign = Assign::try_from(word).unwrap();
        assert_eq!(
            assign.value.parts,
            [
                WordPart::Tilde("".to_string()),
                WordPart::unquoted("/src"),
            ]
        );
    }

    #[test]
    fn assign_rejects_non_assignments() {
        assert!(Assign::try_from(Word::unquoted("foobar", Span::dummy())).is_err());
        assert!(Assign::try_from(Word::unquoted("=bar", Span::dummy())).is_err());
        assert!(Assign::try_from(Word::unquoted("1a=bar", Span::dummy())).is_err());

        // Quoted `=` does not make an assignment.
        let word = Word {
            parts: vec![WordPart::double_quoted("foo=bar")],
            span: Span::dummy(),
        };
        assert!(Assign::try_from(word).is_err());
    }

    #[test]
    fn redir_default_descriptors() {
        let redir = Redir {
            fd: None,
            fd_location: None,
            body: RedirBody::Normal {
                operator: RedirOp::FileIn,
                operand: Word::unquoted("file", Span::dummy()),
            },
        };
        assert_eq!(redir.fd_or_default(), Fd::STDIN);

        let redir = Redir {
            fd: Some(Fd(2)),
            fd_location: None,
            body: RedirBody::Normal {
                operator: RedirOp::FileAppend,
                operand: Word::unquoted("file", Span::dummy()),
            },
        };
        assert_eq!(redir.fd_or_default(), Fd(2));
    }

    #[test]
    fn splitting_and_glob_hints() {
        let word = Word {
            parts: vec![WordPart::Param {
                param: Param::variable("x"),
                quoted: false,
            }],
            span: Span::dummy(),
        };
        assert!(word.needs_field_splitting());
        assert!(word.needs_pathname_expansion());

        let word = Word {
            parts: vec![WordPart::Param {
                param: Param::variable("x"),
                quoted: true,
            }],
            span: Span::dummy(),
        };
        assert!(!word.needs_field_splitting());
        assert!(!word.needs_pathname_expansion());

        let word = Word::unquoted("*.rs", Span::dummy());
        assert!(!word.needs_field_splitting());
        assert!(word.needs_pathname_expansion());
    }
}

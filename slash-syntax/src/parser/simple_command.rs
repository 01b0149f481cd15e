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

//! Syntax parser for simple commands
//!
//! A simple command is a sequence of assignment words, command words and
//! redirections. The word in command-name position is subject to alias
//! substitution: the replacement text is re-tokenized and spliced into the
//! token stream. A name that was already substituted in the current command
//! is not substituted again, and a replacement ending in a blank extends
//! the check to the following word.

use super::{Parser, ParseError, ParseErrorCause, Result};
use crate::alias::Alias;
use crate::lexer::{Keyword, Lexer, Operator, TokenId, TokenizeResult};
use crate::syntax::{Assign, Command, SimpleCommand, Word};
use std::rc::Rc;

impl Parser<'_> {
    /// Parses a simple command (or the function definition it turns out to
    /// be when the command word is followed by `()`).
    pub(super) fn simple_command(&mut self) -> Result<Command> {
        let mut assigns = Vec::new();
        let mut words: Vec<Word> = Vec::new();
        let mut redirs = Vec::new();

        loop {
            let token = self.peek()?;
            match token.id {
                TokenId::IoNumber(_) | TokenId::IoLocation => redirs.push(self.redirection()?),
                TokenId::Operator(op) if op.is_redirection() => redirs.push(self.redirection()?),
                TokenId::Token(_) => {
                    if words.is_empty() {
                        // Command-word position
                        if self.substitute_alias()? {
                            // A replacement that begins with a compound
                            // command keyword restarts command recognition.
                            if assigns.is_empty() && redirs.is_empty() {
                                if let TokenId::Token(Some(keyword)) = self.peek()?.id {
                                    if matches!(
                                        keyword,
                                        Keyword::If
                                            | Keyword::While
                                            | Keyword::Until
                                            | Keyword::For
                                            | Keyword::Case
                                            | Keyword::OpenBrace
                                    ) {
                                        return self.command();
                                    }
                                }
                            }
                            continue;
                        }
                        let token = self.take()?;
                        match Assign::try_from(token.word) {
                            Ok(assign) => assigns.push(assign),
                            Err(word) => {
                                if assigns.is_empty()
                                    && redirs.is_empty()
                                    && self.peek()?.id == TokenId::Operator(Operator::OpenParen)
                                {
                                    return self
                                        .function_definition(word)
                                        .map(Command::Function);
                                }
                                words.push(word);
                            }
                        }
                    } else {
                        if self.check_word_after_alias && self.queue.is_empty() {
                            self.check_word_after_alias = false;
                            if self.substitute_alias()? {
                                continue;
                            }
                        }
                        let token = self.take()?;
                        words.push(token.word);
                    }
                }
                _ => break,
            }
        }

        if assigns.is_empty() && words.is_empty() && redirs.is_empty() {
            return Err(self.unexpected());
        }
        Ok(Command::Simple(SimpleCommand {
            assigns,
            words,
            redirs,
        }))
    }

    /// Substitutes an alias for the next token if applicable.
    ///
    /// Returns true if a substitution was performed, in which case the
    /// replacement tokens have been spliced into the stream and the caller
    /// must re-examine the next token.
    fn substitute_alias(&mut self) -> Result<bool> {
        let (name, location) = {
            let token = self.peek()?;
            if !matches!(token.id, TokenId::Token(_)) {
                return Ok(false);
            }
            let Some(name) = token.word.to_string_if_literal() else {
                return Ok(false);
            };
            (name.to_string(), token.span().begin)
        };
        if !Alias::is_valid_name(&name) || self.active_aliases.contains(&name) {
            return Ok(false);
        }
        let Some(entry) = self.aliases.get(name.as_str()) else {
            return Ok(false);
        };
        let alias = Rc::clone(&entry.0);

        self.take()?;
        self.active_aliases.insert(alias.name.clone());
        self.check_word_after_alias = alias.replacement.ends_with([' ', '\t']);

        let mut lexer = Lexer::with_source(&alias.replacement);
        let complete = matches!(lexer.tokenize(), Ok(TokenizeResult::Complete));
        if !complete {
            return Err(ParseError {
                cause: ParseErrorCause::InvalidAliasReplacement {
                    name: alias.name.clone(),
                },
                location,
            });
        }
        let mut tokens = Vec::new();
        while let Some(token) = lexer.pop_first_token() {
            if token.id != TokenId::EndOfInput {
                tokens.push(token);
            }
        }
        // A trailing newline in the replacement would end the command here.
        while tokens
            .last()
            .is_some_and(|token| token.id == TokenId::Operator(Operator::Newline))
        {
            tokens.pop();
        }
        for token in tokens.into_iter().rev() {
            self.queue.push_front(token);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_command, parse_error};
    use super::super::Parser;
    use super::*;
    use crate::alias::{AliasSet, HashEntry};
    use crate::syntax::{RedirBody, RedirOp, WordPart};
    use assert_matches::assert_matches;

    fn parse_with_aliases(source: &str, aliases: &AliasSet) -> Command {
        let mut lexer = Lexer::with_source(source);
        lexer.tokenize().unwrap();
        let mut parser = Parser::new(&mut lexer, aliases);
        let mut list = parser.program().unwrap();
        let mut and_or = list.0.pop().unwrap().and_or;
        and_or.first.commands.pop().unwrap()
    }

    #[test]
    fn words_and_assignments() {
        let command = parse_command("a=1 b=2 echo x y\n");
        assert_matches!(command, Command::Simple(simple) => {
            assert_eq!(simple.assigns.len(), 2);
            assert_eq!(simple.assigns[0].name, "a");
            assert_eq!(simple.assigns[1].name, "b");
            assert_eq!(simple.words.len(), 3);
        });
    }

    #[test]
    fn assignment_after_command_word_is_a_word() {
        let command = parse_command("echo a=1\n");
        assert_matches!(command, Command::Simple(simple) => {
            assert_eq!(simple.assigns.len(), 0);
            assert_eq!(simple.words.len(), 2);
        });
    }

    #[test]
    fn assignments_only() {
        let command = parse_command("x=1\n");
        assert_matches!(command, Command::Simple(simple) => {
            assert_eq!(simple.assigns.len(), 1);
            assert!(simple.words.is_empty());
        });
    }

    #[test]
    fn redirections_anywhere() {
        let command = parse_command(">out echo 2>err x\n");
        assert_matches!(command, Command::Simple(simple) => {
            assert_eq!(simple.redirs.len(), 2);
            assert_eq!(simple.words.len(), 2);
            assert_matches!(&simple.redirs[0].body, RedirBody::Normal { operator, .. } => {
                assert_eq!(*operator, RedirOp::FileOut);
            });
        });
    }

    #[test]
    fn alias_substitution_in_command_position() {
        let mut aliases = AliasSet::new();
        aliases.insert(HashEntry::new("ll", "ls -l"));
        let command = parse_with_aliases("ll /tmp\n", &aliases);
        assert_matches!(command, Command::Simple(simple) => {
            let words: Vec<_> = simple
                .words
                .iter()
                .map(|w| w.to_string_if_literal().unwrap().to_string())
                .collect();
            assert_eq!(words, ["ls", "-l", "/tmp"]);
        });
    }

    #[test]
    fn alias_is_not_substituted_in_argument_position() {
        let mut aliases = AliasSet::new();
        aliases.insert(HashEntry::new("ll", "ls -l"));
        let command = parse_with_aliases("echo ll\n", &aliases);
        assert_matches!(command, Command::Simple(simple) => {
            assert_eq!(simple.words[1].to_string_if_literal(), Some("ll"));
        });
    }

    #[test]
    fn quoted_word_is_not_substituted() {
        let mut aliases = AliasSet::new();
        aliases.insert(HashEntry::new("ll", "ls -l"));
        let command = parse_with_aliases("'ll'\n", &aliases);
        assert_matches!(command, Command::Simple(simple) => {
            assert_matches!(&simple.words[0].parts[..], [WordPart::Literal { value, .. }] => {
                assert_eq!(value, "ll");
            });
        });
    }

    #[test]
    fn recursive_alias_is_bounded() {
        let mut aliases = AliasSet::new();
        aliases.insert(HashEntry::new("ls", "ls -F"));
        let command = parse_with_aliases("ls\n", &aliases);
        assert_matches!(command, Command::Simple(simple) => {
            let words: Vec<_> = simple
                .words
                .iter()
                .map(|w| w.to_string_if_literal().unwrap().to_string())
                .collect();
            assert_eq!(words, ["ls", "-F"]);
        });
    }

    #[test]
    fn trailing_blank_extends_substitution_to_next_word() {
        let mut aliases = AliasSet::new();
        aliases.insert(HashEntry::new("sudo", "env "));
        aliases.insert(HashEntry::new("ll", "ls -l"));
        let command = parse_with_aliases("sudo ll\n", &aliases);
        assert_matches!(command, Command::Simple(simple) => {
            let words: Vec<_> = simple
                .words
                .iter()
                .map(|w| w.to_string_if_literal().unwrap().to_string())
                .collect();
            assert_eq!(words, ["env", "ls", "-l"]);
        });
    }

    #[test]
    fn alias_substitution_never_crosses_the_command_boundary() {
        // The simple command has already begun when the replacement is
        // spliced, so a `!` in the replacement stays an ordinary word
        // instead of negating the pipeline.
        let mut aliases = AliasSet::new();
        aliases.insert(HashEntry::new("not", "! "));
        let mut lexer = Lexer::with_source("not true\n");
        lexer.tokenize().unwrap();
        let mut parser = Parser::new(&mut lexer, &aliases);
        let list = parser.program().unwrap();
        let simple = match &list.0[0].and_or.first.commands[0] {
            Command::Simple(simple) => simple,
            other => panic!("unexpected command {other:?}"),
        };
        assert!(!list.0[0].and_or.first.negation);
        assert_eq!(simple.words.len(), 2);
    }

    #[test]
    fn empty_simple_command_is_an_error() {
        let error = parse_error(";\n");
        assert_matches!(error.cause, ParseErrorCause::UnexpectedToken { .. });
    }
}

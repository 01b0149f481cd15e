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

//! Tokenization of arithmetic expressions

use std::ops::Range;
use thiserror::Error;

/// Cause of a tokenization error
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum TokenError {
    /// A character that cannot appear in an expression
    #[error("invalid character in arithmetic expression")]
    InvalidCharacter,
    /// A malformed numeric constant such as `08` or `1x`
    #[error("invalid numeric constant")]
    InvalidNumber,
}

/// Operator token
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `<<`
    LessLess,
    /// `>>`
    GreaterGreater,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `&`
    Ampersand,
    /// `^`
    Caret,
    /// `|`
    Bar,
    /// `&&`
    AmpersandAmpersand,
    /// `||`
    BarBar,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `=`
    Equal,
    /// `+=`
    PlusEqual,
    /// `-=`
    MinusEqual,
    /// `*=`
    AsteriskEqual,
    /// `/=`
    SlashEqual,
    /// `%=`
    PercentEqual,
    /// `<<=`
    LessLessEqual,
    /// `>>=`
    GreaterGreaterEqual,
    /// `&=`
    AmpersandEqual,
    /// `^=`
    CaretEqual,
    /// `|=`
    BarEqual,
}

impl Operator {
    /// If this operator is a compound assignment, returns the underlying
    /// binary operator.
    #[must_use]
    pub fn compound_assignment(self) -> Option<Operator> {
        use Operator::*;
        match self {
            PlusEqual => Some(Plus),
            MinusEqual => Some(Minus),
            AsteriskEqual => Some(Asterisk),
            SlashEqual => Some(Slash),
            PercentEqual => Some(Percent),
            LessLessEqual => Some(LessLess),
            GreaterGreaterEqual => Some(GreaterGreater),
            AmpersandEqual => Some(Ampersand),
            CaretEqual => Some(Caret),
            BarEqual => Some(Bar),
            _ => None,
        }
    }

    /// Whether this operator assigns to its left operand.
    #[must_use]
    pub fn is_assignment(self) -> bool {
        self == Operator::Equal || self.compound_assignment().is_some()
    }
}

/// Value of a token
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenValue<'a> {
    /// Numeric constant
    Number(i64),
    /// Variable name
    Name(&'a str),
    /// Operator
    Operator(Operator),
}

/// Token with the range it occupies in the expression
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Token<'a> {
    pub value: TokenValue<'a>,
    pub location: Range<usize>,
}

/// Tokenization error with its location
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("{cause}")]
pub struct Error {
    pub cause: TokenError,
    pub location: Range<usize>,
}

/// Iterator-like tokenizer over an expression string
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    source: &'a str,
    index: usize,
    /// One-token lookahead
    peeked: Option<Option<Token<'a>>>,
}

impl<'a> Tokens<'a> {
    /// Creates a tokenizer over the given expression.
    #[must_use]
    pub fn new(source: &'a str) -> Tokens<'a> {
        Tokens {
            source,
            index: 0,
            peeked: None,
        }
    }

    /// Returns the current position in the expression.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Peeks the next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<&Token<'a>>, Error> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scan()?);
        }
        Ok(self.peeked.as_ref().unwrap().as_ref())
    }

    /// Consumes and returns the next token.
    pub fn next(&mut self) -> Result<Option<Token<'a>>, Error> {
        if let Some(peeked) = self.peeked.take() {
            return Ok(peeked);
        }
        self.scan()
    }

    /// Scans one token from the current position.
    fn scan(&mut self) -> Result<Option<Token<'a>>, Error> {
        let rest = self.source[self.index..]
            .trim_start_matches(|c: char| c.is_ascii_whitespace());
        self.index = self.source.len() - rest.len();
        let start = self.index;

        let Some(c) = rest.chars().next() else {
            return Ok(None);
        };

        if c.is_ascii_digit() {
            return self.scan_number(start);
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let len = rest
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(rest.len());
            self.index = start + len;
            return Ok(Some(Token {
                value: TokenValue::Name(&rest[..len]),
                location: start..self.index,
            }));
        }

        use Operator::*;
        let (operator, len) = match c {
            '(' => (OpenParen, 1),
            ')' => (CloseParen, 1),
            '~' => (Tilde, 1),
            '?' => (Question, 1),
            ':' => (Colon, 1),
            ',' => (Comma, 1),
            '+' if rest.starts_with("+=") => (PlusEqual, 2),
            '+' => (Plus, 1),
            '-' if rest.starts_with("-=") => (MinusEqual, 2),
            '-' => (Minus, 1),
            '*' if rest.starts_with("*=") => (AsteriskEqual, 2),
            '*' => (Asterisk, 1),
            '/' if rest.starts_with("/=") => (SlashEqual, 2),
            '/' => (Slash, 1),
            '%' if rest.starts_with("%=") => (PercentEqual, 2),
            '%' => (Percent, 1),
            '<' if rest.starts_with("<<=") => (LessLessEqual, 3),
            '<' if rest.starts_with("<<") => (LessLess, 2),
            '<' if rest.starts_with("<=") => (LessEqual, 2),
            '<' => (Less, 1),
            '>' if rest.starts_with(">>=") => (GreaterGreaterEqual, 3),
            '>' if rest.starts_with(">>") => (GreaterGreater, 2),
            '>' if rest.starts_with(">=") => (GreaterEqual, 2),
            '>' => (Greater, 1),
            '=' if rest.starts_with("==") => (EqualEqual, 2),
            '=' => (Equal, 1),
            '!' if rest.starts_with("!=") => (BangEqual, 2),
            '!' => (Bang, 1),
            '&' if rest.starts_with("&&") => (AmpersandAmpersand, 2),
            '&' if rest.starts_with("&=") => (AmpersandEqual, 2),
            '&' => (Ampersand, 1),
            '|' if rest.starts_with("||") => (BarBar, 2),
            '|' if rest.starts_with("|=") => (BarEqual, 2),
            '|' => (Bar, 1),
            '^' if rest.starts_with("^=") => (CaretEqual, 2),
            '^' => (Caret, 1),
            _ => {
                return Err(Error {
                    cause: TokenError::InvalidCharacter,
                    location: start..start + c.len_utf8(),
                })
            }
        };
        self.index = start + len;
        Ok(Some(Token {
            value: TokenValue::Operator(operator),
            location: start..self.index,
        }))
    }

    /// Scans a numeric constant: decimal, octal (leading `0`) or
    /// hexadecimal (leading `0x`/`0X`).
    fn scan_number(&mut self, start: usize) -> Result<Option<Token<'a>>, Error> {
        let rest = &self.source[start..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());
        let text = &rest[..len];
        self.index = start + len;
        let location = start..self.index;

        let parsed = if let Some(hex) = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
        {
            i64::from_str_radix(hex, 16)
        } else if text.len() > 1 && text.starts_with('0') {
            i64::from_str_radix(&text[1..], 8)
        } else {
            text.parse()
        };
        match parsed {
            Ok(number) => Ok(Some(Token {
                value: TokenValue::Number(number),
                location,
            })),
            Err(_) => Err(Error {
                cause: TokenError::InvalidNumber,
                location,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<TokenValue<'_>> {
        let mut tokens = Tokens::new(source);
        let mut values = Vec::new();
        while let Some(token) = tokens.next().unwrap() {
            values.push(token.value);
        }
        values
    }

    #[test]
    fn numbers() {
        assert_eq!(tokens("42"), [TokenValue::Number(42)]);
        assert_eq!(tokens("0"), [TokenValue::Number(0)]);
        assert_eq!(tokens("010"), [TokenValue::Number(8)]);
        assert_eq!(tokens("0x1F"), [TokenValue::Number(31)]);
    }

    #[test]
    fn invalid_numbers() {
        for source in ["08", "1x", "0xg"] {
            let mut tokens = Tokens::new(source);
            let error = tokens.next().unwrap_err();
            assert_eq!(error.cause, TokenError::InvalidNumber, "source: {source:?}");
        }
    }

    #[test]
    fn names_and_operators() {
        assert_eq!(
            tokens("a_1+b"),
            [
                TokenValue::Name("a_1"),
                TokenValue::Operator(Operator::Plus),
                TokenValue::Name("b"),
            ]
        );
    }

    #[test]
    fn longest_operator_match() {
        assert_eq!(
            tokens("a<<=b"),
            [
                TokenValue::Name("a"),
                TokenValue::Operator(Operator::LessLessEqual),
                TokenValue::Name("b"),
            ]
        );
        assert_eq!(
            tokens("1<=2"),
            [
                TokenValue::Number(1),
                TokenValue::Operator(Operator::LessEqual),
                TokenValue::Number(2),
            ]
        );
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(
            tokens(" 1\t+\n2 "),
            [
                TokenValue::Number(1),
                TokenValue::Operator(Operator::Plus),
                TokenValue::Number(2),
            ]
        );
    }

    #[test]
    fn invalid_character() {
        let mut tokens = Tokens::new("1 @ 2");
        tokens.next().unwrap();
        let error = tokens.next().unwrap_err();
        assert_eq!(error.cause, TokenError::InvalidCharacter);
    }

    #[test]
    fn token_locations() {
        let mut tokens = Tokens::new("12 + ab");
        assert_eq!(tokens.next().unwrap().unwrap().location, 0..2);
        assert_eq!(tokens.next().unwrap().unwrap().location, 3..4);
        assert_eq!(tokens.next().unwrap().unwrap().location, 5..7);
    }
}

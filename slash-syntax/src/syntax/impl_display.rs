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

//! Implementations of [`std::fmt::Display`] for the syntax types
//!
//! The implementations render single-line source code with here-document
//! contents omitted. They are used in diagnostics and in the output of the
//! `type` and `trap` built-ins.

use super::*;
use itertools::Itertools;
use std::fmt;
use std::fmt::Write;

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamId::Variable(name) => name.fmt(f),
            ParamId::Special(special) => special.as_char().fmt(f),
            ParamId::Positional(index) => index.fmt(f),
        }
    }
}

impl fmt::Display for SwitchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SwitchType::*;
        let c = match self {
            Alter => '+',
            Default => '-',
            Assign => '=',
            Error => '?',
        };
        c.fmt(f)
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.condition == SwitchCondition::UnsetOrEmpty {
            f.write_char(':')?;
        }
        write!(f, "{}{}", self.r#type, self.word)
    }
}

impl fmt::Display for Trim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.side {
            TrimSide::Prefix => '#',
            TrimSide::Suffix => '%',
        };
        f.write_char(c)?;
        if self.length == TrimLength::Longest {
            f.write_char(c)?;
        }
        self.pattern.fmt(f)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modifier {
            Modifier::None => write!(f, "${{{}}}", self.id),
            Modifier::Length => write!(f, "${{#{}}}", self.id),
            Modifier::Switch(switch) => write!(f, "${{{}{}}}", self.id, switch),
            Modifier::Trim(trim) => write!(f, "${{{}{}}}", self.id, trim),
        }
    }
}

impl fmt::Display for WordPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordPart::Literal {
                value,
                single_quoted: true,
                ..
            } => write!(f, "'{value}'"),
            WordPart::Literal {
                value,
                double_quoted: true,
                ..
            } => write!(f, "\"{value}\""),
            WordPart::Literal { value, .. } => value.fmt(f),
            WordPart::Param { param, .. } => param.fmt(f),
            WordPart::CommandSubst {
                content,
                backquoted: true,
                ..
            } => write!(f, "`{content}`"),
            WordPart::CommandSubst { content, .. } => write!(f, "$({content})"),
            WordPart::Arith { expression, .. } => write!(f, "$(({expression}))"),
            WordPart::Tilde(name) => write!(f, "~{name}"),
        }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.parts.iter().try_for_each(|part| part.fmt(f))
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl fmt::Display for RedirOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RedirOp::*;
        let s = match self {
            FileIn => "<",
            FileInOut => "<>",
            FileOut => ">",
            FileAppend => ">>",
            FileClobber => ">|",
            FdIn => "<&",
            FdOut => ">&",
        };
        s.fmt(f)
    }
}

impl fmt::Display for Redir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(fd) = self.fd {
            fd.fmt(f)?;
        } else if let Some(name) = &self.fd_location {
            write!(f, "{{{name}}}")?;
        }
        match &self.body {
            RedirBody::Normal { operator, operand } => write!(f, "{operator}{operand}"),
            RedirBody::HereDoc(here_doc) => {
                let op = if here_doc.remove_tabs { "<<-" } else { "<<" };
                write!(f, "{op}{}", here_doc.delimiter)
            }
        }
    }
}

impl fmt::Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for assign in &self.assigns {
            write!(f, "{sep}{assign}")?;
            sep = " ";
        }
        for word in &self.words {
            write!(f, "{sep}{word}")?;
            sep = " ";
        }
        for redir in &self.redirs {
            write!(f, "{sep}{redir}")?;
            sep = " ";
        }
        Ok(())
    }
}

impl fmt::Display for CaseItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {};;", self.patterns.iter().format(" | "), self.body)
    }
}

impl fmt::Display for CompoundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CompoundCommand::*;
        match self {
            Grouping(body) => write!(f, "{{ {body}; }}"),
            Subshell(body) => write!(f, "({body})"),
            For {
                name,
                values: None,
                body,
            } => write!(f, "for {name} do {body}; done"),
            For {
                name,
                values: Some(values),
                body,
            } => {
                write!(f, "for {name} in")?;
                values.iter().try_for_each(|value| write!(f, " {value}"))?;
                write!(f, "; do {body}; done")
            }
            While { condition, body } => write!(f, "while {condition}; do {body}; done"),
            Until { condition, body } => write!(f, "until {condition}; do {body}; done"),
            If {
                condition,
                body,
                elifs,
                r#else,
            } => {
                write!(f, "if {condition}; then {body};")?;
                for elif in elifs {
                    write!(f, " elif {}; then {};", elif.condition, elif.body)?;
                }
                if let Some(else_body) = r#else {
                    write!(f, " else {else_body};")?;
                }
                write!(f, " fi")
            }
            Case { subject, items } => {
                write!(f, "case {subject} in")?;
                items.iter().try_for_each(|item| write!(f, " {item}"))?;
                write!(f, " esac")
            }
        }
    }
}

impl fmt::Display for FullCompoundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.command.fmt(f)?;
        self.redirs.iter().try_for_each(|redir| write!(f, " {redir}"))
    }
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}() {}", self.name, self.body)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Simple(command) => command.fmt(f),
            Command::Compound(command) => command.fmt(f),
            Command::Function(command) => command.fmt(f),
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negation {
            f.write_str("! ")?;
        }
        write!(f, "{}", self.commands.iter().format(" | "))
    }
}

impl fmt::Display for AndOr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AndOr::AndThen => f.write_str("&&"),
            AndOr::OrElse => f.write_str("||"),
        }
    }
}

impl fmt::Display for AndOrList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.first.fmt(f)?;
        self.rest
            .iter()
            .try_for_each(|(op, pipeline)| write!(f, " {op} {pipeline}"))
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A synchronous separator is omitted after the last item, so the
        // rendering composes into `{ ...; }` and `do ...; done` forms.
        let last = self.0.len().saturating_sub(1);
        for (index, item) in self.0.iter().enumerate() {
            item.and_or.fmt(f)?;
            if item.is_async {
                f.write_char('&')?;
            } else if index != last {
                f.write_str("; ")?;
            }
        }
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidewalk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidewalk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural queries over a [`Document`].
//!
//! Supports the subset of CSS selector syntax that target selectors are generated in:
//! type and universal selectors, `#id`, `.class`, attribute selectors (`[a]`, `=`, `~=`, `|=`,
//! `^=`, `$=`, `*=`), descendant and child combinators, and comma-separated lists. Backslash
//! escapes are honored in identifiers and quoted strings.

use std::fmt;

use super::{Document, Element, ElementId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    Empty,
    UnexpectedChar { ch: char, offset: usize },
    UnexpectedEnd,
    UnterminatedString,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("selector must not be empty"),
            Self::UnexpectedChar { ch, offset } => {
                write!(f, "unexpected character '{ch}' at offset {offset}")
            }
            Self::UnexpectedEnd => f.write_str("selector ended unexpectedly"),
            Self::UnterminatedString => f.write_str("unterminated string in selector"),
        }
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
    value: String,
}

impl AttrMatcher {
    fn matches(&self, element: &Element) -> bool {
        let Some(actual) = element.attr(&self.name) else {
            return false;
        };
        let expected = self.value.as_str();
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == expected,
            AttrOp::Includes => {
                !expected.is_empty()
                    && !expected.contains(char::is_whitespace)
                    && actual.split_whitespace().any(|token| token == expected)
            }
            AttrOp::DashMatch => {
                actual == expected
                    || actual.strip_prefix(expected).is_some_and(|rest| rest.starts_with('-'))
            }
            AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttrOp::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.ids.iter().all(|id| element.id() == Some(id.as_str()))
            && self.classes.iter().all(|class| element.has_class(class))
            && self.attrs.iter().all(|attr| attr.matches(element))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    /// Rightmost compound last. The combinator of the first part is unused.
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        match self.parts.len() {
            0 => false,
            len => matches_part(doc, &self.parts, len - 1, id),
        }
    }
}

fn matches_part(
    doc: &Document,
    parts: &[(Combinator, Compound)],
    index: usize,
    id: ElementId,
) -> bool {
    let Some(element) = doc.get(id) else {
        return false;
    };
    let (combinator, compound) = &parts[index];
    if !compound.matches(element) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match combinator {
        Combinator::Child => element
            .parent()
            .is_some_and(|parent| matches_part(doc, parts, index - 1, parent)),
        Combinator::Descendant => doc
            .ancestors(id)
            .any(|ancestor| matches_part(doc, parts, index - 1, ancestor)),
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.alternatives.iter().any(|complex| complex.matches(doc, id))
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self { chars: input.chars().collect(), pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar { ch, offset: self.pos },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Result<Selector, SelectorError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            alternatives.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => {
                    self.pos += 1;
                }
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            let compound = self.parse_compound()?;
            parts.push((combinator, compound));

            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinator = Combinator::Child;
                }
                Some(_) if had_ws => combinator = Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            }
        }
        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut any = false;

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                any = true;
            }
            Some(ch) if ch.is_ascii_alphabetic() => {
                compound.tag = Some(self.parse_ident()?);
                any = true;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.ids.push(self.parse_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                _ => break,
            }
            any = true;
        }

        if !any {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.pos += 1;
                    out.push(self.parse_escape()?);
                }
                Some(ch) if is_ident_char(ch) => {
                    self.pos += 1;
                    out.push(ch);
                }
                _ => break,
            }
        }
        if out.is_empty() {
            return Err(self.unexpected());
        }
        Ok(out)
    }

    fn parse_escape(&mut self) -> Result<char, SelectorError> {
        let first = self.bump().ok_or(SelectorError::UnexpectedEnd)?;
        if !first.is_ascii_hexdigit() {
            return Ok(first);
        }

        let mut hex = String::from(first);
        while hex.len() < 6 {
            match self.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => {
                    self.pos += 1;
                    hex.push(ch);
                }
                _ => break,
            }
        }
        if self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }

        let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
        Ok(match char::from_u32(code) {
            Some(ch) if code != 0 => ch,
            _ => char::REPLACEMENT_CHARACTER,
        })
    }

    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SelectorError::UnterminatedString),
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => match self.peek() {
                    None => return Err(SelectorError::UnterminatedString),
                    Some('\n') => {
                        self.pos += 1;
                    }
                    Some(_) => out.push(self.parse_escape()?),
                },
                Some(ch) => out.push(ch),
            }
        }
    }

    fn parse_attr(&mut self) -> Result<AttrMatcher, SelectorError> {
        self.skip_ws();
        let name = self.parse_ident()?;
        self.skip_ws();

        let op = match self.bump() {
            Some(']') => {
                return Ok(AttrMatcher { name, op: AttrOp::Exists, value: String::new() });
            }
            Some('=') => AttrOp::Equals,
            Some(prefix @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.bump() != Some('=') {
                    self.pos = self.pos.saturating_sub(1);
                    return Err(self.unexpected());
                }
                match prefix {
                    '~' => AttrOp::Includes,
                    '|' => AttrOp::DashMatch,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Substring,
                }
            }
            Some(_) => {
                self.pos -= 1;
                return Err(self.unexpected());
            }
            None => return Err(SelectorError::UnexpectedEnd),
        };

        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.parse_string(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_ws();

        if self.bump() != Some(']') {
            self.pos = self.pos.saturating_sub(1);
            return Err(self.unexpected());
        }
        Ok(AttrMatcher { name, op, value })
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()
}

fn push_hex_escape(out: &mut String, ch: char) {
    out.push_str(&format!("\\{:x} ", ch as u32));
}

/// Escapes a value for use inside a double-quoted selector string.
pub fn css_escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ch if ch.is_control() => push_hex_escape(&mut out, ch),
            ch => out.push(ch),
        }
    }
    out
}

/// Escapes a value for use as an identifier (`#id`, `.class`), following `CSS.escape`.
pub fn css_escape_ident(value: &str) -> String {
    let chars = value.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(value.len());
    for (index, &ch) in chars.iter().enumerate() {
        match ch {
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, ch),
            '0'..='9' if index == 0 || (index == 1 && chars[0] == '-') => {
                push_hex_escape(&mut out, ch)
            }
            '-' if index == 0 && chars.len() == 1 => out.push_str("\\-"),
            ch if is_ident_char(ch) => out.push(ch),
            ch => {
                out.push('\\');
                out.push(ch);
            }
        }
    }
    out
}

// XML IR (XIR)
//
//  Copyright (C) 2014-2022 Ryan Specialty Group, LLC.
//
//  This file is part of tailor.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Intermediate representation (IR) of LDML markup.
//!
//! XIR is _not_ intended to be comprehensive,
//!   or even general-purpose---it
//!     exists only to produce the fragments of LDML collation markup that
//!     tailorings compile into.
//! There is no reader;
//!   XIR is only ever lowered into bytes by the [`writer`].
//!
//! A [`Token`] stream is most easily produced using a [`Builder`],
//!   which keeps track of indentation and guarantees that every element
//!   that it opens is closed.
//!
//! _Note:_ XIR refers to "opening" and "closing" tags,
//!   as opposed to "start" and "end" as used in the XML specification.
//!
//! Escaping
//! ========
//! Text in a [`Token`] is always _escaped_.
//! The only way to construct [`Text`] is by [escaping](escape) a raw
//!   string,
//!     which prevents both XML injection and double-escaping.

use std::fmt::Display;

mod builder;
mod error;
pub mod escape;
pub mod st;
pub mod writer;

pub use builder::Builder;
pub use error::Error;

/// An infallible [`Token`] stream.
pub trait TokenStream: Iterator<Item = Token> {}
impl<I: Iterator<Item = Token>> TokenStream for I {}

/// An XML name without a namespace prefix.
///
/// LDML collation markup uses no namespaces,
///   and every name is known statically
///   (see [`st::qname`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName(&'static str);

impl QName {
    /// Construct a name from a static string without validating it.
    ///
    /// The string must be a valid XML
    ///   [NCName](https://www.w3.org/TR/REC-xml-names/#NT-NCName);
    ///     it is written verbatim.
    pub const fn st(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Escaped text suitable for writing as character data or as an attribute
///   value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(String);

impl Text {
    /// Escape a raw string.
    pub fn escape(raw: &str) -> Self {
        Self(escape::escape(raw).into_owned())
    }

    /// Escape a raw string for use as an attribute value.
    pub fn escape_attr(raw: &str) -> Self {
        Self(escape::escape_attr(raw).into_owned())
    }

    /// The escaped text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A string consisting only of ASCII whitespace.
///
/// Whitespace is used for formatting of the output and is otherwise
///   insignificant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Whitespace(String);

impl Whitespace {
    pub fn newline() -> Self {
        Self("\n".into())
    }

    /// Whitespace consisting of `n` repetitions of `self`.
    pub fn repeat(&self, n: usize) -> Self {
        Self(self.0.repeat(n))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Whitespace {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if !value.bytes().all(|b| b.is_ascii_whitespace()) {
            return Err(Error::NotWhitespace(value.into()));
        }

        Ok(Self(value.into()))
    }
}

impl TryFrom<String> for Whitespace {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Whitespace::try_from(value.as_str())
    }
}

impl Display for Whitespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.escape_debug().fmt(f)
    }
}

/// Lexeme of an LDML fragment.
///
/// Tokens are produced in document order and are lowered into bytes by
///   the [`writer`];
///     the writer is responsible for rejecting sequences that would
///     produce malformed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Opening tag of an element.
    Open(QName),

    /// Closing tag of an element.
    ///
    /// If no name is provided,
    ///   the element is self-closing
    ///   (e.g. `<alias/>`).
    Close(Option<QName>),

    /// Element attribute name.
    AttrName(QName),

    /// Element attribute value,
    ///   following an [`AttrName`](Token::AttrName).
    AttrValue(Text),

    /// Character data.
    Text(Text),

    /// Insignificant whitespace between nodes.
    Whitespace(Whitespace),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(name) => write!(f, "`<{name}>`"),
            Self::Close(Some(name)) => write!(f, "`</{name}>`"),
            Self::Close(None) => write!(f, "`/>`"),
            Self::AttrName(name) => write!(f, "`@{name}`"),
            Self::AttrValue(value) => write!(f, "attribute value `{value}`"),
            Self::Text(text) => write!(f, "text `{text}`"),
            Self::Whitespace(ws) => write!(f, "whitespace `{ws}`"),
        }
    }
}

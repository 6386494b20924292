// Collation tailoring rules
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

//! Collation tailoring rule strings.
//!
//! A tailoring rule string is the legacy ICU syntax for describing how a
//!   locale's collation order differs from the root order,
//!     for example:
//!
//! ```text
//! [strength 3][backwards 2] & a < b << c <<< d ; e , f = g / h | i
//! ```
//!
//! The [`lex`] module scans such a string into [`RuleToken`]s,
//!   one per strength operator,
//!   and the [`setting`] module decodes the bracketed payloads that
//!     those tokens may carry.
//! Neither assigns any collation semantics to the rules;
//!   they exist only to transcribe the rule syntax into LDML
//!     (see [`crate::compile`]).
//!
//! Token Text
//! ==========
//! The text of a [`RuleToken`] is the literal operand of its operator with
//!   quoting and escaping already removed.
//! It may additionally contain two structural markers:
//!
//!   - [`EXPANSION_MARKER`] separates the operand from its expansion
//!       (the portion after `/`); and
//!   - [`CONTEXT_SEPARATOR`] separates a context prefix from the operand
//!       (the portion before `|`).
//!
//! The lexer does not otherwise interpret these markers;
//!   consumers split on them.

use memchr::{memchr, memmem};
use std::{cmp::Ordering, fmt::Display};

use crate::span::Span;

mod error;
pub mod lex;
pub mod setting;

pub use error::{
    AllocError, ConfigError, LexError, SyntaxError, SyntaxErrorKind,
};
pub use lex::Lexer;

/// Marker separating a token's text from its expansion.
///
/// This is a noncharacter and is rejected if it appears in the input,
///   so it cannot be confused with rule text.
pub const EXPANSION_MARKER: char = '\u{FFFF}';

/// Marker separating a context prefix from the remainder of a token's
///   text.
///
/// Unlike [`EXPANSION_MARKER`],
///   this is the same character that appears in the rule string,
///   and so a lone `|` is just that.
pub const CONTEXT_SEPARATOR: char = '|';

/// UTF-8 encoding of [`EXPANSION_MARKER`] for byte searches.
const EXPANSION_MARKER_UTF8: &[u8] = "\u{FFFF}".as_bytes();

/// Strength of a rule token.
///
/// The first four variants are the collation strengths that a rule
///   operates at;
///     only those are ordered relative to one-another
///     (see [`PartialOrd`] impl).
/// The remaining variants classify control tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strength {
    /// `<`
    Primary,
    /// `<<` or `;`
    Secondary,
    /// `<<<` or `,`
    Tertiary,
    /// `=`
    Identical,
    /// `&`,
    ///   or an implicit reset to the top of the order.
    Reset,
    /// A bracketed setting such as `[strength 2]`.
    Setting,
    /// `@`,
    ///   the legacy French secondary override.
    Override,
    /// End of input.
    Done,
}

impl Strength {
    /// Relative rank of a collation strength,
    ///   or [`None`] for control tokens.
    fn rank(&self) -> Option<u8> {
        match self {
            Self::Primary => Some(1),
            Self::Secondary => Some(2),
            Self::Tertiary => Some(3),
            Self::Identical => Some(4),
            Self::Reset | Self::Setting | Self::Override | Self::Done => None,
        }
    }

    /// Whether this strength represents a rule relative to a previous
    ///   position,
    ///     as opposed to a control token.
    pub fn is_relation(&self) -> bool {
        self.rank().is_some()
    }
}

impl PartialOrd for Strength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }

        self.rank()
            .zip(other.rank())
            .map(|(ours, theirs)| ours.cmp(&theirs))
    }
}

impl Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Tertiary => write!(f, "tertiary"),
            Self::Identical => write!(f, "identical"),
            Self::Reset => write!(f, "reset"),
            Self::Setting => write!(f, "setting"),
            Self::Override => write!(f, "override"),
            Self::Done => write!(f, "end of rules"),
        }
    }
}

/// A single operator and its operand.
///
/// See the [module-level documentation](self) for a description of
///   the structure of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    pub strength: Strength,
    pub text: String,
    pub span: Span,
}

impl RuleToken {
    pub fn new<S: Into<String>>(
        strength: Strength,
        text: S,
        span: Span,
    ) -> Self {
        Self {
            strength,
            text: text.into(),
            span,
        }
    }

    /// Token signaling the end of input.
    pub fn done(span: Span) -> Self {
        Self::new(Strength::Done, String::new(), span)
    }

    pub fn is_done(&self) -> bool {
        self.strength == Strength::Done
    }
}

impl Display for RuleToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} `{}`", self.strength, self.text.escape_debug())
    }
}

/// Whether the text represents more than one logical character.
///
/// Logical characters are Unicode scalar values;
///   a supplementary character counts as one.
/// Structural markers count as characters,
///   since they too prevent the text from being a lone character.
pub fn is_contraction(text: &str) -> bool {
    text.chars().nth(1).is_some()
}

/// Whether the text contains an [`EXPANSION_MARKER`].
pub fn has_expansion(text: &str) -> bool {
    memmem::find(text.as_bytes(), EXPANSION_MARKER_UTF8).is_some()
}

/// Whether the text contains a [`CONTEXT_SEPARATOR`].
pub fn has_context(text: &str) -> bool {
    memchr(CONTEXT_SEPARATOR as u8, text.as_bytes()).is_some()
}

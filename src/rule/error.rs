// Rule string errors
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

//! Errors produced while scanning and decoding rule strings.

use arrayvec::ArrayString;
use std::{collections::TryReserveError, error::Error, fmt::Display};

use crate::{
    diagnose::{Annotate, AnnotatedSpan, Diagnostic},
    global,
    span::Span,
};

/// Maximum number of characters of context retained on either side of the
///   offending character of a [`SyntaxError`].
pub const CONTEXT_CHARS: usize = global::PARSE_CONTEXT_LEN - 1;

/// Byte capacity needed to hold [`CONTEXT_CHARS`] characters of any
///   width.
const CONTEXT_CAP: usize = CONTEXT_CHARS * 4;

/// Bounded excerpt of a rule string surrounding a [`SyntaxError`].
pub type Context = ArrayString<CONTEXT_CAP>;

/// Error while scanning a rule string into tokens.
#[derive(Debug, PartialEq, Eq)]
pub enum LexError {
    Syntax(SyntaxError),
    Alloc(AllocError),
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(e) => e.fmt(f),
            Self::Alloc(e) => e.fmt(f),
        }
    }
}

impl Error for LexError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            Self::Alloc(e) => Some(e),
        }
    }
}

impl Diagnostic for LexError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Syntax(e) => e.describe(),
            Self::Alloc(e) => e.describe(),
        }
    }
}

impl From<SyntaxError> for LexError {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

impl From<AllocError> for LexError {
    fn from(e: AllocError) -> Self {
        Self::Alloc(e)
    }
}

/// The specific reason that a rule string could not be scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Text was encountered before any strength operator.
    MissingStrength(char),
    /// An unquoted special character appeared outside of a setting.
    SpecialChar(char),
    /// A quote appeared before any strength operator.
    StrayQuote,
    /// A quoted section was never closed.
    UnterminatedQuote,
    /// An escape appeared before any strength operator or at the end of
    ///   the input.
    StrayEscape,
    /// An expansion (`/`) appeared before any strength operator.
    MisplacedExpansion,
    /// The input contained the noncharacter used internally to mark
    ///   expansions.
    ReservedCodePoint,
}

impl Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStrength(c) => {
                write!(f, "expected a strength operator before `{c}`")
            }
            Self::SpecialChar(c) => {
                write!(f, "special character `{c}` must be quoted")
            }
            Self::StrayQuote => write!(f, "quote before any strength operator"),
            Self::UnterminatedQuote => write!(f, "unterminated quote"),
            Self::StrayEscape => write!(f, "escape does not apply to any text"),
            Self::MisplacedExpansion => {
                write!(f, "expansion before any strength operator")
            }
            Self::ReservedCodePoint => {
                write!(f, "reserved code point U+FFFF in rule string")
            }
        }
    }
}

/// A rule string could not be scanned.
///
/// In addition to a [`Span`],
///   the error retains up to [`CONTEXT_CHARS`] characters of the rule
///   string on either side of the offending character,
///     so that the error remains useful even when it outlives its rule
///     string.
/// The offending character itself is part of neither context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    kind: SyntaxErrorKind,
    span: Span,
    pre_context: Context,
    post_context: Context,
}

impl SyntaxError {
    /// Construct an error for the character of `src` beginning at byte
    ///   offset `at`.
    ///
    /// `at` must lie on a character boundary of `src`;
    ///   it is otherwise clamped to the nearest preceding boundary.
    pub fn new(kind: SyntaxErrorKind, src: &str, at: usize) -> Self {
        let mut at = at.min(src.len());
        while !src.is_char_boundary(at) {
            at -= 1;
        }

        let offending_len = src[at..].chars().next().map_or(0, char::len_utf8);

        let pre_start = src[..at]
            .char_indices()
            .rev()
            .take(CONTEXT_CHARS)
            .last()
            .map_or(at, |(i, _)| i);

        let post = src[at..].chars().skip(1).take(CONTEXT_CHARS);

        let mut pre_context = Context::new();
        let mut post_context = Context::new();

        // Capacity accommodates the widest possible encoding,
        //   so neither of these will truncate.
        let _ = pre_context.try_push_str(&src[pre_start..at]);
        post.for_each(|c| {
            let _ = post_context.try_push(c);
        });

        Self {
            kind,
            span: Span::from_usize_interval(at, at + offending_len),
            pre_context,
            post_context,
        }
    }

    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Rule text immediately preceding the offending character.
    pub fn pre_context(&self) -> &str {
        &self.pre_context
    }

    /// Rule text immediately following the offending character.
    pub fn post_context(&self) -> &str {
        &self.post_context
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (after {:?}, before {:?})",
            self.kind,
            self.pre_context.as_str(),
            self.post_context.as_str(),
        )
    }
}

impl Error for SyntaxError {}

impl Diagnostic for SyntaxError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        use SyntaxErrorKind::*;

        match self.kind {
            MissingStrength(_) => self
                .span
                .error("not preceded by `&`, `<`, `;`, `,`, or `=`")
                .with_help("begin the rule string with a reset such as `&a`")
                .into(),

            SpecialChar(c) => self
                .span
                .error("special character")
                .with_help(format!("write this as `'{c}'`"))
                .into(),

            StrayQuote | StrayEscape | MisplacedExpansion => vec![
                self.span.error("not part of any rule"),
                self.span
                    .note("rule text must follow `&`, `<`, `;`, `,`, or `=`"),
            ],

            UnterminatedQuote => self
                .span
                .error("quote opened here")
                .with_help(
                    "close the quote with `'`; \
                       write `''` for a literal quote",
                )
                .into(),

            ReservedCodePoint => vec![
                self.span.error("reserved code point"),
                self.span
                    .note("U+FFFF marks expansions and cannot be tailored"),
            ],
        }
    }
}

/// The token buffer could not be grown to accommodate a token.
///
/// This is not recoverable;
///   compilation of the rule string is abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocError {
    requested: usize,
    span: Span,
    source: TryReserveError,
}

impl AllocError {
    pub fn new(requested: usize, span: Span, source: TryReserveError) -> Self {
        Self {
            requested,
            span,
            source,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl Display for AllocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unable to allocate {} bytes for rule token",
            self.requested
        )
    }
}

impl Error for AllocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl Diagnostic for AllocError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        vec![self.span.internal_error("while scanning this token")]
    }
}

/// A setting or reset could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The setting name is not recognized.
    UnknownSetting(String, Span),
    /// The setting is recognized but its value is not permitted.
    InvalidSettingValue {
        name: String,
        value: String,
        span: Span,
    },
    /// The setting has no value.
    MissingSettingValue(String, Span),
    /// A setting token contains text outside of brackets.
    UnexpectedSettingText(String, Span),
    /// A bracket was opened but not closed.
    UnterminatedSetting(String, Span),
    /// A bracketed reset payload is not a recognized anchor.
    UnknownResetAnchor(String, Span),
    /// `[before N]` with `N` outside of the permitted range.
    InvalidBeforeStrength(String, Span),
    /// A reset anchor is followed by additional text.
    UnexpectedResetText(String, Span),
}

impl ConfigError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnknownSetting(_, span)
            | Self::InvalidSettingValue { span, .. }
            | Self::MissingSettingValue(_, span)
            | Self::UnexpectedSettingText(_, span)
            | Self::UnterminatedSetting(_, span)
            | Self::UnknownResetAnchor(_, span)
            | Self::InvalidBeforeStrength(_, span)
            | Self::UnexpectedResetText(_, span) => *span,
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSetting(name, _) => {
                write!(f, "unknown setting `{name}`")
            }
            Self::InvalidSettingValue { name, value, .. } => {
                write!(f, "invalid value `{value}` for setting `{name}`")
            }
            Self::MissingSettingValue(name, _) => {
                write!(f, "missing value for setting `{name}`")
            }
            Self::UnexpectedSettingText(text, _) => {
                write!(f, "unexpected text `{text}` outside of setting")
            }
            Self::UnterminatedSetting(text, _) => {
                write!(f, "unterminated setting `{text}`")
            }
            Self::UnknownResetAnchor(anchor, _) => {
                write!(f, "unknown reset position `[{anchor}]`")
            }
            Self::InvalidBeforeStrength(n, _) => {
                write!(f, "invalid strength `{n}` for `[before]`")
            }
            Self::UnexpectedResetText(text, _) => {
                write!(f, "unexpected text `{text}` after reset position")
            }
        }
    }
}

impl Error for ConfigError {}

impl Diagnostic for ConfigError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        let span = self.span();

        match self {
            Self::UnknownSetting(..) => span
                .error("setting not recognized")
                .with_help(
                    "expected one of `strength`, `alternate`, `backwards`, \
                       `normalization`, `caseLevel`, `casefirst`, \
                       `hiraganaQ`, `numeric`, `suppressContractions`, \
                       or `optimize`",
                )
                .into(),

            Self::InvalidSettingValue { name, .. } if name == "strength" => {
                span.error("invalid strength")
                    .with_help("expected a strength between `1` and `5`")
                    .into()
            }

            Self::InvalidSettingValue { name, .. } if name == "backwards" => {
                span.error("invalid value")
                    .with_help("only `[backwards 2]` is supported")
                    .into()
            }

            Self::InvalidSettingValue { .. } => {
                span.error("invalid value").into()
            }

            Self::MissingSettingValue(..) => {
                span.error("expected a value after the setting name").into()
            }

            Self::UnexpectedSettingText(..) | Self::UnterminatedSetting(..) => {
                span.error("in this setting").into()
            }

            Self::UnknownResetAnchor(..) => span
                .error("reset position not recognized")
                .with_help(
                    "expected e.g. `[top]`, `[first regular]`, \
                       or `[last tertiary ignorable]`",
                )
                .into(),

            Self::InvalidBeforeStrength(..) => span
                .error("invalid strength")
                .with_help("expected `[before 1]` through `[before 4]`")
                .into(),

            Self::UnexpectedResetText(..) => span
                .error("in this reset")
                .with_help(
                    "a reset position stands alone; \
                       begin a new rule with `<`",
                )
                .into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn context_excludes_offending_char() {
        let err = SyntaxError::new(
            SyntaxErrorKind::SpecialChar('#'),
            "&a<b#cd",
            4,
        );

        assert_eq!("&a<b", err.pre_context());
        assert_eq!("cd", err.post_context());
        assert_eq!(Span::new(4, 1), err.span());
    }

    #[test]
    fn context_is_bounded_in_characters() {
        let src = format!("{}#{}", "é".repeat(20), "ü".repeat(20));
        let at = "é".len() * 20;

        let err = SyntaxError::new(SyntaxErrorKind::SpecialChar('#'), &src, at);

        assert_eq!("é".repeat(CONTEXT_CHARS), err.pre_context());
        assert_eq!("ü".repeat(CONTEXT_CHARS), err.post_context());
    }

    #[test]
    fn context_at_end_of_input() {
        let err = SyntaxError::new(SyntaxErrorKind::StrayEscape, "&a\\", 2);

        assert_eq!("&a", err.pre_context());
        assert_eq!("", err.post_context());
    }

    #[test]
    fn display_includes_context() {
        let err = SyntaxError::new(SyntaxErrorKind::SpecialChar('#'), "a#b", 1);

        assert_eq!(
            "special character `#` must be quoted \
               (after \"a\", before \"b\")",
            err.to_string(),
        );
    }

    #[test]
    fn stray_text_notes_operators() {
        let err = SyntaxError::new(SyntaxErrorKind::StrayQuote, "'a'", 0);
        let span = Span::new(0, 1);

        assert_eq!(
            vec![
                span.error("not part of any rule"),
                span.note(
                    "rule text must follow `&`, `<`, `;`, `,`, or `=`"
                ),
            ],
            err.describe(),
        );
    }

    #[test]
    fn special_char_suggests_quoting() {
        let err = SyntaxError::new(SyntaxErrorKind::SpecialChar('#'), "a#", 1);
        let span = Span::new(1, 1);

        assert_eq!(
            vec![
                span.error("special character"),
                span.help("write this as `'#'`"),
            ],
            err.describe(),
        );
    }
}

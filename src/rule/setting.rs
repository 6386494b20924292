// Setting and reset decoding
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

//! Decoding of bracketed payloads.
//!
//! Brackets appear in two places in a rule string:
//!
//!   1. [`Strength::Setting`](super::Strength::Setting) tokens consist of
//!        one or more `[name value]` groups,
//!          decoded by [`decode_settings`] into LDML [`Setting`]s and
//!          [`Directive`]s; and
//!   2. [`Strength::Reset`](super::Strength::Reset) tokens may name a
//!        symbolic position such as `[last regular]` or be prefixed with
//!        `[before N]`,
//!          decoded by [`decode_reset`].
//!
//! Setting names are translated to their LDML attribute names;
//!   values are validated only where LDML constrains them
//!     (`strength` and `backwards`)
//!   and are otherwise carried through verbatim.

use crate::span::Span;

use super::ConfigError;

/// A collation setting rendered as an attribute of `<settings>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    name: &'static str,
    value: String,
}

impl Setting {
    /// LDML attribute name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Kind of [`Directive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    SuppressContractions,
    Optimize,
}

/// A setting whose value is a character set rendered as its own element
///   rather than as an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    kind: DirectiveKind,
    set: String,
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        self.kind
    }

    /// The character set,
    ///   verbatim as it appeared in the rule string.
    pub fn set(&self) -> &str {
        &self.set
    }
}

/// Result of decoding a single `[name value]` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Setting(Setting),
    Directive(Directive),
}

/// Decode every `[name value]` group of a setting token.
///
/// Only whitespace may appear between groups.
/// `span` is the span of the token and is used for every error.
pub fn decode_settings(
    payload: &str,
    span: Span,
) -> Result<Vec<Decoded>, ConfigError> {
    split_groups(payload, span)?
        .into_iter()
        .map(|group| {
            let group = group.trim();

            let (name, value) = group
                .split_once(char::is_whitespace)
                .map_or((group, ""), |(name, value)| (name, value.trim()));

            decode_setting(name, value, span)
        })
        .collect()
}

/// Decode a single setting by its rule-string `name`.
pub fn decode_setting(
    name: &str,
    value: &str,
    span: Span,
) -> Result<Decoded, ConfigError> {
    let invalid = || ConfigError::InvalidSettingValue {
        name: name.to_string(),
        value: value.to_string(),
        span,
    };

    // Values are written verbatim into an attribute,
    //   which cannot represent control characters.
    let attr = |name: &'static str| {
        if value.chars().any(|c| c.is_control()) {
            return Err(invalid());
        }

        Ok(Decoded::Setting(Setting {
            name,
            value: value.to_string(),
        }))
    };

    let directive = |kind| {
        Decoded::Directive(Directive {
            kind,
            set: value.to_string(),
        })
    };

    if value.is_empty() {
        return Err(ConfigError::MissingSettingValue(name.to_string(), span));
    }

    match name {
        "strength" => {
            let level = match value {
                "1" => "primary",
                "2" => "secondary",
                "3" => "tertiary",
                "4" => "quaternary",
                "5" => "identical",
                _ => return Err(invalid()),
            };

            Ok(Decoded::Setting(Setting {
                name: "strength",
                value: level.to_string(),
            }))
        }

        // Only French secondary ordering is expressible in the rule
        //   syntax.
        "backwards" if value == "2" => Ok(Decoded::Setting(Setting {
            name: "backwards",
            value: "on".to_string(),
        })),
        "backwards" => Err(invalid()),

        "alternate" => attr("alternate"),
        "normalization" => attr("normalization"),
        "caseLevel" => attr("caseLevel"),
        "numeric" => attr("numeric"),
        "casefirst" => attr("caseFirst"),
        "hiraganaQ" => attr("hiraganaQuarternary"),

        "suppressContractions" => {
            Ok(directive(DirectiveKind::SuppressContractions))
        }
        "optimize" => Ok(directive(DirectiveKind::Optimize)),

        _ => Err(ConfigError::UnknownSetting(name.to_string(), span)),
    }
}

/// Split a payload into the contents of its top-level bracket groups.
fn split_groups(payload: &str, span: Span) -> Result<Vec<&str>, ConfigError> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in payload.char_indices() {
        match (c, depth) {
            ('[', 0) => {
                depth = 1;
                start = i + 1;
            }
            ('[', _) => depth += 1,
            (']', 1) => {
                depth = 0;
                groups.push(&payload[start..i]);
            }
            (']', 0) => {
                return Err(ConfigError::UnexpectedSettingText(
                    payload[i..].to_string(),
                    span,
                ))
            }
            (']', _) => depth -= 1,
            (c, 0) if !c.is_whitespace() => {
                return Err(ConfigError::UnexpectedSettingText(
                    payload[i..].to_string(),
                    span,
                ))
            }
            _ => (),
        }
    }

    if depth > 0 {
        return Err(ConfigError::UnterminatedSetting(payload.to_string(), span));
    }

    Ok(groups)
}

/// A symbolic position within the collation order that a reset may
///   target in place of literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetAnchor {
    FirstNonIgnorable,
    LastNonIgnorable,
    FirstPrimaryIgnorable,
    LastPrimaryIgnorable,
    FirstSecondaryIgnorable,
    LastSecondaryIgnorable,
    FirstTertiaryIgnorable,
    LastTertiaryIgnorable,
    FirstVariable,
    LastVariable,
    FirstTrailing,
    LastTrailing,
}

impl ResetAnchor {
    /// Look up an anchor by its bracket payload,
    ///   ignoring surrounding and repeated whitespace.
    pub fn from_payload(payload: &str) -> Option<Self> {
        use ResetAnchor::*;

        let words = payload.split_whitespace().collect::<Vec<_>>();

        Some(match words.as_slice() {
            ["top"] | ["last", "regular"] => LastNonIgnorable,
            ["first", "regular"] => FirstNonIgnorable,
            ["first", "primary", "ignorable"] => FirstPrimaryIgnorable,
            ["last", "primary", "ignorable"] => LastPrimaryIgnorable,
            ["first", "secondary", "ignorable"] => FirstSecondaryIgnorable,
            ["last", "secondary", "ignorable"] => LastSecondaryIgnorable,
            ["first", "tertiary", "ignorable"] => FirstTertiaryIgnorable,
            ["last", "tertiary", "ignorable"] => LastTertiaryIgnorable,
            ["first", "variable"] => FirstVariable,
            ["last", "variable"] => LastVariable,
            ["first", "trailing"] => FirstTrailing,
            ["last", "trailing"] => LastTrailing,
            _ => return None,
        })
    }

    /// Name of the LDML element representing this anchor.
    pub fn element_name(&self) -> &'static str {
        use ResetAnchor::*;

        match self {
            FirstNonIgnorable => "first_non_ignorable",
            LastNonIgnorable => "last_non_ignorable",
            FirstPrimaryIgnorable => "first_primary_ignorable",
            LastPrimaryIgnorable => "last_primary_ignorable",
            FirstSecondaryIgnorable => "first_secondary_ignorable",
            LastSecondaryIgnorable => "last_secondary_ignorable",
            FirstTertiaryIgnorable => "first_tertiary_ignorable",
            LastTertiaryIgnorable => "last_tertiary_ignorable",
            FirstVariable => "first_variable",
            LastVariable => "last_variable",
            FirstTrailing => "first_trailing",
            LastTrailing => "last_trailing",
        }
    }
}

/// What a reset positions subsequent rules relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPosition<'a> {
    Anchor(ResetAnchor),
    /// Literal reset text,
    ///   which may include an expansion marker.
    Literal(&'a str),
}

/// A decoded reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reset<'a> {
    /// Strength name of a `[before N]` prefix.
    pub before: Option<&'static str>,
    pub position: ResetPosition<'a>,
}

/// Decode the text of a reset token.
///
/// Text that does not begin with a bracket group is a literal reset.
/// A bracket group that is neither `[before N]` nor a known
///   [`ResetAnchor`] is an error.
pub fn decode_reset(
    text: &str,
    span: Span,
) -> Result<Reset<'_>, ConfigError> {
    let mut before = None;
    let mut rest = text;

    if let Some((payload, tail)) = split_bracket(rest) {
        let mut words = payload.split_whitespace();

        if words.next() == Some("before") {
            before = Some(before_strength(words.collect(), span)?);
            rest = tail;
        }
    }

    let position = match split_bracket(rest) {
        Some((payload, tail)) => {
            let anchor =
                ResetAnchor::from_payload(payload).ok_or_else(|| {
                    let name = payload.trim().to_string();
                    ConfigError::UnknownResetAnchor(name, span)
                })?;

            if !tail.is_empty() {
                return Err(ConfigError::UnexpectedResetText(
                    tail.to_string(),
                    span,
                ));
            }

            ResetPosition::Anchor(anchor)
        }

        None => ResetPosition::Literal(rest),
    };

    Ok(Reset { before, position })
}

/// Strength name for the arguments of `[before N]`.
fn before_strength(
    args: Vec<&str>,
    span: Span,
) -> Result<&'static str, ConfigError> {
    match args.as_slice() {
        ["1"] => Ok("primary"),
        ["2"] => Ok("secondary"),
        ["3"] => Ok("tertiary"),
        ["4"] => Ok("quaternary"),
        _ => Err(ConfigError::InvalidBeforeStrength(args.join(" "), span)),
    }
}

/// Split a leading bracket group from `text`,
///   yielding its payload and the text following the group.
///
/// Text that does not begin with a closed group yields [`None`].
fn split_bracket(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_prefix('[')?;
    let mut depth = 1usize;

    for (i, c) in inner.char_indices() {
        match c {
            '[' => depth += 1,
            ']' if depth == 1 => return Some((&inner[..i], &inner[i + 1..])),
            ']' => depth -= 1,
            _ => (),
        }
    }

    None
}

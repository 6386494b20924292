// Rule string lexer
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

//! Lexer producing [`RuleToken`]s from a rule string.
//!
//! The lexer is a hand-written scanner that produces one token per
//!   strength operator,
//!     accumulating the operand that follows the operator into the
//!     token's text.
//! A token ends when a second operator is encountered;
//!   that operator is not consumed and begins the next token.
//!
//! ```
//! use tailor::rule::{Lexer, Strength};
//!
//! let toks = Lexer::new("&a < b")
//!     .map(|tok| tok.map(|t| (t.strength, t.text)))
//!     .collect::<Result<Vec<_>, _>>();
//!
//! assert_eq!(
//!     Ok(vec![
//!         (Strength::Reset, "a".to_string()),
//!         (Strength::Primary, "b".to_string()),
//!     ]),
//!     toks,
//! );
//! ```
//!
//! Scanning State
//! ==============
//! Within a single token the lexer tracks:
//!
//!   - whether it is inside of a quoted section
//!       (`'...'`, where `''` denotes a literal quote);
//!   - the depth of open setting brackets,
//!       within which whitespace and special characters are retained
//!       verbatim for the [setting decoder](super::setting); and
//!   - whether the previous character was an escape (`\`),
//!       in which case the escaped character is consumed without
//!       contributing to the token text.
//!
//! None of this state carries over between tokens,
//!   and so an unterminated quote or trailing escape is an error at the
//!   end of input.
//! The only state that spans tokens is the cursor and whether any token
//!   has yet been produced;
//!     the first token of a rule string beginning with a relation is an
//!     implicit reset to [`IMPLICIT_RESET`].

use super::{
    AllocError, LexError, RuleToken, Strength, SyntaxError, SyntaxErrorKind,
    EXPANSION_MARKER,
};
use crate::{global, span::Span};
use std::cmp::Ordering;
use tracing::trace;

/// Reset text substituted when a rule string begins with a relation
///   rather than a reset.
pub const IMPLICIT_RESET: &str = "[top]";

/// Format characters (General_Category `Cf`) as of Unicode 15.0,
///   as inclusive ranges in code point order.
const FORMAT_CHARS: &[(char, char)] = &[
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0600}', '\u{0605}'),
    ('\u{061C}', '\u{061C}'),
    ('\u{06DD}', '\u{06DD}'),
    ('\u{070F}', '\u{070F}'),
    ('\u{0890}', '\u{0891}'),
    ('\u{08E2}', '\u{08E2}'),
    ('\u{180E}', '\u{180E}'),
    ('\u{200B}', '\u{200F}'),
    ('\u{202A}', '\u{202E}'),
    ('\u{2060}', '\u{2064}'),
    ('\u{2066}', '\u{206F}'),
    ('\u{FEFF}', '\u{FEFF}'),
    ('\u{FFF9}', '\u{FFFB}'),
    ('\u{110BD}', '\u{110BD}'),
    ('\u{110CD}', '\u{110CD}'),
    ('\u{13430}', '\u{1343F}'),
    ('\u{1BCA0}', '\u{1BCA3}'),
    ('\u{1D173}', '\u{1D17A}'),
    ('\u{E0001}', '\u{E0001}'),
    ('\u{E0020}', '\u{E007F}'),
];

/// Whether a character is insignificant between rule operands.
///
/// This is Unicode `White_Space` together with every format character
///   (see [`FORMAT_CHARS`]),
///     such as zero-width spaces and directional marks.
pub fn is_rule_whitespace(c: char) -> bool {
    c.is_whitespace() || is_format_char(c)
}

fn is_format_char(c: char) -> bool {
    FORMAT_CHARS
        .binary_search_by(|&(lo, hi)| {
            if hi < c {
                Ordering::Less
            } else if lo > c {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
        .is_ok()
}

/// Whether a character is ASCII punctuation that must be quoted or
///   escaped to appear in rule text.
pub fn is_special(c: char) -> bool {
    matches!(
        c,
        '\u{21}'..='\u{2F}'
            | '\u{3A}'..='\u{3F}'
            | '\u{5C}'
            | '\u{5E}'
            | '\u{5F}'
            | '\u{60}'
            | '\u{7B}'
            | '\u{7D}'..='\u{7E}'
    )
}

/// Scanner producing [`RuleToken`]s from a rule string.
///
/// Tokens are produced on demand by [`Lexer::next_token`],
///   which yields [`Strength::Done`] indefinitely once the input is
///   exhausted.
/// The lexer is also an [`Iterator`] that stops _before_
///   [`Strength::Done`] and after the first error.
#[derive(Debug)]
pub struct Lexer<'s> {
    src: &'s str,

    /// Byte offset of the next character to be scanned.
    pos: usize,

    /// Whether no token has yet been produced.
    start_of_rules: bool,

    /// Text of the token being scanned,
    ///   retained between tokens to reuse its allocation.
    buf: String,

    /// Whether the iterator has yielded an error.
    failed: bool,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            start_of_rules: true,
            buf: String::new(),
            failed: false,
        }
    }

    /// Byte offset of the next character to be scanned.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Scan the next token from the rule string.
    ///
    /// Leading whitespace is skipped.
    /// Once the end of the input has been reached,
    ///   every call produces a [`Strength::Done`] token with empty text.
    pub fn next_token(&mut self) -> Result<RuleToken, LexError> {
        let start_of_rules = std::mem::replace(&mut self.start_of_rules, false);

        self.buf.clear();
        self.reserve(self.src.len() - self.pos + global::TOKEN_BUF_SLACK)?;

        let mut strength: Option<Strength> = None;
        let mut tok_start: Option<usize> = None;
        let mut quote_start: Option<usize> = None;
        let mut escape_at: Option<usize> = None;
        let mut depth = 0usize;

        while let Some(c) = self.peek() {
            let at = self.pos;

            #[cfg(feature = "rule-trace")]
            trace!(offset = at, ch = ?c, ?strength, depth, "scan");

            if quote_start.is_some() {
                match c {
                    '\'' if self.peek_nth(1) == Some('\'') => {
                        self.push('\'')?;
                        self.bump();
                    }
                    '\'' => quote_start = None,
                    EXPANSION_MARKER => {
                        return Err(
                            self.syntax(SyntaxErrorKind::ReservedCodePoint, at)
                        )
                    }
                    _ => self.push(c)?,
                }

                self.bump();
                continue;
            }

            if escape_at.take().is_some() {
                if c == EXPANSION_MARKER {
                    return Err(
                        self.syntax(SyntaxErrorKind::ReservedCodePoint, at)
                    );
                }

                // The escaped character is consumed but contributes no
                //   text.
                self.bump();
                continue;
            }

            if depth == 0 && is_rule_whitespace(c) {
                self.bump();
                continue;
            }

            tok_start.get_or_insert(at);

            match (c, strength) {
                // A second operator ends the token.
                ('=' | ',' | ';' | '<' | '&', Some(_)) => break,

                ('=' | ',' | ';' | '<', None) if start_of_rules => {
                    self.push_str(IMPLICIT_RESET)?;
                    strength = Some(Strength::Reset);
                    break;
                }

                ('=', None) => strength = Some(Strength::Identical),
                (',', None) => strength = Some(Strength::Tertiary),
                (';', None) => strength = Some(Strength::Secondary),
                ('&', None) => strength = Some(Strength::Reset),
                ('<', None) => strength = Some(self.scan_angles()),

                ('[', _) => {
                    strength.get_or_insert(Strength::Setting);
                    depth += 1;
                    self.push(c)?;
                }

                ('@', None) => strength = Some(Strength::Override),

                ('\\', None) => {
                    return Err(self.syntax(SyntaxErrorKind::StrayEscape, at))
                }
                ('\\', Some(_)) => escape_at = Some(at),

                ('\'', None) => {
                    return Err(self.syntax(SyntaxErrorKind::StrayQuote, at))
                }
                ('\'', Some(_)) if self.peek_nth(1) == Some('\'') => {
                    self.push('\'')?;
                    self.bump();
                }
                ('\'', Some(_)) => quote_start = Some(at),

                ('!', _) => (),

                ('/', None) => {
                    return Err(
                        self.syntax(SyntaxErrorKind::MisplacedExpansion, at)
                    )
                }
                ('/', Some(_)) => self.push(EXPANSION_MARKER)?,

                (EXPANSION_MARKER, _) => {
                    return Err(
                        self.syntax(SyntaxErrorKind::ReservedCodePoint, at)
                    )
                }

                (_, None) => {
                    return Err(
                        self.syntax(SyntaxErrorKind::MissingStrength(c), at)
                    )
                }

                (']', Some(_)) => {
                    depth = depth.saturating_sub(1);
                    self.push(c)?;
                }

                ('|' | '@' | '-', Some(_)) => self.push(c)?,

                (_, Some(_)) if depth == 0 && is_special(c) => {
                    return Err(self.syntax(SyntaxErrorKind::SpecialChar(c), at))
                }

                (_, Some(_)) => self.push(c)?,
            }

            self.bump();
        }

        if let Some(at) = escape_at {
            return Err(self.syntax(SyntaxErrorKind::StrayEscape, at));
        } else if let Some(at) = quote_start {
            return Err(self.syntax(SyntaxErrorKind::UnterminatedQuote, at));
        }

        let span =
            Span::from_usize_interval(tok_start.unwrap_or(self.pos), self.pos);

        let tok = match strength {
            Some(strength) => RuleToken::new(strength, self.buf.as_str(), span),
            None => RuleToken::done(span),
        };

        trace!(
            strength = %tok.strength,
            text = ?tok.text,
            offset = span.offset(),
            "rule token"
        );

        Ok(tok)
    }

    /// Scan a run of `<` beginning at the cursor,
    ///   leaving the cursor on its final character.
    fn scan_angles(&mut self) -> Strength {
        if self.peek_nth(1) != Some('<') {
            return Strength::Primary;
        }

        self.bump();

        if self.peek_nth(1) != Some('<') {
            return Strength::Secondary;
        }

        self.bump();
        Strength::Tertiary
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn push(&mut self, c: char) -> Result<(), LexError> {
        self.grow_for(c.len_utf8())?;
        self.buf.push(c);
        Ok(())
    }

    fn push_str(&mut self, s: &str) -> Result<(), LexError> {
        self.grow_for(s.len())?;
        self.buf.push_str(s);
        Ok(())
    }

    /// Double the capacity of the token buffer until it can hold `need`
    ///   additional bytes.
    fn grow_for(&mut self, need: usize) -> Result<(), LexError> {
        let len = self.buf.len();
        let mut cap = self.buf.capacity().max(1);

        while len + need > cap {
            cap = cap.saturating_mul(2);
        }

        self.reserve(cap)
    }

    /// Ensure that the token buffer has a capacity of at least `cap`
    ///   bytes.
    fn reserve(&mut self, cap: usize) -> Result<(), LexError> {
        let len = self.buf.len();

        if cap <= self.buf.capacity() {
            return Ok(());
        }

        self.buf.try_reserve_exact(cap - len).map_err(|e| {
            AllocError::new(
                cap,
                Span::from_usize_interval(self.pos, self.pos),
                e,
            )
            .into()
        })
    }

    fn syntax(&self, kind: SyntaxErrorKind, at: usize) -> LexError {
        SyntaxError::new(kind, self.src, at).into()
    }
}

impl<'s> Iterator for Lexer<'s> {
    type Item = Result<RuleToken, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_token() {
            Ok(tok) if tok.is_done() => None,
            Ok(tok) => Some(Ok(tok)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod test;

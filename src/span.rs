// Source spans
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

//! Mapping to byte intervals of a rule string.
//!
//! A [`Span`] is a mapping to a byte interval within the rule string being
//!   compiled,
//!     representing where a rule token or run originated.
//! This underpins the [diagnostic system](crate::diagnose).
//!
//! Unlike spans of a multi-file compiler,
//!   a rule string is always compiled in isolation,
//!   and so a span carries no context;
//!     the reporter is handed the source text directly.
//!
//! ```
//! use tailor::span::Span;
//!
//! let span = Span::new(2, 6);
//!
//! assert_eq!(2, span.offset());
//! assert_eq!(6, span.len());
//! assert_eq!(8, span.end());
//!
//! // From a half-open byte interval
//! let spani = Span::from_byte_interval((10, 25));
//! assert_eq!(10, spani.offset());
//! assert_eq!(15, spani.len());
//! ```
//!
//! Spans are ordered first by offset and then by length,
//!   and are freely copyable.

use crate::global;
use std::fmt::Display;

/// Size of a [`Span`]'s `offset` and `len` fields.
pub type SpanSize = global::RuleStringSize;

/// Byte interval within a rule string.
///
/// Field order matters:
///   the derived [`Ord`] sorts by offset before length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    offset: SpanSize,
    len: SpanSize,
}

assert_eq_size!(Span, u64);

impl Span {
    pub const fn new(offset: SpanSize, len: SpanSize) -> Self {
        Self { offset, len }
    }

    /// Create a span from a half-open `(start, end)` byte interval.
    ///
    /// If `end` precedes `start`,
    ///   the span will be empty.
    pub const fn from_byte_interval(
        (start, end): (SpanSize, SpanSize),
    ) -> Self {
        Self::new(start, end.saturating_sub(start))
    }

    /// Create a span from `usize` byte offsets as produced by string
    ///   indexing,
    ///     saturating at [`SpanSize::MAX`].
    pub fn from_usize_interval(start: usize, end: usize) -> Self {
        let clamp = |n: usize| SpanSize::try_from(n).unwrap_or(SpanSize::MAX);
        Self::from_byte_interval((clamp(start), clamp(end)))
    }

    pub const fn offset(&self) -> SpanSize {
        self.offset
    }

    pub const fn len(&self) -> SpanSize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset one past the last byte of this span.
    pub const fn end(&self) -> SpanSize {
        self.offset.saturating_add(self.len)
    }

    /// Smallest span containing both `self` and `other`.
    ///
    /// The [`Default`] span is absorbed and does not stretch the result,
    ///   so that it can be used as the identity when folding.
    pub fn merge(self, other: Span) -> Span {
        if self == Span::default() {
            return other;
        } else if other == Span::default() {
            return self;
        }

        Span::from_byte_interval((
            self.offset.min(other.offset),
            self.end().max(other.end()),
        ))
    }

    /// The span as a `usize` range suitable for slicing the source string.
    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.offset as usize..self.end() as usize
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "offset {}--{}", self.offset, self.end())
    }
}

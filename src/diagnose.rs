// Diagnostic system
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

//! Diagnostic system for error reporting.
//!
//! This system is heavily motivated by Rust's.
//! While the data structures and organization may differ,
//!   the diagnostic output is visually similar.
//!
//! Rule strings arrive from a resource bundle rather than from a file of
//!   their own,
//!     so spans are resolved against the rule string handed to the
//!     [`VisualReporter`] rather than by re-reading a file from disk.

mod report;

pub use report::{Report, Reporter, VisualReporter};

use core::fmt;
use std::{borrow::Cow, error::Error, fmt::Display};

use crate::span::Span;

/// An error that can point into the rule string that caused it.
pub trait Diagnostic: Error + Sized {
    /// Spans of the rule string relevant to this error,
    ///   most important first.
    ///
    /// An empty [`Vec`] renders only the error's [`Display`].
    fn describe(&self) -> Vec<AnnotatedSpan>;
}

/// Severity of a report or of a single [`AnnotatedSpan`].
///
/// Variants are ordered from most to least severe,
///   so the severity of a report is the minimum of its spans.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
#[repr(u8)]
pub enum Level {
    /// The compiler failed for reasons unrelated to the rule text.
    InternalError = 1,

    /// The rule string is at fault.
    #[default]
    Error,

    Note,
    Help,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::InternalError => write!(f, "internal error"),
            Level::Error => write!(f, "error"),
            Level::Note => write!(f, "note"),
            Level::Help => write!(f, "help"),
        }
    }
}

/// Text rendered beneath an underlined [`Span`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Label<'a>(Cow<'a, str>);

impl<'a> Display for Label<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<'a> From<String> for Label<'a> {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl<'a> From<&'a str> for Label<'a> {
    fn from(s: &'a str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

/// A [`Span`] of the rule string with a severity and optional label.
///
/// Construct using [`Annotate`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AnnotatedSpan<'l>(Span, Level, Option<Label<'l>>);

impl<'l> AnnotatedSpan<'l> {
    pub fn span(&self) -> Span {
        self.0
    }

    pub fn level(&self) -> Level {
        self.1
    }

    pub fn label(&self) -> Option<&Label<'l>> {
        self.2.as_ref()
    }

    pub fn with_help<L: Into<Label<'l>>>(
        self,
        label: L,
    ) -> [AnnotatedSpan<'l>; 2] {
        let span = self.0;
        [self, span.help(label)]
    }
}

impl<'l> From<AnnotatedSpan<'l>> for Vec<AnnotatedSpan<'l>> {
    fn from(x: AnnotatedSpan<'l>) -> Self {
        vec![x]
    }
}

/// Attach a [`Level`] and [`Label`] to something that can be converted
///   into a [`Span`].
///
/// Each rule string error describes itself as an error at the offending
///   span,
///     optionally followed by a note or help at the same span;
///     the [`VisualReporter`] squashes these into a single excerpt.
pub trait Annotate: Sized {
    fn annotate(self, level: Level, label: Option<Label>) -> AnnotatedSpan;

    /// A failure that the rule string cannot be changed to avoid,
    ///   such as exhausting memory.
    fn internal_error<'l, L: Into<Label<'l>>>(
        self,
        label: L,
    ) -> AnnotatedSpan<'l> {
        self.annotate(Level::InternalError, Some(label.into()))
    }

    /// The span at fault.
    ///
    /// (This is not named `err` since it does not return an [`Err`].)
    fn error<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Error, Some(label.into()))
    }

    /// A fact about rule syntax that explains an error.
    fn note<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Note, Some(label.into()))
    }

    /// A suggested correction to the rule string.
    fn help<'l, L: Into<Label<'l>>>(self, label: L) -> AnnotatedSpan<'l> {
        self.annotate(Level::Help, Some(label.into()))
    }
}

impl<S: Into<Span>> Annotate for S {
    fn annotate(self, level: Level, label: Option<Label>) -> AnnotatedSpan {
        AnnotatedSpan(self.into(), level, label)
    }
}

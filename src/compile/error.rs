// Rule string compiler errors
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

//! Errors produced while compiling a rule string.

use std::{error::Error as StdError, fmt::Display};

use crate::{
    diagnose::{AnnotatedSpan, Diagnostic},
    rule::{AllocError, ConfigError, LexError, SyntaxError},
    xir::writer,
};

/// Compilation of a rule string was aborted.
///
/// No error is recoverable;
///   partial output should be discarded.
#[derive(Debug)]
pub enum Error {
    /// The rule string could not be scanned.
    Syntax(SyntaxError),
    /// The token buffer could not be grown.
    Alloc(AllocError),
    /// A setting or reset could not be decoded.
    Config(ConfigError),
    /// Markup could not be written.
    Writer(writer::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(e) => e.fmt(f),
            Self::Alloc(e) => e.fmt(f),
            Self::Config(e) => e.fmt(f),
            Self::Writer(e) => e.fmt(f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            Self::Alloc(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Writer(e) => Some(e),
        }
    }
}

impl Diagnostic for Error {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Syntax(e) => e.describe(),
            Self::Alloc(e) => e.describe(),
            Self::Config(e) => e.describe(),

            // Output is not associated with the rule string.
            Self::Writer(_) => vec![],
        }
    }
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        match e {
            LexError::Syntax(e) => Self::Syntax(e),
            LexError::Alloc(e) => Self::Alloc(e),
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<writer::Error> for Error {
    fn from(e: writer::Error) -> Self {
        Self::Writer(e)
    }
}

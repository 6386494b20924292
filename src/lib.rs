// Collation tailoring rule compiler
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

//! Compiler of ICU collation tailoring rule strings into LDML.
//!
//! The pipeline is short:
//!
//!   1. [`rule::Lexer`] scans a rule string into strength-tagged
//!        [`rule::RuleToken`]s;
//!   2. [`compile::Compiler`] groups adjacent tokens into runs and lowers
//!        them into [`xir::Token`]s; and
//!   3. [`xir::writer::XmlWriter`] writes those tokens as markup.
//!
//! [`collation::Collation`] wraps the output of one or more rule strings
//!   in a `<collation>` element.
//! Errors from every stage implement [`diagnose::Diagnostic`] and can be
//!   rendered against the rule string with
//!   [`diagnose::VisualReporter`].

// We build docs for private items.
#![allow(rustdoc::private_intra_doc_links)]

#[macro_use]
extern crate static_assertions;

pub mod global;

pub mod collation;
pub mod compile;
pub mod diagnose;
pub mod rule;
pub mod span;
pub mod xir;

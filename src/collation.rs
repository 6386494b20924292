// Collation variant markup
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

//! A single collation variant of a locale.
//!
//! A locale may define several collations
//!   (e.g. `standard`, `phonebook`, `traditional`),
//!   each of which is one or more rule strings optionally derived from the
//!   collation of another locale:
//!
//! ```text
//! <collation type="phonebook">
//!     <base>
//!         <alias source="de" type="standard"/>
//!     </base>
//!     <rules>
//!         ...
//!     </rules>
//! </collation>
//! ```

use crate::{
    compile::{CompileOptions, Compiler, Error},
    xir::{st::qname::*, Builder},
};
use tracing::debug;

/// Type used for a [`Base`] when none is given.
pub const DEFAULT_BASE_TYPE: &str = "standard";

/// The collation that a variant is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base {
    /// Locale of the base collation.
    pub source: String,

    /// Collation type within that locale.
    pub kind: String,
}

impl Base {
    /// Derive from the [`DEFAULT_BASE_TYPE`] collation of `source`.
    pub fn new<S: Into<String>>(source: S) -> Self {
        Self {
            source: source.into(),
            kind: DEFAULT_BASE_TYPE.into(),
        }
    }

    pub fn with_kind<S: Into<String>>(self, kind: S) -> Self {
        Self {
            kind: kind.into(),
            ..self
        }
    }
}

/// A collation variant.
///
/// All rule strings of a variant share a single [`Compiler`].
#[derive(Debug)]
pub struct Collation {
    kind: String,
    base: Option<Base>,
    compiler: Compiler,
}

impl Collation {
    pub fn new<S: Into<String>>(kind: S, opts: CompileOptions) -> Self {
        Self {
            kind: kind.into(),
            base: None,
            compiler: Compiler::new(opts),
        }
    }

    pub fn with_base(self, base: Base) -> Self {
        Self {
            base: Some(base),
            ..self
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn base(&self) -> Option<&Base> {
        self.base.as_ref()
    }

    /// Render the variant with the given rule strings into a new
    ///   [`String`].
    pub fn render<'a, I>(&mut self, sequences: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = self.compiler.options().builder();
        self.render_into(sequences, &mut out)?;

        Ok(out.into_string()?)
    }

    /// Render the variant with the given rule strings into `out` at its
    ///   current depth.
    ///
    /// Rendering stops at the first rule string that fails to compile;
    ///   the `<collation>` element is closed regardless.
    pub fn render_into<'a, I>(
        &mut self,
        sequences: I,
        out: &mut Builder,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let depth = out.depth();

        out.open_block(QN_COLLATION, &[(QN_TYPE, self.kind.as_str())]);

        if let Some(base) = &self.base {
            out.open_block(QN_BASE, &[]);
            out.empty_line(
                QN_ALIAS,
                &[
                    (QN_SOURCE, base.source.as_str()),
                    (QN_TYPE, base.kind.as_str()),
                ],
            );
            out.close_block();
        }

        let result = sequences.into_iter().try_for_each(|rules| {
            debug!(collation = %self.kind, "compiling sequence");
            self.compiler.compile_into(rules, out)
        });

        out.close_to(depth);
        result
    }
}

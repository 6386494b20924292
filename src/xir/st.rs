// Static XML names
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

//! Static XML names of LDML collation markup.

pub mod qname {
    //! Static [`QName`]s.

    use crate::xir::QName;

    /// Construct a series of [`QName`] constants.
    ///
    /// The syntax for each constant is `NAME: "local"`.
    macro_rules! qname_const {
        ($($name:ident: $local:literal,)*) => {
            $(
                #[doc=concat!("QName with local name `", $local, "`.")]
                pub const $name: QName = QName::st($local);
            )*

            /// Every static name,
            ///   for validation.
            #[cfg(test)]
            pub(super) const ALL: &[QName] = &[$($name,)*];
        }
    }

    qname_const! {
        QN_ALIAS: "alias",
        QN_BASE: "base",
        QN_BEFORE: "before",
        QN_COLLATION: "collation",
        QN_CONTEXT: "context",
        QN_EXTEND: "extend",
        QN_OPTIMIZE: "optimize",
        QN_RESET: "reset",
        QN_RULES: "rules",
        QN_SETTINGS: "settings",
        QN_SOURCE: "source",
        QN_SUPPRESS_CONTRACTIONS: "suppress_contractions",
        QN_TYPE: "type",
        QN_X: "x",

        QN_P: "p",
        QN_S: "s",
        QN_T: "t",
        QN_I: "i",
        QN_PC: "pc",
        QN_SC: "sc",
        QN_TC: "tc",
        QN_IC: "ic",
    }
}

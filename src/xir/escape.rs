// LDML text escaping
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

//! Escaping of rule text for LDML output.
//!
//! This module is the _only_ part of the system that produces escaped
//!   values;
//!     see [`Text`](super::Text).
//!
//! Markup-significant characters are escaped by [`quick_xml`];
//!   this module handles only what remains:
//!   the double quote,
//!     which LDML output always writes as `&quot;`,
//!   and control characters.
//!
//! C0 control characters cannot appear in XML 1.0 at all,
//!   even as character references,
//!   and so LDML represents them in character data using a `cp` element
//!   naming the code point:
//!
//! ```
//! use tailor::xir::escape::escape;
//!
//! assert_eq!("a&lt;b", escape("a<b"));
//! assert_eq!("<cp hex=\"0007\"/>", escape("\u{7}"));
//! ```
//!
//! Since the `cp` element is markup,
//!   it cannot appear within an attribute value;
//!     [`escape_attr`] is used there instead.

use quick_xml::escape::partial_escape;
use std::borrow::Cow;

/// Escape `value` for output as LDML character data.
///
/// If nothing requires escaping,
///   the input is returned unmodified without allocating.
/// Line breaks and supplementary characters are written as-is.
pub fn escape(value: &str) -> Cow<str> {
    rewrite(partial_escape(value), |c| match c {
        '"' => Some(Cow::Borrowed("&quot;")),
        '\n' | '\r' => None,
        '\u{0}'..='\u{1F}' => {
            Some(Cow::Owned(format!("<cp hex=\"{:04X}\"/>", c as u32)))
        }
        _ => None,
    })
}

/// Escape `value` for output as an attribute value.
///
/// Whitespace controls are written as character references so that they
///   survive attribute-value normalization.
/// Any other C0 control character has no representation in an attribute
///   and is replaced with U+FFFD;
///     values that may contain them should be rejected before reaching
///     this point.
pub fn escape_attr(value: &str) -> Cow<str> {
    rewrite(partial_escape(value), |c| match c {
        '"' => Some(Cow::Borrowed("&quot;")),
        '\t' => Some(Cow::Borrowed("&#x9;")),
        '\n' => Some(Cow::Borrowed("&#xA;")),
        '\r' => Some(Cow::Borrowed("&#xD;")),
        '\u{0}'..='\u{1F}' => Some(Cow::Borrowed("\u{FFFD}")),
        _ => None,
    })
}

/// Replace each character of `escaped` for which `sub` yields a
///   replacement.
///
/// A borrowed `escaped` remains borrowed if nothing is replaced.
fn rewrite<'a>(
    escaped: Cow<'a, str>,
    sub: fn(char) -> Option<Cow<'static, str>>,
) -> Cow<'a, str> {
    let first = match escaped.find(|c: char| sub(c).is_some()) {
        Some(i) => i,
        None => return escaped,
    };

    let mut out = String::with_capacity(escaped.len() + 16);
    out.push_str(&escaped[..first]);

    for c in escaped[first..].chars() {
        match sub(c) {
            Some(rep) => out.push_str(&rep),
            None => out.push(c),
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn safe_text_is_borrowed() {
        assert!(matches!(escape("abc \u{1D11E}"), Cow::Borrowed(_)));
        assert!(matches!(escape(""), Cow::Borrowed(_)));
        assert!(matches!(escape_attr("shifted"), Cow::Borrowed(_)));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            "&lt;x&gt; &amp; &quot;y&quot; 'z'",
            escape("<x> & \"y\" 'z'"),
        );
    }

    #[test]
    fn control_characters_become_cp_elements() {
        assert_eq!("a<cp hex=\"0000\"/>b", escape("a\u{0}b"));
        assert_eq!("<cp hex=\"001F\"/>", escape("\u{1F}"));
        assert_eq!("<cp hex=\"0009\"/>", escape("\t"));
    }

    #[test]
    fn line_breaks_pass_through() {
        assert!(matches!(escape("a\nb\r"), Cow::Borrowed("a\nb\r")));
    }

    #[test]
    fn non_ascii_preserved_around_escapes() {
        assert_eq!("é&lt;\u{1D11E}", escape("é<\u{1D11E}"));
    }

    #[test]
    fn attr_escapes_markup_and_quotes() {
        assert_eq!(
            "&lt;a&gt; &amp; &quot;b&quot;",
            escape_attr("<a> & \"b\""),
        );
    }

    #[test]
    fn attr_never_contains_markup() {
        assert_eq!("a&#x9;b&#xA;c&#xD;", escape_attr("a\tb\nc\r"));
        assert_eq!("a\u{FFFD}b", escape_attr("a\u{1}b"));
    }
}

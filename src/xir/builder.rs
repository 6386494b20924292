// Indented XIR token stream construction
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

//! Construction of line-oriented, indented [`Token`] streams.
//!
//! LDML collation markup is written one element per line,
//!   indented by nesting depth.
//! Elements come in two shapes:
//!
//!   - _blocks_ (e.g. `<rules>`),
//!       whose opening and closing tags each occupy their own line and
//!       whose children are indented one level deeper; and
//!   - _inline_ elements (e.g. `<p>a</p>`),
//!       which are written in their entirety on a single line.
//!
//! The [`Builder`] tracks open blocks on a stack and is responsible for
//!   closing them;
//!     inline elements are the responsibility of the caller and must be
//!     balanced before the end of the line.
//!
//! ```
//! use tailor::xir::{st::qname::*, Builder, Whitespace};
//!
//! let mut b = Builder::new(Whitespace::try_from("  ").unwrap(), 0);
//!
//! b.open_block(QN_RULES, &[]);
//! b.line_start();
//! b.open(QN_P);
//! b.text("a");
//! b.close(QN_P);
//! b.line_end();
//! b.close_all();
//!
//! assert_eq!("<rules>\n  <p>a</p>\n</rules>\n", b.into_string().unwrap());
//! ```

use super::{
    writer::{self, XmlWriter},
    QName, Text, Token, Whitespace,
};
use std::io::Write;

/// Builder of an indented [`Token`] stream.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder {
    toks: Vec<Token>,

    /// Blocks that have been opened but not yet closed,
    ///   innermost last.
    blocks: Vec<QName>,

    /// Whitespace written once per level of depth at the start of each
    ///   line.
    indent: Whitespace,

    /// Depth of the outermost block,
    ///   for fragments that are to be embedded in a larger document.
    base_depth: usize,
}

impl Builder {
    pub fn new(indent: Whitespace, base_depth: usize) -> Self {
        Self {
            toks: Vec::new(),
            blocks: Vec::new(),
            indent,
            base_depth,
        }
    }

    /// A new empty builder with the same indentation and current depth.
    pub fn fork(&self) -> Self {
        Self::new(self.indent.clone(), self.depth())
    }

    /// Current nesting depth,
    ///   including the base depth.
    pub fn depth(&self) -> usize {
        self.base_depth + self.blocks.len()
    }

    /// Number of tokens produced thus far.
    pub fn len(&self) -> usize {
        self.toks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toks.is_empty()
    }

    /// Indent a new line to the current depth.
    pub fn line_start(&mut self) {
        let depth = self.depth();

        if depth > 0 && !self.indent.is_empty() {
            self.toks.push(Token::Whitespace(self.indent.repeat(depth)));
        }
    }

    pub fn line_end(&mut self) {
        self.toks.push(Token::Whitespace(Whitespace::newline()));
    }

    /// Open an inline element.
    pub fn open(&mut self, name: QName) {
        self.toks.push(Token::Open(name));
    }

    /// Add an attribute to the element that was just opened,
    ///   escaping its value.
    pub fn attr(&mut self, name: QName, value: &str) {
        self.toks.push(Token::AttrName(name));
        self.toks.push(Token::AttrValue(Text::escape_attr(value)));
    }

    /// Add character data,
    ///   escaping it.
    ///
    /// Empty text produces no token.
    pub fn text(&mut self, raw: &str) {
        if !raw.is_empty() {
            self.toks.push(Token::Text(Text::escape(raw)));
        }
    }

    /// Close an inline element.
    pub fn close(&mut self, name: QName) {
        self.toks.push(Token::Close(Some(name)));
    }

    /// Close an inline element as empty
    ///   (`<foo/>`).
    pub fn close_empty(&mut self) {
        self.toks.push(Token::Close(None));
    }

    /// Write an empty element with the given attributes on its own line.
    pub fn empty_line(&mut self, name: QName, attrs: &[(QName, &str)]) {
        self.line_start();
        self.open(name);
        attrs.iter().for_each(|(k, v)| self.attr(*k, v));
        self.close_empty();
        self.line_end();
    }

    /// Write an inline element containing only text on its own line.
    pub fn text_line(&mut self, name: QName, raw: &str) {
        self.line_start();
        self.open(name);
        self.text(raw);
        self.close(name);
        self.line_end();
    }

    /// Open a block on its own line,
    ///   indenting all lines that follow until it is closed.
    pub fn open_block(&mut self, name: QName, attrs: &[(QName, &str)]) {
        self.line_start();
        self.open(name);
        attrs.iter().for_each(|(k, v)| self.attr(*k, v));
        self.line_end();

        self.blocks.push(name);
    }

    /// Close the innermost open block on its own line,
    ///   returning its name.
    ///
    /// If there are no open blocks,
    ///   this does nothing and returns [`None`].
    pub fn close_block(&mut self) -> Option<QName> {
        let name = self.blocks.pop()?;

        self.line_start();
        self.close(name);
        self.line_end();

        Some(name)
    }

    /// Close all open blocks,
    ///   innermost first.
    pub fn close_all(&mut self) {
        while self.close_block().is_some() {}
    }

    /// Close open blocks until the depth is no greater than `depth`.
    pub fn close_to(&mut self, depth: usize) {
        while self.depth() > depth && self.close_block().is_some() {}
    }

    /// Splice the tokens of `other` into this stream before the token at
    ///   index `at`.
    ///
    /// `other` must have been produced at the depth of the insertion point
    ///   (see [`Builder::fork`]);
    ///     any blocks it left open are closed first.
    pub fn insert(&mut self, at: usize, mut other: Builder) {
        other.close_all();

        let at = at.min(self.toks.len());
        self.toks.splice(at..at, other.toks);
    }

    /// Close all open blocks and write the token stream to `sink`.
    pub fn write<W: Write>(mut self, sink: &mut W) -> writer::Result {
        self.close_all();
        self.toks.into_iter().write(sink, Default::default())
    }

    /// Close all open blocks and write the token stream into a new
    ///   [`String`].
    pub fn into_string(self) -> writer::Result<String> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;

        // Every token is constructed from `str`s.
        String::from_utf8(buf).map_err(|e| {
            writer::Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            ))
        })
    }
}

impl IntoIterator for Builder {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    /// Close all open blocks and yield the token stream.
    fn into_iter(mut self) -> Self::IntoIter {
        self.close_all();
        self.toks.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::xir::st::qname::*;

    fn tabs(depth: usize) -> Builder {
        Builder::new(Whitespace::try_from("\t").unwrap(), depth)
    }

    #[test]
    fn blocks_indent_children() {
        let mut sut = tabs(0);

        sut.open_block(QN_COLLATION, &[(QN_TYPE, "standard")]);
        sut.open_block(QN_RULES, &[]);
        sut.text_line(QN_RESET, "a");
        sut.close_block();
        sut.close_block();

        assert_eq!(
            "<collation type=\"standard\">\n\
             \t<rules>\n\
             \t\t<reset>a</reset>\n\
             \t</rules>\n\
             </collation>\n",
            sut.into_string().unwrap(),
        );
    }

    #[test]
    fn base_depth_indents_everything() {
        let mut sut = tabs(2);

        sut.empty_line(QN_SETTINGS, &[(QN_TYPE, "x")]);

        assert_eq!(
            "\t\t<settings type=\"x\"/>\n",
            sut.into_string().unwrap()
        );
    }

    #[test]
    fn empty_indent_unit_writes_no_indentation() {
        let mut sut = Builder::new(Whitespace::default(), 3);

        sut.text_line(QN_P, "a");

        assert_eq!("<p>a</p>\n", sut.into_string().unwrap());
    }

    #[test]
    fn close_all_closes_innermost_first() {
        let mut sut = tabs(0);

        sut.open_block(QN_COLLATION, &[]);
        sut.open_block(QN_RULES, &[]);
        assert_eq!(2, sut.depth());

        sut.close_all();
        assert_eq!(0, sut.depth());

        assert_eq!(
            "<collation>\n\t<rules>\n\t</rules>\n</collation>\n",
            sut.into_string().unwrap(),
        );
    }

    #[test]
    fn close_to_leaves_outer_blocks_open() {
        let mut sut = tabs(1);

        sut.open_block(QN_COLLATION, &[]);
        sut.open_block(QN_BASE, &[]);
        sut.open_block(QN_RULES, &[]);

        sut.close_to(2);
        assert_eq!(2, sut.depth());

        // Never closes past the base depth.
        sut.close_to(0);
        assert_eq!(1, sut.depth());
    }

    #[test]
    fn close_block_with_none_open() {
        let mut sut = tabs(0);

        assert_eq!(None, sut.close_block());
        assert!(sut.is_empty());
    }

    #[test]
    fn write_closes_open_blocks() {
        let mut sut = tabs(0);
        sut.open_block(QN_RULES, &[]);

        assert_eq!("<rules>\n</rules>\n", sut.into_string().unwrap());
    }

    #[test]
    fn insert_splices_at_position() {
        let mut sut = tabs(0);
        sut.open_block(QN_COLLATION, &[]);

        let at = sut.len();
        sut.text_line(QN_RESET, "a");

        let mut other = sut.fork();
        other.empty_line(QN_SETTINGS, &[(QN_TYPE, "b")]);
        sut.insert(at, other);

        assert_eq!(
            "<collation>\n\
             \t<settings type=\"b\"/>\n\
             \t<reset>a</reset>\n\
             </collation>\n",
            sut.into_string().unwrap(),
        );
    }

    #[test]
    fn text_is_escaped() {
        let mut sut = tabs(0);
        sut.text_line(QN_P, "<&>");

        assert_eq!("<p>&lt;&amp;&gt;</p>\n", sut.into_string().unwrap());
    }

    #[test]
    fn attr_cannot_contain_markup() {
        let mut sut = tabs(0);
        sut.empty_line(QN_SETTINGS, &[(QN_TYPE, "a\u{1}\t\"")]);

        assert_eq!(
            "<settings type=\"a\u{FFFD}&#x9;&quot;\"/>\n",
            sut.into_string().unwrap(),
        );
    }
}

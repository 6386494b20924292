// XIR writer
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

//! Lower XIR stream into an XML byte stream via [`Write`].

use super::{QName, Token, TokenStream};
use std::io::{Error as IoError, Write};
use std::result;

pub type Result<T = WriterState> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(IoError),
    UnexpectedToken(String, WriterState),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::UnexpectedToken(tok, state) => write!(
                f,
                "invalid token {} at XML writer state {:?}",
                tok, state
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriterState {
    /// A node is expected to be output next.
    #[default]
    NodeExpected,
    /// A node is currently being output and has not yet been closed.
    NodeOpen,
    /// Cursor is adjacent to an attribute name within an element.
    AttrNameAdjacent,
}

impl WriterState {
    #[inline]
    fn close_tag_if_open<W: Write>(&self, sink: &mut W) -> Result<()> {
        if let Self::NodeOpen = self {
            sink.write_all(b">")?;
        }

        Ok(())
    }
}

/// Write an XML representation.
///
/// This trait is intended for use with [XIR](super) [`Token`] stream.
/// It uses a finate state machine (FSM),
///   where states are represented by [`WriterState`],
///   to avoid lookahead requirements.
pub trait XmlWriter: Sized {
    /// Write XML representation into the provided buffer.
    ///
    /// The writer acts as a state machine to determine whether previous
    ///   output requires closing.
    /// Each write operation takes a previous [`WriterState`],
    ///   and transitions to a new [`WriterState`] after performing the
    ///   write operation
    ///     (which may be the same as the previous state).
    /// This returned state must be provided to the next `write` operation
    ///   to produce valid output.
    ///
    /// If you have a series of writes to perform,
    ///   consider using an [`Iterator`] implementing [`XmlWriter`].
    #[must_use = "Write operation may fail"]
    fn write<W: Write>(self, sink: &mut W, prev_state: WriterState) -> Result;

    /// Allocate a new buffer and write into it,
    ///   returning both the new buffer and the writer state.
    ///
    /// See [`write`](XmlWriter::write) for more information.
    ///
    /// This is intended primarily for testing;
    ///   it is recommended that you use [`write`](XmlWriter::write) instead,
    ///     unless you _really_ need a new owned `Vec<u8>`.
    #[must_use]
    fn write_new(
        self,
        prev_state: WriterState,
    ) -> Result<(Vec<u8>, WriterState)> {
        let mut buf = Vec::<u8>::new();
        let state = self.write(&mut buf, prev_state)?;

        Ok((buf, state))
    }
}

impl XmlWriter for QName {
    #[inline]
    fn write<W: Write>(self, sink: &mut W, prev_state: WriterState) -> Result {
        sink.write_all(self.as_str().as_bytes())?;
        Ok(prev_state)
    }
}

impl XmlWriter for Token {
    fn write<W: Write>(self, sink: &mut W, prev_state: WriterState) -> Result {
        type S = WriterState; // More concise

        match (self, prev_state) {
            (Self::Open(name), S::NodeExpected | S::NodeOpen) => {
                // If a node is still open, then we are a child.
                prev_state.close_tag_if_open(sink)?;
                sink.write_all(b"<")?;
                name.write(sink, prev_state)?;

                Ok(S::NodeOpen)
            }

            (Self::Close(None), S::NodeOpen) => {
                sink.write_all(b"/>")?;

                Ok(S::NodeExpected)
            }

            (Self::Close(Some(name)), S::NodeExpected | S::NodeOpen) => {
                // If open, we're going to produce an element of the form
                // `<foo></foo>`.
                prev_state.close_tag_if_open(sink)?;

                sink.write_all(b"</")?;
                name.write(sink, prev_state)?;
                sink.write_all(b">")?;

                Ok(S::NodeExpected)
            }

            (Self::AttrName(name), S::NodeOpen) => {
                sink.write_all(b" ")?;
                name.write(sink, prev_state)?;

                Ok(S::AttrNameAdjacent)
            }

            (Self::AttrValue(value), S::AttrNameAdjacent) => {
                sink.write_all(b"=\"")?;
                sink.write_all(value.as_str().as_bytes())?;
                sink.write_all(b"\"")?;

                Ok(S::NodeOpen)
            }

            (Self::Text(text), S::NodeExpected | S::NodeOpen) => {
                prev_state.close_tag_if_open(sink)?;
                sink.write_all(text.as_str().as_bytes())?;

                Ok(S::NodeExpected)
            }

            // Whitespace is formatting between nodes,
            //   never within a tag,
            //   and so it closes any open tag.
            (Self::Whitespace(ws), S::NodeExpected | S::NodeOpen) => {
                prev_state.close_tag_if_open(sink)?;
                sink.write_all(ws.as_str().as_bytes())?;

                Ok(S::NodeExpected)
            }

            // Everything else represents either an invalid state transition
            // that would produce invalid XML, or something that we forgot
            // to account for above.
            (invalid, _) => {
                Err(Error::UnexpectedToken(invalid.to_string(), prev_state))
            }
        }
    }
}

impl<I: TokenStream> XmlWriter for I {
    fn write<W: Write>(
        mut self,
        sink: &mut W,
        initial_state: WriterState,
    ) -> Result {
        self.try_fold(initial_state, |prev_state, tok| {
            tok.write(sink, prev_state)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::xir::{Text, Whitespace};

    type TestResult = std::result::Result<(), Error>;

    const QN_A: QName = QName::st("a");
    const QN_B: QName = QName::st("b");

    #[test]
    fn writes_beginning_node_tag_without_prev_state() -> TestResult {
        let result = Token::Open(QN_A).write_new(Default::default())?;

        assert_eq!(result.0, b"<a");
        assert_eq!(result.1, WriterState::NodeOpen);

        Ok(())
    }

    #[test]
    fn closes_open_node_when_opening_another() -> TestResult {
        let result = Token::Open(QN_B).write_new(WriterState::NodeOpen)?;

        assert_eq!(result.0, b"><b");
        assert_eq!(result.1, WriterState::NodeOpen);

        Ok(())
    }

    #[test]
    fn closes_open_node_as_empty_element() -> TestResult {
        let result = Token::Close(None).write_new(WriterState::NodeOpen)?;

        assert_eq!(result.0, b"/>");
        assert_eq!(result.1, WriterState::NodeExpected);

        Ok(())
    }

    #[test]
    fn closing_tag_when_node_expected() -> TestResult {
        let result =
            Token::Close(Some(QN_A)).write_new(WriterState::NodeExpected)?;

        assert_eq!(result.0, b"</a>");
        assert_eq!(result.1, WriterState::NodeExpected);

        Ok(())
    }

    #[test]
    fn closes_open_node_with_closing_tag() -> TestResult {
        let result = Token::Close(Some(QN_A)).write_new(WriterState::NodeOpen)?;

        assert_eq!(result.0, b"></a>");
        assert_eq!(result.1, WriterState::NodeExpected);

        Ok(())
    }

    #[test]
    fn writes_attr_name_to_open_node() -> TestResult {
        let result = Token::AttrName(QN_B).write_new(WriterState::NodeOpen)?;

        assert_eq!(result.0, b" b");
        assert_eq!(result.1, WriterState::AttrNameAdjacent);

        Ok(())
    }

    #[test]
    fn writes_escaped_attr_value_when_adjacent_to_attr() -> TestResult {
        let value = Text::escape("a\"b");
        let result = Token::AttrValue(value)
            .write_new(WriterState::AttrNameAdjacent)?;

        assert_eq!(result.0, b"=\"a&quot;b\"");
        assert_eq!(result.1, WriterState::NodeOpen);

        Ok(())
    }

    #[test]
    fn writes_text_closing_open_node() -> TestResult {
        let result = Token::Text(Text::escape("a<b"))
            .write_new(WriterState::NodeOpen)?;

        assert_eq!(result.0, b">a&lt;b");
        assert_eq!(result.1, WriterState::NodeExpected);

        Ok(())
    }

    #[test]
    fn whitespace_closes_open_node() -> TestResult {
        let result = Token::Whitespace(Whitespace::newline())
            .write_new(WriterState::NodeOpen)?;

        assert_eq!(result.0, b">\n");
        assert_eq!(result.1, WriterState::NodeExpected);

        Ok(())
    }

    #[test]
    fn unsupported_transition_results_in_error() {
        assert!(matches!(
            Token::AttrValue(Text::escape("x"))
                .write_new(WriterState::NodeExpected),
            Err(Error::UnexpectedToken(_, WriterState::NodeExpected)),
        ));

        assert!(matches!(
            Token::Close(None).write_new(WriterState::NodeExpected),
            Err(Error::UnexpectedToken(_, WriterState::NodeExpected)),
        ));
    }

    #[test]
    fn test_valid_sequence_of_tokens() -> TestResult {
        let result = vec![
            Token::Open(QN_A),
            Token::AttrName(QN_B),
            Token::AttrValue(Text::escape("c")),
            Token::Whitespace(Whitespace::newline()),
            Token::Open(QN_B),
            Token::Text(Text::escape("&")),
            Token::Close(Some(QN_B)),
            Token::Open(QN_B),
            Token::Close(None),
            Token::Close(Some(QN_A)),
        ]
        .into_iter()
        .write_new(Default::default())?;

        assert_eq!(
            String::from_utf8_lossy(&result.0),
            "<a b=\"c\">\n<b>&amp;</b><b/></a>",
        );
        assert_eq!(result.1, WriterState::NodeExpected);

        Ok(())
    }
}

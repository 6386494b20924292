// Diagnostic report rendering
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

//! Rendering of diagnostic information.

// NB: `write!` together with `\n` is preferred to `writeln!` so that there
//   is only a single sequence of characters to search for while tracking
//   down newlines,
//     rather than using both.

use super::{Diagnostic, Label, Level};
use crate::span::Span;
use std::{
    borrow::Cow,
    fmt::{self, Display},
    num::NonZeroU32,
};
use unicode_width::UnicodeWidthChar;

pub trait Reporter {
    /// Render diagnostic report.
    ///
    /// The provided [`Report`] implements [`Display`].
    ///
    /// Please be mindful of where this report is being rendered to
    ///   (via [`Display`]).
    /// For example,
    ///   if rendering to standard out,
    ///   it is a good idea to buffer the entire report before flushing to
    ///     stdout,
    ///       otherwise the report may become interleaved with the output of
    ///       other converters running in parallel.
    ///
    /// This method _does not return [`Result`]_ and should never fail.
    /// Spans that cannot be resolved are rendered as raw offsets so that
    ///   the actual diagnostic message is never masked.
    fn render<'d, D: Diagnostic>(&self, diagnostic: &'d D) -> Report<'d, D>;
}

/// Render diagnostic report in a highly visual way.
///
/// This report is modeled after Rust's default error reporting,
///   most notable for including the line of the rule string associated
///   with each span and underlining the span.
pub struct VisualReporter<'s> {
    /// Name under which the rule string is reported
    ///   (e.g. a path or `locale/collation-type`).
    name: Cow<'s, str>,

    /// The rule string against which spans are resolved.
    source: &'s str,
}

impl<'s> VisualReporter<'s> {
    pub fn new<N: Into<Cow<'s, str>>>(name: N, source: &'s str) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    fn resolve(&self, span: Span) -> Option<ResolvedSpan> {
        let src = self.source;
        let range = span.as_range();

        if range.end > src.len()
            || !src.is_char_boundary(range.start)
            || !src.is_char_boundary(range.end)
        {
            return None;
        }

        let line_start = src[..range.start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = src[range.start..]
            .find('\n')
            .map_or(src.len(), |i| range.start + i);

        let line_num = src[..range.start].matches('\n').count() + 1;
        let col_num = src[line_start..range.start].chars().count() + 1;

        let before = &src[line_start..range.start];
        let marked = &src[range.start..range.end.min(line_end)];

        Some(ResolvedSpan {
            line_num: NonZeroU32::new(line_num as u32)?,
            col_num: NonZeroU32::new(col_num as u32)?,
            line: src[line_start..line_end].replace('\t', " "),
            mark_offset: display_width(before),
            mark_width: display_width(marked).max(1),
        })
    }
}

impl<'s> Reporter for VisualReporter<'s> {
    fn render<'d, D: Diagnostic>(&self, diagnostic: &'d D) -> Report<'d, D> {
        let mut report = Report::empty(Message(diagnostic));

        report.extend(diagnostic.describe().into_iter().map(|aspan| {
            let span = aspan.span();
            let level = aspan.level();
            let label =
                aspan.label().map(|l| SpanLabel(level, l.to_static()));

            Section {
                heading: SpanHeading(self.name.to_string(), span),
                excerpt: self.resolve(span),
                labels: label.into_iter().collect(),
                level,
                span,
            }
        }));

        report
    }
}

/// Terminal column width of a string,
///   counting each tab as a single column since tabs are rendered as
///   spaces.
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c {
            '\t' => 1,
            _ => c.width().unwrap_or(0),
        })
        .sum()
}

#[derive(Debug)]
pub struct Report<'d, D: Diagnostic> {
    msg: Message<'d, D>,
    secs: Vec<Section>,
    level: Level,
}

impl<'d, D: Diagnostic> Report<'d, D> {
    fn empty(msg: Message<'d, D>) -> Self {
        Self {
            msg,
            secs: Vec::new(),
            level: Level::default(),
        }
    }

    /// Most severe level of any section of this report.
    pub fn level(&self) -> Level {
        self.level
    }

    fn extend<T: IntoIterator<Item = Section>>(&mut self, secs: T) {
        for sec in secs {
            self.level = self.level.min(sec.level);

            // Add the section if it cannot be squashed into the previous.
            let remain = sec.maybe_squash_into(self.secs.last_mut());
            self.secs.extend(remain);
        }
    }
}

impl<'d, D: Diagnostic> Display for Report<'d, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{level}: {msg}\n", level = self.level, msg = self.msg)?;
        self.secs.iter().try_for_each(|sec| sec.fmt(f))
    }
}

#[derive(Debug)]
struct Message<'d, D: Diagnostic>(&'d D);

impl<'d, D: Diagnostic> Display for Message<'d, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self.0, f)
    }
}

/// A section of a [`Report`] describing a [`Span`].
///
/// Adjacent sections describing the same [`Span`] are squashed
///   (see [`Section::maybe_squash_into`]),
///   but not non-adjacent ones.
#[derive(Debug, PartialEq, Eq)]
struct Section {
    heading: SpanHeading,
    excerpt: Option<ResolvedSpan>,
    labels: Vec<SpanLabel>,
    level: Level,
    span: Span,
}

impl Section {
    /// Squash self into the provided [`Section`] if they represent the same
    ///   [`Span`],
    ///     otherwise do nothing.
    ///
    /// The term "squash" is borrowed from `git rebase`.
    fn maybe_squash_into(self, extend: Option<&mut Section>) -> Option<Self> {
        match extend {
            Some(extend_sec) if self.span == extend_sec.span => {
                extend_sec.labels.extend(self.labels);
                extend_sec.level = extend_sec.level.min(self.level);
                None
            }

            _ => Some(self),
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.excerpt {
            Some(rspan) => {
                write!(
                    f,
                    "  --> {}:{}:{}\n",
                    self.heading.0, rspan.line_num, rspan.col_num
                )?;
                rspan.fmt(f)?;
            }

            // This is not ideal,
            //   but provides reasonable fallback information in a
            //   situation where the diagnostic system fails.
            None => write!(f, "  --> {}\n", self.heading)?,
        }

        for label in self.labels.iter() {
            write!(f, "{label}\n")?;
        }

        Ok(())
    }
}

/// Heading describing the context of a span that could not be resolved.
#[derive(Debug, PartialEq, Eq)]
struct SpanHeading(String, Span);

impl Display for SpanHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(name, span) = self;
        write!(f, "{name} {span}")
    }
}

/// A span resolved against its rule string.
#[derive(Debug, PartialEq, Eq)]
struct ResolvedSpan {
    line_num: NonZeroU32,
    col_num: NonZeroU32,
    line: String,
    mark_offset: usize,
    mark_width: usize,
}

impl Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gutter = self.line_num.to_string();
        let pad = " ".repeat(gutter.len());

        write!(f, " {pad} |\n")?;
        write!(f, " {gutter} | {}\n", self.line)?;
        write!(
            f,
            " {pad} | {}{}\n",
            " ".repeat(self.mark_offset),
            "^".repeat(self.mark_width),
        )
    }
}

/// A label describing a span.
#[derive(Debug, PartialEq, Eq)]
struct SpanLabel(Level, Label<'static>);

impl Display for SpanLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(level, label) = self;
        write!(f, "      {level}: {label}")
    }
}

impl<'a> Label<'a> {
    fn to_static(&self) -> Label<'static> {
        Label(Cow::Owned(self.0.to_string()))
    }
}

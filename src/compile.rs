// Rule string compiler
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

//! Compile rule strings into LDML collation markup.
//!
//! The [`Compiler`] pulls [`RuleToken`]s from a [`Lexer`] and groups
//!   adjacent tokens of the same strength into _runs_.
//! Each run is then emitted as a single line of markup:
//!
//! ```
//! use tailor::compile::compile;
//!
//! assert_eq!(
//!     compile("[backwards 2]&a<b<c").unwrap(),
//!     "<settings backwards=\"on\"/>\n\
//!      <rules>\n\
//!      \t<reset>a</reset>\n\
//!      \t<pc>bc</pc>\n\
//!      </rules>\n",
//! );
//! ```
//!
//! Run Boundaries
//! ==============
//! Tokens are merged into the current run only if all of the following
//!   hold:
//!
//!   - the token has the same strength as the run;
//!   - neither the token nor the _last token absorbed into the run_ is a
//!       contraction
//!         (more than one character);
//!   - neither the token nor the run contains an expansion; and
//!   - neither the token nor the run contains a context separator.
//!
//! A run of a single token is written in its single form
//!   (e.g. `<p>`),
//!   and a run of many in its sequence form
//!   (e.g. `<pc>`),
//!     which LDML defines as a series of single-character rules.
//! Contractions,
//!   expansions,
//!   and contexts therefore always appear in a single form,
//!     the latter two wrapped in an `<x>` element along with their
//!     `<context>` and `<extend>` siblings.
//!
//! Settings
//! ========
//! Settings may appear anywhere in a rule string but are gathered into a
//!   single `<settings>` element preceding `<rules>`,
//!     followed by any [`Directive`]s.
//! Settings accumulate in the [`Compiler`] and are rendered once per
//!   rule string.

use crate::{
    rule::{
        has_context, has_expansion, is_contraction,
        setting::{
            decode_reset, decode_setting, decode_settings, Decoded, Directive,
            DirectiveKind, Reset, ResetPosition, Setting,
        },
        Lexer, RuleToken, Strength, CONTEXT_SEPARATOR, EXPANSION_MARKER,
    },
    span::Span,
    xir::{escape::escape_attr, st::qname::*, Builder, QName, Whitespace},
};
use std::fmt::Display;
use tracing::debug;

mod error;

pub use error::Error;

/// Output formatting options.
///
/// The default indents by one tab per level of nesting starting at the
///   left margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Whitespace written once per level of nesting.
    pub indent: Whitespace,

    /// Nesting depth of the outermost element produced,
    ///   for output that is to be embedded within a larger document.
    pub depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            indent: Whitespace::try_from("\t").unwrap_or_default(),
            depth: 0,
        }
    }
}

impl CompileOptions {
    /// Indent using `n` spaces per level rather than tabs.
    pub fn with_spaces(self, n: usize) -> Self {
        Self {
            indent: Whitespace::try_from(" ".repeat(n)).unwrap_or_default(),
            ..self
        }
    }

    pub fn with_depth(self, depth: usize) -> Self {
        Self { depth, ..self }
    }

    /// A new [`Builder`] configured with these options.
    pub fn builder(&self) -> Builder {
        Builder::new(self.indent.clone(), self.depth)
    }
}

/// Settings and directives awaiting output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsAccumulator {
    settings: Vec<Setting>,
    directives: Vec<Directive>,
}

impl SettingsAccumulator {
    /// Add a setting or directive.
    ///
    /// A setting that was already given is overwritten in place,
    ///   since an element cannot repeat an attribute.
    pub fn push(&mut self, decoded: Decoded) {
        match decoded {
            Decoded::Setting(setting) => {
                let name = setting.name();

                match self.settings.iter_mut().find(|s| s.name() == name) {
                    Some(prev) => *prev = setting,
                    None => self.settings.push(setting),
                }
            }
            Decoded::Directive(directive) => self.directives.push(directive),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty() && self.directives.is_empty()
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn clear(&mut self) {
        self.settings.clear();
        self.directives.clear();
    }

    /// Write a `<settings>` element followed by any directives,
    ///   emptying the accumulator.
    ///
    /// An empty accumulator writes nothing.
    fn flush_into(&mut self, out: &mut Builder) {
        if !self.settings.is_empty() {
            out.line_start();
            out.open(QN_SETTINGS);

            for setting in self.settings.drain(..) {
                out.attr(QName::st(setting.name()), setting.value());
            }

            out.close_empty();
            out.line_end();
        }

        for directive in self.directives.drain(..) {
            let name = match directive.kind() {
                DirectiveKind::SuppressContractions => QN_SUPPRESS_CONTRACTIONS,
                DirectiveKind::Optimize => QN_OPTIMIZE,
            };

            out.text_line(name, directive.set());
        }
    }
}

/// Renders settings as attribute pairs,
///   each followed by a space.
impl Display for SettingsAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.settings.iter().try_for_each(|setting| {
            let value = escape_attr(setting.value());
            write!(f, "{}=\"{}\" ", setting.name(), value)
        })
    }
}

/// Compiler of rule strings for a single collation variant.
///
/// The compiler may be used to compile many rule strings,
///   each producing its own `<rules>` element.
#[derive(Debug, Default)]
pub struct Compiler {
    opts: CompileOptions,
    settings: SettingsAccumulator,
}

impl Compiler {
    pub fn new(opts: CompileOptions) -> Self {
        Self {
            opts,
            settings: SettingsAccumulator::default(),
        }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.opts
    }

    /// Compile a rule string into a new [`String`] of markup formatted
    ///   according to this compiler's [`CompileOptions`].
    ///
    /// An empty rule string produces empty output.
    pub fn compile(&mut self, rules: &str) -> Result<String, Error> {
        let mut out = self.opts.builder();
        self.compile_into(rules, &mut out)?;

        Ok(out.into_string()?)
    }

    /// Compile a rule string into the provided [`Builder`] at its current
    ///   depth.
    ///
    /// On error,
    ///   any element opened by the compiler has been closed,
    ///   but `out` will contain partial output.
    pub fn compile_into(
        &mut self,
        rules: &str,
        out: &mut Builder,
    ) -> Result<(), Error> {
        let mut emit = Emitter {
            out,
            settings: &mut self.settings,
            rules_open: false,
            settings_at: None,
        };

        let result = emit.run(rules);
        emit.finish(result.is_ok());

        result
    }
}

/// Compile a rule string using default [`CompileOptions`].
pub fn compile(rules: &str) -> Result<String, Error> {
    Compiler::default().compile(rules)
}

/// Adjacent tokens of the same strength awaiting output.
#[derive(Debug, Default)]
struct Run {
    /// Strength of all tokens in the run,
    ///   or [`None`] before the first token.
    strength: Option<Strength>,
    text: String,
    count: usize,

    /// Whether the most recently absorbed token is a contraction.
    contraction: bool,

    span: Span,
}

impl Run {
    /// Whether `tok` must begin a new run.
    fn must_flush(&self, tok: &RuleToken, tok_contraction: bool) -> bool {
        self.strength != Some(tok.strength)
            || tok_contraction
            || self.contraction
            || has_expansion(&tok.text)
            || has_expansion(&self.text)
            || has_context(&tok.text)
            || has_context(&self.text)
    }

    fn absorb(&mut self, tok: RuleToken, contraction: bool) {
        self.strength = Some(tok.strength);
        self.text.push_str(&tok.text);
        self.count += 1;
        self.contraction = contraction;
        self.span = self.span.merge(tok.span);
    }

    fn clear(&mut self) {
        self.text.clear();
        self.count = 0;
        self.span = Span::default();
    }

    /// Whether the run is written in its sequence form.
    fn is_sequence(&self) -> bool {
        self.count > 1
    }
}

/// Output state for a single rule string.
struct Emitter<'a> {
    out: &'a mut Builder,
    settings: &'a mut SettingsAccumulator,

    /// Whether `<rules>` has been opened.
    rules_open: bool,

    /// Token index at which settings are to be written,
    ///   set on the first reset or rule.
    settings_at: Option<usize>,
}

impl<'a> Emitter<'a> {
    fn run(&mut self, rules: &str) -> Result<(), Error> {
        let mut lexer = Lexer::new(rules);
        let mut run = Run::default();

        loop {
            let tok = lexer.next_token()?;

            if run.strength == Some(Strength::Done) && tok.is_done() {
                break;
            }

            let contraction = is_contraction(&tok.text);

            if run.must_flush(&tok, contraction) {
                self.flush(&run)?;
                run.clear();
            }

            run.absorb(tok, contraction);
        }

        Ok(())
    }

    fn flush(&mut self, run: &Run) -> Result<(), Error> {
        let strength = match run.strength {
            None | Some(Strength::Done) => return Ok(()),
            Some(strength) => strength,
        };

        debug!(
            %strength,
            count = run.count,
            text = ?run.text,
            offset = run.span.offset(),
            "flush run"
        );

        match strength {
            Strength::Setting => decode_settings(&run.text, run.span)?
                .into_iter()
                .for_each(|decoded| self.settings.push(decoded)),

            // The legacy `@` is French secondary ordering.
            Strength::Override => self
                .settings
                .push(decode_setting("backwards", "2", run.span)?),

            Strength::Reset => {
                let reset = decode_reset(&run.text, run.span)?;

                self.begin_rules();
                self.reset(reset);
            }

            Strength::Primary
            | Strength::Secondary
            | Strength::Tertiary
            | Strength::Identical => {
                self.begin_rules();
                self.relation(strength, run);
            }

            Strength::Done => (),
        }

        Ok(())
    }

    /// Prepare for the first reset or rule,
    ///   marking the position of settings and opening `<rules>`.
    fn begin_rules(&mut self) {
        self.settings_at.get_or_insert(self.out.len());

        if !self.rules_open {
            self.out.open_block(QN_RULES, &[]);
            self.rules_open = true;
        }
    }

    fn reset(&mut self, reset: Reset<'_>) {
        let out = &mut *self.out;

        out.line_start();
        out.open(QN_RESET);

        if let Some(before) = reset.before {
            out.attr(QN_BEFORE, before);
        }

        match reset.position {
            ResetPosition::Anchor(anchor) => {
                out.open(QName::st(anchor.element_name()));
                out.close_empty();
            }

            // A reset has no expansion of its own.
            ResetPosition::Literal(text) => {
                out.text(&text.replace(EXPANSION_MARKER, ""))
            }
        }

        out.close(QN_RESET);
        out.line_end();
    }

    fn relation(&mut self, strength: Strength, run: &Run) {
        let (head, extend) = match run.text.split_once(EXPANSION_MARKER) {
            Some((head, extend)) => (head, Some(extend)),
            None => (run.text.as_str(), None),
        };

        // A lone separator is just that.
        let (context, head) = match head.split_once(CONTEXT_SEPARATOR) {
            Some((context, rest)) if is_contraction(&run.text) => {
                (Some(context), rest)
            }
            _ => (None, head),
        };

        let name = relation_qname(strength, run.is_sequence());
        let wrap = context.is_some() || extend.is_some();
        let out = &mut *self.out;

        out.line_start();

        if wrap {
            out.open(QN_X);
        }

        if let Some(context) = context {
            out.open(QN_CONTEXT);
            out.text(context);
            out.close(QN_CONTEXT);
        }

        out.open(name);
        out.text(head);
        out.close(name);

        if let Some(extend) = extend {
            out.open(QN_EXTEND);
            out.text(&extend.replace(EXPANSION_MARKER, ""));
            out.close(QN_EXTEND);
        }

        if wrap {
            out.close(QN_X);
        }

        out.line_end();
    }

    /// Close `<rules>` and write settings.
    ///
    /// Settings are discarded if compilation failed.
    fn finish(&mut self, ok: bool) {
        if self.rules_open {
            self.out.close_block();
            self.rules_open = false;
        }

        if !ok {
            self.settings.clear();
            return;
        }

        if !self.settings.is_empty() {
            debug!(settings = %self.settings, "flush settings");
        }

        let mut rendered = self.out.fork();
        self.settings.flush_into(&mut rendered);

        let at = self.settings_at.unwrap_or(self.out.len());
        self.out.insert(at, rendered);
    }
}

/// Element name of a relation at the given strength.
fn relation_qname(strength: Strength, sequence: bool) -> QName {
    match (strength, sequence) {
        (Strength::Primary, false) => QN_P,
        (Strength::Primary, true) => QN_PC,
        (Strength::Secondary, false) => QN_S,
        (Strength::Secondary, true) => QN_SC,
        (Strength::Tertiary, false) => QN_T,
        (Strength::Tertiary, true) => QN_TC,
        (_, false) => QN_I,
        (_, true) => QN_IC,
    }
}

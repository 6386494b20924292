// Rule string lexer tests
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

use super::*;
use Strength::*;

type Sut<'s> = Lexer<'s>;

/// Lex the entire input into `(strength, text)` pairs,
///   excluding the final [`Done`].
fn lex(src: &str) -> Result<Vec<(Strength, String)>, LexError> {
    Sut::new(src)
        .map(|tok| tok.map(|t| (t.strength, t.text)))
        .collect()
}

fn toks(pairs: &[(Strength, &str)]) -> Vec<(Strength, String)> {
    pairs.iter().map(|(s, t)| (*s, t.to_string())).collect()
}

fn syntax_kind(src: &str) -> (SyntaxErrorKind, Span) {
    match lex(src) {
        Err(LexError::Syntax(e)) => (e.kind(), e.span()),
        other => panic!("expected syntax error, found {other:?}"),
    }
}

#[test]
fn empty_input_is_done_forever() {
    let mut sut = Sut::new("");

    for _ in 0..3 {
        let tok = sut.next_token().unwrap();
        assert_eq!(Done, tok.strength);
        assert_eq!("", tok.text);
    }
}

#[test]
fn whitespace_only_input_is_done() {
    let mut sut = Sut::new(" \t\n\u{200B} ");

    assert!(sut.next_token().unwrap().is_done());
    assert!(sut.next_token().unwrap().is_done());
}

#[test]
fn each_operator_yields_strength() {
    assert_eq!(
        Ok(toks(&[
            (Reset, "a"),
            (Primary, "b"),
            (Secondary, "c"),
            (Tertiary, "d"),
            (Secondary, "e"),
            (Tertiary, "f"),
            (Identical, "g"),
        ])),
        lex("& a < b << c <<< d ; e , f = g"),
    );
}

#[test]
fn operator_ends_token_without_consuming() {
    let mut sut = Sut::new("&a<b");

    assert_eq!(
        RuleToken::new(Reset, "a", Span::new(0, 2)),
        sut.next_token().unwrap(),
    );
    assert_eq!(2, sut.offset());

    assert_eq!(
        RuleToken::new(Primary, "b", Span::new(2, 2)),
        sut.next_token().unwrap(),
    );

    assert!(sut.next_token().unwrap().is_done());
}

#[test]
fn leading_relation_is_implicit_reset() {
    let cases = [
        ("<a", Primary),
        ("<<a", Secondary),
        (";a", Secondary),
        (",a", Tertiary),
        ("=a", Identical),
    ];

    for (src, strength) in cases {
        let mut sut = Sut::new(src);
        let reset = sut.next_token().unwrap();

        assert_eq!(Reset, reset.strength, "for {src}");
        assert_eq!(IMPLICIT_RESET, reset.text, "for {src}");

        // The operator was not consumed.
        assert_eq!(0, sut.offset(), "for {src}");

        let rel = sut.next_token().unwrap();
        assert_eq!(strength, rel.strength, "for {src}");
        assert_eq!("a", rel.text, "for {src}");
    }
}

#[test]
fn implicit_reset_only_at_start_of_rules() {
    assert_eq!(
        Ok(toks(&[(Reset, "[top]"), (Primary, "a"), (Primary, "b")])),
        lex("  < a < b"),
    );
}

#[test]
fn quotes_preserve_text() {
    assert_eq!(Ok(toks(&[(Reset, "<"), (Primary, "b")])), lex("&'<'<b"));
    assert_eq!(Ok(toks(&[(Reset, " a&")])), lex("&' a&'"));
}

#[test]
fn doubled_quote_is_literal_quote() {
    // Outside of a quoted section.
    assert_eq!(Ok(toks(&[(Reset, "a"), (Primary, "'")])), lex("&a<''"));

    // And within one.
    assert_eq!(Ok(toks(&[(Reset, "a'b")])), lex("&'a''b'"));
}

#[test]
fn unterminated_quote() {
    assert_eq!(
        (SyntaxErrorKind::UnterminatedQuote, Span::new(1, 1)),
        syntax_kind("&'abc"),
    );
}

#[test]
fn quote_before_strength() {
    assert_eq!(
        (SyntaxErrorKind::StrayQuote, Span::new(0, 1)),
        syntax_kind("'a'<b"),
    );
}

#[test]
fn escape_discards_next_char() {
    assert_eq!(Ok(toks(&[(Reset, ""), (Primary, "")])), lex("&\\<<\\#"));
    assert_eq!(Ok(toks(&[(Reset, "ac"), (Primary, "d")])), lex("&a\\bc<d"));
}

#[test]
fn escape_before_strength() {
    assert_eq!(
        (SyntaxErrorKind::StrayEscape, Span::new(0, 1)),
        syntax_kind("\\a"),
    );
}

#[test]
fn escape_at_end_of_input() {
    assert_eq!(
        (SyntaxErrorKind::StrayEscape, Span::new(2, 1)),
        syntax_kind("&a\\"),
    );
}

#[test]
fn expansion_appends_marker() {
    assert_eq!(
        Ok(toks(&[(Reset, "a"), (Primary, "b\u{FFFF}c")])),
        lex("&a<b/c"),
    );
}

#[test]
fn expansion_before_strength() {
    assert_eq!(
        (SyntaxErrorKind::MisplacedExpansion, Span::new(0, 1)),
        syntax_kind("/a"),
    );
}

#[test]
fn context_separator_is_literal() {
    assert_eq!(
        Ok(toks(&[(Reset, "a"), (Primary, "b|c")])),
        lex("&a<b|c"),
    );
}

#[test]
fn override_only_before_strength() {
    assert_eq!(
        Ok(toks(&[(Override, ""), (Reset, "a"), (Primary, "b@c")])),
        lex("@&a<b@c"),
    );
}

#[test]
fn exclamation_is_skipped() {
    assert_eq!(Ok(toks(&[(Reset, "a"), (Primary, "b")])), lex("&a<!b"));
}

#[test]
fn hyphen_is_literal() {
    assert_eq!(Ok(toks(&[(Reset, "a-b")])), lex("&a-b"));
}

#[test]
fn settings_retain_payload() {
    assert_eq!(
        Ok(toks(&[(Setting, "[strength 2][backwards 2]"), (Reset, "a")])),
        lex("[strength 2] [backwards 2] &a"),
    );
}

#[test]
fn settings_permit_special_chars_and_nesting() {
    assert_eq!(
        Ok(toks(&[(Setting, "[optimize [a#-z]]")])),
        lex("[optimize [a#-z]]"),
    );
}

#[test]
fn bracketed_reset_is_reset() {
    assert_eq!(
        Ok(toks(&[(Reset, "[before 1]a"), (Primary, "b")])),
        lex("&[before 1]a<b"),
    );
}

#[test]
fn unquoted_special_char() {
    match lex("&a<b#cd") {
        Err(LexError::Syntax(e)) => {
            assert_eq!(SyntaxErrorKind::SpecialChar('#'), e.kind());
            assert_eq!(Span::new(4, 1), e.span());
            assert_eq!("&a<b", e.pre_context());
            assert_eq!("cd", e.post_context());
        }
        other => panic!("expected syntax error, found {other:?}"),
    }
}

#[test]
fn text_before_strength() {
    assert_eq!(
        (SyntaxErrorKind::MissingStrength('a'), Span::new(0, 1)),
        syntax_kind("a<b"),
    );
}

#[test]
fn reserved_code_point_rejected() {
    assert_eq!(
        (SyntaxErrorKind::ReservedCodePoint, Span::new(2, 3)),
        syntax_kind("&a\u{FFFF}"),
    );

    // Even when quoted.
    assert_eq!(
        (SyntaxErrorKind::ReservedCodePoint, Span::new(3, 3)),
        syntax_kind("&a'\u{FFFF}'"),
    );
}

#[test]
fn supplementary_characters_are_single_chars() {
    assert_eq!(
        Ok(toks(&[(Reset, "\u{1D11E}"), (Primary, "b")])),
        lex("&\u{1D11E}<b"),
    );
}

#[test]
fn format_characters_are_whitespace() {
    assert_eq!(
        Ok(toks(&[(Reset, "a"), (Primary, "b")])),
        lex("&a\u{200B}<\u{FEFF}b"),
    );
}

#[test]
fn every_format_character_is_whitespace() {
    for c in ['\u{08E2}', '\u{110BD}', '\u{13438}', '\u{1D17A}', '\u{E007F}']
    {
        assert!(is_rule_whitespace(c), "U+{:04X}", c as u32);
    }

    assert_eq!(
        Ok(toks(&[(Reset, "a"), (Primary, "b")])),
        lex("&a\u{13430}<\u{1D173}b"),
    );

    // Neighbors of format ranges are significant.
    for c in ['\u{08E1}', '\u{110BE}', '\u{1D17B}', 'a'] {
        assert!(!is_rule_whitespace(c), "U+{:04X}", c as u32);
    }
}

#[test]
fn format_char_table_is_sorted_and_disjoint() {
    for pair in FORMAT_CHARS.windows(2) {
        assert!(pair[0].0 <= pair[0].1);
        assert!(pair[0].1 < pair[1].0);
    }
}

#[test]
fn buffer_grows_past_input_length() {
    // Each `/` is one byte of input but three bytes of token text.
    let src = format!("&a{}", "/".repeat(100));
    let expected = format!("a{}", "\u{FFFF}".repeat(100));

    assert_eq!(Ok(toks(&[(Reset, expected.as_str())])), lex(&src));
}

#[test]
fn iterator_stops_after_error() {
    let results = Sut::new("&a<b#c<d").collect::<Vec<_>>();

    assert_eq!(2, results.len());
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

//! # Lexer - Tokenizing Tag Markup
//!
//! This module provides the first stage of parsing: breaking markup into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so concatenating token texts reproduces the source:
//!
//! ```
//! use tagmark_syntax::lexer::lex;
//!
//! let input = "<strong>Hi</strong> there";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Context-Free Tokens
//!
//! The lexer has no idea whether it is inside a tag. `strong` lexes as a
//! `NAME` both in `<strong>` and in running text; the parser decides what a
//! name means from its position. Likewise `=` and quoted strings are only
//! meaningful inside a start tag and are plain text everywhere else.
//!
//! Characters with no rule of their own (a lone `&`, an unterminated quote)
//! come back from Logos as errors and are kept as `TEXT`.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// Kept separate from [`SyntaxKind`] because Logos derives on it. Each
/// variant maps to one `SyntaxKind` token.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// `</` opening an end tag
    #[token("</")]
    LtSlash,

    /// `<` opening a start tag
    #[token("<")]
    Lt,

    /// `/>` closing a self-closing tag
    #[token("/>")]
    SlashGt,

    /// `>` closing a tag
    #[token(">")]
    Gt,

    /// Lone `/`
    #[token("/")]
    Slash,

    /// `=` between attribute name and value
    #[token("=")]
    Eq,

    /// Single- or double-quoted attribute value. Never spans a tag
    #[regex(r#""[^"<>]*""#)]
    #[regex(r"'[^'<>]*'")]
    Quoted,

    /// Named or numeric character reference
    #[regex(r"&[a-zA-Z][a-zA-Z0-9]*;")]
    #[regex(r"&#[0-9]+;")]
    #[regex(r"&#[xX][0-9a-fA-F]+;")]
    Entity,

    /// Tag or attribute name; plain words outside tags
    #[regex(r"[A-Za-z][A-Za-z0-9-]*")]
    Name,

    /// Anything else, grouped into runs
    #[regex(r#"[^<>=&"'/\sA-Za-z]+"#)]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::LtSlash => SyntaxKind::LT_SLASH,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::SlashGt => SyntaxKind::SLASH_GT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Quoted => SyntaxKind::QUOTED,
            TokenKind::Entity => SyntaxKind::ENTITY,
            TokenKind::Name => SyntaxKind::NAME,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(kind: SyntaxKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_plain_words() {
        let tokens = lex("hello world");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::NAME, "hello"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::NAME, "world"),
            ]
        );
    }

    #[test]
    fn lex_start_and_end_tag() {
        let tokens = lex("<em>x</em>");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::LT, "<"),
                token(SyntaxKind::NAME, "em"),
                token(SyntaxKind::GT, ">"),
                token(SyntaxKind::NAME, "x"),
                token(SyntaxKind::LT_SLASH, "</"),
                token(SyntaxKind::NAME, "em"),
                token(SyntaxKind::GT, ">"),
            ]
        );
    }

    #[test]
    fn lex_self_closing_tag() {
        let tokens = lex("<br />");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::LT, "<"),
                token(SyntaxKind::NAME, "br"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::SLASH_GT, "/>"),
            ]
        );
    }

    #[test]
    fn lex_attribute() {
        let tokens = lex(r#"<b class="x">"#);
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::LT, "<"),
                token(SyntaxKind::NAME, "b"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::NAME, "class"),
                token(SyntaxKind::EQ, "="),
                token(SyntaxKind::QUOTED, "\"x\""),
                token(SyntaxKind::GT, ">"),
            ]
        );
    }

    #[test]
    fn lex_entities() {
        let tokens = lex("&amp;&#60;&#x3E;");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::ENTITY, "&amp;"),
                token(SyntaxKind::ENTITY, "&#60;"),
                token(SyntaxKind::ENTITY, "&#x3E;"),
            ]
        );
    }

    #[test]
    fn lex_digits_and_punctuation_as_text() {
        let tokens = lex("1. ok!");
        assert_eq!(
            tokens,
            vec![
                token(SyntaxKind::TEXT, "1."),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::NAME, "ok"),
                token(SyntaxKind::TEXT, "!"),
            ]
        );
    }

    #[test]
    fn lex_newline_crlf() {
        let tokens = lex("\r\n");
        assert_eq!(tokens, vec![token(SyntaxKind::NEWLINE, "\r\n")]);
    }

    #[test]
    fn lone_ampersand_is_text() {
        let tokens = lex("a & b");
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(reconstructed, "a & b");
        assert!(tokens.iter().all(|t| t.kind != SyntaxKind::ENTITY));
    }

    #[test]
    fn all_bytes_preserved_complex() {
        let input = "<h1>Title</h1><br /><ul>\n<li>♂one &amp; <strong>two</strong></li>\n</ul>";
        let tokens = lex(input);
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn spans_are_correct() {
        let input = "<u>under</u> line";
        let tokens = lex_with_spans(input);
        for (token, span) in &tokens {
            assert_eq!(token.text, &input[span.clone()]);
        }
    }
}

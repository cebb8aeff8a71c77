//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses its methods to inspect the
//! current token, consume tokens, and build structure through markers.
//!
//! ```text
//! root      := content*
//! content   := element | stray_end | token
//! element   := start_tag (content* end_tag?)?
//! start_tag := '<' NAME (attribute | trivia)* ('>' | '/>')?
//! attribute := NAME (WS? '=' WS? value)?
//! end_tag   := '</' NAME WS? '>'?
//! ```
//!
//! ## Error Recovery
//!
//! The grammar never fails. Unclosed elements run to the end of their parent,
//! an end tag naming an ancestor closes everything up to it, and an end tag
//! matching nothing open is wrapped in an ERROR node. Every input byte lands
//! in the tree.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "wbr", "input", "meta", "link"];

/// Returns true if `name` is a void element.
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Parse the root document.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        content(p);
    }

    m.complete(p, SyntaxKind::ROOT);
}

fn content(p: &mut Parser<'_, '_>) {
    if p.at(SyntaxKind::LT) && p.nth(1) == SyntaxKind::NAME {
        element(p);
    } else if p.at(SyntaxKind::LT_SLASH) && p.nth(1) == SyntaxKind::NAME {
        stray_end_tag(p);
    } else {
        p.bump();
    }
}

fn element(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let name = p.nth_text(1);
    let self_closing = start_tag(p);

    if self_closing || is_void(name) {
        m.complete(p, SyntaxKind::ELEMENT);
        return;
    }

    p.push_open(name);
    while !p.at_end() {
        if p.at(SyntaxKind::LT_SLASH) && p.nth(1) == SyntaxKind::NAME {
            let closing = p.nth_text(1);
            if closing.eq_ignore_ascii_case(name) {
                end_tag(p);
                break;
            }
            if p.closes_ancestor(closing) {
                break;
            }
            stray_end_tag(p);
            continue;
        }
        content(p);
    }
    p.pop_open();

    m.complete(p, SyntaxKind::ELEMENT);
}

/// Parse a start tag. Returns true if it was self-closing (`/>`).
fn start_tag(p: &mut Parser<'_, '_>) -> bool {
    let m = p.start();
    p.bump(); // <
    p.bump(); // name

    let mut self_closing = false;
    loop {
        match p.current() {
            SyntaxKind::GT => {
                p.bump();
                break;
            }
            SyntaxKind::SLASH_GT => {
                p.bump();
                self_closing = true;
                break;
            }
            SyntaxKind::NAME => attribute(p),
            SyntaxKind::LT | SyntaxKind::LT_SLASH | SyntaxKind::EOF => break,
            _ => p.bump(),
        }
    }

    m.complete(p, SyntaxKind::START_TAG);
    self_closing
}

fn attribute(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump(); // name

    let has_value = p.at(SyntaxKind::EQ)
        || (p.at(SyntaxKind::WHITESPACE) && p.nth(1) == SyntaxKind::EQ);
    if has_value {
        p.eat(SyntaxKind::WHITESPACE);
        p.bump(); // =
        p.eat(SyntaxKind::WHITESPACE);
        if !p.eat(SyntaxKind::QUOTED) {
            // Unquoted value runs to the next delimiter
            while !matches!(
                p.current(),
                SyntaxKind::WHITESPACE
                    | SyntaxKind::NEWLINE
                    | SyntaxKind::GT
                    | SyntaxKind::SLASH_GT
                    | SyntaxKind::LT
                    | SyntaxKind::LT_SLASH
                    | SyntaxKind::EOF
            ) {
                p.bump();
            }
        }
    }

    m.complete(p, SyntaxKind::ATTRIBUTE);
}

fn end_tag(p: &mut Parser<'_, '_>) {
    let m = p.start();
    end_tag_tokens(p);
    m.complete(p, SyntaxKind::END_TAG);
}

fn stray_end_tag(p: &mut Parser<'_, '_>) {
    let m = p.start();
    end_tag_tokens(p);
    m.complete(p, SyntaxKind::ERROR);
}

fn end_tag_tokens(p: &mut Parser<'_, '_>) {
    p.bump(); // </
    p.bump(); // name
    while p.current().is_trivia() {
        p.bump();
    }
    p.eat(SyntaxKind::GT);
}

//! Typed views over the untyped CST.
//!
//! These wrappers give the importer a small API (element names and content
//! in document order) without losing access to the underlying
//! [`SyntaxNode`].

use crate::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

/// An element node: `<name ...>content</name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element(SyntaxNode);

/// One piece of content inside the root or an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element(Element),
    /// A text-bearing token. Entities are left encoded.
    Text(SyntaxToken),
}

impl Element {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        (node.kind() == SyntaxKind::ELEMENT).then_some(Self(node))
    }

    pub fn syntax(&self) -> &SyntaxNode {
        &self.0
    }

    fn start_tag(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::START_TAG)
    }

    /// The tag name, lowercased.
    pub fn name(&self) -> String {
        self.start_tag()
            .and_then(|tag| {
                tag.children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .find(|t| t.kind() == SyntaxKind::NAME)
            })
            .map(|t| t.text().to_ascii_lowercase())
            .unwrap_or_default()
    }

    /// Content between the start and end tag.
    pub fn content(&self) -> impl Iterator<Item = Content> + use<> {
        content_of(&self.0)
    }
}

/// Content of the document root in order.
pub fn root_content(root: &SyntaxNode) -> impl Iterator<Item = Content> + use<> {
    content_of(root)
}

fn content_of(node: &SyntaxNode) -> impl Iterator<Item = Content> + use<> {
    node.children_with_tokens().filter_map(|child| match child {
        rowan::NodeOrToken::Node(n) => Element::cast(n).map(Content::Element),
        rowan::NodeOrToken::Token(t) => Some(Content::Text(t)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    fn first_element(input: &str) -> Element {
        let tree = parse(input);
        root_content(&tree)
            .find_map(|c| match c {
                Content::Element(e) => Some(e),
                Content::Text(_) => None,
            })
            .unwrap()
    }

    #[test]
    fn element_name_is_lowercased() {
        assert_eq!(first_element("<STRONG>x</STRONG>").name(), "strong");
    }

    #[test]
    fn attributes_do_not_change_the_name() {
        let img = first_element(r#"<IMG src="a.png" alt='pic' hidden>"#);
        assert_eq!(img.name(), "img");
    }

    #[test]
    fn content_skips_tags_and_errors() {
        let b = first_element("<b>x<i>y</i></u>z</b>");
        let kinds: Vec<String> = b
            .content()
            .map(|c| match c {
                Content::Element(e) => format!("<{}>", e.name()),
                Content::Text(t) => t.text().to_string(),
            })
            .collect();
        assert_eq!(kinds, vec!["x", "<i>", "z"]);
    }
}

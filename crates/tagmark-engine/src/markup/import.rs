//! Tagged markup to plain text plus markers.
//!
//! The markup is parsed into a lossless tree and walked depth first while
//! the flattened text accumulates. A recognised element records the
//! `(line, ch)` span between the text position before and after its
//! children.

use log::debug;
use tagmark_syntax::SyntaxKind;
use tagmark_syntax::ast::{Content, Element, root_content};

use crate::editing::buffer::normalize_newlines;
use crate::editing::{BlockClass, ListKind, Position};
use crate::markup::TagMap;
use crate::state::{DocumentState, Marker};

/// Parse `markup` into persisted state.
pub fn from_html(markup: &str, tags: &TagMap) -> DocumentState {
    let markup = normalize_newlines(markup);
    let tree = tagmark_syntax::parse(&markup);
    let mut walker = Walker::new(tags);
    walker.walk(root_content(&tree).collect(), None);
    debug!(
        "imported {} chars, {} markers, {} blocks",
        walker.state.value.chars().count(),
        walker.state.markers.len(),
        walker.state.blocks.len()
    );
    walker.state
}

struct Walker<'t> {
    tags: &'t TagMap,
    state: DocumentState,
    pos: Position,
}

impl<'t> Walker<'t> {
    fn new(tags: &'t TagMap) -> Self {
        Self {
            tags,
            state: DocumentState::default(),
            pos: Position::default(),
        }
    }

    fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            self.state.value.push(c);
            if c == '\n' {
                self.pos = Position::new(self.pos.line + 1, 0);
            } else {
                self.pos.ch += 1;
            }
        }
    }

    /// `list` is the kind of list whose container directly holds `content`.
    fn walk(&mut self, content: Vec<Content>, list: Option<ListKind>) {
        let is_element = |c: &Content| matches!(c, Content::Element(_));
        let first = content.iter().position(is_element);
        let last = content.iter().rposition(is_element);

        for (index, item) in content.into_iter().enumerate() {
            match item {
                Content::Element(element) => self.element(&element, list),
                Content::Text(token) => {
                    if list.is_some() {
                        // Layout whitespace around list items
                        let between = first.is_some_and(|f| f < index)
                            && last.is_some_and(|l| index < l);
                        match token.kind() {
                            SyntaxKind::WHITESPACE => continue,
                            SyntaxKind::NEWLINE if !between => continue,
                            _ => {}
                        }
                    }
                    if token.kind() == SyntaxKind::ENTITY {
                        let decoded = html_escape::decode_html_entities(token.text()).into_owned();
                        self.push_text(&decoded);
                    } else {
                        self.push_text(token.text());
                    }
                }
            }
        }
    }

    fn element(&mut self, element: &Element, parent_list: Option<ListKind>) {
        let name = element.name();
        if name == "br" {
            self.push_text("\n");
            return;
        }

        let start = self.pos;
        let child_list = match name.as_str() {
            "ul" => Some(ListKind::Unordered),
            "ol" => Some(ListKind::Ordered),
            _ => None,
        };

        // Markers stay in opening order, outer before inner
        let class = self.tags.class_for_tag(&name);
        let slot = self.state.markers.len();
        if let Some(class) = class {
            self.state
                .markers
                .push(Marker::new(class.as_str(), start, start));
        }
        self.walk(element.content().collect(), child_list);
        let end = self.pos;

        if class.is_some() {
            if start == end {
                self.state.markers.remove(slot);
            } else {
                self.state.markers[slot].end = end;
            }
        } else if name.parse::<BlockClass>().is_ok() {
            self.state.blocks.push(Marker::new(name, start, end));
        } else if name == "li" || name == self.tags.list_item_tag() {
            let class_name = parent_list.map_or("li", ListKind::as_str);
            self.state.blocks.push(Marker::new(class_name, start, end));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn import(markup: &str) -> DocumentState {
        from_html(markup, &TagMap::default())
    }

    #[test]
    fn test_inline_markers() {
        let state = import("<strong>Testing</strong><br />formatting");
        assert_eq!(state.value, "Testing\nformatting");
        assert_eq!(state.markers, vec![Marker::new("bold", (0, 0), (0, 7))]);
    }

    #[test]
    fn test_nested_markers_record_outer_first() {
        let state = import("<b>a<i>b</i></b>");
        assert_eq!(
            state.markers,
            vec![
                Marker::new("bold", (0, 0), (0, 2)),
                Marker::new("italic", (0, 1), (0, 2)),
            ]
        );
    }

    #[rstest]
    #[case("<u>x</u>", "underline")]
    #[case("<s>x</s>", "strikethrough")]
    #[case("<strike>x</strike>", "strikethrough")]
    #[case("<del>x</del>", "strikethrough")]
    #[case("<annotation>x</annotation>", "annotation")]
    #[case("<em>x</em>", "italic")]
    fn test_vocabulary(#[case] markup: &str, #[case] class: &str) {
        assert_eq!(import(markup).markers, vec![Marker::new(class, (0, 0), (0, 1))]);
    }

    #[test]
    fn test_headings_are_blocks() {
        let state = import("<h1>Title</h1><br />body");
        assert_eq!(state.value, "Title\nbody");
        assert_eq!(state.blocks, vec![Marker::new("h1", (0, 0), (0, 5))]);
    }

    #[test]
    fn test_list_items_take_container_kind() {
        let state = import("<ol>\n<li>one</li><br /><li>two</li>\n</ol><br />after");
        assert_eq!(state.value, "one\ntwo\nafter");
        assert_eq!(
            state.blocks,
            vec![
                Marker::new("ordered", (0, 0), (0, 3)),
                Marker::new("ordered", (1, 0), (1, 3)),
            ]
        );
    }

    #[test]
    fn test_newlines_between_items_separate_lines() {
        let state = import("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>");
        assert_eq!(state.value, "a\nb");
        assert_eq!(state.blocks[1], Marker::new("unordered", (1, 0), (1, 1)));
    }

    #[test]
    fn test_parentless_li() {
        let state = import("<li>x</li>");
        assert_eq!(state.blocks, vec![Marker::new("li", (0, 0), (0, 1))]);
    }

    #[test]
    fn test_unknown_elements_keep_text() {
        let state = import(r#"<p class="x">a &amp; <span>b</span></p>"#);
        assert_eq!(state.value, "a & b");
        assert!(state.markers.is_empty());
        assert!(state.blocks.is_empty());
    }

    #[test]
    fn test_empty_elements_are_skipped() {
        assert!(import("a<strong></strong>b").markers.is_empty());
    }
}

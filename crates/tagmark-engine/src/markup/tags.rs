use std::collections::BTreeMap;

use crate::editing::InlineClass;

/// Class name to element name for export, and the reverse for import.
///
/// Keys are inline class names plus `list` for the list item element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMap {
    tags: BTreeMap<String, String>,
}

const DEFAULT_TAGS: [(&str, &str); 6] = [
    ("bold", "strong"),
    ("italic", "em"),
    ("underline", "u"),
    ("strikethrough", "s"),
    ("annotation", "annotation"),
    ("list", "li"),
];

/// Extra element names the importer accepts.
const ALIASES: [(&str, InlineClass); 4] = [
    ("b", InlineClass::Bold),
    ("i", InlineClass::Italic),
    ("strike", InlineClass::Strikethrough),
    ("del", InlineClass::Strikethrough),
];

impl Default for TagMap {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS
                .iter()
                .map(|(class, tag)| (class.to_string(), tag.to_string()))
                .collect(),
        }
    }
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the element used for `class`.
    pub fn set(&mut self, class: impl Into<String>, tag: impl Into<String>) {
        self.tags.insert(class.into(), tag.into());
    }

    pub fn tag_for(&self, class: InlineClass) -> &str {
        self.tags
            .get(class.as_str())
            .map_or(class.as_str(), String::as_str)
    }

    pub fn list_item_tag(&self) -> &str {
        self.tags.get("list").map_or("li", String::as_str)
    }

    /// Inline class an element name stands for, if any.
    pub fn class_for_tag(&self, tag: &str) -> Option<InlineClass> {
        InlineClass::ALL
            .into_iter()
            .find(|class| self.tag_for(*class) == tag)
            .or_else(|| {
                DEFAULT_TAGS
                    .iter()
                    .find(|(_, default)| *default == tag)
                    .and_then(|(class, _)| class.parse().ok())
            })
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == tag)
                    .map(|(_, class)| *class)
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

use std::collections::BTreeMap;

use crate::editing::BlockClass;

/// Block class per line, at most one each.
///
/// Classes belong to lines, not offsets: when an edit replaces lines
/// `from..=to` with `added + 1` lines, line `from` keeps its class, the
/// replaced lines lose theirs and everything below shifts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineClasses {
    classes: BTreeMap<usize, BlockClass>,
}

impl LineClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, line: usize) -> Option<BlockClass> {
        self.classes.get(&line).copied()
    }

    pub fn set(&mut self, line: usize, class: BlockClass) {
        self.classes.insert(line, class);
    }

    pub fn clear(&mut self, line: usize) -> Option<BlockClass> {
        self.classes.remove(&line)
    }

    pub fn clear_all(&mut self) {
        self.classes.clear();
    }

    /// Lines that carry a class, in line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, BlockClass)> + '_ {
        self.classes.iter().map(|(line, class)| (*line, *class))
    }

    /// Follow an edit that replaced lines `from..=to` with text spanning
    /// `added` newlines.
    pub fn splice(&mut self, from: usize, to: usize, added: usize) {
        if to == from && added == 0 {
            return;
        }
        let removed = to - from;
        self.classes = std::mem::take(&mut self.classes)
            .into_iter()
            .filter_map(|(line, class)| {
                if line <= from {
                    Some((line, class))
                } else if line <= to {
                    None
                } else {
                    Some((line - removed + added, class))
                }
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn h(level: u8) -> BlockClass {
        BlockClass::heading(level).unwrap()
    }

    fn lines(classes: &LineClasses) -> Vec<(usize, u8)> {
        classes.iter().map(|(l, c)| (l, c.level())).collect()
    }

    #[test]
    fn set_overwrites() {
        let mut classes = LineClasses::new();
        classes.set(1, h(1));
        classes.set(1, h(3));
        assert_eq!(lines(&classes), vec![(1, 3)]);
    }

    #[test]
    fn inserted_lines_shift_classes_down() {
        let mut classes = LineClasses::new();
        classes.set(0, h(1));
        classes.set(2, h(2));
        // Enter pressed on line 0
        classes.splice(0, 0, 1);
        assert_eq!(lines(&classes), vec![(0, 1), (3, 2)]);
    }

    #[test]
    fn joined_lines_lose_their_class() {
        let mut classes = LineClasses::new();
        classes.set(1, h(1));
        classes.set(2, h(2));
        classes.set(4, h(4));
        // Lines 1..=2 joined into one
        classes.splice(1, 2, 0);
        assert_eq!(lines(&classes), vec![(1, 1), (3, 4)]);
    }
}

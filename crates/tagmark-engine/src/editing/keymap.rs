//! Default key chords for formatting commands.

use std::collections::HashMap;

use crate::editing::{BlockClass, InlineClass};

/// A formatting command a host can bind to a key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Toggle(InlineClass),
    RemoveFormatting,
    Block(BlockClass),
}

/// Chord name to command, e.g. `"Ctrl-B"` or `"Cmd-Alt-2"`.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<String, Command>,
}

impl Keymap {
    /// Bindings with `Ctrl` for the primary modifier.
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert("Ctrl-B".to_string(), Command::Toggle(InlineClass::Bold));
        bindings.insert("Ctrl-I".to_string(), Command::Toggle(InlineClass::Italic));
        bindings.insert("Ctrl-U".to_string(), Command::Toggle(InlineClass::Underline));
        bindings.insert(
            "Ctrl-5".to_string(),
            Command::Toggle(InlineClass::Strikethrough),
        );
        bindings.insert(
            "Ctrl-Alt-M".to_string(),
            Command::Toggle(InlineClass::Annotation),
        );
        bindings.insert("Ctrl-Space".to_string(), Command::RemoveFormatting);
        bindings.insert("Ctrl-/".to_string(), Command::RemoveFormatting);
        for level in 1..=6 {
            if let Some(class) = BlockClass::heading(level) {
                bindings.insert(format!("Ctrl-Alt-{level}"), Command::Block(class));
            }
        }
        Self { bindings }
    }

    /// Default bindings, with `Cmd` in place of `Ctrl` on macOS.
    pub fn for_platform(mac: bool) -> Self {
        let keymap = Self::new();
        if !mac {
            return keymap;
        }
        Self {
            bindings: keymap
                .bindings
                .into_iter()
                .map(|(chord, command)| (chord.replace("Ctrl", "Cmd"), command))
                .collect(),
        }
    }

    pub fn lookup(&self, chord: &str) -> Option<Command> {
        self.bindings.get(chord).copied()
    }

    pub fn bind(&mut self, chord: impl Into<String>, command: Command) {
        self.bindings.insert(chord.into(), command);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

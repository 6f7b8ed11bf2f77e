//! Keyboard shortcut table.

use crate::input::{KeyInput, Modifiers};
use serde::{Deserialize, Serialize};

/// Direction of an arrow-key nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Action a shortcut triggers on the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorCommand {
    Delete,
    Undo,
    Redo,
    Duplicate,
    ClearSelection,
    SelectAll,
    Group,
    Ungroup,
    /// Move the selection by the small step, or the large one with `large`.
    Nudge { direction: NudgeDirection, large: bool },
}

/// A key plus the modifier state it requires.
///
/// `command` is Ctrl or Cmd. Alt never takes part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub key: String,
    pub command: bool,
    pub shift: bool,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, command: bool, shift: bool) -> Self {
        Self {
            key: key.into(),
            command,
            shift,
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, false, false)
    }

    pub fn command(key: impl Into<String>) -> Self {
        Self::new(key, true, false)
    }

    pub fn command_shift(key: impl Into<String>) -> Self {
        Self::new(key, true, true)
    }

    fn matches(&self, key: &str, modifiers: &Modifiers) -> bool {
        self.key == key && self.command == modifiers.command() && self.shift == modifiers.shift
    }
}

/// Maps key presses to editor commands.
#[derive(Debug, Clone)]
pub struct ShortcutRegistry {
    bindings: Vec<(Shortcut, EditorCommand)>,
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.bind(Shortcut::plain("Delete"), EditorCommand::Delete);
        registry.bind(Shortcut::plain("Backspace"), EditorCommand::Delete);
        registry.bind(Shortcut::command("z"), EditorCommand::Undo);
        registry.bind(Shortcut::command_shift("z"), EditorCommand::Redo);
        registry.bind(Shortcut::command("y"), EditorCommand::Redo);
        registry.bind(Shortcut::command("d"), EditorCommand::Duplicate);
        registry.bind(Shortcut::plain("Escape"), EditorCommand::ClearSelection);
        registry.bind(Shortcut::command("a"), EditorCommand::SelectAll);
        registry.bind(Shortcut::command("g"), EditorCommand::Group);
        registry.bind(Shortcut::command_shift("g"), EditorCommand::Ungroup);

        for (key, direction) in [
            ("ArrowUp", NudgeDirection::Up),
            ("ArrowDown", NudgeDirection::Down),
            ("ArrowLeft", NudgeDirection::Left),
            ("ArrowRight", NudgeDirection::Right),
        ] {
            registry.bind(Shortcut::plain(key), EditorCommand::Nudge { direction, large: false });
            registry.bind(Shortcut::new(key, false, true), EditorCommand::Nudge { direction, large: true });
        }
        registry
    }
}

impl ShortcutRegistry {
    /// A registry with no bindings.
    pub fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Add or replace the binding for `shortcut`.
    pub fn bind(&mut self, shortcut: Shortcut, command: EditorCommand) {
        if let Some(existing) = self.bindings.iter_mut().find(|(s, _)| *s == shortcut) {
            existing.1 = command;
        } else {
            self.bindings.push((shortcut, command));
        }
    }

    pub fn unbind(&mut self, shortcut: &Shortcut) {
        self.bindings.retain(|(s, _)| s != shortcut);
    }

    pub fn bindings(&self) -> &[(Shortcut, EditorCommand)] {
        &self.bindings
    }

    /// Command for a key press. Nothing resolves while a text field has focus.
    pub fn resolve(&self, input: &KeyInput) -> Option<EditorCommand> {
        if input.text_focus {
            return None;
        }
        let key = input.normalized_key();
        self.bindings
            .iter()
            .find(|(s, _)| s.matches(&key, &input.modifiers))
            .map(|(_, command)| *command)
    }
}

//! Pointer and keyboard input values handed to the editor by the UI layer.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl_shift() -> Self {
        Self {
            ctrl: true,
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Stage of a pointer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The platform aborted the sequence (touch interrupted, capture lost).
    Cancel,
    /// The pointer left the canvas area.
    Leave,
}

impl PointerPhase {
    /// Whether this phase terminates an active gesture.
    pub fn ends_gesture(self) -> bool {
        matches!(self, PointerPhase::Up | PointerPhase::Cancel | PointerPhase::Leave)
    }
}

/// A mouse, pen or touch event in screen (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Point) -> Self {
        Self {
            phase,
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn down(position: Point) -> Self {
        Self::new(PointerPhase::Down, position)
    }

    pub fn moved(position: Point) -> Self {
        Self::new(PointerPhase::Move, position)
    }

    pub fn up(position: Point) -> Self {
        Self::new(PointerPhase::Up, position)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A key press, named like DOM `KeyboardEvent.key` ("z", "Delete", "ArrowUp").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: String,
    pub modifiers: Modifiers,
    /// Focus is inside a text-editing control.
    #[serde(default)]
    pub text_focus: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            text_focus: false,
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn in_text_field(mut self) -> Self {
        self.text_focus = true;
        self
    }

    /// Key name compared case-insensitively for single letters.
    pub fn normalized_key(&self) -> String {
        if self.key.chars().count() == 1 {
            self.key.to_lowercase()
        } else {
            self.key.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_end_phases() {
        assert!(!PointerPhase::Down.ends_gesture());
        assert!(!PointerPhase::Move.ends_gesture());
        assert!(PointerPhase::Up.ends_gesture());
        assert!(PointerPhase::Cancel.ends_gesture());
        assert!(PointerPhase::Leave.ends_gesture());
    }

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::ctrl().command());
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.command());
        assert!(!Modifiers::shift().command());
    }

    #[test]
    fn test_normalized_key() {
        assert_eq!(KeyInput::plain("Z").normalized_key(), "z");
        assert_eq!(KeyInput::plain("ArrowUp").normalized_key(), "ArrowUp");
    }
}

//! Input Bindings Module
//!
//! Maps physical keys to clone tool actions, allowing key remapping from the
//! tool configuration.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::KeyCode;

/// Logical actions of the clone tool.
///
/// These actions represent tool inputs independent of their physical key mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolAction {
    /// Raise the selection box while extruding (default: PageUp)
    HeightUp,
    /// Lower the selection box while extruding (default: PageDown)
    HeightDown,
    /// Nudge away from the camera (default: ArrowUp)
    MoveForward,
    /// Nudge towards the camera (default: ArrowDown)
    MoveBack,
    /// Nudge left of the camera (default: ArrowLeft)
    MoveLeft,
    /// Nudge right of the camera (default: ArrowRight)
    MoveRight,
    /// Nudge one level up (default: Home)
    MoveUp,
    /// Nudge one level down (default: End)
    MoveDown,
    /// Rotate the selection clockwise (default: ])
    RotateClockwise,
    /// Rotate the selection counter-clockwise (default: [)
    RotateCounterClockwise,
    /// Mirror the selection (default: F)
    Flip,
    /// Capture the selection contents (default: C)
    Copy,
    /// Capture and remove the selection contents (default: X)
    Cut,
    /// Apply the captured contents at the current box (default: V)
    Paste,
    /// Long-press to drop the selection (default: Delete)
    Reset,
}

impl ToolAction {
    pub const ALL: [ToolAction; 15] = [
        ToolAction::HeightUp,
        ToolAction::HeightDown,
        ToolAction::MoveForward,
        ToolAction::MoveBack,
        ToolAction::MoveLeft,
        ToolAction::MoveRight,
        ToolAction::MoveUp,
        ToolAction::MoveDown,
        ToolAction::RotateClockwise,
        ToolAction::RotateCounterClockwise,
        ToolAction::Flip,
        ToolAction::Copy,
        ToolAction::Cut,
        ToolAction::Paste,
        ToolAction::Reset,
    ];

    /// Actions that fire once on press and then repeat while held.
    pub fn repeats_while_held(self) -> bool {
        matches!(
            self,
            ToolAction::HeightUp
                | ToolAction::HeightDown
                | ToolAction::MoveForward
                | ToolAction::MoveBack
                | ToolAction::MoveLeft
                | ToolAction::MoveRight
                | ToolAction::MoveUp
                | ToolAction::MoveDown
        )
    }
}

/// One key/action pair, as stored in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub action: ToolAction,
    pub key: KeyCode,
}

/// Maps physical keys to tool actions, one key per action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Map from physical key to logical action
    key_to_action: HashMap<KeyCode, ToolAction>,
    /// Map from logical action to physical key (for reverse lookup and display)
    action_to_key: HashMap<ToolAction, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Create a new KeyBindings instance with the default clone tool keys.
    pub fn new() -> Self {
        Self::from_entries(&Self::default_entries())
    }

    /// An empty binding table.
    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
            action_to_key: HashMap::new(),
        }
    }

    /// Build from key/action pairs. Later entries win on conflicts.
    pub fn from_entries(entries: &[KeyBinding]) -> Self {
        let mut bindings = Self::empty();
        for entry in entries {
            bindings.bind(entry.key, entry.action);
        }
        bindings
    }

    /// The built-in key layout.
    pub fn default_entries() -> Vec<KeyBinding> {
        [
            (ToolAction::HeightUp, KeyCode::PageUp),
            (ToolAction::HeightDown, KeyCode::PageDown),
            (ToolAction::MoveForward, KeyCode::ArrowUp),
            (ToolAction::MoveBack, KeyCode::ArrowDown),
            (ToolAction::MoveLeft, KeyCode::ArrowLeft),
            (ToolAction::MoveRight, KeyCode::ArrowRight),
            (ToolAction::MoveUp, KeyCode::Home),
            (ToolAction::MoveDown, KeyCode::End),
            (ToolAction::RotateClockwise, KeyCode::BracketRight),
            (ToolAction::RotateCounterClockwise, KeyCode::BracketLeft),
            (ToolAction::Flip, KeyCode::F),
            (ToolAction::Copy, KeyCode::C),
            (ToolAction::Cut, KeyCode::X),
            (ToolAction::Paste, KeyCode::V),
            (ToolAction::Reset, KeyCode::Delete),
        ]
        .into_iter()
        .map(|(action, key)| KeyBinding { action, key })
        .collect()
    }

    /// Bind a physical key to an action.
    ///
    /// If the key was previously bound to another action, that binding is removed.
    /// If the action was previously bound to another key, that binding is also removed.
    pub fn bind(&mut self, key: KeyCode, action: ToolAction) {
        if let Some(old_action) = self.key_to_action.remove(&key) {
            self.action_to_key.remove(&old_action);
        }
        if let Some(old_key) = self.action_to_key.remove(&action) {
            self.key_to_action.remove(&old_key);
        }

        self.key_to_action.insert(key, action);
        self.action_to_key.insert(action, key);
    }

    /// Remove the binding for a specific action.
    pub fn unbind_action(&mut self, action: ToolAction) {
        if let Some(key) = self.action_to_key.remove(&action) {
            self.key_to_action.remove(&key);
        }
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<ToolAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Get the key bound to an action, if any.
    pub fn get_key(&self, action: ToolAction) -> Option<KeyCode> {
        self.action_to_key.get(&action).copied()
    }

    /// Check if the key bound to `action` is in `keys`.
    pub fn is_action_in(&self, action: ToolAction, keys: &HashSet<KeyCode>) -> bool {
        self.action_to_key
            .get(&action)
            .is_some_and(|key| keys.contains(key))
    }

    /// All bindings in [`ToolAction::ALL`] order.
    pub fn entries(&self) -> Vec<KeyBinding> {
        ToolAction::ALL
            .iter()
            .filter_map(|&action| self.get_key(action).map(|key| KeyBinding { action, key }))
            .collect()
    }
}

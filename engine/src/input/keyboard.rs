//! Keyboard Input Module
//!
//! Key codes and per-frame keyboard state with press edges.
//! Decoupled from any windowing system to use generic key codes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Generic key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    // Letter keys
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    Q,
    R,
    S,
    T,
    V,
    W,
    X,
    Z,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Navigation
    PageUp,
    PageDown,
    Home,
    End,
    Delete,

    // Modifiers and control
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    Space,
    Escape,
    Enter,
    Tab,
    Backspace,

    // Brackets for rotation
    BracketLeft,
    BracketRight,
    Comma,
    Period,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Keyboard state with per-frame edges.
///
/// `held` is the set of keys currently down. `pressed` and `released` only
/// hold the keys that changed since the last [`KeyboardState::end_frame`].
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
    released: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Create a new keyboard state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press or release event. OS key-repeat presses are ignored.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if self.held.insert(key) {
                self.pressed.insert(key);
            }
        } else if self.held.remove(&key) {
            self.released.insert(key);
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn was_released(&self, key: KeyCode) -> bool {
        self.released.contains(&key)
    }

    pub fn held_keys(&self) -> &HashSet<KeyCode> {
        &self.held
    }

    pub fn pressed_keys(&self) -> &HashSet<KeyCode> {
        &self.pressed
    }

    /// Clear the per-frame edges. Call once after the frame was processed.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    /// Release everything (focus lost).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

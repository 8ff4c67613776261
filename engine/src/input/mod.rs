//! Input Module
//!
//! Platform-agnostic keyboard and mouse handling for the editing tools.
//! This module is decoupled from any specific windowing system to allow for
//! flexible integration.
//!
//! # Example
//!
//! ```rust,ignore
//! use terra_clone::input::{InputState, KeyCode, MouseButton};
//!
//! let mut input = InputState::new();
//!
//! // Feed window events
//! input.keyboard.handle_key(KeyCode::C, true);
//! input.mouse.set_button(MouseButton::Left, true);
//!
//! // Once per frame: snapshot, hand to the tool, clear edges
//! let frame = input.snapshot(dt, camera_yaw_degrees);
//! tool.update(&frame, &picker, &mut world);
//! input.end_frame();
//! ```

pub mod bindings;
pub mod hold;
pub mod keyboard;
pub mod mouse;

use std::collections::HashSet;

// Re-export commonly used types at module level
pub use bindings::{KeyBinding, KeyBindings, ToolAction};
pub use hold::HoldTracker;
pub use keyboard::{KeyCode, KeyboardState};
pub use mouse::{ButtonState, MouseButton, MouseState};

/// Combined input state for both keyboard and mouse.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl InputState {
    /// Create a new input state with all inputs in their default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture this frame's input for the tools. Consumes whole wheel steps.
    pub fn snapshot(&mut self, dt: f32, camera_angle: f32) -> ToolInput {
        ToolInput {
            primary_pressed: self.mouse.left.pressed,
            primary_held: self.mouse.left.held,
            primary_released: self.mouse.left.released,
            cancel_pressed: self.mouse.right.pressed,
            wheel_steps: self.mouse.consume_scroll_steps(),
            keys_pressed: self.keyboard.pressed_keys().clone(),
            keys_held: self.keyboard.held_keys().clone(),
            dt,
            camera_angle,
        }
    }

    /// Clear per-frame edges on both devices.
    pub fn end_frame(&mut self) {
        self.keyboard.end_frame();
        self.mouse.end_frame();
    }

    /// Reset all input state to defaults.
    pub fn reset(&mut self) {
        self.keyboard.reset();
        self.mouse.reset();
    }
}

/// One frame of input as seen by a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolInput {
    /// Primary (left) button went down this frame
    pub primary_pressed: bool,
    /// Primary button is down
    pub primary_held: bool,
    /// Primary button went up this frame
    pub primary_released: bool,
    /// Cancel (right) button went down this frame
    pub cancel_pressed: bool,
    /// Whole wheel steps this frame (positive = up)
    pub wheel_steps: i32,
    pub keys_pressed: HashSet<KeyCode>,
    pub keys_held: HashSet<KeyCode>,
    /// Frame time in seconds
    pub dt: f32,
    /// Horizontal camera angle in degrees, clockwise from +y
    pub camera_angle: f32,
}

impl ToolInput {
    /// A frame with no input.
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    pub fn primary_down(mut self) -> Self {
        self.primary_pressed = true;
        self.primary_held = true;
        self
    }

    pub fn primary_hold(mut self) -> Self {
        self.primary_held = true;
        self
    }

    pub fn primary_up(mut self) -> Self {
        self.primary_released = true;
        self.primary_held = false;
        self
    }

    pub fn cancel(mut self) -> Self {
        self.cancel_pressed = true;
        self
    }

    pub fn wheel(mut self, steps: i32) -> Self {
        self.wheel_steps = steps;
        self
    }

    /// Key went down this frame (and is held).
    pub fn press(mut self, key: KeyCode) -> Self {
        self.keys_pressed.insert(key);
        self.keys_held.insert(key);
        self
    }

    /// Key is held from an earlier frame.
    pub fn hold(mut self, key: KeyCode) -> Self {
        self.keys_held.insert(key);
        self
    }

    pub fn camera(mut self, degrees: f32) -> Self {
        self.camera_angle = degrees;
        self
    }
}

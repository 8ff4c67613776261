//! Mouse Input Module
//!
//! Button edges and scroll wheel accumulation.
//! Decoupled from any windowing system to use generic types.

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional mouse buttons (button 4, 5, etc.)
    Other(u16),
}

/// State of one mouse button including per-frame edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub held: bool,
    pub pressed: bool,
    pub released: bool,
}

impl ButtonState {
    fn set(&mut self, down: bool) {
        if down && !self.held {
            self.pressed = true;
        } else if !down && self.held {
            self.released = true;
        }
        self.held = down;
    }

    fn end_frame(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}

/// Mouse buttons and wheel, accumulated between frames.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    pub left: ButtonState,
    pub middle: ButtonState,
    pub right: ButtonState,
    /// Accumulated wheel lines since the last frame (positive = up/away)
    scroll_lines: f32,
}

impl MouseState {
    /// Create a new mouse state with all buttons released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a mouse button press/release event.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left.set(pressed),
            MouseButton::Middle => self.middle.set(pressed),
            MouseButton::Right => self.right.set(pressed),
            MouseButton::Other(_) => {} // Ignore extra buttons
        }
    }

    /// Accumulate a wheel delta in lines.
    pub fn add_scroll_lines(&mut self, lines: f32) {
        self.scroll_lines += lines;
    }

    /// Accumulate a wheel delta in pixels (trackpads).
    /// Normalizes by dividing by 100 to get approximate line equivalents.
    pub fn add_scroll_pixels(&mut self, pixels: f64) {
        self.scroll_lines += (pixels / 100.0) as f32;
    }

    /// Whole wheel steps accumulated so far. The fractional remainder is kept.
    pub fn consume_scroll_steps(&mut self) -> i32 {
        let steps = self.scroll_lines.trunc();
        self.scroll_lines -= steps;
        steps as i32
    }

    /// Clear the per-frame button edges.
    pub fn end_frame(&mut self) {
        self.left.end_frame();
        self.middle.end_frame();
        self.right.end_frame();
    }

    /// Reset all mouse state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_edges() {
        let mut mouse = MouseState::new();
        mouse.set_button(MouseButton::Left, true);
        assert!(mouse.left.pressed);
        assert!(mouse.left.held);

        mouse.end_frame();
        assert!(!mouse.left.pressed);
        assert!(mouse.left.held);

        mouse.set_button(MouseButton::Left, false);
        assert!(mouse.left.released);
        assert!(!mouse.left.held);
    }

    #[test]
    fn test_scroll_steps_keep_remainder() {
        let mut mouse = MouseState::new();
        mouse.add_scroll_lines(0.6);
        assert_eq!(mouse.consume_scroll_steps(), 0);
        mouse.add_scroll_lines(0.6);
        assert_eq!(mouse.consume_scroll_steps(), 1);
        mouse.add_scroll_lines(-2.0);
        assert_eq!(mouse.consume_scroll_steps(), -1);
    }

    #[test]
    fn test_pixel_scroll_normalized() {
        let mut mouse = MouseState::new();
        mouse.add_scroll_pixels(250.0);
        assert_eq!(mouse.consume_scroll_steps(), 2);
    }
}

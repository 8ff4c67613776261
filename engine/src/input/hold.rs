//! Key Hold Tracking
//!
//! Turns held keys into discrete triggers:
//!
//! - **Repeat**: one trigger on press, then after `delay` one trigger every `interval`
//! - **Long press**: one trigger once the key has been held for `duration`
//!
//! Time accumulates from the frame `dt` passed in; triggers are consumed per call.

use std::collections::HashMap;

use super::bindings::ToolAction;

#[derive(Debug, Clone, Copy, Default)]
struct HoldEntry {
    elapsed: f32,
    next_trigger: f32,
    long_press_fired: bool,
}

/// Per-action hold timers.
#[derive(Debug, Clone)]
pub struct HoldTracker {
    delay: f32,
    interval: f32,
    entries: HashMap<ToolAction, HoldEntry>,
}

impl HoldTracker {
    /// `delay` and `interval` in seconds. The interval is clamped to at least 1ms.
    pub fn new(delay: f32, interval: f32) -> Self {
        Self {
            delay: delay.max(0.0),
            interval: interval.max(0.001),
            entries: HashMap::new(),
        }
    }

    /// Number of repeat triggers for `action` this frame.
    pub fn repeat(&mut self, action: ToolAction, pressed: bool, held: bool, dt: f32) -> u32 {
        if pressed {
            self.entries.insert(
                action,
                HoldEntry {
                    elapsed: 0.0,
                    next_trigger: self.delay,
                    long_press_fired: false,
                },
            );
            return 1;
        }
        if !held {
            self.entries.remove(&action);
            return 0;
        }

        let interval = self.interval;
        let Some(entry) = self.entries.get_mut(&action) else {
            return 0;
        };
        entry.elapsed += dt;
        let mut count = 0;
        while entry.elapsed >= entry.next_trigger {
            count += 1;
            entry.next_trigger += interval;
        }
        count
    }

    /// True exactly once when `action` has been held for `duration` seconds.
    pub fn long_press(&mut self, action: ToolAction, held: bool, dt: f32, duration: f32) -> bool {
        if !held {
            self.entries.remove(&action);
            return false;
        }
        let entry = self.entries.entry(action).or_default();
        entry.elapsed += dt;
        if !entry.long_press_fired && entry.elapsed >= duration {
            entry.long_press_fired = true;
            return true;
        }
        false
    }

    /// Seconds `action` has been tracked as held.
    pub fn held_for(&self, action: ToolAction) -> f32 {
        self.entries.get(&action).map_or(0.0, |e| e.elapsed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

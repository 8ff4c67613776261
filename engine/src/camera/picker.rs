//! Pointer Picking
//!
//! The editing tools never do ray math themselves. Whatever owns the camera
//! answers three questions about the pointer through [`PointerPicker`].

use glam::IVec3;

/// Resolves the pointer against the world.
pub trait PointerPicker {
    /// Terrain cell under the pointer, if the pointer is over the map.
    fn terrain_point(&self) -> Option<IVec3>;

    /// Cell hit by the pointer ray on the horizontal plane at height `z`.
    fn plane_point(&self, z: i32) -> Option<IVec3>;

    /// True if the pointer ray passes through the inclusive box `min..=max`.
    fn hits_box(&self, min: IVec3, max: IVec3) -> bool;
}

/// Picker driven by a directly assigned cursor cell.
///
/// Used by headless sessions and tests: the cursor is treated as looking
/// straight down, so every plane hit keeps the cursor's x/y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptedPicker {
    pub cursor: Option<IVec3>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(cursor: IVec3) -> Self {
        Self {
            cursor: Some(cursor),
        }
    }

    pub fn move_to(&mut self, cursor: IVec3) {
        self.cursor = Some(cursor);
    }

    /// Pointer leaves the map.
    pub fn clear(&mut self) {
        self.cursor = None;
    }
}

impl PointerPicker for ScriptedPicker {
    fn terrain_point(&self) -> Option<IVec3> {
        self.cursor
    }

    fn plane_point(&self, z: i32) -> Option<IVec3> {
        self.cursor.map(|c| IVec3::new(c.x, c.y, z))
    }

    fn hits_box(&self, min: IVec3, max: IVec3) -> bool {
        self.cursor.is_some_and(|c| {
            c.x >= min.x && c.x <= max.x && c.y >= min.y && c.y <= max.y
        })
    }
}

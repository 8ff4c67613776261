//! World Module
//!
//! Grid orientation math and the world-side services the editing tools talk to.
//!
//! The tools never own terrain or objects. They go through three narrow traits:
//!
//! - [`TerrainService`] - solid/air voxel terrain queries and edits
//! - [`ObjectService`] - placed objects (buildings, plants, props)
//! - [`HistoryService`] - undo batching around multi-step edits
//!
//! [`MemoryWorld`] implements all three in memory for tests and headless sessions.

pub mod history;
pub mod memory;
pub mod orientation;

use glam::IVec3;

pub use history::{EditBatch, UndoStack, WorldEdit};
pub use memory::{MemoryWorld, ReplayReport};
pub use orientation::{
    FlipMode, Orientation, compose_object_facing, mirror_offset, rotate_offset, transform_offset,
};

// ============================================================================
// OBJECTS
// ============================================================================

/// Stable identity of a placed object inside the world.
pub type ObjectId = u64;

/// Snapshot of one object placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldObject {
    pub id: ObjectId,
    /// Prefab identifier (e.g. "Path", "Pine.Tree")
    pub prefab: String,
    /// Anchor cell of the object
    pub coordinates: IVec3,
    pub orientation: Orientation,
    pub flip: FlipMode,
    /// Growth progress in [0, 1], ignored for prefabs that do not grow
    pub growth: f32,
}

/// What a prefab type is allowed to do, resolved once per capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectCapabilities {
    /// The prefab may be placed mirrored
    pub flippable: bool,
    /// The prefab carries growth progress (plants)
    pub growable: bool,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Errors reported by world services during queries.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    /// The coordinate lies outside the map.
    OutOfBounds(IVec3),
    /// The backing store refused or failed a query.
    QueryFailed(String),
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::OutOfBounds(c) => {
                write!(f, "coordinate ({}, {}, {}) is outside the map", c.x, c.y, c.z)
            }
            WorldError::QueryFailed(msg) => write!(f, "world query failed: {msg}"),
        }
    }
}

impl std::error::Error for WorldError {}

// ============================================================================
// SERVICES
// ============================================================================

/// Voxel terrain access.
pub trait TerrainService {
    /// True if the cell is part of the map at all.
    fn contains(&self, coord: IVec3) -> bool;
    /// True if the cell is solid ground.
    fn is_solid(&self, coord: IVec3) -> bool;
    /// Make `height` cells solid starting at `coord` and going up.
    fn set_solid(&mut self, coord: IVec3, height: i32);
    /// Make `height` cells air starting at `coord` and going up.
    fn unset_solid(&mut self, coord: IVec3, height: i32);
    /// True if the cell may be removed (nothing depends on it).
    fn can_unset_solid(&self, coord: IVec3) -> bool;
}

/// Placed object access.
pub trait ObjectService {
    /// Objects occupying the top of the stack at `coord`.
    fn top_objects_at(&self, coord: IVec3) -> Result<Vec<WorldObject>, WorldError>;
    /// Every object occupying any level of the stack at `coord`.
    fn stacked_objects_at(&self, coord: IVec3) -> Result<Vec<WorldObject>, WorldError>;
    /// First object of the given prefab anchored or occupying `coord`.
    fn first_object_at(&self, prefab: &str, coord: IVec3) -> Option<WorldObject>;
    fn delete_object(&mut self, id: ObjectId);
    /// Place a new object. Returns false if the placement was rejected.
    fn place_object(
        &mut self,
        prefab: &str,
        coord: IVec3,
        orientation: Orientation,
        flip: FlipMode,
        growth: f32,
    ) -> bool;
    /// Cells occupied by the prefab relative to its anchor, unrotated.
    fn block_shape(&self, prefab: &str) -> Vec<IVec3>;
    fn capabilities(&self, prefab: &str) -> ObjectCapabilities;
}

/// Undo history grouping.
pub trait HistoryService {
    fn batch_start(&mut self);
    fn batch_stop(&mut self);
}

/// Everything a clone tool command needs from the world.
pub trait WorldAccess: TerrainService + ObjectService + HistoryService {}

impl<T: TerrainService + ObjectService + HistoryService + ?Sized> WorldAccess for T {}

//! Selection Buffer
//!
//! Captures a cuboid of terrain and placed objects and replays it under any
//! combination of quarter-turn rotation and mirroring.
//!
//! Everything is stored relative to the selection center as it was at capture
//! time. Rotation and flip are two fields on the buffer that are only applied
//! when the contents are read back, so rotating or flipping is O(1) no matter
//! how large the capture is.

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use glam::IVec3;
use log::{debug, error};

use crate::world::{
    FlipMode, ObjectCapabilities, ObjectId, ObjectService, Orientation, TerrainService,
    WorldError, compose_object_facing, transform_offset,
};

/// Growth value for prefabs that do not grow.
pub const GROWTH_NOT_APPLICABLE: f32 = -1.0;

// ============================================================================
// RECORDS
// ============================================================================

/// One captured object.
///
/// Inside a [`Selection`] the coordinates are relative to the capture center;
/// records yielded by [`Selection::objects`] carry absolute coordinates.
#[derive(Debug, Clone)]
pub struct PlacedObjectRecord {
    pub prefab: String,
    pub coordinates: IVec3,
    pub orientation: Orientation,
    pub flip: FlipMode,
    /// Whether the prefab may be mirrored at all
    pub flippable: bool,
    /// -1 = not applicable, otherwise progress in [0, 1]
    pub growth: f32,
}

impl PartialEq for PlacedObjectRecord {
    fn eq(&self, other: &Self) -> bool {
        self.prefab == other.prefab
            && self.coordinates == other.coordinates
            && self.orientation == other.orientation
            && self.flip == other.flip
            && self.flippable == other.flippable
            && self.growth.to_bits() == other.growth.to_bits()
    }
}

impl Eq for PlacedObjectRecord {}

impl Hash for PlacedObjectRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefab.hash(state);
        self.coordinates.hash(state);
        self.orientation.hash(state);
        self.flip.hash(state);
        self.flippable.hash(state);
        self.growth.to_bits().hash(state);
    }
}

/// What a scan should pick up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Record air cells too (pasting then carves out space)
    pub include_air: bool,
    /// Record every stacked object per cell instead of the top one
    pub include_stacked: bool,
}

/// Counts from a completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub cells_visited: usize,
    pub terrain: usize,
    pub objects: usize,
}

// ============================================================================
// SELECTION
// ============================================================================

/// Transform-independent capture of a cuboid region.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Relative offset -> solid at capture time
    terrain: HashMap<IVec3, bool>,
    /// Relative records in capture order
    objects: Vec<PlacedObjectRecord>,
    size: IVec3,
    center: IVec3,
    /// Lowest corner of the cuboid relative to the center
    corner_offset: IVec3,
    orientation: Orientation,
    flip: FlipMode,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            terrain: HashMap::new(),
            objects: Vec::new(),
            size: IVec3::ONE,
            center: IVec3::ZERO,
            corner_offset: IVec3::ZERO,
            orientation: Orientation::Cw0,
            flip: FlipMode::UNFLIPPED,
        }
    }

    /// Drop all captured data and the buffer-level transform.
    pub fn clear(&mut self) {
        self.terrain.clear();
        self.objects.clear();
        self.orientation = Orientation::Cw0;
        self.flip = FlipMode::UNFLIPPED;
    }

    /// Recompute size and center from two opposite corners. Returns the center.
    ///
    /// Stored offsets are untouched; they follow the new center.
    pub fn update_position(&mut self, a: IVec3, b: IVec3) -> IVec3 {
        self.size = (a - b).abs() + IVec3::ONE;
        self.center = IVec3::new(
            (a.x + b.x).div_euclid(2),
            (a.y + b.y).div_euclid(2),
            (a.z + b.z).div_euclid(2),
        );
        self.corner_offset = a.min(b) - self.center;
        self.center
    }

    /// Capture the inclusive cuboid between `a` and `b`.
    ///
    /// Clears the buffer first. If a world query fails the scan stops there:
    /// whatever was captured so far is kept, the buffer state is logged and
    /// the error is returned.
    pub fn scan<W>(
        &mut self,
        world: &W,
        a: IVec3,
        b: IVec3,
        options: ScanOptions,
    ) -> Result<ScanSummary, WorldError>
    where
        W: TerrainService + ObjectService + ?Sized,
    {
        self.clear();
        self.update_position(a, b);

        let mut summary = ScanSummary::default();
        match self.scan_cells(world, a.min(b), a.max(b), options, &mut summary) {
            Ok(()) => {
                summary.terrain = self.terrain.len();
                summary.objects = self.objects.len();
                debug!(
                    "[Selection] Scanned {} cells: {} terrain, {} objects",
                    summary.cells_visited, summary.terrain, summary.objects
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "[Selection] Scan aborted after {} cells: {err} (size {}, center {}, {} terrain, {} objects kept)",
                    summary.cells_visited,
                    self.size,
                    self.center,
                    self.terrain.len(),
                    self.objects.len()
                );
                Err(err)
            }
        }
    }

    fn scan_cells<W>(
        &mut self,
        world: &W,
        min: IVec3,
        max: IVec3,
        options: ScanOptions,
        summary: &mut ScanSummary,
    ) -> Result<(), WorldError>
    where
        W: TerrainService + ObjectService + ?Sized,
    {
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut capabilities: HashMap<String, ObjectCapabilities> = HashMap::new();

        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let cell = IVec3::new(x, y, z);
                    summary.cells_visited += 1;
                    if !world.contains(cell) {
                        continue;
                    }

                    let solid = world.is_solid(cell);
                    if solid || options.include_air {
                        self.terrain.insert(cell - self.center, solid);
                    }

                    let found = if options.include_stacked {
                        world.stacked_objects_at(cell)?
                    } else {
                        world.top_objects_at(cell)?
                    };

                    for obj in found {
                        if !seen.insert(obj.id) {
                            continue;
                        }
                        let caps = *capabilities
                            .entry(obj.prefab.clone())
                            .or_insert_with(|| world.capabilities(&obj.prefab));
                        let growth = if caps.growable {
                            obj.growth.clamp(0.0, 1.0)
                        } else {
                            GROWTH_NOT_APPLICABLE
                        };
                        self.objects.push(PlacedObjectRecord {
                            prefab: obj.prefab,
                            coordinates: obj.coordinates - self.center,
                            orientation: obj.orientation,
                            flip: obj.flip,
                            flippable: caps.flippable,
                            growth,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Turn the buffer one quarter step.
    pub fn rotate(&mut self, clockwise: bool) {
        self.orientation = if clockwise {
            self.orientation.next_clockwise()
        } else {
            self.orientation.next_counter_clockwise()
        };
    }

    /// Toggle the buffer mirror.
    pub fn flip(&mut self) {
        self.flip = self.flip.toggled();
    }

    /// 1 for odd x-size (mirror around the centre cell), 2 for even.
    pub fn flip_width(&self) -> i32 {
        if self.size.x % 2 == 0 { 2 } else { 1 }
    }

    /// Map a capture-space point into the currently transformed space,
    /// pivoting around the center.
    pub fn transform(&self, coordinates: IVec3) -> IVec3 {
        self.center + self.transform_relative(coordinates - self.center)
    }

    fn transform_relative(&self, offset: IVec3) -> IVec3 {
        transform_offset(offset, self.flip, self.orientation, self.flip_width())
    }

    /// Transformed min/max corners of the selected cuboid.
    pub fn bounds(&self) -> (IVec3, IVec3) {
        let low = self.center + self.corner_offset;
        let high = low + self.size - IVec3::ONE;
        let a = self.transform(low);
        let b = self.transform(high);
        (a.min(b), a.max(b))
    }

    /// Captured terrain projected through the current transform.
    pub fn terrain(&self) -> impl Iterator<Item = (IVec3, bool)> + '_ {
        self.terrain
            .iter()
            .map(move |(offset, solid)| (self.center + self.transform_relative(*offset), *solid))
    }

    /// Captured objects projected through the current transform.
    pub fn objects(&self) -> impl Iterator<Item = PlacedObjectRecord> + '_ {
        self.objects.iter().map(move |record| {
            let (orientation, flip) = compose_object_facing(
                record.orientation,
                record.flip,
                record.flippable,
                self.orientation,
                self.flip,
            );
            PlacedObjectRecord {
                prefab: record.prefab.clone(),
                coordinates: self.center + self.transform_relative(record.coordinates),
                orientation,
                flip,
                flippable: record.flippable,
                growth: record.growth,
            }
        })
    }

    /// Captured terrain at its capture position, ignoring the transform.
    pub fn captured_terrain(&self) -> impl Iterator<Item = (IVec3, bool)> + '_ {
        self.terrain
            .iter()
            .map(move |(offset, solid)| (self.center + *offset, *solid))
    }

    /// Captured objects at their capture position and facing.
    pub fn captured_objects(&self) -> impl Iterator<Item = PlacedObjectRecord> + '_ {
        self.objects.iter().map(move |record| PlacedObjectRecord {
            coordinates: self.center + record.coordinates,
            ..record.clone()
        })
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn terrain_count(&self) -> usize {
        self.terrain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.terrain.is_empty()
    }

    pub fn size(&self) -> IVec3 {
        self.size
    }

    pub fn center(&self) -> IVec3 {
        self.center
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn flip_mode(&self) -> FlipMode {
        self.flip
    }

    /// Insert a relative terrain entry directly.
    #[cfg(test)]
    pub(crate) fn insert_terrain(&mut self, offset: IVec3, solid: bool) {
        self.terrain.insert(offset, solid);
    }

    /// Insert a relative object record directly.
    #[cfg(test)]
    pub(crate) fn insert_object(&mut self, record: PlacedObjectRecord) {
        self.objects.push(record);
    }
}

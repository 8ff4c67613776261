//! Clone Tool Commands
//!
//! Copy, cut and paste. Cut and paste each run inside exactly one undo batch.

use glam::IVec3;
use log::{debug, info, warn};

use super::selection::PlacedObjectRecord;
use super::tool::{ClonePhase, CloneTool, ToolEvent};
use crate::world::{ObjectService, TerrainService, WorldAccess};

/// What a cut or paste changed in the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Solid cells written
    pub terrain_set: usize,
    /// Air cells written
    pub terrain_cleared: usize,
    pub objects_removed: usize,
    pub objects_placed: usize,
    /// Placements the world rejected
    pub objects_failed: usize,
}

impl ApplyReport {
    pub fn changed_anything(&self) -> bool {
        self.terrain_set + self.terrain_cleared + self.objects_removed + self.objects_placed > 0
    }
}

impl CloneTool {
    /// Capture the current box into the selection buffer.
    ///
    /// Resets the buffer rotation and flip. A failed world query leaves the
    /// partial capture in place and is only logged.
    pub fn copy<W>(&mut self, world: &W) -> Vec<ToolEvent>
    where
        W: TerrainService + ObjectService + ?Sized,
    {
        let mut events = Vec::new();
        if self.phase() != ClonePhase::MoveApply {
            debug!("[Clone Tool] Copy ignored in {:?}", self.phase());
            return events;
        }

        let (a, b) = (self.point(0), self.point(2));
        let options = self.scan_options();
        match self.selection_mut().scan(world, a, b, options) {
            Ok(summary) => info!(
                "[Clone Tool] Copied {} terrain cells and {} objects",
                summary.terrain, summary.objects
            ),
            Err(err) => warn!("[Clone Tool] Copy incomplete, keeping partial capture: {err}"),
        }

        events.push(ToolEvent::SelectionChanged {
            objects: self.object_count(),
            terrain: self.terrain_count(),
        });
        self.refresh_bounds(&mut events);
        events
    }

    /// Copy, then remove the captured objects and solid cells from the world.
    pub fn cut<W>(&mut self, world: &mut W) -> Vec<ToolEvent>
    where
        W: WorldAccess + ?Sized,
    {
        if self.phase() != ClonePhase::MoveApply {
            debug!("[Clone Tool] Cut ignored in {:?}", self.phase());
            return Vec::new();
        }
        let mut events = self.copy(&*world);

        let objects: Vec<PlacedObjectRecord> = self.selection().captured_objects().collect();
        let mut cells: Vec<IVec3> = self
            .selection()
            .captured_terrain()
            .filter(|(_, solid)| *solid)
            .map(|(cell, _)| cell)
            .collect();
        // Top down, so a cell is never blocked by the one above it
        cells.sort_by_key(|cell| std::cmp::Reverse(cell.z));

        let mut report = ApplyReport::default();
        self.begin_batch(world);
        for record in &objects {
            match world.first_object_at(&record.prefab, record.coordinates) {
                Some(obj) => {
                    world.delete_object(obj.id);
                    report.objects_removed += 1;
                }
                None => debug!(
                    "[Clone Tool] {} at {} already gone",
                    record.prefab, record.coordinates
                ),
            }
        }
        for cell in cells {
            if world.can_unset_solid(cell) {
                world.unset_solid(cell, 1);
                report.terrain_cleared += 1;
            }
        }
        self.end_batch(world);

        info!(
            "[Clone Tool] Cut {} objects and {} terrain cells",
            report.objects_removed, report.terrain_cleared
        );
        events.push(ToolEvent::Cut(report));
        events
    }

    /// Apply the transformed selection at the current box.
    ///
    /// Terrain goes first; objects follow in ascending z so that anything
    /// resting on another captured object is placed after its support.
    pub fn paste<W>(&mut self, world: &mut W) -> Vec<ToolEvent>
    where
        W: WorldAccess + ?Sized,
    {
        if self.phase() != ClonePhase::MoveApply {
            debug!("[Clone Tool] Paste ignored in {:?}", self.phase());
            return Vec::new();
        }

        let terrain: Vec<(IVec3, bool)> = self.selection().terrain().collect();
        let mut objects: Vec<PlacedObjectRecord> = self.selection().objects().collect();
        objects.sort_by_key(|record| record.coordinates.z);

        let mut report = ApplyReport::default();
        self.begin_batch(world);
        for (cell, solid) in terrain {
            if solid {
                world.set_solid(cell, 1);
                report.terrain_set += 1;
                continue;
            }
            let occupants = match world.stacked_objects_at(cell) {
                Ok(occupants) => occupants,
                Err(err) => {
                    warn!("[Clone Tool] Could not clear objects at {cell}: {err}");
                    Vec::new()
                }
            };
            for obj in occupants {
                world.delete_object(obj.id);
                report.objects_removed += 1;
            }
            world.unset_solid(cell, 1);
            report.terrain_cleared += 1;
        }
        for record in &objects {
            if world.place_object(
                &record.prefab,
                record.coordinates,
                record.orientation,
                record.flip,
                record.growth,
            ) {
                report.objects_placed += 1;
            } else {
                warn!(
                    "[Clone Tool] Could not place {} at {}",
                    record.prefab, record.coordinates
                );
                report.objects_failed += 1;
            }
        }
        self.end_batch(world);

        info!(
            "[Clone Tool] Pasted {} objects ({} failed), {} terrain cells",
            report.objects_placed,
            report.objects_failed,
            report.terrain_set + report.terrain_cleared
        );
        vec![ToolEvent::Pasted(report)]
    }
}

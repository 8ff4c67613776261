//! In-Memory World
//!
//! A small voxel world backed by hash maps. Implements every world service so
//! the editing tools can run headless (tests, scripted sessions).
//!
//! Edits are journaled into an [`UndoStack`]; edits made between
//! `batch_start` and `batch_stop` land in one batch, edits outside a batch
//! become single-edit batches.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::IVec3;
use log::{debug, warn};

use super::history::{EditBatch, UndoStack, WorldEdit};
use super::orientation::{FlipMode, Orientation, rotate_offset};
use super::{
    HistoryService, ObjectCapabilities, ObjectId, ObjectService, TerrainService, WorldError,
    WorldObject,
};

/// Registered prefab: footprint and capabilities.
#[derive(Debug, Clone)]
pub struct PrefabSpec {
    /// Occupied cells relative to the anchor, unrotated. Never empty.
    pub shape: Vec<IVec3>,
    pub capabilities: ObjectCapabilities,
}

impl PrefabSpec {
    pub fn single(capabilities: ObjectCapabilities) -> Self {
        Self {
            shape: vec![IVec3::ZERO],
            capabilities,
        }
    }
}

/// Outcome of an undo or redo replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Edits applied successfully
    pub applied: usize,
    /// Deletions skipped because the object was already gone
    pub skipped: usize,
    /// Placements rejected by the world
    pub failed: usize,
}

/// Hash-map backed world implementing terrain, object and history services.
#[derive(Debug)]
pub struct MemoryWorld {
    /// Inclusive map bounds
    min: IVec3,
    max: IVec3,
    solid: HashSet<IVec3>,
    objects: BTreeMap<ObjectId, WorldObject>,
    prefabs: HashMap<String, PrefabSpec>,
    next_id: ObjectId,
    history: UndoStack,
    open_batch: Option<EditBatch>,
    replaying: bool,
    /// Every successful placement in call order
    placement_log: Vec<(String, IVec3)>,
    /// Cells whose object queries fail (fault injection)
    faulty_cells: HashSet<IVec3>,
}

impl MemoryWorld {
    /// Create an empty world spanning the inclusive box `min..=max`.
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            solid: HashSet::new(),
            objects: BTreeMap::new(),
            prefabs: HashMap::new(),
            next_id: 1,
            history: UndoStack::new(),
            open_batch: None,
            replaying: false,
            placement_log: Vec::new(),
            faulty_cells: HashSet::new(),
        }
    }

    /// Register (or replace) a prefab type.
    pub fn register_prefab(&mut self, prefab: &str, spec: PrefabSpec) {
        self.prefabs.insert(prefab.to_string(), spec);
    }

    /// Fill every column in `min.xy..=max.xy` with solid ground from the map
    /// floor up to and including `top_z`. Not journaled.
    pub fn fill_ground(&mut self, top_z: i32) {
        for x in self.min.x..=self.max.x {
            for y in self.min.y..=self.max.y {
                for z in self.min.z..=top_z.min(self.max.z) {
                    self.solid.insert(IVec3::new(x, y, z));
                }
            }
        }
    }

    /// Place an object without journaling. Returns its id, or `None` if rejected.
    pub fn spawn(
        &mut self,
        prefab: &str,
        coord: IVec3,
        orientation: Orientation,
        flip: FlipMode,
        growth: f32,
    ) -> Option<ObjectId> {
        self.insert_object(prefab, coord, orientation, flip, growth)
    }

    /// Make object queries at `coord` fail.
    pub fn inject_query_fault(&mut self, coord: IVec3) {
        self.faulty_cells.insert(coord);
    }

    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn solid_count(&self) -> usize {
        self.solid.len()
    }

    /// Successful placements in call order.
    pub fn placement_log(&self) -> &[(String, IVec3)] {
        &self.placement_log
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Cells occupied by an object with the given anchor and orientation.
    pub fn occupied_cells(&self, prefab: &str, coord: IVec3, orientation: Orientation) -> Vec<IVec3> {
        match self.prefabs.get(prefab) {
            Some(spec) => spec
                .shape
                .iter()
                .map(|cell| coord + rotate_offset(*cell, orientation))
                .collect(),
            None => vec![coord],
        }
    }

    /// Revert the most recent batch.
    pub fn undo(&mut self) -> Option<ReplayReport> {
        let batch = self.history.undo()?.inverse();
        debug!("[World] Undo batch of {} edits", batch.len());
        Some(self.replay(&batch))
    }

    /// Re-apply the most recently undone batch.
    pub fn redo(&mut self) -> Option<ReplayReport> {
        let batch = self.history.redo()?.clone();
        debug!("[World] Redo batch of {} edits", batch.len());
        Some(self.replay(&batch))
    }

    fn replay(&mut self, batch: &EditBatch) -> ReplayReport {
        let mut report = ReplayReport::default();
        self.replaying = true;
        for edit in &batch.edits {
            match edit {
                WorldEdit::SetSolid { coord } => {
                    self.solid.insert(*coord);
                    report.applied += 1;
                }
                WorldEdit::UnsetSolid { coord } => {
                    self.solid.remove(coord);
                    report.applied += 1;
                }
                WorldEdit::PlaceObject {
                    prefab,
                    coord,
                    orientation,
                    flip,
                    growth,
                } => {
                    if self
                        .insert_object(prefab, *coord, *orientation, *flip, *growth)
                        .is_some()
                    {
                        report.applied += 1;
                    } else {
                        warn!("[World] Replay could not place {prefab} at {coord}");
                        report.failed += 1;
                    }
                }
                WorldEdit::DeleteObject { prefab, coord, .. } => {
                    let id = self
                        .objects
                        .values()
                        .find(|o| &o.prefab == prefab && o.coordinates == *coord)
                        .map(|o| o.id);
                    match id {
                        Some(id) => {
                            self.objects.remove(&id);
                            report.applied += 1;
                        }
                        None => {
                            debug!("[World] {prefab} at {coord} already gone, skipping");
                            report.skipped += 1;
                        }
                    }
                }
            }
        }
        self.replaying = false;
        report
    }

    fn record(&mut self, edit: WorldEdit) {
        if self.replaying {
            return;
        }
        match self.open_batch.as_mut() {
            Some(batch) => batch.edits.push(edit),
            None => self.history.push(EditBatch::new(vec![edit])),
        }
    }

    fn in_bounds(&self, coord: IVec3) -> bool {
        coord.cmpge(self.min).all() && coord.cmple(self.max).all()
    }

    fn occupant_ids(&self, coord: IVec3) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|o| {
                self.occupied_cells(&o.prefab, o.coordinates, o.orientation)
                    .contains(&coord)
            })
            .map(|o| o.id)
            .collect()
    }

    fn insert_object(
        &mut self,
        prefab: &str,
        coord: IVec3,
        orientation: Orientation,
        flip: FlipMode,
        growth: f32,
    ) -> Option<ObjectId> {
        let spec = self.prefabs.get(prefab)?;
        let flip = if spec.capabilities.flippable {
            flip
        } else {
            FlipMode::UNFLIPPED
        };
        let cells = self.occupied_cells(prefab, coord, orientation);
        let blocked = cells.iter().any(|cell| {
            !self.in_bounds(*cell) || self.solid.contains(cell) || !self.occupant_ids(*cell).is_empty()
        });
        if blocked {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(
            id,
            WorldObject {
                id,
                prefab: prefab.to_string(),
                coordinates: coord,
                orientation,
                flip,
                growth,
            },
        );
        Some(id)
    }

    fn query(&self, coord: IVec3) -> Result<Vec<WorldObject>, WorldError> {
        if self.faulty_cells.contains(&coord) {
            return Err(WorldError::QueryFailed(format!("injected fault at {coord}")));
        }
        if !self.in_bounds(coord) {
            return Err(WorldError::OutOfBounds(coord));
        }
        Ok(self
            .occupant_ids(coord)
            .into_iter()
            .filter_map(|id| self.objects.get(&id).cloned())
            .collect())
    }
}

impl TerrainService for MemoryWorld {
    fn contains(&self, coord: IVec3) -> bool {
        self.in_bounds(coord)
    }

    fn is_solid(&self, coord: IVec3) -> bool {
        self.solid.contains(&coord)
    }

    fn set_solid(&mut self, coord: IVec3, height: i32) {
        for h in 0..height {
            let cell = coord + IVec3::Z * h;
            if self.in_bounds(cell) && self.solid.insert(cell) {
                self.record(WorldEdit::SetSolid { coord: cell });
            }
        }
    }

    fn unset_solid(&mut self, coord: IVec3, height: i32) {
        for h in 0..height {
            let cell = coord + IVec3::Z * h;
            if self.solid.remove(&cell) {
                self.record(WorldEdit::UnsetSolid { coord: cell });
            }
        }
    }

    fn can_unset_solid(&self, coord: IVec3) -> bool {
        self.solid.contains(&coord) && self.occupant_ids(coord + IVec3::Z).is_empty()
    }
}

impl ObjectService for MemoryWorld {
    fn top_objects_at(&self, coord: IVec3) -> Result<Vec<WorldObject>, WorldError> {
        let stacked = self.query(coord)?;
        let Some(top_z) = stacked.iter().map(|o| o.coordinates.z).max() else {
            return Ok(stacked);
        };
        Ok(stacked
            .into_iter()
            .filter(|o| o.coordinates.z == top_z)
            .collect())
    }

    fn stacked_objects_at(&self, coord: IVec3) -> Result<Vec<WorldObject>, WorldError> {
        self.query(coord)
    }

    fn first_object_at(&self, prefab: &str, coord: IVec3) -> Option<WorldObject> {
        self.occupant_ids(coord)
            .into_iter()
            .filter_map(|id| self.objects.get(&id))
            .find(|o| o.prefab == prefab)
            .cloned()
    }

    fn delete_object(&mut self, id: ObjectId) {
        if let Some(obj) = self.objects.remove(&id) {
            self.record(WorldEdit::DeleteObject {
                prefab: obj.prefab,
                coord: obj.coordinates,
                orientation: obj.orientation,
                flip: obj.flip,
                growth: obj.growth,
            });
        }
    }

    fn place_object(
        &mut self,
        prefab: &str,
        coord: IVec3,
        orientation: Orientation,
        flip: FlipMode,
        growth: f32,
    ) -> bool {
        let Some(id) = self.insert_object(prefab, coord, orientation, flip, growth) else {
            return false;
        };
        let flip = self.objects.get(&id).map_or(flip, |o| o.flip);
        self.placement_log.push((prefab.to_string(), coord));
        self.record(WorldEdit::PlaceObject {
            prefab: prefab.to_string(),
            coord,
            orientation,
            flip,
            growth,
        });
        true
    }

    fn block_shape(&self, prefab: &str) -> Vec<IVec3> {
        self.prefabs
            .get(prefab)
            .map(|spec| spec.shape.clone())
            .unwrap_or_else(|| vec![IVec3::ZERO])
    }

    fn capabilities(&self, prefab: &str) -> ObjectCapabilities {
        self.prefabs
            .get(prefab)
            .map(|spec| spec.capabilities)
            .unwrap_or_default()
    }
}

impl HistoryService for MemoryWorld {
    fn batch_start(&mut self) {
        if let Some(stale) = self.open_batch.take() {
            warn!("[World] batch_start with a batch already open, closing it");
            self.history.push(stale);
        }
        self.open_batch = Some(EditBatch::default());
    }

    fn batch_stop(&mut self) {
        if let Some(batch) = self.open_batch.take() {
            debug!("[World] Recorded batch of {} edits", batch.len());
            self.history.push(batch);
        }
    }
}

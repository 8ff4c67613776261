//! Clone Tool
//!
//! Interaction state machine for selecting, moving and re-applying a region.
//!
//! ```text
//!   Start ──press──▶ Base ──release──▶ Height ──press──▶ MoveApply
//!     ▲                │                  │                  │
//!     └──── cancel / exit (any earlier phase) ◀──────────────┘ (long-press reset)
//! ```
//!
//! - **Start**: nothing picked; the hovered cell is previewed
//! - **Base**: first corner picked; the footprint follows the pointer on the
//!   horizontal plane through the first corner
//! - **Height**: footprint fixed; wheel or height keys extrude the box
//! - **MoveApply**: box is live; drag, nudge, rotate, flip, copy, cut, paste
//!
//! Each call to [`CloneTool::update`] is one input tick and returns the
//! events it produced.

use glam::IVec3;
use log::{debug, info};

use super::commands::ApplyReport;
use super::selection::{ScanOptions, Selection};
use crate::camera::PointerPicker;
use crate::game::config::CloneToolConfig;
use crate::input::{HoldTracker, KeyBindings, ToolAction, ToolInput};
use crate::world::{HistoryService, Orientation, WorldAccess, rotate_offset};

// ============================================================================
// TYPES
// ============================================================================

/// Interaction phase, ordered by progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClonePhase {
    /// No corner picked
    Start,
    /// First corner picked
    Base,
    /// Footprint fixed, adjusting height
    Height,
    /// Selection live
    MoveApply,
}

impl ClonePhase {
    /// Number of recorded points this phase holds.
    pub fn point_count(self) -> usize {
        match self {
            ClonePhase::Start => 0,
            ClonePhase::Base => 1,
            ClonePhase::Height => 2,
            ClonePhase::MoveApply => 3,
        }
    }
}

/// Something observable that happened during a tick or command.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    /// Phase transition (never fired with `from == to`)
    PhaseChanged { from: ClonePhase, to: ClonePhase },
    /// The preview box moved or changed shape
    BoundsChanged { min: IVec3, max: IVec3 },
    /// The selection contents were recaptured
    SelectionChanged { objects: usize, terrain: usize },
    /// Contents were captured and removed from the world
    Cut(ApplyReport),
    /// Contents were applied at the current box
    Pasted(ApplyReport),
}

/// Unit moves for the nudge actions, before camera rotation.
const NUDGES: [(ToolAction, IVec3); 6] = [
    (ToolAction::MoveForward, IVec3::Y),
    (ToolAction::MoveBack, IVec3::NEG_Y),
    (ToolAction::MoveLeft, IVec3::NEG_X),
    (ToolAction::MoveRight, IVec3::X),
    (ToolAction::MoveUp, IVec3::Z),
    (ToolAction::MoveDown, IVec3::NEG_Z),
];

// ============================================================================
// CLONE TOOL
// ============================================================================

/// The clone/paste tool.
#[derive(Debug)]
pub struct CloneTool {
    config: CloneToolConfig,
    bindings: KeyBindings,
    hold: HoldTracker,
    phase: ClonePhase,
    /// Corners collected so far (0..=3), in capture space
    points: Vec<IVec3>,
    /// Extrusion while in Height
    height_steps: i32,
    /// Pointer currently over the map
    hover_valid: bool,
    selection: Selection,
    bounds: Option<(IVec3, IVec3)>,
    /// Plane point the current drag is anchored to
    drag_anchor: Option<IVec3>,
    batch_open: bool,
}

impl Default for CloneTool {
    fn default() -> Self {
        Self::new(CloneToolConfig::default())
    }
}

impl CloneTool {
    pub fn new(config: CloneToolConfig) -> Self {
        let bindings = config.key_bindings();
        let hold = HoldTracker::new(config.repeat_delay_secs, config.repeat_interval_secs);
        Self {
            config,
            bindings,
            hold,
            phase: ClonePhase::Start,
            points: Vec::with_capacity(3),
            height_steps: 0,
            hover_valid: false,
            selection: Selection::new(),
            bounds: None,
            drag_anchor: None,
            batch_open: false,
        }
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    pub fn phase(&self) -> ClonePhase {
        self.phase
    }

    pub fn points(&self) -> &[IVec3] {
        &self.points
    }

    pub fn height_steps(&self) -> i32 {
        self.height_steps
    }

    /// Current preview box (inclusive min/max), if any.
    pub fn bounds(&self) -> Option<(IVec3, IVec3)> {
        self.bounds
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn object_count(&self) -> usize {
        self.selection.object_count()
    }

    pub fn terrain_count(&self) -> usize {
        self.selection.terrain_count()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn config(&self) -> &CloneToolConfig {
        &self.config
    }

    pub fn include_air(&self) -> bool {
        self.config.include_air
    }

    pub fn set_include_air(&mut self, include: bool) {
        self.config.include_air = include;
    }

    pub fn include_stacked(&self) -> bool {
        self.config.include_stacked
    }

    pub fn set_include_stacked(&mut self, include: bool) {
        self.config.include_stacked = include;
    }

    pub(super) fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_air: self.config.include_air,
            include_stacked: self.config.include_stacked,
        }
    }

    /// Preview colour for the current phase.
    pub fn box_color(&self) -> [f32; 4] {
        let colors = &self.config.colors;
        match self.phase {
            ClonePhase::Start | ClonePhase::Base if !self.hover_valid => colors.invalid,
            ClonePhase::Start | ClonePhase::Base => colors.base,
            ClonePhase::Height => colors.height,
            ClonePhase::MoveApply => colors.move_apply,
        }
    }

    /// Recorded point `index`. Asking for a point the phase does not hold is a
    /// broken invariant, not a runtime condition.
    pub(super) fn point(&self, index: usize) -> IVec3 {
        assert!(
            index < self.points.len(),
            "clone tool in {:?} holds {} points, point {} requested",
            self.phase,
            self.points.len(),
            index
        );
        self.points[index]
    }

    pub(super) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Process one input tick.
    pub fn update<W>(
        &mut self,
        input: &ToolInput,
        picker: &dyn PointerPicker,
        world: &mut W,
    ) -> Vec<ToolEvent>
    where
        W: WorldAccess + ?Sized,
    {
        let mut events = Vec::new();

        if input.cancel_pressed && self.phase < ClonePhase::MoveApply && !self.points.is_empty() {
            debug!("[Clone Tool] Cancelled in {:?}", self.phase);
            events.extend(self.reset());
            return events;
        }

        match self.phase {
            ClonePhase::Start => self.update_start(input, picker, &mut events),
            ClonePhase::Base => self.update_base(input, picker, &mut events),
            ClonePhase::Height => self.update_height(input, &mut events),
            ClonePhase::MoveApply => self.update_move_apply(input, picker, world, &mut events),
        }
        events
    }

    fn update_start(
        &mut self,
        input: &ToolInput,
        picker: &dyn PointerPicker,
        events: &mut Vec<ToolEvent>,
    ) {
        let hovered = picker.terrain_point();
        self.hover_valid = hovered.is_some();
        let Some(point) = hovered else {
            return;
        };
        self.set_bounds(point, point, events);

        if input.primary_pressed {
            self.points.push(point);
            debug!("[Clone Tool] First corner at {point}");
            self.set_phase(ClonePhase::Base, events);
        }
    }

    fn update_base(
        &mut self,
        input: &ToolInput,
        picker: &dyn PointerPicker,
        events: &mut Vec<ToolEvent>,
    ) {
        let first = self.point(0);
        let hovered = picker.plane_point(first.z);
        self.hover_valid = hovered.is_some();
        let Some(point) = hovered else {
            return;
        };
        self.set_bounds(first, point, events);

        if input.primary_released {
            self.points.push(point);
            self.height_steps = 0;
            debug!("[Clone Tool] Second corner at {point}");
            self.set_phase(ClonePhase::Height, events);
        }
    }

    fn update_height(&mut self, input: &ToolInput, events: &mut Vec<ToolEvent>) {
        let up = self.repeat_count(input, ToolAction::HeightUp) as i32;
        let down = self.repeat_count(input, ToolAction::HeightDown) as i32;
        let steps = if input.wheel_steps != 0 {
            input.wheel_steps
        } else {
            up - down
        };
        self.height_steps += steps;

        let first = self.point(0);
        let top = self.point(1) + IVec3::Z * self.height_steps;
        self.set_bounds(first, top, events);

        if input.primary_pressed {
            self.points.push(top);
            info!(
                "[Clone Tool] Selection box {} .. {} ({} levels)",
                first,
                top,
                self.height_steps.abs() + 1
            );
            self.set_phase(ClonePhase::MoveApply, events);
            self.selection.update_position(first, top);
            self.refresh_bounds(events);
        }
    }

    fn update_move_apply<W>(
        &mut self,
        input: &ToolInput,
        picker: &dyn PointerPicker,
        world: &mut W,
        events: &mut Vec<ToolEvent>,
    ) where
        W: WorldAccess + ?Sized,
    {
        let reset_held = self.bindings.is_action_in(ToolAction::Reset, &input.keys_held);
        if self
            .hold
            .long_press(ToolAction::Reset, reset_held, input.dt, self.config.reset_hold_secs)
        {
            info!("[Clone Tool] Selection dropped");
            events.extend(self.reset());
            return;
        }

        self.update_drag(input, picker, events);
        self.update_nudges(input, events);

        let pressed = |action| self.bindings.is_action_in(action, &input.keys_pressed);
        let rotate_cw = pressed(ToolAction::RotateClockwise);
        let rotate_ccw = pressed(ToolAction::RotateCounterClockwise);
        let flip = pressed(ToolAction::Flip);
        let copy = pressed(ToolAction::Copy);
        let cut = pressed(ToolAction::Cut);
        let paste = pressed(ToolAction::Paste);

        if rotate_cw {
            events.extend(self.rotate(true));
        }
        if rotate_ccw {
            events.extend(self.rotate(false));
        }
        if flip {
            events.extend(self.flip());
        }
        if cut {
            events.extend(self.cut(world));
        } else if copy {
            events.extend(self.copy(world));
        }
        if paste {
            events.extend(self.paste(world));
        }
    }

    fn update_drag(
        &mut self,
        input: &ToolInput,
        picker: &dyn PointerPicker,
        events: &mut Vec<ToolEvent>,
    ) {
        if input.primary_pressed {
            self.drag_anchor = None;
            if let Some((min, max)) = self.bounds {
                if picker.hits_box(min, max) {
                    self.drag_anchor = picker.plane_point(min.z);
                }
            }
        }

        if !input.primary_held {
            self.drag_anchor = None;
            return;
        }
        let Some(anchor) = self.drag_anchor else {
            return;
        };

        let mut offset = IVec3::Z * input.wheel_steps;
        if let Some(current) = picker.plane_point(anchor.z) {
            offset.x = current.x - anchor.x;
            offset.y = current.y - anchor.y;
        }
        if offset != IVec3::ZERO {
            self.drag_anchor = Some(anchor + IVec3::new(offset.x, offset.y, 0));
            self.move_points(offset, events);
        }
    }

    fn update_nudges(&mut self, input: &ToolInput, events: &mut Vec<ToolEvent>) {
        let facing = Orientation::from_camera_angle(input.camera_angle);
        let mut offset = IVec3::ZERO;
        for (action, direction) in NUDGES {
            let count = self.repeat_count(input, action) as i32;
            offset += rotate_offset(direction, facing) * count;
        }
        if offset != IVec3::ZERO {
            self.move_points(offset, events);
        }
    }

    fn repeat_count(&mut self, input: &ToolInput, action: ToolAction) -> u32 {
        let pressed = self.bindings.is_action_in(action, &input.keys_pressed);
        if !action.repeats_while_held() {
            return u32::from(pressed);
        }
        let held = self.bindings.is_action_in(action, &input.keys_held);
        self.hold.repeat(action, pressed, held, input.dt)
    }

    // ------------------------------------------------------------------------
    // Box manipulation
    // ------------------------------------------------------------------------

    /// Translate all three corners and recenter the selection.
    fn move_points(&mut self, offset: IVec3, events: &mut Vec<ToolEvent>) {
        for point in &mut self.points {
            *point += offset;
        }
        let (first, third) = (self.point(0), self.point(2));
        self.selection.update_position(first, third);
        self.refresh_bounds(events);
    }

    /// Turn the selection one quarter step and re-derive the box.
    pub fn rotate(&mut self, clockwise: bool) -> Vec<ToolEvent> {
        let mut events = Vec::new();
        if self.phase != ClonePhase::MoveApply {
            return events;
        }
        self.selection.rotate(clockwise);
        debug!(
            "[Clone Tool] Rotation: {}°",
            self.selection.orientation().degrees()
        );
        self.refresh_bounds(&mut events);
        events
    }

    /// Mirror the selection and re-derive the box.
    pub fn flip(&mut self) -> Vec<ToolEvent> {
        let mut events = Vec::new();
        if self.phase != ClonePhase::MoveApply {
            return events;
        }
        self.selection.flip();
        debug!(
            "[Clone Tool] Flip: {}",
            self.selection.flip_mode().is_flipped()
        );
        self.refresh_bounds(&mut events);
        events
    }

    pub(super) fn refresh_bounds(&mut self, events: &mut Vec<ToolEvent>) {
        let (min, max) = self.selection.bounds();
        self.set_bounds(min, max, events);
    }

    fn set_bounds(&mut self, a: IVec3, b: IVec3, events: &mut Vec<ToolEvent>) {
        let bounds = (a.min(b), a.max(b));
        if self.bounds != Some(bounds) {
            self.bounds = Some(bounds);
            events.push(ToolEvent::BoundsChanged {
                min: bounds.0,
                max: bounds.1,
            });
        }
    }

    // ------------------------------------------------------------------------
    // Phase control
    // ------------------------------------------------------------------------

    fn set_phase(&mut self, phase: ClonePhase, events: &mut Vec<ToolEvent>) {
        if self.phase == phase {
            return;
        }
        let from = self.phase;
        self.phase = phase;
        debug!("[Clone Tool] Phase {from:?} -> {phase:?}");
        events.push(ToolEvent::PhaseChanged { from, to: phase });
    }

    /// Drop all points and the captured contents and go back to Start.
    pub fn reset(&mut self) -> Vec<ToolEvent> {
        let mut events = Vec::new();
        self.points.clear();
        self.height_steps = 0;
        self.drag_anchor = None;
        self.bounds = None;
        self.hover_valid = false;
        self.hold.clear();
        self.selection.clear();
        self.set_phase(ClonePhase::Start, &mut events);
        events
    }

    /// Abandon an unfinished selection. A live selection is kept.
    pub fn cancel(&mut self) -> Vec<ToolEvent> {
        if self.phase < ClonePhase::MoveApply && !self.points.is_empty() {
            self.reset()
        } else {
            Vec::new()
        }
    }

    /// The tool is being switched away from. Unfinished selections are
    /// dropped; a live selection survives until the tool comes back.
    pub fn exit(&mut self) -> Vec<ToolEvent> {
        self.drag_anchor = None;
        self.hold.clear();
        if self.phase < ClonePhase::MoveApply {
            self.reset()
        } else {
            Vec::new()
        }
    }

    // ------------------------------------------------------------------------
    // Undo batches
    // ------------------------------------------------------------------------

    pub(super) fn begin_batch<H: HistoryService + ?Sized>(&mut self, history: &mut H) {
        if self.batch_open {
            history.batch_stop();
        }
        history.batch_start();
        self.batch_open = true;
    }

    pub(super) fn end_batch<H: HistoryService + ?Sized>(&mut self, history: &mut H) {
        if self.batch_open {
            history.batch_stop();
            self.batch_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ScriptedPicker;
    use crate::input::KeyCode;
    use crate::world::MemoryWorld;

    fn world() -> MemoryWorld {
        let mut world = MemoryWorld::new(IVec3::new(-16, -16, 0), IVec3::new(16, 16, 16));
        world.fill_ground(2);
        world
    }

    /// Drive the tool from Start to MoveApply over the box (0,0,2)..(2,1,2+height).
    fn select_box(tool: &mut CloneTool, world: &mut MemoryWorld, height: i32) {
        let mut picker = ScriptedPicker::at(IVec3::new(0, 0, 2));
        tool.update(&ToolInput::idle(0.016).primary_down(), &picker, world);
        picker.move_to(IVec3::new(2, 1, 2));
        tool.update(&ToolInput::idle(0.016).primary_up(), &picker, world);
        tool.update(&ToolInput::idle(0.016).wheel(height), &picker, world);
        tool.update(&ToolInput::idle(0.016).primary_down(), &picker, world);
    }

    #[test]
    fn test_phase_point_counts() {
        assert_eq!(ClonePhase::Start.point_count(), 0);
        assert_eq!(ClonePhase::MoveApply.point_count(), 3);
        assert!(ClonePhase::Height < ClonePhase::MoveApply);
    }

    #[test]
    fn test_press_off_map_does_nothing() {
        let mut tool = CloneTool::default();
        let mut world = world();
        let picker = ScriptedPicker::new();
        let events = tool.update(&ToolInput::idle(0.016).primary_down(), &picker, &mut world);
        assert!(events.is_empty());
        assert_eq!(tool.phase(), ClonePhase::Start);
        assert_eq!(tool.box_color(), tool.config().colors.invalid);
    }

    #[test]
    fn test_height_third_point() {
        let mut tool = CloneTool::default();
        let mut world = world();
        select_box(&mut tool, &mut world, 3);
        assert_eq!(tool.phase(), ClonePhase::MoveApply);
        assert_eq!(tool.points()[2], IVec3::new(2, 1, 5));
        assert_eq!(tool.bounds(), Some((IVec3::new(0, 0, 2), IVec3::new(2, 1, 5))));
        // Not captured until Copy
        assert_eq!(tool.object_count() + tool.terrain_count(), 0);
    }

    #[test]
    fn test_wheel_takes_priority_over_keys() {
        let mut tool = CloneTool::default();
        let mut world = world();
        let mut picker = ScriptedPicker::at(IVec3::new(0, 0, 2));
        tool.update(&ToolInput::idle(0.016).primary_down(), &picker, &mut world);
        picker.move_to(IVec3::new(1, 1, 2));
        tool.update(&ToolInput::idle(0.016).primary_up(), &picker, &mut world);

        tool.update(
            &ToolInput::idle(0.016).wheel(-2).press(KeyCode::PageUp),
            &picker,
            &mut world,
        );
        assert_eq!(tool.height_steps(), -2);

        tool.update(&ToolInput::idle(0.016).press(KeyCode::PageUp), &picker, &mut world);
        assert_eq!(tool.height_steps(), -1);
    }

    #[test]
    fn test_reset_long_press() {
        let mut tool = CloneTool::default();
        let mut world = world();
        select_box(&mut tool, &mut world, 0);
        let picker = ScriptedPicker::new();

        tool.update(&ToolInput::idle(0.5).press(KeyCode::Delete), &picker, &mut world);
        assert_eq!(tool.phase(), ClonePhase::MoveApply);
        let events = tool.update(&ToolInput::idle(0.6).hold(KeyCode::Delete), &picker, &mut world);
        assert_eq!(tool.phase(), ClonePhase::Start);
        assert!(tool.points().is_empty());
        assert!(events.contains(&ToolEvent::PhaseChanged {
            from: ClonePhase::MoveApply,
            to: ClonePhase::Start,
        }));
    }

    #[test]
    fn test_cancel_does_not_drop_live_selection() {
        let mut tool = CloneTool::default();
        let mut world = world();
        select_box(&mut tool, &mut world, 1);
        let picker = ScriptedPicker::new();
        tool.update(&ToolInput::idle(0.016).cancel(), &picker, &mut world);
        assert_eq!(tool.phase(), ClonePhase::MoveApply);
        assert!(tool.cancel().is_empty());
        assert!(tool.exit().is_empty());
    }

    #[test]
    fn test_nudge_is_camera_relative() {
        let mut tool = CloneTool::default();
        let mut world = world();
        select_box(&mut tool, &mut world, 0);
        let picker = ScriptedPicker::new();
        let before = tool.points()[0];

        // Camera facing +x: forward moves along +x
        tool.update(
            &ToolInput::idle(0.016).camera(90.0).press(KeyCode::ArrowUp),
            &picker,
            &mut world,
        );
        assert_eq!(tool.points()[0], before + IVec3::X);

        // Up is never rotated
        tool.update(
            &ToolInput::idle(0.016).camera(90.0).press(KeyCode::Home),
            &picker,
            &mut world,
        );
        assert_eq!(tool.points()[0], before + IVec3::X + IVec3::Z);
    }

    #[test]
    fn test_drag_moves_all_points() {
        let mut tool = CloneTool::default();
        let mut world = world();
        select_box(&mut tool, &mut world, 1);
        let start: Vec<IVec3> = tool.points().to_vec();

        let mut picker = ScriptedPicker::at(IVec3::new(1, 0, 0));
        tool.update(&ToolInput::idle(0.016).primary_down(), &picker, &mut world);
        assert!(tool.is_dragging());

        picker.move_to(IVec3::new(4, 2, 0));
        tool.update(&ToolInput::idle(0.016).primary_hold().wheel(1), &picker, &mut world);
        let offset = IVec3::new(3, 2, 1);
        for (moved, original) in tool.points().iter().zip(&start) {
            assert_eq!(*moved, *original + offset);
        }

        tool.update(&ToolInput::idle(0.016).primary_up(), &picker, &mut world);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_press_outside_box_does_not_drag() {
        let mut tool = CloneTool::default();
        let mut world = world();
        select_box(&mut tool, &mut world, 0);
        let picker = ScriptedPicker::at(IVec3::new(10, 10, 0));
        tool.update(&ToolInput::idle(0.016).primary_down(), &picker, &mut world);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_rotate_outside_move_apply_ignored() {
        let mut tool = CloneTool::default();
        assert!(tool.rotate(true).is_empty());
        assert!(tool.flip().is_empty());
        assert_eq!(tool.selection().orientation(), Orientation::Cw0);
    }

    #[test]
    #[should_panic(expected = "point 2 requested")]
    fn test_missing_point_is_fatal() {
        let tool = CloneTool::default();
        tool.point(2);
    }
}

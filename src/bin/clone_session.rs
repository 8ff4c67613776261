//! Clone Session - Headless Clone Tool Run
//!
//! Drives the clone tool through a scripted session against an in-memory
//! world: select a patch with a path and a tree on it, copy it, turn it,
//! nudge it along, paste it, then undo and redo the paste.
//!
//! Run with: `cargo run --bin clone_session [config.json]`
//!
//! Set `RUST_LOG=debug` for per-step tool output.

use std::path::Path;

use glam::IVec3;
use log::{error, info};

use terra_clone::camera::ScriptedPicker;
use terra_clone::game::{CloneTool, CloneToolConfig, ToolEvent};
use terra_clone::input::{InputState, KeyCode, MouseButton};
use terra_clone::world::memory::PrefabSpec;
use terra_clone::world::{FlipMode, MemoryWorld, ObjectCapabilities, Orientation};

const FRAME: f32 = 1.0 / 60.0;
const GROUND: i32 = 2;

/// Owns everything one frame of the session touches.
struct Session {
    tool: CloneTool,
    world: MemoryWorld,
    input: InputState,
    picker: ScriptedPicker,
    camera_angle: f32,
}

impl Session {
    fn new(config: CloneToolConfig) -> Self {
        let mut world = MemoryWorld::new(IVec3::new(-32, -32, 0), IVec3::new(32, 32, 12));
        world.fill_ground(GROUND);
        world.register_prefab(
            "Path",
            PrefabSpec::single(ObjectCapabilities {
                flippable: true,
                growable: false,
            }),
        );
        world.register_prefab(
            "Pine.Tree",
            PrefabSpec::single(ObjectCapabilities {
                flippable: false,
                growable: true,
            }),
        );
        world.register_prefab(
            "Bench",
            PrefabSpec {
                shape: vec![IVec3::ZERO, IVec3::X],
                capabilities: ObjectCapabilities::default(),
            },
        );

        let top = GROUND + 1;
        for x in 0..3 {
            world.spawn("Path", IVec3::new(x, 0, top), Orientation::Cw90, FlipMode::UNFLIPPED, 0.0);
        }
        world.spawn("Pine.Tree", IVec3::new(1, 2, top), Orientation::Cw0, FlipMode::UNFLIPPED, 0.6);
        world.spawn("Bench", IVec3::new(0, 3, top), Orientation::Cw0, FlipMode::UNFLIPPED, 0.0);

        Self {
            tool: CloneTool::new(config),
            world,
            input: InputState::new(),
            picker: ScriptedPicker::new(),
            camera_angle: 0.0,
        }
    }

    /// Run one frame with whatever input has been fed since the last one.
    fn frame(&mut self) -> Vec<ToolEvent> {
        let snapshot = self.input.snapshot(FRAME, self.camera_angle);
        let events = self.tool.update(&snapshot, &self.picker, &mut self.world);
        self.input.end_frame();
        for event in &events {
            log_event(event);
        }
        events
    }

    fn click(&mut self, down: bool) -> Vec<ToolEvent> {
        self.input.mouse.set_button(MouseButton::Left, down);
        self.frame()
    }

    fn tap(&mut self, key: KeyCode) -> Vec<ToolEvent> {
        self.input.keyboard.handle_key(key, true);
        let events = self.frame();
        self.input.keyboard.handle_key(key, false);
        self.frame();
        events
    }

    fn scroll(&mut self, lines: f32) -> Vec<ToolEvent> {
        self.input.mouse.add_scroll_lines(lines);
        self.frame()
    }
}

fn log_event(event: &ToolEvent) {
    match event {
        ToolEvent::PhaseChanged { from, to } => info!("[Session] Phase {from:?} -> {to:?}"),
        ToolEvent::BoundsChanged { min, max } => info!("[Session] Box {min} .. {max}"),
        ToolEvent::SelectionChanged { objects, terrain } => {
            info!("[Session] Selection holds {objects} objects, {terrain} terrain cells")
        }
        ToolEvent::Cut(report) => info!("[Session] Cut: {report:?}"),
        ToolEvent::Pasted(report) => info!("[Session] Pasted: {report:?}"),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match CloneToolConfig::load_json(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                error!("[Session] Could not load {path}: {e}, using defaults");
                CloneToolConfig::default()
            }
        },
        None => CloneToolConfig::default(),
    };

    let mut session = Session::new(config);
    let top = GROUND + 1;
    let objects_before = session.world.object_count();

    // Footprint from (0,0) to (2,3), one level above the ground plus the ground itself
    session.picker.move_to(IVec3::new(0, 0, GROUND));
    session.click(true);
    session.picker.move_to(IVec3::new(2, 3, GROUND));
    session.click(false);
    session.scroll(1.0);
    session.click(true);
    session.click(false);

    session.tap(KeyCode::C);
    session.tap(KeyCode::BracketRight);

    // Camera turned to face +x: "forward" nudges east
    session.camera_angle = 90.0;
    for _ in 0..6 {
        session.tap(KeyCode::ArrowUp);
    }

    let pasted = session.tap(KeyCode::V);
    let placed: usize = pasted
        .iter()
        .filter_map(|e| match e {
            ToolEvent::Pasted(report) => Some(report.objects_placed),
            _ => None,
        })
        .sum();

    let after_paste = session.world.object_count();
    let undo = session.world.undo();
    let after_undo = session.world.object_count();
    let redo = session.world.redo();

    println!("=== Clone Session ===");
    println!("Objects before:      {objects_before}");
    println!("Captured:            {} objects, {} terrain cells", session.tool.object_count(), session.tool.terrain_count());
    println!("Rotation:            {}°", session.tool.selection().orientation().degrees());
    println!("Placed by paste:     {placed}");
    println!("Objects after paste: {after_paste}");
    println!("After undo:          {after_undo} ({undo:?})");
    println!("After redo:          {} ({redo:?})", session.world.object_count());
    println!("Placement order:");
    for (prefab, coord) in session.world.placement_log() {
        println!("  {prefab:<10} {coord}");
    }
    if let Some((min, max)) = session.tool.bounds() {
        println!("Box:                 {min} .. {max} (anchor z {top})");
    }

    session.tool.exit();
}

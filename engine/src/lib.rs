//! Terra Clone Library
//!
//! Grid-world editing tools: capture a cuboid of voxel terrain and placed
//! objects, then move, rotate, mirror and paste it elsewhere.
//!
//! # Modules
//!
//! - [`world`] - orientation math, world service traits, in-memory world
//! - [`input`] - platform-agnostic keyboard/mouse state and key bindings
//! - [`camera`] - pointer picking against the world
//! - [`game`] - the clone tool and its configuration
//!
//! # Example
//!
//! ```ignore
//! use terra_clone::{CloneTool, CloneToolConfig, InputState, MemoryWorld, ScriptedPicker};
//!
//! let mut world = MemoryWorld::new(min, max);
//! let mut tool = CloneTool::new(CloneToolConfig::default());
//! let mut input = InputState::new();
//!
//! // Once per frame
//! let frame = input.snapshot(dt, camera_yaw_degrees);
//! for event in tool.update(&frame, &picker, &mut world) {
//!     // redraw preview, update HUD ...
//! }
//! input.end_frame();
//! ```

pub mod camera;
pub mod input;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use camera::{PointerPicker, ScriptedPicker};
pub use game::{ApplyReport, ClonePhase, CloneTool, CloneToolConfig, Selection, ToolEvent};
pub use input::{InputState, KeyBindings, KeyCode, MouseButton, ToolAction, ToolInput};
pub use world::{FlipMode, MemoryWorld, Orientation, WorldAccess};

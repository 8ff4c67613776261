//! Game Module
//!
//! Editing tools that build on top of the engine's world and input layers.

pub mod clone_tool;
pub mod config;

pub use clone_tool::{ApplyReport, ClonePhase, CloneTool, PlacedObjectRecord, Selection, ToolEvent};
pub use config::{CloneToolConfig, ConfigError, PreviewColors};

//! Clone Tool Module
//!
//! Select a cuboid of terrain and objects, then move, rotate, mirror and
//! re-apply it elsewhere.
//!
//! - [`selection`] - transform-independent capture buffer
//! - [`tool`] - the phase machine driven by per-tick input
//! - [`commands`] - copy / cut / paste against the world services

pub mod commands;
pub mod selection;
pub mod tool;

pub use commands::ApplyReport;
pub use selection::{
    GROWTH_NOT_APPLICABLE, PlacedObjectRecord, ScanOptions, ScanSummary, Selection,
};
pub use tool::{ClonePhase, CloneTool, ToolEvent};

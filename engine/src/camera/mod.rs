//! Camera Module
//!
//! Pointer picking interface used by the editing tools.
//! This module is window-system agnostic - ray casting lives with whoever owns the camera.

pub mod picker;

pub use picker::{PointerPicker, ScriptedPicker};

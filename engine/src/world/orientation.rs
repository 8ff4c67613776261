//! Orientation Algebra
//!
//! Quarter-turn rotations and mirror flips on the voxel grid.
//!
//! Coordinates are `IVec3` with x/y on the ground plane and z pointing up.
//! Rotations are clockwise as seen from above. Mirroring always happens on
//! the x axis of the space being transformed, around a pivot chosen by the
//! selection width parity (see [`transform_offset`]).

use glam::IVec3;
use serde::{Deserialize, Serialize};

// ============================================================================
// ORIENTATION
// ============================================================================

/// One of the four clockwise quarter-turn orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Cw0,
    Cw90,
    Cw180,
    Cw270,
}

impl Orientation {
    /// All orientations in clockwise order.
    pub const ALL: [Orientation; 4] = [
        Orientation::Cw0,
        Orientation::Cw90,
        Orientation::Cw180,
        Orientation::Cw270,
    ];

    /// Build an orientation from any number of clockwise quarter turns.
    /// Negative values turn counter-clockwise.
    pub fn from_quarter_turns(turns: i32) -> Self {
        Self::ALL[turns.rem_euclid(4) as usize]
    }

    /// Number of clockwise quarter turns (0..=3).
    pub fn quarter_turns(self) -> i32 {
        match self {
            Orientation::Cw0 => 0,
            Orientation::Cw90 => 1,
            Orientation::Cw180 => 2,
            Orientation::Cw270 => 3,
        }
    }

    pub fn degrees(self) -> i32 {
        self.quarter_turns() * 90
    }

    pub fn next_clockwise(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }

    pub fn next_counter_clockwise(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() - 1)
    }

    /// Compose two orientations: `(self + other) mod 4`.
    pub fn combine(self, other: Orientation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// The opposite facing (`self + 180°`).
    pub fn reverse(self) -> Self {
        self.combine(Orientation::Cw180)
    }

    /// True for the north/south facings (0° and 180°).
    pub fn is_longitudinal(self) -> bool {
        matches!(self, Orientation::Cw0 | Orientation::Cw180)
    }

    /// Bucket a horizontal camera angle (degrees, clockwise from +y) into the
    /// quadrant the camera is facing. Bucket edges sit at 45°, 135°, ...
    pub fn from_camera_angle(degrees: f32) -> Self {
        let wrapped = (degrees + 45.0).rem_euclid(360.0);
        Self::from_quarter_turns((wrapped / 90.0).floor() as i32)
    }
}

// ============================================================================
// FLIP MODE
// ============================================================================

/// Whether something is mirrored. Composes by XOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FlipMode(pub bool);

impl FlipMode {
    pub const UNFLIPPED: FlipMode = FlipMode(false);
    pub const FLIPPED: FlipMode = FlipMode(true);

    pub fn is_flipped(self) -> bool {
        self.0
    }

    pub fn toggled(self) -> Self {
        FlipMode(!self.0)
    }

    /// Compose two flips (XOR).
    pub fn combine(self, other: FlipMode) -> Self {
        FlipMode(self.0 ^ other.0)
    }
}

impl From<bool> for FlipMode {
    fn from(flipped: bool) -> Self {
        FlipMode(flipped)
    }
}

// ============================================================================
// OFFSET TRANSFORMS
// ============================================================================

/// Rotate an offset clockwise around the z axis.
pub fn rotate_offset(offset: IVec3, orientation: Orientation) -> IVec3 {
    match orientation {
        Orientation::Cw0 => offset,
        Orientation::Cw90 => IVec3::new(offset.y, -offset.x, offset.z),
        Orientation::Cw180 => IVec3::new(-offset.x, -offset.y, offset.z),
        Orientation::Cw270 => IVec3::new(-offset.y, offset.x, offset.z),
    }
}

/// Mirror an offset on the x axis.
///
/// `width` is 1 for odd-sized selections (pivot on the centre cell) and 2 for
/// even-sized ones (pivot on the boundary between the two middle cells).
pub fn mirror_offset(offset: IVec3, width: i32) -> IVec3 {
    IVec3::new(width - 1 - offset.x, offset.y, offset.z)
}

/// Transform a center-relative offset: mirror first (if flipped), then rotate.
pub fn transform_offset(
    offset: IVec3,
    flip: FlipMode,
    orientation: Orientation,
    width: i32,
) -> IVec3 {
    let mirrored = if flip.is_flipped() {
        mirror_offset(offset, width)
    } else {
        offset
    };
    rotate_offset(mirrored, orientation)
}

/// Compose an object's own facing with a selection-level transform.
///
/// Returns the orientation and flip the object must be placed with. The
/// 180° correction is applied to longitudinal facings for flippable objects
/// and to lateral facings for non-flippable ones; non-flippable objects keep
/// their own flip.
pub fn compose_object_facing(
    own_orientation: Orientation,
    own_flip: FlipMode,
    flippable: bool,
    buffer_orientation: Orientation,
    buffer_flip: FlipMode,
) -> (Orientation, FlipMode) {
    let mut orientation = own_orientation.combine(buffer_orientation);
    if flippable {
        let flip = own_flip.combine(buffer_flip);
        if flip.is_flipped() && own_orientation.is_longitudinal() {
            orientation = orientation.reverse();
        }
        (orientation, flip)
    } else {
        if buffer_flip.is_flipped() && !own_orientation.is_longitudinal() {
            orientation = orientation.reverse();
        }
        (orientation, own_flip)
    }
}

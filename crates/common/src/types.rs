use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Spatial transform: position, Euler rotation (radians, XYZ order), scale.
///
/// Rotation is stored per-axis rather than as a quaternion because the idle
/// animation increments each axis independently every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Run/pause state shared between the input dispatcher and the frame loop.
///
/// `running` gates whether frames are scheduled at all; `objects_animating`
/// gates the per-frame scene mutation (rotation + hue drift) while rendering
/// continues. `pointer_down`/`dragging` track the pointer gesture that drives
/// the pause toggle and the grab cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFlags {
    pub running: bool,
    pub objects_animating: bool,
    pub pointer_down: bool,
    pub dragging: bool,
}

impl Default for AnimationFlags {
    fn default() -> Self {
        Self {
            running: true,
            objects_animating: true,
            pointer_down: false,
            dragging: false,
        }
    }
}

/// Splitmix64 ... a fast, high-quality deterministic PRNG step function.
/// Used to draw the initial background color reproducibly from a seed.
pub fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

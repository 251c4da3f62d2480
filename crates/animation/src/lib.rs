//! Frame loop for the glaze viewer.
//!
//! # Invariants
//! - Frame steps never overlap; the caller schedules the next step only
//!   after the previous one returned.
//! - A failed render pauses the loop; nothing re-arms it except an explicit
//!   resume. There is no automatic recovery.
//! - The scene mutation is a pure function of the step count, so N steps
//!   advance every rotation by exactly N times the per-axis increment.

mod frame;
mod timer;

pub use frame::{Animator, FrameError, FrameStatus, HUE_STEP, ROTATION_STEP};
pub use timer::FrameTimer;

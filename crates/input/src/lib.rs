//! Input dispatch for the glaze viewer.
//!
//! # Invariants
//! - Dispatch is a pure reducer over [`AnimationFlags`]: no window handles,
//!   no rendering types. The application translates raw window events into
//!   [`InputEvent`] and applies the returned [`Effect`]s.
//! - Events are handled strictly in arrival order; dispatch never blocks.

pub mod dispatch;

pub use dispatch::{CursorMode, Effect, InputEvent, KeyCommand, dispatch};

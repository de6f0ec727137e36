//! Sprite motion: stage bounds and the patrol/freeze/click-reaction state machine.

pub mod bounds;
pub mod engine;

pub use bounds::StageBounds;
pub use engine::{Direction, MotionEngine, MotionMode, MotionState};

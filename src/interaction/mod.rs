//! Capture arbitration: hit regions, signal sources and the arbitrator that merges them.

pub mod arbitrator;
pub mod region;
pub mod signals;

pub use arbitrator::{Arbitrator, CaptureDecision};
pub use region::{HitRect, Point};
pub use signals::{CaptureSignal, ControlRegistry, MenuSignal, SignalSource, SpriteHoverSource};

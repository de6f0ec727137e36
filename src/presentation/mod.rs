//! The presentation context: scene state, sprite assets and the task that drives them.

pub mod assets;
pub mod runtime;
pub mod scene;

#[cfg(feature = "desktop")]
pub mod webview;

pub use assets::{SpriteAssets, SpritePose};
pub use runtime::{presentation_channel, run_presentation_loop, FrameSink, PresentationHandle};
pub use scene::{Scene, SpriteFrame};

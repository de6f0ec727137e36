//! The privileged side: owns the overlay window and its OS-level state.

pub mod controller;
pub mod cursor;
pub mod layout;
pub mod service;

#[cfg(feature = "desktop")]
pub mod tauri_window;

pub use controller::{OverlayWindow, WindowCaptureController, WindowCaptureState};
pub use layout::{default_window_rect, window_relative_pointer, WindowRect, WorkArea};
pub use service::{host_channel, run_host_loop, HostCommand, HostHandle};

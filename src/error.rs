//! Error types shared by the host and presentation sides.
//!
//! Everything here serializes to its display string so it can be returned from Tauri commands.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    /// The overlay window has not been created yet (or was destroyed).
    #[error("Window not found: {0}")]
    WindowNotFound(String),

    /// A window-system call failed.
    #[error("Window error: {0}")]
    Window(String),

    /// The host context is not accepting commands (not started or shut down).
    #[error("Host unavailable: {0}")]
    HostUnavailable(String),

    /// The presentation context is not accepting events.
    #[error("Presentation unavailable: {0}")]
    PresentationUnavailable(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Sprite asset could not be read. Always recoverable (placeholder).
    #[error("Asset error: {0}")]
    Asset(String),
}

impl Serialize for OverlayError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<image::ImageError> for OverlayError {
    fn from(err: image::ImageError) -> Self {
        OverlayError::Asset(err.to_string())
    }
}

#[cfg(feature = "desktop")]
impl From<tauri::Error> for OverlayError {
    fn from(err: tauri::Error) -> Self {
        match err {
            tauri::Error::WindowNotFound => OverlayError::WindowNotFound("overlay".to_string()),
            other => OverlayError::Window(other.to_string()),
        }
    }
}

pub type OverlayResult<T> = Result<T, OverlayError>;

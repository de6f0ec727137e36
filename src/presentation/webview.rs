use tauri::{AppHandle, Emitter};

use super::runtime::FrameSink;
use super::scene::SpriteFrame;
use crate::boundary::MenuCommand;
use crate::host::tauri_window::OVERLAY_WINDOW_LABEL;
use crate::{EVT_MENU_COMMAND, EVT_SPRITE_FRAME};

/// Emits frames and menu results to the overlay webview.
pub struct WebviewFrameSink {
    app: AppHandle,
}

impl WebviewFrameSink {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl FrameSink for WebviewFrameSink {
    fn sprite_frame(&self, frame: &SpriteFrame) {
        // Dropped frames are fine: the next one supersedes them.
        let _ = self
            .app
            .emit_to(OVERLAY_WINDOW_LABEL, EVT_SPRITE_FRAME, frame);
    }

    fn menu_command(&self, command: &MenuCommand) {
        if let Err(err) = self
            .app
            .emit_to(OVERLAY_WINDOW_LABEL, EVT_MENU_COMMAND, command)
        {
            log::debug!("Failed to emit {}: {}", EVT_MENU_COMMAND, err);
        }
    }
}

use tauri::State;

use crate::boundary::{MenuAction, UiEvent};
use crate::error::OverlayError;
use crate::host::{HostCommand, HostHandle, WindowCaptureState, WindowRect};
use crate::interaction::HitRect;
use crate::presentation::PresentationHandle;

// Host surface.

#[tauri::command]
pub fn overlay_open_command_menu(host: State<HostHandle>) -> Result<(), OverlayError> {
    host.submit(HostCommand::OpenCommandMenu)
}

/// Capture requested by the webview itself. Merged with every other signal, so `false` releases
/// after the usual quiet period.
#[tauri::command]
pub fn overlay_set_capture_decision(
    presentation: State<PresentationHandle>,
    captured: bool,
) -> Result<(), OverlayError> {
    presentation.send(UiEvent::CaptureRequest { captured })
}

#[tauri::command]
pub async fn overlay_reset_window_position(
    host: State<'_, HostHandle>,
) -> Result<WindowRect, OverlayError> {
    host.reset_window_position().await
}

#[tauri::command]
pub fn overlay_quit(host: State<HostHandle>) -> Result<(), OverlayError> {
    host.submit(HostCommand::Action(MenuAction::Quit))
}

#[tauri::command]
pub async fn overlay_query_capture_state(
    host: State<'_, HostHandle>,
) -> Result<WindowCaptureState, OverlayError> {
    host.query_state().await
}

// UI events for the presentation context.

#[tauri::command]
pub fn overlay_control_hover(
    presentation: State<PresentationHandle>,
    id: String,
    hovered: bool,
) -> Result<(), OverlayError> {
    presentation.send(UiEvent::ControlHover { id, hovered })
}

#[tauri::command]
pub fn overlay_register_control(
    presentation: State<PresentationHandle>,
    id: String,
    region: Option<HitRect>,
) -> Result<(), OverlayError> {
    if id.trim().is_empty() {
        return Err(OverlayError::InvalidArgument("empty control id".to_string()));
    }
    presentation.send(UiEvent::RegisterControl { id, region })
}

#[tauri::command]
pub fn overlay_unregister_control(
    presentation: State<PresentationHandle>,
    id: String,
) -> Result<(), OverlayError> {
    presentation.send(UiEvent::UnregisterControl { id })
}

#[tauri::command]
pub fn overlay_menu_state(
    presentation: State<PresentationHandle>,
    open: bool,
) -> Result<(), OverlayError> {
    presentation.send(UiEvent::MenuState { open })
}

#[tauri::command]
pub fn overlay_sprite_click(presentation: State<PresentationHandle>) -> Result<(), OverlayError> {
    presentation.send(UiEvent::SpriteClicked)
}

#[tauri::command]
pub fn overlay_viewport_resized(
    presentation: State<PresentationHandle>,
    width: f64,
    height: f64,
) -> Result<(), OverlayError> {
    if !(width.is_finite() && height.is_finite()) {
        return Err(OverlayError::InvalidArgument(format!(
            "viewport {}x{}",
            width, height
        )));
    }
    presentation.send(UiEvent::ViewportResized { width, height })
}

#[tauri::command]
pub fn overlay_set_motion_speed(
    presentation: State<PresentationHandle>,
    speed: f64,
) -> Result<(), OverlayError> {
    if !(speed.is_finite() && speed >= 0.0) {
        return Err(OverlayError::InvalidArgument(format!("motion speed {}", speed)));
    }
    presentation.send(UiEvent::SetMotionSpeed(speed))
}

#[tauri::command]
pub fn overlay_reset_motion(presentation: State<PresentationHandle>) -> Result<(), OverlayError> {
    presentation.send(UiEvent::ResetMotion)
}

use tauri::menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem};
use tauri::{Emitter, Manager};

use super::controller::{OverlayWindow, WindowCaptureState};
use super::layout::{default_window_rect, WindowRect, WorkArea};
use crate::boundary::MenuAction;
use crate::error::{OverlayError, OverlayResult};
use crate::EVT_CAPTURE_STATE;

pub const OVERLAY_WINDOW_LABEL: &str = "overlay";

/// Create the overlay window (or return the existing one): transparent, undecorated, on top,
/// skipped by the taskbar, and click-through from the first frame.
pub fn ensure_overlay_window(
    app: &tauri::AppHandle,
    strip_height: f64,
) -> tauri::Result<tauri::WebviewWindow> {
    if let Some(window) = app.get_webview_window(OVERLAY_WINDOW_LABEL) {
        return Ok(window);
    }

    let builder = tauri::WebviewWindowBuilder::new(
        app,
        OVERLAY_WINDOW_LABEL,
        tauri::WebviewUrl::App("index.html".into()),
    )
    .title("pet-overlay")
    .inner_size(960.0, strip_height)
    .resizable(false)
    .transparent(true)
    .decorations(false)
    .shadow(false)
    .always_on_top(true)
    .skip_taskbar(true)
    .focused(false)
    .visible(false);

    let window = builder.build()?;
    let _ = window.set_focusable(false);
    window.set_ignore_cursor_events(true)?;

    match monitor_work_area(&window) {
        Ok(work_area) => apply_rect(&window, default_window_rect(work_area, strip_height, 0.0))?,
        Err(err) => log::warn!("Overlay placed at builder default: {}", err),
    }

    window.show()?;
    log::info!("Overlay window created (label={})", OVERLAY_WINDOW_LABEL);
    Ok(window)
}

pub struct TauriOverlayWindow {
    window: tauri::WebviewWindow,
}

impl TauriOverlayWindow {
    pub fn new(window: tauri::WebviewWindow) -> Self {
        Self { window }
    }
}

impl OverlayWindow for TauriOverlayWindow {
    fn set_ignore_mouse_events(&self, ignore: bool) -> OverlayResult<()> {
        self.window.set_ignore_cursor_events(ignore)?;
        Ok(())
    }

    fn set_always_on_top(&self, on_top: bool) -> OverlayResult<()> {
        self.window.set_always_on_top(on_top)?;
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> OverlayResult<()> {
        if visible {
            self.window.show()?;
        } else {
            self.window.hide()?;
        }
        Ok(())
    }

    fn work_area(&self) -> OverlayResult<WorkArea> {
        monitor_work_area(&self.window)
    }

    fn set_rect(&self, rect: WindowRect) -> OverlayResult<()> {
        apply_rect(&self.window, rect)?;
        Ok(())
    }

    fn popup_command_menu(&self, state: &WindowCaptureState) -> OverlayResult<()> {
        let app = self.window.app_handle();
        let always_on_top = CheckMenuItem::with_id(
            app,
            MenuAction::ToggleAlwaysOnTop.id(),
            "Always on top",
            true,
            state.always_on_top,
            None::<&str>,
        )?;
        let visibility = MenuItem::with_id(
            app,
            MenuAction::ToggleVisibility.id(),
            if state.visible { "Hide" } else { "Show" },
            true,
            None::<&str>,
        )?;
        let reset = MenuItem::with_id(
            app,
            MenuAction::ResetPosition.id(),
            "Reset position",
            true,
            None::<&str>,
        )?;
        let quit = MenuItem::with_id(app, MenuAction::Quit.id(), "Quit", true, None::<&str>)?;
        let sep = PredefinedMenuItem::separator(app)?;
        let menu = Menu::with_items(app, &[&always_on_top, &visibility, &reset, &sep, &quit])?;

        self.window.popup_menu(&menu)?;
        Ok(())
    }

    fn publish_capture_state(&self, state: &WindowCaptureState) {
        if let Err(err) = self.window.emit(EVT_CAPTURE_STATE, state) {
            log::debug!("Failed to emit {}: {}", EVT_CAPTURE_STATE, err);
        }
    }

    fn exit(&self) {
        self.window.app_handle().exit(0);
    }
}

fn monitor_work_area(window: &tauri::WebviewWindow) -> OverlayResult<WorkArea> {
    let monitor = window
        .current_monitor()?
        .or(window.primary_monitor()?)
        .ok_or_else(|| OverlayError::Window("no monitor available".to_string()))?;

    let area = monitor.work_area();
    let left = area.position.x as f64;
    let top = area.position.y as f64;
    Ok(WorkArea {
        left,
        top,
        right: left + area.size.width as f64,
        bottom: top + area.size.height as f64,
        scale_factor: monitor.scale_factor(),
    })
}

fn apply_rect(window: &tauri::WebviewWindow, rect: WindowRect) -> tauri::Result<()> {
    window.set_size(tauri::Size::Physical(tauri::PhysicalSize {
        width: rect.width.max(1),
        height: rect.height.max(1),
    }))?;
    window.set_position(tauri::Position::Physical(tauri::PhysicalPosition {
        x: rect.x,
        y: rect.y,
    }))
}

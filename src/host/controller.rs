//! The single owner of the overlay window's OS-level interactivity.

use serde::Serialize;

use super::layout::{default_window_rect, WindowRect, WorkArea};
use crate::boundary::{MenuAction, MenuCommand};
use crate::error::OverlayResult;
use crate::interaction::CaptureDecision;

/// Window-system operations the controller needs. Implemented over a Tauri webview window on
/// desktop and by a recording fake in tests.
pub trait OverlayWindow {
    /// `true`: clicks pass through to whatever is underneath.
    fn set_ignore_mouse_events(&self, ignore: bool) -> OverlayResult<()>;
    fn set_always_on_top(&self, on_top: bool) -> OverlayResult<()>;
    fn set_visible(&self, visible: bool) -> OverlayResult<()>;
    fn work_area(&self) -> OverlayResult<WorkArea>;
    fn set_rect(&self, rect: WindowRect) -> OverlayResult<()>;
    /// Present the command menu at the cursor. The chosen item comes back separately as a
    /// menu event.
    fn popup_command_menu(&self, state: &WindowCaptureState) -> OverlayResult<()>;
    /// Mirror an applied state to the renderer.
    fn publish_capture_state(&self, state: &WindowCaptureState);
    fn exit(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCaptureState {
    pub ignoring_mouse_events: bool,
    pub always_on_top: bool,
    pub visible: bool,
    /// Keep ignoring mouse events whatever the presentation side decides.
    pub force_click_through: bool,
}

impl Default for WindowCaptureState {
    /// How the overlay window is created: click-through, on top, shown.
    fn default() -> Self {
        Self {
            ignoring_mouse_events: true,
            always_on_top: true,
            visible: true,
            force_click_through: false,
        }
    }
}

pub struct WindowCaptureController<W> {
    window: W,
    state: WindowCaptureState,
    requested: CaptureDecision,
    strip_height: f64,
}

impl<W: OverlayWindow> WindowCaptureController<W> {
    pub fn new(window: W, strip_height: f64) -> Self {
        Self {
            window,
            state: WindowCaptureState::default(),
            requested: CaptureDecision::CLICK_THROUGH,
            strip_height,
        }
    }

    pub fn state(&self) -> WindowCaptureState {
        self.state
    }

    pub fn requested(&self) -> CaptureDecision {
        self.requested
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    /// Apply a capture level. Returns whether an OS call was made.
    ///
    /// The same level twice is a no-op. If the OS call fails the recorded state is left alone so the
    /// next level change (or `reconcile`) retries.
    pub fn apply_capture(&mut self, decision: CaptureDecision) -> OverlayResult<bool> {
        self.requested = decision;
        let ignore = self.wanted_ignore();
        if ignore == self.state.ignoring_mouse_events {
            return Ok(false);
        }
        self.window.set_ignore_mouse_events(ignore)?;
        self.state.ignoring_mouse_events = ignore;
        log::debug!(
            "Overlay capture applied (captured={}, ignoring_mouse_events={})",
            decision.captured,
            ignore
        );
        self.window.publish_capture_state(&self.state);
        Ok(true)
    }

    /// Re-apply the recorded state unconditionally.
    pub fn reconcile(&mut self) -> OverlayResult<()> {
        let ignore = self.wanted_ignore();
        self.window.set_ignore_mouse_events(ignore)?;
        self.state.ignoring_mouse_events = ignore;
        self.window.set_always_on_top(self.state.always_on_top)?;
        self.window.publish_capture_state(&self.state);
        Ok(())
    }

    pub fn toggle_always_on_top(&mut self) -> OverlayResult<bool> {
        let next = !self.state.always_on_top;
        self.window.set_always_on_top(next)?;
        self.state.always_on_top = next;
        Ok(next)
    }

    pub fn set_visible(&mut self, visible: bool) -> OverlayResult<bool> {
        if self.state.visible == visible {
            return Ok(visible);
        }
        self.window.set_visible(visible)?;
        self.state.visible = visible;
        if visible {
            // Some platforms drop the pass-through flag while hidden.
            self.reconcile()?;
        }
        Ok(visible)
    }

    pub fn toggle_visibility(&mut self) -> OverlayResult<bool> {
        self.set_visible(!self.state.visible)
    }

    pub fn set_force_click_through(&mut self, force: bool) -> OverlayResult<bool> {
        self.state.force_click_through = force;
        let requested = self.requested;
        if !self.apply_capture(requested)? {
            self.window.publish_capture_state(&self.state);
        }
        log::info!("Overlay force click-through set to {}", force);
        Ok(force)
    }

    pub fn toggle_force_click_through(&mut self) -> OverlayResult<bool> {
        self.set_force_click_through(!self.state.force_click_through)
    }

    /// Move the window back to the bottom strip of its monitor's work area.
    pub fn reset_window_position(&mut self) -> OverlayResult<WindowRect> {
        let work_area = self.window.work_area()?;
        let rect = default_window_rect(work_area, self.strip_height, 0.0);
        self.window.set_rect(rect)?;
        log::info!(
            "Overlay window reset to {}x{} at ({}, {})",
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
        Ok(rect)
    }

    pub fn open_command_menu(&self) -> OverlayResult<()> {
        self.window.popup_command_menu(&self.state)
    }

    /// Run a menu or tray action. `Quit` exits the application.
    pub fn run_action(&mut self, action: MenuAction) -> OverlayResult<MenuCommand> {
        let value = match action {
            MenuAction::ToggleAlwaysOnTop => Some(self.toggle_always_on_top()?),
            MenuAction::ToggleVisibility => Some(self.toggle_visibility()?),
            MenuAction::ResetPosition => {
                self.reset_window_position()?;
                None
            }
            MenuAction::Quit => {
                self.quit();
                None
            }
        };
        Ok(MenuCommand { action, value })
    }

    /// Leave the window click-through and exit.
    pub fn quit(&mut self) {
        if let Err(err) = self.apply_capture(CaptureDecision::CLICK_THROUGH) {
            log::warn!("Failed to restore click-through before exit: {}", err);
        }
        log::info!("Overlay quitting");
        self.window.exit();
    }

    fn wanted_ignore(&self) -> bool {
        !self.requested.captured || self.state.force_click_through
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::OverlayError;

    #[derive(Debug, Clone, PartialEq)]
    pub enum WindowCall {
        IgnoreMouseEvents(bool),
        AlwaysOnTop(bool),
        Visible(bool),
        Rect(WindowRect),
        PopupMenu,
        PublishState(WindowCaptureState),
        Exit,
    }

    /// Records every call; can be told to fail the next ignore-mouse-events or popup call.
    #[derive(Debug, Clone, Default)]
    pub struct FakeWindow {
        pub calls: Arc<Mutex<Vec<WindowCall>>>,
        pub fail_next_ignore: Arc<AtomicBool>,
        pub fail_next_popup: Arc<AtomicBool>,
    }

    impl FakeWindow {
        pub fn calls(&self) -> Vec<WindowCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn ignore_calls(&self) -> Vec<bool> {
            self.calls()
                .iter()
                .filter_map(|call| match call {
                    WindowCall::IgnoreMouseEvents(v) => Some(*v),
                    _ => None,
                })
                .collect()
        }

        pub fn has_call(&self, call: &WindowCall) -> bool {
            self.calls().contains(call)
        }

        fn record(&self, call: WindowCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl OverlayWindow for FakeWindow {
        fn set_ignore_mouse_events(&self, ignore: bool) -> OverlayResult<()> {
            if self.fail_next_ignore.swap(false, Ordering::SeqCst) {
                return Err(OverlayError::Window("set_ignore_cursor_events failed".into()));
            }
            self.record(WindowCall::IgnoreMouseEvents(ignore));
            Ok(())
        }

        fn set_always_on_top(&self, on_top: bool) -> OverlayResult<()> {
            self.record(WindowCall::AlwaysOnTop(on_top));
            Ok(())
        }

        fn set_visible(&self, visible: bool) -> OverlayResult<()> {
            self.record(WindowCall::Visible(visible));
            Ok(())
        }

        fn work_area(&self) -> OverlayResult<WorkArea> {
            Ok(WorkArea {
                left: 0.0,
                top: 0.0,
                right: 1920.0,
                bottom: 1040.0,
                scale_factor: 1.0,
            })
        }

        fn set_rect(&self, rect: WindowRect) -> OverlayResult<()> {
            self.record(WindowCall::Rect(rect));
            Ok(())
        }

        fn popup_command_menu(&self, _state: &WindowCaptureState) -> OverlayResult<()> {
            if self.fail_next_popup.swap(false, Ordering::SeqCst) {
                return Err(OverlayError::Window("popup_menu failed".into()));
            }
            self.record(WindowCall::PopupMenu);
            Ok(())
        }

        fn publish_capture_state(&self, state: &WindowCaptureState) {
            self.record(WindowCall::PublishState(*state));
        }

        fn exit(&self) {
            self.record(WindowCall::Exit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeWindow, WindowCall};
    use super::*;

    fn controller() -> (WindowCaptureController<FakeWindow>, FakeWindow) {
        let window = FakeWindow::default();
        (WindowCaptureController::new(window.clone(), 240.0), window)
    }

    #[test]
    fn test_starts_click_through() {
        let (controller, window) = controller();
        assert!(controller.state().ignoring_mouse_events);
        assert!(window.calls().is_empty());
    }

    #[test]
    fn test_capture_transitions_are_idempotent() {
        let (mut controller, window) = controller();
        assert!(!controller.apply_capture(CaptureDecision::CLICK_THROUGH).unwrap());
        assert!(controller.apply_capture(CaptureDecision::CAPTURED).unwrap());
        assert!(!controller.apply_capture(CaptureDecision::CAPTURED).unwrap());
        assert!(controller.apply_capture(CaptureDecision::CLICK_THROUGH).unwrap());

        assert_eq!(window.ignore_calls(), vec![false, true]);
        assert!(controller.state().ignoring_mouse_events);
    }

    #[test]
    fn test_failed_os_call_leaves_state_and_retries() {
        let (mut controller, window) = controller();
        window
            .fail_next_ignore
            .store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(controller.apply_capture(CaptureDecision::CAPTURED).is_err());
        assert!(controller.state().ignoring_mouse_events);

        // Same level again is retried because the recorded state never changed.
        assert!(controller.apply_capture(CaptureDecision::CAPTURED).unwrap());
        assert!(!controller.state().ignoring_mouse_events);
        assert_eq!(window.ignore_calls(), vec![false]);
    }

    #[test]
    fn test_force_click_through_overrides_capture() {
        let (mut controller, window) = controller();
        controller.apply_capture(CaptureDecision::CAPTURED).unwrap();
        assert!(controller.toggle_force_click_through().unwrap());
        assert!(controller.state().ignoring_mouse_events);

        // Captured requests are ignored while forced.
        assert!(!controller.apply_capture(CaptureDecision::CAPTURED).unwrap());

        assert!(!controller.toggle_force_click_through().unwrap());
        assert!(!controller.state().ignoring_mouse_events);
        assert_eq!(window.ignore_calls(), vec![false, true, false]);
    }

    #[test]
    fn test_reconcile_reapplies_recorded_state() {
        let (mut controller, window) = controller();
        controller.apply_capture(CaptureDecision::CAPTURED).unwrap();
        controller.reconcile().unwrap();
        assert_eq!(window.ignore_calls(), vec![false, false]);
        assert!(window.has_call(&WindowCall::AlwaysOnTop(true)));
    }

    #[test]
    fn test_menu_actions() {
        let (mut controller, window) = controller();

        let cmd = controller.run_action(MenuAction::ToggleAlwaysOnTop).unwrap();
        assert_eq!(cmd.value, Some(false));
        assert!(!controller.state().always_on_top);

        let cmd = controller.run_action(MenuAction::ToggleVisibility).unwrap();
        assert_eq!(cmd.value, Some(false));
        assert!(window.has_call(&WindowCall::Visible(false)));

        let cmd = controller.run_action(MenuAction::ResetPosition).unwrap();
        assert_eq!(cmd.value, None);
        assert!(window.has_call(&WindowCall::Rect(WindowRect {
            x: 0,
            y: 800,
            width: 1920,
            height: 240,
        })));
    }

    #[test]
    fn test_show_reapplies_pass_through() {
        let (mut controller, window) = controller();
        controller.set_visible(false).unwrap();
        controller.set_visible(true).unwrap();
        assert_eq!(window.ignore_calls(), vec![true]);
        assert!(controller.state().visible);
    }

    #[test]
    fn test_quit_restores_click_through_then_exits() {
        let (mut controller, window) = controller();
        controller.apply_capture(CaptureDecision::CAPTURED).unwrap();
        controller.run_action(MenuAction::Quit).unwrap();
        assert_eq!(window.ignore_calls(), vec![false, true]);
        assert_eq!(window.calls().last(), Some(&WindowCall::Exit));
    }
}

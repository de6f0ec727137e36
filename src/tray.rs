use tauri::{
    menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
};

use crate::boundary::MenuAction;
use crate::host::{HostCommand, HostHandle};

const FORCE_CLICK_THROUGH_ID: &str = "force_click_through";

/// Tray menu. Items shared with the command menu (`MenuAction` ids) are handled by the app-wide
/// menu listener; only the tray-specific toggle is handled here.
pub(crate) fn setup_tray(app: &tauri::App, host: HostHandle) -> tauri::Result<()> {
    let always_on_top = CheckMenuItem::with_id(
        app,
        MenuAction::ToggleAlwaysOnTop.id(),
        "Always on top",
        true,
        true,
        None::<&str>,
    )?;
    let force_click_through = CheckMenuItem::with_id(
        app,
        FORCE_CLICK_THROUGH_ID,
        "Click-through (view only)",
        true,
        false,
        None::<&str>,
    )?;
    let visibility = MenuItem::with_id(
        app,
        MenuAction::ToggleVisibility.id(),
        "Show / hide",
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
    let menu = Menu::with_items(
        app,
        &[
            &always_on_top,
            &force_click_through,
            &visibility,
            &reset,
            &sep,
            &quit,
        ],
    )?;
    let icon = app.default_window_icon().cloned();

    let host_for_menu = host.clone();
    let host_for_tray = host;

    let mut builder = TrayIconBuilder::new()
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(move |_app, event| {
            if event.id().as_ref() != FORCE_CLICK_THROUGH_ID {
                return;
            }
            if let Err(err) = host_for_menu.submit(HostCommand::ToggleForceClickThrough) {
                log::warn!("Tray click-through toggle dropped: {}", err);
            }
        })
        .on_tray_icon_event(move |_tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                let command = HostCommand::Action(MenuAction::ToggleVisibility);
                if let Err(err) = host_for_tray.submit(command) {
                    log::warn!("Tray visibility toggle dropped: {}", err);
                }
            }
        });

    if let Some(i) = icon {
        builder = builder.icon(i);
    }

    builder.build(app)?;
    Ok(())
}

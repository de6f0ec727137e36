pub mod boundary;
pub mod config;
pub mod error;
pub mod host;
pub mod interaction;
pub mod motion;
pub mod presentation;

#[cfg(feature = "desktop")]
mod commands;
#[cfg(feature = "desktop")]
mod tray;

pub use config::OverlayConfig;
pub use error::{OverlayError, OverlayResult};

pub const EVT_SPRITE_FRAME: &str = "overlay-sprite-frame";
pub const EVT_CAPTURE_STATE: &str = "overlay-capture-state";
pub const EVT_MENU_COMMAND: &str = "overlay-menu-command";

#[cfg(feature = "desktop")]
pub fn run() {
    use tauri::Manager;

    use crate::boundary::{capture_channel, host_event_channel, HostEvent, MenuAction};
    use crate::host::cursor::spawn_cursor_poller;
    use crate::host::tauri_window::{ensure_overlay_window, TauriOverlayWindow, OVERLAY_WINDOW_LABEL};
    use crate::host::{host_channel, run_host_loop, HostCommand, WindowCaptureController};
    use crate::presentation::webview::WebviewFrameSink;
    use crate::presentation::{presentation_channel, run_presentation_loop, Scene, SpriteAssets};

    let config = OverlayConfig::from_env();

    let (host, host_commands) = host_channel();
    let (capture, capture_rx) = capture_channel();
    let (host_events, host_events_rx) = host_event_channel();
    let (presentation, ui_events) = presentation_channel();

    let host_for_menu = host.clone();
    let host_for_window = host.clone();
    let events_for_window = host_events.clone();
    let log_level = config.log_level;

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .target(tauri_plugin_log::Target::new(
                    tauri_plugin_log::TargetKind::Stdout,
                ))
                .target(tauri_plugin_log::Target::new(
                    tauri_plugin_log::TargetKind::LogDir {
                        file_name: Some("pet-overlay".into()),
                    },
                ))
                .level(log_level)
                .build(),
        )
        .manage(host.clone())
        .manage(presentation)
        .invoke_handler(tauri::generate_handler![
            commands::overlay_commands::overlay_open_command_menu,
            commands::overlay_commands::overlay_set_capture_decision,
            commands::overlay_commands::overlay_reset_window_position,
            commands::overlay_commands::overlay_quit,
            commands::overlay_commands::overlay_query_capture_state,
            commands::overlay_commands::overlay_control_hover,
            commands::overlay_commands::overlay_register_control,
            commands::overlay_commands::overlay_unregister_control,
            commands::overlay_commands::overlay_menu_state,
            commands::overlay_commands::overlay_sprite_click,
            commands::overlay_commands::overlay_viewport_resized,
            commands::overlay_commands::overlay_set_motion_speed,
            commands::overlay_commands::overlay_reset_motion,
        ])
        .setup(move |app| {
            let handle = app.handle().clone();

            let window = ensure_overlay_window(&handle, config.strip_height)?;
            let scale = window.scale_factor()?;
            let viewport = window.inner_size()?.to_logical::<f64>(scale);

            let controller =
                WindowCaptureController::new(TauriOverlayWindow::new(window), config.strip_height);
            tauri::async_runtime::spawn(run_host_loop(
                controller,
                host_commands,
                capture_rx,
                host_events.clone(),
            ));

            let asset_dir = if config.asset_dir.is_relative() && !config.asset_dir.exists() {
                app.path()
                    .resource_dir()
                    .map(|dir| dir.join(&config.asset_dir))
                    .unwrap_or_else(|_| config.asset_dir.clone())
            } else {
                config.asset_dir.clone()
            };
            let scene = Scene::new(
                &config,
                SpriteAssets::load(&asset_dir),
                viewport.width,
                viewport.height,
            );
            tauri::async_runtime::spawn(run_presentation_loop(
                scene,
                ui_events,
                host_events_rx,
                capture,
                WebviewFrameSink::new(handle.clone()),
                config.frame_interval,
            ));

            spawn_cursor_poller(handle, config.cursor_poll_interval, host_events);
            tray::setup_tray(app, host)?;
            Ok(())
        })
        .on_menu_event(move |_app, event| {
            let Some(action) = MenuAction::from_id(event.id().as_ref()) else {
                return;
            };
            if let Err(err) = host_for_menu.submit(HostCommand::Action(action)) {
                log::warn!("Menu action {:?} dropped: {}", action, err);
            }
        })
        .on_window_event(move |window, event| {
            if window.label() != OVERLAY_WINDOW_LABEL {
                return;
            }
            match event {
                tauri::WindowEvent::Focused(true) => {
                    if let Err(err) = host_for_window.submit(HostCommand::WindowFocused) {
                        log::debug!("Focus reconcile dropped: {}", err);
                    }
                }
                tauri::WindowEvent::Resized(size) => {
                    let scale = window.scale_factor().unwrap_or(1.0);
                    let logical = size.to_logical::<f64>(scale);
                    events_for_window.send(HostEvent::WindowResized {
                        width: logical.width,
                        height: logical.height,
                    });
                }
                _ => {}
            }
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

//! The host task: applies capture levels and runs window commands strictly in order.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use super::controller::{OverlayWindow, WindowCaptureController, WindowCaptureState};
use super::layout::WindowRect;
use crate::boundary::{CaptureReceiver, HostEvent, HostEventSender, MenuAction, MenuCommand};
use crate::error::{OverlayError, OverlayResult};
use crate::interaction::CaptureDecision;

const HOST_COMMAND_CAPACITY: usize = 32;
/// Native popups give no dismissal notice. The menu signal is dropped after this long without a
/// choice.
pub const COMMAND_MENU_TIMEOUT: Duration = Duration::from_secs(5);
/// Retry delay when the presentation queue was full.
const MENU_CLOSE_RETRY: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub enum HostCommand {
    OpenCommandMenu,
    /// A command-menu item, tray item or equivalent IPC command.
    Action(MenuAction),
    ResetWindowPosition {
        reply: oneshot::Sender<OverlayResult<WindowRect>>,
    },
    ToggleForceClickThrough,
    QueryState {
        reply: oneshot::Sender<WindowCaptureState>,
    },
    WindowFocused,
}

pub fn host_channel() -> (HostHandle, mpsc::Receiver<HostCommand>) {
    let (tx, rx) = mpsc::channel(HOST_COMMAND_CAPACITY);
    (HostHandle { tx }, rx)
}

#[derive(Debug, Clone)]
pub struct HostHandle {
    tx: mpsc::Sender<HostCommand>,
}

impl HostHandle {
    /// Fire-and-forget.
    pub fn submit(&self, command: HostCommand) -> OverlayResult<()> {
        self.tx.try_send(command).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => {
                OverlayError::HostUnavailable("command queue full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => {
                OverlayError::HostUnavailable("host loop not running".to_string())
            }
        })
    }

    pub async fn reset_window_position(&self) -> OverlayResult<WindowRect> {
        let (reply, rx) = oneshot::channel();
        self.send(HostCommand::ResetWindowPosition { reply }).await?;
        rx.await
            .map_err(|_| OverlayError::HostUnavailable("reset request dropped".to_string()))?
    }

    pub async fn query_state(&self) -> OverlayResult<WindowCaptureState> {
        let (reply, rx) = oneshot::channel();
        self.send(HostCommand::QueryState { reply }).await?;
        rx.await
            .map_err(|_| OverlayError::HostUnavailable("state query dropped".to_string()))
    }

    async fn send(&self, command: HostCommand) -> OverlayResult<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| OverlayError::HostUnavailable("host loop not running".to_string()))
    }
}

/// Run until the command channel closes or the user quits.
///
/// When the presentation side goes away the window falls back to click-through.
pub async fn run_host_loop<W: OverlayWindow>(
    mut controller: WindowCaptureController<W>,
    mut commands: mpsc::Receiver<HostCommand>,
    mut capture: CaptureReceiver,
    events: HostEventSender,
) {
    log::info!("Overlay host loop started");

    apply(&mut controller, capture.latest());

    let mut capture_open = true;
    let mut menu = MenuWatch::default();
    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                if handle_command(&mut controller, command, &events, &mut menu) == Flow::Exit {
                    break;
                }
            }
            decision = capture.changed(), if capture_open => match decision {
                Some(decision) => apply(&mut controller, decision),
                None => {
                    log::info!("Presentation side gone, overlay left click-through");
                    capture_open = false;
                    apply(&mut controller, CaptureDecision::CLICK_THROUGH);
                }
            },
            _ = menu_timeout(menu.deadline) => {
                log::debug!("Command menu timed out without a choice");
                menu.close(&events);
            }
        }
    }

    log::info!("Overlay host loop stopped");
}

/// Keeps the presentation side's menu signal open while the command menu may be showing.
#[derive(Debug, Default)]
struct MenuWatch {
    deadline: Option<Instant>,
}

impl MenuWatch {
    fn open(&mut self, events: &HostEventSender) {
        events.send(HostEvent::MenuOpened);
        self.deadline = Some(Instant::now() + COMMAND_MENU_TIMEOUT);
    }

    /// Report the menu closed. A dropped report is retried shortly so the signal never sticks.
    fn close(&mut self, events: &HostEventSender) {
        self.settle(events, HostEvent::MenuClosed);
    }

    /// A chosen command closes the menu on the presentation side too.
    fn chosen(&mut self, events: &HostEventSender, command: MenuCommand) {
        self.settle(events, HostEvent::MenuCommand(command));
    }

    fn settle(&mut self, events: &HostEventSender, event: HostEvent) {
        let delivered = events.send(event) || events.is_closed();
        self.deadline = match (delivered, self.deadline) {
            (true, _) | (false, None) => None,
            (false, Some(_)) => Some(Instant::now() + MENU_CLOSE_RETRY),
        };
    }
}

async fn menu_timeout(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

fn apply<W: OverlayWindow>(controller: &mut WindowCaptureController<W>, decision: CaptureDecision) {
    if let Err(err) = controller.apply_capture(decision) {
        log::warn!(
            "Failed to apply capture (captured={}): {}",
            decision.captured,
            err
        );
    }
}

fn handle_command<W: OverlayWindow>(
    controller: &mut WindowCaptureController<W>,
    command: HostCommand,
    events: &HostEventSender,
    menu: &mut MenuWatch,
) -> Flow {
    match command {
        HostCommand::OpenCommandMenu => {
            menu.open(events);
            // The popup is shown asynchronously; it closes through a chosen `Action` or the
            // timeout.
            if let Err(err) = controller.open_command_menu() {
                log::warn!("Failed to open command menu: {}", err);
                menu.close(events);
            }
        }
        HostCommand::Action(action) => {
            let quitting = action == MenuAction::Quit;
            match controller.run_action(action) {
                Ok(command) => {
                    log::debug!("Menu action ran: {:?}", command);
                    menu.chosen(events, command);
                }
                Err(err) => {
                    log::warn!("Menu action {:?} failed: {}", action, err);
                    if menu.deadline.is_some() {
                        menu.close(events);
                    }
                }
            }
            if quitting {
                return Flow::Exit;
            }
        }
        HostCommand::ResetWindowPosition { reply } => {
            let _ = reply.send(controller.reset_window_position());
        }
        HostCommand::ToggleForceClickThrough => {
            if let Err(err) = controller.toggle_force_click_through() {
                log::warn!("Failed to toggle force click-through: {}", err);
            }
        }
        HostCommand::QueryState { reply } => {
            let _ = reply.send(controller.state());
        }
        HostCommand::WindowFocused => {
            if let Err(err) = controller.reconcile() {
                log::warn!("Failed to reconcile overlay window: {}", err);
            }
            events.send(HostEvent::WindowFocused);
        }
    }
    Flow::Continue
}

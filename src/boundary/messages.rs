//! Typed messages crossing between the UI layer, the presentation context and the host.
//!
//! Each direction has its own enum; there is no generic payload bus.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::interaction::{HitRect, Point};

const HOST_EVENT_CAPACITY: usize = 64;

/// Commands offered by the host's command menu and tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuAction {
    ToggleAlwaysOnTop,
    ToggleVisibility,
    ResetPosition,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::ToggleAlwaysOnTop,
        MenuAction::ToggleVisibility,
        MenuAction::ResetPosition,
        MenuAction::Quit,
    ];

    /// Stable menu-item id.
    pub fn id(self) -> &'static str {
        match self {
            MenuAction::ToggleAlwaysOnTop => "always_on_top",
            MenuAction::ToggleVisibility => "toggle_visibility",
            MenuAction::ResetPosition => "reset_position",
            MenuAction::Quit => "quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }
}

/// Result of a command-menu choice, as reported back to the presentation side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCommand {
    pub action: MenuAction,
    /// New value for toggles (always-on-top, visible).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
}

/// UI layer → presentation context.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ControlHover { id: String, hovered: bool },
    RegisterControl { id: String, region: Option<HitRect> },
    UnregisterControl { id: String },
    /// A popup drawn by the UI layer itself opened or closed.
    MenuState { open: bool },
    SpriteClicked,
    /// The UI layer asks for capture directly. Released like any other signal once it asks for
    /// `false`.
    CaptureRequest { captured: bool },
    ViewportResized { width: f64, height: f64 },
    SetMotionSpeed(f64),
    ResetMotion,
}

/// Host → presentation context.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Pointer inside the window, in window-relative logical px.
    PointerMoved(Point),
    PointerLeft,
    WindowResized { width: f64, height: f64 },
    WindowFocused,
    MenuOpened,
    MenuClosed,
    MenuCommand(MenuCommand),
}

pub fn host_event_channel() -> (HostEventSender, mpsc::Receiver<HostEvent>) {
    let (tx, rx) = mpsc::channel(HOST_EVENT_CAPACITY);
    (HostEventSender { tx }, rx)
}

/// Non-blocking host → presentation path. Undeliverable events are dropped, never errors.
#[derive(Debug, Clone)]
pub struct HostEventSender {
    tx: mpsc::Sender<HostEvent>,
}

impl HostEventSender {
    pub fn send(&self, event: HostEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                log::debug!("Host event dropped, presentation busy: {:?}", event);
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                log::debug!("Host event dropped, presentation not running: {:?}", event);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

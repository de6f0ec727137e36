//! Everything that crosses between the presentation context and the privileged host.

pub mod capture;
pub mod messages;

pub use capture::{capture_channel, CaptureReceiver, CaptureSender};
pub use messages::{host_event_channel, HostEvent, HostEventSender, MenuAction, MenuCommand, UiEvent};

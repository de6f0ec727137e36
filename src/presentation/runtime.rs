//! The presentation task: one `select!` loop over UI events, host events, the frame clock and the
//! pending release deadline.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use super::scene::{Scene, SpriteFrame};
use crate::boundary::{CaptureSender, HostEvent, MenuCommand, UiEvent};
use crate::error::{OverlayError, OverlayResult};
use crate::interaction::CaptureDecision;

const UI_EVENT_CAPACITY: usize = 128;

/// Where rendered frames and menu results go (the webview on desktop).
pub trait FrameSink {
    fn sprite_frame(&self, frame: &SpriteFrame);
    fn menu_command(&self, command: &MenuCommand);
}

pub fn presentation_channel() -> (PresentationHandle, mpsc::Receiver<UiEvent>) {
    let (tx, rx) = mpsc::channel(UI_EVENT_CAPACITY);
    (PresentationHandle { tx }, rx)
}

#[derive(Debug, Clone)]
pub struct PresentationHandle {
    tx: mpsc::Sender<UiEvent>,
}

impl PresentationHandle {
    pub fn send(&self, event: UiEvent) -> OverlayResult<()> {
        self.tx.try_send(event).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => {
                OverlayError::PresentationUnavailable("event queue full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => {
                OverlayError::PresentationUnavailable("presentation loop not running".to_string())
            }
        })
    }
}

/// Run until every `PresentationHandle` is dropped. On the way out all signals are cleared and the
/// host is left with click-through.
pub async fn run_presentation_loop<S: FrameSink>(
    mut scene: Scene,
    mut ui_events: mpsc::Receiver<UiEvent>,
    mut host_events: mpsc::Receiver<HostEvent>,
    capture: CaptureSender,
    sink: S,
    frame_interval: Duration,
) {
    log::info!(
        "Overlay presentation loop started (frame_interval={}ms)",
        frame_interval.as_millis()
    );

    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();
    let mut host_open = true;

    loop {
        let deadline = scene.next_deadline();
        tokio::select! {
            event = ui_events.recv() => {
                let Some(event) = event else {
                    break;
                };
                let decision = scene.handle_ui_event(event, Instant::now().into_std());
                publish(&capture, decision);
            }
            event = host_events.recv(), if host_open => match event {
                Some(HostEvent::WindowFocused) => capture.republish(),
                Some(event) => {
                    if let HostEvent::MenuCommand(command) = &event {
                        sink.menu_command(command);
                    }
                    let decision = scene.handle_host_event(event, Instant::now().into_std());
                    publish(&capture, decision);
                }
                None => host_open = false,
            },
            _ = frames.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame);
                last_frame = now;
                let decision = scene.tick(dt.as_secs_f64(), now.into_std());
                publish(&capture, decision);
                sink.sprite_frame(&scene.frame());
            }
            _ = release_deadline(deadline) => {
                let decision = scene.poll_release(Instant::now().into_std());
                publish(&capture, decision);
            }
        }
    }

    scene.teardown();
    capture.publish(CaptureDecision::CLICK_THROUGH);
    log::info!("Overlay presentation loop stopped");
}

async fn release_deadline(deadline: Option<std::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

fn publish(capture: &CaptureSender, decision: Option<CaptureDecision>) {
    let Some(decision) = decision else {
        return;
    };
    log::debug!("Capture decision: captured={}", decision.captured);
    capture.publish(decision);
}

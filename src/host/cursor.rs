//! Global cursor polling. The webview sees no pointer events while the window ignores the mouse,
//! so the host reports the pointer position itself.

use crate::boundary::HostEvent;
use crate::interaction::Point;

#[cfg(feature = "desktop")]
use std::time::Duration;

#[cfg(feature = "desktop")]
use tauri::{AppHandle, Manager};

#[cfg(feature = "desktop")]
use super::layout::{window_relative_pointer, WindowRect};
#[cfg(feature = "desktop")]
use super::tauri_window::OVERLAY_WINDOW_LABEL;
#[cfg(feature = "desktop")]
use crate::boundary::HostEventSender;

/// Turns polled positions into pointer events, skipping samples that match the last delivered one.
#[derive(Debug, Default)]
pub struct PointerTracker {
    delivered: Option<Point>,
}

impl PointerTracker {
    /// Report `pointer` through `deliver` unless it was already delivered. A sample whose delivery
    /// failed is offered again on the next poll.
    pub fn update(
        &mut self,
        pointer: Option<Point>,
        deliver: impl FnOnce(HostEvent) -> bool,
    ) -> bool {
        if self.delivered == pointer {
            return false;
        }
        let event = match pointer {
            Some(point) => HostEvent::PointerMoved(point),
            None => HostEvent::PointerLeft,
        };
        if !deliver(event) {
            return false;
        }
        self.delivered = pointer;
        true
    }
}

#[cfg(feature = "desktop")]
pub fn spawn_cursor_poller(app: AppHandle, interval: Duration, events: HostEventSender) {
    tauri::async_runtime::spawn(async move {
        log::info!(
            "Overlay cursor poller started (interval={}ms)",
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut tracker = PointerTracker::default();

        loop {
            ticker.tick().await;
            if events.is_closed() {
                break;
            }

            let Ok(cursor) = app.cursor_position() else {
                continue;
            };
            let Some(window) = app.get_webview_window(OVERLAY_WINDOW_LABEL) else {
                continue;
            };

            let pointer = if window.is_visible().unwrap_or(false) {
                let (Ok(pos), Ok(size)) = (window.inner_position(), window.inner_size()) else {
                    continue;
                };
                let scale = window.scale_factor().unwrap_or(1.0);
                let rect = WindowRect {
                    x: pos.x,
                    y: pos.y,
                    width: size.width,
                    height: size.height,
                };
                window_relative_pointer(cursor.x, cursor.y, rect, scale)
            } else {
                None
            };

            tracker.update(pointer, |event| events.send(event));
        }

        log::info!("Overlay cursor poller stopped");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::host_event_channel;

    fn collect(tracker: &mut PointerTracker, pointer: Option<Point>, sent: &mut Vec<HostEvent>) {
        tracker.update(pointer, |event| {
            sent.push(event);
            true
        });
    }

    #[test]
    fn test_tracker_reports_changes_only() {
        let mut tracker = PointerTracker::default();
        let mut sent = Vec::new();
        let p = Point { x: 3.0, y: 4.0 };

        collect(&mut tracker, None, &mut sent);
        collect(&mut tracker, Some(p), &mut sent);
        collect(&mut tracker, Some(p), &mut sent);
        collect(&mut tracker, None, &mut sent);
        collect(&mut tracker, None, &mut sent);

        assert_eq!(sent, vec![HostEvent::PointerMoved(p), HostEvent::PointerLeft]);
    }

    #[test]
    fn test_dropped_leave_is_resent() {
        let (events, mut rx) = host_event_channel();
        let mut tracker = PointerTracker::default();
        let on_sprite = Point { x: 48.0, y: 170.0 };

        assert!(tracker.update(Some(on_sprite), |event| events.send(event)));
        while events.send(HostEvent::WindowFocused) {}

        // Queue full: the leave is dropped and must not be remembered as delivered.
        assert!(!tracker.update(None, |event| events.send(event)));
        assert!(!tracker.update(None, |event| events.send(event)));

        while rx.try_recv().is_ok() {}
        assert!(tracker.update(None, |event| events.send(event)));
        assert_eq!(rx.try_recv(), Ok(HostEvent::PointerLeft));
        assert!(!tracker.update(None, |event| events.send(event)));
    }
}

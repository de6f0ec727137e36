//! Presentation → host capture channel.
//!
//! Capture is a level, not an event log: the channel only ever holds the latest decision, and
//! several decisions sent before the host looks collapse into the most recent one.

use tokio::sync::watch;

use crate::interaction::CaptureDecision;

pub fn capture_channel() -> (CaptureSender, CaptureReceiver) {
    let (tx, rx) = watch::channel(CaptureDecision::CLICK_THROUGH);
    (CaptureSender { tx }, CaptureReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct CaptureSender {
    tx: watch::Sender<CaptureDecision>,
}

impl CaptureSender {
    /// Fire-and-forget. Only a changed level notifies the host; with no host attached the value is
    /// kept for whoever subscribes next and nothing errors.
    pub fn publish(&self, decision: CaptureDecision) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == decision {
                return false;
            }
            *current = decision;
            true
        });
        if changed && self.tx.receiver_count() == 0 {
            log::debug!(
                "Capture decision not delivered, host not attached (captured={})",
                decision.captured
            );
        }
        changed
    }

    /// Notify the host of the current level again so it can reconcile.
    pub fn republish(&self) {
        self.tx.send_modify(|_| {});
    }

    pub fn current(&self) -> CaptureDecision {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> CaptureReceiver {
        CaptureReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptureReceiver {
    rx: watch::Receiver<CaptureDecision>,
}

impl CaptureReceiver {
    /// Wait for the next level change. `None` once the presentation side is gone.
    pub async fn changed(&mut self) -> Option<CaptureDecision> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// The current level, marking it seen.
    pub fn latest(&mut self) -> CaptureDecision {
        *self.rx.borrow_and_update()
    }
}

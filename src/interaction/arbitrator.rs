//! The single merge point for capture signals.
//!
//! `captured` is the OR of every current signal. Turning on is immediate; turning off waits until
//! all signals have stayed inactive for the release window, so crossing the seam between two
//! adjacent interactive regions never produces an off/on flicker.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::signals::{CaptureSignal, SignalSource};

pub const DEFAULT_RELEASE_DEBOUNCE: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureDecision {
    pub captured: bool,
}

impl CaptureDecision {
    pub const CAPTURED: Self = Self { captured: true };
    pub const CLICK_THROUGH: Self = Self { captured: false };

    pub fn new(captured: bool) -> Self {
        Self { captured }
    }
}

#[derive(Debug)]
pub struct Arbitrator {
    signals: HashMap<SignalSource, bool>,
    /// Last decision handed out. Starts click-through.
    emitted: bool,
    release_at: Option<Instant>,
    release_debounce: Duration,
}

impl Default for Arbitrator {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASE_DEBOUNCE)
    }
}

impl Arbitrator {
    pub fn new(release_debounce: Duration) -> Self {
        Self {
            signals: HashMap::new(),
            emitted: false,
            release_at: None,
            release_debounce,
        }
    }

    /// Record a signal's latest value and re-evaluate. Returns a decision only on a transition.
    pub fn update(&mut self, signal: CaptureSignal, now: Instant) -> Option<CaptureDecision> {
        self.signals.insert(signal.source, signal.active);
        self.evaluate(now)
    }

    /// Forget a source entirely (its element is gone).
    pub fn remove(&mut self, source: &SignalSource, now: Instant) -> Option<CaptureDecision> {
        self.signals.remove(source);
        self.evaluate(now)
    }

    /// Fire the pending release if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<CaptureDecision> {
        let deadline = self.release_at?;
        if now < deadline {
            return None;
        }
        self.release_at = None;
        if self.wants_capture() || !self.emitted {
            return None;
        }
        self.emitted = false;
        Some(CaptureDecision::CLICK_THROUGH)
    }

    /// When the pending release (if any) is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.release_at
    }

    /// The last emitted decision.
    pub fn decision(&self) -> CaptureDecision {
        CaptureDecision::new(self.emitted)
    }

    /// OR of all current signals, ignoring the release window.
    pub fn wants_capture(&self) -> bool {
        self.signals.values().any(|active| *active)
    }

    /// Any hover source (sprite or control) currently active.
    pub fn is_hovering(&self) -> bool {
        self.signals
            .iter()
            .any(|(source, active)| *active && source.is_hover())
    }

    pub fn menu_open(&self) -> bool {
        self.signals
            .get(&SignalSource::MenuOpen)
            .copied()
            .unwrap_or(false)
    }

    /// Drop every signal and the pending release. Returns the click-through decision if the
    /// overlay was captured, so the owner can fall back to the safe default.
    pub fn teardown(&mut self) -> Option<CaptureDecision> {
        self.signals.clear();
        self.release_at = None;
        if std::mem::replace(&mut self.emitted, false) {
            Some(CaptureDecision::CLICK_THROUGH)
        } else {
            None
        }
    }

    fn evaluate(&mut self, now: Instant) -> Option<CaptureDecision> {
        if self.wants_capture() {
            self.release_at = None;
            if self.emitted {
                return None;
            }
            self.emitted = true;
            return Some(CaptureDecision::CAPTURED);
        }

        if !self.emitted {
            self.release_at = None;
            return None;
        }
        if self.release_debounce.is_zero() {
            self.emitted = false;
            return Some(CaptureDecision::CLICK_THROUGH);
        }
        // Quiet period starts at the first moment nothing was active; later redundant
        // "inactive" reports must not push it back.
        if self.release_at.is_none() {
            self.release_at = Some(now + self.release_debounce);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(base: Instant, offset: u64) -> Instant {
        base + Duration::from_millis(offset)
    }

    fn control(id: &str, active: bool) -> CaptureSignal {
        CaptureSignal::new(SignalSource::ControlHover(id.to_string()), active)
    }

    fn sprite(active: bool) -> CaptureSignal {
        CaptureSignal::new(SignalSource::SpriteHover, active)
    }

    fn menu(active: bool) -> CaptureSignal {
        CaptureSignal::new(SignalSource::MenuOpen, active)
    }

    #[test]
    fn test_capture_is_immediate() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        assert_eq!(arb.update(sprite(false), t0), None);
        assert_eq!(arb.update(sprite(true), t0), Some(CaptureDecision::CAPTURED));
        assert!(arb.decision().captured);
        assert_eq!(arb.next_deadline(), None);
    }

    #[test]
    fn test_release_waits_for_debounce() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        arb.update(control("a", true), t0);

        assert_eq!(arb.update(control("a", false), ms(t0, 50)), None);
        assert_eq!(arb.next_deadline(), Some(ms(t0, 170)));
        assert_eq!(arb.poll(ms(t0, 100)), None);
        assert_eq!(arb.poll(ms(t0, 169)), None);
        assert!(arb.decision().captured);

        assert_eq!(arb.poll(ms(t0, 170)), Some(CaptureDecision::CLICK_THROUGH));
        assert_eq!(arb.next_deadline(), None);
        assert_eq!(arb.poll(ms(t0, 500)), None);
    }

    #[test]
    fn test_reactivation_cancels_release() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        arb.update(control("a", true), t0);
        arb.update(control("a", false), ms(t0, 10));
        assert_eq!(arb.update(control("b", true), ms(t0, 60)), None);
        assert_eq!(arb.next_deadline(), None);

        // The cancelled deadline never produces a stale release.
        assert_eq!(arb.poll(ms(t0, 1_000)), None);
        assert!(arb.decision().captured);
    }

    #[test]
    fn test_seam_crossing_never_releases() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        let mut emitted = Vec::new();

        emitted.extend(arb.update(control("a", true), t0));
        // Leave A then enter B a few ms later, back and forth.
        for step in 0..10u64 {
            let t = ms(t0, step * 30);
            emitted.extend(arb.update(control("a", false), t));
            emitted.extend(arb.poll(t + Duration::from_millis(5)));
            emitted.extend(arb.update(control("b", true), t + Duration::from_millis(5)));
            emitted.extend(arb.update(control("b", false), t + Duration::from_millis(20)));
            emitted.extend(arb.update(control("a", true), t + Duration::from_millis(25)));
        }
        assert_eq!(emitted, vec![CaptureDecision::CAPTURED]);
    }

    #[test]
    fn test_redundant_inactive_does_not_extend_window() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        arb.update(sprite(true), t0);
        arb.update(sprite(false), t0);
        arb.update(control("a", false), ms(t0, 100));
        assert_eq!(arb.poll(ms(t0, 120)), Some(CaptureDecision::CLICK_THROUGH));
    }

    #[test]
    fn test_menu_holds_capture_through_hover_changes() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        arb.update(control("menu-button", true), t0);
        assert_eq!(arb.update(menu(true), ms(t0, 5)), None);
        assert!(arb.menu_open());

        arb.update(control("menu-button", false), ms(t0, 10));
        arb.update(sprite(true), ms(t0, 20));
        arb.update(sprite(false), ms(t0, 30));
        assert_eq!(arb.next_deadline(), None);
        assert_eq!(arb.poll(ms(t0, 5_000)), None);
        assert!(arb.decision().captured);

        assert_eq!(arb.update(menu(false), ms(t0, 5_000)), None);
        assert_eq!(arb.poll(ms(t0, 5_120)), Some(CaptureDecision::CLICK_THROUGH));
    }

    #[test]
    fn test_menu_open_captures_synchronously() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        assert_eq!(arb.update(menu(true), t0), Some(CaptureDecision::CAPTURED));
        assert!(!arb.is_hovering());
    }

    #[test]
    fn test_zero_debounce_releases_immediately() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::new(Duration::ZERO);
        arb.update(sprite(true), t0);
        assert_eq!(
            arb.update(sprite(false), t0),
            Some(CaptureDecision::CLICK_THROUGH)
        );
    }

    #[test]
    fn test_remove_recomputes_from_full_map() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        arb.update(control("a", true), t0);
        arb.update(control("b", true), t0);
        assert_eq!(
            arb.remove(&SignalSource::ControlHover("a".into()), ms(t0, 10)),
            None
        );
        assert_eq!(arb.next_deadline(), None);
        arb.remove(&SignalSource::ControlHover("b".into()), ms(t0, 20));
        assert_eq!(arb.next_deadline(), Some(ms(t0, 140)));
    }

    #[test]
    fn test_teardown_cancels_pending_release() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        arb.update(sprite(true), t0);
        arb.update(sprite(false), ms(t0, 10));
        assert_eq!(arb.teardown(), Some(CaptureDecision::CLICK_THROUGH));
        assert_eq!(arb.next_deadline(), None);
        assert_eq!(arb.poll(ms(t0, 1_000)), None);
        assert_eq!(arb.teardown(), None);
    }

    #[test]
    fn test_hovering_tracks_hover_sources_only() {
        let t0 = Instant::now();
        let mut arb = Arbitrator::default();
        arb.update(menu(true), t0);
        assert!(!arb.is_hovering());
        arb.update(control("x", true), t0);
        assert!(arb.is_hovering());
    }
}

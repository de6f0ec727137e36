//! Presentation-side state: the walking sprite, every capture signal source and the arbitrator
//! that merges them.
//!
//! Everything here is synchronous and takes `now` explicitly; the runtime task owns the clock.

use std::time::Instant;

use serde::Serialize;

use super::assets::{SpriteAssets, SpritePose};
use crate::boundary::{HostEvent, UiEvent};
use crate::config::OverlayConfig;
use crate::interaction::{
    Arbitrator, CaptureDecision, CaptureSignal, ControlRegistry, MenuSignal, Point, SignalSource,
    SpriteHoverSource,
};
use crate::motion::{Direction, MotionEngine, MotionMode, MotionState, StageBounds};

/// One rendered sprite frame. `x`/`y` is the bottom-centre anchor in viewport px.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    pub rotation: f64,
    pub facing: Direction,
    pub mode: MotionMode,
    pub pose: SpritePose,
}

pub struct Scene {
    engine: MotionEngine,
    bounds: StageBounds,
    viewport: (f64, f64),
    sprite: SpriteHoverSource,
    controls: ControlRegistry,
    menu: MenuSignal,
    /// Native command menu popped by the host.
    host_menu_open: bool,
    /// Popup drawn by the UI layer.
    ui_menu_open: bool,
    pointer: Option<Point>,
    arbitrator: Arbitrator,
    assets: SpriteAssets,
}

impl Scene {
    pub fn new(
        config: &OverlayConfig,
        assets: SpriteAssets,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Self {
        let (base_width, base_height) = assets.base_size();
        let bounds = StageBounds::from_viewport(viewport_width, viewport_height, base_width);
        Self {
            engine: MotionEngine::new(bounds, config.walk_speed),
            bounds,
            viewport: (viewport_width, viewport_height),
            sprite: SpriteHoverSource::new(base_width, base_height, config.hover_scale),
            controls: ControlRegistry::new(),
            menu: MenuSignal::default(),
            host_menu_open: false,
            ui_menu_open: false,
            pointer: None,
            arbitrator: Arbitrator::new(config.release_debounce),
            assets,
        }
    }

    pub fn decision(&self) -> CaptureDecision {
        self.arbitrator.decision()
    }

    pub fn motion(&self) -> MotionState {
        self.engine.state()
    }

    pub fn bounds(&self) -> StageBounds {
        self.bounds
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.arbitrator.next_deadline()
    }

    /// Returns the new capture level when it changed.
    pub fn handle_ui_event(&mut self, event: UiEvent, now: Instant) -> Option<CaptureDecision> {
        match event {
            UiEvent::ControlHover { id, hovered } => {
                let signal = self.controls.set_native_hover(&id, hovered);
                self.feed(signal, now)
            }
            UiEvent::RegisterControl { id, region } => {
                self.controls.register(&id, region);
                let signals = self.controls.update_pointer(self.pointer);
                self.feed(signals, now)
            }
            UiEvent::UnregisterControl { id } => {
                self.controls.unregister(&id);
                let decision = self
                    .arbitrator
                    .remove(&SignalSource::ControlHover(id), now);
                self.sync_held();
                decision
            }
            UiEvent::MenuState { open } => {
                self.ui_menu_open = open;
                self.sync_menu(now)
            }
            UiEvent::SpriteClicked => {
                self.engine.trigger_transient();
                None
            }
            UiEvent::CaptureRequest { captured } => {
                self.feed(Some(CaptureSignal::new(SignalSource::UiRequest, captured)), now)
            }
            UiEvent::ViewportResized { width, height } => self.resize(width, height, now),
            UiEvent::SetMotionSpeed(speed) => {
                if !self.engine.set_speed(speed) {
                    log::warn!("Ignoring invalid motion speed: {}", speed);
                }
                None
            }
            UiEvent::ResetMotion => {
                self.engine.reset(self.bounds);
                self.rehit(now)
            }
        }
    }

    pub fn handle_host_event(&mut self, event: HostEvent, now: Instant) -> Option<CaptureDecision> {
        match event {
            HostEvent::PointerMoved(point) => {
                self.pointer = Some(point);
                self.rehit(now)
            }
            HostEvent::PointerLeft => {
                self.pointer = None;
                self.rehit(now)
            }
            HostEvent::WindowResized { width, height } => self.resize(width, height, now),
            HostEvent::WindowFocused => None,
            HostEvent::MenuOpened => {
                self.host_menu_open = true;
                self.sync_menu(now)
            }
            // A chosen command closes the menu as well.
            HostEvent::MenuClosed | HostEvent::MenuCommand(_) => {
                self.host_menu_open = false;
                self.sync_menu(now)
            }
        }
    }

    /// Advance one frame: fire a due release, move the sprite, then re-test hover against the
    /// sprite's new position.
    pub fn tick(&mut self, dt_secs: f64, now: Instant) -> Option<CaptureDecision> {
        let released = self.arbitrator.poll(now);
        self.engine.tick(dt_secs, self.bounds);
        let state = self.engine.state();
        let signal = self
            .sprite
            .update(self.pointer, state.x, self.bounds.bottom_y);
        self.feed(signal, now).or(released)
    }

    pub fn poll_release(&mut self, now: Instant) -> Option<CaptureDecision> {
        let decision = self.arbitrator.poll(now);
        self.sync_held();
        decision
    }

    /// Force-clear every source and drop the pending release. Returns click-through if the overlay
    /// was captured.
    pub fn teardown(&mut self) -> Option<CaptureDecision> {
        self.sprite.teardown();
        self.controls.teardown();
        self.menu.teardown();
        self.host_menu_open = false;
        self.ui_menu_open = false;
        self.pointer = None;
        let decision = self.arbitrator.teardown();
        self.sync_held();
        decision
    }

    pub fn frame(&self) -> SpriteFrame {
        let state = self.engine.state();
        let rect = self.sprite.display_rect(state.x, self.bounds.bottom_y);
        let pose = match state.mode {
            MotionMode::Patrol => &self.assets.walk,
            MotionMode::Frozen | MotionMode::Transient => &self.assets.idle,
        };
        SpriteFrame {
            x: state.x,
            y: self.bounds.bottom_y,
            width: rect.width(),
            height: rect.height(),
            scale: self.sprite.scale(),
            rotation: self.engine.rotation(),
            facing: self.engine.facing(),
            mode: state.mode,
            pose: pose.clone(),
        }
    }

    fn resize(&mut self, width: f64, height: f64, now: Instant) -> Option<CaptureDecision> {
        if self.viewport == (width, height) {
            return None;
        }
        self.viewport = (width, height);
        let (base_width, _) = self.assets.base_size();
        self.bounds = StageBounds::from_viewport(width, height, base_width);
        self.engine.resize(self.bounds);
        self.rehit(now)
    }

    fn sync_menu(&mut self, now: Instant) -> Option<CaptureDecision> {
        let signal = self.menu.set_open(self.host_menu_open || self.ui_menu_open);
        self.feed(signal, now)
    }

    /// Re-test every pointer-driven source.
    fn rehit(&mut self, now: Instant) -> Option<CaptureDecision> {
        let state = self.engine.state();
        let mut signals = self.controls.update_pointer(self.pointer);
        signals.extend(
            self.sprite
                .update(self.pointer, state.x, self.bounds.bottom_y),
        );
        self.feed(signals, now)
    }

    /// Hand signals to the arbitrator; the last transition is the current level.
    fn feed(
        &mut self,
        signals: impl IntoIterator<Item = CaptureSignal>,
        now: Instant,
    ) -> Option<CaptureDecision> {
        let mut decision = None;
        for signal in signals {
            if let Some(next) = self.arbitrator.update(signal, now) {
                decision = Some(next);
            }
        }
        self.sync_held();
        decision
    }

    fn sync_held(&mut self) {
        let held = self.arbitrator.is_hovering() || self.arbitrator.menu_open();
        self.engine.set_held(held);
    }
}

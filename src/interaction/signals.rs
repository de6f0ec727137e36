//! Independent "wants capture" producers.
//!
//! Every source reports transitions only (`active` flipped) and force-clears itself on teardown so a
//! destroyed element can never leave the arbitrator stuck in captured mode.

use smallvec::SmallVec;

use super::region::{HitRect, Point};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignalSource {
    SpriteHover,
    /// Pointer over an interactive UI element, keyed by the element's marker id.
    ControlHover(String),
    MenuOpen,
    /// Explicit capture request from the UI layer. Not a hover, so it does not freeze the sprite.
    UiRequest,
}

impl SignalSource {
    pub fn is_hover(&self) -> bool {
        matches!(self, SignalSource::SpriteHover | SignalSource::ControlHover(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSignal {
    pub source: SignalSource,
    pub active: bool,
}

impl CaptureSignal {
    pub fn new(source: SignalSource, active: bool) -> Self {
        Self { source, active }
    }
}

pub type SignalBatch = SmallVec<[CaptureSignal; 4]>;

/// Pixel-rect hover test against the sprite's current display rectangle.
#[derive(Debug, Clone)]
pub struct SpriteHoverSource {
    active: bool,
    base_width: f64,
    base_height: f64,
    hover_scale: f64,
}

impl SpriteHoverSource {
    pub fn new(base_width: f64, base_height: f64, hover_scale: f64) -> Self {
        Self {
            active: false,
            base_width: base_width.max(1.0),
            base_height: base_height.max(1.0),
            hover_scale: if hover_scale.is_finite() {
                hover_scale.max(1.0)
            } else {
                1.0
            },
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Display scale: enlarged while hovered.
    pub fn scale(&self) -> f64 {
        if self.active { self.hover_scale } else { 1.0 }
    }

    /// The sprite's on-screen rect for an anchor at `(x, bottom_y)`.
    pub fn display_rect(&self, x: f64, bottom_y: f64) -> HitRect {
        let scale = self.scale();
        HitRect::bottom_centered(
            x,
            bottom_y,
            self.base_width * scale,
            self.base_height * scale,
        )
    }

    /// Re-test the pointer against the current rect. The enlarged rect is used while hovered, so
    /// the pointer has to leave the bigger footprint before the signal drops.
    pub fn update(&mut self, pointer: Option<Point>, x: f64, bottom_y: f64) -> Option<CaptureSignal> {
        let rect = self.display_rect(x, bottom_y);
        let hit = pointer.is_some_and(|p| rect.contains_point(p));
        self.transition(hit)
    }

    pub fn teardown(&mut self) -> Option<CaptureSignal> {
        self.transition(false)
    }

    fn transition(&mut self, active: bool) -> Option<CaptureSignal> {
        if self.active == active {
            return None;
        }
        self.active = active;
        Some(CaptureSignal::new(SignalSource::SpriteHover, active))
    }
}

#[derive(Debug, Clone)]
struct ControlEntry {
    id: String,
    region: Option<HitRect>,
    /// Enter/leave reported by the UI layer itself.
    native_hover: bool,
    /// Host-reported pointer inside `region`.
    pointer_hover: bool,
}

impl ControlEntry {
    fn active(&self) -> bool {
        self.native_hover || self.pointer_hover
    }
}

/// Interactive UI elements discovered by marker attribute. Elements register themselves; nothing
/// here is hardcoded per control.
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    controls: SmallVec<[ControlEntry; 8]>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.find(id).is_some_and(|c| self.controls[c].active())
    }

    /// Register (or move) an element's hit region. Hover is re-evaluated on the next pointer update.
    pub fn register(&mut self, id: &str, region: Option<HitRect>) {
        let region = region.and_then(HitRect::sanitize);
        match self.find(id) {
            Some(idx) => self.controls[idx].region = region,
            None => self.controls.push(ControlEntry {
                id: id.to_string(),
                region,
                native_hover: false,
                pointer_hover: false,
            }),
        }
    }

    /// Remove an element. Its signal is force-cleared if it was active.
    pub fn unregister(&mut self, id: &str) -> Option<CaptureSignal> {
        let idx = self.find(id)?;
        let entry = self.controls.remove(idx);
        entry
            .active()
            .then(|| CaptureSignal::new(SignalSource::ControlHover(entry.id), false))
    }

    /// Native enter/leave from the UI layer. Unknown ids are registered on the fly when entered; a
    /// leave for an unknown id is ignored.
    pub fn set_native_hover(&mut self, id: &str, hovered: bool) -> Option<CaptureSignal> {
        let idx = match self.find(id) {
            Some(idx) => idx,
            None if !hovered => return None,
            None => {
                self.register(id, None);
                self.controls.len() - 1
            }
        };
        let entry = &mut self.controls[idx];
        let was = entry.active();
        entry.native_hover = hovered;
        Self::transition(entry, was)
    }

    pub fn update_pointer(&mut self, pointer: Option<Point>) -> SignalBatch {
        let mut out = SignalBatch::new();
        for entry in self.controls.iter_mut() {
            let was = entry.active();
            entry.pointer_hover = match (entry.region, pointer) {
                (Some(region), Some(p)) => region.contains_point(p),
                _ => false,
            };
            if let Some(signal) = Self::transition(entry, was) {
                out.push(signal);
            }
        }
        out
    }

    pub fn teardown(&mut self) -> SignalBatch {
        self.controls
            .drain(..)
            .filter(|entry| entry.active())
            .map(|entry| CaptureSignal::new(SignalSource::ControlHover(entry.id), false))
            .collect()
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.controls.iter().position(|c| c.id == id)
    }

    fn transition(entry: &ControlEntry, was: bool) -> Option<CaptureSignal> {
        let now = entry.active();
        (now != was).then(|| CaptureSignal::new(SignalSource::ControlHover(entry.id.clone()), now))
    }
}

/// Active between a menu/popup opening and closing.
#[derive(Debug, Clone, Default)]
pub struct MenuSignal {
    open: bool,
}

impl MenuSignal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) -> Option<CaptureSignal> {
        if self.open == open {
            return None;
        }
        self.open = open;
        Some(CaptureSignal::new(SignalSource::MenuOpen, open))
    }

    pub fn teardown(&mut self) -> Option<CaptureSignal> {
        self.set_open(false)
    }
}

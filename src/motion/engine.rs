use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::bounds::StageBounds;

/// Length of the click reaction.
pub const TRANSIENT_DURATION_SECS: f64 = 0.6;
/// Peak rotation of the click reaction (radians), decays linearly to zero.
pub const TRANSIENT_AMPLITUDE_RAD: f64 = 0.26;
/// Full wobbles performed during one click reaction.
pub const TRANSIENT_OSCILLATIONS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    Patrol,
    Frozen,
    Transient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionState {
    pub x: f64,
    pub direction: Direction,
    pub speed: f64,
    pub mode: MotionMode,
}

/// Per-frame sprite motion. Pure: driven only by elapsed time and the current stage bounds.
#[derive(Debug, Clone)]
pub struct MotionEngine {
    state: MotionState,
    /// Seconds elapsed in the running click reaction.
    transient_elapsed: Option<f64>,
    rotation: f64,
    held: bool,
}

impl MotionEngine {
    pub fn new(bounds: StageBounds, speed: f64) -> Self {
        Self {
            state: MotionState {
                x: bounds.left,
                direction: Direction::Right,
                speed: sanitize_speed(speed).unwrap_or(0.0),
                mode: MotionMode::Patrol,
            },
            transient_elapsed: None,
            rotation: 0.0,
            held: false,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Current wobble angle (radians). Zero outside a click reaction.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn facing(&self) -> Direction {
        self.state.direction
    }

    /// Freeze (true) or resume (false) patrol. A running click reaction is left alone and resolves
    /// to the latest value when it ends.
    pub fn set_held(&mut self, held: bool) {
        self.held = held;
        if self.transient_elapsed.is_none() {
            self.state.mode = self.resting_mode();
        }
    }

    /// Start the click reaction, restarting it if one is already running.
    pub fn trigger_transient(&mut self) {
        self.transient_elapsed = Some(0.0);
        self.rotation = 0.0;
        self.state.mode = MotionMode::Transient;
    }

    /// Returns `false` (and keeps the old speed) for negative or non-finite input.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        match sanitize_speed(speed) {
            Some(speed) => {
                self.state.speed = speed;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self, bounds: StageBounds) {
        self.state.x = bounds.left;
        self.state.direction = Direction::Right;
        self.transient_elapsed = None;
        self.rotation = 0.0;
        self.state.mode = self.resting_mode();
    }

    /// Clamp into new bounds. Repeating the same bounds is a no-op.
    pub fn resize(&mut self, bounds: StageBounds) {
        self.state.x = bounds.clamp(self.state.x);
    }

    pub fn tick(&mut self, dt_secs: f64, bounds: StageBounds) {
        let dt = if dt_secs.is_finite() { dt_secs.max(0.0) } else { 0.0 };
        self.state.x = bounds.clamp(self.state.x);

        if let Some(elapsed) = self.transient_elapsed {
            let elapsed = elapsed + dt;
            if elapsed >= TRANSIENT_DURATION_SECS {
                self.transient_elapsed = None;
                self.rotation = 0.0;
                self.state.mode = self.resting_mode();
            } else {
                self.transient_elapsed = Some(elapsed);
                self.rotation = transient_rotation(elapsed);
            }
            return;
        }

        if self.state.mode != MotionMode::Patrol {
            return;
        }
        self.advance(dt * self.state.speed, bounds);
    }

    /// Move `distance` along the current direction, reflecting off both walls.
    fn advance(&mut self, distance: f64, bounds: StageBounds) {
        let width = bounds.width();
        if width <= 0.0 {
            self.state.x = bounds.left;
            return;
        }

        // Unfold the bounce into a straight line of period 2*width: phase in [0, width) walks
        // right, phase in [width, 2*width) walks back left.
        let period = 2.0 * width;
        let offset = self.state.x - bounds.left;
        let phase = match self.state.direction {
            Direction::Right => offset,
            Direction::Left => period - offset,
        };
        let phase = (phase + distance).rem_euclid(period);

        if phase < width {
            self.state.x = bounds.left + phase;
            self.state.direction = Direction::Right;
        } else {
            self.state.x = bounds.left + (period - phase);
            self.state.direction = Direction::Left;
        }
        self.state.x = bounds.clamp(self.state.x);
    }

    fn resting_mode(&self) -> MotionMode {
        if self.held {
            MotionMode::Frozen
        } else {
            MotionMode::Patrol
        }
    }
}

fn transient_rotation(elapsed: f64) -> f64 {
    let progress = (elapsed / TRANSIENT_DURATION_SECS).clamp(0.0, 1.0);
    TRANSIENT_AMPLITUDE_RAD * (1.0 - progress) * (TAU * TRANSIENT_OSCILLATIONS * progress).sin()
}

fn sanitize_speed(speed: f64) -> Option<f64> {
    (speed.is_finite() && speed >= 0.0).then_some(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn bounds(left: f64, right: f64) -> StageBounds {
        StageBounds {
            left,
            right,
            bottom_y: 100.0,
        }
    }

    /// Reflected straight-line position for a walk starting at `left` heading right.
    fn triangle_wave(left: f64, right: f64, distance: f64) -> f64 {
        let width = right - left;
        let phase = distance.rem_euclid(2.0 * width);
        if phase <= width {
            left + phase
        } else {
            left + 2.0 * width - phase
        }
    }

    #[test]
    fn test_patrol_follows_triangle_wave() {
        let b = bounds(10.0, 110.0);
        let speed = 37.0;
        let dt = 0.016;
        let mut engine = MotionEngine::new(b, speed);

        for n in 1..=2_000 {
            engine.tick(dt, b);
            let expected = triangle_wave(b.left, b.right, speed * dt * n as f64);
            let x = engine.state().x;
            assert!((x - expected).abs() < EPS, "tick {n}: x={x} expected={expected}");
            assert!(b.contains(x));
        }
    }

    #[test]
    fn test_large_tick_reflects_off_both_walls() {
        let b = bounds(0.0, 100.0);
        let mut engine = MotionEngine::new(b, 100.0);

        // 2.5 widths: right wall, back to left wall, then half way out again.
        engine.tick(2.5, b);
        let state = engine.state();
        assert!((state.x - 50.0).abs() < EPS);
        assert_eq!(state.direction, Direction::Right);

        engine.tick(1.0, b);
        let state = engine.state();
        assert!((state.x - 50.0).abs() < EPS);
        assert_eq!(state.direction, Direction::Left);
    }

    #[test]
    fn test_reaching_right_wall_flips_direction() {
        let b = bounds(0.0, 100.0);
        let mut engine = MotionEngine::new(b, 100.0);
        engine.tick(1.0, b);
        assert_eq!(engine.state().x, 100.0);
        assert_eq!(engine.facing(), Direction::Left);
    }

    #[test]
    fn test_frozen_does_not_move() {
        let b = bounds(0.0, 100.0);
        let mut engine = MotionEngine::new(b, 50.0);
        engine.tick(0.5, b);
        engine.set_held(true);
        assert_eq!(engine.state().mode, MotionMode::Frozen);

        let before = engine.state().x;
        for _ in 0..100 {
            engine.tick(0.016, b);
        }
        assert_eq!(engine.state().x, before);

        engine.set_held(false);
        engine.tick(0.1, b);
        assert!(engine.state().x > before);
    }

    #[test]
    fn test_resize_clamps_immediately() {
        let b = bounds(0.0, 500.0);
        let mut engine = MotionEngine::new(b, 100.0);
        engine.tick(4.0, b);
        assert_eq!(engine.state().x, 400.0);

        let shrunk = bounds(0.0, 300.0);
        engine.resize(shrunk);
        assert_eq!(engine.state().x, 300.0);

        // Burst of identical notifications does not drift.
        for _ in 0..10 {
            engine.resize(shrunk);
        }
        assert_eq!(engine.state().x, 300.0);
    }

    #[test]
    fn test_click_runs_transient_then_returns_to_patrol() {
        let b = bounds(0.0, 100.0);
        let mut engine = MotionEngine::new(b, 10.0);
        engine.trigger_transient();
        assert_eq!(engine.state().mode, MotionMode::Transient);

        let x = engine.state().x;
        // A quarter of the first wobble: rotation at its peak for this progress.
        engine.tick(0.05, b);
        assert_eq!(engine.state().mode, MotionMode::Transient);
        assert_eq!(engine.state().x, x);
        assert!(engine.rotation() > 0.1);

        engine.tick(TRANSIENT_DURATION_SECS, b);
        assert_eq!(engine.state().mode, MotionMode::Patrol);
        assert_eq!(engine.rotation(), 0.0);
    }

    #[test]
    fn test_second_click_restarts_transient() {
        let b = bounds(0.0, 100.0);
        let mut engine = MotionEngine::new(b, 10.0);
        engine.trigger_transient();
        engine.tick(0.4, b);

        engine.trigger_transient();
        engine.tick(0.4, b);
        // 0.8s since the first click, but only 0.4s since the restart.
        assert_eq!(engine.state().mode, MotionMode::Transient);

        engine.tick(0.25, b);
        assert_eq!(engine.state().mode, MotionMode::Patrol);
    }

    #[test]
    fn test_transient_resolves_to_frozen_when_held() {
        let b = bounds(0.0, 100.0);
        let mut engine = MotionEngine::new(b, 10.0);
        engine.trigger_transient();
        engine.set_held(true);
        assert_eq!(engine.state().mode, MotionMode::Transient);

        engine.tick(TRANSIENT_DURATION_SECS, b);
        assert_eq!(engine.state().mode, MotionMode::Frozen);
    }

    #[test]
    fn test_set_speed_rejects_invalid() {
        let b = bounds(0.0, 100.0);
        let mut engine = MotionEngine::new(b, 10.0);
        assert!(!engine.set_speed(f64::NAN));
        assert!(!engine.set_speed(-1.0));
        assert_eq!(engine.state().speed, 10.0);
        assert!(engine.set_speed(25.0));
        assert_eq!(engine.state().speed, 25.0);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let b = bounds(5.0, 100.0);
        let mut engine = MotionEngine::new(b, 100.0);
        engine.tick(1.5, b);
        engine.trigger_transient();
        engine.reset(b);
        let state = engine.state();
        assert_eq!(state.x, 5.0);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.mode, MotionMode::Patrol);
    }
}

//! Runtime configuration for the overlay.
//!
//! Values come from `.env`/environment. Out-of-range numbers are clamped and unparsable ones fall
//! back to defaults, so a bad setting never prevents the overlay from starting.

use std::path::PathBuf;
use std::time::Duration;

use crate::interaction::arbitrator::DEFAULT_RELEASE_DEBOUNCE;

pub const DEFAULT_WALK_SPEED: f64 = 60.0;
pub const DEFAULT_HOVER_SCALE: f64 = 1.1;
pub const DEFAULT_STRIP_HEIGHT: f64 = 240.0;
const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
const DEFAULT_CURSOR_POLL_MS: u64 = 33;
const DEFAULT_ASSET_DIR: &str = "assets";

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// How long every capture signal must stay inactive before capture is released.
    pub release_debounce: Duration,
    /// Sprite patrol speed in logical px per second.
    pub walk_speed: f64,
    pub frame_interval: Duration,
    pub cursor_poll_interval: Duration,
    /// Sprite enlargement while hovered; also widens the hover hit rect.
    pub hover_scale: f64,
    /// Height of the bottom-anchored overlay window (logical px).
    pub strip_height: f64,
    pub asset_dir: PathBuf,
    pub log_level: log::LevelFilter,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            release_debounce: DEFAULT_RELEASE_DEBOUNCE,
            walk_speed: DEFAULT_WALK_SPEED,
            frame_interval: Duration::from_millis(DEFAULT_FRAME_INTERVAL_MS),
            cursor_poll_interval: Duration::from_millis(DEFAULT_CURSOR_POLL_MS),
            hover_scale: DEFAULT_HOVER_SCALE,
            strip_height: DEFAULT_STRIP_HEIGHT,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            log_level: log::LevelFilter::Info,
        }
    }
}

impl OverlayConfig {
    /// Load configuration from `.env`/environment.
    ///
    /// Reads:
    /// - `OVERLAY_RELEASE_DEBOUNCE_MS`
    /// - `OVERLAY_WALK_SPEED`
    /// - `OVERLAY_FRAME_INTERVAL_MS`
    /// - `OVERLAY_CURSOR_POLL_MS`
    /// - `OVERLAY_HOVER_SCALE`
    /// - `OVERLAY_STRIP_HEIGHT`
    /// - `OVERLAY_ASSET_DIR`
    /// - `OVERLAY_LOG_LEVEL` (`error`..`trace`, `off`)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let u64_var = |key: &str, default: u64, min: u64, max: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
                .clamp(min, max)
        };
        let f64_var = |key: &str, default: f64, min: f64, max: f64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
                .clamp(min, max)
        };

        let debounce_default = DEFAULT_RELEASE_DEBOUNCE.as_millis() as u64;

        Self {
            release_debounce: Duration::from_millis(u64_var(
                "OVERLAY_RELEASE_DEBOUNCE_MS",
                debounce_default,
                0,
                2_000,
            )),
            walk_speed: f64_var("OVERLAY_WALK_SPEED", DEFAULT_WALK_SPEED, 0.0, 2_000.0),
            frame_interval: Duration::from_millis(u64_var(
                "OVERLAY_FRAME_INTERVAL_MS",
                DEFAULT_FRAME_INTERVAL_MS,
                4,
                100,
            )),
            cursor_poll_interval: Duration::from_millis(u64_var(
                "OVERLAY_CURSOR_POLL_MS",
                DEFAULT_CURSOR_POLL_MS,
                8,
                500,
            )),
            hover_scale: f64_var("OVERLAY_HOVER_SCALE", DEFAULT_HOVER_SCALE, 1.0, 2.0),
            strip_height: f64_var("OVERLAY_STRIP_HEIGHT", DEFAULT_STRIP_HEIGHT, 64.0, 4_000.0),
            asset_dir: lookup("OVERLAY_ASSET_DIR")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR)),
            log_level: lookup("OVERLAY_LOG_LEVEL")
                .and_then(|v| v.trim().parse::<log::LevelFilter>().ok())
                .unwrap_or(log::LevelFilter::Info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = OverlayConfig::from_lookup(|_| None);
        assert_eq!(config, OverlayConfig::default());
        assert_eq!(config.release_debounce, Duration::from_millis(120));
    }

    #[test]
    fn test_values_are_parsed_and_clamped() {
        let config = OverlayConfig::from_lookup(lookup_from(&[
            ("OVERLAY_RELEASE_DEBOUNCE_MS", " 200 "),
            ("OVERLAY_WALK_SPEED", "99999"),
            ("OVERLAY_FRAME_INTERVAL_MS", "1"),
            ("OVERLAY_HOVER_SCALE", "1.25"),
            ("OVERLAY_ASSET_DIR", "/tmp/pet"),
            ("OVERLAY_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.release_debounce, Duration::from_millis(200));
        assert_eq!(config.walk_speed, 2_000.0);
        assert_eq!(config.frame_interval, Duration::from_millis(4));
        assert_eq!(config.hover_scale, 1.25);
        assert_eq!(config.asset_dir, PathBuf::from("/tmp/pet"));
        assert_eq!(config.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        let config = OverlayConfig::from_lookup(lookup_from(&[
            ("OVERLAY_WALK_SPEED", "fast"),
            ("OVERLAY_HOVER_SCALE", "NaN"),
            ("OVERLAY_ASSET_DIR", "   "),
            ("OVERLAY_LOG_LEVEL", "loud"),
        ]));
        assert_eq!(config.walk_speed, DEFAULT_WALK_SPEED);
        assert_eq!(config.hover_scale, DEFAULT_HOVER_SCALE);
        assert_eq!(config.asset_dir, PathBuf::from("assets"));
        assert_eq!(config.log_level, log::LevelFilter::Info);
    }
}

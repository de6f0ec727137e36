use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::OverlayResult;

pub const IDLE_SPRITE_FILE: &str = "idle.png";
pub const WALK_SPRITE_FILE: &str = "walk.png";
pub const PLACEHOLDER_SIZE: f64 = 64.0;

/// What the renderer should draw for one pose.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpritePose {
    Image { path: String, width: f64, height: f64 },
    Placeholder { width: f64, height: f64 },
}

impl SpritePose {
    pub fn placeholder() -> Self {
        SpritePose::Placeholder {
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        match self {
            SpritePose::Image { width, height, .. } | SpritePose::Placeholder { width, height } => {
                (*width, *height)
            }
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, SpritePose::Placeholder { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAssets {
    pub idle: SpritePose,
    pub walk: SpritePose,
}

impl Default for SpriteAssets {
    fn default() -> Self {
        Self {
            idle: SpritePose::placeholder(),
            walk: SpritePose::placeholder(),
        }
    }
}

impl SpriteAssets {
    /// Load both poses from `dir`. A missing or unreadable image falls back to a placeholder.
    pub fn load(dir: &Path) -> Self {
        Self {
            idle: load_pose(&dir.join(IDLE_SPRITE_FILE)),
            walk: load_pose(&dir.join(WALK_SPRITE_FILE)),
        }
    }

    /// Unscaled hit-rect size: the larger extent of both poses.
    pub fn base_size(&self) -> (f64, f64) {
        let (iw, ih) = self.idle.size();
        let (ww, wh) = self.walk.size();
        (iw.max(ww), ih.max(wh))
    }
}

fn load_pose(path: &Path) -> SpritePose {
    match probe(path) {
        Ok(pose) => {
            log::debug!("Sprite loaded: {}", path.display());
            pose
        }
        Err(err) => {
            log::warn!(
                "Sprite unavailable, using placeholder (path={}): {}",
                path.display(),
                err
            );
            SpritePose::placeholder()
        }
    }
}

fn probe(path: &Path) -> OverlayResult<SpritePose> {
    let (width, height) = image::image_dimensions(path)?;
    let path = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));
    Ok(SpritePose::Image {
        path: path.to_string_lossy().into_owned(),
        width: width.max(1) as f64,
        height: height.max(1) as f64,
    })
}

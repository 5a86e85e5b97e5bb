use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::{SkylineError, SkylineResult};

/// Number of building depth layers in a scene.
pub const DEPTH_LAYERS: usize = 3;

/// Complete configuration for one animation run.
///
/// Every field defaults to the reference twilight banner, so a JSON file only needs to list the
/// values it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Output raster size.
    pub canvas: Canvas,
    /// Number of frames in the loop.
    pub num_frames: u64,
    /// Number of stars in the upper half of the sky.
    pub num_stars: u32,
    /// Layout seed. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Banner text overlay.
    pub banner: BannerConfig,
    /// Building layers indexed by depth; exactly [`DEPTH_LAYERS`] entries.
    pub layers: Vec<LayerConfig>,
    /// Layer indices in paint order: the first entry is painted first and ends up farthest back.
    pub paint_order: Vec<usize>,
    /// Fill of lit windows.
    pub window_color: Rgb8,
    /// 1px outline around buildings and windows.
    pub outline_color: Rgb8,
    /// Vertical sky gradient.
    pub sky: SkyConfig,
    /// Star color at zero and full brightness.
    pub star: StarConfig,
    /// Display duration of each frame.
    pub frame_delay_ms: u32,
    /// GIF loop count; `0` loops forever.
    pub loop_count: u16,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerConfig {
    pub text: String,
    pub size_px: f32,
    /// Rightward bias applied after horizontal centering.
    pub offset_x: f64,
    /// Vertical center of the text as a fraction of canvas height.
    pub vertical_ratio: f64,
    pub color: Rgb8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    /// Inclusive lower bound of building height.
    pub min_height: u32,
    /// Exclusive upper bound of building height.
    pub max_height: u32,
    pub color: Rgb8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkyConfig {
    pub top: Rgb8,
    pub bottom: Rgb8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarConfig {
    pub dim: Rgb8,
    pub bright: Rgb8,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1600,
                height: 900,
            },
            num_frames: 100,
            num_stars: 150,
            seed: None,
            banner: BannerConfig::default(),
            layers: vec![
                LayerConfig {
                    min_height: 120,
                    max_height: 250,
                    color: Rgb8::new(0, 0, 0),
                },
                LayerConfig {
                    min_height: 200,
                    max_height: 300,
                    color: Rgb8::new(15, 15, 15),
                },
                LayerConfig {
                    min_height: 285,
                    max_height: 400,
                    color: Rgb8::new(30, 30, 30),
                },
            ],
            paint_order: vec![2, 1, 0],
            window_color: Rgb8::new(225, 220, 100),
            outline_color: Rgb8::new(20, 20, 40),
            sky: SkyConfig::default(),
            star: StarConfig::default(),
            frame_delay_ms: 50,
            loop_count: 0,
        }
    }
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            text: "Hi! I'm Meghan!".to_string(),
            size_px: 200.0,
            offset_x: 30.0,
            vertical_ratio: 0.3,
            color: Rgb8::new(255, 255, 255),
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            top: Rgb8::new(20, 10, 40),
            bottom: Rgb8::new(80, 50, 120),
        }
    }
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            dim: Rgb8::new(200, 200, 150),
            bright: Rgb8::new(255, 255, 255),
        }
    }
}

impl SceneConfig {
    /// Parse a JSON config. Missing fields take their reference values.
    pub fn from_json_str(s: &str) -> SkylineResult<Self> {
        serde_json::from_str(s).map_err(|e| SkylineError::serde(format!("scene config: {e}")))
    }

    /// Read and parse a JSON config file.
    pub fn from_json_path(path: &Path) -> SkylineResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject degenerate configurations before any random draw or raster allocation.
    pub fn validate(&self) -> SkylineResult<()> {
        self.canvas.validate()?;

        if self.num_frames == 0 {
            return Err(SkylineError::config("num_frames must be > 0"));
        }
        if self.num_stars > 0 && self.canvas.height / 2 == 0 {
            return Err(SkylineError::config(
                "canvas height must be >= 2 to place stars in the upper half",
            ));
        }
        if self.frame_delay_ms == 0 {
            return Err(SkylineError::config("frame_delay_ms must be > 0"));
        }

        if self.layers.len() != DEPTH_LAYERS {
            return Err(SkylineError::config(format!(
                "exactly {DEPTH_LAYERS} building layers are required, got {}",
                self.layers.len()
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.min_height >= layer.max_height {
                return Err(SkylineError::config(format!(
                    "layer {i}: min_height ({}) must be < max_height ({})",
                    layer.min_height, layer.max_height
                )));
            }
            if layer.max_height > self.canvas.height {
                return Err(SkylineError::config(format!(
                    "layer {i}: max_height ({}) exceeds canvas height ({})",
                    layer.max_height, self.canvas.height
                )));
            }
        }

        let mut seen = vec![false; self.layers.len()];
        for &idx in &self.paint_order {
            let Some(slot) = seen.get_mut(idx) else {
                return Err(SkylineError::config(format!(
                    "paint_order references missing layer {idx}"
                )));
            };
            if *slot {
                return Err(SkylineError::config(format!(
                    "paint_order lists layer {idx} more than once"
                )));
            }
            *slot = true;
        }
        if seen.iter().any(|s| !s) {
            return Err(SkylineError::config(
                "paint_order must list every layer exactly once",
            ));
        }

        self.banner.validate()
    }
}

impl BannerConfig {
    pub fn validate(&self) -> SkylineResult<()> {
        if self.text.trim().is_empty() {
            return Err(SkylineError::config(
                "banner text must be non-empty to have a measurable bounding box",
            ));
        }
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(SkylineError::config(
                "banner size_px must be finite and > 0",
            ));
        }
        if !self.offset_x.is_finite() || !self.vertical_ratio.is_finite() {
            return Err(SkylineError::config(
                "banner offset_x/vertical_ratio must be finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;

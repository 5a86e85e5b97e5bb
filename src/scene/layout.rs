use crate::{
    foundation::core::{Canvas, FrameIndex, Rect, Rgb8},
    foundation::error::{SkylineError, SkylineResult},
    foundation::math::Rng64,
    scene::config::SceneConfig,
};

/// Building widths are drawn from `[MIN, MAX)`.
pub const BUILDING_WIDTH_RANGE: (u32, u32) = (40, 130);
/// Distance between consecutive building origins, drawn from `[MIN, MAX)`.
pub const BUILDING_ADVANCE_RANGE: (u32, u32) = (70, 90);

pub const WINDOW_WIDTH: u32 = 4;
pub const WINDOW_HEIGHT: u32 = 8;
const WINDOW_STEP_X: usize = 10;
const WINDOW_STEP_Y: usize = 15;
const WINDOW_INSET_X: u32 = 5;
const WINDOW_INSET_TOP: u32 = 10;
const WINDOW_INSET_BOTTOM: u32 = 10;
/// A candidate slot becomes a lit window when a uniform draw exceeds this.
const WINDOW_ACCEPT_ABOVE: f64 = 0.95;

/// Star phases are drawn from `[0, STAR_PHASE_MAX)`.
pub const STAR_PHASE_MAX: f64 = 20.0;
/// Frames per radian of the twinkle sine.
const TWINKLE_PERIOD_FRAMES: f64 = 10.0;

/// One building footprint. Pixel spans are inclusive: `[x, x + width] × [base_y, canvas.height]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Building {
    pub x: u32,
    pub base_y: u32,
    pub width: u32,
    pub height: u32,
}

impl Building {
    /// Inclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Footprint as a rectangle in canvas space, bottom edge at the canvas floor.
    pub fn bounds(&self, canvas: Canvas) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.base_y),
            f64::from(self.right()),
            f64::from(canvas.height),
        )
    }
}

/// A lit window; `[x, x + WINDOW_WIDTH] × [y, y + WINDOW_HEIGHT]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    pub x: u32,
    pub y: u32,
    /// Index of the owning building within its layer.
    pub building: usize,
}

impl Window {
    pub fn bounds(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x + WINDOW_WIDTH),
            f64::from(self.y + WINDOW_HEIGHT),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: u32,
    pub y: u32,
    pub phase: f64,
}

impl Star {
    /// Twinkle brightness in `[0, 1]`, a pure function of the frame index and this star's phase.
    pub fn brightness_at(&self, frame: FrameIndex) -> f64 {
        let t = (frame.0 as f64 + self.phase * TWINKLE_PERIOD_FRAMES) / TWINKLE_PERIOD_FRAMES;
        (0.5 + 0.5 * t.sin()).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub buildings: Vec<Building>,
    pub windows: Vec<Window>,
    pub color: Rgb8,
}

/// Frame-invariant geometry for one run: building layers, their windows and the star field.
///
/// Generated once; every frame reads it through a shared reference.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayout {
    canvas: Canvas,
    seed: u64,
    layers: Vec<Layer>,
    stars: Vec<Star>,
}

impl SceneLayout {
    /// Validate `cfg` and derive the layout from a generator seeded with `seed`.
    ///
    /// Draw order is fixed (stars, then footprints per layer, then windows per layer) so a seed
    /// fully determines the layout.
    #[tracing::instrument(skip(cfg))]
    pub fn generate(cfg: &SceneConfig, seed: u64) -> SkylineResult<Self> {
        cfg.validate()?;
        let mut rng = Rng64::new(seed);
        let canvas = cfg.canvas;

        let stars = generate_stars(&mut rng, canvas, cfg.num_stars)?;

        let mut footprints = Vec::with_capacity(cfg.layers.len());
        for layer in &cfg.layers {
            footprints.push(generate_buildings(
                &mut rng,
                canvas,
                layer.min_height,
                layer.max_height,
            )?);
        }

        let mut layers = Vec::with_capacity(cfg.layers.len());
        for (buildings, layer_cfg) in footprints.into_iter().zip(&cfg.layers) {
            let windows = generate_windows(&mut rng, canvas, &buildings);
            layers.push(Layer {
                buildings,
                windows,
                color: layer_cfg.color,
            });
        }

        for (i, layer) in layers.iter().enumerate() {
            tracing::debug!(
                layer = i,
                buildings = layer.buildings.len(),
                windows = layer.windows.len(),
                "generated layer"
            );
        }

        Ok(Self {
            canvas,
            seed,
            layers,
            stars,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Seed the layout was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

/// Greedy left-to-right tiling of one layer.
///
/// Starts at `x = 0`, emits a building of random width/height at the cursor, then advances the
/// cursor by a random step until it reaches the canvas width.
pub fn generate_buildings(
    rng: &mut Rng64,
    canvas: Canvas,
    min_height: u32,
    max_height: u32,
) -> SkylineResult<Vec<Building>> {
    canvas.validate()?;
    if min_height >= max_height || max_height > canvas.height {
        return Err(SkylineError::config(format!(
            "building height range [{min_height}, {max_height}) does not fit canvas height {}",
            canvas.height
        )));
    }

    let mut out = Vec::new();
    let mut x = 0u32;
    while x < canvas.width {
        let width = rng.range_u32(BUILDING_WIDTH_RANGE.0, BUILDING_WIDTH_RANGE.1)?;
        let height = rng.range_u32(min_height, max_height)?;
        out.push(Building {
            x,
            base_y: canvas.height - height,
            width,
            height,
        });
        x += rng.range_u32(BUILDING_ADVANCE_RANGE.0, BUILDING_ADVANCE_RANGE.1)?;
    }
    Ok(out)
}

/// Sparse window speckle: every candidate slot on a fixed grid inside each building is lit with
/// independent probability 0.05.
pub fn generate_windows(rng: &mut Rng64, canvas: Canvas, buildings: &[Building]) -> Vec<Window> {
    let y_end = canvas.height.saturating_sub(WINDOW_INSET_BOTTOM);
    let mut out = Vec::new();
    for (idx, b) in buildings.iter().enumerate() {
        let x_end = b.right().saturating_sub(WINDOW_INSET_X);
        for wy in (b.base_y + WINDOW_INSET_TOP..y_end).step_by(WINDOW_STEP_Y) {
            for wx in (b.x + WINDOW_INSET_X..x_end).step_by(WINDOW_STEP_X) {
                if rng.next_f64_01() > WINDOW_ACCEPT_ABOVE {
                    out.push(Window {
                        x: wx,
                        y: wy,
                        building: idx,
                    });
                }
            }
        }
    }
    out
}

/// Stars uniformly scattered over the upper half of the canvas, each with its own twinkle phase.
pub fn generate_stars(rng: &mut Rng64, canvas: Canvas, count: u32) -> SkylineResult<Vec<Star>> {
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let x = rng.range_u32(0, canvas.width)?;
        let y = rng.range_u32(0, canvas.height / 2)?;
        let phase = rng.range_f64(0.0, STAR_PHASE_MAX);
        out.push(Star { x, y, phase });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layout.rs"]
mod tests;

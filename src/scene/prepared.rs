use crate::{
    assets::text::{FontProvider, PreparedBanner},
    foundation::error::{SkylineError, SkylineResult},
    foundation::math::Rng64,
    scene::config::SceneConfig,
    scene::layout::SceneLayout,
};

/// Everything a frame needs, resolved once per run: validated config, generated layout and the
/// shaped banner.
///
/// Immutable after construction and `Sync`, so worker threads can render from a shared reference.
#[derive(Clone, Debug)]
pub struct PreparedScene {
    config: SceneConfig,
    layout: SceneLayout,
    banner: Option<PreparedBanner>,
}

impl PreparedScene {
    /// Validate `config`, generate the layout and shape the banner with `fonts`.
    ///
    /// A config without a seed draws one from the clock; the chosen seed is logged and kept on
    /// the layout so the run can be reproduced.
    pub fn prepare(config: SceneConfig, fonts: &dyn FontProvider) -> SkylineResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(Rng64::seed_from_time);
        tracing::info!(
            seed,
            width = config.canvas.width,
            height = config.canvas.height,
            frames = config.num_frames,
            "preparing scene"
        );

        let layout = SceneLayout::generate(&config, seed)?;
        let banner = PreparedBanner::prepare(&config.banner, config.canvas, fonts)?;
        Ok(Self {
            config,
            layout,
            banner: Some(banner),
        })
    }

    /// Assemble a scene from already-built parts. `banner = None` renders the skyline alone.
    pub fn from_parts(
        config: SceneConfig,
        layout: SceneLayout,
        banner: Option<PreparedBanner>,
    ) -> SkylineResult<Self> {
        config.validate()?;
        if layout.canvas() != config.canvas {
            return Err(SkylineError::config(format!(
                "layout canvas {}x{} does not match config canvas {}x{}",
                layout.canvas().width,
                layout.canvas().height,
                config.canvas.width,
                config.canvas.height
            )));
        }
        if layout.layers().len() != config.layers.len() {
            return Err(SkylineError::config(
                "layout layer count does not match config",
            ));
        }
        Ok(Self {
            config,
            layout,
            banner,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn banner(&self) -> Option<&PreparedBanner> {
        self.banner.as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/prepared.rs"]
mod tests;

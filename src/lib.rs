//! Skyline renders a procedural twilight city skyline with a text banner into a looping GIF.
//!
//! The pipeline has three stages:
//!
//! - Generate a [`SceneLayout`] (buildings, lit windows, stars) from a seeded [`Rng64`]
//! - Render each frame to RGBA with the [`CpuBackend`]; only star brightness varies over time
//! - Stream the frames in order into a [`FrameSink`], usually a [`GifSink`]
//!
//! [`render_animation`] and [`render_to_gif`] run all three stages from a [`SceneConfig`].
#![forbid(unsafe_code)]

mod foundation;

/// Font loading and banner text layout.
pub mod assets;
/// Encoding sinks.
pub mod encode;
/// Frame rendering and animation assembly.
pub mod render;
/// Scene configuration and procedural layout.
pub mod scene;

pub use crate::foundation::core::{Canvas, FrameIndex, FrameRange, Point, Rect, Rgb8};
pub use crate::foundation::error::{SkylineError, SkylineResult};
pub use crate::foundation::math::Rng64;

pub use crate::assets::text::{
    BytesFontProvider, FileFontProvider, FontProvider, PreparedBanner, TextLayoutEngine,
};
pub use crate::encode::gif::GifSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::backend::{FrameRGBA, RenderBackend};
pub use crate::render::cpu::{CpuBackend, sky_color, star_appearance};
pub use crate::render::pipeline::{
    RenderStats, RenderThreading, assemble_animation, encode_gif, render_animation, render_frame,
    render_frames, render_to_gif,
};
pub use crate::scene::config::{
    BannerConfig, DEPTH_LAYERS, LayerConfig, SceneConfig, SkyConfig, StarConfig,
};
pub use crate::scene::layout::{
    Building, Layer, SceneLayout, Star, Window, generate_buildings, generate_stars,
    generate_windows,
};
pub use crate::scene::prepared::PreparedScene;

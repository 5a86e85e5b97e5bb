use std::path::Path;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    assets::text::FontProvider,
    encode::gif::GifSink,
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{SkylineError, SkylineResult},
    render::backend::{FrameRGBA, RenderBackend},
    render::cpu::CpuBackend,
    scene::config::SceneConfig,
    scene::prepared::PreparedScene,
};

/// Render a single frame of a prepared scene on a fresh CPU backend.
pub fn render_frame(scene: &PreparedScene, frame: FrameIndex) -> SkylineResult<FrameRGBA> {
    CpuBackend::new().render_frame(scene, frame)
}

#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Render frames of a chunk concurrently on a rayon pool.
    pub parallel: bool,
    /// Frames rendered per chunk before they are handed to the sink.
    pub chunk_size: usize,
    /// Worker count; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Encoded output size; `0` when the sink does not report one.
    pub bytes_written: u64,
}

/// Render `range` and return the frames in index order.
#[tracing::instrument(skip_all, fields(start = range.start.0, end = range.end.0))]
pub fn render_frames(
    scene: &PreparedScene,
    range: FrameRange,
    threading: &RenderThreading,
) -> SkylineResult<Vec<FrameRGBA>> {
    let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
    for_each_chunk(scene, range, threading, |_, frame| {
        out.push(frame);
        Ok(())
    })?;
    Ok(out)
}

/// Render every frame of the scene and stream it into `sink` in increasing index order.
///
/// No frame is skipped, reordered or deduplicated.
#[tracing::instrument(skip_all, fields(frames = scene.config().num_frames))]
pub fn assemble_animation(
    scene: &PreparedScene,
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
) -> SkylineResult<RenderStats> {
    let cfg = scene.config();
    sink.begin(SinkConfig {
        canvas: cfg.canvas,
        num_frames: cfg.num_frames,
        frame_delay_ms: cfg.frame_delay_ms,
        loop_count: cfg.loop_count,
    })?;

    let mut stats = RenderStats::default();
    for_each_chunk(
        scene,
        FrameRange::first(cfg.num_frames),
        threading,
        |idx, frame| {
            sink.push_frame(idx, &frame)?;
            stats.frames_total += 1;
            Ok(())
        },
    )?;

    sink.end()?;
    tracing::info!(frames = stats.frames_total, "animation assembled");
    Ok(stats)
}

/// Prepare the scene and encode the whole animation as GIF bytes.
pub fn render_animation(
    config: SceneConfig,
    fonts: &dyn FontProvider,
    threading: &RenderThreading,
) -> SkylineResult<Vec<u8>> {
    let scene = PreparedScene::prepare(config, fonts)?;
    encode_gif(&scene, threading)
}

/// Encode an already prepared scene as GIF bytes.
pub fn encode_gif(scene: &PreparedScene, threading: &RenderThreading) -> SkylineResult<Vec<u8>> {
    encode_gif_with_stats(scene, threading).map(|(bytes, _)| bytes)
}

fn encode_gif_with_stats(
    scene: &PreparedScene,
    threading: &RenderThreading,
) -> SkylineResult<(Vec<u8>, RenderStats)> {
    let mut bytes = Vec::new();
    let mut stats = {
        let mut sink = GifSink::new(&mut bytes);
        assemble_animation(scene, threading, &mut sink)?
    };
    stats.bytes_written = bytes.len() as u64;
    Ok((bytes, stats))
}

/// Prepare, render and write the animation to `out_path`, creating parent directories.
pub fn render_to_gif(
    config: SceneConfig,
    fonts: &dyn FontProvider,
    out_path: &Path,
    threading: &RenderThreading,
) -> SkylineResult<RenderStats> {
    let scene = PreparedScene::prepare(config, fonts)?;
    let (bytes, stats) = encode_gif_with_stats(&scene, threading)?;
    ensure_parent_dir(out_path)?;
    std::fs::write(out_path, &bytes).map_err(|e| {
        SkylineError::encode(format!("failed to write '{}': {e}", out_path.display()))
    })?;
    tracing::info!(path = %out_path.display(), bytes = bytes.len(), "wrote gif");
    Ok(stats)
}

pub fn ensure_parent_dir(path: &Path) -> SkylineResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

fn for_each_chunk(
    scene: &PreparedScene,
    range: FrameRange,
    threading: &RenderThreading,
    mut emit: impl FnMut(FrameIndex, FrameRGBA) -> SkylineResult<()>,
) -> SkylineResult<()> {
    if range.is_empty() {
        return Err(SkylineError::config("render range must be non-empty"));
    }

    if !threading.parallel {
        let mut backend = CpuBackend::new();
        for f in range.iter() {
            emit(f, backend.render_frame(scene, f)?)?;
        }
        return Ok(());
    }

    let pool = build_thread_pool(threading.threads)?;
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        tracing::debug!(start = chunk_start, end = chunk_end, "rendering chunk");

        let frames = render_chunk_parallel(scene, chunk, &pool)?;
        for (f, frame) in chunk.iter().zip(frames) {
            emit(f, frame)?;
        }
        chunk_start = chunk_end;
    }
    Ok(())
}

fn render_chunk_parallel(
    scene: &PreparedScene,
    range: FrameRange,
    pool: &rayon::ThreadPool,
) -> SkylineResult<Vec<FrameRGBA>> {
    let indices: Vec<FrameIndex> = range.iter().collect();
    let rendered = pool.install(|| {
        indices
            .par_iter()
            .map_init(CpuBackend::new, |backend, &f| backend.render_frame(scene, f))
            .collect::<Vec<_>>()
    });
    rendered.into_iter().collect()
}

fn build_thread_pool(threads: Option<usize>) -> SkylineResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SkylineError::config(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SkylineError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;

use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{SkylineError, SkylineResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output size; every pushed frame must match it.
    pub canvas: Canvas,
    /// Number of frames that will be pushed.
    pub num_frames: u64,
    /// Display duration of each frame.
    pub frame_delay_ms: u32,
    /// Loop count; `0` loops forever.
    pub loop_count: u16,
}

/// Sink contract for consuming rendered frames in animation order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex` values.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SkylineResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SkylineResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> SkylineResult<()>;
}

/// Check a frame against the sink config and the previously pushed index.
pub(crate) fn check_push(
    cfg: Option<&SinkConfig>,
    last: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRGBA,
) -> SkylineResult<()> {
    let cfg = cfg.ok_or_else(|| SkylineError::encode("push_frame called before begin"))?;
    if let Some(prev) = last
        && idx <= prev
    {
        return Err(SkylineError::encode(format!(
            "frame {} pushed after frame {}; frames must arrive in increasing order",
            idx.0, prev.0
        )));
    }
    if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
        return Err(SkylineError::encode(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
        )));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SkylineResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SkylineResult<()> {
        check_push(
            self.cfg.as_ref(),
            self.frames.last().map(|(i, _)| *i),
            idx,
            frame,
        )?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SkylineResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;

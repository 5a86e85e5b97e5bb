use std::io::Write;

use image::codecs::gif::{GifEncoder, Repeat};

use crate::{
    encode::sink::{FrameSink, SinkConfig, check_push},
    foundation::core::FrameIndex,
    foundation::error::{SkylineError, SkylineResult},
    render::backend::FrameRGBA,
};

/// NeuQuant sampling factor handed to the GIF encoder (1 = best, 30 = fastest).
pub const DEFAULT_GIF_SPEED: i32 = 10;

enum GifState<W: Write> {
    Idle(W),
    Encoding(GifEncoder<W>),
    Finished,
}

/// Encodes pushed frames into a looping animated GIF written to `W`.
///
/// The GIF trailer is written when the encoder is dropped at [`FrameSink::end`].
pub struct GifSink<W: Write> {
    state: GifState<W>,
    speed: i32,
    cfg: Option<SinkConfig>,
    last: Option<FrameIndex>,
    frames_written: u64,
}

impl<W: Write> GifSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_speed(writer, DEFAULT_GIF_SPEED)
    }

    pub fn with_speed(writer: W, speed: i32) -> Self {
        Self {
            state: GifState::Idle(writer),
            speed: speed.clamp(1, 30),
            cfg: None,
            last: None,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

fn repeat_for(loop_count: u16) -> Repeat {
    if loop_count == 0 {
        Repeat::Infinite
    } else {
        Repeat::Finite(loop_count)
    }
}

impl<W: Write> FrameSink for GifSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> SkylineResult<()> {
        let state = std::mem::replace(&mut self.state, GifState::Finished);
        let GifState::Idle(writer) = state else {
            return Err(SkylineError::encode("gif sink can only be started once"));
        };

        let mut encoder = GifEncoder::new_with_speed(writer, self.speed);
        encoder
            .set_repeat(repeat_for(cfg.loop_count))
            .map_err(|e| SkylineError::encode(format!("failed to set gif loop count: {e}")))?;

        self.state = GifState::Encoding(encoder);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SkylineResult<()> {
        check_push(self.cfg.as_ref(), self.last, idx, frame)?;
        let GifState::Encoding(encoder) = &mut self.state else {
            return Err(SkylineError::encode("gif sink is not accepting frames"));
        };
        let delay_ms = self.cfg.map(|c| c.frame_delay_ms).unwrap_or(0);

        let rgba = frame.to_straight_rgba8()?;
        let buf = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
            .ok_or_else(|| SkylineError::encode("frame buffer does not match its dimensions"))?;
        let gif_frame =
            image::Frame::from_parts(buf, 0, 0, image::Delay::from_numer_denom_ms(delay_ms, 1));
        encoder.encode_frame(gif_frame).map_err(|e| {
            SkylineError::encode(format!("failed to encode gif frame {}: {e}", idx.0))
        })?;

        self.last = Some(idx);
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> SkylineResult<()> {
        match std::mem::replace(&mut self.state, GifState::Finished) {
            GifState::Encoding(encoder) => {
                drop(encoder);
                tracing::debug!(frames = self.frames_written, "gif finished");
                Ok(())
            }
            GifState::Idle(_) => Err(SkylineError::encode("gif sink ended before begin")),
            GifState::Finished => Err(SkylineError::encode("gif sink already finished")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
